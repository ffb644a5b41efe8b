//! In-memory repository for planning tests and embedding hosts.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use crate::planning::{
    domain::{Sprint, SprintId, Task, TaskId},
    ports::{
        ChangeSet, PlanningChange, PlanningRepository, PlanningRepositoryError,
        PlanningRepositoryResult, TaskQuery,
    },
};

/// Thread-safe in-memory planning repository.
///
/// Commits are staged on a copy of the current state and swapped in only when
/// every change applies cleanly.
#[derive(Debug, Clone, Default)]
pub struct InMemoryPlanningRepository {
    state: Arc<RwLock<InMemoryPlanningState>>,
}

#[derive(Debug, Clone, Default)]
struct InMemoryPlanningState {
    tasks: HashMap<TaskId, Task>,
    sprints: HashMap<SprintId, Sprint>,
}

impl InMemoryPlanningRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

/// A writer panicked while holding the store lock.
#[derive(Debug, Error)]
#[error("in-memory planning store lock poisoned")]
struct LockPoisoned;

fn lock_poisoned() -> PlanningRepositoryError {
    PlanningRepositoryError::persistence(LockPoisoned)
}

impl InMemoryPlanningState {
    fn apply(&mut self, change: &PlanningChange) -> PlanningRepositoryResult<()> {
        match change {
            PlanningChange::InsertTask(task) => {
                if self.tasks.contains_key(&task.id()) {
                    return Err(PlanningRepositoryError::DuplicateTask(task.id()));
                }
                self.tasks.insert(task.id(), task.clone());
            }
            PlanningChange::UpdateTask(task) => {
                let stored = self
                    .tasks
                    .get_mut(&task.id())
                    .ok_or(PlanningRepositoryError::TaskNotFound(task.id()))?;
                *stored = task.clone();
            }
            PlanningChange::DeleteTask(id) => {
                self.tasks
                    .remove(id)
                    .ok_or(PlanningRepositoryError::TaskNotFound(*id))?;
            }
            PlanningChange::InsertSprint(sprint) => {
                if self.sprints.contains_key(&sprint.id()) {
                    return Err(PlanningRepositoryError::DuplicateSprint(sprint.id()));
                }
                self.sprints.insert(sprint.id(), sprint.clone());
            }
            PlanningChange::UpdateSprint(sprint) => {
                let stored = self
                    .sprints
                    .get_mut(&sprint.id())
                    .ok_or(PlanningRepositoryError::SprintNotFound(sprint.id()))?;
                *stored = sprint.clone();
            }
            PlanningChange::DeleteSprint(id) => {
                self.sprints
                    .remove(id)
                    .ok_or(PlanningRepositoryError::SprintNotFound(*id))?;
            }
        }
        Ok(())
    }

    /// Rejects membership rows that reference missing tasks or list a task in
    /// more than one sprint.
    fn check_membership(&self) -> PlanningRepositoryResult<()> {
        let mut owners: HashMap<TaskId, SprintId> = HashMap::new();
        for sprint in self.sprints.values() {
            for task_id in sprint.task_ids() {
                if !self.tasks.contains_key(task_id) {
                    return Err(PlanningRepositoryError::TaskNotFound(*task_id));
                }
                if owners.insert(*task_id, sprint.id()).is_some() {
                    return Err(PlanningRepositoryError::MembershipConflict { task_id: *task_id });
                }
            }
        }
        Ok(())
    }
}

impl PlanningRepository for InMemoryPlanningRepository {
    fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>> {
        let state = self.state.read().map_err(|_| lock_poisoned())?;
        Ok(state.tasks.get(&id).cloned())
    }

    fn find_sprint(&self, id: SprintId) -> PlanningRepositoryResult<Option<Sprint>> {
        let state = self.state.read().map_err(|_| lock_poisoned())?;
        Ok(state.sprints.get(&id).cloned())
    }

    fn list_sprints(&self) -> PlanningRepositoryResult<Vec<Sprint>> {
        let state = self.state.read().map_err(|_| lock_poisoned())?;
        let mut sprints: Vec<Sprint> = state.sprints.values().cloned().collect();
        sprints.sort_by_key(|sprint| (sprint.start_date(), sprint.created_at()));
        Ok(sprints)
    }

    fn list_tasks(&self, query: &TaskQuery) -> PlanningRepositoryResult<Vec<Task>> {
        let state = self.state.read().map_err(|_| lock_poisoned())?;
        let mut tasks: Vec<Task> = state
            .tasks
            .values()
            .filter(|task| query.matches(task))
            .cloned()
            .collect();
        // HashMap iteration is unordered; settle ties deterministically first.
        tasks.sort_by_key(|task| (task.created_at(), task.id()));
        query.order().sort(&mut tasks);
        Ok(tasks)
    }

    fn commit(&self, changes: &ChangeSet) -> PlanningRepositoryResult<()> {
        let mut state = self.state.write().map_err(|_| lock_poisoned())?;
        let mut staged = state.clone();
        for change in changes.changes() {
            staged.apply(change)?;
        }
        staged.check_membership()?;
        *state = staged;
        Ok(())
    }
}

//! Repository port for task and sprint persistence.
//!
//! Reads are plain lookups and filtered listings. Writes are grouped into a
//! [`ChangeSet`] that implementations must apply all-or-nothing, so a failed
//! commit never leaves a half-deleted sprint or a task pointing at a sprint
//! that does not list it.

use crate::planning::domain::{Sprint, SprintId, Task, TaskId, TaskStatus};
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;

/// Result type for planning repository operations.
pub type PlanningRepositoryResult<T> = Result<T, PlanningRepositoryError>;

/// Planning persistence contract.
pub trait PlanningRepository: Send + Sync {
    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the store fails.
    fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>>;

    /// Finds a sprint by identifier.
    ///
    /// Returns `None` when the sprint does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the store fails.
    fn find_sprint(&self, id: SprintId) -> PlanningRepositoryResult<Option<Sprint>>;

    /// Returns every sprint ordered by ascending start date.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the store fails.
    fn list_sprints(&self) -> PlanningRepositoryResult<Vec<Sprint>>;

    /// Returns the tasks matching `query`, sorted by its order.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningRepositoryError::Persistence`] when the store fails.
    fn list_tasks(&self, query: &TaskQuery) -> PlanningRepositoryResult<Vec<Task>>;

    /// Applies every change in `changes` atomically.
    ///
    /// # Errors
    ///
    /// Returns a duplicate or not-found error when a change does not fit the
    /// stored state, [`PlanningRepositoryError::MembershipConflict`] when a
    /// task would belong to two sprints, or
    /// [`PlanningRepositoryError::Persistence`] when the store fails. Nothing
    /// is written in any of these cases.
    fn commit(&self, changes: &ChangeSet) -> PlanningRepositoryResult<()>;
}

/// Sort order for task listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TaskOrder {
    /// Oldest first.
    CreatedAscending,
    /// Newest first.
    #[default]
    CreatedDescending,
    /// Earliest due date first; undated tasks last.
    DueDateAscending,
    /// Alphabetical by name.
    NameAscending,
}

impl TaskOrder {
    /// Sorts `tasks` in place. Ties keep creation order.
    pub fn sort(self, tasks: &mut [Task]) {
        tasks.sort_by(|left, right| self.compare(left, right));
    }

    fn compare(self, left: &Task, right: &Task) -> Ordering {
        let by_creation = left.created_at().cmp(&right.created_at());
        match self {
            Self::CreatedAscending => by_creation,
            Self::CreatedDescending => by_creation.reverse(),
            Self::DueDateAscending => compare_due_dates(left, right).then(by_creation),
            Self::NameAscending => left
                .name()
                .as_str()
                .cmp(right.name().as_str())
                .then(by_creation),
        }
    }
}

fn compare_due_dates(left: &Task, right: &Task) -> Ordering {
    match (left.due_date(), right.due_date()) {
        (Some(left_due), Some(right_due)) => left_due.cmp(&right_due),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Filter and sort options for [`PlanningRepository::list_tasks`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskQuery {
    status: Option<TaskStatus>,
    sprint_id: Option<SprintId>,
    order: TaskOrder,
}

impl TaskQuery {
    /// Matches every task, newest first.
    #[must_use]
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts the query to tasks with `status`.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Restricts the query to members of `sprint_id`.
    #[must_use]
    pub const fn in_sprint(mut self, sprint_id: SprintId) -> Self {
        self.sprint_id = Some(sprint_id);
        self
    }

    /// Sets the result order.
    #[must_use]
    pub const fn ordered_by(mut self, order: TaskOrder) -> Self {
        self.order = order;
        self
    }

    /// Returns the status filter, if any.
    #[must_use]
    pub const fn status(&self) -> Option<TaskStatus> {
        self.status
    }

    /// Returns the sprint filter, if any.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns the result order.
    #[must_use]
    pub const fn order(&self) -> TaskOrder {
        self.order
    }

    /// Returns `true` when `task` passes every filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.status.is_none_or(|status| task.status() == status)
            && self
                .sprint_id
                .is_none_or(|sprint_id| task.sprint_id() == Some(sprint_id))
    }
}

/// Single write within a [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanningChange {
    /// Stores a new task.
    InsertTask(Task),
    /// Replaces an existing task.
    UpdateTask(Task),
    /// Removes a task.
    DeleteTask(TaskId),
    /// Stores a new sprint with its membership.
    InsertSprint(Sprint),
    /// Replaces an existing sprint and its membership.
    UpdateSprint(Sprint),
    /// Removes a sprint and its membership rows.
    DeleteSprint(SprintId),
}

/// Ordered batch of writes committed as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changes: Vec<PlanningChange>,
}

impl ChangeSet {
    /// Creates an empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a task insert.
    pub fn insert_task(&mut self, task: Task) -> &mut Self {
        self.changes.push(PlanningChange::InsertTask(task));
        self
    }

    /// Queues a task update.
    pub fn update_task(&mut self, task: Task) -> &mut Self {
        self.changes.push(PlanningChange::UpdateTask(task));
        self
    }

    /// Queues a task deletion.
    pub fn delete_task(&mut self, id: TaskId) -> &mut Self {
        self.changes.push(PlanningChange::DeleteTask(id));
        self
    }

    /// Queues a sprint insert.
    pub fn insert_sprint(&mut self, sprint: Sprint) -> &mut Self {
        self.changes.push(PlanningChange::InsertSprint(sprint));
        self
    }

    /// Queues a sprint update.
    pub fn update_sprint(&mut self, sprint: Sprint) -> &mut Self {
        self.changes.push(PlanningChange::UpdateSprint(sprint));
        self
    }

    /// Queues a sprint deletion.
    pub fn delete_sprint(&mut self, id: SprintId) -> &mut Self {
        self.changes.push(PlanningChange::DeleteSprint(id));
        self
    }

    /// Returns the queued changes in application order.
    #[must_use]
    pub fn changes(&self) -> &[PlanningChange] {
        &self.changes
    }

    /// Returns the number of queued changes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.changes.len()
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }
}

/// Errors returned by planning repository implementations.
#[derive(Debug, Clone, Error)]
pub enum PlanningRepositoryError {
    /// A task with the same identifier already exists.
    #[error("duplicate task identifier: {0}")]
    DuplicateTask(TaskId),

    /// A sprint with the same identifier already exists.
    #[error("duplicate sprint identifier: {0}")]
    DuplicateSprint(SprintId),

    /// The task was not found.
    #[error("task not found: {0}")]
    TaskNotFound(TaskId),

    /// The sprint was not found.
    #[error("sprint not found: {0}")]
    SprintNotFound(SprintId),

    /// The task would be listed by more than one sprint.
    #[error("task {task_id} is already a member of another sprint")]
    MembershipConflict {
        /// Task listed twice.
        task_id: TaskId,
    },

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl PlanningRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}

//! Service layer for sprint lifecycle orchestration.
//!
//! [`SprintLifecycleService`] is the only writer of sprint records and sprint
//! membership. Each operation validates first, computes new task and sprint
//! states through the domain state machines, commits one [`ChangeSet`], and
//! updates the cached sprint list only after the commit succeeds.

use crate::planning::{
    config::PlanningConfig,
    domain::{
        PlanningDomainError, Sprint, SprintAction, SprintConflict, SprintDates, SprintId,
        SprintStatus, Task, TaskId, TaskStatus,
    },
    ports::{
        ChangeSet, PlanningRepository, PlanningRepositoryError, TaskOrder, TaskQuery,
    },
};
use chrono::NaiveDate;
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateSprintRequest {
    start: NaiveDate,
    end: NaiveDate,
    task_ids: Vec<TaskId>,
}

impl CreateSprintRequest {
    /// Creates a request for an empty sprint covering `start` to `end`.
    #[must_use]
    pub const fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            start,
            end,
            task_ids: Vec::new(),
        }
    }

    /// Sets the tasks to assign, in the order they should be listed.
    #[must_use]
    pub fn with_tasks(mut self, task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.task_ids = task_ids.into_iter().collect();
        self
    }
}

/// Request payload for re-planning an existing sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSprintRequest {
    sprint_id: SprintId,
    start: NaiveDate,
    end: NaiveDate,
    task_ids: Vec<TaskId>,
}

impl EditSprintRequest {
    /// Creates a request that moves `sprint_id` to the given dates and leaves
    /// it with no tasks unless [`Self::with_tasks`] is called.
    #[must_use]
    pub const fn new(sprint_id: SprintId, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            sprint_id,
            start,
            end,
            task_ids: Vec::new(),
        }
    }

    /// Sets the complete membership the sprint should have after the edit.
    #[must_use]
    pub fn with_tasks(mut self, task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        self.task_ids = task_ids.into_iter().collect();
        self
    }
}

/// Service-level errors for sprint lifecycle operations.
#[derive(Debug, Error)]
pub enum SprintLifecycleError {
    /// Domain validation failed, including start dates not before end dates.
    #[error(transparent)]
    Domain(#[from] PlanningDomainError),

    /// The requested dates collide with a stored sprint.
    #[error("sprint dates overlap the sprint from {start} to {end}")]
    OverlappingDates {
        /// First day of the conflicting sprint.
        start: NaiveDate,
        /// Last day of the conflicting sprint.
        end: NaiveDate,
    },

    /// No sprint exists with the given identifier.
    #[error("sprint {0} not found")]
    SprintNotFound(SprintId),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// The task is already a member of a different sprint.
    #[error("task {task_id} already belongs to sprint {sprint_id}")]
    TaskInAnotherSprint {
        /// Requested task.
        task_id: TaskId,
        /// Sprint that currently owns the task.
        sprint_id: SprintId,
    },

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PlanningRepositoryError),
}

impl SprintLifecycleError {
    /// Returns `true` when the error stems from a stale task or sprint
    /// reference, in which case callers should refresh their view.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::SprintNotFound(_)
                | Self::TaskNotFound(_)
                | Self::Repository(
                    PlanningRepositoryError::SprintNotFound(_)
                        | PlanningRepositoryError::TaskNotFound(_)
                )
        )
    }
}

impl From<SprintConflict> for SprintLifecycleError {
    fn from(conflict: SprintConflict) -> Self {
        Self::OverlappingDates {
            start: conflict.dates.start(),
            end: conflict.dates.end(),
        }
    }
}

/// Result type for sprint lifecycle service operations.
pub type SprintLifecycleResult<T> = Result<T, SprintLifecycleError>;

/// Completion summary for one sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SprintProgress {
    /// Number of member tasks.
    pub total_tasks: usize,
    /// Number of member tasks marked done.
    pub completed_tasks: usize,
    /// Whole days left until the sprint's last day; zero once it has passed.
    pub days_remaining: u64,
}

impl SprintProgress {
    /// Returns `true` when the sprint has tasks and all of them are done.
    #[must_use]
    pub const fn is_finished(&self) -> bool {
        self.total_tasks > 0 && self.completed_tasks == self.total_tasks
    }
}

/// Sprint lifecycle orchestration service.
///
/// Owns a read cache of every stored sprint, ordered by ascending start date.
/// Mutations take `&mut self`; the host serializes calls.
pub struct SprintLifecycleService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    config: PlanningConfig,
    sprints: Vec<Sprint>,
}

impl<R, C> SprintLifecycleService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    /// Creates a service and loads the sprint cache.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::Repository`] when the sprints cannot be
    /// loaded.
    pub fn new(
        repository: Arc<R>,
        clock: Arc<C>,
        config: PlanningConfig,
    ) -> SprintLifecycleResult<Self> {
        let sprints = repository.list_sprints()?;
        tracing::debug!(sprints = sprints.len(), "sprint cache loaded");
        Ok(Self {
            repository,
            clock,
            config,
            sprints,
        })
    }

    /// Creates a service and completes every expired sprint before returning.
    ///
    /// Hosts call this once at process start so no caller ever observes an
    /// active or planned sprint whose end date has passed.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::Repository`] when loading or the expiry
    /// commit fails.
    pub fn start_up(
        repository: Arc<R>,
        clock: Arc<C>,
        config: PlanningConfig,
    ) -> SprintLifecycleResult<Self> {
        let mut service = Self::new(repository, clock, config)?;
        service.mark_expired_sprints_completed()?;
        Ok(service)
    }

    /// Returns the cached sprints ordered by ascending start date.
    #[must_use]
    pub fn sprints(&self) -> &[Sprint] {
        &self.sprints
    }

    /// Returns a cached sprint by identifier.
    #[must_use]
    pub fn sprint(&self, sprint_id: SprintId) -> Option<&Sprint> {
        self.sprints.iter().find(|sprint| sprint.id() == sprint_id)
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &PlanningConfig {
        &self.config
    }

    /// Returns the current calendar day.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.config.today(&*self.clock)
    }

    /// Reloads the sprint cache from the repository.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::Repository`] when loading fails; the
    /// previous cache is kept in that case.
    pub fn refresh(&mut self) -> SprintLifecycleResult<()> {
        self.sprints = self.repository.list_sprints()?;
        tracing::debug!(sprints = self.sprints.len(), "sprint cache refreshed");
        Ok(())
    }

    /// Creates a planned sprint and assigns the requested tasks to it.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::InvalidDateRange`] (wrapped in
    /// [`SprintLifecycleError::Domain`]) when the start is not before the
    /// end, [`SprintLifecycleError::OverlappingDates`] when the range
    /// collides with a stored sprint, task lookup errors, or repository
    /// errors. Nothing is written when any check fails.
    pub fn create_sprint(&mut self, request: CreateSprintRequest) -> SprintLifecycleResult<Sprint> {
        let dates = SprintDates::new(request.start, request.end)?;
        self.ensure_no_overlap(dates, None)?;

        let mut sprint = Sprint::plan(dates, &*self.clock);
        let mut tasks = self.assignable_tasks(&unique_ids(request.task_ids), sprint.id())?;
        for task in &mut tasks {
            task.assign_to(sprint.id(), &*self.clock);
            sprint.add_task(task.id(), &*self.clock);
        }

        let mut changes = ChangeSet::new();
        changes.insert_sprint(sprint.clone());
        for task in tasks {
            changes.update_task(task);
        }
        self.commit(&changes, "create_sprint")?;

        tracing::info!(
            sprint_id = %sprint.id(),
            dates = %sprint.dates(),
            tasks = sprint.task_ids().len(),
            "sprint created"
        );
        self.cache(sprint.clone());
        Ok(sprint)
    }

    /// Replaces a sprint's dates and membership and resets it to planned.
    ///
    /// Tasks dropped from the sprint are unassigned, new tasks are assigned,
    /// and tasks kept in the sprint are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintNotFound`] for unknown sprints,
    /// the same date, overlap and task errors as
    /// [`Self::create_sprint`] (the sprint never conflicts with itself), or
    /// repository errors. Nothing is written when any check fails.
    pub fn edit_sprint(&mut self, request: EditSprintRequest) -> SprintLifecycleResult<Sprint> {
        let mut sprint = self.cached_sprint(request.sprint_id)?.clone();
        let dates = SprintDates::new(request.start, request.end)?;
        self.ensure_no_overlap(dates, Some(sprint.id()))?;

        let requested = unique_ids(request.task_ids);
        let removed: Vec<TaskId> = sprint
            .task_ids()
            .iter()
            .copied()
            .filter(|task_id| !requested.contains(task_id))
            .collect();
        let added: Vec<TaskId> = requested
            .iter()
            .copied()
            .filter(|task_id| !sprint.contains_task(*task_id))
            .collect();

        let mut changed_tasks = Vec::with_capacity(removed.len() + added.len());
        for task_id in &removed {
            let mut task = self.require_task(*task_id)?;
            task.unassign(&*self.clock);
            changed_tasks.push(task);
        }
        for mut task in self.assignable_tasks(&added, sprint.id())? {
            task.assign_to(sprint.id(), &*self.clock);
            changed_tasks.push(task);
        }

        let membership: Vec<TaskId> = sprint
            .task_ids()
            .iter()
            .copied()
            .filter(|task_id| !removed.contains(task_id))
            .chain(added.iter().copied())
            .collect();
        sprint.replan(dates, membership, &*self.clock);

        let mut changes = ChangeSet::new();
        changes.update_sprint(sprint.clone());
        for task in changed_tasks {
            changes.update_task(task);
        }
        self.commit(&changes, "edit_sprint")?;

        tracing::info!(
            sprint_id = %sprint.id(),
            dates = %sprint.dates(),
            removed = removed.len(),
            added = added.len(),
            "sprint re-planned"
        );
        self.cache(sprint.clone());
        Ok(sprint)
    }

    /// Moves a sprint to `status` through a single state machine transition.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintNotFound`] for unknown sprints,
    /// [`PlanningDomainError::InvalidSprintTransition`] when the transition
    /// is not permitted, or repository errors.
    pub fn update_status(
        &mut self,
        sprint_id: SprintId,
        status: SprintStatus,
    ) -> SprintLifecycleResult<Sprint> {
        let mut sprint = self.cached_sprint(sprint_id)?.clone();
        let previous = sprint.status();
        sprint.apply(SprintAction::towards(status), &*self.clock)?;

        let mut changes = ChangeSet::new();
        changes.update_sprint(sprint.clone());
        self.commit(&changes, "update_status")?;

        tracing::info!(
            sprint_id = %sprint_id,
            from = %previous,
            to = %sprint.status(),
            "sprint status changed"
        );
        self.cache(sprint.clone());
        Ok(sprint)
    }

    /// Starts a planned sprint.
    ///
    /// # Errors
    ///
    /// See [`Self::update_status`].
    pub fn start_sprint(&mut self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.update_status(sprint_id, SprintStatus::Active)
    }

    /// Returns an active sprint to planning.
    ///
    /// # Errors
    ///
    /// See [`Self::update_status`].
    pub fn stop_sprint(&mut self, sprint_id: SprintId) -> SprintLifecycleResult<Sprint> {
        self.update_status(sprint_id, SprintStatus::Planned)
    }

    /// Deletes a sprint after unassigning all of its tasks.
    ///
    /// The unassignments and the deletion are committed together.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintNotFound`] for unknown sprints,
    /// [`SprintLifecycleError::TaskNotFound`] when a member task has vanished,
    /// or repository errors.
    pub fn delete_sprint(&mut self, sprint_id: SprintId) -> SprintLifecycleResult<()> {
        let sprint = self.cached_sprint(sprint_id)?;
        let mut changes = ChangeSet::new();
        for task_id in sprint.task_ids() {
            let mut task = self.require_task(*task_id)?;
            task.unassign(&*self.clock);
            changes.update_task(task);
        }
        let released = sprint.task_ids().len();
        changes.delete_sprint(sprint_id);
        self.commit(&changes, "delete_sprint")?;

        self.sprints.retain(|cached| cached.id() != sprint_id);
        tracing::info!(sprint_id = %sprint_id, released, "sprint deleted");
        Ok(())
    }

    /// Deletes a task, first removing it from the sprint that lists it.
    ///
    /// The owning sprint keeps its status; losing a task is not a re-plan.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::TaskNotFound`] for unknown tasks,
    /// [`SprintLifecycleError::SprintNotFound`] when the owning sprint is
    /// missing from the cache (call [`Self::refresh`] first), or repository
    /// errors.
    pub fn delete_task(&mut self, task_id: TaskId) -> SprintLifecycleResult<()> {
        let task = self.require_task(task_id)?;
        let owner = task
            .sprint_id()
            .map(|sprint_id| self.cached_sprint(sprint_id).cloned())
            .transpose()?;

        let mut changes = ChangeSet::new();
        let updated_owner = owner.map(|mut sprint| {
            sprint.remove_task(task_id, &*self.clock);
            changes.update_sprint(sprint.clone());
            sprint
        });
        changes.delete_task(task_id);
        self.commit(&changes, "delete_task")?;

        tracing::info!(
            task_id = %task_id,
            sprint_id = ?updated_owner.as_ref().map(Sprint::id),
            "task deleted"
        );
        if let Some(sprint) = updated_owner {
            self.cache(sprint);
        }
        Ok(())
    }

    /// Returns the sprint whose date range contains today, if any.
    ///
    /// A planned or active sprint wins over a completed one covering the same
    /// day, which [`OverlapPolicy::IgnoreCompleted`] permits.
    ///
    /// [`OverlapPolicy::IgnoreCompleted`]: crate::planning::domain::OverlapPolicy::IgnoreCompleted
    #[must_use]
    pub fn current_sprint(&self) -> Option<&Sprint> {
        let today = self.today();
        let mut covering = self
            .sprints
            .iter()
            .filter(|sprint| sprint.dates().contains(today));
        let first = covering.next()?;
        if first.status().is_terminal() {
            covering
                .find(|sprint| !sprint.status().is_terminal())
                .or(Some(first))
        } else {
            Some(first)
        }
    }

    /// Marks every sprint that ended before today as completed.
    ///
    /// All updates are committed in one batch. Task statuses are not touched.
    /// Running the sweep again without a date change completes nothing.
    ///
    /// # Errors
    ///
    /// Returns repository errors; the cache is unchanged in that case.
    pub fn mark_expired_sprints_completed(&mut self) -> SprintLifecycleResult<Vec<SprintId>> {
        let today = self.today();
        let mut expired = Vec::new();
        for sprint in &self.sprints {
            if sprint.dates().ended_before(today) && !sprint.status().is_terminal() {
                let mut completed = sprint.clone();
                completed.apply(SprintAction::Complete, &*self.clock)?;
                expired.push(completed);
            }
        }

        if expired.is_empty() {
            tracing::debug!(%today, "no expired sprints");
            return Ok(Vec::new());
        }

        let mut changes = ChangeSet::new();
        for sprint in &expired {
            changes.update_sprint(sprint.clone());
        }
        self.commit(&changes, "mark_expired_sprints_completed")?;

        let completed_ids: Vec<SprintId> = expired.iter().map(Sprint::id).collect();
        for sprint in expired {
            self.cache(sprint);
        }
        tracing::info!(%today, completed = completed_ids.len(), "expired sprints completed");
        Ok(completed_ids)
    }

    /// Lists a sprint's tasks.
    ///
    /// With `order` set to `None` the tasks follow the sprint's membership
    /// order; otherwise they are sorted by `order`.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintNotFound`] for unknown sprints or
    /// repository errors.
    pub fn list_sprint_tasks(
        &self,
        sprint_id: SprintId,
        order: Option<TaskOrder>,
    ) -> SprintLifecycleResult<Vec<Task>> {
        let sprint = self.cached_sprint(sprint_id)?;
        let query = TaskQuery::all()
            .in_sprint(sprint_id)
            .ordered_by(order.unwrap_or_default());
        let mut tasks = self.repository.list_tasks(&query)?;
        if order.is_none() {
            let members = sprint.task_ids();
            tasks.sort_by_key(|task| {
                members
                    .iter()
                    .position(|member| *member == task.id())
                    .unwrap_or(members.len())
            });
        }
        Ok(tasks)
    }

    /// Summarizes task completion and time left for a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`SprintLifecycleError::SprintNotFound`] for unknown sprints or
    /// repository errors.
    pub fn sprint_progress(&self, sprint_id: SprintId) -> SprintLifecycleResult<SprintProgress> {
        let dates = self.cached_sprint(sprint_id)?.dates();
        let tasks = self.list_sprint_tasks(sprint_id, None)?;
        let completed_tasks = tasks
            .iter()
            .filter(|task| task.status() == TaskStatus::Done)
            .count();
        Ok(SprintProgress {
            total_tasks: tasks.len(),
            completed_tasks,
            days_remaining: dates.days_remaining(self.today()),
        })
    }

    fn cached_sprint(&self, sprint_id: SprintId) -> SprintLifecycleResult<&Sprint> {
        self.sprint(sprint_id)
            .ok_or(SprintLifecycleError::SprintNotFound(sprint_id))
    }

    fn require_task(&self, task_id: TaskId) -> SprintLifecycleResult<Task> {
        self.repository
            .find_task(task_id)?
            .ok_or(SprintLifecycleError::TaskNotFound(task_id))
    }

    /// Loads tasks that may join `sprint_id`: they must exist and must not be
    /// listed by any other sprint.
    fn assignable_tasks(
        &self,
        task_ids: &[TaskId],
        sprint_id: SprintId,
    ) -> SprintLifecycleResult<Vec<Task>> {
        task_ids
            .iter()
            .map(|task_id| {
                let task = self.require_task(*task_id)?;
                match task.sprint_id() {
                    Some(owner) if owner != sprint_id => {
                        Err(SprintLifecycleError::TaskInAnotherSprint {
                            task_id: *task_id,
                            sprint_id: owner,
                        })
                    }
                    _ => Ok(task),
                }
            })
            .collect()
    }

    fn ensure_no_overlap(
        &self,
        dates: SprintDates,
        excluding: Option<SprintId>,
    ) -> SprintLifecycleResult<()> {
        self.config
            .overlap_validator()
            .validate(dates, &self.sprints, excluding)
            .map_err(|conflict| {
                tracing::warn!(
                    requested = %dates,
                    conflicting_sprint = %conflict.sprint_id,
                    conflicting_dates = %conflict.dates,
                    "sprint dates rejected"
                );
                SprintLifecycleError::from(conflict)
            })
    }

    fn commit(&self, changes: &ChangeSet, operation: &'static str) -> SprintLifecycleResult<()> {
        self.repository.commit(changes).map_err(|err| {
            tracing::warn!(operation, changes = changes.len(), error = %err, "planning commit failed");
            SprintLifecycleError::from(err)
        })
    }

    /// Inserts or replaces a sprint in the cache, keeping start-date order.
    fn cache(&mut self, sprint: Sprint) {
        if let Some(slot) = self
            .sprints
            .iter_mut()
            .find(|cached| cached.id() == sprint.id())
        {
            *slot = sprint;
        } else {
            self.sprints.push(sprint);
        }
        self.sprints
            .sort_by_key(|cached| (cached.start_date(), cached.created_at()));
    }
}

/// Drops repeated identifiers, keeping the first occurrence of each.
fn unique_ids(task_ids: Vec<TaskId>) -> Vec<TaskId> {
    let mut seen = HashSet::with_capacity(task_ids.len());
    task_ids
        .into_iter()
        .filter(|task_id| seen.insert(*task_id))
        .collect()
}

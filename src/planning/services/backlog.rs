//! Service layer for backlog task management.
//!
//! [`BacklogService`] creates tasks, edits their details and toggles
//! completion. It never changes sprint membership; that belongs to
//! [`super::SprintLifecycleService`].

use crate::planning::{
    domain::{PlanningDomainError, Task, TaskId, TaskName, TaskStatus},
    ports::{ChangeSet, PlanningRepository, PlanningRepositoryError, TaskQuery},
};
use chrono::NaiveDate;
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Request payload for creating a backlog task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    name: String,
    description: String,
    due_date: Option<NaiveDate>,
}

impl CreateTaskRequest {
    /// Creates a request for a task called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            due_date: None,
        }
    }

    /// Sets the free-text description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Full replacement of a task's editable details.
///
/// Omitting the due date clears it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTaskDetailsRequest {
    name: String,
    description: String,
    due_date: Option<NaiveDate>,
}

impl UpdateTaskDetailsRequest {
    /// Creates a request renaming the task to `name` with no description or
    /// due date.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            due_date: None,
        }
    }

    /// Sets the replacement description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the replacement due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }
}

/// Service-level errors for backlog operations.
#[derive(Debug, Error)]
pub enum BacklogError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] PlanningDomainError),

    /// No task exists with the given identifier.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] PlanningRepositoryError),
}

/// Result type for backlog service operations.
pub type BacklogResult<T> = Result<T, BacklogError>;

/// Backlog task orchestration service.
#[derive(Clone)]
pub struct BacklogService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> BacklogService<R, C>
where
    R: PlanningRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new backlog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates an open task outside any sprint.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyTaskName`] (wrapped) when the name
    /// is blank, or repository errors.
    pub fn create_task(&self, request: CreateTaskRequest) -> BacklogResult<Task> {
        let name = TaskName::new(request.name)?;
        let task = Task::new(name, &request.description, request.due_date, &*self.clock);

        let mut changes = ChangeSet::new();
        changes.insert_task(task.clone());
        self.repository.commit(&changes)?;

        tracing::info!(task_id = %task.id(), name = %task.name(), "task created");
        Ok(task)
    }

    /// Replaces a task's name, description and due date.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError::TaskNotFound`] for unknown tasks, a domain
    /// error for blank names, or repository errors.
    pub fn update_task_details(
        &self,
        task_id: TaskId,
        request: UpdateTaskDetailsRequest,
    ) -> BacklogResult<Task> {
        let name = TaskName::new(request.name)?;
        let mut task = self.require_task(task_id)?;
        task.update_details(name, &request.description, request.due_date, &*self.clock);

        let mut changes = ChangeSet::new();
        changes.update_task(task.clone());
        self.repository.commit(&changes)?;

        tracing::debug!(task_id = %task_id, "task details updated");
        Ok(task)
    }

    /// Flips a task between done and not done.
    ///
    /// A task leaving done returns to planned when it is in a sprint and to
    /// open otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`BacklogError::TaskNotFound`] for unknown tasks or repository
    /// errors.
    pub fn toggle_completion(&self, task_id: TaskId) -> BacklogResult<Task> {
        let mut task = self.require_task(task_id)?;
        let previous = task.status();
        task.toggle_completion(&*self.clock);

        let mut changes = ChangeSet::new();
        changes.update_task(task.clone());
        self.repository.commit(&changes)?;

        tracing::info!(
            task_id = %task_id,
            from = %previous,
            to = %task.status(),
            "task completion toggled"
        );
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub fn find_task(&self, task_id: TaskId) -> BacklogResult<Option<Task>> {
        Ok(self.repository.find_task(task_id)?)
    }

    /// Lists open tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns repository errors.
    pub fn list_open_tasks(&self) -> BacklogResult<Vec<Task>> {
        Ok(self
            .repository
            .list_tasks(&TaskQuery::all().with_status(TaskStatus::Open))?)
    }

    fn require_task(&self, task_id: TaskId) -> BacklogResult<Task> {
        self.repository
            .find_task(task_id)?
            .ok_or(BacklogError::TaskNotFound(task_id))
    }
}

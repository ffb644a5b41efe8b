//! Backlog task entity.

use super::{
    PlanningDomainError, SprintId, TaskId, TaskStatus,
    transitions::{TaskAction, next_task_status},
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task name, trimmed and guaranteed non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskName(String);

impl TaskName {
    /// Creates a validated task name.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::EmptyTaskName`] when the value is empty
    /// after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, PlanningDomainError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(PlanningDomainError::EmptyTaskName);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for TaskName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for TaskName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Backlog task.
///
/// Status and sprint membership move together: the only ways to change either
/// are the crate-private assignment, unassignment and toggle methods, all of
/// which consult [`next_task_status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    name: TaskName,
    description: String,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    sprint_id: Option<SprintId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted task name.
    pub name: TaskName,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Owning sprint, if any.
    pub sprint_id: Option<SprintId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates an open, unscheduled task.
    #[must_use]
    pub fn new(
        name: TaskName,
        description: &str,
        due_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            name,
            description: description.trim().to_owned(),
            status: TaskStatus::Open,
            due_date,
            sprint_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            name: data.name,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            sprint_id: data.sprint_id,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task name.
    #[must_use]
    pub const fn name(&self) -> &TaskName {
        &self.name
    }

    /// Returns the task description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the task status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the owning sprint, if any.
    #[must_use]
    pub const fn sprint_id(&self) -> Option<SprintId> {
        self.sprint_id
    }

    /// Returns `true` when the task belongs to a sprint.
    #[must_use]
    pub const fn is_in_sprint(&self) -> bool {
        self.sprint_id.is_some()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Makes `sprint_id` the owning sprint.
    pub(crate) fn assign_to(&mut self, sprint_id: SprintId, clock: &impl Clock) {
        self.status = next_task_status(self.status, self.is_in_sprint(), TaskAction::Assign);
        self.sprint_id = Some(sprint_id);
        self.touch(clock);
    }

    /// Clears sprint membership.
    pub(crate) fn unassign(&mut self, clock: &impl Clock) {
        self.status = next_task_status(self.status, self.is_in_sprint(), TaskAction::Unassign);
        self.sprint_id = None;
        self.touch(clock);
    }

    /// Flips completion without changing membership.
    pub(crate) fn toggle_completion(&mut self, clock: &impl Clock) {
        self.status = next_task_status(
            self.status,
            self.is_in_sprint(),
            TaskAction::ToggleCompletion,
        );
        self.touch(clock);
    }

    /// Replaces the editable details of the task.
    pub(crate) fn update_details(
        &mut self,
        name: TaskName,
        description: &str,
        due_date: Option<NaiveDate>,
        clock: &impl Clock,
    ) {
        self.name = name;
        self.description = description.trim().to_owned();
        self.due_date = due_date;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

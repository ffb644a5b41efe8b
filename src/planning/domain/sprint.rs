//! Sprint entity.

use super::{
    PlanningDomainError, SprintDates, SprintId, SprintStatus, TaskId, transitions::SprintAction,
};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Time-boxed sprint and its membership list.
///
/// `task_ids` is the authoritative membership edge; each member task carries
/// the sprint identifier as a denormalized back reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sprint {
    id: SprintId,
    dates: SprintDates,
    status: SprintStatus,
    task_ids: Vec<TaskId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted sprint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedSprintData {
    /// Persisted sprint identifier.
    pub id: SprintId,
    /// Persisted date range.
    pub dates: SprintDates,
    /// Persisted status.
    pub status: SprintStatus,
    /// Member tasks in assignment order.
    pub task_ids: Vec<TaskId>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Sprint {
    /// Creates an empty sprint in [`SprintStatus::Planned`].
    #[must_use]
    pub fn plan(dates: SprintDates, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SprintId::new(),
            dates,
            status: SprintStatus::Planned,
            task_ids: Vec::new(),
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a sprint from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedSprintData) -> Self {
        Self {
            id: data.id,
            dates: data.dates,
            status: data.status,
            task_ids: data.task_ids,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintId {
        self.id
    }

    /// Returns the sprint date range.
    #[must_use]
    pub const fn dates(&self) -> SprintDates {
        self.dates
    }

    /// Returns the first day of the sprint.
    #[must_use]
    pub const fn start_date(&self) -> NaiveDate {
        self.dates.start()
    }

    /// Returns the last day of the sprint.
    #[must_use]
    pub const fn end_date(&self) -> NaiveDate {
        self.dates.end()
    }

    /// Returns the sprint status.
    #[must_use]
    pub const fn status(&self) -> SprintStatus {
        self.status
    }

    /// Returns member task identifiers in assignment order.
    #[must_use]
    pub fn task_ids(&self) -> &[TaskId] {
        &self.task_ids
    }

    /// Returns `true` when `task_id` is a member of this sprint.
    #[must_use]
    pub fn contains_task(&self, task_id: TaskId) -> bool {
        self.task_ids.contains(&task_id)
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

    /// Applies a lifecycle action.
    ///
    /// The sprint is left unchanged when the transition is rejected.
    pub(crate) fn apply(
        &mut self,
        action: SprintAction,
        clock: &impl Clock,
    ) -> Result<(), PlanningDomainError> {
        self.status = self.status.apply(action)?;
        self.touch(clock);
        Ok(())
    }

    /// Replaces dates and membership and resets the sprint to planned.
    pub(crate) fn replan(
        &mut self,
        dates: SprintDates,
        task_ids: Vec<TaskId>,
        clock: &impl Clock,
    ) {
        self.dates = dates;
        self.task_ids = task_ids;
        self.status = SprintAction::Replan.target();
        self.touch(clock);
    }

    /// Appends a member task, ignoring tasks already present.
    pub(crate) fn add_task(&mut self, task_id: TaskId, clock: &impl Clock) {
        if !self.contains_task(task_id) {
            self.task_ids.push(task_id);
            self.touch(clock);
        }
    }

    /// Removes a member task; returns `false` when it was not a member.
    pub(crate) fn remove_task(&mut self, task_id: TaskId, clock: &impl Clock) -> bool {
        let before = self.task_ids.len();
        self.task_ids.retain(|id| *id != task_id);
        let removed = self.task_ids.len() != before;
        if removed {
            self.touch(clock);
        }
        removed
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}

//! Overlap validation for sprint date ranges.

use super::{Sprint, SprintDates, SprintId, SprintStatus};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which stored sprints a candidate range is compared against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapPolicy {
    /// Every stored sprint reserves its dates, completed or not.
    #[default]
    AllSprints,
    /// Completed sprints release their dates.
    IgnoreCompleted,
}

impl OverlapPolicy {
    const fn considers(self, status: SprintStatus) -> bool {
        match self {
            Self::AllSprints => true,
            Self::IgnoreCompleted => !matches!(status, SprintStatus::Completed),
        }
    }
}

/// Stored sprint whose dates collide with a candidate range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("dates overlap sprint {sprint_id} ({dates})")]
pub struct SprintConflict {
    /// Identifier of the conflicting sprint.
    pub sprint_id: SprintId,
    /// Date range of the conflicting sprint.
    pub dates: SprintDates,
}

/// Pure check that a date range does not collide with existing sprints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OverlapValidator {
    policy: OverlapPolicy,
}

impl OverlapValidator {
    /// Creates a validator applying `policy`.
    #[must_use]
    pub const fn new(policy: OverlapPolicy) -> Self {
        Self { policy }
    }

    /// Returns the configured policy.
    #[must_use]
    pub const fn policy(&self) -> OverlapPolicy {
        self.policy
    }

    /// Checks `candidate` against `sprints` in iteration order.
    ///
    /// The sprint identified by `excluding` is skipped so an edited sprint
    /// never conflicts with itself.
    ///
    /// # Errors
    ///
    /// Returns the first [`SprintConflict`] found.
    pub fn validate<'a>(
        &self,
        candidate: SprintDates,
        sprints: impl IntoIterator<Item = &'a Sprint>,
        excluding: Option<SprintId>,
    ) -> Result<(), SprintConflict> {
        sprints
            .into_iter()
            .filter(|sprint| Some(sprint.id()) != excluding)
            .filter(|sprint| self.policy.considers(sprint.status()))
            .find(|sprint| candidate.overlaps(sprint.dates()))
            .map_or(Ok(()), |sprint| {
                Err(SprintConflict {
                    sprint_id: sprint.id(),
                    dates: sprint.dates(),
                })
            })
    }
}

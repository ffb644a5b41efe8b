//! Status state machines for tasks and sprints.
//!
//! Every status change in the planning domain is computed here. Task status
//! is coupled to sprint membership: assignment, unassignment and the manual
//! completion toggle each consult the same table, so call sites never branch
//! on status themselves.

use super::{PlanningDomainError, SprintStatus, TaskStatus};

/// Membership or completion event applied to a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskAction {
    /// The task joins a sprint.
    Assign,
    /// The task leaves its sprint, or the sprint is deleted.
    Unassign,
    /// The user marks the task complete or incomplete.
    ToggleCompletion,
}

/// Computes the status a task moves to when `action` is applied.
///
/// `in_sprint` describes membership before the action. Completed tasks keep
/// their status across membership changes; only the toggle reopens them.
#[must_use]
pub const fn next_task_status(
    current: TaskStatus,
    in_sprint: bool,
    action: TaskAction,
) -> TaskStatus {
    match (action, current, in_sprint) {
        (TaskAction::Assign | TaskAction::Unassign, TaskStatus::Done, _) => TaskStatus::Done,
        (TaskAction::Assign, TaskStatus::Open | TaskStatus::Planned, _) => TaskStatus::Planned,
        (TaskAction::Unassign, TaskStatus::Open | TaskStatus::Planned, _) => TaskStatus::Open,
        (TaskAction::ToggleCompletion, TaskStatus::Done, true) => TaskStatus::Planned,
        (TaskAction::ToggleCompletion, TaskStatus::Done, false) => TaskStatus::Open,
        (TaskAction::ToggleCompletion, TaskStatus::Open | TaskStatus::Planned, _) => {
            TaskStatus::Done
        }
    }
}

/// Lifecycle event applied to a sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SprintAction {
    /// Begin a planned sprint.
    Start,
    /// Return an active sprint to planning.
    Stop,
    /// Finish a planned or active sprint.
    Complete,
    /// Reset after the sprint's dates or tasks were edited.
    Replan,
}

impl SprintAction {
    /// Returns the user action that moves a sprint towards `target`.
    ///
    /// Reaching [`SprintStatus::Planned`] by request means stopping; the
    /// re-planning reset is reserved for edits.
    #[must_use]
    pub const fn towards(target: SprintStatus) -> Self {
        match target {
            SprintStatus::Planned => Self::Stop,
            SprintStatus::Active => Self::Start,
            SprintStatus::Completed => Self::Complete,
        }
    }

    /// Returns the status this action leads to when permitted.
    #[must_use]
    pub const fn target(self) -> SprintStatus {
        match self {
            Self::Start => SprintStatus::Active,
            Self::Stop | Self::Replan => SprintStatus::Planned,
            Self::Complete => SprintStatus::Completed,
        }
    }
}

impl SprintStatus {
    /// Applies `action` and returns the resulting status.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::InvalidSprintTransition`] when the
    /// action is not permitted from the current status.
    pub const fn apply(self, action: SprintAction) -> Result<Self, PlanningDomainError> {
        match (self, action) {
            (Self::Planned, SprintAction::Start) => Ok(Self::Active),
            (Self::Active, SprintAction::Stop) => Ok(Self::Planned),
            (Self::Planned | Self::Active, SprintAction::Complete) => Ok(Self::Completed),
            (_, SprintAction::Replan) => Ok(Self::Planned),
            (from, rejected) => Err(PlanningDomainError::InvalidSprintTransition {
                from,
                to: rejected.target(),
            }),
        }
    }
}

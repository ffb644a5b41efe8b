//! Error types for planning domain validation and parsing.

use super::SprintStatus;
use chrono::NaiveDate;
use thiserror::Error;

/// Errors returned while constructing or mutating planning domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PlanningDomainError {
    /// The sprint start date is not strictly before its end date.
    #[error("invalid sprint date range: {start} must be before {end}")]
    InvalidDateRange {
        /// Requested start date.
        start: NaiveDate,
        /// Requested end date.
        end: NaiveDate,
    },

    /// The task name is empty after trimming.
    #[error("task name must not be empty")]
    EmptyTaskName,

    /// The sprint state machine does not permit the requested change.
    #[error("invalid sprint status transition: {from} -> {to}")]
    InvalidSprintTransition {
        /// Current sprint status.
        from: SprintStatus,
        /// Requested sprint status.
        to: SprintStatus,
    },
}

/// Error returned while parsing task statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing sprint statuses from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown sprint status: {0}")]
pub struct ParseSprintStatusError(pub String);

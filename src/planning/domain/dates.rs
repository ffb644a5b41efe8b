//! Validated sprint date ranges.

use super::PlanningDomainError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive calendar date range covered by a sprint.
///
/// The start date is always strictly before the end date; both boundary days
/// belong to the sprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SprintDates {
    start: NaiveDate,
    end: NaiveDate,
}

impl SprintDates {
    /// Creates a validated date range.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningDomainError::InvalidDateRange`] when `start` is not
    /// strictly before `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, PlanningDomainError> {
        if start >= end {
            return Err(PlanningDomainError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// Returns the first day of the range.
    #[must_use]
    pub const fn start(self) -> NaiveDate {
        self.start
    }

    /// Returns the last day of the range.
    #[must_use]
    pub const fn end(self) -> NaiveDate {
        self.end
    }

    /// Returns `true` when both ranges share at least one calendar day.
    ///
    /// Boundaries are inclusive, so a range ending on the day another starts
    /// overlaps it.
    #[must_use]
    pub fn overlaps(self, other: Self) -> bool {
        self.start <= other.end && self.end >= other.start
    }

    /// Returns `true` when `day` falls within the range.
    #[must_use]
    pub fn contains(self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }

    /// Returns `true` when the last day of the range is before `day`.
    #[must_use]
    pub fn ended_before(self, day: NaiveDate) -> bool {
        self.end < day
    }

    /// Whole days from `today` until the end date, or zero once it has passed.
    #[must_use]
    pub fn days_remaining(self, today: NaiveDate) -> u64 {
        u64::try_from((self.end - today).num_days()).unwrap_or(0)
    }
}

impl fmt::Display for SprintDates {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

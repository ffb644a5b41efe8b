//! Configuration for planning services.

use crate::planning::domain::{OverlapPolicy, OverlapValidator};
use chrono::NaiveDate;
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Time zone used to turn the clock's instant into "today".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalendarZone {
    /// The host's local time zone.
    #[default]
    Local,
    /// Coordinated Universal Time.
    Utc,
}

/// Tunable behaviour of the planning services.
///
/// # Examples
///
/// ```
/// use nexdo::planning::config::{CalendarZone, PlanningConfig};
/// use nexdo::planning::domain::OverlapPolicy;
///
/// let config = PlanningConfig::default();
/// assert_eq!(config.overlap_policy, OverlapPolicy::AllSprints);
///
/// let relaxed = PlanningConfig::default()
///     .with_overlap_policy(OverlapPolicy::IgnoreCompleted)
///     .with_calendar(CalendarZone::Utc);
/// assert_eq!(relaxed.calendar, CalendarZone::Utc);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanningConfig {
    /// Which stored sprints reserve their dates against new or edited ones.
    pub overlap_policy: OverlapPolicy,
    /// Zone deciding the current calendar day.
    pub calendar: CalendarZone,
}

impl PlanningConfig {
    /// Sets the overlap policy.
    #[must_use]
    pub const fn with_overlap_policy(mut self, overlap_policy: OverlapPolicy) -> Self {
        self.overlap_policy = overlap_policy;
        self
    }

    /// Sets the calendar zone.
    #[must_use]
    pub const fn with_calendar(mut self, calendar: CalendarZone) -> Self {
        self.calendar = calendar;
        self
    }

    /// Returns the validator matching the configured overlap policy.
    #[must_use]
    pub const fn overlap_validator(&self) -> OverlapValidator {
        OverlapValidator::new(self.overlap_policy)
    }

    /// Returns the current calendar day according to `clock`.
    #[must_use]
    pub fn today(&self, clock: &impl Clock) -> NaiveDate {
        match self.calendar {
            CalendarZone::Local => clock.local().date_naive(),
            CalendarZone::Utc => clock.utc().date_naive(),
        }
    }
}

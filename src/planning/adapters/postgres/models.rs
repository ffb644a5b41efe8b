//! Diesel row models for planning persistence.

use super::schema::{sprint_tasks, sprints, tasks};
use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

/// Row model for task records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Trimmed task name.
    pub name: String,
    /// Trimmed task description.
    pub description: String,
    /// Task status.
    pub status: String,
    /// Optional due date.
    pub due_date: Option<NaiveDate>,
    /// Owning sprint, if any.
    pub sprint_id: Option<uuid::Uuid>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for sprint records.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = sprints)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SprintRow {
    /// Sprint identifier.
    pub id: uuid::Uuid,
    /// First day of the sprint.
    pub start_date: NaiveDate,
    /// Last day of the sprint.
    pub end_date: NaiveDate,
    /// Sprint status.
    pub status: String,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Row model for sprint membership.
#[derive(Debug, Clone, PartialEq, Eq, Queryable, Selectable, Insertable)]
#[diesel(table_name = sprint_tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SprintTaskRow {
    /// Member task.
    pub task_id: uuid::Uuid,
    /// Owning sprint.
    pub sprint_id: uuid::Uuid,
    /// Zero-based position within the sprint.
    pub position: i32,
}

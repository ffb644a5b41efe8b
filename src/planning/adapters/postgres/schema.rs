//! Diesel schema for planning persistence.

diesel::table! {
    /// Backlog task records.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Trimmed task name.
        name -> Text,
        /// Trimmed task description.
        description -> Text,
        /// Task status.
        #[max_length = 20]
        status -> Varchar,
        /// Optional due date.
        due_date -> Nullable<Date>,
        /// Owning sprint, if any.
        sprint_id -> Nullable<Uuid>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sprint records.
    sprints (id) {
        /// Sprint identifier.
        id -> Uuid,
        /// First day of the sprint.
        start_date -> Date,
        /// Last day of the sprint.
        end_date -> Date,
        /// Sprint status.
        #[max_length = 20]
        status -> Varchar,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Sprint membership rows in assignment order.
    sprint_tasks (task_id) {
        /// Member task.
        task_id -> Uuid,
        /// Owning sprint.
        sprint_id -> Uuid,
        /// Zero-based position within the sprint.
        position -> Int4,
    }
}

//! `PostgreSQL` repository implementation for planning storage.

use super::{
    conversion::{row_to_task, rows_to_sprint, sprint_to_rows, task_to_row},
    models::{SprintRow, SprintTaskRow, TaskRow},
    schema::{sprint_tasks, sprints, tasks},
};
use crate::planning::{
    domain::{Sprint, SprintId, Task, TaskId},
    ports::{
        ChangeSet, PlanningChange, PlanningRepository, PlanningRepositoryError,
        PlanningRepositoryResult, TaskQuery,
    },
};
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use std::collections::HashMap;

/// `PostgreSQL` connection pool type used by planning adapters.
pub type PlanningPgPool = Pool<ConnectionManager<PgConnection>>;

/// `PostgreSQL`-backed planning repository.
///
/// Each [`ChangeSet`] is applied inside one database transaction.
#[derive(Debug, Clone)]
pub struct PostgresPlanningRepository {
    pool: PlanningPgPool,
}

impl PostgresPlanningRepository {
    /// Creates a new repository from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: PlanningPgPool) -> Self {
        Self { pool }
    }

    fn with_connection<F, T>(&self, f: F) -> PlanningRepositoryResult<T>
    where
        F: FnOnce(&mut PgConnection) -> PlanningRepositoryResult<T>,
    {
        let mut connection = self
            .pool
            .get()
            .map_err(PlanningRepositoryError::persistence)?;
        f(&mut connection)
    }
}

impl From<DieselError> for PlanningRepositoryError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

impl PlanningRepository for PostgresPlanningRepository {
    fn find_task(&self, id: TaskId) -> PlanningRepositoryResult<Option<Task>> {
        self.with_connection(|connection| {
            let row = tasks::table
                .find(id.into_inner())
                .select(TaskRow::as_select())
                .first::<TaskRow>(connection)
                .optional()?;
            row.map(row_to_task).transpose()
        })
    }

    fn find_sprint(&self, id: SprintId) -> PlanningRepositoryResult<Option<Sprint>> {
        self.with_connection(|connection| {
            let Some(row) = sprints::table
                .find(id.into_inner())
                .select(SprintRow::as_select())
                .first::<SprintRow>(connection)
                .optional()?
            else {
                return Ok(None);
            };
            let membership = sprint_tasks::table
                .filter(sprint_tasks::sprint_id.eq(id.into_inner()))
                .select(SprintTaskRow::as_select())
                .load::<SprintTaskRow>(connection)?;
            rows_to_sprint(row, membership).map(Some)
        })
    }

    fn list_sprints(&self) -> PlanningRepositoryResult<Vec<Sprint>> {
        self.with_connection(|connection| {
            let rows = sprints::table
                .order((sprints::start_date.asc(), sprints::created_at.asc()))
                .select(SprintRow::as_select())
                .load::<SprintRow>(connection)?;
            let mut membership_by_sprint: HashMap<uuid::Uuid, Vec<SprintTaskRow>> =
                HashMap::new();
            for member in sprint_tasks::table
                .select(SprintTaskRow::as_select())
                .load::<SprintTaskRow>(connection)?
            {
                membership_by_sprint
                    .entry(member.sprint_id)
                    .or_default()
                    .push(member);
            }
            rows.into_iter()
                .map(|row| {
                    let membership = membership_by_sprint.remove(&row.id).unwrap_or_default();
                    rows_to_sprint(row, membership)
                })
                .collect()
        })
    }

    fn list_tasks(&self, query: &TaskQuery) -> PlanningRepositoryResult<Vec<Task>> {
        self.with_connection(|connection| {
            let mut statement = tasks::table.select(TaskRow::as_select()).into_boxed();
            if let Some(status) = query.status() {
                statement = statement.filter(tasks::status.eq(status.as_str()));
            }
            if let Some(sprint_id) = query.sprint_id() {
                statement = statement.filter(tasks::sprint_id.eq(sprint_id.into_inner()));
            }
            let rows = statement
                .order((tasks::created_at.asc(), tasks::id.asc()))
                .load::<TaskRow>(connection)?;
            let mut found = rows
                .into_iter()
                .map(row_to_task)
                .collect::<PlanningRepositoryResult<Vec<_>>>()?;
            query.order().sort(&mut found);
            Ok(found)
        })
    }

    fn commit(&self, changes: &ChangeSet) -> PlanningRepositoryResult<()> {
        self.with_connection(|connection| {
            connection.transaction::<_, PlanningRepositoryError, _>(|tx_connection| {
                for change in changes.changes() {
                    apply_change(tx_connection, change)?;
                }
                Ok(())
            })
        })
    }
}

fn apply_change(
    connection: &mut PgConnection,
    change: &PlanningChange,
) -> PlanningRepositoryResult<()> {
    match change {
        PlanningChange::InsertTask(task) => insert_task(connection, task),
        PlanningChange::UpdateTask(task) => update_task(connection, task),
        PlanningChange::DeleteTask(id) => {
            let deleted = diesel::delete(tasks::table.find(id.into_inner())).execute(connection)?;
            ensure_affected(deleted, PlanningRepositoryError::TaskNotFound(*id))
        }
        PlanningChange::InsertSprint(sprint) => insert_sprint(connection, sprint),
        PlanningChange::UpdateSprint(sprint) => update_sprint(connection, sprint),
        PlanningChange::DeleteSprint(id) => {
            let sprint_uuid = id.into_inner();
            diesel::delete(sprint_tasks::table.filter(sprint_tasks::sprint_id.eq(sprint_uuid)))
                .execute(connection)?;
            let deleted = diesel::delete(sprints::table.find(sprint_uuid)).execute(connection)?;
            ensure_affected(deleted, PlanningRepositoryError::SprintNotFound(*id))
        }
    }
}

fn ensure_affected(rows: usize, missing: PlanningRepositoryError) -> PlanningRepositoryResult<()> {
    if rows == 0 {
        return Err(missing);
    }
    Ok(())
}

fn insert_task(connection: &mut PgConnection, task: &Task) -> PlanningRepositoryResult<()> {
    diesel::insert_into(tasks::table)
        .values(&task_to_row(task))
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PlanningRepositoryError::DuplicateTask(task.id())
            }
            _ => PlanningRepositoryError::persistence(err),
        })?;
    Ok(())
}

fn update_task(connection: &mut PgConnection, task: &Task) -> PlanningRepositoryResult<()> {
    let row = task_to_row(task);
    let updated = diesel::update(tasks::table.find(row.id))
        .set((
            tasks::name.eq(row.name),
            tasks::description.eq(row.description),
            tasks::status.eq(row.status),
            tasks::due_date.eq(row.due_date),
            tasks::sprint_id.eq(row.sprint_id),
            tasks::updated_at.eq(row.updated_at),
        ))
        .execute(connection)?;
    ensure_affected(updated, PlanningRepositoryError::TaskNotFound(task.id()))
}

fn insert_sprint(connection: &mut PgConnection, sprint: &Sprint) -> PlanningRepositoryResult<()> {
    let (row, membership) = sprint_to_rows(sprint)?;
    diesel::insert_into(sprints::table)
        .values(&row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                PlanningRepositoryError::DuplicateSprint(sprint.id())
            }
            _ => PlanningRepositoryError::persistence(err),
        })?;
    insert_membership(connection, &membership)
}

fn update_sprint(connection: &mut PgConnection, sprint: &Sprint) -> PlanningRepositoryResult<()> {
    let (row, membership) = sprint_to_rows(sprint)?;
    let updated = diesel::update(sprints::table.find(row.id))
        .set((
            sprints::start_date.eq(row.start_date),
            sprints::end_date.eq(row.end_date),
            sprints::status.eq(row.status),
            sprints::updated_at.eq(row.updated_at),
        ))
        .execute(connection)?;
    ensure_affected(updated, PlanningRepositoryError::SprintNotFound(sprint.id()))?;

    diesel::delete(sprint_tasks::table.filter(sprint_tasks::sprint_id.eq(row.id)))
        .execute(connection)?;
    insert_membership(connection, &membership)
}

/// Inserts membership rows one at a time so a primary-key clash names the
/// task that already belongs to another sprint.
fn insert_membership(
    connection: &mut PgConnection,
    membership: &[SprintTaskRow],
) -> PlanningRepositoryResult<()> {
    for member in membership {
        diesel::insert_into(sprint_tasks::table)
            .values(member)
            .execute(connection)
            .map_err(|err| match err {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    PlanningRepositoryError::MembershipConflict {
                        task_id: TaskId::from_uuid(member.task_id),
                    }
                }
                DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, _) => {
                    PlanningRepositoryError::TaskNotFound(TaskId::from_uuid(member.task_id))
                }
                _ => PlanningRepositoryError::persistence(err),
            })?;
    }
    Ok(())
}

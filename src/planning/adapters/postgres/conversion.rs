//! Conversions between planning domain values and Diesel rows.

use super::models::{SprintRow, SprintTaskRow, TaskRow};
use crate::planning::{
    domain::{
        PersistedSprintData, PersistedTaskData, Sprint, SprintDates, SprintId, SprintStatus,
        Task, TaskId, TaskName, TaskStatus,
    },
    ports::{PlanningRepositoryError, PlanningRepositoryResult},
};

/// Builds the row stored for `task`.
pub(crate) fn task_to_row(task: &Task) -> TaskRow {
    TaskRow {
        id: task.id().into_inner(),
        name: task.name().as_str().to_owned(),
        description: task.description().to_owned(),
        status: task.status().as_str().to_owned(),
        due_date: task.due_date(),
        sprint_id: task.sprint_id().map(SprintId::into_inner),
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    }
}

/// Rebuilds a task from its stored row.
pub(crate) fn row_to_task(row: TaskRow) -> PlanningRepositoryResult<Task> {
    let TaskRow {
        id,
        name,
        description,
        status,
        due_date,
        sprint_id,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        name: TaskName::new(name).map_err(PlanningRepositoryError::persistence)?,
        description,
        status: TaskStatus::try_from(status.as_str())
            .map_err(PlanningRepositoryError::persistence)?,
        due_date,
        sprint_id: sprint_id.map(SprintId::from_uuid),
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

/// Builds the sprint row and its membership rows.
pub(crate) fn sprint_to_rows(
    sprint: &Sprint,
) -> PlanningRepositoryResult<(SprintRow, Vec<SprintTaskRow>)> {
    let sprint_row = SprintRow {
        id: sprint.id().into_inner(),
        start_date: sprint.start_date(),
        end_date: sprint.end_date(),
        status: sprint.status().as_str().to_owned(),
        created_at: sprint.created_at(),
        updated_at: sprint.updated_at(),
    };
    let membership = sprint
        .task_ids()
        .iter()
        .enumerate()
        .map(|(index, task_id)| {
            let position = i32::try_from(index).map_err(PlanningRepositoryError::persistence)?;
            Ok(SprintTaskRow {
                task_id: task_id.into_inner(),
                sprint_id: sprint.id().into_inner(),
                position,
            })
        })
        .collect::<PlanningRepositoryResult<Vec<_>>>()?;
    Ok((sprint_row, membership))
}

/// Rebuilds a sprint from its row and membership rows in any order.
pub(crate) fn rows_to_sprint(
    row: SprintRow,
    mut membership: Vec<SprintTaskRow>,
) -> PlanningRepositoryResult<Sprint> {
    let SprintRow {
        id,
        start_date,
        end_date,
        status,
        created_at,
        updated_at,
    } = row;

    membership.sort_by_key(|member| member.position);
    let data = PersistedSprintData {
        id: SprintId::from_uuid(id),
        dates: SprintDates::new(start_date, end_date)
            .map_err(PlanningRepositoryError::persistence)?,
        status: SprintStatus::try_from(status.as_str())
            .map_err(PlanningRepositoryError::persistence)?,
        task_ids: membership
            .into_iter()
            .map(|member| TaskId::from_uuid(member.task_id))
            .collect(),
        created_at,
        updated_at,
    };
    Ok(Sprint::from_persisted(data))
}

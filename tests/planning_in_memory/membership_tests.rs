//! Task status while joining and leaving sprints.

use super::helpers::{Planner, day, setup};
use eyre::ensure;
use nexdo::planning::{
    domain::TaskStatus,
    services::{CreateSprintRequest, EditSprintRequest},
};
use rstest::rstest;

#[rstest]
#[case(false, TaskStatus::Open)]
#[case(true, TaskStatus::Done)]
fn assign_then_unassign_restores_prior_status(
    setup: eyre::Result<Planner>,
    #[case] completed_first: bool,
    #[case] prior: TaskStatus,
) -> eyre::Result<()> {
    let mut planner = setup?;
    let [task_id] = planner.add_tasks(["Round trip"])?;
    if completed_first {
        planner.backlog.toggle_completion(task_id)?;
    }
    ensure!(planner.task(task_id)?.status() == prior);

    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(1), day(7)).with_tasks([task_id]))?;
    planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(sprint.id(), day(1), day(7)))?;

    let task = planner.task(task_id)?;
    ensure!(task.status() == prior);
    ensure!(task.sprint_id().is_none());
    Ok(())
}

#[rstest]
fn task_reference_mirrors_sprint_membership(setup: eyre::Result<Planner>) -> eyre::Result<()> {
    let mut planner = setup?;
    let [first, second] = planner.add_tasks(["first", "second"])?;
    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(1), day(7)).with_tasks([first]))?;
    planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(sprint.id(), day(1), day(7)).with_tasks([second]))?;

    for task_id in [first, second] {
        let task = planner.task(task_id)?;
        let listed = planner
            .lifecycle
            .sprints()
            .iter()
            .find(|candidate| candidate.contains_task(task_id))
            .map(|owner| owner.id());
        ensure!(task.sprint_id() == listed);
    }
    Ok(())
}

#[rstest]
fn task_moves_between_sprints_only_after_release(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    let [task_id] = planner.add_tasks(["Mover"])?;
    let first = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(1), day(7)).with_tasks([task_id]))?;
    let second = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(8), day(14)))?;

    let blocked = planner.lifecycle.edit_sprint(
        EditSprintRequest::new(second.id(), day(8), day(14)).with_tasks([task_id]),
    );
    ensure!(blocked.is_err());

    planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(first.id(), day(1), day(7)))?;
    planner.lifecycle.edit_sprint(
        EditSprintRequest::new(second.id(), day(8), day(14)).with_tasks([task_id]),
    )?;

    let task = planner.task(task_id)?;
    ensure!(task.sprint_id() == Some(second.id()));
    ensure!(task.status() == TaskStatus::Planned);
    Ok(())
}

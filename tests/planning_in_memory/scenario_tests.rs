//! End-to-end planning walkthroughs.

use std::sync::Arc;

use super::helpers::{Planner, day, setup};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use nexdo::planning::{
    config::PlanningConfig,
    domain::{SprintStatus, TaskStatus},
    ports::PlanningRepository,
    services::{
        CreateSprintRequest, EditSprintRequest, SprintLifecycleError, SprintLifecycleService,
    },
};
use rstest::rstest;

#[rstest]
fn overlapping_sprint_is_rejected_with_conflicting_dates(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(0), day(6)))?;

    match planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(4), day(9)))
    {
        Err(SprintLifecycleError::OverlappingDates { start, end }) => {
            ensure!((start, end) == (day(0), day(6)));
        }
        other => bail!("expected OverlappingDates, got {other:?}"),
    }
    Ok(())
}

#[rstest]
fn deleting_sprint_releases_its_tasks(setup: eyre::Result<Planner>) -> eyre::Result<()> {
    let mut planner = setup?;
    let [task_id] = planner.add_tasks(["T1"])?;
    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(0), day(6)).with_tasks([task_id]))?;
    let assigned = planner.task(task_id)?;
    ensure!(assigned.status() == TaskStatus::Planned);
    ensure!(assigned.sprint_id() == Some(sprint.id()));

    planner.lifecycle.delete_sprint(sprint.id())?;

    let released = planner.task(task_id)?;
    ensure!(released.status() == TaskStatus::Open);
    ensure!(released.sprint_id().is_none());
    Ok(())
}

#[rstest]
fn completed_task_survives_assignment_and_release(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    let [task_id] = planner.add_tasks(["T2"])?;
    ensure!(planner.task(task_id)?.status() == TaskStatus::Open);
    ensure!(planner.backlog.toggle_completion(task_id)?.status() == TaskStatus::Done);

    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(0), day(6)).with_tasks([task_id]))?;
    ensure!(planner.task(task_id)?.status() == TaskStatus::Done);

    planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(sprint.id(), day(0), day(6)))?;
    ensure!(planner.task(task_id)?.status() == TaskStatus::Done);
    Ok(())
}

#[rstest]
fn expired_active_sprint_is_completed_at_start_up(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(-6), day(-1)))?;
    planner.lifecycle.start_sprint(sprint.id())?;

    let restarted = SprintLifecycleService::start_up(
        Arc::clone(&planner.repository),
        Arc::new(DefaultClock),
        PlanningConfig::default(),
    )?;

    let stored = planner
        .repository
        .find_sprint(sprint.id())?
        .ok_or_else(|| eyre::eyre!("sprint should still be stored"))?;
    ensure!(stored.status() == SprintStatus::Completed);
    ensure!(restarted.sprint(sprint.id()) == Some(&stored));
    ensure!(restarted.current_sprint().is_none());
    Ok(())
}

#[rstest]
fn editing_membership_updates_only_changed_tasks(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    let [t1, t2, t3] = planner.add_tasks(["T1", "T2", "T3"])?;
    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(0), day(6)).with_tasks([t1, t2]))?;
    let t2_before = planner.task(t2)?;

    planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(sprint.id(), day(0), day(6)).with_tasks([t2, t3]))?;

    let removed = planner.task(t1)?;
    ensure!(removed.status() == TaskStatus::Open && removed.sprint_id().is_none());
    let added = planner.task(t3)?;
    ensure!(added.status() == TaskStatus::Planned && added.sprint_id() == Some(sprint.id()));
    ensure!(planner.task(t2)? == t2_before);
    Ok(())
}

#[rstest]
fn running_the_sweep_twice_changes_nothing_more(
    setup: eyre::Result<Planner>,
) -> eyre::Result<()> {
    let mut planner = setup?;
    planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(-9), day(-4)))?;
    planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(-3), day(3)))?;

    planner.lifecycle.mark_expired_sprints_completed()?;
    let once = planner.repository.list_sprints()?;
    let again = planner.lifecycle.mark_expired_sprints_completed()?;

    ensure!(again.is_empty());
    ensure!(planner.repository.list_sprints()? == once);
    Ok(())
}

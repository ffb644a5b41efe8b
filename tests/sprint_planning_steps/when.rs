//! When steps for sprint planning BDD scenarios.

use std::sync::Arc;

use super::world::{SprintPlanningWorld, day, offset};
use eyre::WrapErr;
use mockable::DefaultClock;
use nexdo::planning::{
    config::PlanningConfig,
    services::{CreateSprintRequest, EditSprintRequest, SprintLifecycleService},
};
use rstest_bdd_macros::when;

#[when(r#"a sprint "{label}" is requested from {start:u64} to {end:u64} days from today"#)]
fn sprint_requested(
    world: &mut SprintPlanningWorld,
    label: String,
    start: u64,
    end: u64,
) -> Result<(), eyre::Report> {
    let request = CreateSprintRequest::new(day(offset(start)?), day(offset(end)?));
    let result = world.lifecycle.create_sprint(request);
    if let Ok(ref created) = result {
        world.sprints.insert(label, created.id());
    }
    world.last_sprint_result = Some(result);
    Ok(())
}

#[when(r#"the sprint "{label}" is deleted"#)]
fn sprint_deleted(world: &mut SprintPlanningWorld, label: String) -> Result<(), eyre::Report> {
    let sprint_id = world.sprint_id(&label)?;
    world
        .lifecycle
        .delete_sprint(sprint_id)
        .wrap_err("delete sprint")?;
    Ok(())
}

#[when(r#"the task "{name}" is removed from sprint "{label}""#)]
fn task_removed(
    world: &mut SprintPlanningWorld,
    name: String,
    label: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&name)?;
    let sprint = world.sprint(&label)?;
    let remaining: Vec<_> = sprint
        .task_ids()
        .iter()
        .copied()
        .filter(|member| *member != task_id)
        .collect();
    let request = EditSprintRequest::new(sprint.id(), sprint.start_date(), sprint.end_date())
        .with_tasks(remaining);
    world.last_sprint_result = Some(world.lifecycle.edit_sprint(request));
    Ok(())
}

#[when(r#"the sprint "{label}" is re-planned with tasks "{first}" and "{second}""#)]
fn sprint_replanned(
    world: &mut SprintPlanningWorld,
    label: String,
    first: String,
    second: String,
) -> Result<(), eyre::Report> {
    let tasks = [world.task_id(&first)?, world.task_id(&second)?];
    let sprint = world.sprint(&label)?;
    let request = EditSprintRequest::new(sprint.id(), sprint.start_date(), sprint.end_date())
        .with_tasks(tasks);
    world.last_sprint_result = Some(world.lifecycle.edit_sprint(request));
    Ok(())
}

#[when("the planner starts up")]
fn planner_starts_up(world: &mut SprintPlanningWorld) -> Result<(), eyre::Report> {
    world.lifecycle = SprintLifecycleService::start_up(
        Arc::clone(&world.repository),
        Arc::new(DefaultClock),
        PlanningConfig::default(),
    )
    .wrap_err("start planner")?;
    Ok(())
}

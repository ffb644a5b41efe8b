//! Given steps for sprint planning BDD scenarios.

use super::world::{SprintPlanningWorld, day, offset};
use eyre::WrapErr;
use nexdo::planning::services::{CreateSprintRequest, CreateTaskRequest, EditSprintRequest};
use rstest_bdd_macros::given;

#[given(r#"a task named "{name}""#)]
fn task_named(world: &mut SprintPlanningWorld, name: String) -> Result<(), eyre::Report> {
    let task = world
        .backlog
        .create_task(CreateTaskRequest::new(name.clone()))
        .wrap_err("create backlog task")?;
    world.tasks.insert(name, task.id());
    Ok(())
}

#[given(r#"the task "{name}" is marked done"#)]
fn task_marked_done(world: &mut SprintPlanningWorld, name: String) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&name)?;
    world
        .backlog
        .toggle_completion(task_id)
        .wrap_err("mark task done")?;
    Ok(())
}

#[given(r#"a sprint "{label}" starting in {start:u64} days and ending in {end:u64} days"#)]
fn sprint_between(
    world: &mut SprintPlanningWorld,
    label: String,
    start: u64,
    end: u64,
) -> Result<(), eyre::Report> {
    let request = CreateSprintRequest::new(day(offset(start)?), day(offset(end)?));
    let sprint = world
        .lifecycle
        .create_sprint(request)
        .wrap_err("create sprint in scenario setup")?;
    world.sprints.insert(label, sprint.id());
    Ok(())
}

#[given(r#"task "{name}" is planned into sprint "{label}""#)]
fn task_planned_into(
    world: &mut SprintPlanningWorld,
    name: String,
    label: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&name)?;
    let sprint = world.sprint(&label)?;
    let request = EditSprintRequest::new(sprint.id(), sprint.start_date(), sprint.end_date())
        .with_tasks(sprint.task_ids().iter().copied().chain([task_id]));
    world
        .lifecycle
        .edit_sprint(request)
        .wrap_err("plan task into sprint")?;
    Ok(())
}

#[given(r#"an active sprint "{label}" that ended {ago:u64} days ago"#)]
fn active_sprint_ended(
    world: &mut SprintPlanningWorld,
    label: String,
    ago: u64,
) -> Result<(), eyre::Report> {
    let end = day(-offset(ago)?);
    let start = end - chrono::Duration::days(6);
    let sprint = world
        .lifecycle
        .create_sprint(CreateSprintRequest::new(start, end))
        .wrap_err("create past sprint")?;
    world
        .lifecycle
        .start_sprint(sprint.id())
        .wrap_err("start past sprint")?;
    world.sprints.insert(label, sprint.id());
    Ok(())
}

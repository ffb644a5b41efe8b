//! Then steps for sprint planning BDD scenarios.

use super::world::SprintPlanningWorld;
use nexdo::planning::{
    domain::{SprintStatus, TaskStatus},
    services::SprintLifecycleError,
};
use rstest_bdd_macros::then;

#[then(r#"the request is rejected as overlapping sprint "{label}""#)]
fn rejected_as_overlapping(
    world: &SprintPlanningWorld,
    label: String,
) -> Result<(), eyre::Report> {
    let existing = world.sprint(&label)?;
    let result = world
        .last_sprint_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sprint request result"))?;

    match result {
        Err(SprintLifecycleError::OverlappingDates { start, end })
            if *start == existing.start_date() && *end == existing.end_date() =>
        {
            Ok(())
        }
        other => Err(eyre::eyre!(
            "expected overlap with {}, got {other:?}",
            existing.dates()
        )),
    }
}

#[then(r#"the task "{name}" has status "{status}""#)]
fn task_has_status(
    world: &SprintPlanningWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = TaskStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let task = world.task(&name)?;

    if task.status() != expected {
        return Err(eyre::eyre!(
            "expected task {name} to be {expected}, found {}",
            task.status()
        ));
    }
    Ok(())
}

#[then(r#"the task "{name}" belongs to no sprint"#)]
fn task_in_no_sprint(world: &SprintPlanningWorld, name: String) -> Result<(), eyre::Report> {
    let task = world.task(&name)?;
    if let Some(sprint_id) = task.sprint_id() {
        return Err(eyre::eyre!("task {name} still belongs to sprint {sprint_id}"));
    }
    Ok(())
}

#[then(r#"the task "{name}" belongs to sprint "{label}""#)]
fn task_in_sprint(
    world: &SprintPlanningWorld,
    name: String,
    label: String,
) -> Result<(), eyre::Report> {
    let task = world.task(&name)?;
    let sprint = world.sprint(&label)?;

    if task.sprint_id() != Some(sprint.id()) || !sprint.contains_task(task.id()) {
        return Err(eyre::eyre!("task {name} is not a member of sprint {label}"));
    }
    Ok(())
}

#[then(r#"the sprint "{label}" has status "{status}""#)]
fn sprint_has_status(
    world: &SprintPlanningWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let expected = SprintStatus::try_from(status.as_str())
        .map_err(|err| eyre::eyre!("invalid expected status in scenario: {err}"))?;
    let sprint = world.sprint(&label)?;

    if sprint.status() != expected {
        return Err(eyre::eyre!(
            "expected sprint {label} to be {expected}, found {}",
            sprint.status()
        ));
    }
    Ok(())
}

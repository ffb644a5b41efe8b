//! Overlap rules for sprint creation and editing.

use super::helpers::{Planner, day, setup};
use eyre::ensure;
use nexdo::planning::{
    domain::SprintStatus,
    services::{CreateSprintRequest, EditSprintRequest, SprintLifecycleError},
};
use rstest::rstest;

/// Sprint A always covers days 0 to 4; B varies.
#[rstest]
#[case(4, 8)]
#[case(-4, 0)]
#[case(1, 2)]
#[case(-2, 6)]
#[case(5, 9)]
#[case(-6, -1)]
fn conflicts_match_inclusive_interval_test(
    #[case] b_start: i64,
    #[case] b_end: i64,
) -> eyre::Result<()> {
    let expected_conflict = 0 <= b_end && 4 >= b_start;
    for a_first in [true, false] {
        let mut planner = Planner::new()?;
        let (first, second) = if a_first {
            ((0, 4), (b_start, b_end))
        } else {
            ((b_start, b_end), (0, 4))
        };
        planner
            .lifecycle
            .create_sprint(CreateSprintRequest::new(day(first.0), day(first.1)))?;
        let result = planner
            .lifecycle
            .create_sprint(CreateSprintRequest::new(day(second.0), day(second.1)));

        let conflicted = matches!(result, Err(SprintLifecycleError::OverlappingDates { .. }));
        ensure!(
            conflicted == expected_conflict,
            "B = [{b_start}, {b_end}], A first = {a_first}: got {result:?}"
        );
    }
    Ok(())
}

#[rstest]
fn stored_active_sprints_never_overlap(setup: eyre::Result<Planner>) -> eyre::Result<()> {
    let mut planner = setup?;
    let attempts = [(0, 6), (3, 9), (7, 13), (13, 20), (14, 20), (-7, -1), (-3, 2)];
    let created = attempts
        .into_iter()
        .filter(|&(start, end)| {
            planner
                .lifecycle
                .create_sprint(CreateSprintRequest::new(day(start), day(end)))
                .is_ok()
        })
        .count();

    let open: Vec<_> = planner
        .lifecycle
        .sprints()
        .iter()
        .filter(|sprint| sprint.status() != SprintStatus::Completed)
        .collect();
    for (index, sprint) in open.iter().enumerate() {
        for other in open.iter().skip(index + 1) {
            ensure!(
                !sprint.dates().overlaps(other.dates()),
                "{} overlaps {}",
                sprint.dates(),
                other.dates()
            );
        }
    }
    ensure!(created == 4, "expected 4 accepted sprints, got {created}");
    ensure!(open.len() == created);
    Ok(())
}

#[rstest]
fn edit_may_keep_its_own_dates(setup: eyre::Result<Planner>) -> eyre::Result<()> {
    let mut planner = setup?;
    let sprint = planner
        .lifecycle
        .create_sprint(CreateSprintRequest::new(day(0), day(6)))?;

    let edited = planner
        .lifecycle
        .edit_sprint(EditSprintRequest::new(sprint.id(), day(1), day(5)))?;

    ensure!(edited.dates() != sprint.dates());
    Ok(())
}

//! Shared world state for sprint planning BDD scenarios.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use mockable::DefaultClock;
use nexdo::planning::{
    adapters::memory::InMemoryPlanningRepository,
    config::PlanningConfig,
    domain::{Sprint, SprintId, Task, TaskId},
    services::{BacklogService, SprintLifecycleError, SprintLifecycleService},
};
use rstest::fixture;

/// Lifecycle service type used by the BDD world.
pub type TestLifecycle = SprintLifecycleService<InMemoryPlanningRepository, DefaultClock>;

/// Scenario world for sprint planning behaviour tests.
pub struct SprintPlanningWorld {
    pub repository: Arc<InMemoryPlanningRepository>,
    pub lifecycle: TestLifecycle,
    pub backlog: BacklogService<InMemoryPlanningRepository, DefaultClock>,
    pub tasks: HashMap<String, TaskId>,
    pub sprints: HashMap<String, SprintId>,
    pub last_sprint_result: Option<Result<Sprint, SprintLifecycleError>>,
}

impl SprintPlanningWorld {
    /// Creates a world over an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        let repository = Arc::new(InMemoryPlanningRepository::new());
        let clock = Arc::new(DefaultClock);
        let lifecycle = SprintLifecycleService::new(
            Arc::clone(&repository),
            Arc::clone(&clock),
            PlanningConfig::default(),
        )
        .expect("empty in-memory store should load");
        let backlog = BacklogService::new(Arc::clone(&repository), clock);

        Self {
            repository,
            lifecycle,
            backlog,
            tasks: HashMap::new(),
            sprints: HashMap::new(),
            last_sprint_result: None,
        }
    }

    /// Looks up a task created earlier in the scenario.
    pub fn task_id(&self, name: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(name)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown task {name} in scenario world"))
    }

    /// Loads the stored state of a named task.
    pub fn task(&self, name: &str) -> Result<Task, eyre::Report> {
        let task_id = self.task_id(name)?;
        self.backlog
            .find_task(task_id)?
            .ok_or_else(|| eyre::eyre!("task {name} is no longer stored"))
    }

    /// Looks up a sprint created earlier in the scenario.
    pub fn sprint_id(&self, label: &str) -> Result<SprintId, eyre::Report> {
        self.sprints
            .get(label)
            .copied()
            .ok_or_else(|| eyre::eyre!("unknown sprint {label} in scenario world"))
    }

    /// Returns the cached state of a named sprint.
    pub fn sprint(&self, label: &str) -> Result<Sprint, eyre::Report> {
        let sprint_id = self.sprint_id(label)?;
        self.lifecycle
            .sprint(sprint_id)
            .cloned()
            .ok_or_else(|| eyre::eyre!("sprint {label} is not cached"))
    }
}

impl Default for SprintPlanningWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> SprintPlanningWorld {
    SprintPlanningWorld::default()
}

/// The day `offset` days from today.
pub fn day(offset: i64) -> NaiveDate {
    PlanningConfig::default().today(&DefaultClock) + Duration::days(offset)
}

/// Converts a step's day count into a signed offset.
pub fn offset(days: u64) -> Result<i64, eyre::Report> {
    i64::try_from(days).map_err(|err| eyre::eyre!("day count {days} out of range: {err}"))
}

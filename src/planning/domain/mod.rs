//! Domain model for backlog and sprint planning.
//!
//! Entities, validated values, the overlap validator and the status state
//! machines live here. Nothing in this module performs I/O.

mod dates;
mod error;
mod ids;
mod overlap;
mod sprint;
mod status;
mod task;
pub mod transitions;

pub use dates::SprintDates;
pub use error::{ParseSprintStatusError, ParseTaskStatusError, PlanningDomainError};
pub use ids::{SprintId, TaskId};
pub use overlap::{OverlapPolicy, OverlapValidator, SprintConflict};
pub use sprint::{PersistedSprintData, Sprint};
pub use status::{SprintStatus, TaskStatus};
pub use task::{PersistedTaskData, Task, TaskName};
pub use transitions::{SprintAction, TaskAction, next_task_status};

//! Application services for backlog and sprint planning.

mod backlog;
mod lifecycle;

pub use backlog::{
    BacklogError, BacklogResult, BacklogService, CreateTaskRequest, UpdateTaskDetailsRequest,
};
pub use lifecycle::{
    CreateSprintRequest, EditSprintRequest, SprintLifecycleError, SprintLifecycleResult,
    SprintLifecycleService, SprintProgress,
};

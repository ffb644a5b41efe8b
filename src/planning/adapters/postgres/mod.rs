//! `PostgreSQL` adapters for planning persistence.
//!
//! The schema lives in `migrations/` at the crate root.

pub(crate) mod conversion;
pub(crate) mod models;
mod repository;
mod schema;

pub use repository::{PlanningPgPool, PostgresPlanningRepository};

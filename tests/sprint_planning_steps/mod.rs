//! Step definitions for sprint planning behaviour tests.

mod given;
mod then;
mod when;
pub mod world;

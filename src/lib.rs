//! Nexdo: personal backlog and sprint planning engine.
//!
//! This crate keeps a backlog of tasks, groups selected tasks into
//! non-overlapping sprints, synchronizes sprint and task status, and completes
//! sprints whose end date has passed.
//!
//! # Architecture
//!
//! Nexdo follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports (in-memory, `PostgreSQL`)
//!
//! # Modules
//!
//! - [`planning`]: Tasks, sprints, and their lifecycle

pub mod planning;

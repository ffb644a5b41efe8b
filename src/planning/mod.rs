//! Backlog and sprint planning.
//!
//! Tasks live in a backlog and can be grouped into time-boxed sprints whose
//! date ranges never overlap. Sprint status and member task status are kept in
//! step by the lifecycle service, and sprints whose end date has passed are
//! completed by the expiry sweep at start-up. The module follows hexagonal
//! architecture:
//!
//! - Domain types, the overlap validator and the status state machines in
//!   [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]
//! - Runtime settings in [`config`]

pub mod adapters;
pub mod config;
pub mod domain;
pub mod ports;
pub mod services;

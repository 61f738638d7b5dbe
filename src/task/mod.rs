//! Per-task lifecycle control for the scheduling shim.
//!
//! A [`services::Task`] drives one workload through submission, remote
//! scheduling, allocation, binding, completion, rejection and teardown. Each
//! transition is checked against the table in [`domain`], triggers calls to
//! the scheduler and orchestrator ports and is reported to the owning job.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - The runtime task entity in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

//! schedshim: task lifecycle control for a scheduling shim.
//!
//! The shim bridges a container orchestrator's admission and placement
//! model with an external batch scheduler. This crate holds the per-task
//! state machine and its event-handling engine.
//!
//! # Architecture
//!
//! schedshim follows hexagonal architecture principles:
//!
//! - **Domain**: the transition table, events and workload model, free of I/O
//! - **Ports**: trait interfaces for the scheduler, orchestrator, owning job
//!   and telemetry
//! - **Adapters**: a channel-backed job, a `tracing` observer and in-memory
//!   clients
//!
//! # Modules
//!
//! - [`task`]: task lifecycle state machine and side-effect handlers

pub mod task;

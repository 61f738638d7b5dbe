//! Adapter implementations for the task ports.

pub mod job;
pub mod memory;

mod telemetry;

pub use job::{Job, JobWorkQueue};
pub use telemetry::TracingObserver;

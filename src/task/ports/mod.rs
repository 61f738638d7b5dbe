//! Port contracts for the task lifecycle.
//!
//! Ports define the collaborators a task talks to: the external scheduler,
//! the orchestrator, the owning job and the telemetry observer.

pub mod observer;
pub mod orchestrator;
pub mod owner;
pub mod scheduler;

pub use observer::TaskObserver;
pub use orchestrator::{OrchestratorClient, OrchestratorClientError, OrchestratorClientResult};
pub use owner::TaskOwner;
pub use scheduler::{SchedulerClient, SchedulerClientError, SchedulerClientResult};

//! In-memory adapters for tests and local flows.

mod observer;
mod orchestrator;
mod scheduler;

pub use observer::RecordingObserver;
pub use orchestrator::InMemoryOrchestratorClient;
pub use scheduler::InMemorySchedulerClient;

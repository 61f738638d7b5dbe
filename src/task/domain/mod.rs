//! Domain model for the task lifecycle.
//!
//! The domain holds the transition table, typed events, the workload
//! descriptor and the pure lifecycle value. It performs no I/O; side effects
//! live in [`crate::task::services`] behind the ports in
//! [`crate::task::ports`].

mod error;
mod event;
mod ids;
mod lifecycle;
mod record;
mod request;
mod state;
mod workload;

pub use error::{NamedEventError, ParseTaskEventError, ParseTaskStateError, TaskDomainError};
pub use event::TaskEvent;
pub use ids::{JobId, NodeId, TaskId, WorkloadUid};
pub use lifecycle::{TaskLifecycle, Transition};
pub use record::{FailureRecord, TransitionRecord};
pub use request::SchedulingRequest;
pub use state::{TaskEventKind, TaskState};
pub use workload::{ContainerRequest, Resource, WorkloadDescriptor};

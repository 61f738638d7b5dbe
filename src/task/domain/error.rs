//! Error types for task domain validation and parsing.

use super::{TaskEventKind, TaskId, TaskState};
use thiserror::Error;

/// Errors returned while constructing domain values or applying events.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The event has no edge from the task's current state.
    #[error("task {task_id} cannot handle event {event} in state {state}")]
    InvalidStateTransition {
        /// Task identifier.
        task_id: TaskId,
        /// State the task was in when the event arrived.
        state: TaskState,
        /// Rejected event.
        event: TaskEventKind,
    },

    /// The named event was delivered with the wrong number of arguments.
    #[error("invalid number of arguments for event {event}, expecting {expected} but got {actual}")]
    ArgumentCount {
        /// Event whose arguments were malformed.
        event: TaskEventKind,
        /// Number of arguments the event requires.
        expected: usize,
        /// Number of arguments supplied.
        actual: usize,
    },

    /// The node identifier is empty after trimming.
    #[error("node identifier must not be empty")]
    EmptyNodeId,

    /// The job identifier is empty after trimming.
    #[error("job identifier must not be empty")]
    EmptyJobId,

    /// The workload name is empty after trimming.
    #[error("workload name must not be empty")]
    EmptyWorkloadName,

    /// The workload namespace is empty after trimming.
    #[error("workload namespace must not be empty")]
    EmptyNamespace,
}

/// Error returned while parsing task states from their canonical names.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task state: {0}")]
pub struct ParseTaskStateError(pub String);

/// Error returned while parsing event names from the named-event surface.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task event: {0}")]
pub struct ParseTaskEventError(pub String);

/// Errors returned while decoding an event from its name and arguments.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum NamedEventError {
    /// The event name is not part of the transition table.
    #[error(transparent)]
    Unknown(#[from] ParseTaskEventError),
    /// The arguments do not fit the event.
    #[error(transparent)]
    Malformed(#[from] TaskDomainError),
}

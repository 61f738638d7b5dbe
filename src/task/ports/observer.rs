//! Telemetry port for transition and failure records.

use crate::task::domain::{FailureRecord, TransitionRecord};

/// Sink for the records a task emits.
///
/// Called synchronously from the task's serialized handling path, so
/// implementations should return quickly.
pub trait TaskObserver: Send + Sync {
    /// Called once per applied transition.
    fn on_transition(&self, record: &TransitionRecord);

    /// Called when a failure reason is recorded.
    fn on_failure(&self, record: &FailureRecord);
}

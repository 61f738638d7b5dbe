//! Observability records emitted for transitions and failures.

use super::{JobId, TaskEventKind, TaskId, TaskState, Transition};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A state change of one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    /// Task identifier.
    pub task_id: TaskId,
    /// Owning job identifier.
    pub job_id: JobId,
    /// Event that caused the change.
    pub event: TaskEventKind,
    /// State before the event.
    pub from: TaskState,
    /// State after the event.
    pub to: TaskState,
    /// When the change was applied.
    pub occurred_at: DateTime<Utc>,
}

impl TransitionRecord {
    /// Builds the record for `transition` of the given task.
    #[must_use]
    pub fn new(task_id: &TaskId, job_id: &JobId, transition: &Transition) -> Self {
        Self {
            task_id: task_id.clone(),
            job_id: job_id.clone(),
            event: transition.event,
            from: transition.from,
            to: transition.to,
            occurred_at: transition.occurred_at,
        }
    }
}

/// A failure reported for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureRecord {
    /// Task identifier.
    pub task_id: TaskId,
    /// Owning job identifier.
    pub job_id: JobId,
    /// Human-readable reason.
    pub reason: String,
    /// When the failure was recorded.
    pub occurred_at: DateTime<Utc>,
}

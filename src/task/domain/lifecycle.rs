//! Side-effect-free task state machine.

use super::{JobId, NodeId, TaskDomainError, TaskEvent, TaskEventKind, TaskId, TaskState};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// One applied edge of the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transition {
    /// Event that caused the transition.
    pub event: TaskEventKind,
    /// State before the event.
    pub from: TaskState,
    /// State after the event.
    pub to: TaskState,
    /// When the transition was applied.
    pub occurred_at: DateTime<Utc>,
}

/// Lifecycle state of one task.
///
/// The state only changes through [`TaskLifecycle::apply`], which consults
/// the transition table on [`TaskState`] and [`TaskEventKind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskLifecycle {
    task_id: TaskId,
    job_id: JobId,
    state: TaskState,
    node_id: Option<NodeId>,
    failure_reason: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TaskLifecycle {
    /// Creates a lifecycle in [`TaskState::Pending`].
    #[must_use]
    pub fn new(task_id: TaskId, job_id: JobId, clock: &(impl Clock + ?Sized)) -> Self {
        let timestamp = clock.utc();
        Self {
            task_id,
            job_id,
            state: TaskState::Pending,
            node_id: None,
            failure_reason: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    /// Returns the owning job identifier.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Returns the current state.
    #[must_use]
    pub const fn state(&self) -> TaskState {
        self.state
    }

    /// Returns the node named by the latest allocation, if any.
    #[must_use]
    pub const fn node_id(&self) -> Option<&NodeId> {
        self.node_id.as_ref()
    }

    /// Returns the recorded failure reason, if any.
    #[must_use]
    pub fn failure_reason(&self) -> Option<&str> {
        self.failure_reason.as_deref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest transition timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies `event` against the transition table.
    ///
    /// Event payloads are retained: the allocation target for `Allocated`
    /// and a non-blank reason for `Fail`.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStateTransition`] when the event has
    /// no edge from the current state. The lifecycle is left untouched.
    pub fn apply(
        &mut self,
        event: &TaskEvent,
        clock: &(impl Clock + ?Sized),
    ) -> Result<Transition, TaskDomainError> {
        let kind = event.kind();
        let from = self.state;
        let to = from
            .next(kind)
            .ok_or_else(|| TaskDomainError::InvalidStateTransition {
                task_id: self.task_id.clone(),
                state: from,
                event: kind,
            })?;

        match event {
            TaskEvent::Allocated { node_id } => self.node_id = Some(node_id.clone()),
            TaskEvent::Fail { reason } if !reason.trim().is_empty() => {
                self.failure_reason = Some(reason.trim().to_owned());
            }
            _ => {}
        }
        self.state = to;
        self.updated_at = clock.utc();

        Ok(Transition {
            event: kind,
            from,
            to,
            occurred_at: self.updated_at,
        })
    }
}

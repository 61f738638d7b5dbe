//! Task states, event kinds and the transition table that links them.

use super::{ParseTaskEventError, ParseTaskStateError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Task has been created from a workload and not yet submitted.
    Pending,
    /// Task has been submitted and awaits a scheduling decision.
    Scheduling,
    /// The scheduler allocated a node; binding is in flight.
    Allocated,
    /// The workload is bound to its node.
    Bound,
    /// The workload finished.
    Completed,
    /// Teardown has been requested.
    Killing,
    /// Teardown has been confirmed.
    Killed,
    /// The scheduler rejected the task.
    Rejected,
    /// The task failed.
    Failed,
}

impl TaskState {
    /// Every state, in lifecycle order.
    pub const ALL: [Self; 9] = [
        Self::Pending,
        Self::Scheduling,
        Self::Allocated,
        Self::Bound,
        Self::Completed,
        Self::Killing,
        Self::Killed,
        Self::Rejected,
        Self::Failed,
    ];

    /// Returns the canonical name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Scheduling => "SCHEDULING",
            Self::Allocated => "ALLOCATED",
            Self::Bound => "BOUND",
            Self::Completed => "COMPLETED",
            Self::Killing => "KILLING",
            Self::Killed => "KILLED",
            Self::Rejected => "REJECTED",
            Self::Failed => "FAILED",
        }
    }

    /// Returns `true` for states no event can leave.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Killed | Self::Failed)
    }

    /// Looks up the destination of `event` from this state.
    ///
    /// Returns `None` when the table has no edge for the pair.
    #[must_use]
    pub fn next(self, event: TaskEventKind) -> Option<Self> {
        event.sources().contains(&self).then_some(event.destination())
    }

    /// Returns `true` when `event` has an edge from this state.
    #[must_use]
    pub fn can_handle(self, event: TaskEventKind) -> bool {
        self.next(event).is_some()
    }

    /// Lists the events accepted in this state, in table order.
    #[must_use]
    pub fn permitted_events(self) -> Vec<TaskEventKind> {
        TaskEventKind::ALL
            .into_iter()
            .filter(|event| self.can_handle(*event))
            .collect()
    }
}

impl fmt::Display for TaskState {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskState {
    type Error = ParseTaskStateError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::ALL
            .into_iter()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| ParseTaskStateError(value.to_owned()))
    }
}

/// Name of an event accepted by the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskEventKind {
    /// Send the task to the scheduler.
    Submit,
    /// The scheduler picked a node.
    Allocated,
    /// The orchestrator confirmed the bind.
    Bound,
    /// The workload finished.
    Complete,
    /// Request teardown.
    Kill,
    /// Teardown finished.
    Killed,
    /// The scheduler refused the task.
    Rejected,
    /// Mark the task failed.
    Fail,
}

impl TaskEventKind {
    /// Every event kind, in table order.
    pub const ALL: [Self; 8] = [
        Self::Submit,
        Self::Allocated,
        Self::Bound,
        Self::Complete,
        Self::Kill,
        Self::Killed,
        Self::Rejected,
        Self::Fail,
    ];

    /// Returns the canonical event name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Submit => "Submit",
            Self::Allocated => "Allocated",
            Self::Bound => "Bound",
            Self::Complete => "Complete",
            Self::Kill => "Kill",
            Self::Killed => "Killed",
            Self::Rejected => "Rejected",
            Self::Fail => "Fail",
        }
    }

    /// Number of arguments the event carries on the named-event surface.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            Self::Allocated | Self::Fail => 1,
            _ => 0,
        }
    }

    /// States from which this event is accepted.
    ///
    /// Together with [`Self::destination`] this is the transition table.
    /// `Fail` is accepted from `ALLOCATED` so that a failed bind lands in
    /// `FAILED` instead of leaving the task allocated with no node.
    #[must_use]
    pub const fn sources(self) -> &'static [TaskState] {
        match self {
            Self::Submit => &[TaskState::Pending],
            Self::Allocated | Self::Rejected => &[TaskState::Scheduling],
            Self::Bound => &[TaskState::Allocated],
            Self::Complete => &[TaskState::Bound],
            Self::Kill => &[
                TaskState::Pending,
                TaskState::Scheduling,
                TaskState::Allocated,
                TaskState::Bound,
            ],
            Self::Killed => &[TaskState::Killing],
            Self::Fail => &[TaskState::Rejected, TaskState::Allocated],
        }
    }

    /// State this event leads to.
    #[must_use]
    pub const fn destination(self) -> TaskState {
        match self {
            Self::Submit => TaskState::Scheduling,
            Self::Allocated => TaskState::Allocated,
            Self::Bound => TaskState::Bound,
            Self::Complete => TaskState::Completed,
            Self::Kill => TaskState::Killing,
            Self::Killed => TaskState::Killed,
            Self::Rejected => TaskState::Rejected,
            Self::Fail => TaskState::Failed,
        }
    }
}

impl fmt::Display for TaskEventKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskEventKind {
    type Error = ParseTaskEventError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(normalized))
            .ok_or_else(|| ParseTaskEventError(value.to_owned()))
    }
}

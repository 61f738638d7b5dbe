//! Events delivered to a task, with their payloads.

use super::{NamedEventError, NodeId, TaskDomainError, TaskEventKind};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event for the task lifecycle, carrying its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum TaskEvent {
    /// Send the task to the scheduler.
    Submit,
    /// The scheduler allocated the task to a node.
    Allocated {
        /// Node selected by the scheduler.
        node_id: NodeId,
    },
    /// The orchestrator bound the workload.
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
    Fail {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl TaskEvent {
    /// Creates an allocation event for `node_id`.
    #[must_use]
    pub const fn allocated(node_id: NodeId) -> Self {
        Self::Allocated { node_id }
    }

    /// Creates a failure event with the given reason.
    #[must_use]
    pub fn fail(reason: impl Into<String>) -> Self {
        Self::Fail {
            reason: reason.into(),
        }
    }

    /// Returns the table key of this event.
    #[must_use]
    pub const fn kind(&self) -> TaskEventKind {
        match self {
            Self::Submit => TaskEventKind::Submit,
            Self::Allocated { .. } => TaskEventKind::Allocated,
            Self::Bound => TaskEventKind::Bound,
            Self::Complete => TaskEventKind::Complete,
            Self::Kill => TaskEventKind::Kill,
            Self::Killed => TaskEventKind::Killed,
            Self::Rejected => TaskEventKind::Rejected,
            Self::Fail { .. } => TaskEventKind::Fail,
        }
    }

    /// Builds an event from the named-event surface.
    ///
    /// `Allocated` takes the node identifier and `Fail` the reason; every
    /// other event takes no argument.
    ///
    /// # Errors
    ///
    /// Returns [`NamedEventError::Unknown`] for an unrecognised name,
    /// [`TaskDomainError::ArgumentCount`] when the arity does not match and
    /// [`TaskDomainError::EmptyNodeId`] for a blank allocation target.
    pub fn from_parts(name: &str, args: &[String]) -> Result<Self, NamedEventError> {
        let kind = TaskEventKind::try_from(name)?;
        let argument = match args {
            [] if kind.arity() == 0 => None,
            [single] if kind.arity() == 1 => Some(single.clone()),
            _ => {
                return Err(TaskDomainError::ArgumentCount {
                    event: kind,
                    expected: kind.arity(),
                    actual: args.len(),
                }
                .into());
            }
        };

        let event = match (kind, argument) {
            (TaskEventKind::Allocated, Some(node)) => Self::allocated(NodeId::new(node)?),
            (TaskEventKind::Fail, Some(reason)) => Self::fail(reason),
            (TaskEventKind::Submit, _) => Self::Submit,
            (TaskEventKind::Bound, _) => Self::Bound,
            (TaskEventKind::Complete, _) => Self::Complete,
            (TaskEventKind::Kill, _) => Self::Kill,
            (TaskEventKind::Killed, _) => Self::Killed,
            (TaskEventKind::Rejected, _) => Self::Rejected,
            (TaskEventKind::Allocated | TaskEventKind::Fail, None) => {
                return Err(TaskDomainError::ArgumentCount {
                    event: kind,
                    expected: 1,
                    actual: 0,
                }
                .into());
            }
        };
        Ok(event)
    }
}

impl fmt::Display for TaskEvent {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allocated { node_id } => write!(formatter, "Allocated({node_id})"),
            Self::Fail { reason } => write!(formatter, "Fail({reason})"),
            other => formatter.write_str(other.kind().as_str()),
        }
    }
}

//! Owning aggregate contract.

use crate::task::{domain::JobId, services::Task};
use std::sync::Arc;

/// The job a task belongs to.
///
/// A task keeps only a weak reference to its owner and uses it for nothing
/// but [`TaskOwner::notify`].
pub trait TaskOwner: Send + Sync {
    /// Returns the job identifier.
    fn job_id(&self) -> &JobId;

    /// Receives the task after each of its transitions.
    ///
    /// Implementations must not block.
    fn notify(&self, task: Arc<Task>);
}

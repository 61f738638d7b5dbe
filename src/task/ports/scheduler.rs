//! Scheduler port used to submit allocation asks.

use crate::task::domain::{SchedulingRequest, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for scheduler client operations.
pub type SchedulerClientResult<T> = Result<T, SchedulerClientError>;

/// Client contract for the external batch scheduler.
#[async_trait]
pub trait SchedulerClient: Send + Sync {
    /// Sends an allocation ask for one task.
    ///
    /// Timeouts are the adapter's concern; the caller treats any error as a
    /// single failed attempt.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulerClientError`] when the scheduler refuses or cannot
    /// be reached.
    async fn update(&self, request: &SchedulingRequest) -> SchedulerClientResult<()>;
}

/// Errors returned by scheduler client implementations.
#[derive(Debug, Clone, Error)]
pub enum SchedulerClientError {
    /// The scheduler refused the request outright.
    #[error("scheduler refused request for task {task_id}: {reason}")]
    Refused {
        /// Allocation key of the refused request.
        task_id: TaskId,
        /// Reason given by the scheduler.
        reason: String,
    },

    /// Transport-layer failure.
    #[error("scheduler transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl SchedulerClientError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

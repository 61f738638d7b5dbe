//! In-memory scheduler client for lifecycle tests.

use crate::task::{
    domain::SchedulingRequest,
    ports::{SchedulerClient, SchedulerClientError, SchedulerClientResult},
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Scheduler client that records every accepted request.
///
/// Failures can be injected for the next `n` calls to exercise the submit
/// retry path.
#[derive(Debug, Clone, Default)]
pub struct InMemorySchedulerClient {
    state: Arc<RwLock<InMemorySchedulerState>>,
}

#[derive(Debug, Default)]
struct InMemorySchedulerState {
    accepted: Vec<SchedulingRequest>,
    attempts: usize,
    failures_remaining: usize,
}

impl InMemorySchedulerClient {
    /// Creates a client that accepts every request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `count` calls fail with a transport error.
    ///
    /// # Errors
    ///
    /// Returns scheduler transport errors when lock acquisition fails.
    pub fn fail_next(&self, count: usize) -> SchedulerClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SchedulerClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.failures_remaining = count;
        Ok(())
    }

    /// Returns the accepted requests in arrival order.
    ///
    /// # Errors
    ///
    /// Returns scheduler transport errors when lock acquisition fails.
    pub fn accepted_requests(&self) -> SchedulerClientResult<Vec<SchedulingRequest>> {
        let state = self.state.read().map_err(|err| {
            SchedulerClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.accepted.clone())
    }

    /// Returns how many calls were made, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns scheduler transport errors when lock acquisition fails.
    pub fn attempts(&self) -> SchedulerClientResult<usize> {
        let state = self.state.read().map_err(|err| {
            SchedulerClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.attempts)
    }
}

#[async_trait]
impl SchedulerClient for InMemorySchedulerClient {
    async fn update(&self, request: &SchedulingRequest) -> SchedulerClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            SchedulerClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.attempts = state.attempts.saturating_add(1);
        if state.failures_remaining > 0 {
            state.failures_remaining -= 1;
            return Err(SchedulerClientError::transport(std::io::Error::other(
                "scheduler unavailable",
            )));
        }
        state.accepted.push(request.clone());
        Ok(())
    }
}

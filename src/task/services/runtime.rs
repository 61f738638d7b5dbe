//! Collaborators shared by the tasks of a job.

use super::{SubmitRetryPolicy, TaskControllerConfig};
use crate::task::{
    adapters::TracingObserver,
    ports::{OrchestratorClient, SchedulerClient, TaskObserver},
};
use mockable::{Clock, DefaultClock};
use std::fmt;
use std::sync::Arc;

/// Clients, observer, clock and retry policy a task runs against.
///
/// Cloning is cheap; every field is shared.
#[derive(Clone)]
pub struct TaskRuntime {
    pub(super) scheduler: Arc<dyn SchedulerClient>,
    pub(super) orchestrator: Arc<dyn OrchestratorClient>,
    pub(super) observer: Arc<dyn TaskObserver>,
    pub(super) clock: Arc<dyn Clock + Send + Sync>,
    pub(super) submit_retry: SubmitRetryPolicy,
}

impl TaskRuntime {
    /// Creates a runtime that logs through [`TracingObserver`], reads the
    /// system clock and uses the default retry policy.
    #[must_use]
    pub fn new(
        scheduler: Arc<dyn SchedulerClient>,
        orchestrator: Arc<dyn OrchestratorClient>,
    ) -> Self {
        Self {
            scheduler,
            orchestrator,
            observer: Arc::new(TracingObserver),
            clock: Arc::new(DefaultClock),
            submit_retry: SubmitRetryPolicy::default(),
        }
    }

    /// Replaces the telemetry observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn TaskObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replaces the clock used for lifecycle timestamps.
    #[must_use]
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = clock;
        self
    }

    /// Replaces the submit retry policy.
    #[must_use]
    pub const fn with_submit_retry(mut self, policy: SubmitRetryPolicy) -> Self {
        self.submit_retry = policy;
        self
    }

    /// Applies a controller configuration.
    #[must_use]
    pub const fn with_config(self, config: &TaskControllerConfig) -> Self {
        self.with_submit_retry(config.submit_retry_policy())
    }

    /// Returns the submit retry policy.
    #[must_use]
    pub const fn submit_retry(&self) -> SubmitRetryPolicy {
        self.submit_retry
    }
}

impl fmt::Debug for TaskRuntime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskRuntime")
            .field("submit_retry", &self.submit_retry)
            .finish_non_exhaustive()
    }
}

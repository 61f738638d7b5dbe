//! Shared world state for task state transition BDD scenarios.

use std::sync::Arc;

use rstest::fixture;
use schedshim::task::{
    adapters::{
        Job, JobWorkQueue,
        memory::{InMemoryOrchestratorClient, InMemorySchedulerClient, RecordingObserver},
    },
    services::{Task, TaskResult, TaskRuntime},
};

/// Scenario world for task transition behaviour tests.
pub struct TaskTransitionWorld {
    pub scheduler: InMemorySchedulerClient,
    pub orchestrator: InMemoryOrchestratorClient,
    pub observer: RecordingObserver,
    pub job: Option<Arc<Job>>,
    pub queue: Option<JobWorkQueue>,
    pub task: Option<Arc<Task>>,
    pub notifications: usize,
    pub last_result: Option<TaskResult<()>>,
}

impl TaskTransitionWorld {
    /// Creates a world with fresh in-memory adapters and no job.
    #[must_use]
    pub fn new() -> Self {
        Self {
            scheduler: InMemorySchedulerClient::new(),
            orchestrator: InMemoryOrchestratorClient::new(),
            observer: RecordingObserver::new(),
            job: None,
            queue: None,
            task: None,
            notifications: 0,
            last_result: None,
        }
    }

    /// Builds the runtime shared by every task of the scenario job.
    #[must_use]
    pub fn runtime(&self) -> TaskRuntime {
        TaskRuntime::new(
            Arc::new(self.scheduler.clone()),
            Arc::new(self.orchestrator.clone()),
        )
        .with_observer(Arc::new(self.observer.clone()))
    }

    /// Returns the scenario task.
    ///
    /// # Errors
    ///
    /// Returns an error if no task was created yet.
    pub fn task(&self) -> Result<Arc<Task>, eyre::Report> {
        self.task
            .clone()
            .ok_or_else(|| eyre::eyre!("missing task in scenario world"))
    }

    /// Returns the scenario job's work queue.
    ///
    /// # Errors
    ///
    /// Returns an error if no job was created yet.
    pub fn queue(&mut self) -> Result<&mut JobWorkQueue, eyre::Report> {
        self.queue
            .as_mut()
            .ok_or_else(|| eyre::eyre!("missing work queue in scenario world"))
    }
}

impl Default for TaskTransitionWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> TaskTransitionWorld {
    TaskTransitionWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}

//! Channel-backed owning job.

use crate::task::{
    domain::{JobId, TaskId, WorkloadDescriptor},
    ports::TaskOwner,
    services::{Task, TaskRuntime},
};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::mpsc;
use tracing::debug;

/// A job owning a set of tasks.
///
/// Every transition of every task is pushed onto an unbounded work queue,
/// read through the [`JobWorkQueue`] returned by [`Job::new`]. Pushing never
/// blocks and never drops a notification while the queue is open.
#[derive(Debug)]
pub struct Job {
    id: JobId,
    runtime: TaskRuntime,
    tasks: RwLock<HashMap<TaskId, Arc<Task>>>,
    work_tx: mpsc::UnboundedSender<Arc<Task>>,
}

/// Consumer side of a job's work queue.
#[derive(Debug)]
pub struct JobWorkQueue {
    work_rx: mpsc::UnboundedReceiver<Arc<Task>>,
}

impl Job {
    /// Creates a job and the receiver for its work queue.
    #[must_use]
    pub fn new(id: JobId, runtime: TaskRuntime) -> (Arc<Self>, JobWorkQueue) {
        let (work_tx, work_rx) = mpsc::unbounded_channel();
        let job = Arc::new(Self {
            id,
            runtime,
            tasks: RwLock::new(HashMap::new()),
            work_tx,
        });
        (job, JobWorkQueue { work_rx })
    }

    /// Returns the job identifier.
    #[must_use]
    pub const fn id(&self) -> &JobId {
        &self.id
    }

    /// Creates a pending task for `workload` and registers it with the job.
    ///
    /// A workload already known to the job returns the existing task.
    #[must_use]
    pub fn create_task(self: &Arc<Self>, workload: WorkloadDescriptor) -> Arc<Task> {
        let task_id = TaskId::from_workload(workload.uid());
        let mut tasks = self.tasks.write().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(
            tasks
                .entry(task_id)
                .or_insert_with(|| Task::from_workload(self, workload, self.runtime.clone())),
        )
    }

    /// Finds a task by identifier.
    #[must_use]
    pub fn task(&self, task_id: &TaskId) -> Option<Arc<Task>> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(task_id)
            .cloned()
    }

    /// Returns every task of the job.
    #[must_use]
    pub fn tasks(&self) -> Vec<Arc<Task>> {
        self.tasks
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    /// Releases the job's reference to a task, typically once it reached a
    /// terminal state.
    #[must_use]
    pub fn remove_task(&self, task_id: &TaskId) -> Option<Arc<Task>> {
        self.tasks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(task_id)
    }
}

impl TaskOwner for Job {
    fn job_id(&self) -> &JobId {
        &self.id
    }

    fn notify(&self, task: Arc<Task>) {
        if let Err(err) = self.work_tx.send(task) {
            debug!(
                job_id = %self.id,
                task_id = %err.0.id(),
                "work queue closed, dropping transition notification"
            );
        }
    }
}

impl JobWorkQueue {
    /// Waits for the next notified task.
    ///
    /// Returns `None` once the job is gone and the queue is drained.
    pub async fn recv(&mut self) -> Option<Arc<Task>> {
        self.work_rx.recv().await
    }

    /// Returns the next notified task without waiting.
    pub fn try_recv(&mut self) -> Option<Arc<Task>> {
        self.work_rx.try_recv().ok()
    }

    /// Takes every notification queued so far.
    pub fn drain(&mut self) -> Vec<Arc<Task>> {
        std::iter::from_fn(|| self.try_recv()).collect()
    }
}

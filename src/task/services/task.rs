//! Runtime task entity and its event-handling entry point.

use super::TaskRuntime;
use crate::task::{
    domain::{
        JobId, NamedEventError, NodeId, TaskDomainError, TaskEvent, TaskId, TaskLifecycle,
        TaskState, WorkloadDescriptor,
    },
    ports::TaskOwner,
};
use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard, Weak};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::debug;

/// Errors returned by [`Task::handle`] and [`Task::handle_named`].
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskError {
    /// The event was rejected by the domain.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The named event could not be decoded.
    #[error(transparent)]
    NamedEvent(#[from] NamedEventError),
}

/// Result type for task event handling.
pub type TaskResult<T> = Result<T, TaskError>;

/// One schedulable workload and its lifecycle.
///
/// Event handling for a task is linearizable: the whole
/// apply-then-dispatch sequence of [`Task::handle`] runs under a per-task
/// async mutex. Accessors read a lifecycle snapshot that is only replaced
/// while that mutex is held, so they always see a completed transition.
pub struct Task {
    pub(super) id: TaskId,
    pub(super) job_id: JobId,
    pub(super) owner: Weak<dyn TaskOwner>,
    pub(super) workload: WorkloadDescriptor,
    pub(super) runtime: TaskRuntime,
    lifecycle: RwLock<TaskLifecycle>,
    serial: Mutex<()>,
}

impl Task {
    /// Creates a task in [`TaskState::Pending`] for `workload`, owned by
    /// `owner`.
    ///
    /// The task identifier is derived from the workload identity.
    #[must_use]
    pub fn from_workload<O>(
        owner: &Arc<O>,
        workload: WorkloadDescriptor,
        runtime: TaskRuntime,
    ) -> Arc<Self>
    where
        O: TaskOwner + 'static,
    {
        let id = TaskId::from_workload(workload.uid());
        let job_id = owner.job_id().clone();
        let lifecycle = TaskLifecycle::new(id.clone(), job_id.clone(), &*runtime.clock);
        let weak_owner: Weak<O> = Arc::downgrade(owner);
        Arc::new(Self {
            id,
            job_id,
            owner: weak_owner,
            workload,
            runtime,
            lifecycle: RwLock::new(lifecycle),
            serial: Mutex::new(()),
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> &TaskId {
        &self.id
    }

    /// Returns the owning job identifier.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Returns the workload descriptor.
    #[must_use]
    pub const fn workload(&self) -> &WorkloadDescriptor {
        &self.workload
    }

    /// Returns the current state.
    #[must_use]
    pub fn state(&self) -> TaskState {
        self.read_lifecycle().state()
    }

    /// Returns `true` while the task has not been submitted.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.state() == TaskState::Pending
    }

    /// Returns `true` once the task reached a terminal state.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }

    /// Returns the node named by the latest allocation, if any.
    #[must_use]
    pub fn node_id(&self) -> Option<NodeId> {
        self.read_lifecycle().node_id().cloned()
    }

    /// Returns the recorded failure reason, if any.
    #[must_use]
    pub fn failure_reason(&self) -> Option<String> {
        self.read_lifecycle().failure_reason().map(str::to_owned)
    }

    /// Returns the latest transition timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.read_lifecycle().updated_at()
    }

    /// Returns a copy of the lifecycle.
    #[must_use]
    pub fn snapshot(&self) -> TaskLifecycle {
        self.read_lifecycle().clone()
    }

    /// Delivers `event` to the task.
    ///
    /// On a legal transition the event handler runs first (`Submit` sends
    /// the scheduling request, `Fail` records the reason), then the handler
    /// for the entered state (`ALLOCATED` starts the bind), then the owner
    /// is notified. All of them complete before this returns, except the
    /// bind and any submit retries, which run on their own tokio tasks.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::Domain`] with
    /// [`TaskDomainError::InvalidStateTransition`] when the event has no edge
    /// from the current state; the state is left unchanged.
    pub async fn handle(self: &Arc<Self>, event: TaskEvent) -> TaskResult<()> {
        let _serial = self.serial.lock().await;
        debug!(
            task_id = %self.id,
            state = %self.state(),
            event = %event,
            "handling task event"
        );

        let transition = self.write_lifecycle().apply(&event, &*self.runtime.clock)?;
        debug!(
            task_id = %self.id,
            from = %transition.from,
            to = %transition.to,
            event = %transition.event,
            "task event applied"
        );

        self.dispatch(&event, &transition).await;
        Ok(())
    }

    /// Decodes `name` and `args` and delivers the resulting event.
    ///
    /// # Errors
    ///
    /// Returns [`TaskError::NamedEvent`] for an unknown name or a wrong
    /// argument count, before any transition is attempted, and otherwise
    /// the errors of [`Task::handle`].
    pub async fn handle_named(self: &Arc<Self>, name: &str, args: &[String]) -> TaskResult<()> {
        let event = TaskEvent::from_parts(name, args)?;
        self.handle(event).await
    }

    fn read_lifecycle(&self) -> RwLockReadGuard<'_, TaskLifecycle> {
        self.lifecycle.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_lifecycle(&self) -> RwLockWriteGuard<'_, TaskLifecycle> {
        self.lifecycle.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Task")
            .field("id", &self.id)
            .field("job_id", &self.job_id)
            .field("workload", &self.workload.name())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

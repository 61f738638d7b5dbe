//! Side effects run after a transition has been applied.

use super::Task;
use crate::task::domain::{
    FailureRecord, NodeId, SchedulingRequest, TaskEvent, TaskState, Transition, TransitionRecord,
};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Boxed so the spawned bind can call back into [`Task::handle`].
type BindFuture = Pin<Box<dyn Future<Output = ()> + Send>>;

impl Task {
    /// Runs the event handler, the entered-state handler and the notifier,
    /// in that order.
    pub(super) async fn dispatch(self: &Arc<Self>, event: &TaskEvent, transition: &Transition) {
        match event {
            TaskEvent::Submit => self.submit_to_scheduler().await,
            TaskEvent::Fail { reason } => self.record_failure(reason, transition),
            _ => {}
        }

        if let (TaskState::Allocated, TaskEvent::Allocated { node_id }) = (transition.to, event) {
            self.spawn_bind(node_id.clone());
        }

        self.notify_transition(transition);
    }

    /// Sends the scheduling request once and hands any retries to a spawned
    /// tokio task, so the per-task guard is never held across a backoff.
    ///
    /// Failures never change state; once retries are exhausted the task
    /// stays in `SCHEDULING` until something re-drives it.
    async fn submit_to_scheduler(self: &Arc<Self>) {
        let request =
            SchedulingRequest::for_task(self.id.clone(), self.job_id.clone(), &self.workload);
        debug!(
            task_id = %self.id,
            workload = %self.workload.name(),
            request = %request,
            "sending scheduling request"
        );

        let Err(err) = self.runtime.scheduler.update(&request).await else {
            debug!(task_id = %self.id, attempts = 1, "scheduling request accepted");
            return;
        };

        if !self.runtime.submit_retry.allows_retry(1) {
            error!(
                task_id = %self.id,
                job_id = %self.job_id,
                attempts = 1,
                error = %err,
                "failed to send scheduling request to scheduler, giving up"
            );
            return;
        }

        warn!(
            task_id = %self.id,
            job_id = %self.job_id,
            attempts = 1,
            error = %err,
            "failed to send scheduling request to scheduler, retrying"
        );
        tokio::spawn(Arc::clone(self).retry_submit(request));
    }

    /// Resends `request` with backoff until it is accepted, the policy is
    /// exhausted or the task leaves `SCHEDULING`.
    async fn retry_submit(self: Arc<Self>, request: SchedulingRequest) {
        let policy = self.runtime.submit_retry;
        let mut attempts: u32 = 1;
        loop {
            tokio::time::sleep(policy.delay(attempts.saturating_sub(1))).await;

            let state = self.state();
            if state != TaskState::Scheduling {
                debug!(
                    task_id = %self.id,
                    state = %state,
                    attempts,
                    "task left SCHEDULING, dropping submit retry"
                );
                return;
            }

            attempts = attempts.saturating_add(1);
            let Err(err) = self.runtime.scheduler.update(&request).await else {
                debug!(task_id = %self.id, attempts, "scheduling request accepted");
                return;
            };

            if !policy.allows_retry(attempts) {
                error!(
                    task_id = %self.id,
                    job_id = %self.job_id,
                    attempts,
                    error = %err,
                    "failed to send scheduling request to scheduler, giving up"
                );
                return;
            }

            warn!(
                task_id = %self.id,
                job_id = %self.job_id,
                attempts,
                delay = ?policy.delay(attempts.saturating_sub(1)),
                error = %err,
                "failed to send scheduling request to scheduler, retrying"
            );
        }
    }

    /// Records the failure reason carried by a `Fail` event.
    fn record_failure(&self, reason: &str, transition: &Transition) {
        let trimmed = reason.trim();
        if trimmed.is_empty() {
            warn!(
                task_id = %self.id,
                job_id = %self.job_id,
                "invalid arguments for Fail event, expecting 1 non-empty reason"
            );
            return;
        }

        self.runtime.observer.on_failure(&FailureRecord {
            task_id: self.id.clone(),
            job_id: self.job_id.clone(),
            reason: trimmed.to_owned(),
            occurred_at: transition.occurred_at,
        });
    }

    fn spawn_bind(self: &Arc<Self>, node_id: NodeId) {
        tokio::spawn(Arc::clone(self).bind_to(node_id));
    }

    /// Binds the workload to `node_id` and feeds the outcome back through
    /// [`Task::handle`] as `Bound` or `Fail`.
    fn bind_to(self: Arc<Self>, node_id: NodeId) -> BindFuture {
        Box::pin(async move {
            debug!(
                task_id = %self.id,
                workload = %self.workload.name(),
                uid = %self.workload.uid(),
                node_id = %node_id,
                "binding workload to node"
            );

            let follow_up = match self.runtime.orchestrator.bind(&self.workload, &node_id).await {
                Ok(()) => {
                    info!(
                        task_id = %self.id,
                        workload = %self.workload.name(),
                        node_id = %node_id,
                        "bound workload to node"
                    );
                    TaskEvent::Bound
                }
                Err(err) => {
                    let message = format!(
                        "bind workload failed, name: {}, uid: {}, node: {node_id}, {err}",
                        self.workload.name(),
                        self.workload.uid(),
                    );
                    warn!(task_id = %self.id, job_id = %self.job_id, "{message}");
                    TaskEvent::fail(message)
                }
            };

            if let Err(err) = self.handle(follow_up).await {
                warn!(
                    task_id = %self.id,
                    node_id = %node_id,
                    error = %err,
                    "bind outcome rejected, task moved on while binding"
                );
            }
        })
    }

    /// Emits the transition record and pushes the task to its owner.
    fn notify_transition(self: &Arc<Self>, transition: &Transition) {
        self.runtime
            .observer
            .on_transition(&TransitionRecord::new(&self.id, &self.job_id, transition));

        match self.owner.upgrade() {
            Some(owner) => owner.notify(Arc::clone(self)),
            None => debug!(
                task_id = %self.id,
                job_id = %self.job_id,
                "owner released, skipping transition notification"
            ),
        }
    }
}

//! Observer that writes records as structured `tracing` events.

use crate::task::{
    domain::{FailureRecord, TransitionRecord},
    ports::TaskObserver,
};
use tracing::{info, warn};

/// Logs every transition at `info` and every failure at `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl TaskObserver for TracingObserver {
    fn on_transition(&self, record: &TransitionRecord) {
        info!(
            task_id = %record.task_id,
            job_id = %record.job_id,
            event = %record.event,
            from = %record.from,
            to = %record.to,
            "task state changed"
        );
    }

    fn on_failure(&self, record: &FailureRecord) {
        warn!(
            task_id = %record.task_id,
            job_id = %record.job_id,
            reason = %record.reason,
            "task failed"
        );
    }
}

//! Observer that keeps every record in memory.

use crate::task::{
    domain::{FailureRecord, TransitionRecord},
    ports::TaskObserver,
};
use std::sync::{Arc, PoisonError, RwLock};

/// Records transitions and failures for later inspection.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    state: Arc<RwLock<RecordedRecords>>,
}

#[derive(Debug, Default)]
struct RecordedRecords {
    transitions: Vec<TransitionRecord>,
    failures: Vec<FailureRecord>,
}

impl RecordingObserver {
    /// Creates an empty observer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the transition records in emission order.
    #[must_use]
    pub fn transitions(&self) -> Vec<TransitionRecord> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .transitions
            .clone()
    }

    /// Returns the failure records in emission order.
    #[must_use]
    pub fn failures(&self) -> Vec<FailureRecord> {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .failures
            .clone()
    }
}

impl TaskObserver for RecordingObserver {
    fn on_transition(&self, record: &TransitionRecord) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .transitions
            .push(record.clone());
    }

    fn on_failure(&self, record: &FailureRecord) {
        self.state
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .failures
            .push(record.clone());
    }
}

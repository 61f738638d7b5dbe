//! Orchestrator port used to confirm placement of a workload.

use crate::task::domain::{NodeId, WorkloadDescriptor};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for orchestrator client operations.
pub type OrchestratorClientResult<T> = Result<T, OrchestratorClientError>;

/// Client contract for the container orchestrator.
#[async_trait]
pub trait OrchestratorClient: Send + Sync {
    /// Binds the workload to `node_id`.
    ///
    /// # Errors
    ///
    /// Returns [`OrchestratorClientError`] when the orchestrator rejects the
    /// bind or cannot be reached.
    async fn bind(
        &self,
        workload: &WorkloadDescriptor,
        node_id: &NodeId,
    ) -> OrchestratorClientResult<()>;
}

/// Errors returned by orchestrator client implementations.
#[derive(Debug, Clone, Error)]
pub enum OrchestratorClientError {
    /// The target node does not exist.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// The orchestrator rejected the bind.
    #[error("bind to node {node_id} rejected: {reason}")]
    Rejected {
        /// Target node.
        node_id: NodeId,
        /// Reason given by the orchestrator.
        reason: String,
    },

    /// Transport-layer failure.
    #[error("orchestrator transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl OrchestratorClientError {
    /// Wraps a transport error.
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

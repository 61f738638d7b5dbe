//! In-memory orchestrator client for lifecycle tests.

use crate::task::{
    domain::{NodeId, WorkloadDescriptor, WorkloadUid},
    ports::{OrchestratorClient, OrchestratorClientError, OrchestratorClientResult},
};
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// Orchestrator client that records binds against a known set of nodes.
///
/// With no registered nodes every node is accepted.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrchestratorClient {
    state: Arc<RwLock<InMemoryOrchestratorState>>,
}

#[derive(Debug, Default)]
struct InMemoryOrchestratorState {
    nodes: HashSet<NodeId>,
    rejections: HashMap<NodeId, String>,
    bindings: Vec<(WorkloadUid, NodeId)>,
    attempts: Vec<NodeId>,
}

impl InMemoryOrchestratorClient {
    /// Creates a client that accepts binds to any node.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a node. Once any node is registered, binds to unknown
    /// nodes fail with [`OrchestratorClientError::NodeNotFound`].
    ///
    /// # Errors
    ///
    /// Returns orchestrator transport errors when lock acquisition fails.
    pub fn add_node(&self, node_id: NodeId) -> OrchestratorClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            OrchestratorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.nodes.insert(node_id);
        Ok(())
    }

    /// Makes binds to `node_id` fail with the given reason.
    ///
    /// # Errors
    ///
    /// Returns orchestrator transport errors when lock acquisition fails.
    pub fn reject_node(
        &self,
        node_id: NodeId,
        reason: impl Into<String>,
    ) -> OrchestratorClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            OrchestratorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.rejections.insert(node_id, reason.into().trim().to_owned());
        Ok(())
    }

    /// Returns the successful bindings in completion order.
    ///
    /// # Errors
    ///
    /// Returns orchestrator transport errors when lock acquisition fails.
    pub fn bindings(&self) -> OrchestratorClientResult<Vec<(WorkloadUid, NodeId)>> {
        let state = self.state.read().map_err(|err| {
            OrchestratorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.bindings.clone())
    }

    /// Returns the target node of every bind call, failed ones included.
    ///
    /// # Errors
    ///
    /// Returns orchestrator transport errors when lock acquisition fails.
    pub fn bind_attempts(&self) -> OrchestratorClientResult<Vec<NodeId>> {
        let state = self.state.read().map_err(|err| {
            OrchestratorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.attempts.clone())
    }
}

#[async_trait]
impl OrchestratorClient for InMemoryOrchestratorClient {
    async fn bind(
        &self,
        workload: &WorkloadDescriptor,
        node_id: &NodeId,
    ) -> OrchestratorClientResult<()> {
        let mut state = self.state.write().map_err(|err| {
            OrchestratorClientError::transport(std::io::Error::other(err.to_string()))
        })?;
        state.attempts.push(node_id.clone());

        if let Some(reason) = state.rejections.get(node_id) {
            return Err(OrchestratorClientError::Rejected {
                node_id: node_id.clone(),
                reason: reason.clone(),
            });
        }
        if !state.nodes.is_empty() && !state.nodes.contains(node_id) {
            return Err(OrchestratorClientError::NodeNotFound(node_id.clone()));
        }

        state.bindings.push((workload.uid(), node_id.clone()));
        Ok(())
    }
}

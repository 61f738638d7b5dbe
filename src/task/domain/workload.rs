//! Workload descriptor: the placement request snapshot a task is built from.

use super::{TaskDomainError, WorkloadUid, ids::non_blank};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Resource quantities requested by a workload or one of its containers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Resource {
    /// Memory in mebibytes.
    pub memory_mib: u64,
    /// CPU in thousandths of a core.
    pub vcore_millis: u64,
}

impl Resource {
    /// Creates a resource quantity.
    #[must_use]
    pub const fn new(memory_mib: u64, vcore_millis: u64) -> Self {
        Self {
            memory_mib,
            vcore_millis,
        }
    }

    /// Adds two quantities, saturating at the numeric bounds.
    #[must_use]
    pub const fn saturating_add(self, other: Self) -> Self {
        Self {
            memory_mib: self.memory_mib.saturating_add(other.memory_mib),
            vcore_millis: self.vcore_millis.saturating_add(other.vcore_millis),
        }
    }

    /// Returns `true` when nothing is requested.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.memory_mib == 0 && self.vcore_millis == 0
    }
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "memory={}Mi vcore={}m", self.memory_mib, self.vcore_millis)
    }
}

/// Resource request of one container in a workload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRequest {
    name: String,
    resources: Resource,
}

impl ContainerRequest {
    /// Creates a container request.
    #[must_use]
    pub fn new(name: impl Into<String>, resources: Resource) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }

    /// Returns the container name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the requested resources.
    #[must_use]
    pub const fn resources(&self) -> Resource {
        self.resources
    }
}

/// Snapshot of the placement request behind a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkloadDescriptor {
    uid: WorkloadUid,
    namespace: String,
    name: String,
    containers: Vec<ContainerRequest>,
    node_selector: BTreeMap<String, String>,
}

impl WorkloadDescriptor {
    /// Creates a descriptor with no containers.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyNamespace`] or
    /// [`TaskDomainError::EmptyWorkloadName`] when either value is blank.
    pub fn new(
        uid: WorkloadUid,
        namespace: impl Into<String>,
        name: impl Into<String>,
    ) -> Result<Self, TaskDomainError> {
        Ok(Self {
            uid,
            namespace: non_blank(namespace.into(), TaskDomainError::EmptyNamespace)?,
            name: non_blank(name.into(), TaskDomainError::EmptyWorkloadName)?,
            containers: Vec::new(),
            node_selector: BTreeMap::new(),
        })
    }

    /// Adds a container request.
    #[must_use]
    pub fn with_container(mut self, container: ContainerRequest) -> Self {
        self.containers.push(container);
        self
    }

    /// Adds a node selector label.
    #[must_use]
    pub fn with_node_selector(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.node_selector.insert(key.into(), value.into());
        self
    }

    /// Returns the workload identity.
    #[must_use]
    pub const fn uid(&self) -> WorkloadUid {
        self.uid
    }

    /// Returns the workload namespace.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns the workload name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the container requests.
    #[must_use]
    pub fn containers(&self) -> &[ContainerRequest] {
        &self.containers
    }

    /// Returns the node selector labels.
    #[must_use]
    pub const fn node_selector(&self) -> &BTreeMap<String, String> {
        &self.node_selector
    }

    /// Sums the container requests into one resource ask.
    #[must_use]
    pub fn resource_request(&self) -> Resource {
        self.containers
            .iter()
            .fold(Resource::default(), |total, container| {
                total.saturating_add(container.resources())
            })
    }
}

impl fmt::Display for WorkloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} ({})", self.namespace, self.name, self.uid)
    }
}

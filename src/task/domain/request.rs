//! Scheduling request sent to the external batch scheduler.

use super::{JobId, Resource, TaskId, WorkloadDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Allocation ask for one task, addressed to the scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulingRequest {
    allocation_key: TaskId,
    job_id: JobId,
    workload_name: String,
    resource_ask: Resource,
    max_allocations: u32,
    node_selector: BTreeMap<String, String>,
}

impl SchedulingRequest {
    /// A task is placed exactly once.
    pub const MAX_ALLOCATIONS: u32 = 1;

    /// Converts a workload into the request for `task_id` in `job_id`.
    #[must_use]
    pub fn for_task(task_id: TaskId, job_id: JobId, workload: &WorkloadDescriptor) -> Self {
        Self {
            allocation_key: task_id,
            job_id,
            workload_name: workload.name().to_owned(),
            resource_ask: workload.resource_request(),
            max_allocations: Self::MAX_ALLOCATIONS,
            node_selector: workload.node_selector().clone(),
        }
    }

    /// Returns the allocation key, which is the task identifier.
    #[must_use]
    pub const fn allocation_key(&self) -> &TaskId {
        &self.allocation_key
    }

    /// Returns the owning job identifier.
    #[must_use]
    pub const fn job_id(&self) -> &JobId {
        &self.job_id
    }

    /// Returns the workload name.
    #[must_use]
    pub fn workload_name(&self) -> &str {
        &self.workload_name
    }

    /// Returns the summed resource ask.
    #[must_use]
    pub const fn resource_ask(&self) -> Resource {
        self.resource_ask
    }

    /// Returns the number of allocations requested.
    #[must_use]
    pub const fn max_allocations(&self) -> u32 {
        self.max_allocations
    }

    /// Returns the node selector labels.
    #[must_use]
    pub const fn node_selector(&self) -> &BTreeMap<String, String> {
        &self.node_selector
    }
}

impl fmt::Display for SchedulingRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ask(key={}, job={}, {}, max={})",
            self.allocation_key, self.job_id, self.resource_ask, self.max_allocations
        )
    }
}

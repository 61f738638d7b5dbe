//! Given steps for task state transition BDD scenarios.

use super::world::TaskTransitionWorld;
use eyre::WrapErr;
use rstest_bdd_macros::given;
use schedshim::task::{
    adapters::Job,
    domain::{ContainerRequest, JobId, NodeId, Resource, WorkloadDescriptor, WorkloadUid},
};

#[given(r#"a job "{job_id}" with a pending task for workload "{name}""#)]
fn job_with_pending_task(
    world: &mut TaskTransitionWorld,
    job_id: String,
    name: String,
) -> Result<(), eyre::Report> {
    let (job, queue) = Job::new(
        JobId::new(job_id).wrap_err("job id for scenario")?,
        world.runtime(),
    );
    let workload = WorkloadDescriptor::new(WorkloadUid::new(), "default", name)
        .wrap_err("workload for scenario")?
        .with_container(ContainerRequest::new("main", Resource::new(128, 250)));
    world.task = Some(job.create_task(workload));
    world.job = Some(job);
    world.queue = Some(queue);
    Ok(())
}

#[given(r#"node "{node_id}" is registered with the orchestrator"#)]
fn node_is_registered(
    world: &mut TaskTransitionWorld,
    node_id: String,
) -> Result<(), eyre::Report> {
    let node = NodeId::new(node_id).wrap_err("node id for scenario")?;
    world
        .orchestrator
        .add_node(node)
        .wrap_err("register node with orchestrator")?;
    Ok(())
}

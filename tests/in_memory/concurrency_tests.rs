//! In-memory integration tests for concurrent event delivery.

use super::helpers::{JobFixture, WAIT_TIMEOUT, fixture, node, receive};
use async_trait::async_trait;
use eyre::ensure;
use rstest::rstest;
use schedshim::task::{
    adapters::memory::InMemoryOrchestratorClient,
    domain::{SchedulingRequest, TaskEvent, TaskState},
    ports::{SchedulerClient, SchedulerClientResult},
    services::SubmitRetryPolicy,
};
use std::sync::Arc;
use tokio::sync::Barrier;

/// Scheduler that only answers once `n` submits are in flight together.
struct RendezvousScheduler {
    barrier: Barrier,
}

#[async_trait]
impl SchedulerClient for RendezvousScheduler {
    async fn update(&self, _request: &SchedulingRequest) -> SchedulerClientResult<()> {
        self.barrier.wait().await;
        Ok(())
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn distinct_tasks_submit_in_parallel() -> eyre::Result<()> {
    const TASKS: usize = 4;
    let (job, mut queue, _observer) = JobFixture::with_ports(
        Arc::new(RendezvousScheduler {
            barrier: Barrier::new(TASKS),
        }),
        Arc::new(InMemoryOrchestratorClient::new()),
        SubmitRetryPolicy::single_shot(),
    )?;
    let tasks = (0..TASKS)
        .map(|index| Ok(job.create_task(super::helpers::workload(&format!("shard-{index}"))?)))
        .collect::<eyre::Result<Vec<_>>>()?;

    let handles: Vec<_> = tasks
        .iter()
        .map(|task| {
            let task = Arc::clone(task);
            tokio::spawn(async move { task.handle(TaskEvent::Submit).await })
        })
        .collect();
    for handle in handles {
        tokio::time::timeout(WAIT_TIMEOUT, handle).await???;
    }

    ensure!(tasks.iter().all(|task| task.state() == TaskState::Scheduling));
    ensure!(receive(&mut queue, TASKS).await?.len() == TASKS);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn racing_events_on_one_task_apply_one_edge(mut fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("shard-a")?;
    task.handle(TaskEvent::Submit).await?;
    task.handle(TaskEvent::allocated(node("node-1")?)).await?;
    fixture.notifications(3).await?;
    ensure!(task.state() == TaskState::Bound);

    let handles: Vec<_> = [TaskEvent::Complete, TaskEvent::Kill, TaskEvent::Complete]
        .into_iter()
        .map(|event| {
            let racing = Arc::clone(&task);
            tokio::spawn(async move { racing.handle(event).await })
        })
        .collect();
    let mut accepted = 0_usize;
    for handle in handles {
        if handle.await?.is_ok() {
            accepted += 1;
        }
    }

    ensure!(accepted == 1, "accepted {accepted} events from BOUND");
    ensure!(matches!(
        task.state(),
        TaskState::Completed | TaskState::Killing
    ));
    ensure!(fixture.notifications(1).await?.len() == 1);
    ensure!(fixture.queue.drain().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_records_form_a_chain_under_contention(
    fixture: JobFixture,
) -> eyre::Result<()> {
    let task = fixture.task("shard-b")?;
    let events = [
        TaskEvent::Kill,
        TaskEvent::Submit,
        TaskEvent::Killed,
        TaskEvent::Rejected,
        TaskEvent::Kill,
        TaskEvent::Killed,
    ];

    let handles: Vec<_> = events
        .into_iter()
        .map(|event| {
            let racing = Arc::clone(&task);
            tokio::spawn(async move { racing.handle(event).await })
        })
        .collect();
    for handle in handles {
        let _outcome = handle.await?;
    }

    let records = fixture.observer.transitions();
    ensure!(records.first().is_some_and(|first| first.from == TaskState::Pending));
    ensure!(records.windows(2).all(|pair| match pair {
        [earlier, later] => earlier.to == later.from && earlier.occurred_at <= later.occurred_at,
        _ => false,
    }));
    ensure!(records.last().map(|last| last.to) == Some(task.state()));
    Ok(())
}

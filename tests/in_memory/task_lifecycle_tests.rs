//! In-memory integration tests for task event handling.

use super::helpers::{
    JobFixture, build_fixture, eventually, fast_retry, fixture, node, workload,
};
use eyre::{bail, ensure};
use rstest::rstest;
use schedshim::task::{
    domain::{TaskDomainError, TaskEvent, TaskEventKind, TaskState},
    services::{SubmitRetryPolicy, TaskError},
};
use std::sync::Arc;
use std::time::{Duration, Instant};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_runs_to_completion(mut fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("train-0")?;
    let created_at = task.updated_at();

    task.handle(TaskEvent::Submit).await?;
    task.handle(TaskEvent::allocated(node("node-1")?)).await?;
    let notified = fixture.notifications(3).await?;
    ensure!(task.state() == TaskState::Bound);
    task.handle(TaskEvent::Complete).await?;
    let last = fixture.notifications(1).await?;

    ensure!(task.state() == TaskState::Completed);
    ensure!(task.is_terminal());
    ensure!(task.updated_at() >= created_at);
    ensure!(
        notified
            .iter()
            .chain(last.iter())
            .all(|notified_task| Arc::ptr_eq(notified_task, &task))
    );
    let states: Vec<_> = fixture
        .observer
        .transitions()
        .iter()
        .map(|record| (record.from, record.to))
        .collect();
    ensure!(
        states
            == [
                (TaskState::Pending, TaskState::Scheduling),
                (TaskState::Scheduling, TaskState::Allocated),
                (TaskState::Allocated, TaskState::Bound),
                (TaskState::Bound, TaskState::Completed),
            ]
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn named_events_drive_the_lifecycle(mut fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("train-1")?;

    task.handle_named("submit", &[]).await?;
    task.handle_named("Rejected", &[]).await?;
    task.handle_named("Fail", &["placement constraints unsatisfiable".to_owned()])
        .await?;

    ensure!(task.state() == TaskState::Failed);
    ensure!(task.failure_reason().as_deref() == Some("placement constraints unsatisfiable"));
    ensure!(fixture.queue.drain().len() == 3);
    Ok(())
}

#[rstest]
#[case(TaskEvent::Bound)]
#[case(TaskEvent::Complete)]
#[case(TaskEvent::Killed)]
#[case(TaskEvent::Rejected)]
#[case(TaskEvent::fail("too early"))]
#[tokio::test(flavor = "multi_thread")]
async fn events_without_edge_from_pending_are_rejected(
    mut fixture: JobFixture,
    #[case] event: TaskEvent,
) -> eyre::Result<()> {
    let task = fixture.task("train-2")?;
    let kind = event.kind();

    let result = task.handle(event).await;

    ensure!(
        result
            == Err(TaskError::Domain(TaskDomainError::InvalidStateTransition {
                task_id: task.id().clone(),
                state: TaskState::Pending,
                event: kind,
            }))
    );
    ensure!(task.is_pending());
    ensure!(fixture.queue.drain().is_empty());
    ensure!(fixture.scheduler.attempts()? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn terminal_task_rejects_further_events(mut fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("train-3")?;
    task.handle(TaskEvent::Kill).await?;
    task.handle(TaskEvent::Killed).await?;
    ensure!(fixture.queue.drain().len() == 2);

    for event in [TaskEvent::Submit, TaskEvent::Kill, TaskEvent::Killed] {
        let Err(TaskError::Domain(TaskDomainError::InvalidStateTransition { state, .. })) =
            task.handle(event).await
        else {
            bail!("terminal task accepted an event");
        };
        ensure!(state == TaskState::Killed);
    }
    ensure!(fixture.queue.drain().is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn submit_retries_through_transient_scheduler_errors() -> eyre::Result<()> {
    let mut fixture = build_fixture(fast_retry(3))?;
    fixture.scheduler.fail_next(2)?;
    let task = fixture.task("train-4")?;

    task.handle(TaskEvent::Submit).await?;
    ensure!(fixture.queue.drain().len() == 1);
    eventually(|| {
        fixture
            .scheduler
            .accepted_requests()
            .is_ok_and(|accepted| !accepted.is_empty())
    })
    .await?;

    ensure!(fixture.scheduler.attempts()? == 3);
    let accepted = fixture.scheduler.accepted_requests()?;
    ensure!(accepted.len() == 1);
    ensure!(accepted.iter().all(|request| request.allocation_key() == task.id()));
    ensure!(task.state() == TaskState::Scheduling);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn exhausted_submit_can_be_driven_externally() -> eyre::Result<()> {
    let mut fixture = build_fixture(fast_retry(2))?;
    fixture.scheduler.fail_next(5)?;
    let task = fixture.task("train-5")?;

    task.handle(TaskEvent::Submit).await?;
    eventually(|| fixture.scheduler.attempts().is_ok_and(|attempts| attempts == 2)).await?;
    tokio::time::sleep(Duration::from_millis(20)).await;
    ensure!(fixture.scheduler.attempts()? == 2);
    ensure!(fixture.scheduler.accepted_requests()?.is_empty());
    ensure!(task.state() == TaskState::Scheduling);

    task.handle(TaskEvent::Kill).await?;
    ensure!(task.state() == TaskState::Killing);
    ensure!(fixture.queue.drain().len() == 2);
    Ok(())
}

#[rstest]
fn create_task_is_idempotent_per_workload(fixture: JobFixture) -> eyre::Result<()> {
    let descriptor = workload("train-6")?;
    let first = fixture.job.create_task(descriptor.clone());
    let second = fixture.job.create_task(descriptor);

    ensure!(Arc::ptr_eq(&first, &second));
    ensure!(fixture.job.tasks().len() == 1);
    ensure!(first.job_id() == fixture.job.id());
    ensure!(first.is_pending());
    Ok(())
}

#[rstest]
fn job_registry_tracks_tasks(fixture: JobFixture) -> eyre::Result<()> {
    let first = fixture.task("train-7")?;
    let second = fixture.task("train-8")?;

    ensure!(fixture.job.tasks().len() == 2);
    ensure!(
        fixture
            .job
            .task(second.id())
            .is_some_and(|found| Arc::ptr_eq(&found, &second))
    );

    let removed = fixture.job.remove_task(first.id());
    ensure!(removed.is_some_and(|task| Arc::ptr_eq(&task, &first)));
    ensure!(fixture.job.task(first.id()).is_none());
    ensure!(fixture.job.tasks().len() == 1);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removed_task_still_notifies_its_job(mut fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("train-9")?;
    let _released = fixture.job.remove_task(task.id());

    task.handle(TaskEvent::Kill).await?;

    let notified = fixture.notifications(1).await?;
    ensure!(notified.iter().all(|found| Arc::ptr_eq(found, &task)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn transition_records_carry_job_identity(fixture: JobFixture) -> eyre::Result<()> {
    let task = fixture.task("train-10")?;

    task.handle(TaskEvent::Submit).await?;
    task.handle(TaskEvent::Rejected).await?;

    let records = fixture.observer.transitions();
    ensure!(records.len() == 2);
    ensure!(records.iter().all(|record| record.job_id == *fixture.job.id()));
    ensure!(records.iter().all(|record| record.task_id == *task.id()));
    let events: Vec<_> = records.iter().map(|record| record.event).collect();
    ensure!(events == [TaskEventKind::Submit, TaskEventKind::Rejected]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn kill_cancels_pending_submit_retries() -> eyre::Result<()> {
    let retry = SubmitRetryPolicy {
        max_attempts: 5,
        first_delay: Duration::from_millis(400),
        max_delay: Duration::from_millis(400),
        factor: 1,
    };
    let mut fixture = build_fixture(retry)?;
    fixture.scheduler.fail_next(usize::MAX)?;
    let task = fixture.task("train-11")?;

    let submitting = Arc::clone(&task);
    let submit = tokio::spawn(async move { submitting.handle(TaskEvent::Submit).await });
    let notified = fixture.notifications(1).await?;
    ensure!(notified.iter().all(|found| Arc::ptr_eq(found, &task)));
    ensure!(task.state() == TaskState::Scheduling);

    let started = Instant::now();
    task.handle(TaskEvent::Kill).await?;
    ensure!(
        started.elapsed() < retry.first_delay,
        "Kill took {:?}",
        started.elapsed()
    );
    submit.await??;
    ensure!(task.state() == TaskState::Killing);

    tokio::time::sleep(retry.first_delay * 2).await;
    ensure!(fixture.scheduler.attempts()? == 1);
    ensure!(fixture.notifications(1).await?.len() == 1);
    ensure!(fixture.queue.drain().is_empty());
    Ok(())
}

mod common;

use common::{FailingProvider, FailureMode, Fixture};
use nfvo_lcm_core::constants::events;
use nfvo_lcm_core::database::DatabaseServiceProvider;
use nfvo_lcm_core::events::EventPublisher;
use nfvo_lcm_core::models::{JobAction, NfvoJob, ProblemDetails};
use nfvo_lcm_core::services::{JobStateManager, MarkErrorOutcome};
use nfvo_lcm_core::state_machine::JobStatus;
use nfvo_lcm_core::workflow::{AbortKind, StepContext};
use std::sync::Arc;

#[tokio::test]
async fn finishing_a_started_job_sets_end_time_and_records_history() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Started).await;
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_process_instance_id("step1");

    assert!(fixture.job("J1").await.end_time.is_none());

    fixture
        .task
        .set_job_status(&mut ctx, JobStatus::Finished, "done")
        .await
        .unwrap();

    let job = fixture.job("J1").await;
    assert_eq!(job.status, JobStatus::Finished);
    let end_time = job.end_time.expect("end time set");
    assert!(end_time >= job.start_time);

    let statuses: Vec<JobStatus> = job.history().iter().map(|e| e.status).collect();
    assert_eq!(statuses, vec![JobStatus::Started, JobStatus::Finished]);
    assert_eq!(job.history()[1].description.as_deref(), Some("done"));
}

#[tokio::test]
async fn starting_a_job_binds_the_step_instance() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Starting).await;
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_process_instance_id("step-42");

    fixture
        .task
        .set_job_status(&mut ctx, JobStatus::Started, "Instantiation started")
        .await
        .unwrap();

    let job = fixture.job("J1").await;
    assert_eq!(job.process_instance_id.as_deref(), Some("step-42"));
    assert!(job.end_time.is_none());
}

#[tokio::test]
async fn recording_status_only_appends_history() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Started).await;
    let mut ctx = StepContext::new().with_job_id("J1");
    let before = fixture.job("J1").await;

    fixture
        .task
        .add_job_status(&mut ctx, JobStatus::Processing, "Creating VNF 1 of 3")
        .await
        .unwrap();

    let after = fixture.job("J1").await;
    assert_eq!(after.status, before.status);
    assert_eq!(after.start_time, before.start_time);
    assert_eq!(after.end_time, before.end_time);
    assert_eq!(after.history().len(), before.history().len() + 1);
    assert_eq!(&after.history()[..1], before.history());
    assert_eq!(after.history()[1].status, JobStatus::Processing);
}

#[tokio::test]
async fn mark_error_on_missing_job_is_a_no_op() {
    let fixture = Fixture::new();
    let mut ctx = StepContext::new().with_job_id("missing-job");

    let outcome = fixture
        .task
        .set_job_status_to_error(&mut ctx, "x")
        .await
        .unwrap();

    assert_eq!(outcome, MarkErrorOutcome::JobNotFound);
    assert!(ctx.problem_details().is_none());
    assert_eq!(fixture.provider.job_count(), 0);
}

#[tokio::test]
async fn mark_error_records_upstream_detail_then_description() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Processing).await;
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_problem_details(ProblemDetails::from_detail("upstream 500").with_status(500));

    let outcome = fixture
        .task
        .set_job_status_to_error(&mut ctx, "timeout")
        .await
        .unwrap();

    assert_eq!(outcome, MarkErrorOutcome::Marked { entries_added: 2 });
    let job = fixture.job("J1").await;
    assert_eq!(job.status, JobStatus::Error);
    assert!(job.end_time.is_some());

    let added = &job.history()[1..];
    assert_eq!(added.len(), 2);
    assert!(added.iter().all(|e| e.status == JobStatus::Error));
    assert_eq!(added[0].description.as_deref(), Some("upstream 500"));
    assert_eq!(added[1].description.as_deref(), Some("timeout"));
}

#[tokio::test]
async fn mark_error_without_problem_details_adds_one_entry() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Started).await;
    let mut ctx = StepContext::new().with_job_id("J1");

    let outcome = fixture
        .task
        .set_job_status_to_error(&mut ctx, "VNF creation failed")
        .await
        .unwrap();

    assert_eq!(outcome, MarkErrorOutcome::Marked { entries_added: 1 });
    assert_eq!(fixture.job("J1").await.history().len(), 2);
}

#[tokio::test]
async fn terminal_jobs_reject_further_transitions() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Finished).await;
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_process_instance_id("step-2");

    let err = fixture
        .task
        .set_job_status(&mut ctx, JobStatus::Processing, "late update")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), AbortKind::InvalidTransition);
    assert_eq!(err.error_code(), "WORKFLOW_FAILED");
    assert!(ctx.problem_details().is_some());

    let job = fixture.job("J1").await;
    assert_eq!(job.status, JobStatus::Finished);
    assert_eq!(job.history().len(), 1);
}

#[tokio::test]
async fn operations_on_missing_job_abort_with_job_id() {
    let fixture = Fixture::new();
    let mut ctx = StepContext::new().with_job_id("J404");

    let err = fixture
        .task
        .add_job_status(&mut ctx, JobStatus::Processing, "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AbortKind::NotFound);
    assert_eq!(
        ctx.problem_details().and_then(|p| p.message()),
        Some("Unable to find job using job id: J404")
    );

    let mut ctx = StepContext::new().with_job_id("J404");
    let err = fixture
        .task
        .set_job_status(&mut ctx, JobStatus::Finished, "x")
        .await
        .unwrap_err();
    assert_eq!(err.kind(), AbortKind::NotFound);
    assert!(ctx.problem_details().is_some());
}

#[tokio::test]
async fn stale_job_write_is_a_conflict() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Started).await;
    let stale = fixture.job("J1").await;

    let mut ctx = StepContext::new().with_job_id("J1");
    fixture
        .task
        .add_job_status(&mut ctx, JobStatus::Processing, "first writer")
        .await
        .unwrap();

    let err = fixture.provider.add_job(&stale).await.unwrap_err();
    assert!(err.is_conflict());
    assert_eq!(fixture.job("J1").await.history().len(), 2);
}

#[tokio::test]
async fn storage_failure_during_transition_aborts() {
    let provider = Arc::new(FailingProvider::default());
    provider
        .inner
        .add_job(&NfvoJob::with_status(
            "J1",
            JobAction::Terminate,
            "ns-1",
            JobStatus::Started,
        ))
        .await
        .unwrap();
    provider.set_mode(FailureMode {
        fail_job_writes: true,
        ..FailureMode::default()
    });
    let manager = JobStateManager::new(provider, EventPublisher::default());
    let mut ctx = StepContext::new().with_job_id("J1");

    let err = manager
        .transition_to(&mut ctx, JobStatus::Finished, "Termination finished")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), AbortKind::StorageUnavailable);
    assert!(!err.is_retryable());
    assert!(ctx
        .problem_details()
        .and_then(|p| p.message())
        .is_some_and(|m| m.contains("connection reset")));
}

#[tokio::test]
async fn transitions_publish_events() {
    let fixture = Fixture::new().with_job("J1", JobStatus::Starting).await;
    let mut events_rx = fixture.events.subscribe();
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_process_instance_id("step-1");

    fixture
        .task
        .set_job_status(&mut ctx, JobStatus::Started, "started")
        .await
        .unwrap();

    let event = events_rx.recv().await.unwrap();
    assert_eq!(event.name, events::JOB_TRANSITIONED);
    assert_eq!(event.context["from_status"], "STARTING");
    assert_eq!(event.context["to_status"], "STARTED");
    assert_eq!(event.context["process_instance_id"], "step-1");
}

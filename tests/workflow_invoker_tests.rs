mod common;

use async_trait::async_trait;
use common::{FailingProvider, FailureMode, Fixture};
use nfvo_lcm_core::config::StepInvokerConfig;
use nfvo_lcm_core::database::DatabaseServiceProvider;
use nfvo_lcm_core::events::EventPublisher;
use nfvo_lcm_core::models::{JobAction, NfvoJob};
use nfvo_lcm_core::state_machine::{JobStatus, NsInstanceState, OperationState};
use nfvo_lcm_core::tasks::{
    NetworkServiceTask, SetJobStatusStep, SetJobStatusToErrorStep, UpdateNsInstanceStatusStep,
    UpdateOperationStateStep,
};
use nfvo_lcm_core::workflow::{
    abort, AbortKind, StepContext, StepInvoker, StepOutcome, StepResult, WorkflowStep,
};
use std::sync::Arc;

/// Looks up the NS instance and fails the way a VNF creation step would
struct CreateVnfsStep {
    task: NetworkServiceTask,
}

#[async_trait]
impl WorkflowStep for CreateVnfsStep {
    fn name(&self) -> &str {
        "create_vnfs"
    }

    async fn execute(&self, ctx: &mut StepContext) -> StepResult<()> {
        let ns_inst = self.task.get_nfvo_ns_inst(ctx, None).await?;
        self.task
            .add_job_status(
                ctx,
                JobStatus::Processing,
                &format!("Creating VNFs for {}", ns_inst.name),
            )
            .await?;
        Err(abort(ctx, "Unable to find VNF package for vnfd-1"))
    }
}

#[tokio::test]
async fn successful_instantiation_flow() {
    let fixture = Fixture::new()
        .with_job("J1", JobStatus::Starting)
        .await
        .with_occurrence("occ-1")
        .await
        .with_ns_instance("ns-1")
        .await;
    let invoker = StepInvoker::new(StepInvokerConfig::default(), fixture.events.clone());
    let boundary = SetJobStatusToErrorStep::new(fixture.task.clone(), "Instantiation failed");
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_occ_id("occ-1")
        .with_ns_inst_id("ns-1")
        .with_process_instance_id("proc-1");

    let steps: Vec<Box<dyn WorkflowStep>> = vec![
        Box::new(SetJobStatusStep::new(
            fixture.task.clone(),
            JobStatus::Started,
            "Instantiation started",
        )),
        Box::new(UpdateOperationStateStep::new(
            fixture.task.clone(),
            OperationState::Processing,
        )),
        Box::new(UpdateNsInstanceStatusStep::new(
            fixture.task.clone(),
            NsInstanceState::Instantiated,
        )),
        Box::new(UpdateOperationStateStep::new(
            fixture.task.clone(),
            OperationState::Completed,
        )),
        Box::new(SetJobStatusStep::new(
            fixture.task.clone(),
            JobStatus::Finished,
            "Instantiation finished",
        )),
    ];

    for step in &steps {
        let outcome = invoker
            .invoke_with_error_boundary(step.as_ref(), &boundary, &mut ctx)
            .await;
        assert!(outcome.is_completed(), "{} failed: {outcome:?}", step.name());
    }

    let job = fixture.job("J1").await;
    assert_eq!(job.status, JobStatus::Finished);
    assert_eq!(job.process_instance_id.as_deref(), Some("proc-1"));
    assert_eq!(job.history().len(), 3);

    let occ = fixture
        .provider
        .get_ns_lcm_op_occ("occ-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(occ.operation_state, OperationState::Completed);
    assert_eq!(invoker.stats().completed, 5);
}

#[tokio::test]
async fn aborted_step_runs_error_boundary_with_its_problem_details() {
    let fixture = Fixture::new()
        .with_job("J1", JobStatus::Started)
        .await
        .with_occurrence("occ-1")
        .await
        .with_ns_instance("ns-1")
        .await;
    let invoker = StepInvoker::new(StepInvokerConfig::default(), fixture.events.clone());
    let step = CreateVnfsStep {
        task: fixture.task.clone(),
    };
    let boundary = SetJobStatusToErrorStep::new(fixture.task.clone(), "Instantiation failed");
    let mut ctx = StepContext::new()
        .with_job_id("J1")
        .with_occ_id("occ-1")
        .with_ns_inst_id("ns-1");

    let outcome = invoker
        .invoke_with_error_boundary(&step, &boundary, &mut ctx)
        .await;

    let StepOutcome::Aborted { abort, compensated } = outcome else {
        panic!("expected the step to abort");
    };
    assert_eq!(abort.kind(), AbortKind::StepFailed);
    assert!(compensated);

    let job = fixture.job("J1").await;
    assert_eq!(job.status, JobStatus::Error);
    let descriptions: Vec<_> = job
        .history()
        .iter()
        .map(|e| e.description.clone().unwrap_or_default())
        .collect();
    assert_eq!(
        descriptions[1..],
        [
            "Creating VNFs for vCPE".to_string(),
            "Unable to find VNF package for vnfd-1".to_string(),
            "Instantiation failed".to_string(),
        ]
    );

    let occ = fixture
        .provider
        .get_ns_lcm_op_occ("occ-1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(occ.operation_state, OperationState::Failed);
}

#[tokio::test]
async fn lost_job_race_is_retried_by_the_invoker() {
    let provider = Arc::new(FailingProvider::new(FailureMode::default()));
    provider
        .add_job(&NfvoJob::with_status(
            "J1",
            JobAction::Instantiate,
            "ns-1",
            JobStatus::Started,
        ))
        .await
        .unwrap();
    provider.set_mode(FailureMode {
        job_conflicts: 1,
        ..FailureMode::default()
    });

    let task = NetworkServiceTask::new(provider.clone(), EventPublisher::default());
    let invoker = StepInvoker::new(StepInvokerConfig::default(), EventPublisher::default());
    let step = SetJobStatusStep::new(task, JobStatus::Processing, "Creating VNFs");
    let mut ctx = StepContext::new().with_job_id("J1");

    let attempts = invoker.invoke(&step, &mut ctx).await.unwrap();

    assert_eq!(attempts, 2);
    assert!(ctx.problem_details().is_none());
    let job = provider.get_job("J1").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Processing);
    assert_eq!(job.history().len(), 2);
}

#[tokio::test]
async fn error_boundary_on_vanished_job_still_completes() {
    let fixture = Fixture::new();
    let invoker = StepInvoker::new(StepInvokerConfig::default(), fixture.events.clone());
    let step = SetJobStatusStep::new(fixture.task.clone(), JobStatus::Started, "x");
    let boundary = SetJobStatusToErrorStep::new(fixture.task.clone(), "failed");
    let mut ctx = StepContext::new()
        .with_job_id("J-gone")
        .with_process_instance_id("p");

    let outcome = invoker
        .invoke_with_error_boundary(&step, &boundary, &mut ctx)
        .await;

    match outcome {
        StepOutcome::Aborted { abort, compensated } => {
            assert_eq!(abort.kind(), AbortKind::NotFound);
            assert!(compensated);
        }
        other => panic!("expected abort, got {other:?}"),
    }
}

#[tokio::test]
async fn error_boundary_retries_a_lost_job_race() {
    let provider = Arc::new(FailingProvider::new(FailureMode::default()));
    provider
        .add_job(&NfvoJob::with_status(
            "J1",
            JobAction::Instantiate,
            "ns-1",
            JobStatus::Processing,
        ))
        .await
        .unwrap();
    provider.set_mode(FailureMode {
        job_conflicts: 1,
        ..FailureMode::default()
    });

    let task = NetworkServiceTask::new(provider.clone(), EventPublisher::default());
    let invoker = StepInvoker::new(StepInvokerConfig::default(), EventPublisher::default());
    // PROCESSING -> STARTING is rejected before anything is written
    let step = SetJobStatusStep::new(task.clone(), JobStatus::Starting, "Restarting");
    let boundary = SetJobStatusToErrorStep::new(task, "Instantiation failed");
    let mut ctx = StepContext::new().with_job_id("J1");

    let outcome = invoker
        .invoke_with_error_boundary(&step, &boundary, &mut ctx)
        .await;

    let StepOutcome::Aborted { abort, compensated } = outcome else {
        panic!("expected the step to abort");
    };
    assert_eq!(abort.kind(), AbortKind::InvalidTransition);
    assert!(compensated);
    assert_eq!(invoker.stats().conflict_retries, 1);
    assert_eq!(invoker.stats().compensations, 1);

    let job = provider.get_job("J1").await.unwrap().unwrap();
    assert_eq!(job.status, JobStatus::Error);
    assert!(job.end_time.is_some());

    // The retried boundary records the step's failure, not the lost race
    let descriptions: Vec<_> = job
        .history()
        .iter()
        .map(|e| e.description.clone().unwrap_or_default())
        .collect();
    assert_eq!(
        descriptions[1..],
        [
            abort.message().to_string(),
            "Instantiation failed".to_string(),
        ]
    );
}

//! # Job State Manager
//!
//! Owns a job's top-level status, start/end timestamps and step-instance
//! binding. Every status change is validated against
//! [`JobStateMachine`] and recorded in the job's history in the same write.

use super::job_status_ledger::JobStatusLedger;
use crate::constants::events;
use crate::database::DatabaseServiceProvider;
use crate::events::EventPublisher;
use crate::logging::log_job_operation;
use crate::models::{NfvoJob, NfvoJobStatus};
use crate::state_machine::{JobStateMachine, JobStatus};
use crate::workflow::abort::{abort_as, abort_on_storage_error, abort_on_transition_error};
use crate::workflow::{AbortKind, StepContext, StepResult};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// What `mark_error` did with the job named in the step context
#[derive(Debug, Clone, PartialEq)]
pub enum MarkErrorOutcome {
    /// Job moved to `ERROR`; `entries_added` history entries were appended
    Marked { entries_added: usize },
    /// The context names no job, or the job does not exist
    JobNotFound,
    /// Job was already terminal and was left untouched
    AlreadyTerminal(JobStatus),
}

#[derive(Clone)]
pub struct JobStateManager {
    provider: Arc<dyn DatabaseServiceProvider>,
    ledger: JobStatusLedger,
    event_publisher: EventPublisher,
}

impl JobStateManager {
    pub fn new(provider: Arc<dyn DatabaseServiceProvider>, event_publisher: EventPublisher) -> Self {
        Self {
            ledger: JobStatusLedger::new(provider.clone()),
            provider,
            event_publisher,
        }
    }

    /// Append a progress annotation without changing the job's status or timestamps
    pub async fn record_status(
        &self,
        ctx: &mut StepContext,
        status: JobStatus,
        description: &str,
    ) -> StepResult<()> {
        let job_id = require_job_id(ctx)?;

        match self.ledger.append(&job_id, status, description).await {
            Ok(job) => {
                self.event_publisher.publish(
                    events::JOB_STATUS_RECORDED,
                    json!({
                        "job_id": job.job_id,
                        "status": status,
                        "description": description,
                    }),
                );
                Ok(())
            }
            Err(err) if err.is_not_found() => Err(abort_as(
                ctx,
                AbortKind::NotFound,
                format!("Unable to find job using job id: {job_id}"),
            )),
            Err(err) => Err(abort_on_storage_error(
                ctx,
                &err,
                format!("Unable to add status to job {job_id}"),
            )),
        }
    }

    /// Move the job to `status`, applying the status-specific side effects:
    /// `STARTED` binds the step instance from the context, terminal statuses
    /// stamp `end_time`. Always appends a history entry.
    pub async fn transition_to(
        &self,
        ctx: &mut StepContext,
        status: JobStatus,
        description: &str,
    ) -> StepResult<NfvoJob> {
        info!("Setting Job Status to {status}");

        let job_id = require_job_id(ctx)?;
        let mut job = self.load_job(ctx, &job_id).await?;
        let from = job.status;

        if let Err(err) = JobStateMachine::validate(&job_id, from, status) {
            return Err(abort_on_transition_error(ctx, &err));
        }

        if status == JobStatus::Started {
            let Some(process_instance_id) = ctx.process_instance_id().map(str::to_string) else {
                return Err(abort_as(
                    ctx,
                    AbortKind::StepFailed,
                    format!("No step instance id in context while starting job {job_id}"),
                ));
            };
            job.process_instance_id = Some(process_instance_id);
        }

        job.status = status;
        if status.is_terminal() {
            job.end_time = Some(Utc::now());
        }
        job.push_status(NfvoJobStatus::new(status, Some(description.to_string())));

        self.save_job(ctx, &mut job).await?;

        log_job_operation("transition_to", Some(&job_id), status.as_str(), Some(description));
        self.event_publisher.publish(
            events::JOB_TRANSITIONED,
            json!({
                "job_id": job_id,
                "from_status": from,
                "to_status": status,
                "process_instance_id": job.process_instance_id,
            }),
        );

        Ok(job)
    }

    /// Move the job named in the context to `ERROR`.
    ///
    /// A missing job is not an abort: the outcome says so and the caller
    /// decides. When the context carries problem details, their message is
    /// recorded first; `description` is always recorded after it.
    pub async fn mark_error(
        &self,
        ctx: &mut StepContext,
        description: &str,
    ) -> StepResult<MarkErrorOutcome> {
        info!("Setting Job Status to {}", JobStatus::Error);

        let Some(job_id) = ctx.job_id().map(str::to_string) else {
            warn!("No job id in step context - nothing to mark as failed");
            return Ok(MarkErrorOutcome::JobNotFound);
        };

        let mut job = match self.provider.get_job(&job_id).await {
            Ok(Some(job)) => job,
            Ok(None) => {
                warn!(job_id = %job_id, "Unable to find job - nothing to mark as failed");
                return Ok(MarkErrorOutcome::JobNotFound);
            }
            Err(err) => {
                return Err(abort_on_storage_error(
                    ctx,
                    &err,
                    format!("Unable to load job {job_id}"),
                ))
            }
        };

        if job.is_terminal() {
            warn!(
                job_id = %job_id,
                status = %job.status,
                "Job already terminal - leaving it untouched"
            );
            return Ok(MarkErrorOutcome::AlreadyTerminal(job.status));
        }

        job.status = JobStatus::Error;
        job.end_time = Some(Utc::now());

        let mut entries_added = 0;
        if let Some(problem_details) = ctx.problem_details() {
            error!("Found failed reason: {problem_details}");
            job.push_status(NfvoJobStatus::new(
                JobStatus::Error,
                problem_details.message().map(str::to_string),
            ));
            entries_added += 1;
        }
        job.push_status(NfvoJobStatus::new(
            JobStatus::Error,
            Some(description.to_string()),
        ));
        entries_added += 1;

        self.save_job(ctx, &mut job).await?;

        log_job_operation("mark_error", Some(&job_id), JobStatus::Error.as_str(), Some(description));
        self.event_publisher.publish(
            events::JOB_FAILED,
            json!({
                "job_id": job_id,
                "description": description,
                "problem_details": ctx.problem_details(),
            }),
        );
        info!("Finished setting Job Status to {}", JobStatus::Error);

        Ok(MarkErrorOutcome::Marked { entries_added })
    }

    async fn load_job(&self, ctx: &mut StepContext, job_id: &str) -> StepResult<NfvoJob> {
        match self.provider.get_job(job_id).await {
            Ok(Some(job)) => Ok(job),
            Ok(None) => Err(abort_as(
                ctx,
                AbortKind::NotFound,
                format!("Unable to find job using job id: {job_id}"),
            )),
            Err(err) => Err(abort_on_storage_error(
                ctx,
                &err,
                format!("Unable to load job {job_id}"),
            )),
        }
    }

    async fn save_job(&self, ctx: &mut StepContext, job: &mut NfvoJob) -> StepResult<()> {
        match self.provider.add_job(job).await {
            Ok(version) => {
                job.version = version;
                Ok(())
            }
            Err(err) => Err(abort_on_storage_error(
                ctx,
                &err,
                format!("Unable to save job {}", job.job_id),
            )),
        }
    }
}

fn require_job_id(ctx: &mut StepContext) -> StepResult<String> {
    match ctx.job_id().map(str::to_string) {
        Some(job_id) => Ok(job_id),
        None => Err(abort_as(
            ctx,
            AbortKind::NotFound,
            "No job id found in step context",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::InMemoryDatabaseServiceProvider;
    use crate::models::JobAction;

    async fn manager_with_job(status: JobStatus) -> (JobStateManager, Arc<InMemoryDatabaseServiceProvider>) {
        let provider = Arc::new(InMemoryDatabaseServiceProvider::new());
        provider
            .add_job(&NfvoJob::with_status("J1", JobAction::Instantiate, "ns-1", status))
            .await
            .unwrap();
        (
            JobStateManager::new(provider.clone(), EventPublisher::default()),
            provider,
        )
    }

    #[tokio::test]
    async fn test_starting_binds_step_instance() {
        let (manager, _) = manager_with_job(JobStatus::Starting).await;
        let mut ctx = StepContext::new()
            .with_job_id("J1")
            .with_process_instance_id("step-7");

        let job = manager
            .transition_to(&mut ctx, JobStatus::Started, "Instantiation started")
            .await
            .unwrap();

        assert_eq!(job.process_instance_id.as_deref(), Some("step-7"));
        assert!(job.end_time.is_none());
    }

    #[tokio::test]
    async fn test_starting_without_step_instance_aborts() {
        let (manager, provider) = manager_with_job(JobStatus::Starting).await;
        let mut ctx = StepContext::new().with_job_id("J1");

        let err = manager
            .transition_to(&mut ctx, JobStatus::Started, "x")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), AbortKind::StepFailed);
        let stored = provider.get_job("J1").await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Starting);
    }

    #[tokio::test]
    async fn test_missing_job_id_aborts() {
        let (manager, _) = manager_with_job(JobStatus::Started).await;
        let mut ctx = StepContext::new();

        let err = manager
            .record_status(&mut ctx, JobStatus::Processing, "x")
            .await
            .unwrap_err();

        assert_eq!(err.kind(), AbortKind::NotFound);
        assert!(ctx.problem_details().is_some());
    }

    #[tokio::test]
    async fn test_mark_error_on_terminal_job_is_untouched() {
        let (manager, provider) = manager_with_job(JobStatus::Finished).await;
        let mut ctx = StepContext::new().with_job_id("J1");

        let outcome = manager.mark_error(&mut ctx, "late failure").await.unwrap();

        assert_eq!(outcome, MarkErrorOutcome::AlreadyTerminal(JobStatus::Finished));
        let stored = provider.get_job("J1").await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Finished);
        assert_eq!(stored.history().len(), 1);
    }
}

use crate::database::{DatabaseServiceProvider, StorageError, StorageResult};
use crate::models::{NfvoJob, NfvoJobStatus};
use crate::state_machine::JobStatus;
use std::sync::Arc;
use tracing::info;

/// Append-only per-job history of status entries.
///
/// Missing jobs are reported as [`StorageError::NotFound`]; turning that into
/// an abort is the caller's decision.
#[derive(Clone)]
pub struct JobStatusLedger {
    provider: Arc<dyn DatabaseServiceProvider>,
}

impl JobStatusLedger {
    pub fn new(provider: Arc<dyn DatabaseServiceProvider>) -> Self {
        Self { provider }
    }

    /// Stamp a new entry with the current time, append it and persist the job
    pub async fn append(
        &self,
        job_id: &str,
        status: JobStatus,
        description: impl Into<String>,
    ) -> StorageResult<NfvoJob> {
        let mut job = self
            .provider
            .get_job(job_id)
            .await?
            .ok_or_else(|| StorageError::not_found("job", job_id))?;

        let entry = NfvoJobStatus::new(status, Some(description.into()));
        info!(job_id, %entry, "Adding NfvoJobStatus");

        job.push_status(entry);
        job.version = self.provider.add_job(&job).await?;
        Ok(job)
    }
}

//! # NFVO Job Model
//!
//! Tracked record of one asynchronously executing NS lifecycle operation.
//!
//! A job carries its top-level [`JobStatus`], the workflow step instance it is
//! bound to, start/end timestamps, and an append-only history of
//! [`NfvoJobStatus`] entries that forms the audit trail returned to callers
//! polling the job.
//!
//! ## Concurrency
//!
//! `version` is an optimistic concurrency token. Storage providers accept a
//! write only when the stored version equals the version the caller read, and
//! bump it on success.

use crate::state_machine::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Lifecycle action a job carries out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobAction {
    Create,
    Instantiate,
    Terminate,
    Delete,
}

impl JobAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Create => "CREATE",
            Self::Instantiate => "INSTANTIATE",
            Self::Terminate => "TERMINATE",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for JobAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CREATE" => Ok(Self::Create),
            "INSTANTIATE" => Ok(Self::Instantiate),
            "TERMINATE" => Ok(Self::Terminate),
            "DELETE" => Ok(Self::Delete),
            _ => Err(format!("Invalid job action: {s}")),
        }
    }
}

/// One immutable, timestamped audit-trail entry of a job
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfvoJobStatus {
    pub status: JobStatus,
    pub description: Option<String>,
    pub updated_time: DateTime<Utc>,
}

impl NfvoJobStatus {
    pub fn new(status: JobStatus, description: Option<String>) -> Self {
        Self {
            status,
            description,
            updated_time: Utc::now(),
        }
    }
}

impl fmt::Display for NfvoJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "NfvoJobStatus {{ status: {}, description: {:?}, updated_time: {} }}",
            self.status,
            self.description,
            self.updated_time.to_rfc3339()
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NfvoJob {
    pub job_id: String,
    pub job_type: Option<String>,
    pub job_action: JobAction,
    pub resource_id: Option<String>,
    pub resource_name: Option<String>,
    pub status: JobStatus,
    pub progress: Option<i32>,
    /// Workflow step instance currently driving the job
    pub process_instance_id: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: Option<DateTime<Utc>>,
    history: Vec<NfvoJobStatus>,
    pub version: i64,
}

impl NfvoJob {
    /// Create a job in `STARTING` with a fresh id and one initial history entry
    pub fn new(job_action: JobAction, resource_id: impl Into<String>) -> Self {
        Self::with_status(
            Uuid::new_v4().to_string(),
            job_action,
            resource_id,
            JobStatus::Starting,
        )
    }

    /// Create a job with an explicit id and initial status
    pub fn with_status(
        job_id: impl Into<String>,
        job_action: JobAction,
        resource_id: impl Into<String>,
        status: JobStatus,
    ) -> Self {
        Self {
            job_id: job_id.into(),
            job_type: None,
            job_action,
            resource_id: Some(resource_id.into()),
            resource_name: None,
            status,
            progress: None,
            process_instance_id: None,
            start_time: Utc::now(),
            end_time: None,
            history: vec![NfvoJobStatus::new(
                status,
                Some(format!("{job_action} job created")),
            )],
            version: 0,
        }
    }

    /// Rebuild a job from persisted parts; used by storage providers
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn from_parts(
        job_id: String,
        job_type: Option<String>,
        job_action: JobAction,
        resource_id: Option<String>,
        resource_name: Option<String>,
        status: JobStatus,
        progress: Option<i32>,
        process_instance_id: Option<String>,
        start_time: DateTime<Utc>,
        end_time: Option<DateTime<Utc>>,
        history: Vec<NfvoJobStatus>,
        version: i64,
    ) -> Self {
        Self {
            job_id,
            job_type,
            job_action,
            resource_id,
            resource_name,
            status,
            progress,
            process_instance_id,
            start_time,
            end_time,
            history,
            version,
        }
    }

    pub fn resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = Some(resource_name.into());
        self
    }

    pub fn job_type(mut self, job_type: impl Into<String>) -> Self {
        self.job_type = Some(job_type.into());
        self
    }

    /// Append an entry to the audit trail. Entries are never altered or removed.
    pub fn push_status(&mut self, entry: NfvoJobStatus) {
        self.history.push(entry);
    }

    pub fn history(&self) -> &[NfvoJobStatus] {
        &self.history
    }

    pub fn last_status_entry(&self) -> Option<&NfvoJobStatus> {
        self.history.last()
    }

    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

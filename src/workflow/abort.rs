//! # Abort Protocol
//!
//! The single failure-propagation primitive of the core. Aborting stores
//! problem details into the step context under the well-known
//! `nsWorkflowProcessingException` variable and yields a [`WorkflowAbort`]
//! carrying error code [`WORKFLOW_FAILED`]. Every core operation returns
//! [`StepResult`], so the step body propagates the signal with `?` and the
//! step invoker catches it exactly once at the top of the step.
//!
//! ```rust
//! use nfvo_lcm_core::workflow::{abort, AbortKind, StepContext, StepResult};
//!
//! fn check_vnfd(ctx: &mut StepContext, vnfd_id: Option<&str>) -> StepResult<String> {
//!     match vnfd_id {
//!         Some(id) => Ok(id.to_string()),
//!         None => Err(abort(ctx, "Unable to find VNFD id in request")),
//!     }
//! }
//!
//! let mut ctx = StepContext::new();
//! let err = check_vnfd(&mut ctx, None).unwrap_err();
//! assert_eq!(err.kind(), AbortKind::StepFailed);
//! assert_eq!(
//!     ctx.problem_details().and_then(|p| p.message()),
//!     Some("Unable to find VNFD id in request")
//! );
//! ```

use super::context::StepContext;
use crate::constants::WORKFLOW_FAILED;
use crate::database::StorageError;
use crate::models::ProblemDetails;
use crate::state_machine::StateMachineError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Why a step was aborted; lets the step invoker pick compensation or retry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AbortKind {
    /// Explicit abort raised by step code
    StepFailed,
    /// Job, occurrence or NS instance is missing
    NotFound,
    /// A conditional write did not take effect
    WriteRejected,
    /// Lost an optimistic concurrency race; safe to retry the step
    Conflict,
    /// Requested status change is not in the transition table
    InvalidTransition,
    StorageUnavailable,
    /// Structured failure reported by an upstream collaborator
    Upstream,
}

impl AbortKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StepFailed => "step_failed",
            Self::NotFound => "not_found",
            Self::WriteRejected => "write_rejected",
            Self::Conflict => "conflict",
            Self::InvalidTransition => "invalid_transition",
            Self::StorageUnavailable => "storage_unavailable",
            Self::Upstream => "upstream",
        }
    }
}

impl fmt::Display for AbortKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&StorageError> for AbortKind {
    fn from(err: &StorageError) -> Self {
        match err {
            StorageError::NotFound { .. } => Self::NotFound,
            StorageError::ConcurrentConflict { .. } => Self::Conflict,
            StorageError::AlreadyExists { .. } => Self::WriteRejected,
            _ => Self::StorageUnavailable,
        }
    }
}

/// Abort signal: terminates the current step and hands problem details to the invoker
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{error_code} ({kind}): {message}")]
pub struct WorkflowAbort {
    error_code: &'static str,
    kind: AbortKind,
    message: String,
    problem_details: ProblemDetails,
}

impl WorkflowAbort {
    pub fn error_code(&self) -> &'static str {
        self.error_code
    }

    pub fn kind(&self) -> AbortKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn problem_details(&self) -> &ProblemDetails {
        &self.problem_details
    }

    /// Conflicts are the only aborts a fresh re-run of the step can resolve
    pub fn is_retryable(&self) -> bool {
        self.kind == AbortKind::Conflict
    }
}

/// Result of a core operation invoked from a workflow step
pub type StepResult<T> = Result<T, WorkflowAbort>;

/// Abort the current step with minimal problem details built from `message`
pub fn abort(ctx: &mut StepContext, message: impl Into<String>) -> WorkflowAbort {
    abort_as(ctx, AbortKind::StepFailed, message)
}

/// Abort the current step with caller-supplied problem details, passed through as-is
pub fn abort_with_problem_details(
    ctx: &mut StepContext,
    message: impl Into<String>,
    problem_details: ProblemDetails,
) -> WorkflowAbort {
    raise(ctx, AbortKind::Upstream, message.into(), problem_details)
}

/// Abort with an explicit kind and minimal problem details
pub(crate) fn abort_as(
    ctx: &mut StepContext,
    kind: AbortKind,
    message: impl Into<String>,
) -> WorkflowAbort {
    let message = message.into();
    let problem_details = ProblemDetails::from_detail(message.clone());
    raise(ctx, kind, message, problem_details)
}

/// Funnel a storage failure into the abort protocol
pub(crate) fn abort_on_storage_error(
    ctx: &mut StepContext,
    err: &StorageError,
    message: impl Into<String>,
) -> WorkflowAbort {
    let message = format!("{}: {err}", message.into());
    abort_as(ctx, AbortKind::from(err), message)
}

/// Funnel a rejected status transition into the abort protocol
pub(crate) fn abort_on_transition_error(
    ctx: &mut StepContext,
    err: &StateMachineError,
) -> WorkflowAbort {
    abort_as(ctx, AbortKind::InvalidTransition, err.to_string())
}

fn raise(
    ctx: &mut StepContext,
    kind: AbortKind,
    message: String,
    problem_details: ProblemDetails,
) -> WorkflowAbort {
    tracing::error!(
        error_code = WORKFLOW_FAILED,
        kind = %kind,
        job_id = ctx.job_id(),
        occ_id = ctx.occ_id(),
        ns_inst_id = ctx.ns_inst_id(),
        "{message}"
    );

    ctx.set_problem_details(problem_details.clone());

    WorkflowAbort {
        error_code: WORKFLOW_FAILED,
        kind,
        message,
        problem_details,
    }
}

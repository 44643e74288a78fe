#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # NFVO NS LCM Core
//!
//! Job, operation-occurrence and abort-protocol core for network service
//! lifecycle workflows.
//!
//! ## Overview
//!
//! Lifecycle operations on a network service (instantiate, terminate, ...)
//! run as long multi-step workflows driven by an external orchestration
//! engine. This crate tracks them: every operation has an [`NfvoJob`] with a
//! status and an append-only audit trail, an [`NsLcmOpOcc`] operation
//! occurrence, and an [`NfvoNsInst`] whose lifecycle state it changes.
//!
//! Any failure inside a step goes through one mechanism, the abort protocol
//! in [`workflow::abort`]: problem details are stored in the step context and
//! a typed [`WorkflowAbort`] unwinds the step, to be caught once by the
//! [`StepInvoker`].
//!
//! ## Module Organization
//!
//! - [`state_machine`] - status enums and transition tables
//! - [`models`] - jobs, operation occurrences, NS instances, problem details
//! - [`database`] - the `DatabaseServiceProvider` capability and its providers
//! - [`services`] - job, occurrence and NS instance state managers
//! - [`workflow`] - step context, abort protocol and step invoker
//! - [`tasks`] - per-step facade and reusable workflow steps
//! - [`vnfm`] - SOL003 VNFM adapter client interface
//! - [`events`] - broadcast of state changes
//! - [`config`] / [`logging`] / [`error`] - ambient plumbing
//!
//! ## Quick Start
//!
//! ```rust
//! use nfvo_lcm_core::database::{DatabaseServiceProvider, InMemoryDatabaseServiceProvider};
//! use nfvo_lcm_core::events::EventPublisher;
//! use nfvo_lcm_core::models::{JobAction, NfvoJob};
//! use nfvo_lcm_core::state_machine::JobStatus;
//! use nfvo_lcm_core::tasks::NetworkServiceTask;
//! use nfvo_lcm_core::workflow::StepContext;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let provider = Arc::new(InMemoryDatabaseServiceProvider::new());
//! let job = NfvoJob::new(JobAction::Instantiate, "ns-1");
//! provider.add_job(&job).await?;
//!
//! let task = NetworkServiceTask::new(provider.clone(), EventPublisher::default());
//! let mut ctx = StepContext::new()
//!     .with_job_id(job.job_id.clone())
//!     .with_process_instance_id("step-1");
//!
//! task.set_job_status(&mut ctx, JobStatus::Started, "Instantiation started").await?;
//! task.set_job_status(&mut ctx, JobStatus::Finished, "Instantiation finished").await?;
//!
//! let stored = provider.get_job(&job.job_id).await?.expect("job exists");
//! assert_eq!(stored.status, JobStatus::Finished);
//! assert_eq!(stored.history().len(), 3);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod models;
pub mod services;
pub mod state_machine;
pub mod tasks;
pub mod utils;
pub mod vnfm;
pub mod workflow;

pub use crate::config::{DatabaseConfig, EventConfig, LcmConfig, LoggingConfig, StepInvokerConfig};
pub use constants::{status_groups, variables, WORKFLOW_FAILED};
pub use database::{DatabaseServiceProvider, InMemoryDatabaseServiceProvider, StorageError};
pub use error::{LcmError, Result};
pub use events::{EventPublisher, PublishedEvent};
pub use models::{JobAction, NfvoJob, NfvoJobStatus, NfvoNsInst, NsLcmOpOcc, ProblemDetails};
pub use services::{
    JobStateManager, JobStatusLedger, MarkErrorOutcome, NsInstanceAccessor,
    OperationOccurrenceManager,
};
pub use state_machine::{JobStatus, NsInstanceState, OperationState};
pub use tasks::NetworkServiceTask;
pub use workflow::{
    abort, abort_with_problem_details, AbortKind, StepContext, StepInvoker, StepOutcome,
    StepResult, WorkflowAbort, WorkflowStep,
};

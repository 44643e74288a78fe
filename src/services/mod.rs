//! # Lifecycle Services
//!
//! The state-tracking managers a workflow step calls into. Each one loads
//! state through the injected `DatabaseServiceProvider`, validates, writes,
//! and either returns `Ok` or aborts through [`crate::workflow::abort`].

pub mod job_state_manager;
pub mod job_status_ledger;
pub mod ns_instance_accessor;
pub mod operation_occurrence_manager;

pub use job_state_manager::{JobStateManager, MarkErrorOutcome};
pub use job_status_ledger::JobStatusLedger;
pub use ns_instance_accessor::NsInstanceAccessor;
pub use operation_occurrence_manager::OperationOccurrenceManager;

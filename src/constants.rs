//! # System Constants
//!
//! Step-context variable names, the abort error code, and the event names
//! published on state changes.

pub use crate::state_machine::{JobStatus, NsInstanceState, OperationState};

/// Error code carried by every abort signal
pub const WORKFLOW_FAILED: &str = "WORKFLOW_FAILED";

/// Names of the step-local variables the engine hands to each step
pub mod variables {
    pub const JOB_ID_PARAM_NAME: &str = "jobId";
    pub const OCC_ID_PARAM_NAME: &str = "occId";
    pub const NS_INSTANCE_ID_PARAM_NAME: &str = "nsInstId";
    pub const PROCESS_INSTANCE_ID_PARAM_NAME: &str = "processInstanceId";
    pub const NS_WORKFLOW_PROCESSING_EXCEPTION_PARAM_NAME: &str = "nsWorkflowProcessingException";
}

/// Events published when tracked entities change state
pub mod events {
    pub const JOB_STATUS_RECORDED: &str = "job.status_recorded";
    pub const JOB_TRANSITIONED: &str = "job.transitioned";
    pub const JOB_FAILED: &str = "job.failed";

    pub const OPERATION_STATE_CHANGED: &str = "ns_lcm_op_occ.operation_state_changed";

    pub const NS_INSTANCE_STATE_CHANGED: &str = "ns_instance.state_changed";

    pub const STEP_ABORTED: &str = "workflow.step_aborted";
}

/// Status groupings used by callers polling job progress
pub mod status_groups {
    use super::JobStatus;

    pub const TERMINAL: [JobStatus; 2] = [JobStatus::Finished, JobStatus::Error];
    pub const ACTIVE: [JobStatus; 2] = [JobStatus::Started, JobStatus::Processing];
}

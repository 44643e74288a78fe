pub mod job;
pub mod ns_instance;
pub mod ns_lcm_op_occ;
pub mod problem_details;

// Re-export core models for easy access
pub use job::{JobAction, NfvoJob, NfvoJobStatus};
pub use ns_instance::NfvoNsInst;
pub use ns_lcm_op_occ::{NsLcmOpOcc, NsLcmOpType};
pub use problem_details::ProblemDetails;

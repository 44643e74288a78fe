// State machine module for NS lifecycle jobs and operation occurrences
//
// Status enums plus explicit transition tables. The tables are consulted by the
// services layer before any status write reaches storage.

pub mod errors;
pub mod job_state_machine;
pub mod operation_state_machine;
pub mod states;

// Re-export main types for convenient access
pub use errors::{StateMachineError, StateMachineResult};
pub use job_state_machine::JobStateMachine;
pub use operation_state_machine::OperationStateMachine;
pub use states::{JobStatus, NsInstanceState, OperationState};

use crate::database::StorageError;
use crate::state_machine::StateMachineError;
use crate::workflow::WorkflowAbort;
use thiserror::Error;

/// Crate-level error for callers that sit outside a workflow step
/// (bootstrapping, configuration, direct storage access)
#[derive(Debug, Error)]
pub enum LcmError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
    #[error("State transition error: {0}")]
    StateTransition(#[from] StateMachineError),
    #[error("Workflow aborted: {0}")]
    WorkflowAborted(#[from] WorkflowAbort),
    #[error("Configuration error: {0}")]
    Configuration(String),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<config::ConfigError> for LcmError {
    fn from(err: config::ConfigError) -> Self {
        LcmError::Configuration(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, LcmError>;

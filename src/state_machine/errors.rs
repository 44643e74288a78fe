use thiserror::Error;

/// Errors raised while validating a state transition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateMachineError {
    #[error("Invalid state transition for {entity} {entity_id} from {from} to {to}")]
    InvalidTransition {
        entity: &'static str,
        entity_id: String,
        from: String,
        to: String,
    },
}

/// Result type alias for state machine operations
pub type StateMachineResult<T> = Result<T, StateMachineError>;

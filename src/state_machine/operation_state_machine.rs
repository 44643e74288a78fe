use super::{
    errors::{StateMachineError, StateMachineResult},
    states::OperationState,
};

/// Transition table for NS LCM operation occurrences
pub struct OperationStateMachine;

impl OperationStateMachine {
    pub fn can_transition(from: OperationState, to: OperationState) -> bool {
        use OperationState::*;

        matches!(
            (from, to),
            (Starting, Processing)
                | (Starting, Completed)
                | (Starting, Failed)
                | (Processing, Processing)
                | (Processing, Completed)
                | (Processing, Failed)
        )
    }

    /// States from which a move to `to` is legal
    pub fn allowed_sources(to: OperationState) -> Vec<OperationState> {
        OperationState::ALL
            .into_iter()
            .filter(|from| Self::can_transition(*from, to))
            .collect()
    }

    pub fn validate(occ_id: &str, from: OperationState, to: OperationState) -> StateMachineResult<()> {
        if Self::can_transition(from, to) {
            return Ok(());
        }

        Err(StateMachineError::InvalidTransition {
            entity: "operation occurrence",
            entity_id: occ_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

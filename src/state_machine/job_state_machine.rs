use super::{
    errors::{StateMachineError, StateMachineResult},
    states::JobStatus,
};

/// Transition table for job statuses.
///
/// `STARTED -> STARTED` is allowed so a resumed workflow can rebind the job to
/// its new step instance. Terminal statuses have no outgoing transitions.
pub struct JobStateMachine;

impl JobStateMachine {
    /// Check whether `from -> to` is a legal job status transition
    pub fn can_transition(from: JobStatus, to: JobStatus) -> bool {
        use JobStatus::*;

        matches!(
            (from, to),
            (Starting, Started)
                | (Starting, Error)
                | (Started, Started)
                | (Started, Processing)
                | (Started, Finished)
                | (Started, Error)
                | (Processing, Processing)
                | (Processing, Finished)
                | (Processing, Error)
        )
    }

    /// Validate a transition, returning a typed error when it is illegal
    pub fn validate(job_id: &str, from: JobStatus, to: JobStatus) -> StateMachineResult<()> {
        if Self::can_transition(from, to) {
            return Ok(());
        }

        Err(StateMachineError::InvalidTransition {
            entity: "job",
            entity_id: job_id.to_string(),
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [JobStatus; 5] = [
        JobStatus::Starting,
        JobStatus::Started,
        JobStatus::Processing,
        JobStatus::Finished,
        JobStatus::Error,
    ];

    #[test]
    fn test_legal_transitions() {
        assert!(JobStateMachine::can_transition(JobStatus::Starting, JobStatus::Started));
        assert!(JobStateMachine::can_transition(JobStatus::Started, JobStatus::Finished));
        assert!(JobStateMachine::can_transition(JobStatus::Processing, JobStatus::Error));
        assert!(JobStateMachine::can_transition(JobStatus::Started, JobStatus::Started));
    }

    #[test]
    fn test_terminal_statuses_are_closed() {
        for from in [JobStatus::Finished, JobStatus::Error] {
            for to in ALL {
                assert!(
                    !JobStateMachine::can_transition(from, to),
                    "{from} -> {to} must be rejected"
                );
            }
        }
    }

    #[test]
    fn test_no_transition_back_to_starting() {
        for from in ALL {
            assert!(!JobStateMachine::can_transition(from, JobStatus::Starting));
        }
    }

    #[test]
    fn test_invalid_transition_error_message() {
        let err = JobStateMachine::validate("J1", JobStatus::Finished, JobStatus::Processing)
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid state transition for job J1 from FINISHED to PROCESSING"
        );
    }
}

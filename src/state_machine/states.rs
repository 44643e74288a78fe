use serde::{Deserialize, Serialize};
use std::fmt;

/// Job status definitions for asynchronously executed lifecycle operations
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Job has been created by the initiator but no workflow step has run yet
    #[default]
    Starting,
    /// Workflow has picked up the job and bound a step instance to it
    Started,
    /// Job is being processed by intermediate workflow steps
    Processing,
    /// Job completed successfully
    Finished,
    /// Job failed
    Error,
}

impl JobStatus {
    /// Check if this is a terminal status (no further transitions allowed)
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Finished | Self::Error)
    }

    /// Check if this is an active status (a workflow is driving the job)
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Started | Self::Processing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::Started => "STARTED",
            Self::Processing => "PROCESSING",
            Self::Finished => "FINISHED",
            Self::Error => "ERROR",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTING" => Ok(Self::Starting),
            "STARTED" => Ok(Self::Started),
            "PROCESSING" => Ok(Self::Processing),
            "FINISHED" => Ok(Self::Finished),
            "ERROR" => Ok(Self::Error),
            _ => Err(format!("Invalid job status: {s}")),
        }
    }
}

/// Operation state of a single NS lifecycle operation occurrence
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationState {
    #[default]
    Starting,
    Processing,
    Completed,
    Failed,
}

impl OperationState {
    pub const ALL: [OperationState; 4] = [
        Self::Starting,
        Self::Processing,
        Self::Completed,
        Self::Failed,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starting => "STARTING",
            Self::Processing => "PROCESSING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for OperationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OperationState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STARTING" => Ok(Self::Starting),
            "PROCESSING" => Ok(Self::Processing),
            "COMPLETED" => Ok(Self::Completed),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid operation state: {s}")),
        }
    }
}

/// Coarse lifecycle state of a network service instance
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NsInstanceState {
    #[default]
    NotInstantiated,
    Instantiated,
    Failed,
}

impl NsInstanceState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::NotInstantiated => "NOT_INSTANTIATED",
            Self::Instantiated => "INSTANTIATED",
            Self::Failed => "FAILED",
        }
    }
}

impl fmt::Display for NsInstanceState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NsInstanceState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NOT_INSTANTIATED" => Ok(Self::NotInstantiated),
            "INSTANTIATED" => Ok(Self::Instantiated),
            "FAILED" => Ok(Self::Failed),
            _ => Err(format!("Invalid NS instance state: {s}")),
        }
    }
}

//! Error types for the deploy pipeline.
//!
//! Uses `thiserror` for library errors. Every external-command failure is
//! tagged with the [`Stage`] it happened in, so a broken deploy reports
//! which step to look at instead of a bare exit code.

use std::io;

use thiserror::Error;

use crate::pipeline::Stage;

/// Result type alias for deploy operations
pub type DeployResult<T> = Result<T, DeployError>;

/// Main error type for deploy operations
#[derive(Error, Debug)]
pub enum DeployError {
    /// The stage's command could not be spawned at all (tool not installed,
    /// working directory missing)
    #[error("{stage} command could not be started: {source}")]
    Spawn {
        stage: Stage,
        #[source]
        source: io::Error,
    },

    /// The stage's command ran and exited non-zero
    #[error("{stage} failed with exit code {code}")]
    StageFailed { stage: Stage, code: i32 },

    /// The stage's command was killed by a signal before exiting
    #[error("{stage} was terminated by a signal")]
    StageKilled { stage: Stage },

    /// IO error while managing local artifacts
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl DeployError {
    /// The pipeline stage this error belongs to, if any.
    pub fn stage(&self) -> Option<Stage> {
        match self {
            DeployError::Spawn { stage, .. }
            | DeployError::StageFailed { stage, .. }
            | DeployError::StageKilled { stage } => Some(*stage),
            DeployError::Io(_) => None,
        }
    }
}

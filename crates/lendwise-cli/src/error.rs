//! Error types for lendwise-cli

use std::path::PathBuf;
use std::process::ExitCode;

use lendwise::validation::ValidationReport;
use lendwise::LendError;
use thiserror::Error;

/// Result type alias for CLI operations
pub(crate) type Result<T> = std::result::Result<T, CliError>;

/// CLI error types
#[derive(Error, Debug)]
pub(crate) enum CliError {
    /// Applicant input broke field constraints
    #[error("input rejected with {} violation(s)", .0.len())]
    Invalid(ValidationReport),

    /// Library error other than validation and IO
    #[error(transparent)]
    Lend(LendError),

    /// Applicant input file could not be parsed
    #[error("invalid input file {}: {reason}", path.display())]
    InputFile { path: PathBuf, reason: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON output could not be produced
    #[error("JSON encoding failed: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Get exit code for this error
    pub(crate) fn exit_code(&self) -> ExitCode {
        match self {
            Self::Invalid(_) => ExitCode::from(2),
            Self::Lend(LendError::ArtifactNotFound { .. }) => ExitCode::from(3),
            Self::Lend(LendError::ArtifactCorrupt { .. }) => ExitCode::from(4),
            Self::Lend(LendError::PredictionFailed { .. }) => ExitCode::from(5),
            Self::Lend(LendError::Validation(_)) => ExitCode::from(2),
            Self::Lend(LendError::Config(_)) | Self::InputFile { .. } | Self::Json(_) => {
                ExitCode::from(6)
            }
            Self::Lend(LendError::Io(_)) | Self::Io(_) => ExitCode::from(7),
        }
    }
}

impl From<LendError> for CliError {
    fn from(e: LendError) -> Self {
        match e {
            LendError::Validation(report) => Self::Invalid(report),
            LendError::Io(io) => Self::Io(io),
            other => Self::Lend(other),
        }
    }
}

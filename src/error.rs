//! Error types for lendwise operations.
//!
//! Every failure a user can hit maps to one variant here so the presentation
//! layer can report it in plain language.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::validation::ValidationReport;

/// Main error type for lendwise operations.
///
/// # Examples
///
/// ```
/// use lendwise::error::LendError;
///
/// let err = LendError::artifact_not_found("gb_model.json");
/// assert!(err.to_string().contains("gb_model.json"));
/// assert!(err.is_fatal());
/// ```
#[derive(Debug, Error)]
pub enum LendError {
    /// The applicant input broke one or more field constraints.
    ///
    /// Always recoverable: the user corrects the fields and resubmits.
    #[error("{0}")]
    Validation(ValidationReport),

    /// The classifier artifact does not exist at the configured path.
    #[error("model artifact not found: {}", path.display())]
    ArtifactNotFound {
        /// Path that was looked up
        path: PathBuf,
    },

    /// The classifier artifact exists but cannot be used.
    #[error("model artifact {} is corrupt: {reason}", path.display())]
    ArtifactCorrupt {
        /// Path of the artifact
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// Scoring a feature vector failed.
    #[error("prediction failed: {reason}")]
    PredictionFailed {
        /// Failure details
        reason: String,
    },

    /// Configuration could not be loaded or is out of bounds.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// I/O error while reading an artifact or input file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl LendError {
    /// Creates an artifact-not-found error.
    #[must_use]
    pub fn artifact_not_found(path: impl AsRef<Path>) -> Self {
        Self::ArtifactNotFound {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Creates an artifact-corrupt error.
    #[must_use]
    pub fn artifact_corrupt(path: impl AsRef<Path>, reason: impl Into<String>) -> Self {
        Self::ArtifactCorrupt {
            path: path.as_ref().to_path_buf(),
            reason: reason.into(),
        }
    }

    /// Creates a prediction-failed error.
    #[must_use]
    pub fn prediction_failed(reason: impl Into<String>) -> Self {
        Self::PredictionFailed {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }

    /// Returns true when no submission can succeed until the operator acts.
    ///
    /// Artifact failures are fatal at startup; validation and prediction
    /// failures only affect the current submission.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ArtifactNotFound { .. } | Self::ArtifactCorrupt { .. } | Self::Config(_)
        )
    }

    /// Returns the violation report if this is a validation error.
    #[must_use]
    pub fn violations(&self) -> Option<&ValidationReport> {
        match self {
            Self::Validation(report) => Some(report),
            _ => None,
        }
    }
}

impl From<ValidationReport> for LendError {
    fn from(report: ValidationReport) -> Self {
        Self::Validation(report)
    }
}

/// Convenience type alias for Results.
pub type Result<T> = std::result::Result<T, LendError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Violation;

    #[test]
    fn test_artifact_not_found_display() {
        let err = LendError::artifact_not_found("/models/gb_model.json");
        let msg = err.to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("/models/gb_model.json"));
    }

    #[test]
    fn test_artifact_corrupt_display() {
        let err = LendError::artifact_corrupt("model.bin", "unexpected end of file");
        let msg = err.to_string();
        assert!(msg.contains("model.bin"));
        assert!(msg.contains("unexpected end of file"));
    }

    #[test]
    fn test_prediction_failed_display() {
        let err = LendError::prediction_failed("expected 27 features, got 26");
        assert!(err.to_string().contains("expected 27 features, got 26"));
    }

    #[test]
    fn test_validation_display_lists_every_violation() {
        let report = ValidationReport::from(vec![
            Violation::MissingRequired,
            Violation::ExperienceExceedsWorkingYears {
                experience: 10,
                working_years: 4,
                min_working_age: 16,
            },
        ]);
        let err = LendError::from(report);
        let msg = err.to_string();
        assert!(msg.contains("required fields"));
        assert!(msg.contains("Employment experience"));
        assert_eq!(err.violations().map(ValidationReport::len), Some(2));
    }

    #[test]
    fn test_fatality() {
        assert!(LendError::artifact_not_found("m.json").is_fatal());
        assert!(LendError::artifact_corrupt("m.json", "bad").is_fatal());
        assert!(LendError::config("bad").is_fatal());
        assert!(!LendError::prediction_failed("boom").is_fatal());
        let report = ValidationReport::from(vec![Violation::MissingRequired]);
        assert!(!LendError::from(report).is_fatal());
    }

    #[test]
    fn test_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: LendError = io_err.into();
        assert!(matches!(err, LendError::Io(_)));
        assert!(std::error::Error::source(&err).is_some());
    }
}

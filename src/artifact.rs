//! Model artifact persistence.
//!
//! An artifact bundles everything needed to score applicants: the ordered
//! feature column names the model was trained on, the ordered class labels,
//! and the boosted trees. Two encodings are supported, chosen by file
//! extension:
//!
//! - `.json` - human-readable, diffable
//! - `.bin` - compact bincode

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LendError, Result};
use crate::tree::GradientBoostingClassifier;

/// Newest artifact layout this build understands.
pub const FORMAT_VERSION: u32 = 1;

/// Supported artifact file formats.
///
/// # Example
///
/// ```
/// use lendwise::artifact::ArtifactFormat;
///
/// assert_eq!(ArtifactFormat::from_extension("JSON"), Some(ArtifactFormat::Json));
/// assert_eq!(ArtifactFormat::from_extension("pkl"), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum ArtifactFormat {
    /// JSON via `serde_json`.
    #[default]
    Json,
    /// Binary via `bincode`.
    Binary,
}

impl ArtifactFormat {
    /// Determines format from file extension.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "json" => Some(Self::Json),
            "bin" => Some(Self::Binary),
            _ => None,
        }
    }

    /// Determines format from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the default file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Binary => "bin",
        }
    }
}

impl fmt::Display for ArtifactFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Json => "json",
            Self::Binary => "binary",
        })
    }
}

/// A trained, serialized loan classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    /// Layout version, at most [`FORMAT_VERSION`]
    pub format_version: u32,
    /// Trained feature columns, in model input order
    pub feature_names: Vec<String>,
    /// Class labels; the model's probability refers to `classes[1]`
    pub classes: Vec<i64>,
    /// The boosted ensemble
    pub model: GradientBoostingClassifier,
}

impl ModelArtifact {
    /// Creates an artifact at the current format version.
    #[must_use]
    pub fn new(
        feature_names: Vec<String>,
        classes: Vec<i64>,
        model: GradientBoostingClassifier,
    ) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            feature_names,
            classes,
            model,
        }
    }

    /// Structural consistency check.
    ///
    /// # Errors
    ///
    /// Returns a description of the first inconsistency.
    pub fn check(&self) -> std::result::Result<(), String> {
        if self.format_version == 0 || self.format_version > FORMAT_VERSION {
            return Err(format!(
                "unsupported format version {} (max {FORMAT_VERSION})",
                self.format_version
            ));
        }
        if self.feature_names.is_empty() {
            return Err("artifact lists no feature columns".into());
        }
        if self.classes.len() != 2 {
            return Err(format!(
                "binary classifier needs exactly 2 classes, artifact lists {}",
                self.classes.len()
            ));
        }
        if self.classes[0] == self.classes[1] {
            return Err(format!("class label {} listed twice", self.classes[0]));
        }
        self.model.check(self.feature_names.len())
    }

    /// Reads an artifact, choosing the decoder from the file extension.
    ///
    /// # Errors
    ///
    /// - [`LendError::ArtifactNotFound`] if nothing exists at `path`
    /// - [`LendError::ArtifactCorrupt`] if it is not a file, has an unknown
    ///   extension, fails to decode or fails [`check`](Self::check)
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LendError::artifact_not_found(path));
        }
        if !path.is_file() {
            return Err(LendError::artifact_corrupt(path, "not a regular file"));
        }
        let format = ArtifactFormat::from_path(path).ok_or_else(|| {
            LendError::artifact_corrupt(path, "unsupported extension, expected .json or .bin")
        })?;

        let bytes = fs::read(path)?;
        debug!(path = %path.display(), %format, bytes = bytes.len(), "read model artifact");

        let artifact: Self = match format {
            ArtifactFormat::Json => serde_json::from_slice(&bytes)
                .map_err(|e| LendError::artifact_corrupt(path, format!("invalid JSON: {e}")))?,
            ArtifactFormat::Binary => bincode::deserialize(&bytes)
                .map_err(|e| LendError::artifact_corrupt(path, format!("invalid bincode: {e}")))?,
        };

        artifact
            .check()
            .map_err(|reason| LendError::artifact_corrupt(path, reason))?;
        Ok(artifact)
    }

    /// Writes the artifact, choosing the encoder from the file extension.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown extensions, encoding or write failures.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ArtifactFormat::from_path(path).ok_or_else(|| {
            LendError::artifact_corrupt(path, "unsupported extension, expected .json or .bin")
        })?;

        let bytes = match format {
            ArtifactFormat::Json => serde_json::to_vec_pretty(self).map_err(|e| {
                LendError::artifact_corrupt(path, format!("JSON encoding failed: {e}"))
            })?,
            ArtifactFormat::Binary => bincode::serialize(self).map_err(|e| {
                LendError::artifact_corrupt(path, format!("bincode encoding failed: {e}"))
            })?,
        };
        fs::write(path, bytes)?;
        Ok(())
    }
}

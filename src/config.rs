//! Runtime configuration.
//!
//! Values are layered: built-in defaults, then an optional YAML file, then
//! environment variables prefixed with `LENDWISE` using `__` as the nesting
//! separator:
//!
//! ```text
//! LENDWISE__ARTIFACT_PATH=/srv/models/gb_model.bin
//! LENDWISE__APPROVED_CLASS=1
//! LENDWISE__VALIDATION__STRICT_LOAN_RATIO=false
//! ```

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::error::{LendError, Result};
use crate::validation::ValidationPolicy;

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "LENDWISE";

/// Default artifact location, relative to the working directory.
pub const DEFAULT_ARTIFACT_PATH: &str = "models/gb_model.json";

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LendConfig {
    /// Path to the classifier artifact
    pub artifact_path: PathBuf,
    /// Class label meaning "approved"
    pub approved_class: i64,
    /// Field validation thresholds
    pub validation: ValidationPolicy,
}

impl Default for LendConfig {
    fn default() -> Self {
        Self {
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            approved_class: 1,
            validation: ValidationPolicy::default(),
        }
    }
}

impl LendConfig {
    /// Loads defaults, then `path` if given, then `LENDWISE__*` variables.
    ///
    /// # Errors
    ///
    /// [`LendError::Config`] if the file is unreadable, a value has the
    /// wrong type, or [`validate`](Self::validate) fails.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        Self::load_with_prefix(path, ENV_PREFIX)
    }

    fn load_with_prefix(path: Option<&Path>, prefix: &str) -> Result<Self> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(File::from(path).required(true));
        }
        let cfg = builder
            .add_source(
                Environment::with_prefix(prefix)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| LendError::config(e.to_string()))?;

        let loaded: Self = cfg
            .try_deserialize()
            .map_err(|e| LendError::config(e.to_string()))?;
        loaded.validate()?;
        Ok(loaded)
    }

    /// Checks value bounds.
    ///
    /// # Errors
    ///
    /// [`LendError::Config`] describing the first bad value.
    pub fn validate(&self) -> Result<()> {
        if self.artifact_path.as_os_str().is_empty() {
            return Err(LendError::config("artifact_path must not be empty"));
        }
        let policy = &self.validation;
        if !policy.min_loan_amount.is_finite() || policy.min_loan_amount <= 0.0 {
            return Err(LendError::config(format!(
                "validation.min_loan_amount must be positive, got {}",
                policy.min_loan_amount
            )));
        }
        if !policy.max_loan_to_income.is_finite() || policy.max_loan_to_income <= 0.0 {
            return Err(LendError::config(format!(
                "validation.max_loan_to_income must be positive, got {}",
                policy.max_loan_to_income
            )));
        }
        Ok(())
    }
}

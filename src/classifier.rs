//! Classifier adapter over a loaded model artifact.
//!
//! The adapter is built once per process and is read-only afterwards, so it
//! can be shared across sessions behind an [`Arc`] without locking.
//!
//! Which probability means "approved" is resolved from the artifact's class
//! list when the adapter is built, never assumed from a fixed index. An
//! artifact retrained with its classes listed in the opposite order therefore
//! still produces the same verdicts.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, info};

use crate::artifact::{ArtifactFormat, ModelArtifact};
use crate::config::LendConfig;
use crate::encoder::FeatureVector;
use crate::error::{LendError, Result};
use crate::schema::FeatureSchema;
use crate::traits::Classifier;
use crate::tree::GradientBoostingClassifier;
use crate::vocabulary::Vocabulary;

/// Hard decision for one application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    /// Loan approved
    Approved,
    /// Loan rejected
    Rejected,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Approved => "Loan Approved",
            Verdict::Rejected => "Loan Rejected",
        })
    }
}

/// Outcome of scoring one application.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Hard label
    pub label: Verdict,
    /// Probability of the rejected class, in [0, 1]
    pub probability_rejected: f64,
    /// Probability of the approved class, in [0, 1]
    pub probability_approved: f64,
}

impl PredictionResult {
    /// Builds a result from the approval probability, labelling by the
    /// larger probability (ties reject).
    #[must_use]
    pub fn from_approval_probability(probability_approved: f64) -> Self {
        let probability_approved = probability_approved.clamp(0.0, 1.0);
        let probability_rejected = 1.0 - probability_approved;
        let label = if probability_approved > probability_rejected {
            Verdict::Approved
        } else {
            Verdict::Rejected
        };
        Self {
            label,
            probability_rejected,
            probability_approved,
        }
    }

    /// True when the label is [`Verdict::Approved`].
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.label == Verdict::Approved
    }

    /// Probability of the reported label.
    #[must_use]
    pub fn confidence(&self) -> f64 {
        match self.label {
            Verdict::Approved => self.probability_approved,
            Verdict::Rejected => self.probability_rejected,
        }
    }

    /// Approval probability as a percentage string, e.g. `74.71%`.
    #[must_use]
    pub fn approval_percent(&self) -> String {
        format_percent(self.probability_approved)
    }

    /// Rejection probability as a percentage string.
    #[must_use]
    pub fn rejection_percent(&self) -> String {
        format_percent(self.probability_rejected)
    }
}

fn format_percent(p: f64) -> String {
    format!("{:.2}%", p * 100.0)
}

/// Read-only facts about a loaded artifact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArtifactSummary {
    /// Where the artifact was read from
    pub path: PathBuf,
    /// File format
    pub format: ArtifactFormat,
    /// Ordered class labels as stored
    pub classes: [i64; 2],
    /// Label treated as approval
    pub approved_class: i64,
    /// Index of the approval probability in the model output
    pub approved_index: usize,
    /// Number of feature columns
    pub n_features: usize,
    /// Columns the encoder can never fill
    pub unknown_columns: Vec<String>,
    /// Number of boosted trees
    pub n_estimators: usize,
    /// Deepest tree
    pub max_depth: usize,
    /// Shrinkage
    pub learning_rate: f64,
}

/// Scores encoded applicants with a gradient-boosted artifact.
#[derive(Debug, Clone)]
pub struct ClassifierAdapter {
    model: GradientBoostingClassifier,
    schema: FeatureSchema,
    classes: [i64; 2],
    approved_index: usize,
    source: PathBuf,
    format: ArtifactFormat,
}

impl ClassifierAdapter {
    /// Loads the artifact at `path`, treating `approved_class` as approval.
    ///
    /// # Errors
    ///
    /// [`LendError::ArtifactNotFound`] or [`LendError::ArtifactCorrupt`].
    pub fn load(path: impl AsRef<Path>, approved_class: i64) -> Result<Self> {
        let path = path.as_ref();
        let artifact = ModelArtifact::load(path)?;
        let adapter = Self::from_artifact(artifact, approved_class, path)?;
        info!(
            path = %path.display(),
            features = adapter.schema.len(),
            trees = adapter.model.n_estimators(),
            approved_index = adapter.approved_index,
            "loaded classifier artifact"
        );
        Ok(adapter)
    }

    /// Builds an adapter from an in-memory artifact. `source` is only used
    /// for error messages and [`artifact_summary`](Self::artifact_summary).
    ///
    /// # Errors
    ///
    /// [`LendError::ArtifactCorrupt`] if the artifact is inconsistent or does
    /// not list `approved_class`.
    pub fn from_artifact(
        artifact: ModelArtifact,
        approved_class: i64,
        source: impl AsRef<Path>,
    ) -> Result<Self> {
        let source = source.as_ref();
        artifact
            .check()
            .map_err(|reason| LendError::artifact_corrupt(source, reason))?;

        let classes = [artifact.classes[0], artifact.classes[1]];
        let approved_index = classes
            .iter()
            .position(|&c| c == approved_class)
            .ok_or_else(|| {
                LendError::artifact_corrupt(
                    source,
                    format!(
                        "approved class label {approved_class} is not among artifact classes {classes:?}"
                    ),
                )
            })?;

        let schema = FeatureSchema::from_names(&artifact.feature_names, &Vocabulary::TRAINED)
            .map_err(|reason| LendError::artifact_corrupt(source, reason))?;

        Ok(Self {
            model: artifact.model,
            schema,
            classes,
            approved_index,
            source: source.to_path_buf(),
            format: ArtifactFormat::from_path(source).unwrap_or_default(),
        })
    }

    /// Index of the approval probability in the model's output pair.
    #[must_use]
    pub fn approved_index(&self) -> usize {
        self.approved_index
    }

    /// Inspection summary.
    #[must_use]
    pub fn artifact_summary(&self) -> ArtifactSummary {
        ArtifactSummary {
            path: self.source.clone(),
            format: self.format,
            classes: self.classes,
            approved_class: self.classes[self.approved_index],
            approved_index: self.approved_index,
            n_features: self.schema.len(),
            unknown_columns: self.schema.unknown_columns().map(str::to_string).collect(),
            n_estimators: self.model.n_estimators(),
            max_depth: self.model.max_depth(),
            learning_rate: self.model.learning_rate(),
        }
    }

    fn check_features(&self, features: &FeatureVector) -> Result<()> {
        if features.len() != self.schema.len() {
            return Err(LendError::prediction_failed(format!(
                "expected {} features, got {}",
                self.schema.len(),
                features.len()
            )));
        }
        let pairs = features.names().iter().zip(self.schema.names());
        for (idx, (given, expected)) in pairs.enumerate() {
            if given != expected {
                return Err(LendError::prediction_failed(format!(
                    "feature {idx} is '{given}', model expects '{expected}'"
                )));
            }
        }
        if let Some((name, value)) = features.iter().find(|(_, v)| !v.is_finite()) {
            return Err(LendError::prediction_failed(format!(
                "feature '{name}' has non-finite value {value}"
            )));
        }
        Ok(())
    }
}

impl Classifier for ClassifierAdapter {
    fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        self.check_features(features)?;

        let proba = self.model.predict_proba(features.values());
        let result = PredictionResult::from_approval_probability(proba[self.approved_index]);
        debug!(
            label = ?result.label,
            probability_approved = result.probability_approved,
            "scored application"
        );
        Ok(result)
    }
}

/// Lazily loaded, shareable adapter slot.
///
/// The first successful [`get_or_load`](Self::get_or_load) materializes the
/// adapter; later calls return the same instance regardless of arguments.
/// Concurrent first calls block while one of them loads, so the artifact is
/// read once. Failed loads are not remembered, so a fixed artifact can be
/// retried.
#[derive(Debug, Default)]
pub struct AdapterCell {
    cell: OnceCell<Arc<ClassifierAdapter>>,
}

impl AdapterCell {
    /// Creates an empty cell.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            cell: OnceCell::new(),
        }
    }

    /// Returns the cached adapter, loading it on first use.
    ///
    /// # Errors
    ///
    /// Propagates [`ClassifierAdapter::load`] failures.
    pub fn get_or_load(
        &self,
        path: impl AsRef<Path>,
        approved_class: i64,
    ) -> Result<Arc<ClassifierAdapter>> {
        self.get_or_init_with(|| ClassifierAdapter::load(path, approved_class))
    }

    fn get_or_init_with<F>(&self, init: F) -> Result<Arc<ClassifierAdapter>>
    where
        F: FnOnce() -> Result<ClassifierAdapter>,
    {
        self.cell
            .get_or_try_init(|| init().map(Arc::new))
            .map(Arc::clone)
    }

    /// The adapter, if already loaded.
    #[must_use]
    pub fn get(&self) -> Option<Arc<ClassifierAdapter>> {
        self.cell.get().cloned()
    }

    /// True once an adapter has been materialized.
    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }
}

static SHARED: AdapterCell = AdapterCell::new();

/// Process-wide adapter, loaded from `config` on first call.
///
/// # Errors
///
/// Propagates artifact load failures; nothing is cached on failure.
pub fn shared_adapter(config: &LendConfig) -> Result<Arc<ClassifierAdapter>> {
    SHARED.get_or_load(&config.artifact_path, config.approved_class)
}

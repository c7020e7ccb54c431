//! Convenience re-exports for common usage.
//!
//! # Usage
//!
//! ```
//! use lendwise::prelude::*;
//! ```

pub use crate::applicant::{ApplicantInput, Education, Gender, HomeOwnership, LoanIntent};
pub use crate::artifact::ModelArtifact;
pub use crate::classifier::{shared_adapter, ClassifierAdapter, PredictionResult, Verdict};
pub use crate::config::LendConfig;
pub use crate::encoder::{encode, FeatureEncoder, FeatureVector};
pub use crate::error::{LendError, Result};
pub use crate::schema::FeatureSchema;
pub use crate::session::{PredictionSession, SessionPhase};
pub use crate::traits::Classifier;
pub use crate::validation::{validate, ValidationPolicy, ValidationReport};

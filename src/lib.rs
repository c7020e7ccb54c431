//! Lendwise: loan approval prediction in pure Rust.
//!
//! Lendwise turns one applicant's form input into an approve/reject verdict
//! with class probabilities, using a gradient-boosted tree classifier
//! trained offline and shipped as a model artifact.
//!
//! A submission flows through four stages:
//!
//! 1. [`validation`]: field-level and cross-field constraint checks
//! 2. [`encoder`]: one-hot expansion and alignment to the artifact's columns
//! 3. [`classifier`]: scoring with the loaded boosted ensemble
//! 4. [`session`]: orchestration and the held result
//!
//! # Quick Start
//!
//! ```
//! use lendwise::prelude::*;
//! use lendwise::tree::{GradientBoostingClassifier, RegressionTreeNode};
//!
//! // A one-tree model that approves credit scores above 600
//! let schema = FeatureSchema::trained();
//! let credit_score = schema.position("credit_score").unwrap();
//! let model = GradientBoostingClassifier::new(
//!     0.0,
//!     1.0,
//!     vec![RegressionTreeNode::split(
//!         credit_score,
//!         600.0,
//!         RegressionTreeNode::leaf(-2.0),
//!         RegressionTreeNode::leaf(2.0),
//!     )],
//! );
//! let names = schema.names().map(String::from).collect();
//! let artifact = ModelArtifact::new(names, vec![0, 1], model);
//! let adapter = ClassifierAdapter::from_artifact(artifact, 1, "memory.json").unwrap();
//!
//! let mut session = PredictionSession::new(adapter);
//! session.input_mut().income = 60_000.0;
//! session.input_mut().loan_amount = 15_000.0;
//!
//! let result = session.submit().unwrap();
//! assert_eq!(result.label, Verdict::Approved);
//! assert!(result.probability_approved > 0.85);
//! ```
//!
//! # Modules
//!
//! - [`applicant`]: Form input and categorical fields
//! - [`vocabulary`]: Display label to training token tables
//! - [`validation`]: Field constraints and violation reports
//! - [`schema`]: Ordered feature columns of a trained artifact
//! - [`encoder`]: Feature encoding and schema alignment
//! - [`tree`]: Regression trees and the boosted ensemble
//! - [`artifact`]: Model artifact persistence (JSON, bincode)
//! - [`classifier`]: Classifier adapter and process-wide cache
//! - [`session`]: Prediction session state machine
//! - [`config`]: Layered configuration (YAML file, environment)

pub mod applicant;
pub mod artifact;
pub mod classifier;
pub mod config;
pub mod encoder;
pub mod error;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod traits;
pub mod tree;
pub mod validation;
pub mod vocabulary;

pub use applicant::ApplicantInput;
pub use classifier::{ClassifierAdapter, PredictionResult, Verdict};
pub use config::LendConfig;
pub use encoder::{encode, FeatureVector};
pub use error::{LendError, Result};
pub use schema::FeatureSchema;
pub use session::PredictionSession;
pub use validation::validate;

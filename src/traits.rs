//! Core traits at the seam between orchestration and scoring.

use std::sync::Arc;

use crate::classifier::PredictionResult;
use crate::encoder::FeatureVector;
use crate::error::Result;
use crate::schema::FeatureSchema;

/// A trained binary loan classifier.
///
/// Implementations must be pure: the same [`FeatureVector`] always yields
/// the same [`PredictionResult`], and predicting never mutates shared state,
/// so one instance can serve any number of sessions.
///
/// # Examples
///
/// ```
/// use lendwise::classifier::{PredictionResult, Verdict};
/// use lendwise::schema::FeatureSchema;
/// use lendwise::traits::Classifier;
/// use lendwise::vocabulary::Vocabulary;
/// use lendwise::{FeatureVector, Result};
///
/// struct AlwaysApprove(FeatureSchema);
///
/// impl Classifier for AlwaysApprove {
///     fn schema(&self) -> &FeatureSchema {
///         &self.0
///     }
///
///     fn predict(&self, _features: &FeatureVector) -> Result<PredictionResult> {
///         Ok(PredictionResult::from_approval_probability(1.0))
///     }
/// }
///
/// let schema = FeatureSchema::from_names(["person_age"], &Vocabulary::TRAINED).unwrap();
/// let clf = AlwaysApprove(schema);
/// let features = FeatureVector::new(vec!["person_age".into()], vec![30.0]).unwrap();
/// assert_eq!(clf.predict(&features).unwrap().label, Verdict::Approved);
/// ```
pub trait Classifier {
    /// Ordered columns the classifier expects.
    fn schema(&self) -> &FeatureSchema;

    /// Scores one encoded applicant.
    ///
    /// # Errors
    ///
    /// Returns [`LendError::PredictionFailed`](crate::error::LendError::PredictionFailed)
    /// when the vector does not fit the model.
    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult>;
}

impl<C: Classifier + ?Sized> Classifier for Arc<C> {
    fn schema(&self) -> &FeatureSchema {
        (**self).schema()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        (**self).predict(features)
    }
}

impl<C: Classifier + ?Sized> Classifier for &C {
    fn schema(&self) -> &FeatureSchema {
        (**self).schema()
    }

    fn predict(&self, features: &FeatureVector) -> Result<PredictionResult> {
        (**self).predict(features)
    }
}

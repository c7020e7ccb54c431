//! Gradient Boosting Classifier (inference).
//!
//! Binary log-loss boosting: the ensemble's raw score is the initial log-odds
//! plus the learning-rate-scaled sum of every tree's leaf value, and the
//! probability of the second class is `sigmoid(raw)`.

use serde::{Deserialize, Serialize};

use super::RegressionTreeNode;

/// Gradient Boosting Classifier over regression trees.
///
/// # Example
///
/// ```
/// use lendwise::tree::{GradientBoostingClassifier, RegressionTreeNode};
///
/// let model = GradientBoostingClassifier::new(
///     0.0,
///     1.0,
///     vec![RegressionTreeNode::split(
///         0,
///         0.5,
///         RegressionTreeNode::leaf(-2.0),
///         RegressionTreeNode::leaf(2.0),
///     )],
/// );
/// let [p0, p1] = model.predict_proba(&[1.0]);
/// assert!(p1 > 0.85);
/// assert!((p0 + p1 - 1.0).abs() < 1e-12);
/// assert_eq!(model.predict(&[1.0]), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientBoostingClassifier {
    /// Initial prediction (log-odds of the second class)
    init_prediction: f64,
    /// Learning rate (shrinkage applied to every tree)
    learning_rate: f64,
    /// Ensemble of regression trees
    estimators: Vec<RegressionTreeNode>,
}

impl GradientBoostingClassifier {
    /// Creates a classifier from already-grown trees.
    #[must_use]
    pub fn new(
        init_prediction: f64,
        learning_rate: f64,
        estimators: Vec<RegressionTreeNode>,
    ) -> Self {
        Self {
            init_prediction,
            learning_rate,
            estimators,
        }
    }

    /// Numerically stable sigmoid: σ(x) = 1 / (1 + e^(-x))
    fn sigmoid(x: f64) -> f64 {
        if x >= 0.0 {
            1.0 / (1.0 + (-x).exp())
        } else {
            let e = x.exp();
            e / (1.0 + e)
        }
    }

    /// Raw ensemble score (log-odds of the second class) for one sample.
    #[must_use]
    pub fn decision_function(&self, x: &[f64]) -> f64 {
        let boosted: f64 = self.estimators.iter().map(|tree| tree.predict_one(x)).sum();
        self.init_prediction + self.learning_rate * boosted
    }

    /// Class probabilities `[P(class 0), P(class 1)]` for one sample.
    #[must_use]
    pub fn predict_proba(&self, x: &[f64]) -> [f64; 2] {
        let prob_class1 = Self::sigmoid(self.decision_function(x));
        [1.0 - prob_class1, prob_class1]
    }

    /// Predicted class index (0 or 1); ties go to class 0.
    #[must_use]
    pub fn predict(&self, x: &[f64]) -> usize {
        let [p0, p1] = self.predict_proba(x);
        usize::from(p1 > p0)
    }

    /// Checks every tree and parameter against a feature count.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    pub fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        if !self.init_prediction.is_finite() {
            return Err(format!("initial prediction {} is not finite", self.init_prediction));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(format!(
                "learning rate {} must be a positive finite number",
                self.learning_rate
            ));
        }
        for (i, tree) in self.estimators.iter().enumerate() {
            tree.check(n_features).map_err(|e| format!("tree {i}: {e}"))?;
        }
        Ok(())
    }

    /// Returns the number of estimators (trees) in the ensemble.
    #[must_use]
    pub fn n_estimators(&self) -> usize {
        self.estimators.len()
    }

    /// Learning rate.
    #[must_use]
    pub fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    /// Initial log-odds.
    #[must_use]
    pub fn init_prediction(&self) -> f64 {
        self.init_prediction
    }

    /// The trees.
    #[must_use]
    pub fn estimators(&self) -> &[RegressionTreeNode] {
        &self.estimators
    }

    /// Deepest tree in the ensemble.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.estimators.iter().map(RegressionTreeNode::depth).max().unwrap_or(0)
    }
}

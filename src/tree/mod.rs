//! Regression trees and the gradient-boosted ensemble built from them.
//!
//! Only inference lives here: trees arrive fully grown inside a model
//! artifact. Each internal node routes a sample left when
//! `x[feature_idx] <= threshold`, right otherwise.
//!
//! # Example
//!
//! ```
//! use lendwise::tree::{RegressionLeaf, RegressionNode, RegressionTreeNode};
//!
//! let stump = RegressionTreeNode::Node(RegressionNode {
//!     feature_idx: 0,
//!     threshold: 0.5,
//!     left: Box::new(RegressionTreeNode::leaf(-1.0)),
//!     right: Box::new(RegressionTreeNode::leaf(1.0)),
//! });
//! assert_eq!(stump.predict_one(&[0.2]), -1.0);
//! assert_eq!(stump.predict_one(&[0.9]), 1.0);
//! ```

mod gradient_boosting;

pub use gradient_boosting::GradientBoostingClassifier;

use serde::{Deserialize, Serialize};

/// Leaf node in a regression tree.
///
/// Holds the additive score contributed by samples reaching this leaf.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionLeaf {
    /// Raw score contributed by this leaf
    pub value: f64,
    /// Number of training samples in this leaf
    #[serde(default)]
    pub n_samples: usize,
}

/// Internal node in a regression tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionNode {
    /// Index of the feature to split on
    pub feature_idx: usize,
    /// Threshold value for the split
    pub threshold: f64,
    /// Left subtree (samples where feature <= threshold)
    pub left: Box<RegressionTreeNode>,
    /// Right subtree (samples where feature > threshold)
    pub right: Box<RegressionTreeNode>,
}

/// A node in a regression tree (either internal node or leaf).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RegressionTreeNode {
    /// Internal decision node with split condition
    Node(RegressionNode),
    /// Leaf node with value prediction
    Leaf(RegressionLeaf),
}

impl RegressionTreeNode {
    /// Creates a leaf with the given value.
    #[must_use]
    pub fn leaf(value: f64) -> Self {
        RegressionTreeNode::Leaf(RegressionLeaf {
            value,
            n_samples: 0,
        })
    }

    /// Creates a split node.
    #[must_use]
    pub fn split(feature_idx: usize, threshold: f64, left: Self, right: Self) -> Self {
        RegressionTreeNode::Node(RegressionNode {
            feature_idx,
            threshold,
            left: Box::new(left),
            right: Box::new(right),
        })
    }

    /// Returns the depth of the tree rooted at this node.
    ///
    /// Leaf nodes have depth 0, internal nodes have depth 1 + max(left, right).
    #[must_use]
    pub fn depth(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 0,
            RegressionTreeNode::Node(node) => 1 + node.left.depth().max(node.right.depth()),
        }
    }

    /// Number of leaves below this node.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        match self {
            RegressionTreeNode::Leaf(_) => 1,
            RegressionTreeNode::Node(node) => node.left.n_leaves() + node.right.n_leaves(),
        }
    }

    /// Largest feature index used by any split, `None` for a bare leaf.
    #[must_use]
    pub fn max_feature_index(&self) -> Option<usize> {
        match self {
            RegressionTreeNode::Leaf(_) => None,
            RegressionTreeNode::Node(node) => {
                let below = node
                    .left
                    .max_feature_index()
                    .max(node.right.max_feature_index());
                Some(below.map_or(node.feature_idx, |m| m.max(node.feature_idx)))
            }
        }
    }

    /// Checks that every split and leaf is usable for `n_features` inputs.
    ///
    /// # Errors
    ///
    /// Returns a description of the first offending node.
    pub fn check(&self, n_features: usize) -> std::result::Result<(), String> {
        match self {
            RegressionTreeNode::Leaf(leaf) => {
                if leaf.value.is_finite() {
                    Ok(())
                } else {
                    Err(format!("leaf value {} is not finite", leaf.value))
                }
            }
            RegressionTreeNode::Node(node) => {
                if node.feature_idx >= n_features {
                    return Err(format!(
                        "split on feature {} but only {n_features} features exist",
                        node.feature_idx
                    ));
                }
                if node.threshold.is_nan() {
                    return Err(format!("split on feature {} has NaN threshold", node.feature_idx));
                }
                node.left.check(n_features)?;
                node.right.check(n_features)
            }
        }
    }

    /// Predicts the raw score for a single sample.
    ///
    /// The sample must have at least `max_feature_index() + 1` values;
    /// [`check`](Self::check) guarantees this for validated trees.
    #[must_use]
    pub fn predict_one(&self, x: &[f64]) -> f64 {
        let mut node = self;
        loop {
            match node {
                RegressionTreeNode::Leaf(leaf) => return leaf.value,
                RegressionTreeNode::Node(internal) => {
                    if x[internal.feature_idx] <= internal.threshold {
                        node = &internal.left;
                    } else {
                        node = &internal.right;
                    }
                }
            }
        }
    }
}

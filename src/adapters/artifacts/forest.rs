//! Decision tree ensembles exported as flat node arrays.
//!
//! Node layout follows the usual depth-first export: node 0 is the root, a
//! split sends `x[feature] <= threshold` to `left` and everything else to
//! `right`. Children always sit after their parent in the array, which is
//! checked at load time and guarantees evaluation terminates.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, FEATURE_COUNT};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TreeNode {
    Split {
        feature: usize,
        threshold: f64,
        left: usize,
        right: usize,
    },
    Leaf {
        value: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionTree {
    pub nodes: Vec<TreeNode>,
}

impl DecisionTree {
    /// Check the node graph is a well-formed forward-only tree.
    ///
    /// # Errors
    /// Returns a description of the first malformed node.
    pub fn validate(&self) -> Result<(), String> {
        if self.nodes.is_empty() {
            return Err("tree has no nodes".into());
        }
        let n = self.nodes.len();
        for (i, node) in self.nodes.iter().enumerate() {
            match *node {
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    if feature >= FEATURE_COUNT {
                        return Err(format!("node {i}: feature index {feature} out of range"));
                    }
                    if !threshold.is_finite() {
                        return Err(format!("node {i}: non-finite threshold"));
                    }
                    if left <= i || right <= i || left >= n || right >= n {
                        return Err(format!(
                            "node {i}: children ({left}, {right}) must follow the node and be < {n}"
                        ));
                    }
                }
                TreeNode::Leaf { value } => {
                    if !value.is_finite() {
                        return Err(format!("node {i}: non-finite leaf value"));
                    }
                }
            }
        }
        Ok(())
    }

    /// Walk from the root to a leaf. Assumes `validate()` passed.
    #[must_use]
    pub fn evaluate(&self, x: &FeatureVector) -> f64 {
        let mut idx = 0;
        loop {
            match self.nodes[idx] {
                TreeNode::Leaf { value } => return value,
                TreeNode::Split {
                    feature,
                    threshold,
                    left,
                    right,
                } => {
                    let v = x.as_slice()[feature];
                    idx = if v <= threshold { left } else { right };
                }
            }
        }
    }
}

/// Averaging ensemble of validated trees.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeEnsemble {
    trees: Vec<DecisionTree>,
}

impl TreeEnsemble {
    /// # Errors
    /// Returns a description of the problem if the ensemble is empty or any
    /// tree is malformed.
    pub fn new(trees: Vec<DecisionTree>) -> Result<Self, String> {
        if trees.is_empty() {
            return Err("ensemble has no trees".into());
        }
        for (t, tree) in trees.iter().enumerate() {
            tree.validate().map_err(|e| format!("tree {t}: {e}"))?;
        }
        Ok(Self { trees })
    }

    /// Mean of the leaf values reached in every tree.
    #[must_use]
    pub fn mean(&self, x: &FeatureVector) -> f64 {
        let sum: f64 = self.trees.iter().map(|t| t.evaluate(x)).sum();
        sum / self.trees.len() as f64
    }
}

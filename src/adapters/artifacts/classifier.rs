//! Mortality classifier backed by an exported model artifact.

use serde::{Deserialize, Serialize};

use super::forest::{DecisionTree, TreeEnsemble};
use super::linear::{sigmoid, LinearModel};
use crate::domain::{FeatureVector, InferenceError};
use crate::ports::MortalityClassifier;

fn default_threshold() -> f64 {
    0.5
}

/// Classifier artifact as written by the training export.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    Logistic {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
    /// Leaves hold the probability of class 1 (Dead).
    Forest {
        feature_names: Vec<String>,
        trees: Vec<DecisionTree>,
        #[serde(default = "default_threshold")]
        threshold: f64,
    },
}

impl ClassifierArtifact {
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        match self {
            Self::Logistic { feature_names, .. } | Self::Forest { feature_names, .. } => {
                feature_names
            }
        }
    }
}

#[derive(Debug, Clone)]
enum Model {
    Logistic(LinearModel),
    Forest(TreeEnsemble),
}

/// Binary classifier: class 1 when P(Dead) is strictly above the threshold.
#[derive(Debug, Clone)]
pub struct ArtifactClassifier {
    model: Model,
    threshold: f64,
}

impl ArtifactClassifier {
    /// Probability of class 1 (Dead).
    #[must_use]
    pub fn probability(&self, features: &FeatureVector) -> f64 {
        match &self.model {
            Model::Logistic(m) => sigmoid(m.decision(features)),
            Model::Forest(e) => e.mean(features),
        }
    }
}

impl TryFrom<ClassifierArtifact> for ArtifactClassifier {
    type Error = String;

    fn try_from(a: ClassifierArtifact) -> Result<Self, Self::Error> {
        let (model, threshold) = match a {
            ClassifierArtifact::Logistic {
                coefficients,
                intercept,
                threshold,
                ..
            } => (
                Model::Logistic(LinearModel::new(&coefficients, intercept)?),
                threshold,
            ),
            ClassifierArtifact::Forest {
                trees, threshold, ..
            } => (Model::Forest(TreeEnsemble::new(trees)?), threshold),
        };
        if !(0.0..1.0).contains(&threshold) {
            return Err(format!("threshold {threshold} must be in [0, 1)"));
        }
        Ok(Self { model, threshold })
    }
}

impl MortalityClassifier for ArtifactClassifier {
    fn predict(&self, features: &FeatureVector) -> Result<u8, InferenceError> {
        let p = self.probability(features);
        if !p.is_finite() {
            return Err(InferenceError::NonFinite(format!("class probability = {p}")));
        }
        Ok(u8::from(p > self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{FEATURE_COUNT, FEATURE_NAMES};

    fn names() -> Vec<String> {
        FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_logistic_decision_boundary() {
        // logit = age - 60
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[0] = 1.0;
        let clf = ArtifactClassifier::try_from(ClassifierArtifact::Logistic {
            feature_names: names(),
            coefficients,
            intercept: -60.0,
            threshold: 0.5,
        })
        .expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 60.0;
        // p == 0.5 exactly is not above the threshold
        assert_eq!(clf.predict(&FeatureVector::from(x)), Ok(0));
        x[0] = 61.0;
        assert_eq!(clf.predict(&FeatureVector::from(x)), Ok(1));
        x[0] = 40.0;
        assert_eq!(clf.predict(&FeatureVector::from(x)), Ok(0));
    }

    #[test]
    fn test_forest_vote() {
        let json = r#"{
            "kind": "forest",
            "feature_names": [],
            "trees": [
                {"nodes": [
                    {"feature": 7, "threshold": 0.5, "left": 1, "right": 2},
                    {"value": 0.1},
                    {"value": 0.9}
                ]},
                {"nodes": [{"value": 0.6}]}
            ]
        }"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).expect("parse");
        let clf = ArtifactClassifier::try_from(artifact).expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        // Regional: (0.1 + 0.6) / 2 = 0.35
        assert_eq!(clf.predict(&FeatureVector::from(x)), Ok(0));
        // Distant: (0.9 + 0.6) / 2 = 0.75
        x[7] = 1.0;
        assert_eq!(clf.predict(&FeatureVector::from(x)), Ok(1));
    }

    #[test]
    fn test_default_threshold_and_invalid_threshold() {
        let json = format!(
            r#"{{"kind": "logistic", "feature_names": [], "coefficients": {:?}, "intercept": 0.0}}"#,
            vec![0.0; FEATURE_COUNT]
        );
        let artifact: ClassifierArtifact = serde_json::from_str(&json).expect("parse");
        assert!(matches!(
            artifact,
            ClassifierArtifact::Logistic { threshold, .. } if (threshold - 0.5).abs() < f64::EPSILON
        ));

        let bad = ClassifierArtifact::Logistic {
            feature_names: names(),
            coefficients: vec![0.0; FEATURE_COUNT],
            intercept: 0.0,
            threshold: 1.5,
        };
        assert!(ArtifactClassifier::try_from(bad).is_err());
    }
}

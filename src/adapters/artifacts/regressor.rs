//! Survival regressor backed by an exported model artifact.

use serde::{Deserialize, Serialize};

use super::forest::{DecisionTree, TreeEnsemble};
use super::linear::LinearModel;
use crate::domain::{FeatureVector, InferenceError};
use crate::ports::SurvivalRegressor;

/// Regressor artifact as written by the training export.
///
/// Both variants expect features already passed through the scaler.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RegressorArtifact {
    Linear {
        feature_names: Vec<String>,
        coefficients: Vec<f64>,
        intercept: f64,
    },
    Forest {
        feature_names: Vec<String>,
        trees: Vec<DecisionTree>,
    },
}

impl RegressorArtifact {
    #[must_use]
    pub fn feature_names(&self) -> &[String] {
        match self {
            Self::Linear { feature_names, .. } | Self::Forest { feature_names, .. } => {
                feature_names
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum ArtifactRegressor {
    Linear(LinearModel),
    Forest(TreeEnsemble),
}

impl TryFrom<RegressorArtifact> for ArtifactRegressor {
    type Error = String;

    fn try_from(a: RegressorArtifact) -> Result<Self, Self::Error> {
        match a {
            RegressorArtifact::Linear {
                coefficients,
                intercept,
                ..
            } => Ok(Self::Linear(LinearModel::new(&coefficients, intercept)?)),
            RegressorArtifact::Forest { trees, .. } => Ok(Self::Forest(TreeEnsemble::new(trees)?)),
        }
    }
}

impl SurvivalRegressor for ArtifactRegressor {
    fn predict(&self, scaled: &FeatureVector) -> Result<f64, InferenceError> {
        let months = match self {
            Self::Linear(m) => m.decision(scaled),
            Self::Forest(e) => e.mean(scaled),
        };
        if months.is_finite() {
            Ok(months)
        } else {
            Err(InferenceError::NonFinite(format!("survival months = {months}")))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FEATURE_COUNT;

    #[test]
    fn test_linear_regressor() {
        let mut coefficients = vec![0.0; FEATURE_COUNT];
        coefficients[12] = -6.0;
        let reg = ArtifactRegressor::try_from(RegressorArtifact::Linear {
            feature_names: vec![],
            coefficients,
            intercept: 70.0,
        })
        .expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        x[12] = 0.5;
        assert_eq!(reg.predict(&FeatureVector::from(x)), Ok(67.0));
    }

    #[test]
    fn test_forest_regressor_from_json() {
        let json = r#"{
            "kind": "forest",
            "feature_names": [],
            "trees": [
                {"nodes": [{"value": 60}]},
                {"nodes": [
                    {"feature": 0, "threshold": 0.0, "left": 1, "right": 2},
                    {"value": 90},
                    {"value": 30}
                ]}
            ]
        }"#;
        let artifact: RegressorArtifact = serde_json::from_str(json).expect("parse");
        let reg = ArtifactRegressor::try_from(artifact).expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        assert_eq!(reg.predict(&FeatureVector::from(x)), Ok(75.0));
        x[0] = 1.2;
        assert_eq!(reg.predict(&FeatureVector::from(x)), Ok(45.0));
    }

    #[test]
    fn test_unknown_kind_rejected() {
        let json = r#"{"kind": "svr", "feature_names": []}"#;
        assert!(serde_json::from_str::<RegressorArtifact>(json).is_err());
    }
}

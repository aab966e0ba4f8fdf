//! Standard scaler: `(x - mean) / scale` per column.

use serde::{Deserialize, Serialize};

use crate::domain::{FeatureVector, InferenceError, FEATURE_COUNT};
use crate::ports::FeatureScaler;

/// Exported scaler parameters.
///
/// `mean` is absent when the scaler was fitted without centering and `scale`
/// when fitted without scaling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScalerArtifact {
    pub feature_names: Vec<String>,
    #[serde(default)]
    pub mean: Option<Vec<f64>>,
    #[serde(default)]
    pub scale: Option<Vec<f64>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StandardScaler {
    mean: [f64; FEATURE_COUNT],
    scale: [f64; FEATURE_COUNT],
}

impl StandardScaler {
    /// # Errors
    /// Returns a description of the problem for wrong lengths or non-finite
    /// parameters.
    pub fn new(mean: Option<&[f64]>, scale: Option<&[f64]>) -> Result<Self, String> {
        let mean = column_params("mean", mean, 0.0)?;
        let mut scale = column_params("scale", scale, 1.0)?;
        // Constant columns were fitted with zero variance; leave them unscaled.
        for s in scale.iter_mut() {
            if *s == 0.0 {
                *s = 1.0;
            }
        }
        Ok(Self { mean, scale })
    }
}

fn column_params(
    name: &str,
    values: Option<&[f64]>,
    identity: f64,
) -> Result<[f64; FEATURE_COUNT], String> {
    let Some(values) = values else {
        return Ok([identity; FEATURE_COUNT]);
    };
    let out = <[f64; FEATURE_COUNT]>::try_from(values)
        .map_err(|_| format!("expected {FEATURE_COUNT} {name} values, got {}", values.len()))?;
    if out.iter().any(|v| !v.is_finite()) {
        return Err(format!("{name} values must be finite"));
    }
    Ok(out)
}

impl TryFrom<&ScalerArtifact> for StandardScaler {
    type Error = String;

    fn try_from(a: &ScalerArtifact) -> Result<Self, Self::Error> {
        Self::new(a.mean.as_deref(), a.scale.as_deref())
    }
}

impl FeatureScaler for StandardScaler {
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
        let scaled = features.map_columns(|i, x| (x - self.mean[i]) / self.scale[i]);
        if scaled.as_slice().iter().any(|v| !v.is_finite()) {
            return Err(InferenceError::NonFinite("scaled features".into()));
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform() {
        let mean = [1.0; FEATURE_COUNT];
        let mut scale = [2.0; FEATURE_COUNT];
        scale[3] = 0.0;
        let scaler = StandardScaler::new(Some(&mean), Some(&scale)).expect("valid");

        let x = FeatureVector::from([5.0; FEATURE_COUNT]);
        let y = scaler.transform(&x).expect("finite");
        assert_eq!(y.as_slice()[0], 2.0);
        // zero scale treated as 1
        assert_eq!(y.as_slice()[3], 4.0);
    }

    #[test]
    fn test_missing_parameters_are_identity() {
        let scaler = StandardScaler::new(None, None).expect("valid");
        let x = FeatureVector::from([7.5; FEATURE_COUNT]);
        assert_eq!(scaler.transform(&x).expect("finite"), x);
    }

    #[test]
    fn test_rejects_wrong_length() {
        let err = StandardScaler::new(Some(&[0.0; 12]), None).expect_err("12 means");
        assert!(err.contains("got 12"));
    }

    #[test]
    fn test_non_finite_input_reported() {
        let scaler = StandardScaler::new(None, None).expect("valid");
        let mut x = [0.0; FEATURE_COUNT];
        x[5] = f64::INFINITY;
        assert!(scaler.transform(&FeatureVector::from(x)).is_err());
    }
}

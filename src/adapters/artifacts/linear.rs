//! Linear and logistic models exported as coefficient vectors.

use crate::domain::{FeatureVector, FEATURE_COUNT};

/// `intercept + Σ coefficients[i] * x[i]` over the 13 model columns.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearModel {
    coefficients: [f64; FEATURE_COUNT],
    intercept: f64,
}

impl LinearModel {
    /// Build a model from exported parameters.
    ///
    /// # Errors
    /// Returns a description of the problem if the coefficient count is wrong
    /// or any parameter is not finite.
    pub fn new(coefficients: &[f64], intercept: f64) -> Result<Self, String> {
        let coefficients = <[f64; FEATURE_COUNT]>::try_from(coefficients).map_err(|_| {
            format!(
                "expected {FEATURE_COUNT} coefficients, got {}",
                coefficients.len()
            )
        })?;
        if coefficients.iter().any(|c| !c.is_finite()) || !intercept.is_finite() {
            return Err("coefficients and intercept must be finite".into());
        }
        Ok(Self {
            coefficients,
            intercept,
        })
    }

    /// Raw linear response (logit for logistic models).
    #[must_use]
    pub fn decision(&self, x: &FeatureVector) -> f64 {
        self.coefficients
            .iter()
            .zip(x.as_slice())
            .fold(self.intercept, |acc, (c, v)| acc + c * v)
    }
}

/// Logistic function.
#[must_use]
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision() {
        let mut coefs = [0.0; FEATURE_COUNT];
        coefs[0] = 0.5;
        coefs[8] = -2.0;
        let model = LinearModel::new(&coefs, 1.0).expect("valid");

        let mut x = [0.0; FEATURE_COUNT];
        x[0] = 10.0;
        x[8] = 1.5;
        let y = model.decision(&FeatureVector::from(x));
        assert!((y - (1.0 + 5.0 - 3.0)).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_wrong_shape() {
        let err = LinearModel::new(&[1.0; 9], 0.0).expect_err("9 coefficients");
        assert!(err.contains("expected 13"));
        assert!(LinearModel::new(&[f64::NAN; FEATURE_COUNT], 0.0).is_err());
    }

    #[test]
    fn test_sigmoid() {
        assert!((sigmoid(0.0) - 0.5).abs() < f64::EPSILON);
        assert!(sigmoid(20.0) > 0.999);
        assert!(sigmoid(-20.0) < 0.001);
    }
}

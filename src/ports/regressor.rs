//! Survival regressor port.

use crate::domain::{FeatureVector, InferenceError};

/// Trait for the survival duration regressor.
pub trait SurvivalRegressor: Send + Sync {
    /// Predict survival in months (possibly fractional) for a **scaled**
    /// feature vector.
    ///
    /// # Errors
    /// Returns `InferenceError` if the model cannot be evaluated on this input.
    fn predict(&self, scaled: &FeatureVector) -> Result<f64, InferenceError>;
}

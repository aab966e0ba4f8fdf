//! Feature scaler port.

use crate::domain::{FeatureVector, InferenceError};

/// Trait for the fitted feature scaler.
///
/// A deterministic per-column affine transform whose parameters were fixed at
/// training time. It is applied to the regressor input only; the classifier
/// was fitted on unscaled features.
pub trait FeatureScaler: Send + Sync {
    /// Transform a feature vector, keeping column order.
    ///
    /// # Errors
    /// Returns `InferenceError` if the transform produces non-finite values.
    fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError>;
}

//! Mortality classifier port.
//!
//! Abstracts the pre-trained binary classifier from the pipeline.

use crate::domain::{FeatureVector, InferenceError};

/// Trait for the mortality status classifier.
///
/// Implementations are loaded once at startup and must be stateless at
/// inference time so a single instance can serve every request.
pub trait MortalityClassifier: Send + Sync {
    /// Predict the mortality class for an **unscaled** feature vector.
    ///
    /// Returns `0` for Alive and `1` for Dead.
    ///
    /// # Errors
    /// Returns `InferenceError` if the model cannot be evaluated on this input.
    fn predict(&self, features: &FeatureVector) -> Result<u8, InferenceError>;
}

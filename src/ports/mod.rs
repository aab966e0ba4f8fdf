//! Ports layer: Trait definitions for external operations.
//!
//! Following Hexagonal Architecture, these traits define the boundaries
//! between the prediction pipeline and the pre-trained model artifacts.

mod classifier;
mod regressor;
mod scaler;

pub use classifier::MortalityClassifier;
pub use regressor::SurvivalRegressor;
pub use scaler::FeatureScaler;

pub use crate::domain::InferenceError;

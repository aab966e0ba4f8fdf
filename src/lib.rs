//! # Oncosurv
//!
//! Breast cancer survival prediction from a single clinical form.
//!
//! A patient record is encoded into a fixed 13-column feature vector, a
//! pre-trained classifier predicts mortality status from the raw vector, and
//! a pre-trained regressor predicts survival months from the scaled vector.
//!
//! ## Architecture
//!
//! The crate follows Hexagonal Architecture:
//! - `domain`: Core types (patient record, category encodings, feature vector, result)
//! - `ports`: Trait definitions for the classifier, scaler and regressor
//! - `adapters`: JSON model artifacts, manifest verification, log sanitization
//! - `application`: Model bundle and prediction pipeline
//! - `config`: Environment-driven settings
//! - `tui`: Terminal user interface

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod tui;

pub use application::{ArtifactBundle, ModelBundle, PredictionService};
pub use domain::{FeatureVector, MortalityStatus, PatientRecord, PredictionResult};

/// Result type for Oncosurv operations
pub type Result<T> = std::result::Result<T, OncosurvError>;

/// Main error type for Oncosurv
#[derive(Debug, thiserror::Error)]
pub enum OncosurvError {
    /// Fatal at startup: no prediction service can be built.
    #[error("Model unavailable: {0}")]
    ModelUnavailable(#[source] adapters::ArtifactError),

    /// Per request; the service remains usable.
    #[error("Prediction failed: {0}")]
    InferenceFailure(#[from] domain::InferenceError),

    #[error(transparent)]
    UnknownCategory(#[from] domain::EncodingError),

    #[error("Invalid patient data: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

//! Adapters layer: Concrete implementations of ports.
//!
//! - `artifacts`: JSON model artifacts (classifier, scaler, regressor) with
//!   signed-manifest verification
//! - `sanitize`: redaction of patient attributes and secrets in logs

pub mod artifacts;
pub mod sanitize;

pub use artifacts::{ArtifactError, ArtifactPolicy, ArtifactStore};

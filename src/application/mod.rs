//! Application layer: Use cases and services.
//!
//! Startup builds an immutable [`ModelBundle`]; the [`PredictionService`]
//! runs the per-request pipeline against it.

mod bundle;
mod prediction;

pub use bundle::{ArtifactBundle, ModelBundle};
pub use prediction::PredictionService;

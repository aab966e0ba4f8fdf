//! Domain layer: Core business types and logic.
//!
//! Pure types with no I/O: the patient record, its categorical encodings,
//! the fixed-order feature vector and the interpreted prediction.

pub mod encoding;
mod features;
mod patient;
mod prediction;

pub use encoding::{
    AStage, Categorical, EncodingError, EstrogenStatus, Grade, MaritalStatus, NStage,
    ProgesteroneStatus, Race, SixthStage, TStage,
};
pub use features::{FeatureVector, FEATURE_COUNT, FEATURE_NAMES};
pub use patient::{PatientRecord, AGE_RANGE, REGIONAL_NODES_RANGE, TUMOR_SIZE_CM_RANGE};
pub use prediction::{
    GaugeBand, InferenceError, MortalityStatus, PredictionResult, GAUGE_MAX_MONTHS,
};

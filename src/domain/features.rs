//! Fixed-order feature vector shared with the model artifacts.

use serde::{Deserialize, Serialize};

use super::encoding::Categorical;
use super::patient::PatientRecord;

/// Number of model input columns.
pub const FEATURE_COUNT: usize = 13;

/// Column names in model input order.
///
/// Must match the column order the artifacts were fitted on; artifacts carry
/// the same list and are rejected at load time if it differs.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "age",
    "race",
    "t_stage",
    "n_stage",
    "sixth_stage",
    "marital_status",
    "grade",
    "a_stage",
    "tumor_size",
    "estrogen_status",
    "progesterone_status",
    "regional_node_examined",
    "regional_node_positive",
];

/// Encoded model input for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    /// Encode a patient record.
    ///
    /// Numeric attributes pass through unchanged; categoricals are replaced by
    /// their codes. No normalization happens here.
    #[must_use]
    pub fn from_record(record: &PatientRecord) -> Self {
        Self([
            f64::from(record.age),
            record.race.feature(),
            record.t_stage.feature(),
            record.n_stage.feature(),
            record.sixth_stage.feature(),
            record.marital_status.feature(),
            record.grade.feature(),
            record.a_stage.feature(),
            record.tumor_size_cm,
            record.estrogen_status.feature(),
            record.progesterone_status.feature(),
            f64::from(record.regional_nodes_examined),
            f64::from(record.regional_nodes_positive),
        ])
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Apply a per-column transform, keeping column order.
    #[must_use]
    pub fn map_columns(&self, mut f: impl FnMut(usize, f64) -> f64) -> Self {
        let mut out = self.0;
        for (i, v) in out.iter_mut().enumerate() {
            *v = f(i, *v);
        }
        Self(out)
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}

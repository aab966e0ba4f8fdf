//! Patient record for breast cancer survival prediction.
//!
//! Attributes follow the SEER breast cancer extract the models were fitted on.

use serde::{Deserialize, Serialize};

use super::encoding::{
    AStage, EstrogenStatus, Grade, MaritalStatus, NStage, ProgesteroneStatus, Race, SixthStage,
    TStage,
};

/// Inclusive bounds for the numeric attributes (same as the form inputs).
pub const AGE_RANGE: (u32, u32) = (1, 120);
pub const TUMOR_SIZE_CM_RANGE: (f64, f64) = (0.1, 50.0);
pub const REGIONAL_NODES_RANGE: (u32, u32) = (0, 50);

/// Patient attributes entered for a single prediction.
///
/// Created per request and dropped once the prediction is rendered.
/// Only per-field bounds are checked; relations between fields
/// (e.g. positive nodes exceeding examined nodes) are accepted as entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatientRecord {
    /// Age in years (1-120)
    pub age: u32,
    pub race: Race,
    pub t_stage: TStage,
    pub n_stage: NStage,
    pub sixth_stage: SixthStage,
    pub marital_status: MaritalStatus,
    pub grade: Grade,
    pub a_stage: AStage,
    /// Tumor size in cm (0.1-50.0)
    pub tumor_size_cm: f64,
    pub estrogen_status: EstrogenStatus,
    pub progesterone_status: ProgesteroneStatus,
    /// Regional nodes examined (0-50)
    pub regional_nodes_examined: u32,
    /// Regional nodes positive (0-50)
    pub regional_nodes_positive: u32,
}

impl PatientRecord {
    /// Validate that all numeric attributes are within their input bounds.
    ///
    /// Messages name the field and its bounds but never the entered value,
    /// so they can be logged as-is.
    ///
    /// # Errors
    /// Returns validation errors as a vector of strings.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        let (lo, hi) = AGE_RANGE;
        if !(lo..=hi).contains(&self.age) {
            errors.push(format!("Age out of range [{lo}, {hi}]"));
        }

        let (lo, hi) = TUMOR_SIZE_CM_RANGE;
        if !self.tumor_size_cm.is_finite() || !(lo..=hi).contains(&self.tumor_size_cm) {
            errors.push(format!("Tumor size out of range [{lo}, {hi}] cm"));
        }

        let (lo, hi) = REGIONAL_NODES_RANGE;
        if !(lo..=hi).contains(&self.regional_nodes_examined) {
            errors.push(format!("Regional nodes examined out of range [{lo}, {hi}]"));
        }
        if !(lo..=hi).contains(&self.regional_nodes_positive) {
            errors.push(format!("Regional nodes positive out of range [{lo}, {hi}]"));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Reference patient loaded by the form's sample-data shortcut.
    #[must_use]
    pub fn sample() -> Self {
        Self {
            age: 55,
            race: Race::White,
            t_stage: TStage::T2,
            n_stage: NStage::N1,
            sixth_stage: SixthStage::IIA,
            marital_status: MaritalStatus::Married,
            grade: Grade::G2,
            a_stage: AStage::Regional,
            tumor_size_cm: 2.5,
            estrogen_status: EstrogenStatus::Positive,
            progesterone_status: ProgesteroneStatus::Negative,
            regional_nodes_examined: 10,
            regional_nodes_positive: 1,
        }
    }
}

impl Default for PatientRecord {
    /// Form defaults: numeric inputs at their minimum, first choice selected.
    fn default() -> Self {
        Self {
            age: AGE_RANGE.0,
            race: Race::White,
            t_stage: TStage::T1,
            n_stage: NStage::N1,
            sixth_stage: SixthStage::IIA,
            marital_status: MaritalStatus::Married,
            grade: Grade::G1,
            a_stage: AStage::Regional,
            tumor_size_cm: TUMOR_SIZE_CM_RANGE.0,
            estrogen_status: EstrogenStatus::Positive,
            progesterone_status: ProgesteroneStatus::Positive,
            regional_nodes_examined: REGIONAL_NODES_RANGE.0,
            regional_nodes_positive: REGIONAL_NODES_RANGE.0,
        }
    }
}

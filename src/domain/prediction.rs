//! Prediction result types.
//!
//! Represents the interpreted output of the mortality classifier and the
//! survival regressor.

use serde::{Deserialize, Serialize};

/// Upper bound of the survival gauge, in months.
pub const GAUGE_MAX_MONTHS: i64 = 120;

/// Error type for model invocation and result interpretation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum InferenceError {
    #[error("Non-finite model output: {0}")]
    NonFinite(String),

    #[error("Classifier returned unexpected class code {0}")]
    UnexpectedClassCode(u8),

    #[error("Model evaluation failed: {0}")]
    Model(String),
}

/// Predicted mortality status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MortalityStatus {
    Alive,
    Dead,
}

impl MortalityStatus {
    /// Interpret a raw classifier code (0 = Alive, 1 = Dead).
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Alive),
            1 => Some(Self::Dead),
            _ => None,
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Alive => (40, 167, 69), // #28A745
            Self::Dead => (220, 53, 69),  // #DC3545
        }
    }
}

impl std::fmt::Display for MortalityStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Alive => write!(f, "Alive"),
            Self::Dead => write!(f, "Dead"),
        }
    }
}

/// Color band of the survival gauge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GaugeBand {
    /// [0, 40) months
    Low,
    /// [40, 80) months
    Mid,
    /// [80, 120] months
    High,
}

impl GaugeBand {
    /// Band for a gauge value (already clamped to the gauge range).
    #[must_use]
    pub fn for_months(months: i64) -> Self {
        if months < 40 {
            Self::Low
        } else if months < 80 {
            Self::Mid
        } else {
            Self::High
        }
    }

    /// Inclusive-exclusive month range covered by the band.
    #[must_use]
    pub fn range(&self) -> (i64, i64) {
        match self {
            Self::Low => (0, 40),
            Self::Mid => (40, 80),
            Self::High => (80, GAUGE_MAX_MONTHS),
        }
    }

    /// Get the associated color for TUI display (RGB).
    #[must_use]
    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Self::Low => (255, 153, 153),  // #FF9999
            Self::Mid => (255, 204, 153),  // #FFCC99
            Self::High => (153, 255, 153), // #99FF99
        }
    }
}

/// Interpreted prediction for one patient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub mortality_status: MortalityStatus,

    /// Whole predicted months, `floor(raw)`.
    pub survival_months: i64,

    /// `floor(raw / 12)`
    pub survival_years: i64,

    /// `floor(raw) mod 12`, always in `0..12`.
    pub survival_months_remainder: i64,

    /// Regressor output before truncation.
    pub raw_survival_months: f64,
}

impl PredictionResult {
    /// Build a result from the raw classifier code and regressor output.
    ///
    /// # Errors
    /// Returns `InferenceError::UnexpectedClassCode` for codes other than 0/1
    /// and `InferenceError::NonFinite` if the regressor output is NaN or infinite.
    pub fn from_raw(class_code: u8, months: f64) -> Result<Self, InferenceError> {
        let mortality_status = MortalityStatus::from_code(class_code)
            .ok_or(InferenceError::UnexpectedClassCode(class_code))?;

        if !months.is_finite() {
            return Err(InferenceError::NonFinite(format!(
                "survival months = {months}"
            )));
        }

        let whole = months.floor() as i64;
        Ok(Self {
            mortality_status,
            survival_months: whole,
            survival_years: whole.div_euclid(12),
            survival_months_remainder: whole.rem_euclid(12),
            raw_survival_months: months,
        })
    }

    /// Value shown on the gauge, clamped to `[0, GAUGE_MAX_MONTHS]`.
    #[must_use]
    pub fn gauge_value(&self) -> i64 {
        self.survival_months.clamp(0, GAUGE_MAX_MONTHS)
    }

    #[must_use]
    pub fn gauge_band(&self) -> GaugeBand {
        GaugeBand::for_months(self.gauge_value())
    }

    /// e.g. "5 years and 7 months (67 months)"
    #[must_use]
    pub fn survival_text(&self) -> String {
        format!(
            "{} years and {} months ({} months)",
            self.survival_years, self.survival_months_remainder, self.survival_months
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_result() {
        let r = PredictionResult::from_raw(0, 67.5).expect("valid");
        assert_eq!(r.mortality_status, MortalityStatus::Alive);
        assert_eq!(r.survival_years, 5);
        assert_eq!(r.survival_months_remainder, 7);
        assert_eq!(r.survival_months, 67);
        assert_eq!(r.survival_text(), "5 years and 7 months (67 months)");
    }

    #[test]
    fn test_upper_gauge_boundary() {
        let r = PredictionResult::from_raw(1, 120.0).expect("valid");
        assert_eq!(r.mortality_status, MortalityStatus::Dead);
        assert_eq!(r.survival_years, 10);
        assert_eq!(r.survival_months_remainder, 0);
        assert_eq!(r.gauge_value(), 120);
        assert_eq!(r.gauge_band(), GaugeBand::High);
    }

    #[test]
    fn test_years_and_remainder_recompose() {
        let mut m = 0.0;
        while m < 300.0 {
            let r = PredictionResult::from_raw(0, m).expect("valid");
            assert_eq!(
                r.survival_years * 12 + r.survival_months_remainder,
                m.floor() as i64,
                "months = {m}"
            );
            assert!((0..12).contains(&r.survival_months_remainder));
            m += 0.37;
        }
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(MortalityStatus::from_code(0), Some(MortalityStatus::Alive));
        assert_eq!(MortalityStatus::from_code(1), Some(MortalityStatus::Dead));
        assert_eq!(MortalityStatus::from_code(2), None);

        let err = PredictionResult::from_raw(2, 10.0).expect_err("code 2 is undefined");
        assert!(matches!(err, InferenceError::UnexpectedClassCode(2)));
    }

    #[test]
    fn test_non_finite_months_rejected() {
        assert!(PredictionResult::from_raw(0, f64::NAN).is_err());
        assert!(PredictionResult::from_raw(0, f64::INFINITY).is_err());
    }

    #[test]
    fn test_gauge_clamps_but_text_does_not() {
        let long = PredictionResult::from_raw(0, 150.9).expect("valid");
        assert_eq!(long.gauge_value(), 120);
        assert!(long.survival_text().contains("(150 months)"));

        let negative = PredictionResult::from_raw(0, -3.2).expect("valid");
        assert_eq!(negative.survival_months, -4);
        assert_eq!(negative.survival_years, -1);
        assert_eq!(negative.survival_months_remainder, 8);
        assert_eq!(negative.gauge_value(), 0);
        assert_eq!(negative.gauge_band(), GaugeBand::Low);
    }

    #[test]
    fn test_gauge_bands() {
        assert_eq!(GaugeBand::for_months(0), GaugeBand::Low);
        assert_eq!(GaugeBand::for_months(39), GaugeBand::Low);
        assert_eq!(GaugeBand::for_months(40), GaugeBand::Mid);
        assert_eq!(GaugeBand::for_months(79), GaugeBand::Mid);
        assert_eq!(GaugeBand::for_months(80), GaugeBand::High);
        assert_eq!(GaugeBand::for_months(120), GaugeBand::High);
    }
}

//! Prediction service: runs the per-request pipeline.
//!
//! validate → assemble → classify (unscaled) → scale → regress (scaled) →
//! format. The service holds no mutable state, so one instance can serve any
//! number of requests and a failed request leaves nothing behind.

use std::sync::Arc;
use std::time::Instant;

use crate::application::ModelBundle;
use crate::domain::{FeatureVector, PatientRecord, PredictionResult};
use crate::ports::{FeatureScaler, MortalityClassifier, SurvivalRegressor};
use crate::OncosurvError;

pub struct PredictionService<C, S, R> {
    bundle: Arc<ModelBundle<C, S, R>>,
}

impl<C, S, R> Clone for PredictionService<C, S, R> {
    fn clone(&self) -> Self {
        Self {
            bundle: Arc::clone(&self.bundle),
        }
    }
}

impl<C, S, R> PredictionService<C, S, R>
where
    C: MortalityClassifier,
    S: FeatureScaler,
    R: SurvivalRegressor,
{
    #[must_use]
    pub fn new(bundle: Arc<ModelBundle<C, S, R>>) -> Self {
        Self { bundle }
    }

    /// Predict mortality status and survival duration for one patient.
    ///
    /// The classifier receives the raw feature vector; only the regressor
    /// receives the scaled one.
    ///
    /// # Errors
    /// Returns `OncosurvError::Validation` if a field is out of range and
    /// `OncosurvError::InferenceFailure` if any model call fails or the
    /// classifier returns a code other than 0/1.
    pub fn predict(&self, record: &PatientRecord) -> crate::Result<PredictionResult> {
        record
            .validate()
            .map_err(|errors| OncosurvError::Validation(errors.join("; ")))?;

        let started = Instant::now();
        let features = FeatureVector::from_record(record);

        let class_code = self.bundle.classifier().predict(&features)?;
        let scaled = self.bundle.scaler().transform(&features)?;
        let months = self.bundle.regressor().predict(&scaled)?;

        let result = PredictionResult::from_raw(class_code, months)?;

        tracing::info!(
            "Prediction completed: status={}, band={:?}, elapsed={:?}",
            result.mortality_status,
            result.gauge_band(),
            started.elapsed()
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{InferenceError, MortalityStatus};
    use std::sync::Mutex;

    /// Returns the given codes in order (the last one repeats) and records
    /// every vector it sees.
    struct StubClassifier {
        codes: Mutex<Vec<u8>>,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl StubClassifier {
        fn returning(codes: &[u8]) -> Self {
            Self {
                codes: Mutex::new(codes.iter().rev().copied().collect()),
                seen: Mutex::default(),
            }
        }
    }

    impl MortalityClassifier for StubClassifier {
        fn predict(&self, features: &FeatureVector) -> Result<u8, InferenceError> {
            self.seen.lock().expect("lock").push(*features);
            let mut codes = self.codes.lock().expect("lock");
            Ok(if codes.len() > 1 {
                codes.pop().unwrap_or(0)
            } else {
                codes.last().copied().unwrap_or(0)
            })
        }
    }

    /// Adds 1000 to every column.
    struct OffsetScaler;

    impl FeatureScaler for OffsetScaler {
        fn transform(&self, features: &FeatureVector) -> Result<FeatureVector, InferenceError> {
            Ok(features.map_columns(|_, x| x + 1000.0))
        }
    }

    struct StubRegressor {
        months: f64,
        seen: Mutex<Vec<FeatureVector>>,
    }

    impl StubRegressor {
        fn returning(months: f64) -> Self {
            Self {
                months,
                seen: Mutex::default(),
            }
        }
    }

    impl SurvivalRegressor for StubRegressor {
        fn predict(&self, scaled: &FeatureVector) -> Result<f64, InferenceError> {
            self.seen.lock().expect("lock").push(*scaled);
            Ok(self.months)
        }
    }

    type StubBundle = ModelBundle<StubClassifier, OffsetScaler, StubRegressor>;
    type StubService = PredictionService<StubClassifier, OffsetScaler, StubRegressor>;

    fn service(codes: &[u8], months: f64) -> (StubService, Arc<StubBundle>) {
        let bundle = Arc::new(ModelBundle::new(
            StubClassifier::returning(codes),
            OffsetScaler,
            StubRegressor::returning(months),
        ));
        (PredictionService::new(Arc::clone(&bundle)), bundle)
    }

    #[test]
    fn test_reference_patient_end_to_end() {
        let (svc, bundle) = service(&[0], 67.5);
        let result = svc.predict(&PatientRecord::sample()).expect("prediction");

        assert_eq!(result.mortality_status, MortalityStatus::Alive);
        assert_eq!(result.survival_years, 5);
        assert_eq!(result.survival_months_remainder, 7);
        assert_eq!(result.survival_months, 67);

        let expected = [55.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 2.5, 0.0, 1.0, 10.0, 1.0];
        let seen = bundle.classifier().seen.lock().expect("lock");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].as_slice(), expected);
    }

    #[test]
    fn test_classifier_unscaled_regressor_scaled() {
        let (svc, bundle) = service(&[1], 30.0);
        let result = svc.predict(&PatientRecord::sample()).expect("prediction");
        assert_eq!(result.mortality_status, MortalityStatus::Dead);

        let raw = bundle.classifier().seen.lock().expect("lock")[0];
        let scaled = bundle.regressor().seen.lock().expect("lock")[0];
        for (s, r) in scaled.as_slice().iter().zip(raw.as_slice()) {
            assert_eq!(*s, r + 1000.0);
        }
    }

    #[test]
    fn test_boundary_ten_years() {
        let (svc, _) = service(&[0], 120.0);
        let result = svc.predict(&PatientRecord::sample()).expect("prediction");
        assert_eq!(result.survival_years, 10);
        assert_eq!(result.survival_months_remainder, 0);
        assert_eq!(result.gauge_value(), 120);
    }

    #[test]
    fn test_unexpected_class_code_is_inference_failure() {
        let (svc, _) = service(&[2], 50.0);
        let err = svc.predict(&PatientRecord::sample()).expect_err("code 2");
        assert!(matches!(
            err,
            OncosurvError::InferenceFailure(InferenceError::UnexpectedClassCode(2))
        ));
    }

    #[test]
    fn test_failure_does_not_affect_next_request() {
        let (svc, _) = service(&[2, 0], 45.9);
        assert!(svc.predict(&PatientRecord::sample()).is_err());

        let result = svc.predict(&PatientRecord::sample()).expect("recovered");
        assert_eq!(result.mortality_status, MortalityStatus::Alive);
        assert_eq!(result.survival_months, 45);
    }

    #[test]
    fn test_out_of_range_record_rejected_before_inference() {
        let (svc, bundle) = service(&[0], 60.0);
        let record = PatientRecord {
            age: 0,
            ..PatientRecord::sample()
        };
        let err = svc.predict(&record).expect_err("age 0");
        assert!(matches!(err, OncosurvError::Validation(_)));
        assert_eq!(
            err.to_string(),
            "Invalid patient data: Age out of range [1, 120]"
        );
        assert!(bundle.classifier().seen.lock().expect("lock").is_empty());
    }

    #[test]
    fn test_nodes_positive_may_exceed_examined() {
        let (svc, _) = service(&[0], 60.0);
        let record = PatientRecord {
            regional_nodes_examined: 2,
            regional_nodes_positive: 9,
            ..PatientRecord::sample()
        };
        assert!(svc.predict(&record).is_ok());
    }

    #[test]
    fn test_service_shared_across_threads() {
        let (svc, bundle) = service(&[0], 80.0);
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let svc = svc.clone();
                std::thread::spawn(move || svc.predict(&PatientRecord::sample()))
            })
            .collect();
        for h in handles {
            let result = h.join().expect("join").expect("prediction");
            assert_eq!(result.survival_years, 6);
        }
        assert_eq!(bundle.regressor().seen.lock().expect("lock").len(), 4);
    }
}

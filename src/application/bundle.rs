//! Model bundle: the three pre-trained models, loaded once at startup.

use std::path::Path;

use crate::adapters::artifacts::{
    ArtifactClassifier, ArtifactPolicy, ArtifactRegressor, ArtifactStore, StandardScaler,
};
use crate::ports::{FeatureScaler, MortalityClassifier, SurvivalRegressor};
use crate::OncosurvError;

/// Immutable set of models shared by every prediction.
#[derive(Debug)]
pub struct ModelBundle<C, S, R> {
    classifier: C,
    scaler: S,
    regressor: R,
}

/// Bundle backed by the JSON artifacts of a model directory.
pub type ArtifactBundle = ModelBundle<ArtifactClassifier, StandardScaler, ArtifactRegressor>;

impl<C, S, R> ModelBundle<C, S, R>
where
    C: MortalityClassifier,
    S: FeatureScaler,
    R: SurvivalRegressor,
{
    #[must_use]
    pub fn new(classifier: C, scaler: S, regressor: R) -> Self {
        Self {
            classifier,
            scaler,
            regressor,
        }
    }

    #[must_use]
    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    #[must_use]
    pub fn scaler(&self) -> &S {
        &self.scaler
    }

    #[must_use]
    pub fn regressor(&self) -> &R {
        &self.regressor
    }
}

impl ArtifactBundle {
    /// Load all three artifacts from `dir`.
    ///
    /// # Errors
    /// Returns `OncosurvError::ModelUnavailable` if the directory fails its
    /// integrity check or any artifact is missing or malformed.
    pub fn from_artifacts(dir: impl AsRef<Path>, policy: &ArtifactPolicy) -> crate::Result<Self> {
        let dir = dir.as_ref();
        tracing::info!("Loading model artifacts from {:?}", dir);

        let store = ArtifactStore::open(dir, policy).map_err(OncosurvError::ModelUnavailable)?;
        let classifier = store
            .load_classifier()
            .map_err(OncosurvError::ModelUnavailable)?;
        let scaler = store.load_scaler().map_err(OncosurvError::ModelUnavailable)?;
        let regressor = store
            .load_regressor()
            .map_err(OncosurvError::ModelUnavailable)?;

        tracing::info!("Model bundle ready (signed={})", store.is_signed());
        Ok(Self::new(classifier, scaler, regressor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::artifacts::{ArtifactError, CLASSIFIER_FILE, REGRESSOR_FILE, SCALER_FILE};
    use crate::domain::{FeatureVector, FEATURE_NAMES};
    use std::fs;
    use tempfile::TempDir;

    fn write_models(dir: &Path) {
        let names = serde_json::to_string(&FEATURE_NAMES).expect("names");
        let zeros = serde_json::to_string(&vec![0.0; 13]).expect("zeros");
        fs::write(
            dir.join(CLASSIFIER_FILE),
            format!(r#"{{"kind":"logistic","feature_names":{names},"coefficients":{zeros},"intercept":-2.0}}"#),
        )
        .expect("write");
        fs::write(dir.join(SCALER_FILE), format!(r#"{{"feature_names":{names}}}"#)).expect("write");
        fs::write(
            dir.join(REGRESSOR_FILE),
            format!(r#"{{"kind":"linear","feature_names":{names},"coefficients":{zeros},"intercept":67.5}}"#),
        )
        .expect("write");
    }

    #[test]
    fn test_from_artifacts_loads_bundle() {
        let dir = TempDir::new().expect("tempdir");
        write_models(dir.path());
        let bundle = ArtifactBundle::from_artifacts(dir.path(), &ArtifactPolicy::unsigned())
            .expect("bundle");
        assert!(bundle.classifier().probability(&FeatureVector::from([0.0; 13])) < 0.5);
    }

    #[test]
    fn test_missing_scaler_is_model_unavailable() {
        let dir = TempDir::new().expect("tempdir");
        write_models(dir.path());
        fs::remove_file(dir.path().join(SCALER_FILE)).expect("remove");

        let err = ArtifactBundle::from_artifacts(dir.path(), &ArtifactPolicy::unsigned())
            .expect_err("scaler missing");
        assert!(matches!(
            err,
            OncosurvError::ModelUnavailable(ArtifactError::Missing { artifact: "scaler", .. })
        ));
    }

    #[test]
    fn test_empty_directory_is_model_unavailable() {
        let dir = TempDir::new().expect("tempdir");
        let err = ArtifactBundle::from_artifacts(dir.path(), &ArtifactPolicy::unsigned())
            .expect_err("nothing to load");
        assert!(matches!(err, OncosurvError::ModelUnavailable(_)));
    }
}

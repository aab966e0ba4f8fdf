//! Model artifact adapter.
//!
//! Loads the three exported artifacts (classifier, scaler, regressor) from a
//! model directory. When the directory carries a signed manifest, every file
//! is hashed on the exact bytes that get parsed, so a file swapped between
//! verification and use is rejected.

mod classifier;
mod forest;
mod linear;
pub mod manifest;
mod regressor;
mod scaler;

pub use classifier::{ArtifactClassifier, ClassifierArtifact};
pub use forest::{DecisionTree, TreeEnsemble, TreeNode};
pub use linear::LinearModel;
pub use manifest::{
    sha256_hex, verifying_key_from_b64, SignedManifest, MANIFEST_FILE, MANIFEST_VERSION,
    SIGNATURE_FILE,
};
pub use regressor::{ArtifactRegressor, RegressorArtifact};
pub use scaler::{ScalerArtifact, StandardScaler};

use std::fs;
use std::path::{Path, PathBuf};

use ed25519_dalek::VerifyingKey;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::domain::FEATURE_NAMES;

pub const CLASSIFIER_FILE: &str = "mortality_status_classifier.json";
pub const REGRESSOR_FILE: &str = "survival_months_regressor.json";
pub const SCALER_FILE: &str = "scaler.json";

/// Every file a complete model directory must contain.
pub const ARTIFACT_FILES: [&str; 3] = [CLASSIFIER_FILE, SCALER_FILE, REGRESSOR_FILE];

#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("{artifact} artifact not found at {path:?}")]
    Missing { artifact: &'static str, path: PathBuf },

    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed {artifact} artifact: {message}")]
    Format {
        artifact: &'static str,
        message: String,
    },

    #[error("{artifact} artifact does not match the feature layout: {message}")]
    Shape {
        artifact: &'static str,
        message: String,
    },

    #[error("Model integrity check failed: {0}")]
    Integrity(String),
}

/// How strictly a model directory is checked before use.
#[derive(Debug, Clone, Default)]
pub struct ArtifactPolicy {
    /// Accept directories without `manifest.json` + `model.sig`.
    pub allow_unsigned: bool,
    /// Ed25519 key the manifest must be signed with.
    pub verifying_key: Option<VerifyingKey>,
    /// Reject manifests older than this many seconds.
    pub max_age_secs: Option<i64>,
}

impl ArtifactPolicy {
    /// Policy accepting unsigned directories, for local development.
    #[must_use]
    pub fn unsigned() -> Self {
        Self {
            allow_unsigned: true,
            ..Self::default()
        }
    }
}

/// A model directory whose manifest (if any) has been verified.
#[derive(Debug)]
pub struct ArtifactStore {
    dir: PathBuf,
    manifest: Option<SignedManifest>,
}

impl ArtifactStore {
    /// Open a model directory under the given policy.
    ///
    /// # Errors
    /// Returns `ArtifactError::Integrity` if the signature or manifest is
    /// rejected, or if the directory is unsigned and the policy requires a
    /// signature.
    pub fn open(dir: impl AsRef<Path>, policy: &ArtifactPolicy) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref().to_path_buf();
        let manifest = manifest::verify(&dir, policy, &ARTIFACT_FILES)?;
        Ok(Self { dir, manifest })
    }

    #[must_use]
    pub fn is_signed(&self) -> bool {
        self.manifest.is_some()
    }

    /// # Errors
    /// Returns an `ArtifactError` if the classifier file is missing,
    /// malformed, fails its hash check or targets another feature layout.
    pub fn load_classifier(&self) -> Result<ArtifactClassifier, ArtifactError> {
        const ARTIFACT: &str = "classifier";
        let artifact: ClassifierArtifact = self.read(ARTIFACT, CLASSIFIER_FILE)?;
        check_feature_names(ARTIFACT, artifact.feature_names())?;
        ArtifactClassifier::try_from(artifact)
            .map_err(|message| ArtifactError::Shape { artifact: ARTIFACT, message })
    }

    /// # Errors
    /// Returns an `ArtifactError` if the scaler file is missing, malformed,
    /// fails its hash check or targets another feature layout.
    pub fn load_scaler(&self) -> Result<StandardScaler, ArtifactError> {
        const ARTIFACT: &str = "scaler";
        let artifact: ScalerArtifact = self.read(ARTIFACT, SCALER_FILE)?;
        check_feature_names(ARTIFACT, &artifact.feature_names)?;
        StandardScaler::try_from(&artifact)
            .map_err(|message| ArtifactError::Shape { artifact: ARTIFACT, message })
    }

    /// # Errors
    /// Returns an `ArtifactError` if the regressor file is missing,
    /// malformed, fails its hash check or targets another feature layout.
    pub fn load_regressor(&self) -> Result<ArtifactRegressor, ArtifactError> {
        const ARTIFACT: &str = "regressor";
        let artifact: RegressorArtifact = self.read(ARTIFACT, REGRESSOR_FILE)?;
        check_feature_names(ARTIFACT, artifact.feature_names())?;
        ArtifactRegressor::try_from(artifact)
            .map_err(|message| ArtifactError::Shape { artifact: ARTIFACT, message })
    }

    fn read<T: DeserializeOwned>(
        &self,
        artifact: &'static str,
        file: &str,
    ) -> Result<T, ArtifactError> {
        let path = self.dir.join(file);
        let bytes = fs::read(&path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                ArtifactError::Missing {
                    artifact,
                    path: path.clone(),
                }
            } else {
                ArtifactError::Io {
                    path: path.clone(),
                    source,
                }
            }
        })?;

        if let Some(manifest) = &self.manifest {
            let expected = manifest.expected_hash(file).ok_or_else(|| {
                ArtifactError::Integrity(format!("{MANIFEST_FILE} does not bind {file}"))
            })?;
            let actual = sha256_hex(&bytes);
            if !manifest::constant_time_eq_str(&actual, &expected.to_ascii_lowercase()) {
                return Err(ArtifactError::Integrity(format!(
                    "SHA-256 mismatch for {file}"
                )));
            }
        }

        let parsed = serde_json::from_slice(&bytes).map_err(|e| ArtifactError::Format {
            artifact,
            message: e.to_string(),
        })?;
        tracing::debug!("Loaded {} artifact from {:?}", artifact, path);
        Ok(parsed)
    }
}

/// Column order must match the assembler exactly; an empty list is accepted
/// for artifacts exported without names.
fn check_feature_names(artifact: &'static str, names: &[String]) -> Result<(), ArtifactError> {
    if names.is_empty() {
        tracing::warn!("{} artifact carries no feature names; assuming standard order", artifact);
        return Ok(());
    }
    if names.len() != FEATURE_NAMES.len() || names.iter().zip(FEATURE_NAMES).any(|(a, b)| a != b) {
        return Err(ArtifactError::Shape {
            artifact,
            message: format!("expected feature order {FEATURE_NAMES:?}, got {names:?}"),
        });
    }
    Ok(())
}

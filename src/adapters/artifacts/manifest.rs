//! Signed manifest verification for model directories.
//!
//! A signed model directory carries:
//! - `manifest.json`: version, anti-rollback fields and the SHA-256 of every
//!   bound artifact file
//! - `model.sig`: Ed25519 signature over the exact manifest bytes
//!
//! The signature is checked here; per-file hashes are checked by the store
//! against the bytes it actually parses.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use base64::Engine;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{ArtifactError, ArtifactPolicy};

pub const MANIFEST_FILE: &str = "manifest.json";
pub const SIGNATURE_FILE: &str = "model.sig";
pub const MANIFEST_VERSION: u32 = 1;

/// Allowed clock skew for `created_at`, in seconds.
const MAX_CLOCK_SKEW_SECS: i64 = 300;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignedManifest {
    pub version: u32,
    /// Monotonic serial number (CI build number or creation time).
    pub serial: u64,
    /// Unix timestamp (seconds) when the manifest was created.
    pub created_at: i64,
    /// Random nonce (base64, 16 bytes).
    pub nonce_b64: String,
    /// Relative file name → lowercase SHA-256 hex.
    pub files: BTreeMap<String, String>,
}

impl SignedManifest {
    /// Expected SHA-256 hex of a bound file.
    #[must_use]
    pub fn expected_hash(&self, file: &str) -> Option<&str> {
        self.files.get(file).map(String::as_str)
    }
}

#[must_use]
pub fn sha256_hex(bytes: &[u8]) -> String {
    Sha256::digest(bytes)
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

/// Constant-time compare for ASCII strings (used for SHA-256 hex digests).
#[must_use]
pub fn constant_time_eq_str(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff: u8 = 0;
    for (x, y) in a.as_bytes().iter().zip(b.as_bytes().iter()) {
        diff |= x ^ y;
    }
    diff == 0
}

pub fn unix_now() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

/// # Errors
/// Returns `ArtifactError::Integrity` unless the value decodes to 16 bytes.
pub fn validate_nonce_b64(nonce_b64: &str) -> Result<(), ArtifactError> {
    let raw = base64::engine::general_purpose::STANDARD
        .decode(nonce_b64.trim())
        .map_err(|e| ArtifactError::Integrity(format!("Invalid nonce base64: {e}")))?;
    if raw.len() != 16 {
        return Err(ArtifactError::Integrity(
            "nonce must decode to exactly 16 bytes".into(),
        ));
    }
    Ok(())
}

/// Decode a base64 Ed25519 public key.
///
/// # Errors
/// Returns `ArtifactError::Integrity` for malformed keys.
pub fn verifying_key_from_b64(b64: &str) -> Result<VerifyingKey, ArtifactError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(b64.trim())
        .map_err(|_| ArtifactError::Integrity("Invalid public key base64".into()))?;
    let pubkey: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
        ArtifactError::Integrity("Invalid public key length (expected 32 bytes)".into())
    })?;
    VerifyingKey::from_bytes(&pubkey)
        .map_err(|_| ArtifactError::Integrity("Invalid verifying key".into()))
}

/// Verify the signed manifest of a model directory, if any.
///
/// Returns `Ok(None)` for an unsigned directory when the policy allows it.
/// A signed manifest must bind every file in `required`.
///
/// # Errors
/// Returns `ArtifactError::Integrity` for a missing/invalid signature, an
/// unsupported or stale manifest, or unbound required files.
pub fn verify(
    dir: &Path,
    policy: &ArtifactPolicy,
    required: &[&str],
) -> Result<Option<SignedManifest>, ArtifactError> {
    let sig_path = dir.join(SIGNATURE_FILE);
    let manifest_path = dir.join(MANIFEST_FILE);

    if !sig_path.exists() || !manifest_path.exists() {
        if policy.allow_unsigned {
            tracing::warn!(
                "Loading UNSIGNED model artifacts from {:?} (unsigned models explicitly allowed)",
                dir
            );
            return Ok(None);
        }
        tracing::error!(
            "Model signature not found at {:?}. Sign the directory with `sign_model` \
             or set ONCOSURV_ALLOW_UNSIGNED_MODELS=true.",
            sig_path
        );
        return Err(ArtifactError::Integrity(format!(
            "{SIGNATURE_FILE} and {MANIFEST_FILE} are required"
        )));
    }

    let public_key = policy.verifying_key.ok_or_else(|| {
        ArtifactError::Integrity(
            "Signed models found but no verifying key configured \
             (ONCOSURV_MODEL_SIGNING_PUBKEY_B64 or ..._B64_FILE)"
                .into(),
        )
    })?;

    let sig_bytes = fs::read(&sig_path).map_err(|source| ArtifactError::Io {
        path: sig_path.clone(),
        source,
    })?;
    let sig_bytes: [u8; 64] = sig_bytes.as_slice().try_into().map_err(|_| {
        ArtifactError::Integrity("Invalid signature length (expected 64 bytes)".into())
    })?;
    let signature = Signature::from_bytes(&sig_bytes);

    let manifest_content = fs::read(&manifest_path).map_err(|source| ArtifactError::Io {
        path: manifest_path.clone(),
        source,
    })?;

    public_key
        .verify(&manifest_content, &signature)
        .map_err(|_| ArtifactError::Integrity("Invalid model signature".into()))?;

    let manifest: SignedManifest = serde_json::from_slice(&manifest_content)
        .map_err(|e| ArtifactError::Integrity(format!("Invalid {MANIFEST_FILE} format: {e}")))?;

    if manifest.version != MANIFEST_VERSION {
        return Err(ArtifactError::Integrity(format!(
            "Unsupported manifest version: {}",
            manifest.version
        )));
    }
    validate_nonce_b64(&manifest.nonce_b64)?;

    let now = unix_now();
    if manifest.created_at > now + MAX_CLOCK_SKEW_SECS {
        return Err(ArtifactError::Integrity(
            "manifest created_at is in the future".into(),
        ));
    }
    if let Some(max_age) = policy.max_age_secs.filter(|&s| s > 0) {
        if now.saturating_sub(manifest.created_at) > max_age {
            return Err(ArtifactError::Integrity(
                "manifest is older than allowed max age".into(),
            ));
        }
    }

    for file in required {
        if manifest.expected_hash(file).is_none() {
            return Err(ArtifactError::Integrity(format!(
                "{MANIFEST_FILE} does not bind {file}"
            )));
        }
    }

    tracing::info!(
        "Model manifest signature verified (serial={}, {} files)",
        manifest.serial,
        manifest.files.len()
    );
    Ok(Some(manifest))
}

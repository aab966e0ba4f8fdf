//! Runtime configuration from environment variables.
//!
//! All variables are read once at startup. `Settings::from_lookup` accepts any
//! key lookup so the parsing rules can be exercised without touching the
//! process environment.

use std::path::PathBuf;

use crate::adapters::artifacts::{verifying_key_from_b64, ArtifactError, ArtifactPolicy};
use crate::adapters::sanitize::DEFAULT_SANITIZE_MAX_BYTES;

pub const ENV_MODEL_PATH: &str = "ONCOSURV_MODEL_PATH";
pub const ENV_LOG_MODE: &str = "ONCOSURV_LOG_MODE";
pub const ENV_LOG_FILE: &str = "ONCOSURV_LOG_FILE";
pub const ENV_ALLOW_UNSIGNED: &str = "ONCOSURV_ALLOW_UNSIGNED_MODELS";
pub const ENV_PUBKEY_B64: &str = "ONCOSURV_MODEL_SIGNING_PUBKEY_B64";
pub const ENV_PUBKEY_B64_FILE: &str = "ONCOSURV_MODEL_SIGNING_PUBKEY_B64_FILE";
pub const ENV_MAX_AGE_SECS: &str = "ONCOSURV_MODEL_MAX_AGE_SECS";
pub const ENV_SANITIZE_MAX_BYTES: &str = "ONCOSURV_SANITIZE_MAX_BYTES";

const DEFAULT_MODEL_PATH: &str = "models";
const DEFAULT_LOG_FILE: &str = "oncosurv.log";

/// Where log output goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogMode {
    /// File when stdout is a TTY (the TUI owns the terminal), stdout otherwise.
    #[default]
    Auto,
    File,
    Stdout,
}

impl LogMode {
    fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "file" => Self::File,
            "stdout" => Self::Stdout,
            _ => Self::Auto,
        }
    }

    /// Resolve `Auto` against whether stdout is interactive.
    #[must_use]
    pub fn use_file(self, interactive: bool) -> bool {
        match self {
            Self::File => true,
            Self::Stdout => false,
            Self::Auto => interactive,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub model_path: PathBuf,
    pub log_mode: LogMode,
    pub log_file: PathBuf,
    pub allow_unsigned_models: bool,
    /// Base64 Ed25519 public key, inline or read from the `_FILE` variant.
    pub signing_pubkey_b64: Option<String>,
    pub model_max_age_secs: Option<i64>,
    /// Per-line cap applied by the log sanitizer.
    pub sanitize_max_bytes: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            log_mode: LogMode::Auto,
            log_file: PathBuf::from(DEFAULT_LOG_FILE),
            allow_unsigned_models: false,
            signing_pubkey_b64: None,
            model_max_age_secs: None,
            sanitize_max_bytes: DEFAULT_SANITIZE_MAX_BYTES,
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes"
    )
}

impl Settings {
    /// Read settings from the process environment.
    ///
    /// # Errors
    /// Returns an error if the public key file is configured but unreadable
    /// or a numeric variable does not parse.
    pub fn from_env() -> crate::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read settings through an arbitrary key lookup.
    ///
    /// # Errors
    /// Returns an error if the public key file is configured but unreadable
    /// or a numeric variable does not parse.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> crate::Result<Self> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();

        let signing_pubkey_b64 = match non_empty(ENV_PUBKEY_B64) {
            Some(inline) => Some(inline.trim().to_string()),
            None => match non_empty(ENV_PUBKEY_B64_FILE) {
                Some(path) => Some(std::fs::read_to_string(path.trim())?.trim().to_string()),
                None => None,
            },
        };

        let model_max_age_secs = match non_empty(ENV_MAX_AGE_SECS) {
            Some(v) => Some(v.trim().parse::<i64>().map_err(|_| {
                crate::OncosurvError::Validation(format!(
                    "{ENV_MAX_AGE_SECS} must be an integer number of seconds"
                ))
            })?),
            None => None,
        };

        let sanitize_max_bytes = match non_empty(ENV_SANITIZE_MAX_BYTES) {
            Some(v) => v
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    crate::OncosurvError::Validation(format!(
                        "{ENV_SANITIZE_MAX_BYTES} must be a positive number of bytes"
                    ))
                })?,
            None => defaults.sanitize_max_bytes,
        };

        Ok(Self {
            model_path: non_empty(ENV_MODEL_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.model_path),
            log_mode: non_empty(ENV_LOG_MODE)
                .map(|v| LogMode::parse(&v))
                .unwrap_or_default(),
            log_file: non_empty(ENV_LOG_FILE)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
            allow_unsigned_models: non_empty(ENV_ALLOW_UNSIGNED)
                .is_some_and(|v| parse_bool(&v)),
            signing_pubkey_b64,
            model_max_age_secs,
            sanitize_max_bytes,
        })
    }

    /// Build the artifact loading policy.
    ///
    /// # Errors
    /// Returns `ArtifactError::Integrity` if the configured key is malformed.
    pub fn artifact_policy(&self) -> Result<ArtifactPolicy, ArtifactError> {
        let verifying_key = self
            .signing_pubkey_b64
            .as_deref()
            .map(verifying_key_from_b64)
            .transpose()?;
        Ok(ArtifactPolicy {
            allow_unsigned: self.allow_unsigned_models,
            verifying_key,
            max_age_secs: self.model_max_age_secs,
        })
    }
}

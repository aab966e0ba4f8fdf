//! Model signing utility for Oncosurv model directories.
//!
//! Writes `manifest.json` (SHA-256 of the classifier, scaler and regressor
//! artifacts plus anti-rollback fields) and `model.sig` (Ed25519 signature
//! over the manifest bytes), then re-opens the directory with the derived
//! public key to confirm it loads.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin sign_model -- <model_dir> [--serial <n>] [--nonce-b64 <b64>]
//! ```
//!
//! The signing seed (base64, 32 bytes) is read from, in order:
//! `ONCOSURV_MODEL_SIGNING_KEY_B64_FD`, `ONCOSURV_MODEL_SIGNING_KEY_B64_FILE`,
//! `/run/secrets/oncosurv_model_signing_key_b64`, and in debug builds only
//! `ONCOSURV_MODEL_SIGNING_KEY_B64`.

use std::collections::BTreeMap;
use std::env;
use std::fs;
#[cfg(unix)]
use std::os::unix::io::FromRawFd;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use rand::RngCore;
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use oncosurv::adapters::artifacts::manifest::{unix_now, validate_nonce_b64};
use oncosurv::adapters::artifacts::{
    sha256_hex, ArtifactPolicy, ArtifactStore, SignedManifest, ARTIFACT_FILES, MANIFEST_FILE,
    MANIFEST_VERSION, SIGNATURE_FILE,
};

const KEY_FD_ENV: &str = "ONCOSURV_MODEL_SIGNING_KEY_B64_FD";
const KEY_FILE_ENV: &str = "ONCOSURV_MODEL_SIGNING_KEY_B64_FILE";
const KEY_ENV: &str = "ONCOSURV_MODEL_SIGNING_KEY_B64";
const DOCKER_SECRET_PATH: &str = "/run/secrets/oncosurv_model_signing_key_b64";

#[derive(Zeroize, ZeroizeOnDrop)]
struct Seed([u8; 32]);

fn non_empty_secret(raw: &str) -> Result<Zeroizing<String>> {
    let secret = raw.trim_end_matches(['\n', '\r']).to_string();
    if secret.is_empty() {
        bail!("Empty signing key");
    }
    Ok(Zeroizing::new(secret))
}

fn read_signing_seed_b64() -> Result<Zeroizing<String>> {
    #[cfg(unix)]
    if let Ok(fd_str) = env::var(KEY_FD_ENV) {
        use std::io::Read;

        let fd: i32 = fd_str.trim().parse().context("Invalid key FD")?;
        if fd <= 2 {
            bail!("Refusing to read signing key from stdio FD");
        }
        // SAFETY: take ownership of FD for one-time secret read.
        let mut file = unsafe { fs::File::from_raw_fd(fd) };
        let mut buf = Zeroizing::new(String::new());
        file.read_to_string(&mut buf)
            .context("Failed reading signing key from FD")?;
        return non_empty_secret(&buf);
    }

    if let Ok(path) = env::var(KEY_FILE_ENV) {
        let content = Zeroizing::new(
            fs::read_to_string(path.trim()).context("Failed reading signing key file")?,
        );
        return non_empty_secret(&content);
    }

    if Path::new(DOCKER_SECRET_PATH).exists() {
        let content = Zeroizing::new(
            fs::read_to_string(DOCKER_SECRET_PATH).context("Failed reading docker secret")?,
        );
        return non_empty_secret(&content);
    }

    if cfg!(debug_assertions) {
        if let Ok(v) = env::var(KEY_ENV) {
            return non_empty_secret(&v);
        }
    }

    Err(anyhow!(
        "Missing signing key. Provide one of: {KEY_FD_ENV}, {KEY_FILE_ENV}, or \
         {DOCKER_SECRET_PATH} ({KEY_ENV} is accepted in debug builds only)."
    ))
}

fn read_signing_seed() -> Result<Seed> {
    let v = read_signing_seed_b64()?;
    let raw = Zeroizing::new(
        general_purpose::STANDARD
            .decode(v.trim())
            .context("Invalid base64 in signing key")?,
    );
    let seed: [u8; 32] = raw.as_slice().try_into().map_err(|_| {
        anyhow!(
            "Signing key seed must be 32 bytes after base64 decode (got {})",
            raw.len()
        )
    })?;
    Ok(Seed(seed))
}

struct Args {
    model_dir: PathBuf,
    serial: Option<u64>,
    nonce_b64: Option<String>,
}

fn usage() -> anyhow::Error {
    anyhow!("Usage: sign_model <model_dir> [--serial <u64>] [--nonce-b64 <b64_16_bytes>]")
}

fn parse_args() -> Result<Args> {
    let mut args = env::args().skip(1);
    let mut model_dir: Option<PathBuf> = None;
    let mut serial: Option<u64> = None;
    let mut nonce_b64: Option<String> = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--serial" => {
                let v = args.next().ok_or_else(usage)?;
                serial = Some(v.trim().parse().context("--serial must be a u64")?);
            }
            "--nonce-b64" => nonce_b64 = Some(args.next().ok_or_else(usage)?),
            "-h" | "--help" => return Err(usage()),
            _ if model_dir.is_none() => model_dir = Some(PathBuf::from(arg)),
            _ => return Err(usage()),
        }
    }

    Ok(Args {
        model_dir: model_dir.ok_or_else(usage)?,
        serial,
        nonce_b64,
    })
}

fn make_nonce_b64() -> String {
    let mut nonce = [0u8; 16];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    general_purpose::STANDARD.encode(nonce)
}

fn main() -> Result<()> {
    let args = parse_args()?;
    let model_dir = args.model_dir;

    let seed = read_signing_seed()?;
    let signing_key = SigningKey::from_bytes(&seed.0);
    drop(seed);
    let verifying_key = signing_key.verifying_key();

    let mut files: BTreeMap<String, String> = BTreeMap::new();
    for rel in ARTIFACT_FILES {
        let path = model_dir.join(rel);
        let bytes = fs::read(&path).with_context(|| format!("Failed to read {path:?}"))?;
        files.insert(rel.to_string(), sha256_hex(&bytes));
    }

    let created_at = unix_now();
    let serial = args
        .serial
        .unwrap_or_else(|| u64::try_from(created_at).unwrap_or(1));

    let nonce_b64 = match args.nonce_b64 {
        Some(v) => {
            validate_nonce_b64(&v)?;
            v
        }
        None => make_nonce_b64(),
    };

    let manifest = SignedManifest {
        version: MANIFEST_VERSION,
        serial,
        created_at,
        nonce_b64,
        files,
    };
    let manifest_bytes =
        serde_json::to_vec_pretty(&manifest).context("Failed to serialize manifest")?;

    let manifest_path = model_dir.join(MANIFEST_FILE);
    fs::write(&manifest_path, &manifest_bytes)
        .with_context(|| format!("Failed to write {manifest_path:?}"))?;

    let sig_path = model_dir.join(SIGNATURE_FILE);
    fs::write(&sig_path, signing_key.sign(&manifest_bytes).to_bytes())
        .with_context(|| format!("Failed to write {sig_path:?}"))?;

    // Round-trip through the loader with the derived key.
    let policy = ArtifactPolicy {
        allow_unsigned: false,
        verifying_key: Some(verifying_key),
        max_age_secs: None,
    };
    let store = ArtifactStore::open(&model_dir, &policy)?;
    store.load_classifier()?;
    store.load_scaler()?;
    store.load_regressor()?;

    println!("Signed manifest: {manifest_path:?} (serial={serial})");
    println!("Wrote signature: {sig_path:?}");
    println!(
        "ONCOSURV_MODEL_SIGNING_PUBKEY_B64={}",
        general_purpose::STANDARD.encode(verifying_key.as_bytes())
    );

    Ok(())
}

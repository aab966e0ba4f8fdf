//! Ed25519 keypair generation utility for model signing.
//!
//! - Private seed (32 bytes, base64) written with 0600 permissions
//! - Public key (base64) optionally written separately, ready for
//!   `ONCOSURV_MODEL_SIGNING_PUBKEY_B64_FILE`
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_keypair -- --out-seed <path> [--out-pub <path>] [--force]
//! ```

use std::io::Write;
#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use base64::engine::general_purpose;
use base64::Engine;
use ed25519_dalek::SigningKey;
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

const USAGE: &str = "Usage: generate_keypair --out-seed <path> [--out-pub <path>] [--force]";

fn write_new(path: &Path, contents: &[u8], mode: u32, force: bool) -> Result<()> {
    if path.exists() && !force {
        bail!("Refusing to overwrite existing file {path:?}. Use --force.");
    }
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let mut opts = std::fs::OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    opts.mode(mode);
    #[cfg(not(unix))]
    let _ = mode;

    let mut file = opts
        .open(path)
        .with_context(|| format!("Failed to open {path:?}"))?;
    file.write_all(contents)?;
    file.write_all(b"\n")?;
    Ok(())
}

fn path_arg(args: &mut impl Iterator<Item = String>) -> Result<PathBuf> {
    args.next()
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!(USAGE))
}

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let mut out_seed_path: Option<PathBuf> = None;
    let mut out_pub_path: Option<PathBuf> = None;
    let mut force = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out" | "--out-seed" => out_seed_path = Some(path_arg(&mut args)?),
            "--out-pub" => out_pub_path = Some(path_arg(&mut args)?),
            "--force" => force = true,
            "-h" | "--help" => {
                println!(
                    "{USAGE}\n\nWrites the base64 Ed25519 seed to <path> with 0600 permissions. \
                     Optionally writes the base64 public key to --out-pub. \
                     Prints only non-secret material."
                );
                return Ok(());
            }
            _ => bail!("Unknown arg: {arg}\n{USAGE}"),
        }
    }
    let out_seed_path = out_seed_path.ok_or_else(|| anyhow!(USAGE))?;

    let mut seed = Zeroizing::new([0u8; 32]);
    OsRng.fill_bytes(&mut seed[..]);

    let signing_key = SigningKey::from_bytes(&seed);
    let pub_b64 = general_purpose::STANDARD.encode(signing_key.verifying_key().as_bytes());
    let seed_b64 = Zeroizing::new(general_purpose::STANDARD.encode(&seed[..]));

    if let Some(pub_path) = &out_pub_path {
        if pub_path.exists() && !force {
            bail!("Refusing to overwrite existing file {pub_path:?}. Use --force.");
        }
    }

    write_new(&out_seed_path, seed_b64.as_bytes(), 0o600, force)?;
    println!("Wrote signing seed (base64) to {out_seed_path:?}");

    if let Some(pub_path) = &out_pub_path {
        write_new(pub_path, pub_b64.as_bytes(), 0o644, force)?;
        println!("Wrote public key (base64) to {pub_path:?}");
    }
    println!("ONCOSURV_MODEL_SIGNING_PUBKEY_B64={pub_b64}");

    Ok(())
}

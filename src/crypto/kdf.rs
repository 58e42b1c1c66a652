//! Passphrase-based key derivation using Argon2id.
//!
//! Argon2id is memory-hard, which makes brute-forcing a stolen vault
//! expensive on GPUs and ASICs.  The work factor is not free-form: each
//! vault format version names exactly one parameter set, so the header's
//! version byte is enough to re-derive the same key later.

use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::TryRngCore;
use tracing::debug;

use super::keys::{DerivedKey, KEY_LEN};
use crate::errors::{PassVaultError, Result};

/// Length of a freshly generated salt in bytes (256 bits).
pub const SALT_LEN: usize = 32;

/// Argon2id work-factor parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Argon2Params {
    /// Memory cost in KiB.
    pub memory_kib: u32,
    /// Number of iterations.
    pub iterations: u32,
    /// Parallelism lanes.
    pub parallelism: u32,
}

/// Parameter set bound to vault format version 1 (64 MB, 3 passes, 4 lanes).
pub const V1_PARAMS: Argon2Params = Argon2Params {
    memory_kib: 65_536,
    iterations: 3,
    parallelism: 4,
};

impl Argon2Params {
    /// Look up the parameter set for a vault format version.
    pub fn for_format_version(version: u8) -> Result<Self> {
        match version {
            1 => Ok(V1_PARAMS),
            other => Err(PassVaultError::UnsupportedVersion(other)),
        }
    }
}

/// Derive the vault key from a passphrase and salt.
///
/// The same passphrase + salt + params always produce the same key.
/// The passphrase is only borrowed for the duration of the call.
pub fn derive_key(passphrase: &str, salt: &[u8], argon2_params: &Argon2Params) -> Result<DerivedKey> {
    if passphrase.is_empty() {
        return Err(PassVaultError::WeakInput);
    }

    let params = Params::new(
        argon2_params.memory_kib,
        argon2_params.iterations,
        argon2_params.parallelism,
        Some(KEY_LEN),
    )
    .map_err(|e| PassVaultError::KeyDerivationFailed(format!("invalid Argon2 params: {e}")))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    debug!(
        memory_kib = argon2_params.memory_kib,
        iterations = argon2_params.iterations,
        "deriving vault key"
    );

    let mut key = DerivedKey::zeroed();
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, key.as_mut_bytes())
        .map_err(|e| PassVaultError::KeyDerivationFailed(format!("Argon2id hashing failed: {e}")))?;

    Ok(key)
}

/// Generate a random 32-byte salt from the operating system RNG.
pub fn generate_salt() -> Result<[u8; SALT_LEN]> {
    let mut salt = [0u8; SALT_LEN];
    OsRng
        .try_fill_bytes(&mut salt)
        .map_err(|e| PassVaultError::RandomSource(e.to_string()))?;
    Ok(salt)
}

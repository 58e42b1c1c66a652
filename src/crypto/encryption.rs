//! AES-256-GCM authenticated encryption of the vault payload.
//!
//! Unlike a self-framing blob, the nonce here lives in the vault header,
//! so `seal` returns it separately and `open` takes it back.  The
//! serialized header is passed as associated data: editing any header
//! byte makes the tag check fail.
//!
//! `seal` output layout:
//!   [ ciphertext | 16-byte auth tag ]

use aes_gcm::aead::{Aead, KeyInit, OsRng, Payload};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};

use crate::errors::{PassVaultError, Result};

/// Size of the AES-256-GCM nonce in bytes.
pub const NONCE_LEN: usize = 12;

/// Size of the AES-256-GCM authentication tag in bytes.
pub const TAG_LEN: usize = 16;

/// Draw a fresh random 96-bit nonce from the OS RNG.
pub fn generate_nonce() -> [u8; NONCE_LEN] {
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let mut out = [0u8; NONCE_LEN];
    out.copy_from_slice(&nonce);
    out
}

/// Encrypt and authenticate `plaintext` under `key` and `nonce`.
pub fn seal(key: &[u8], nonce: &[u8; NONCE_LEN], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new_from_slice(key)
        .map_err(|e| PassVaultError::EncryptionFailed(format!("invalid key length: {e}")))?;

    cipher
        .encrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: plaintext,
                aad,
            },
        )
        .map_err(|e| PassVaultError::EncryptionFailed(format!("encryption error: {e}")))
}

/// Verify and decrypt data produced by `seal`.
///
/// Any tag mismatch yields `Authentication`; no plaintext is released
/// unless the whole message verifies.
pub fn open(key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    if nonce.len() != NONCE_LEN || ciphertext.len() < TAG_LEN {
        return Err(PassVaultError::Authentication);
    }

    let cipher = Aes256Gcm::new_from_slice(key).map_err(|_| PassVaultError::Authentication)?;

    cipher
        .decrypt(
            Nonce::from_slice(nonce),
            Payload {
                msg: ciphertext,
                aad,
            },
        )
        .map_err(|_| PassVaultError::Authentication)
}

//! The session key and the sub-key derived from it.
//!
//! The Argon2id output is held in a [`DerivedKey`] for as long as a
//! session is unlocked.  The AEAD key is expanded from it with
//! HKDF-SHA256 on demand and wiped as soon as the caller drops it.

use hkdf::Hkdf;
use sha2::Sha256;
use zeroize::{Zeroize, Zeroizing};

use crate::errors::{PassVaultError, Result};

/// Length of derived keys (256 bits).
pub const KEY_LEN: usize = 32;

/// HKDF context string binding the expanded key to its use.
const AEAD_KEY_INFO: &[u8] = b"passvault-aead-v1";

/// A 32-byte key derived from the passphrase.
///
/// Never persisted; its memory is zeroed on drop.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct DerivedKey {
    bytes: [u8; KEY_LEN],
}

impl DerivedKey {
    /// Create a `DerivedKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    pub(crate) fn zeroed() -> Self {
        Self {
            bytes: [0u8; KEY_LEN],
        }
    }

    pub(crate) fn as_mut_bytes(&mut self) -> &mut [u8; KEY_LEN] {
        &mut self.bytes
    }

    /// Access the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }

    /// Expand the AES-256-GCM key for the vault payload.
    pub fn encryption_key(&self) -> Result<Zeroizing<[u8; KEY_LEN]>> {
        // `salt` is None: the input already has full entropy from Argon2id.
        let hk = Hkdf::<Sha256>::new(None, &self.bytes);

        let mut okm = Zeroizing::new([0u8; KEY_LEN]);
        hk.expand(AEAD_KEY_INFO, &mut *okm)
            .map_err(|e| PassVaultError::KeyDerivationFailed(format!("HKDF expand failed: {e}")))?;

        Ok(okm)
    }
}

impl std::fmt::Debug for DerivedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("DerivedKey([REDACTED])")
    }
}

//! Cryptographic primitives for PassVault.
//!
//! This module provides:
//! - Argon2id passphrase-based key derivation (`kdf`)
//! - The zeroizing session key and its HKDF-expanded AEAD key (`keys`)
//! - AES-256-GCM sealing and opening of the vault payload (`encryption`)

pub mod encryption;
pub mod kdf;
pub mod keys;

// Re-export the most commonly used items so callers can write:
//   use crate::crypto::{derive_key, seal, open, ...};
pub use encryption::{generate_nonce, open, seal, NONCE_LEN, TAG_LEN};
pub use kdf::{derive_key, generate_salt, Argon2Params, SALT_LEN, V1_PARAMS};
pub use keys::{DerivedKey, KEY_LEN};

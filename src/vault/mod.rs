//! Vault module — encrypted credential storage.
//!
//! This module provides:
//! - `CredentialEntry` and `EntryUpdate` types (`entry`)
//! - The in-memory `RecordStore` and reuse grouping (`store`)
//! - Canonical plaintext encoding of the store (`codec`)
//! - Binary vault file format and atomic writes (`format`)
//! - The `VaultSession` state machine used by shells (`session`)

pub mod codec;
pub mod entry;
pub mod format;
pub mod session;
pub mod store;

// Re-export the most commonly used items.
pub use entry::{CredentialEntry, EntryUpdate};
pub use format::{VaultHeader, CURRENT_VERSION};
pub use session::VaultSession;
pub use store::{RecordStore, SecretGroup};

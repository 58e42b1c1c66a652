//! The vault session: the only API a shell talks to.
//!
//! A `VaultSession` is either locked or unlocked.  Unlocking derives the
//! key, decrypts and decodes the vault (or starts an empty one if no file
//! exists yet).  Every record operation requires an unlocked session.
//! `save` re-encrypts under a fresh nonce and writes atomically; `lock`
//! wipes the key and all entries from memory without saving.
//!
//! The session is not shared between threads on its own: every method
//! that touches state takes `&mut self` or `&self`, so concurrent hosts
//! must put it behind a single owner (a mutex or an actor).  Opening the
//! same vault file from two processes at once is not supported.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use zeroize::Zeroizing;

use crate::crypto::{self, DerivedKey, NONCE_LEN, V1_PARAMS};
use crate::errors::{ErrorKind, PassVaultError, Result};
use crate::generator::{self, CharacterClasses};

use super::codec;
use super::entry::{CredentialEntry, EntryUpdate};
use super::format::{self, VaultHeader};
use super::store::{validate_service_name, RecordStore, SecretGroup};

/// Unlocked state: everything needed to read, mutate, and save.
struct OpenVault {
    /// Path to the `.vault` file on disk.
    path: PathBuf,

    /// Argon2id salt, fixed once the vault is created.
    salt: Vec<u8>,

    /// The derived key (zeroized on drop).
    key: DerivedKey,

    /// Decrypted entries (zeroized on drop).
    store: RecordStore,

    /// Nonce of the most recent ciphertext read or written.
    last_nonce: Option<[u8; NONCE_LEN]>,

    /// `false` until the first successful save of a new vault.
    on_disk: bool,
}

enum SessionState {
    Locked,
    Unlocked(Box<OpenVault>),
}

/// Handle to one vault.  Starts locked.
pub struct VaultSession {
    state: SessionState,
}

impl Default for VaultSession {
    fn default() -> Self {
        Self::new()
    }
}

impl VaultSession {
    pub fn new() -> Self {
        Self {
            state: SessionState::Locked,
        }
    }

    // ------------------------------------------------------------------
    // State transitions
    // ------------------------------------------------------------------

    /// Unlock the vault at `path` with `passphrase`.
    ///
    /// If no file exists a new, empty vault is started with a fresh salt;
    /// nothing is written until `save`.  On any error the session stays
    /// locked.
    pub fn unlock(&mut self, path: impl AsRef<Path>, passphrase: &str) -> Result<()> {
        if self.is_unlocked() {
            return Err(PassVaultError::AlreadyUnlocked);
        }
        if passphrase.is_empty() {
            return Err(PassVaultError::WeakInput);
        }
        let path = path.as_ref();

        let vault = match format::read(path).and_then(|(header, ciphertext)| {
            Self::open_existing(path, passphrase, header, &ciphertext)
        }) {
            Ok(vault) => vault,
            Err(PassVaultError::FileNotFound(_)) => {
                info!(path = %path.display(), "no vault file yet, starting an empty vault");
                let salt = crypto::generate_salt()?;
                let key = crypto::derive_key(passphrase, &salt, &V1_PARAMS)?;
                OpenVault {
                    path: path.to_path_buf(),
                    salt: salt.to_vec(),
                    key,
                    store: RecordStore::new(),
                    last_nonce: None,
                    on_disk: false,
                }
            }
            Err(e) => {
                if e.kind() == ErrorKind::Integrity {
                    warn!(path = %path.display(), error = %e, "vault failed verification");
                }
                return Err(e);
            }
        };

        info!(path = %path.display(), entries = vault.store.len(), "vault unlocked");
        self.state = SessionState::Unlocked(Box::new(vault));
        Ok(())
    }

    fn open_existing(
        path: &Path,
        passphrase: &str,
        header: VaultHeader,
        ciphertext: &[u8],
    ) -> Result<OpenVault> {
        let params = header.kdf_params()?;
        let key = crypto::derive_key(passphrase, &header.kdf_salt, &params)?;

        let plaintext = format::open_payload(&key, &header, ciphertext)?;
        let store = codec::decode(&plaintext)?;
        debug!(entries = store.len(), "payload decrypted and decoded");

        let last_nonce = header.nonce.as_slice().try_into().ok();
        Ok(OpenVault {
            path: path.to_path_buf(),
            salt: header.kdf_salt,
            key,
            store,
            last_nonce,
            on_disk: true,
        })
    }

    /// Encrypt the current entries under a fresh nonce and write atomically.
    pub fn save(&mut self) -> Result<()> {
        let vault = self.open_mut()?;

        // Never reuse the nonce of the ciphertext we loaded or last wrote.
        let mut nonce = crypto::generate_nonce();
        while Some(nonce) == vault.last_nonce {
            nonce = crypto::generate_nonce();
        }

        let header = VaultHeader::new(&vault.salt, nonce);
        let plaintext = codec::encode(&vault.store)?;
        let ciphertext = format::seal_payload(&vault.key, &header, &plaintext)?;
        format::write_atomic(&vault.path, &header, &ciphertext)?;

        vault.last_nonce = Some(nonce);
        vault.on_disk = true;
        info!(path = %vault.path.display(), entries = vault.store.len(), "vault saved");
        Ok(())
    }

    /// Wipe the key and all entries from memory.  Does not save.
    ///
    /// Locking an already locked session does nothing.
    pub fn lock(&mut self) {
        if let SessionState::Unlocked(mut vault) =
            std::mem::replace(&mut self.state, SessionState::Locked)
        {
            vault.store.clear();
            info!(path = %vault.path.display(), "vault locked");
            // Dropping `vault` zeroizes the derived key.
        }
    }

    // ------------------------------------------------------------------
    // Record operations
    // ------------------------------------------------------------------

    pub fn create(&mut self, service: &str, entry: CredentialEntry) -> Result<()> {
        self.open_mut()?.store.create(service, entry)?;
        debug!("entry created");
        Ok(())
    }

    pub fn read(&self, service: &str) -> Result<&CredentialEntry> {
        self.open_ref()?.store.read(service)
    }

    /// Change the non-empty fields of `update` on an existing entry.
    pub fn update(&mut self, service: &str, update: &EntryUpdate) -> Result<()> {
        self.open_mut()?.store.update(service, update)
    }

    /// Remove an entry, returning it so the caller can confirm or undo.
    pub fn delete(&mut self, service: &str) -> Result<CredentialEntry> {
        self.open_mut()?.store.delete(service)
    }

    /// Generate a secret and store it as a new entry.
    ///
    /// The duplicate check happens before generation.  The secret is
    /// returned for the caller to copy or display.
    pub fn generate_and_create(
        &mut self,
        service: &str,
        username: &str,
        email: &str,
        length: usize,
        classes: &CharacterClasses,
    ) -> Result<Zeroizing<String>> {
        let store = &mut self.open_mut()?.store;
        validate_service_name(service)?;
        if store.contains(service) {
            return Err(PassVaultError::DuplicateService(service.to_string()));
        }

        let secret = generator::generate(length, classes)?;
        store.create(service, CredentialEntry::new(username, email, secret.as_str()))?;
        debug!(length, "generated entry created");
        Ok(secret)
    }

    /// All entries in insertion order.
    pub fn list(&self) -> Result<Vec<(&str, &CredentialEntry)>> {
        Ok(self.open_ref()?.store.list())
    }

    /// Services grouped by shared secret, largest groups first.
    pub fn group_by_secret(&self) -> Result<Vec<SecretGroup>> {
        Ok(self.open_ref()?.store.group_by_secret())
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn is_unlocked(&self) -> bool {
        matches!(self.state, SessionState::Unlocked(_))
    }

    /// Returns the path of the unlocked vault.
    pub fn path(&self) -> Result<&Path> {
        Ok(self.open_ref()?.path.as_path())
    }

    /// Returns the number of entries in the unlocked vault.
    pub fn len(&self) -> Result<usize> {
        Ok(self.open_ref()?.store.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.open_ref()?.store.is_empty())
    }

    /// Returns `true` if the unlocked vault has never been saved.
    pub fn is_new_vault(&self) -> Result<bool> {
        Ok(!self.open_ref()?.on_disk)
    }

    fn open_ref(&self) -> Result<&OpenVault> {
        match &self.state {
            SessionState::Unlocked(vault) => Ok(&**vault),
            SessionState::Locked => Err(PassVaultError::SessionLocked),
        }
    }

    fn open_mut(&mut self) -> Result<&mut OpenVault> {
        match &mut self.state {
            SessionState::Unlocked(vault) => Ok(&mut **vault),
            SessionState::Locked => Err(PassVaultError::SessionLocked),
        }
    }
}

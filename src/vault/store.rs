//! In-memory record store: service name -> credential entry.
//!
//! Entries keep their insertion order so listing and encoding are
//! deterministic.  Lookups are linear, which is fine for the size of a
//! personal vault.

use std::collections::{BTreeMap, BTreeSet};

use zeroize::Zeroizing;

use super::entry::{CredentialEntry, EntryUpdate};
use crate::errors::{PassVaultError, Result};

/// Longest accepted service name, in bytes.
const MAX_SERVICE_LEN: usize = 256;

/// Ordered mapping of unique, case-sensitive service names to entries.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    entries: Vec<(String, CredentialEntry)>,
}

/// Services that share one secret value.
pub struct SecretGroup {
    secret: Zeroizing<String>,
    services: BTreeSet<String>,
}

impl SecretGroup {
    /// The shared secret.  Whether to display it is up to the caller.
    pub fn secret(&self) -> &str {
        &self.secret
    }

    /// Service names using this secret, sorted.
    pub fn services(&self) -> &BTreeSet<String> {
        &self.services
    }

    /// Returns `true` if more than one service uses this secret.
    pub fn is_reused(&self) -> bool {
        self.services.len() > 1
    }

    fn first_service(&self) -> &str {
        self.services.iter().next().map_or("", String::as_str)
    }
}

impl std::fmt::Debug for SecretGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretGroup")
            .field("secret", &"[REDACTED]")
            .field("services", &self.services)
            .finish()
    }
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, service: &str) -> bool {
        self.position(service).is_some()
    }

    /// Add a new entry.  Fails if the service already has one.
    pub fn create(&mut self, service: &str, entry: CredentialEntry) -> Result<()> {
        validate_service_name(service)?;
        if self.contains(service) {
            return Err(PassVaultError::DuplicateService(service.to_string()));
        }
        self.entries.push((service.to_string(), entry));
        Ok(())
    }

    pub fn read(&self, service: &str) -> Result<&CredentialEntry> {
        self.position(service)
            .map(|i| &self.entries[i].1)
            .ok_or_else(|| PassVaultError::NotFound(service.to_string()))
    }

    /// Apply the non-empty fields of `update` to an existing entry.
    pub fn update(&mut self, service: &str, update: &EntryUpdate) -> Result<()> {
        let i = self
            .position(service)
            .ok_or_else(|| PassVaultError::NotFound(service.to_string()))?;
        update.apply_to(&mut self.entries[i].1);
        Ok(())
    }

    /// Remove an entry and hand it back to the caller.
    pub fn delete(&mut self, service: &str) -> Result<CredentialEntry> {
        let i = self
            .position(service)
            .ok_or_else(|| PassVaultError::NotFound(service.to_string()))?;
        Ok(self.entries.remove(i).1)
    }

    /// All entries in insertion order.
    pub fn list(&self) -> Vec<(&str, &CredentialEntry)> {
        self.entries
            .iter()
            .map(|(service, entry)| (service.as_str(), entry))
            .collect()
    }

    /// Group services by identical secret.
    ///
    /// Largest groups come first; ties are broken by the
    /// lexicographically smallest service name in each group.
    pub fn group_by_secret(&self) -> Vec<SecretGroup> {
        let mut by_secret: BTreeMap<&str, BTreeSet<String>> = BTreeMap::new();
        for (service, entry) in &self.entries {
            by_secret
                .entry(entry.secret.as_str())
                .or_default()
                .insert(service.clone());
        }

        let mut groups: Vec<SecretGroup> = by_secret
            .into_iter()
            .map(|(secret, services)| SecretGroup {
                secret: Zeroizing::new(secret.to_string()),
                services,
            })
            .collect();

        groups.sort_by(|a, b| {
            b.services
                .len()
                .cmp(&a.services.len())
                .then_with(|| a.first_service().cmp(b.first_service()))
        });
        groups
    }

    /// Drop every entry; each one zeroes its fields as it goes.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn position(&self, service: &str) -> Option<usize> {
        self.entries.iter().position(|(s, _)| s == service)
    }
}

impl std::fmt::Debug for RecordStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|(s, _)| s))
            .finish()
    }
}

/// Service names must be non-empty and at most 256 bytes.
pub(crate) fn validate_service_name(service: &str) -> Result<()> {
    if service.is_empty() {
        return Err(PassVaultError::InvalidServiceName(
            "service name cannot be empty".into(),
        ));
    }
    if service.len() > MAX_SERVICE_LEN {
        return Err(PassVaultError::InvalidServiceName(format!(
            "service name cannot exceed {MAX_SERVICE_LEN} bytes"
        )));
    }
    Ok(())
}

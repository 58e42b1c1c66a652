//! Credential entries and partial updates.
//!
//! A `CredentialEntry` is owned by its service name inside a
//! `RecordStore`; the name itself is not part of the entry.  All three
//! fields are wiped from memory when the entry is dropped.

use zeroize::{Zeroize, ZeroizeOnDrop};

/// Username, email, and secret stored for one service.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct CredentialEntry {
    pub username: String,
    pub email: String,
    pub secret: String,
}

impl CredentialEntry {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            secret: secret.into(),
        }
    }
}

impl std::fmt::Debug for CredentialEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialEntry")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Fields to change on an existing entry.
///
/// `None` and empty strings both mean "keep the current value": an
/// update never clears a field.
#[derive(Default, Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct EntryUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub secret: Option<String>,
}

impl EntryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    /// Returns `true` if applying this update would change nothing.
    pub fn is_empty(&self) -> bool {
        [&self.username, &self.email, &self.secret]
            .iter()
            .all(|f| f.as_deref().map_or(true, str::is_empty))
    }

    /// Copy every non-empty field onto `entry`.
    pub(crate) fn apply_to(&self, entry: &mut CredentialEntry) {
        replace_if_present(&mut entry.username, self.username.as_deref());
        replace_if_present(&mut entry.email, self.email.as_deref());
        replace_if_present(&mut entry.secret, self.secret.as_deref());
    }
}

impl std::fmt::Debug for EntryUpdate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryUpdate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

fn replace_if_present(field: &mut String, value: Option<&str>) {
    if let Some(v) = value.filter(|v| !v.is_empty()) {
        field.zeroize();
        field.push_str(v);
    }
}

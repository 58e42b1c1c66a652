use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
///
/// Messages never include secret values, passphrases, or key material.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Input errors ---
    #[error("Passphrase must not be empty")]
    WeakInput,

    #[error("Secret length must be between {min} and {max} (got {got})")]
    InvalidLength { min: usize, max: usize, got: usize },

    #[error("At least one character class must be enabled")]
    EmptyAlphabet,

    #[error("Invalid service name: {0}")]
    InvalidServiceName(String),

    // --- Integrity errors ---
    #[error("Authentication failed: wrong passphrase or tampered vault")]
    Authentication,

    #[error("Corrupt vault file: {0}")]
    CorruptFile(String),

    #[error("Corrupt vault contents: {0}")]
    CorruptData(String),

    #[error("Unsupported vault format version {0}")]
    UnsupportedVersion(u8),

    // --- State errors ---
    #[error("Vault session is locked")]
    SessionLocked,

    #[error("Vault session is already unlocked")]
    AlreadyUnlocked,

    #[error("An entry for service '{0}' already exists")]
    DuplicateService(String),

    #[error("No entry found for service '{0}'")]
    NotFound(String),

    // --- IO errors ---
    #[error("Vault not found at {0}")]
    FileNotFound(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Key derivation failed: {0}")]
    KeyDerivationFailed(String),

    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Random source unavailable: {0}")]
    RandomSource(String),

    // --- Shell errors ---
    #[error("Config file error: {0}")]
    Config(String),

    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("Clipboard error: {0}")]
    Clipboard(String),
}

/// Broad category of a [`PassVaultError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad caller input. Nothing changed; fix the input and retry.
    Input,
    /// The vault failed verification. The session stays locked.
    Integrity,
    /// Wrong session state or a missing/duplicate service.
    State,
    /// Disk, OS, or primitive failure.
    Io,
    /// Errors raised only by the command-line shell.
    Shell,
}

impl PassVaultError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::WeakInput
            | Self::InvalidLength { .. }
            | Self::EmptyAlphabet
            | Self::InvalidServiceName(_) => ErrorKind::Input,
            Self::Authentication
            | Self::CorruptFile(_)
            | Self::CorruptData(_)
            | Self::UnsupportedVersion(_) => ErrorKind::Integrity,
            Self::SessionLocked
            | Self::AlreadyUnlocked
            | Self::DuplicateService(_)
            | Self::NotFound(_) => ErrorKind::State,
            Self::FileNotFound(_)
            | Self::Io(_)
            | Self::KeyDerivationFailed(_)
            | Self::EncryptionFailed(_)
            | Self::RandomSource(_) => ErrorKind::Io,
            Self::Config(_) | Self::CommandFailed(_) | Self::Clipboard(_) => ErrorKind::Shell,
        }
    }
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_follow_taxonomy() {
        assert_eq!(PassVaultError::WeakInput.kind(), ErrorKind::Input);
        assert_eq!(PassVaultError::EmptyAlphabet.kind(), ErrorKind::Input);
        assert_eq!(PassVaultError::Authentication.kind(), ErrorKind::Integrity);
        assert_eq!(
            PassVaultError::UnsupportedVersion(9).kind(),
            ErrorKind::Integrity
        );
        assert_eq!(PassVaultError::SessionLocked.kind(), ErrorKind::State);
        assert_eq!(
            PassVaultError::NotFound("x".into()).kind(),
            ErrorKind::State
        );
        assert_eq!(
            PassVaultError::EncryptionFailed("cannot encode store".into()).kind(),
            ErrorKind::Io
        );
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(PassVaultError::from(io).kind(), ErrorKind::Io);
    }
}

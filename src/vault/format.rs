//! Binary vault file format and atomic persistence.
//!
//! A `.vault` file has this layout:
//!
//! ```text
//! [version: 1 byte][salt_len: 1 byte][salt][nonce_len: 1 byte][nonce][ciphertext + 16-byte GCM tag]
//! ```
//!
//! - **Version**: format version (currently `1`).  It also names the
//!   Argon2id parameter set used to derive the key.  Unknown versions
//!   are rejected before anything else is parsed.
//! - **Salt**: Argon2id salt, fixed for the lifetime of the vault.
//! - **Nonce**: AES-256-GCM nonce, fresh on every save.
//! - **Ciphertext**: the encrypted codec payload.  The header bytes
//!   above are bound to it as associated data.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::crypto::{self, Argon2Params, DerivedKey, NONCE_LEN, TAG_LEN};
use crate::errors::{PassVaultError, Result};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Current binary format version.
pub const CURRENT_VERSION: u8 = 1;

/// Shortest salt accepted when reading a vault.
const MIN_SALT_LEN: usize = 16;

// ---------------------------------------------------------------------------
// VaultHeader
// ---------------------------------------------------------------------------

/// Cleartext metadata at the start of a vault file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VaultHeader {
    pub format_version: u8,
    pub kdf_salt: Vec<u8>,
    pub nonce: Vec<u8>,
}

impl VaultHeader {
    /// Header for a save at the current format version.
    pub fn new(kdf_salt: &[u8], nonce: [u8; NONCE_LEN]) -> Self {
        Self {
            format_version: CURRENT_VERSION,
            kdf_salt: kdf_salt.to_vec(),
            nonce: nonce.to_vec(),
        }
    }

    /// Argon2id parameters named by this header's version.
    pub fn kdf_params(&self) -> Result<Argon2Params> {
        Argon2Params::for_format_version(self.format_version)
    }

    /// Serialize the header exactly as it is written to disk.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let salt_len = u8::try_from(self.kdf_salt.len()).map_err(|_| {
            PassVaultError::EncryptionFailed("salt longer than 255 bytes".into())
        })?;
        let nonce_len = u8::try_from(self.nonce.len()).map_err(|_| {
            PassVaultError::EncryptionFailed("nonce longer than 255 bytes".into())
        })?;

        let mut buf = Vec::with_capacity(3 + self.kdf_salt.len() + self.nonce.len());
        buf.push(self.format_version);
        buf.push(salt_len);
        buf.extend_from_slice(&self.kdf_salt);
        buf.push(nonce_len);
        buf.extend_from_slice(&self.nonce);
        Ok(buf)
    }
}

// ---------------------------------------------------------------------------
// Payload encryption
// ---------------------------------------------------------------------------

/// Encrypt the codec bytes for `header`, binding the header as AAD.
pub fn seal_payload(key: &DerivedKey, header: &VaultHeader, plaintext: &[u8]) -> Result<Vec<u8>> {
    let nonce: [u8; NONCE_LEN] = header
        .nonce
        .as_slice()
        .try_into()
        .map_err(|_| PassVaultError::EncryptionFailed("nonce must be 12 bytes".into()))?;
    let aad = header.to_bytes()?;
    let enc_key = key.encryption_key()?;
    crypto::seal(enc_key.as_slice(), &nonce, &aad, plaintext)
}

/// Verify and decrypt a payload read from disk.
///
/// Fails with `Authentication` on any tag mismatch; unverified plaintext
/// is never returned.
pub fn open_payload(
    key: &DerivedKey,
    header: &VaultHeader,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let aad = header.to_bytes()?;
    let enc_key = key.encryption_key()?;
    crypto::open(enc_key.as_slice(), &header.nonce, &aad, ciphertext).map(Zeroizing::new)
}

// ---------------------------------------------------------------------------
// Byte-level encoding
// ---------------------------------------------------------------------------

/// Concatenate header and ciphertext into the on-disk byte layout.
pub fn encode_file(header: &VaultHeader, ciphertext: &[u8]) -> Result<Vec<u8>> {
    let mut buf = header.to_bytes()?;
    buf.extend_from_slice(ciphertext);
    Ok(buf)
}

/// Split raw vault bytes into header and ciphertext.
pub fn parse(data: &[u8]) -> Result<(VaultHeader, Vec<u8>)> {
    let (&format_version, rest) = data
        .split_first()
        .ok_or_else(|| PassVaultError::CorruptFile("file is empty".into()))?;

    if format_version != CURRENT_VERSION {
        return Err(PassVaultError::UnsupportedVersion(format_version));
    }

    let (kdf_salt, rest) = take_prefixed(rest, "salt")?;
    let (nonce, ciphertext) = take_prefixed(rest, "nonce")?;

    if kdf_salt.len() < MIN_SALT_LEN {
        return Err(PassVaultError::CorruptFile(format!(
            "salt is {} bytes, expected at least {MIN_SALT_LEN}",
            kdf_salt.len()
        )));
    }
    if nonce.len() != NONCE_LEN {
        return Err(PassVaultError::CorruptFile(format!(
            "nonce is {} bytes, expected {NONCE_LEN}",
            nonce.len()
        )));
    }
    if ciphertext.len() < TAG_LEN {
        return Err(PassVaultError::CorruptFile(
            "ciphertext shorter than the authentication tag".into(),
        ));
    }

    let header = VaultHeader {
        format_version,
        kdf_salt: kdf_salt.to_vec(),
        nonce: nonce.to_vec(),
    };
    Ok((header, ciphertext.to_vec()))
}

/// Read one `[len: u8][bytes]` field.
fn take_prefixed<'a>(data: &'a [u8], what: &str) -> Result<(&'a [u8], &'a [u8])> {
    let (&len, rest) = data
        .split_first()
        .ok_or_else(|| PassVaultError::CorruptFile(format!("truncated before {what} length")))?;
    let len = usize::from(len);
    if rest.len() < len {
        return Err(PassVaultError::CorruptFile(format!("truncated {what}")));
    }
    Ok(rest.split_at(len))
}

// ---------------------------------------------------------------------------
// Disk I/O
// ---------------------------------------------------------------------------

/// Path of the temporary file used while writing `path`.
///
/// Example: `dir/passwords.vault` -> `dir/.passwords.vault.tmp`
pub fn temp_path(path: &Path) -> PathBuf {
    let parent = parent_dir(path);
    parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ))
}

/// Write a vault file to disk **atomically**.
///
/// 1. Write header + ciphertext to a temp file in the same directory.
/// 2. `fsync` the temp file.
/// 3. Rename it over the target path.
/// 4. `fsync` the directory (best effort).
///
/// On failure the temp file is removed and the existing vault is left
/// as it was.
pub fn write_atomic(path: &Path, header: &VaultHeader, ciphertext: &[u8]) -> Result<()> {
    let buf = encode_file(header, ciphertext)?;

    let parent = parent_dir(path);
    fs::create_dir_all(parent)?;

    let tmp_path = temp_path(path);
    let result = write_synced(&tmp_path, &buf).and_then(|()| fs::rename(&tmp_path, path));

    if let Err(e) = result {
        warn!(path = %path.display(), error = %e, "vault write failed, removing temp file");
        let _ = fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    sync_dir(parent);
    debug!(path = %path.display(), bytes = buf.len(), "vault written");
    Ok(())
}

/// Read a vault file from disk and split it into header and ciphertext.
pub fn read(path: &Path) -> Result<(VaultHeader, Vec<u8>)> {
    let data = match fs::read(path) {
        Ok(data) => data,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(PassVaultError::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };
    parse(&data)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

fn write_synced(path: &Path, bytes: &[u8]) -> io::Result<()> {
    // A leftover temp file keeps its old permissions; start from a new one.
    match fs::remove_file(path) {
        Err(e) if e.kind() != io::ErrorKind::NotFound => return Err(e),
        _ => {}
    }

    let mut options = OpenOptions::new();
    options.write(true).create_new(true);

    // Owner-only read/write on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

fn sync_dir(dir: &Path) {
    #[cfg(unix)]
    {
        if let Ok(d) = fs::File::open(dir) {
            let _ = d.sync_all();
        }
    }
    #[cfg(not(unix))]
    {
        let _ = dir;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn header() -> VaultHeader {
        VaultHeader::new(&[0x11; 32], [0x22; NONCE_LEN])
    }

    #[test]
    fn header_layout_matches_documented_format() {
        let bytes = header().to_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 1 + 32 + 1 + NONCE_LEN);
        assert_eq!(bytes[0], CURRENT_VERSION);
        assert_eq!(bytes[1], 32);
        assert_eq!(bytes[34], NONCE_LEN as u8);
    }

    #[test]
    fn parse_splits_header_and_ciphertext() {
        let ct = vec![0xAB; 40];
        let data = encode_file(&header(), &ct).unwrap();
        let (h, c) = parse(&data).unwrap();
        assert_eq!(h, header());
        assert_eq!(c, ct);
    }

    #[test]
    fn unknown_version_fails_closed() {
        let mut data = encode_file(&header(), &[0u8; 32]).unwrap();
        data[0] = 2;
        assert!(matches!(parse(&data), Err(PassVaultError::UnsupportedVersion(2))));
        assert!(matches!(parse(&[0u8]), Err(PassVaultError::UnsupportedVersion(0))));
    }

    #[test]
    fn truncated_files_are_corrupt() {
        let data = encode_file(&header(), &[0u8; 32]).unwrap();
        for len in [0, 1, 2, 20, 34, 35, 40, 47 + 15] {
            assert!(
                matches!(parse(&data[..len]), Err(PassVaultError::CorruptFile(_))),
                "length {len} should be corrupt"
            );
        }
        assert!(parse(&data[..47 + 16]).is_ok());
    }

    #[test]
    fn short_salt_and_wrong_nonce_are_corrupt() {
        let short_salt = VaultHeader {
            format_version: 1,
            kdf_salt: vec![0; 8],
            nonce: vec![0; NONCE_LEN],
        };
        let data = encode_file(&short_salt, &[0u8; 16]).unwrap();
        assert!(matches!(parse(&data), Err(PassVaultError::CorruptFile(_))));

        let long_nonce = VaultHeader {
            format_version: 1,
            kdf_salt: vec![0; 32],
            nonce: vec![0; 24],
        };
        let data = encode_file(&long_nonce, &[0u8; 16]).unwrap();
        assert!(matches!(parse(&data), Err(PassVaultError::CorruptFile(_))));
    }

    #[test]
    fn read_missing_file_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("none.vault");
        assert!(matches!(read(&path), Err(PassVaultError::FileNotFound(p)) if p == path));
    }

    #[test]
    fn write_atomic_replaces_and_leaves_no_temp_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("test.vault");

        write_atomic(&path, &header(), &[1u8; 20]).unwrap();
        write_atomic(&path, &header(), &[2u8; 30]).unwrap();

        let (_, ct) = read(&path).unwrap();
        assert_eq!(ct, vec![2u8; 30]);
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn failed_rename_cleans_up_temp_file() {
        let dir = TempDir::new().unwrap();
        // A non-empty directory at the target path makes the rename fail.
        let path = dir.path().join("blocked.vault");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), b"x").unwrap();

        let result = write_atomic(&path, &header(), &[1u8; 20]);
        assert!(matches!(result, Err(PassVaultError::Io(_))));
        assert!(!temp_path(&path).exists());
        assert!(path.join("keep").exists());
    }

    #[cfg(unix)]
    #[test]
    fn stale_temp_file_permissions_do_not_reach_the_vault() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("perm.vault");
        let tmp = temp_path(&path);
        fs::write(&tmp, b"stale").unwrap();
        fs::set_permissions(&tmp, fs::Permissions::from_mode(0o644)).unwrap();

        write_atomic(&path, &header(), &[3u8; 20]).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(read(&path).unwrap().1, vec![3u8; 20]);
    }

    #[test]
    fn temp_path_is_hidden_sibling() {
        let p = Path::new("/tmp/vaults/passwords.vault");
        assert_eq!(temp_path(p), PathBuf::from("/tmp/vaults/.passwords.vault.tmp"));
        assert_eq!(
            temp_path(Path::new("passwords.vault")),
            PathBuf::from("./.passwords.vault.tmp")
        );
    }
}

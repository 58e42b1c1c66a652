//! Canonical serialization of a `RecordStore`.
//!
//! The plaintext inside the vault is a compact JSON document:
//!
//! ```text
//! {"version":1,"entries":[{"service":"…","username":"…","email":"…","secret":"…"},…]}
//! ```
//!
//! Entries appear in store order and fields in a fixed order, so a given
//! logical state always encodes to the same bytes.  Decoding is strict:
//! unknown or missing fields, a different document version, invalid
//! service names, and duplicate services are all rejected.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

use super::entry::CredentialEntry;
use super::store::{validate_service_name, RecordStore};
use crate::errors::{PassVaultError, Result};

/// Version of the plaintext document layout.
const DOCUMENT_VERSION: u32 = 1;

#[derive(Serialize)]
struct DocumentRef<'a> {
    version: u32,
    entries: Vec<RecordRef<'a>>,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    service: &'a str,
    username: &'a str,
    email: &'a str,
    secret: &'a str,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Document {
    version: u32,
    entries: Vec<Record>,
}

#[derive(Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
struct Record {
    service: String,
    username: String,
    email: String,
    secret: String,
}

/// Encode the store into its canonical byte form.
pub fn encode(store: &RecordStore) -> Result<Zeroizing<Vec<u8>>> {
    let doc = DocumentRef {
        version: DOCUMENT_VERSION,
        entries: store
            .list()
            .into_iter()
            .map(|(service, entry)| RecordRef {
                service,
                username: &entry.username,
                email: &entry.email,
                secret: &entry.secret,
            })
            .collect(),
    };

    serde_json::to_vec(&doc)
        .map(Zeroizing::new)
        .map_err(|e| {
            PassVaultError::EncryptionFailed(format!("cannot encode store: {}", describe(&e)))
        })
}

/// Decode bytes produced by [`encode`] back into a store.
pub fn decode(bytes: &[u8]) -> Result<RecordStore> {
    let mut doc: Document = serde_json::from_slice(bytes)
        .map_err(|e| PassVaultError::CorruptData(format!("malformed payload: {}", describe(&e))))?;

    if doc.version != DOCUMENT_VERSION {
        return Err(PassVaultError::CorruptData(format!(
            "unknown document version {}",
            doc.version
        )));
    }

    let mut store = RecordStore::new();
    for record in doc.entries.iter_mut() {
        validate_service_name(&record.service)
            .map_err(|_| PassVaultError::CorruptData("invalid service name in payload".into()))?;

        let entry = CredentialEntry::new(
            std::mem::take(&mut record.username),
            std::mem::take(&mut record.email),
            std::mem::take(&mut record.secret),
        );
        store.create(&record.service, entry).map_err(|_| {
            PassVaultError::CorruptData(format!("duplicate service '{}' in payload", record.service))
        })?;
    }

    Ok(store)
}

/// Position and category of a JSON error, without echoing any input.
fn describe(e: &serde_json::Error) -> String {
    format!("{:?} error at line {}, column {}", e.classify(), e.line(), e.column())
}

//! Object identifier (SHA-1 hash)
//!
//! Object IDs are 40-character hexadecimal strings identifying blobs, trees
//! and commits in the object store. Working-file digests are computed with the
//! same algorithm the store uses for blobs, so equality against tree and index
//! entries is a pure string comparison.
//!
//! ## Storage
//!
//! Objects live in `.git/objects/<first-2-chars>/<remaining-38-chars>`

use crate::error::{Result, ScanError};
use sha1::{Digest, Sha1};
use std::path::PathBuf;

/// Length of a full object ID in hexadecimal characters
pub const OBJECT_ID_LENGTH: usize = 40;

/// Object identifier (SHA-1 hash) as a 40-character hex string
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, PartialOrd, Ord)]
pub struct ObjectId(String);

impl ObjectId {
    /// Parse and validate an object ID from a string
    pub fn try_parse(id: String) -> Result<Self> {
        if id.len() != OBJECT_ID_LENGTH {
            return Err(ScanError::CorruptObject {
                oid: id.clone(),
                reason: format!("invalid object ID length: {}", id.len()),
            });
        }
        if !id.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ScanError::CorruptObject {
                oid: id.clone(),
                reason: "invalid object ID characters".to_string(),
            });
        }
        Ok(Self(id))
    }

    /// Build an object ID from its 20-byte binary form
    pub fn from_bytes(bytes: &[u8; 20]) -> Self {
        let mut hex40 = String::with_capacity(OBJECT_ID_LENGTH);
        for byte in bytes {
            hex40.push_str(&format!("{byte:02x}"));
        }
        Self(hex40)
    }

    /// Digest raw file content the way the object store hashes blobs
    ///
    /// The digest covers the `blob <len>\0` header followed by the content,
    /// which makes the result directly comparable to tree and index entries.
    pub fn for_blob(content: &[u8]) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(format!("blob {}\0", content.len()).as_bytes());
        hasher.update(content);
        let oid = hasher.finalize();
        Self(format!("{oid:x}"))
    }

    /// Convert to the loose-object path `XX/YYYYYY...`
    pub fn to_path(&self) -> PathBuf {
        let (dir, file) = self.0.split_at(2);
        PathBuf::from(dir).join(file)
    }
}

impl AsRef<str> for ObjectId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

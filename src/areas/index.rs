//! Read-only staging index snapshot
//!
//! Parses `.git/index` (version 2): the 12-byte header, the sorted entry list
//! with null-padded paths in 8-byte blocks, and the SHA-1 trailer that covers
//! everything before it. Extensions (tree cache etc.) are hashed but not
//! interpreted. The whole file is read under a shared lock so a scan sees one
//! consistent snapshot even if another process rewrites the index afterwards.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Result, ScanError};
use byteorder::{ByteOrder, NetworkEndian};
use sha1::{Digest, Sha1};
use std::collections::BTreeMap;
use std::io::Read;
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

/// Index file signature
const SIGNATURE: &[u8; 4] = b"DIRC";
/// Supported index format version
const VERSION: u32 = 2;
/// Header length in bytes
const HEADER_SIZE: usize = 12;
/// Fixed part of an entry before the path
const ENTRY_FIXED_SIZE: usize = 62;
/// Entries are padded with NULs to a multiple of this block size
const ENTRY_BLOCK: usize = 8;
/// Flag bit marking a version-3 extended entry
const EXTENDED_FLAG: u16 = 0x4000;

/// A staged path as recorded in the index: mode bits, content hash and the
/// cached on-disk size
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexEntry {
    pub mode: u32,
    pub oid: ObjectId,
    pub size: u64,
}

/// Immutable snapshot of the staging index, keyed by repository-relative path
#[derive(Debug, Default)]
pub struct Index {
    entries: BTreeMap<PathBuf, IndexEntry>,
}

impl Index {
    /// Load a snapshot from disk; a missing index file yields an empty index
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Index::default());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(path)
            .map_err(|e| ScanError::io(path, e))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)
            .map_err(|e| ScanError::io(path, e))?;

        let mut content = Vec::new();
        lock.deref_mut()
            .read_to_end(&mut content)
            .map_err(|e| ScanError::io(path, e))?;

        if content.is_empty() {
            return Ok(Index::default());
        }

        Self::parse(path, &content)
    }

    pub fn entry(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    pub fn entries(&self) -> &BTreeMap<PathBuf, IndexEntry> {
        &self.entries
    }

    fn parse(path: &Path, content: &[u8]) -> Result<Self> {
        let corrupt = |reason: &str| ScanError::CorruptIndex {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        if content.len() < HEADER_SIZE + 20 {
            return Err(corrupt("file too short"));
        }

        // trailer first: SHA-1 of everything before the final 20 bytes
        let (payload, trailer) = content.split_at(content.len() - 20);
        let mut hasher = Sha1::new();
        hasher.update(payload);
        if hasher.finalize().as_slice() != trailer {
            return Err(corrupt("checksum mismatch"));
        }

        if &payload[..4] != SIGNATURE {
            return Err(corrupt("invalid signature"));
        }
        let version = NetworkEndian::read_u32(&payload[4..8]);
        if version != VERSION {
            return Err(ScanError::CorruptIndex {
                path: path.to_path_buf(),
                reason: format!("unsupported index version {version}"),
            });
        }
        let entries_count = NetworkEndian::read_u32(&payload[8..12]);

        let mut entries = BTreeMap::new();
        let mut cursor = HEADER_SIZE;

        for _ in 0..entries_count {
            if cursor + ENTRY_FIXED_SIZE > payload.len() {
                return Err(corrupt("truncated entry"));
            }
            let fixed = &payload[cursor..cursor + ENTRY_FIXED_SIZE];

            let mode = NetworkEndian::read_u32(&fixed[24..28]);
            let size = NetworkEndian::read_u32(&fixed[36..40]) as u64;
            let mut oid_bytes = [0u8; 20];
            oid_bytes.copy_from_slice(&fixed[40..60]);
            let flags = NetworkEndian::read_u16(&fixed[60..62]);
            if flags & EXTENDED_FLAG != 0 {
                return Err(corrupt("extended entry in a version-2 index"));
            }

            let name_start = cursor + ENTRY_FIXED_SIZE;
            let nul = payload[name_start..]
                .iter()
                .position(|&b| b == 0)
                .ok_or_else(|| corrupt("unterminated entry path"))?;
            let name = std::str::from_utf8(&payload[name_start..name_start + nul])
                .map_err(|_| corrupt("non-utf8 entry path"))?;

            entries.insert(
                PathBuf::from(name),
                IndexEntry {
                    mode,
                    oid: ObjectId::from_bytes(&oid_bytes),
                    size,
                },
            );

            // entries are NUL-padded so the total length is a block multiple
            let entry_len = ENTRY_FIXED_SIZE + nul + 1;
            let padded = entry_len.div_ceil(ENTRY_BLOCK) * ENTRY_BLOCK;
            cursor += padded;
        }

        // whatever follows the entries is extension data; already verified by
        // the trailer, not interpreted here
        Ok(Index { entries })
    }
}

//! Tree object parsing
//!
//! A tree object body is a sequence of `<octal mode> <name>\0<20-byte oid>`
//! records. Subtrees are flattened by the database accessor; this module only
//! knows how to decode a single tree body.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Result, ScanError};

/// Mode mask selecting the entry type bits
const TYPE_MASK: u32 = 0o170000;
/// Type bits marking a subtree entry
const TREE_TYPE: u32 = 0o040000;
/// Type bits marking a submodule (gitlink) entry
const GITLINK_TYPE: u32 = 0o160000;

/// A tracked path as recorded in a committed tree: mode bits plus content hash
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub mode: u32,
    pub oid: ObjectId,
}

impl TreeEntry {
    pub fn is_tree(&self) -> bool {
        self.mode & TYPE_MASK == TREE_TYPE
    }

    pub fn is_gitlink(&self) -> bool {
        self.mode & TYPE_MASK == GITLINK_TYPE
    }
}

/// Decode a raw tree body into `(name, entry)` records in on-disk order
pub fn parse_tree_body(oid: &ObjectId, body: &[u8]) -> Result<Vec<(String, TreeEntry)>> {
    let corrupt = |reason: &str| ScanError::CorruptObject {
        oid: oid.to_string(),
        reason: reason.to_string(),
    };

    let mut entries = Vec::new();
    let mut cursor = 0;

    while cursor < body.len() {
        let space = body[cursor..]
            .iter()
            .position(|&b| b == b' ')
            .ok_or_else(|| corrupt("tree entry missing mode separator"))?;
        let mode_str = std::str::from_utf8(&body[cursor..cursor + space])
            .map_err(|_| corrupt("non-utf8 tree entry mode"))?;
        let mode =
            u32::from_str_radix(mode_str, 8).map_err(|_| corrupt("non-octal tree entry mode"))?;
        cursor += space + 1;

        let nul = body[cursor..]
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| corrupt("tree entry missing name terminator"))?;
        let name = String::from_utf8(body[cursor..cursor + nul].to_vec())
            .map_err(|_| corrupt("non-utf8 tree entry name"))?;
        cursor += nul + 1;

        if cursor + 20 > body.len() {
            return Err(corrupt("truncated tree entry oid"));
        }
        let mut oid_bytes = [0u8; 20];
        oid_bytes.copy_from_slice(&body[cursor..cursor + 20]);
        cursor += 20;

        entries.push((
            name,
            TreeEntry {
                mode,
                oid: ObjectId::from_bytes(&oid_bytes),
            },
        ));
    }

    Ok(entries)
}

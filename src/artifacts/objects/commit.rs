//! Commit object parsing
//!
//! The status engine only needs the tree oid out of a commit; author, parents
//! and message are skipped.

use crate::artifacts::objects::object_id::ObjectId;
use crate::error::{Result, ScanError};

/// Extract the `tree <oid>` header from a raw commit body
pub fn parse_commit_tree(oid: &ObjectId, body: &[u8]) -> Result<ObjectId> {
    let text = std::str::from_utf8(body).map_err(|_| ScanError::CorruptObject {
        oid: oid.to_string(),
        reason: "non-utf8 commit header".to_string(),
    })?;

    for line in text.lines() {
        if line.is_empty() {
            break;
        }
        if let Some(tree_oid) = line.strip_prefix("tree ") {
            return ObjectId::try_parse(tree_oid.to_string());
        }
    }

    Err(ScanError::CorruptObject {
        oid: oid.to_string(),
        reason: "commit has no tree header".to_string(),
    })
}

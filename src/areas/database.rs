//! Read-only loose-object database accessor
//!
//! Loads zlib-deflated objects from `.git/objects`, decodes the
//! `<type> <len>\0` header and exposes the snapshot operations the status
//! engine needs: resolving a commit to its tree and flattening a tree into a
//! path -> entry map.

use crate::artifacts::objects::commit::parse_commit_tree;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{TreeEntry, parse_tree_body};
use crate::error::{Result, ScanError};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
}

impl Database {
    pub fn new(path: PathBuf) -> Self {
        Database { path }
    }

    /// Load and inflate a loose object, returning its type and body
    fn load(&self, oid: &ObjectId) -> Result<(String, Bytes)> {
        let object_path = self.path.join(oid.to_path());
        let compressed =
            std::fs::read(&object_path).map_err(|e| ScanError::io(&object_path, e))?;

        let mut decoder = flate2::read::ZlibDecoder::new(compressed.as_slice());
        let mut content = Vec::new();
        decoder
            .read_to_end(&mut content)
            .map_err(|_| ScanError::CorruptObject {
                oid: oid.to_string(),
                reason: "zlib inflate failed".to_string(),
            })?;

        let header_end = content
            .iter()
            .position(|&b| b == 0)
            .ok_or_else(|| ScanError::CorruptObject {
                oid: oid.to_string(),
                reason: "missing object header terminator".to_string(),
            })?;
        let header =
            std::str::from_utf8(&content[..header_end]).map_err(|_| ScanError::CorruptObject {
                oid: oid.to_string(),
                reason: "non-utf8 object header".to_string(),
            })?;
        let object_type = header.split(' ').next().unwrap_or_default().to_string();

        let body = Bytes::from(content).slice(header_end + 1..);
        Ok((object_type, body))
    }

    /// Resolve a commit to the oid of its root tree
    pub fn commit_tree(&self, commit_oid: &ObjectId) -> Result<ObjectId> {
        let (object_type, body) = self.load(commit_oid)?;
        if object_type != "commit" {
            return Err(ScanError::CorruptObject {
                oid: commit_oid.to_string(),
                reason: format!("expected commit, found {object_type}"),
            });
        }
        parse_commit_tree(commit_oid, &body)
    }

    /// Flatten a tree recursively into `prefix/name -> entry` records
    ///
    /// Subtrees are descended, gitlink (submodule) entries are skipped; the
    /// resulting map holds file entries only.
    pub fn flatten_tree(
        &self,
        tree_oid: &ObjectId,
        prefix: &Path,
        out: &mut BTreeMap<PathBuf, TreeEntry>,
    ) -> Result<()> {
        let (object_type, body) = self.load(tree_oid)?;
        if object_type != "tree" {
            return Err(ScanError::CorruptObject {
                oid: tree_oid.to_string(),
                reason: format!("expected tree, found {object_type}"),
            });
        }

        for (name, entry) in parse_tree_body(tree_oid, &body)? {
            let path = if prefix.as_os_str().is_empty() {
                PathBuf::from(&name)
            } else {
                prefix.join(&name)
            };

            if entry.is_tree() {
                self.flatten_tree(&entry.oid, &path, out)?;
            } else if entry.is_gitlink() {
                log::debug!("skipping submodule entry {}", path.display());
            } else {
                out.insert(path, entry);
            }
        }

        Ok(())
    }
}

//! Content-hash classifier strategy
//!
//! Three-way-compares the committed tree (T), the staging index (I) and the
//! working directory (W) for every path in their union. Presence and hash
//! equality decide the status; the first matching row wins:
//!
//! | T | I | W | rule                    | status    |
//! |---|---|---|-------------------------|-----------|
//! | – | – | ✓ | not ignored             | Untracked |
//! | – | – | ✓ | ignored                 | Ignored   |
//! | – | ✓ | * |                         | Added     |
//! | ✓ | – | * |                         | Removed   |
//! | ✓ | ✓ | – |                         | Missing   |
//! | ✓ | ✓ | ✓ | mode and oid all equal  | Normal    |
//! | ✓ | ✓ | ✓ | T = I, working differs  | Modified  |
//! | ✓ | ✓ | ✓ | T ≠ I                   | Modified  |
//!
//! Directories get no row of their own; the aggregator derives them. Working
//! files are only digested when the T = I row actually needs the comparison.

use crate::areas::index::IndexEntry;
use crate::areas::repository::Repository;
use crate::areas::workspace::WorkspaceScan;
use crate::artifacts::ignores::IgnoreResolver;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::artifacts::status::result::{FileKind, StatusTag};
use crate::artifacts::status::strategy::ScanToken;
use crate::error::Result;
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Working-directory side of the three-way comparison
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum WorkingState {
    Absent,
    /// Present on disk; `oid` is the lazily computed blob digest, only
    /// populated when the tracked-and-unstaged row needs it
    Present { oid: Option<ObjectId> },
}

#[derive(new)]
pub struct HashStrategy<'r> {
    repository: &'r Repository,
}

impl HashStrategy<'_> {
    pub async fn classify(
        &self,
        scan: &WorkspaceScan,
        requested: &[PathBuf],
        token: &ScanToken,
    ) -> Result<BTreeMap<PathBuf, StatusTag>> {
        // one consistent snapshot of both tracked sources
        let index = self.repository.load_index()?;
        let head_tree = self.repository.head_tree()?;
        let mut ignores = IgnoreResolver::build(
            self.repository.workspace().root(),
            self.repository.git_dir(),
            self.repository.config(),
        );

        let mut union = BTreeSet::new();
        union.extend(
            scan.entries
                .iter()
                .filter(|(_, kind)| **kind == FileKind::File)
                .map(|(path, _)| path.clone()),
        );
        union.extend(
            head_tree
                .keys()
                .filter(|path| under_requested(path, requested))
                .cloned(),
        );
        union.extend(
            index
                .entries()
                .keys()
                .filter(|path| under_requested(path, requested))
                .cloned(),
        );

        let mut tags = BTreeMap::new();
        for path in union {
            token.checkpoint()?;

            let tree_entry = head_tree.get(&path);
            let index_entry = index.entry(&path);
            // a tracked path replaced by a directory counts as gone
            let on_disk = scan.entries.get(&path) == Some(&FileKind::File);

            let working = match (on_disk, tree_entry, index_entry) {
                (false, ..) => WorkingState::Absent,
                (true, Some(t), Some(i)) if t.oid == i.oid && t.mode == i.mode => {
                    match self.repository.workspace().read_file(&path) {
                        Ok(bytes) => WorkingState::Present {
                            oid: Some(ObjectId::for_blob(&bytes)),
                        },
                        Err(err) => {
                            log::warn!("unreadable working file {}: {err}", path.display());
                            tags.insert(path, StatusTag::Error);
                            continue;
                        }
                    }
                }
                (true, ..) => WorkingState::Present { oid: None },
            };

            let ignored = tree_entry.is_none()
                && index_entry.is_none()
                && ignores.is_ignored(&path, FileKind::File);

            tags.insert(path, classify_path(tree_entry, index_entry, &working, ignored));
        }

        Ok(tags)
    }
}

fn under_requested(path: &Path, requested: &[PathBuf]) -> bool {
    requested
        .iter()
        .any(|root| root == Path::new(".") || path.starts_with(root))
}

/// The three-way decision table, first matching row wins
pub(crate) fn classify_path(
    tree: Option<&TreeEntry>,
    index: Option<&IndexEntry>,
    working: &WorkingState,
    ignored: bool,
) -> StatusTag {
    match (tree, index, working) {
        (None, None, WorkingState::Present { .. }) => {
            if ignored {
                StatusTag::Ignored
            } else {
                StatusTag::Untracked
            }
        }
        // paths come from tree ∪ index ∪ working, so this row cannot be
        // produced by a scan
        (None, None, WorkingState::Absent) => StatusTag::Normal,
        (None, Some(_), _) => StatusTag::Added,
        (Some(_), None, _) => StatusTag::Removed,
        (Some(_), Some(_), WorkingState::Absent) => StatusTag::Missing,
        (Some(tree), Some(index), WorkingState::Present { oid }) => {
            if tree.oid != index.oid || tree.mode != index.mode {
                StatusTag::Modified
            } else if oid.as_ref().is_some_and(|working| *working != index.oid) {
                StatusTag::Modified
            } else {
                StatusTag::Normal
            }
        }
    }
}

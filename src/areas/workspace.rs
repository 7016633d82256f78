//! Working-tree walker
//!
//! Enumerates files and directories under a set of requested paths, excluding
//! the `.git` metadata directory. The walk is read-only and never hashes; it
//! reports what exists and what could not be read. Unreadable subtrees and
//! entries become per-path errors instead of aborting the walk. Symlinks are
//! not followed, so cycles cannot occur.

use crate::artifacts::status::result::FileKind;
use crate::error::{Result, ScanError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// VCS metadata directory, never reported by the walk
const GIT_DIR_NAME: &str = ".git";

/// One consistent working-directory listing taken at scan start
#[derive(Debug, Default)]
pub struct WorkspaceScan {
    /// Every file and directory found under the requested roots
    pub entries: BTreeMap<PathBuf, FileKind>,
    /// Paths the walk could not read, with the kind (if determinable) and cause
    pub errors: BTreeMap<PathBuf, (FileKind, String)>,
}

#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: PathBuf) -> Self {
        Workspace { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Turn a caller-supplied path (absolute or repository-relative) into a
    /// repository-relative path; the repository root itself becomes `.`
    pub fn relativize(&self, path: &Path) -> Result<PathBuf> {
        let rel = if path.is_absolute() {
            path.strip_prefix(&self.root)
                .map_err(|_| ScanError::PathOutsideRepository {
                    path: path.to_path_buf(),
                })?
                .to_path_buf()
        } else {
            path.to_path_buf()
        };

        if rel
            .components()
            .any(|c| matches!(c, std::path::Component::ParentDir))
        {
            return Err(ScanError::PathOutsideRepository {
                path: path.to_path_buf(),
            });
        }

        if rel.as_os_str().is_empty() || rel == Path::new(".") {
            Ok(PathBuf::from("."))
        } else {
            Ok(rel)
        }
    }

    /// Read the current bytes of a file for content hashing
    pub fn read_file(&self, rel_path: &Path) -> std::io::Result<Vec<u8>> {
        std::fs::read(self.root.join(rel_path))
    }

    /// Enumerate every file and directory under the requested roots
    ///
    /// Requested paths must already be repository-relative (`.` for the whole
    /// tree). Paths that do not exist on disk are skipped here; the tree and
    /// index snapshots still discover them.
    pub fn walk(&self, requested: &[PathBuf]) -> Result<WorkspaceScan> {
        let mut scan = WorkspaceScan::default();

        for rel in requested {
            let absolute = if rel == Path::new(".") {
                self.root.clone()
            } else {
                self.root.join(rel)
            };

            if !absolute.exists() {
                continue;
            }

            let walker = WalkDir::new(&absolute)
                .follow_links(false)
                .into_iter()
                .filter_entry(|entry| entry.file_name() != GIT_DIR_NAME);

            for entry in walker {
                match entry {
                    Ok(entry) => {
                        let Ok(rel_path) = entry.path().strip_prefix(&self.root) else {
                            continue;
                        };
                        // the repository root is represented by the aggregator
                        if rel_path.as_os_str().is_empty() {
                            continue;
                        }
                        let kind = if entry.file_type().is_dir() {
                            FileKind::Directory
                        } else {
                            FileKind::File
                        };
                        scan.entries.insert(rel_path.to_path_buf(), kind);
                    }
                    Err(err) => {
                        let rel_path = err
                            .path()
                            .and_then(|p| p.strip_prefix(&self.root).ok())
                            .map(Path::to_path_buf)
                            .unwrap_or_else(|| rel.clone());
                        let kind = if self.root.join(&rel_path).is_dir() {
                            FileKind::Directory
                        } else {
                            FileKind::File
                        };
                        scan.errors.insert(rel_path, (kind, err.to_string()));
                    }
                }
            }
        }

        // an errored path may still have been listed by a sibling walk
        for path in scan.errors.keys() {
            scan.entries.remove(path);
        }

        Ok(scan)
    }
}

//! Directory status rollup
//!
//! Classifier strategies tag files only; this module derives every directory
//! tag from its direct children and emits the final, complete result set. A
//! directory takes the highest-precedence tag among its children, with
//! `Error` left out of the escalation so one unreadable entry cannot repaint
//! an entire ancestor chain. The repository root is always present as `.`.

use crate::areas::workspace::WorkspaceScan;
use crate::artifacts::status::result::{FileKind, StatusResult, StatusTag};
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Combine file tags and the walk listing into one result per distinct path
pub fn rollup(scan: &WorkspaceScan, file_tags: BTreeMap<PathBuf, StatusTag>) -> Vec<StatusResult> {
    let mut dirs: BTreeSet<PathBuf> = BTreeSet::new();
    dirs.insert(PathBuf::from("."));

    for (path, kind) in &scan.entries {
        if *kind == FileKind::Directory {
            dirs.insert(path.clone());
        }
    }
    for (path, (kind, _)) in &scan.errors {
        if *kind == FileKind::Directory {
            dirs.insert(path.clone());
        }
    }
    // deleted subtrees exist only as tagged paths, so their ancestor chain
    // has to be reconstructed
    for path in file_tags.keys() {
        dirs.extend(ancestors(path));
    }
    for dir in dirs.clone() {
        dirs.extend(ancestors(&dir));
    }

    let mut ordered: Vec<PathBuf> = dirs.iter().cloned().collect();
    ordered.sort_by_key(|dir| std::cmp::Reverse(depth(dir)));

    let mut dir_tags: BTreeMap<PathBuf, StatusTag> = BTreeMap::new();
    for dir in ordered {
        // a directory the walk could not read keeps its own tag
        if let Some(tag) = file_tags.get(&dir) {
            dir_tags.insert(dir, *tag);
            continue;
        }

        let mut rolled = StatusTag::Normal;
        for (path, tag) in &file_tags {
            if parent_of(path).as_deref() == Some(dir.as_path()) && *tag != StatusTag::Error {
                rolled = rolled.max(*tag);
            }
        }
        for (path, tag) in &dir_tags {
            if parent_of(path).as_deref() == Some(dir.as_path()) && *tag != StatusTag::Error {
                rolled = rolled.max(*tag);
            }
        }
        dir_tags.insert(dir, rolled);
    }

    let mut results = BTreeMap::new();
    for (path, tag) in &file_tags {
        if dirs.contains(path) {
            continue;
        }
        let kind = scan
            .entries
            .get(path)
            .or_else(|| scan.errors.get(path).map(|(kind, _)| kind))
            .copied()
            .unwrap_or(FileKind::File);
        results.insert(path.clone(), StatusResult::new(path.clone(), kind, *tag));
    }
    for (dir, tag) in dir_tags {
        results.insert(
            dir.clone(),
            StatusResult::new(dir, FileKind::Directory, tag),
        );
    }

    results.into_values().collect()
}

fn depth(path: &Path) -> usize {
    if path == Path::new(".") {
        0
    } else {
        path.components().count()
    }
}

/// Every proper ancestor of a repository-relative path, the root as `.`
fn ancestors(path: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut current = path.parent();
    while let Some(parent) = current {
        if parent.as_os_str().is_empty() {
            out.push(PathBuf::from("."));
            break;
        }
        out.push(parent.to_path_buf());
        current = parent.parent();
    }
    out
}

fn parent_of(path: &Path) -> Option<PathBuf> {
    if path == Path::new(".") {
        return None;
    }
    match path.parent() {
        Some(parent) if parent.as_os_str().is_empty() => Some(PathBuf::from(".")),
        Some(parent) => Some(parent.to_path_buf()),
        None => None,
    }
}

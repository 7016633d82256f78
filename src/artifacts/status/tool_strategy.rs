//! Tool-output classifier strategy
//!
//! Shells out to the external git binary instead of hashing working files,
//! which is considerably cheaper on large trees. Three dry-run commands feed
//! the same taxonomy the content-hash strategy produces:
//!
//! - `git status --porcelain` — per-path two-column codes
//! - `git clean -nd` — "Would remove <path>[/]" lines for wholly-untracked
//!   files and directories
//! - `git clean -ndX` — the same listing restricted to ignored entries
//!
//! Every walked path mentioned by none of the outputs is Normal. The text
//! formats are an external protocol this module parses but does not define;
//! C-style quoted paths are decoded before use as map keys, and a decode
//! failure downgrades to an `Error` entry for that path alone. A missing tool
//! or a non-zero exit for non-path reasons aborts the scan.

use crate::areas::repository::Repository;
use crate::areas::workspace::WorkspaceScan;
use crate::artifacts::status::result::{FileKind, StatusTag};
use crate::artifacts::status::strategy::ScanToken;
use crate::error::{Result, ScanError};
use derive_new::new;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

const WOULD_REMOVE_PREFIX: &str = "Would remove ";

/// Everything the tool outputs say about the repository, repo-relative
#[derive(Debug, Default, PartialEq, Eq)]
struct ToolReport {
    /// Explicit per-path tags from the porcelain listing
    explicit: BTreeMap<PathBuf, StatusTag>,
    /// Wholly-untracked roots (files or directory subtrees)
    untracked_roots: BTreeSet<PathBuf>,
    /// Ignored roots (files or directory subtrees)
    ignored_roots: BTreeSet<PathBuf>,
}

#[derive(new)]
pub struct ToolStrategy<'r> {
    repository: &'r Repository,
}

impl ToolStrategy<'_> {
    pub async fn classify(
        &self,
        scan: &WorkspaceScan,
        requested: &[PathBuf],
        token: &ScanToken,
    ) -> Result<BTreeMap<PathBuf, StatusTag>> {
        let (status_out, clean_out, clean_ignored_out) = tokio::join!(
            self.run_git(&["status", "--porcelain"]),
            self.run_git(&["clean", "-nd"]),
            self.run_git(&["clean", "-ndX"]),
        );

        let mut report = ToolReport::default();
        parse_porcelain(&status_out?, &mut report);
        report.untracked_roots.extend(parse_clean_listing(&clean_out?));
        report.ignored_roots.extend(parse_clean_listing(&clean_ignored_out?));

        let mut union: BTreeSet<PathBuf> = scan
            .entries
            .iter()
            .filter(|(_, kind)| **kind == FileKind::File)
            .map(|(path, _)| path.clone())
            .collect();
        // deleted tracked paths exist only in the tool output
        union.extend(
            report
                .explicit
                .keys()
                .filter(|path| under_requested(path, requested))
                .cloned(),
        );

        let mut tags = BTreeMap::new();
        for path in union {
            token.checkpoint()?;

            let tag = if covered_by(&report.ignored_roots, &path) {
                StatusTag::Ignored
            } else if let Some(tag) = report.explicit.get(&path) {
                *tag
            } else if covered_by(&report.untracked_roots, &path) {
                StatusTag::Untracked
            } else {
                StatusTag::Normal
            };

            tags.insert(path, tag);
        }

        Ok(tags)
    }

    async fn run_git(&self, args: &[&str]) -> Result<String> {
        let output = tokio::process::Command::new("git")
            .arg("-C")
            .arg(self.repository.workspace().root())
            .args(args)
            .output()
            .await
            .map_err(|err| ScanError::tool(format!("failed to launch git: {err}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                return Err(ScanError::NotARepository {
                    path: self.repository.workspace().root().to_path_buf(),
                });
            }
            return Err(ScanError::tool(format!(
                "git {} exited with {}: {}",
                args.join(" "),
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

fn under_requested(path: &Path, requested: &[PathBuf]) -> bool {
    requested
        .iter()
        .any(|root| root == Path::new(".") || path.starts_with(root))
}

fn covered_by(roots: &BTreeSet<PathBuf>, path: &Path) -> bool {
    roots.iter().any(|root| path.starts_with(root))
}

/// Decode one `XY path` porcelain line into the report
fn parse_porcelain(output: &str, report: &mut ToolReport) {
    for line in output.lines() {
        if line.len() < 4 {
            continue;
        }
        let code = &line[..2];
        let raw_path = &line[3..];

        match code {
            "??" => {
                if let Some((path, is_dir)) = decode(raw_path, report) {
                    if is_dir {
                        report.untracked_roots.insert(path);
                    } else {
                        // a path can appear both staged-deleted and
                        // untracked; the staged line decides
                        report.explicit.entry(path).or_insert(StatusTag::Untracked);
                    }
                }
            }
            "!!" => {
                if let Some((path, is_dir)) = decode(raw_path, report) {
                    if is_dir {
                        report.ignored_roots.insert(path);
                    } else {
                        report.explicit.entry(path).or_insert(StatusTag::Ignored);
                    }
                }
            }
            _ => {
                let staged = code.as_bytes()[0] as char;
                let unstaged = code.as_bytes()[1] as char;

                // a rename line covers two paths: the old name left the
                // index, the new name is newly staged
                if let Some(arrow) = raw_path.find(" -> ") {
                    if staged == 'R'
                        && let Some((old, _)) = decode(&raw_path[..arrow], report)
                    {
                        report.explicit.insert(old, StatusTag::Removed);
                    }
                    if let Some((new, _)) = decode(&raw_path[arrow + 4..], report) {
                        report.explicit.insert(new, StatusTag::Added);
                    }
                    continue;
                }

                // staged presence decides before the worktree column: a path
                // absent from the tree stays Added even when its working
                // copy is gone again
                let tag = if staged == 'A' {
                    StatusTag::Added
                } else if staged == 'D' {
                    StatusTag::Removed
                } else if unstaged == 'D' {
                    StatusTag::Missing
                } else {
                    StatusTag::Modified
                };
                if let Some((path, _)) = decode(raw_path, report) {
                    report.explicit.insert(path, tag);
                }
            }
        }
    }
}

/// Unquote one path field from a porcelain line; a decode failure records an
/// `Error` entry for the raw name and yields nothing
fn decode(raw_path: &str, report: &mut ToolReport) -> Option<(PathBuf, bool)> {
    match unquote_path(raw_path) {
        Ok(path) => Some(strip_dir_marker(path)),
        Err(reason) => {
            log::warn!("undecodable path in status output {raw_path:?}: {reason}");
            report
                .explicit
                .insert(PathBuf::from(raw_path.trim_matches('"')), StatusTag::Error);
            None
        }
    }
}

/// Collect `Would remove <path>[/]` roots from a dry-run clean listing
fn parse_clean_listing(output: &str) -> BTreeSet<PathBuf> {
    let mut roots = BTreeSet::new();

    for line in output.lines() {
        let Some(raw_path) = line.strip_prefix(WOULD_REMOVE_PREFIX) else {
            continue;
        };
        match unquote_path(raw_path) {
            Ok(path) => {
                let (path, _) = strip_dir_marker(path);
                roots.insert(path);
            }
            Err(reason) => {
                log::warn!("undecodable path in clean output {raw_path:?}: {reason}");
            }
        }
    }

    roots
}

fn strip_dir_marker(path: PathBuf) -> (PathBuf, bool) {
    let text = path.to_string_lossy();
    match text.strip_suffix('/') {
        Some(stripped) => (PathBuf::from(stripped), true),
        None => (path, false),
    }
}

/// Decode a possibly C-quoted path from porcelain/clean output
///
/// Unquoted input passes through untouched. Quoted input must carry matching
/// quotes; recognized escapes are `\\`, `\"`, `\a`, `\b`, `\f`, `\n`, `\r`,
/// `\t`, `\v` and one-to-three-digit octal byte values.
fn unquote_path(raw: &str) -> std::result::Result<PathBuf, String> {
    if !raw.starts_with('"') {
        return Ok(PathBuf::from(raw));
    }
    let inner = raw
        .strip_prefix('"')
        .and_then(|r| r.strip_suffix('"'))
        .ok_or_else(|| "unbalanced quotes".to_string())?;

    let mut bytes = Vec::with_capacity(inner.len());
    let mut chars = inner.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\\' {
            let mut buf = [0u8; 4];
            bytes.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
            continue;
        }

        match chars.next() {
            Some('\\') => bytes.push(b'\\'),
            Some('"') => bytes.push(b'"'),
            Some('a') => bytes.push(0x07),
            Some('b') => bytes.push(0x08),
            Some('f') => bytes.push(0x0c),
            Some('n') => bytes.push(b'\n'),
            Some('r') => bytes.push(b'\r'),
            Some('t') => bytes.push(b'\t'),
            Some('v') => bytes.push(0x0b),
            Some(digit @ '0'..='7') => {
                let mut value = digit as u32 - '0' as u32;
                for _ in 0..2 {
                    match chars.peek() {
                        Some(next @ '0'..='7') => {
                            value = value * 8 + (*next as u32 - '0' as u32);
                            chars.next();
                        }
                        _ => break,
                    }
                }
                bytes.push(value as u8);
            }
            other => return Err(format!("unknown escape {other:?}")),
        }
    }

    String::from_utf8(bytes)
        .map(PathBuf::from)
        .map_err(|_| "escaped bytes are not valid utf-8".to_string())
}

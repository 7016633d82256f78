//! Status taxonomy and per-path results
//!
//! `StatusTag` is the closed set every classifier strategy maps into; its
//! `Ord` implementation encodes the directory rollup precedence
//! (Modified > Added > Removed > Missing > Untracked > Ignored > Normal).
//! `Error` sits outside that ladder: it marks a single unreadable entry and
//! never escalates an ancestor directory.

use colored::Colorize;
use derive_new::new;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FileKind {
    File,
    Directory,
}

/// Classification of one path, drawn from a closed set
///
/// Variant order is rollup precedence, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StatusTag {
    Normal,
    Ignored,
    Untracked,
    Missing,
    Removed,
    Added,
    Modified,
    Error,
}

impl StatusTag {
    /// Stable identifier consumers map to display emblems
    pub fn identifier(&self) -> &'static str {
        match self {
            StatusTag::Normal => "normal",
            StatusTag::Ignored => "ignored",
            StatusTag::Untracked => "untracked",
            StatusTag::Missing => "missing",
            StatusTag::Removed => "removed",
            StatusTag::Added => "added",
            StatusTag::Modified => "modified",
            StatusTag::Error => "error",
        }
    }

    /// Two-column porcelain-style code used by the CLI printout
    pub fn code(&self) -> &'static str {
        match self {
            StatusTag::Normal => "  ",
            StatusTag::Ignored => "!!",
            StatusTag::Untracked => "??",
            StatusTag::Missing => " D",
            StatusTag::Removed => "D ",
            StatusTag::Added => "A ",
            StatusTag::Modified => " M",
            StatusTag::Error => "XX",
        }
    }
}

impl std::fmt::Display for StatusTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let colored_code = match self {
            StatusTag::Normal => self.code().normal(),
            StatusTag::Ignored => self.code().bright_black(),
            StatusTag::Untracked => self.code().red(),
            StatusTag::Missing | StatusTag::Removed => self.code().red(),
            StatusTag::Added => self.code().green(),
            StatusTag::Modified => self.code().yellow(),
            StatusTag::Error => self.code().bright_red(),
        };
        write!(f, "{colored_code}")
    }
}

/// One classified path; exactly one exists per distinct path in a scan
#[derive(Debug, Clone, PartialEq, Eq, new)]
pub struct StatusResult {
    pub path: PathBuf,
    pub kind: FileKind,
    pub tag: StatusTag,
}

//! Scan-fatal error taxonomy
//!
//! A status scan either returns a complete result set (individual entries may
//! carry `StatusTag::Error`) or fails as a whole with one of these variants.
//! Per-entry problems (an unreadable file, an undecodable name) never surface
//! here; they are folded into the result set instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("not a git repository (or any of the parent directories): {path}")]
    NotARepository { path: PathBuf },

    #[error("scan cancelled")]
    Cancelled,

    #[error("requested path is outside the repository: {path}")]
    PathOutsideRepository { path: PathBuf },

    #[error("corrupt index file {path}: {reason}")]
    CorruptIndex { path: PathBuf, reason: String },

    #[error("corrupt object {oid}: {reason}")]
    CorruptObject { oid: String, reason: String },

    #[error("status tool failed: {reason}")]
    Tool { reason: String },

    #[error("io error on {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ScanError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ScanError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn tool(reason: impl Into<String>) -> Self {
        ScanError::Tool {
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScanError>;

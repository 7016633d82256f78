//! Working-tree status resolution
//!
//! `Scanner` is the single entry point: it snapshots the working directory,
//! runs whichever classifier strategy the repository handle selected, folds
//! walk errors into the tag set and rolls directory statuses up from their
//! children. Both strategies produce the same taxonomy over the same path
//! union, so callers never observe which one ran.

pub mod aggregate;
pub mod hash_strategy;
pub mod result;
pub mod strategy;
pub mod tool_strategy;

use crate::areas::repository::Repository;
use crate::artifacts::status::hash_strategy::HashStrategy;
use crate::artifacts::status::result::{StatusResult, StatusTag};
use crate::artifacts::status::strategy::{ScanToken, StrategyKind};
use crate::artifacts::status::tool_strategy::ToolStrategy;
use crate::error::Result;
use derive_new::new;
use std::path::PathBuf;

#[derive(new)]
pub struct Scanner<'r> {
    repository: &'r Repository,
}

impl Scanner<'_> {
    /// Resolve the status of every path under the requested roots
    ///
    /// Requested paths may be absolute or repository-relative; an empty slice
    /// means the whole tree. The result covers each distinct file and
    /// directory exactly once, in path order, the repository root as `.`.
    pub async fn scan(
        &self,
        requested: &[PathBuf],
        token: &ScanToken,
    ) -> Result<Vec<StatusResult>> {
        let requested = if requested.is_empty() {
            vec![PathBuf::from(".")]
        } else {
            requested
                .iter()
                .map(|path| self.repository.workspace().relativize(path))
                .collect::<Result<Vec<_>>>()?
        };

        let scan = self.repository.workspace().walk(&requested)?;
        token.checkpoint()?;

        let mut tags = match self.repository.strategy() {
            StrategyKind::ContentHash => {
                HashStrategy::new(self.repository)
                    .classify(&scan, &requested, token)
                    .await?
            }
            StrategyKind::ToolOutput => {
                ToolStrategy::new(self.repository)
                    .classify(&scan, &requested, token)
                    .await?
            }
        };

        for (path, (_, reason)) in &scan.errors {
            log::warn!("unreadable path {}: {reason}", path.display());
            tags.insert(path.clone(), StatusTag::Error);
        }

        Ok(aggregate::rollup(&scan, tags))
    }
}

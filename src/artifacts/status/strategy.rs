//! Strategy selection and cooperative cancellation
//!
//! Two classifier strategies produce the same taxonomy; which one runs is a
//! per-handle capability decision. Hashing every working file is expensive on
//! large trees, so when an external git binary is runnable the tool-output
//! strategy is preferred; the content-hash strategy is the fallback that needs
//! nothing but the repository itself.

use crate::error::{Result, ScanError};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrategyKind {
    ContentHash,
    ToolOutput,
}

impl StrategyKind {
    /// Probe the environment once per repository handle
    pub async fn probe() -> StrategyKind {
        let probe = tokio::process::Command::new("git")
            .arg("version")
            .output()
            .await;

        match probe {
            Ok(output) if output.status.success() => {
                log::debug!(
                    "status tool available ({}), using tool-output strategy",
                    String::from_utf8_lossy(&output.stdout).trim()
                );
                StrategyKind::ToolOutput
            }
            _ => {
                log::debug!("status tool unavailable, using content-hash strategy");
                StrategyKind::ContentHash
            }
        }
    }
}

/// Cooperative cancellation flag checked between per-path classifications
///
/// Clone freely; all clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct ScanToken {
    cancelled: Arc<AtomicBool>,
}

impl ScanToken {
    pub fn new() -> Self {
        ScanToken::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    pub(crate) fn checkpoint(&self) -> Result<()> {
        if self.is_cancelled() {
            Err(ScanError::Cancelled)
        } else {
            Ok(())
        }
    }
}

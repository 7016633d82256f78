//! Repository handle
//!
//! Discovers the repository root by walking up from a starting path, wires
//! the working-tree, object-database and configuration accessors together and
//! pins the classifier strategy for the lifetime of the handle. All access is
//! read-only; HEAD resolution understands symbolic refs, packed refs, a
//! detached HEAD and the unborn-branch case.

use crate::areas::config::GitConfig;
use crate::areas::database::Database;
use crate::areas::index::Index;
use crate::areas::workspace::Workspace;
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::TreeEntry;
use crate::artifacts::status::Scanner;
use crate::artifacts::status::strategy::StrategyKind;
use crate::error::{Result, ScanError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

const GIT_DIR_NAME: &str = ".git";
const SYMBOLIC_REF_PREFIX: &str = "ref: ";

#[derive(Debug)]
pub struct Repository {
    git_dir: PathBuf,
    workspace: Workspace,
    database: Database,
    config: GitConfig,
    strategy: StrategyKind,
}

impl Repository {
    /// Open the repository containing `path`, probing the environment for
    /// the preferred classifier strategy
    pub async fn discover(path: &Path) -> Result<Repository> {
        let strategy = StrategyKind::probe().await;
        Self::open_with_strategy(path, strategy)
    }

    /// Open the repository containing `path` with a caller-chosen strategy
    pub fn open_with_strategy(path: &Path, strategy: StrategyKind) -> Result<Repository> {
        let root = find_root(path)?;
        let git_dir = root.join(GIT_DIR_NAME);
        let config = GitConfig::load(&git_dir.join("config"));

        Ok(Repository {
            database: Database::new(git_dir.join("objects")),
            workspace: Workspace::new(root),
            config,
            git_dir,
            strategy,
        })
    }

    pub fn root(&self) -> &Path {
        self.workspace.root()
    }

    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn config(&self) -> &GitConfig {
        &self.config
    }

    pub fn strategy(&self) -> StrategyKind {
        self.strategy
    }

    pub fn status(&self) -> Scanner<'_> {
        Scanner::new(self)
    }

    /// Snapshot the staging index; a repository without one yields an empty
    /// index
    pub fn load_index(&self) -> Result<Index> {
        Index::load(&self.git_dir.join("index"))
    }

    /// Resolve HEAD to a commit oid; `None` on an unborn branch
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        let head_path = self.git_dir.join("HEAD");
        let content = std::fs::read_to_string(&head_path)
            .map_err(|e| ScanError::io(&head_path, e))?;
        let content = content.trim();

        let Some(ref_name) = content.strip_prefix(SYMBOLIC_REF_PREFIX) else {
            // detached HEAD holds the commit oid directly
            return Ok(Some(ObjectId::try_parse(content.to_string())?));
        };

        let ref_path = self.git_dir.join(ref_name);
        match std::fs::read_to_string(&ref_path) {
            Ok(content) => Ok(Some(ObjectId::try_parse(content.trim().to_string())?)),
            Err(_) => Ok(self.packed_ref(ref_name)),
        }
    }

    /// Look a ref up in `packed-refs`; absence means the branch is unborn
    fn packed_ref(&self, ref_name: &str) -> Option<ObjectId> {
        let content = std::fs::read_to_string(self.git_dir.join("packed-refs")).ok()?;

        for line in content.lines() {
            if line.starts_with('#') || line.starts_with('^') {
                continue;
            }
            if let Some((oid, name)) = line.split_once(' ')
                && name.trim() == ref_name
            {
                return ObjectId::try_parse(oid.to_string()).ok();
            }
        }

        None
    }

    /// Flatten the HEAD commit's tree into a `path -> entry` snapshot
    ///
    /// An unborn branch has no committed tree, so the snapshot is empty.
    pub fn head_tree(&self) -> Result<BTreeMap<PathBuf, TreeEntry>> {
        let Some(commit_oid) = self.read_head()? else {
            return Ok(BTreeMap::new());
        };

        let tree_oid = self.database.commit_tree(&commit_oid)?;
        let mut flattened = BTreeMap::new();
        self.database
            .flatten_tree(&tree_oid, Path::new(""), &mut flattened)?;
        Ok(flattened)
    }
}

/// Walk up from `start` until a directory containing `.git` appears
fn find_root(start: &Path) -> Result<PathBuf> {
    let start = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| ScanError::io(start, e))?
            .join(start)
    };

    let mut current = start.as_path();
    loop {
        if current.join(GIT_DIR_NAME).is_dir() {
            return Ok(current.to_path_buf());
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => {
                return Err(ScanError::NotARepository {
                    path: start.clone(),
                });
            }
        }
    }
}

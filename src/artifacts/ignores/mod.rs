//! Layered ignore-pattern resolver
//!
//! Rules come from three scopes, in increasing precedence: the repository
//! exclude file (`$GIT_DIR/info/exclude`), the user's excludes file named by
//! `core.excludesfile`, and a `.gitignore` in every ancestor directory from
//! the repository root down to the entry's own directory. Within a file,
//! lines apply top to bottom; across the whole ordered rule list the last
//! matching rule wins, and a matching `!pattern` un-ignores the entry.
//!
//! Matching is on basename only (see the rule module). A path whose ancestor
//! directory resolves to ignored is itself ignored.
//!
//! The resolver is scan-scoped: built once per status call, with per-directory
//! files cached for the duration of that scan only.

pub mod rule;

use crate::areas::config::GitConfig;
use crate::artifacts::status::result::FileKind;
use rule::{IgnoreRule, IgnoreScope};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub struct IgnoreResolver {
    root: PathBuf,
    global_rules: Vec<IgnoreRule>,
    dir_rules: HashMap<PathBuf, Vec<IgnoreRule>>,
}

impl IgnoreResolver {
    /// Load the scan-wide scopes; per-directory files are read lazily
    pub fn build(root: &Path, git_dir: &Path, config: &GitConfig) -> IgnoreResolver {
        let mut global_rules = Vec::new();

        global_rules.extend(load_rules_file(
            &git_dir.join("info").join("exclude"),
            IgnoreScope::RepositoryExclude,
        ));

        if let Some(excludes_file) = config.excludes_file() {
            global_rules.extend(load_rules_file(&excludes_file, IgnoreScope::GlobalExcludes));
        }

        IgnoreResolver {
            root: root.to_path_buf(),
            global_rules,
            dir_rules: HashMap::new(),
        }
    }

    /// Decide whether a repository-relative path is ignored
    ///
    /// Every component below the root is checked in turn; an ignored ancestor
    /// directory ignores the whole subtree.
    pub fn is_ignored(&mut self, rel_path: &Path, kind: FileKind) -> bool {
        let components: Vec<&std::ffi::OsStr> = rel_path
            .components()
            .filter_map(|c| match c {
                std::path::Component::Normal(name) => Some(name),
                _ => None,
            })
            .collect();

        let mut parent = PathBuf::new();
        for (depth, name) in components.iter().enumerate() {
            let last = depth == components.len() - 1;
            let component_kind = if last { kind } else { FileKind::Directory };
            let basename = name.to_string_lossy();

            if self.verdict(&parent, &basename, component_kind) == Some(true) {
                return true;
            }
            parent.push(name);
        }

        false
    }

    /// Evaluate every applicable rule in precedence order for one basename
    fn verdict(&mut self, dir: &Path, basename: &str, kind: FileKind) -> Option<bool> {
        let mut verdict = None;

        for rule in &self.global_rules {
            if rule.matches(basename, kind) {
                verdict = Some(!rule.negated);
            }
        }

        // per-directory files from the root down to the entry's directory,
        // deeper files overriding shallower ones
        let mut prefixes = vec![PathBuf::new()];
        let mut acc = PathBuf::new();
        for component in dir.components() {
            acc.push(component);
            prefixes.push(acc.clone());
        }

        for prefix in prefixes {
            for rule in self.rules_for_dir(&prefix) {
                if rule.matches(basename, kind) {
                    verdict = Some(!rule.negated);
                }
            }
        }

        verdict
    }

    fn rules_for_dir(&mut self, dir: &Path) -> &[IgnoreRule] {
        if !self.dir_rules.contains_key(dir) {
            let file = self.root.join(dir).join(".gitignore");
            let rules = load_rules_file(&file, IgnoreScope::Directory(dir.to_path_buf()));
            self.dir_rules.insert(dir.to_path_buf(), rules);
        }
        &self.dir_rules[dir]
    }
}

/// Read one ignore file; unreadable or malformed files degrade to no rules
fn load_rules_file(path: &Path, scope: IgnoreScope) -> Vec<IgnoreRule> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            if path.exists() {
                log::warn!(
                    "treating unreadable ignore file {} as empty: {err}",
                    path.display()
                );
            }
            return Vec::new();
        }
    };

    content
        .lines()
        .filter_map(|line| IgnoreRule::parse(scope.clone(), line))
        .collect()
}

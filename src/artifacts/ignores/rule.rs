//! Single ignore rule: scope, pattern, negation
//!
//! Patterns use shell-glob semantics (`*`, `?`, `[...]`) and are matched
//! against the entry basename only, not the full relative path. Patterns
//! containing `/` therefore never match a basename; a trailing `/` restricts
//! the rule to directories.

use crate::artifacts::status::result::FileKind;
use regex::Regex;
use std::path::PathBuf;

/// Where a rule was loaded from, in increasing precedence order
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum IgnoreScope {
    /// `$GIT_DIR/info/exclude`
    RepositoryExclude,
    /// the file named by `core.excludesfile`
    GlobalExcludes,
    /// `.gitignore` in the repository-relative directory
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct IgnoreRule {
    pub scope: IgnoreScope,
    pub pattern: String,
    pub negated: bool,
    dir_only: bool,
    matcher: Regex,
}

impl IgnoreRule {
    /// Parse one line of an ignore file; blank lines and `#` comments yield
    /// no rule, as do patterns that fail to compile
    pub fn parse(scope: IgnoreScope, line: &str) -> Option<IgnoreRule> {
        let line = line.trim_end_matches('\n');
        if line.is_empty() || line.starts_with('#') {
            return None;
        }

        let (negated, body) = match line.strip_prefix('!') {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let (dir_only, body) = match body.strip_suffix('/') {
            Some(rest) => (true, rest),
            None => (false, body),
        };

        if body.is_empty() {
            return None;
        }

        let matcher = match Regex::new(&glob_to_regex(body)) {
            Ok(matcher) => matcher,
            Err(err) => {
                log::warn!("discarding unparseable ignore pattern {line:?}: {err}");
                return None;
            }
        };

        Some(IgnoreRule {
            scope,
            pattern: line.to_string(),
            negated,
            dir_only,
            matcher,
        })
    }

    pub fn matches(&self, basename: &str, kind: FileKind) -> bool {
        if self.dir_only && kind != FileKind::Directory {
            return false;
        }
        self.matcher.is_match(basename)
    }
}

/// Translate a shell glob into an anchored regular expression
fn glob_to_regex(pattern: &str) -> String {
    let mut out = String::from("^");
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => {
                let mut class = String::new();
                let mut closed = false;
                if matches!(chars.peek(), Some('!') | Some('^')) {
                    chars.next();
                    class.push('^');
                }
                for inner in chars.by_ref() {
                    if inner == ']' {
                        closed = true;
                        break;
                    }
                    if inner == '\\' {
                        class.push('\\');
                    }
                    class.push(inner);
                }
                if closed && !class.is_empty() {
                    out.push('[');
                    out.push_str(&class);
                    out.push(']');
                } else {
                    // unterminated class, treat the bracket literally
                    out.push_str(&regex::escape("["));
                    out.push_str(&regex::escape(&class.replace('^', "!")));
                }
            }
            other => out.push_str(&regex::escape(&other.to_string())),
        }
    }

    out.push('$');
    out
}

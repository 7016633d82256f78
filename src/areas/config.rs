//! Minimal repository configuration reader
//!
//! Parses just enough of `.git/config` to resolve the settings the status
//! engine cares about, most importantly `core.excludesfile`. Unreadable or
//! malformed files degrade to an empty configuration rather than failing a
//! scan.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct GitConfig {
    sections: HashMap<String, HashMap<String, String>>,
}

impl GitConfig {
    pub fn load(path: &Path) -> Self {
        let Ok(content) = std::fs::read_to_string(path) else {
            return GitConfig::default();
        };
        Self::parse(&content)
    }

    fn parse(content: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current = String::new();

        for line in content.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            if let Some(header) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                // `[section]` or `[section "subsection"]`; only the section
                // name matters for the keys we read
                current = header
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                continue;
            }

            if let Some((key, value)) = line.split_once('=') {
                let key = key.trim().to_ascii_lowercase();
                let value = value.trim().trim_matches('"').to_string();
                sections.entry(current.clone()).or_default().insert(key, value);
            }
        }

        GitConfig { sections }
    }

    pub fn get(&self, section: &str, key: &str) -> Option<&str> {
        self.sections
            .get(&section.to_ascii_lowercase())
            .and_then(|keys| keys.get(&key.to_ascii_lowercase()))
            .map(String::as_str)
    }

    /// Resolve `core.excludesfile`, expanding a leading `~` against `$HOME`
    pub fn excludes_file(&self) -> Option<PathBuf> {
        let raw = self.get("core", "excludesfile")?;

        if let Some(rest) = raw.strip_prefix("~/") {
            let home = std::env::var_os("HOME")?;
            return Some(PathBuf::from(home).join(rest));
        }

        Some(PathBuf::from(raw))
    }
}

//! `[corpus]` section configuration.
//!
//! Controls which files of the tree count as indexable pages.
//!
//! ```toml
//! [corpus]
//! exclude = ["404.html"]              # file names or root-relative paths
//! skip_dirs = ["node_modules"]        # directory names never walked
//! markup_suffixes = [".html", ".htm"] # page files and forbidden link suffixes
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Non-indexable pages, matched by file name or by path relative to the root.
    pub exclude: Vec<String>,

    /// Directory names skipped during the walk. `.git` is always skipped.
    pub skip_dirs: Vec<String>,

    /// Markup file suffixes (lowercase, with leading dot).
    pub markup_suffixes: Vec<String>,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            exclude: vec!["404.html".into()],
            skip_dirs: vec!["node_modules".into(), "target".into()],
            markup_suffixes: vec![".html".into(), ".htm".into()],
        }
    }
}

impl CorpusConfig {
    /// Check if a root-relative file path is excluded from the page set.
    pub fn is_excluded(&self, rel_path: &str) -> bool {
        let rel_path = rel_path.trim_start_matches('/');
        let file_name = rel_path.rsplit('/').next().unwrap_or(rel_path);
        self.exclude.iter().any(|pattern| {
            let pattern = pattern.trim_start_matches('/');
            if pattern.contains('/') {
                pattern == rel_path
            } else {
                pattern == file_name
            }
        })
    }
}

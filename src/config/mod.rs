//! Gate configuration management for `ig-gate.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── corpus     # [corpus]
//! │   ├── registry   # [registry]
//! │   ├── rules      # [rules]
//! │   └── site       # [site]
//! ├── error          # ConfigError
//! └── mod.rs         # GateConfig (this file)
//! ```
//!
//! The config file is optional. Without one, the defaults describe the
//! conventional layout of the published site.

mod error;
pub mod section;

pub use error::ConfigError;
pub use section::{CorpusConfig, RegistryConfig, RuleLevel, RulesConfig, SiteConfig};

use crate::{cli::CheckArgs, log, utils::path::normalize_path};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Default config file name, looked up in the corpus root.
pub const CONFIG_FILE_NAME: &str = "ig-gate.toml";

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing ig-gate.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Absolute path to the config file, if one was read (internal use only)
    #[serde(skip)]
    pub config_path: Option<PathBuf>,

    /// Corpus root directory (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    pub site: SiteConfig,
    pub corpus: CorpusConfig,
    pub registry: RegistryConfig,
    pub rules: RulesConfig,
}

impl GateConfig {
    /// Load configuration for a `check` invocation.
    ///
    /// An explicit `--config` must exist. Otherwise `ig-gate.toml` in the root
    /// is used when present, and the defaults when not.
    pub fn load(args: &CheckArgs) -> Result<Self> {
        let root = normalize_path(&args.root);

        let config_path = match &args.config {
            Some(path) => Some(normalize_path(path)),
            None => Some(root.join(CONFIG_FILE_NAME)).filter(|p| p.is_file()),
        };

        let mut config = match &config_path {
            Some(path) => Self::from_path(path)?,
            None => Self::default(),
        };

        config.config_path = config_path;
        config.root = root;
        config.apply_check_args(args);
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>), ConfigError> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {} (ignored): {}", display_path, fields.join(", "));
    }

    /// Get the corpus root directory
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// CLI flags override the config file.
    fn apply_check_args(&mut self, args: &CheckArgs) {
        if let Some(ref url) = args.site_url {
            self.site.url = Some(url.clone());
        }
        if args.warn_only {
            self.rules.warn_only = true;
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(ref raw) = self.site.url {
            let url = url::Url::parse(raw)
                .map_err(|e| ConfigError::Validation(format!("site.url `{raw}` is invalid: {e}")))?;
            if url.scheme() != "https" {
                return Err(ConfigError::Validation(format!(
                    "site.url `{raw}` must use https"
                )));
            }
        }

        if self.corpus.markup_suffixes.is_empty() {
            return Err(ConfigError::Validation(
                "corpus.markup_suffixes must not be empty".into(),
            ));
        }
        if let Some(bad) = self
            .corpus
            .markup_suffixes
            .iter()
            .find(|s| !s.starts_with('.') || s.len() < 2)
        {
            return Err(ConfigError::Validation(format!(
                "corpus.markup_suffixes entry `{bad}` must start with a dot"
            )));
        }

        Ok(())
    }
}

// ============================================================================
// Test Helpers
// ============================================================================

/// Parse config content, panicking on unknown fields (to catch typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> GateConfig {
    let (parsed, ignored) = GateConfig::parse_with_ignored(content).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

//! `[rules]` section configuration.
//!
//! ```toml
//! [rules.levels]
//! R3 = "warn"   # report missing structured data without failing the run
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::finding::{RuleId, Severity};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Per-rule failure level overrides.
    pub levels: BTreeMap<RuleId, RuleLevel>,

    /// Demote every error to a warning (set by `--warn-only`).
    #[serde(skip)]
    pub warn_only: bool,
}

/// Rule failure level.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum RuleLevel {
    /// Failures are errors (run fails).
    #[default]
    Error,
    /// Failures are warnings (run continues to pass).
    Warn,
}

impl RulesConfig {
    /// Effective severity of a finding produced by `rule` at `severity`.
    ///
    /// Unreadable files always stay errors.
    pub fn effective(&self, rule: RuleId, severity: Severity) -> Severity {
        if rule == RuleId::Corpus || severity == Severity::Warning {
            return severity;
        }
        if self.warn_only {
            return Severity::Warning;
        }
        match self.levels.get(&rule) {
            Some(RuleLevel::Warn) => Severity::Warning,
            _ => severity,
        }
    }
}

//! Diagnostics produced by the loader, the parsers, the site model and the rules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Finding severity. Only `Error` affects the exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warning => "warning",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Origin of a finding.
///
/// Variant order is the report order within one subject: loader, parsers and
/// aggregation first, then the rule table in declared order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RuleId {
    /// A file could not be read.
    Corpus,
    /// A page could not be fully parsed.
    Parse,
    /// A registry, manifest or sitemap file could not be decoded.
    Registry,
    /// Aggregation-time conflict (duplicate canonical URLs).
    Model,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
    R8,
}

impl RuleId {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Corpus => "corpus",
            Self::Parse => "parse",
            Self::Registry => "registry",
            Self::Model => "model",
            Self::R1 => "R1",
            Self::R2 => "R2",
            Self::R3 => "R3",
            Self::R4 => "R4",
            Self::R5 => "R5",
            Self::R6 => "R6",
            Self::R7 => "R7",
            Self::R8 => "R8",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RuleId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "corpus" => Self::Corpus,
            "parse" => Self::Parse,
            "registry" => Self::Registry,
            "model" => Self::Model,
            "R1" | "r1" => Self::R1,
            "R2" | "r2" => Self::R2,
            "R3" | "r3" => Self::R3,
            "R4" | "r4" => Self::R4,
            "R5" | "r5" => Self::R5,
            "R6" | "r6" => Self::R6,
            "R7" | "r7" => Self::R7,
            "R8" | "r8" => Self::R8,
            other => return Err(format!("unknown rule id `{other}`")),
        })
    }
}

impl Serialize for RuleId {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RuleId {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One diagnostic line of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Finding {
    pub rule: RuleId,
    pub severity: Severity,
    /// Page route, registry id, or site path of a file.
    pub subject: String,
    pub message: String,
}

impl Finding {
    pub fn error(rule: RuleId, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Error,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub fn warning(rule: RuleId, subject: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            rule,
            severity: Severity::Warning,
            subject: subject.into(),
            message: message.into(),
        }
    }

    pub const fn is_error(&self) -> bool {
        matches!(self.severity, Severity::Error)
    }
}

impl fmt::Display for Finding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {}: {}",
            self.severity, self.rule, self.subject, self.message
        )
    }
}

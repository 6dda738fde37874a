//! Machine-readable registries: terms, documents, the manifest and the sitemap.
//!
//! Decoding never fails the run. A file that cannot be decoded yields one
//! `registry` error and an empty (`failed`) table, so the consistency rules
//! still run and report what they can.

mod manifest;
mod sitemap;

pub use manifest::{Manifest, parse_manifest};
pub use sitemap::{Sitemap, parse_sitemap};

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::finding::{Finding, RuleId};
use crate::utils::path::route::site_path;

/// Logical registry files. Primary and mirror copies resolve to the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RegistryKind {
    Manifest,
    Terms,
    Documents,
}

impl RegistryKind {
    pub const ALL: [Self; 3] = [Self::Manifest, Self::Terms, Self::Documents];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manifest => "manifest",
            Self::Terms => "terms",
            Self::Documents => "documents",
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Whether a registry file was found and decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceStatus {
    /// Neither the primary file nor its mirror exists.
    Missing,
    /// The file exists but could not be read or decoded.
    Failed,
    Loaded,
}

/// One record of the terms or documents registry.
#[derive(Debug, Clone, PartialEq)]
pub struct RegistryEntry {
    pub id: String,
    /// Position in the source array.
    pub index: usize,
    /// Site paths of the pages this entry points at, in derivation order.
    pub refs: Vec<String>,
    pub fields: Map<String, Value>,
}

impl RegistryEntry {
    /// Non-empty string value of a raw field.
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }
}

/// A decoded terms or documents registry.
#[derive(Debug, Clone)]
pub struct Registry {
    pub kind: RegistryKind,
    /// Site path of the file the registry was read from.
    pub source: Option<String>,
    pub status: SourceStatus,
    pub doctrine_version: Option<String>,
    pub generated_at: Option<String>,
    /// Entries grouped by id, so duplicates stay visible.
    pub entries: BTreeMap<String, Vec<RegistryEntry>>,
}

impl Registry {
    pub fn missing(kind: RegistryKind) -> Self {
        Self::empty(kind, None, SourceStatus::Missing)
    }

    pub fn failed(kind: RegistryKind, source: &str) -> Self {
        Self::empty(kind, Some(source.to_string()), SourceStatus::Failed)
    }

    fn empty(kind: RegistryKind, source: Option<String>, status: SourceStatus) -> Self {
        Self {
            kind,
            source,
            status,
            doctrine_version: None,
            generated_at: None,
            entries: BTreeMap::new(),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.status == SourceStatus::Loaded
    }

    /// First entry with this id.
    pub fn get(&self, id: &str) -> Option<&RegistryEntry> {
        self.entries.get(id).and_then(|group| group.first())
    }

    /// Every entry, ordered by id then source position.
    pub fn iter(&self) -> impl Iterator<Item = &RegistryEntry> {
        self.entries.values().flatten()
    }

    /// Ids that appear more than once, with their entries.
    pub fn duplicates(&self) -> impl Iterator<Item = (&String, &Vec<RegistryEntry>)> {
        self.entries.iter().filter(|(_, group)| group.len() > 1)
    }

    pub fn len(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}

/// Decode a terms or documents registry.
///
/// Accepts `{"terms": [...]}` / `{"documents": [...]}` or a bare array.
/// `term_prefixes` are joined with a term's `slug` to derive its page paths.
pub fn parse_registry(
    kind: RegistryKind,
    source: &str,
    text: &str,
    term_prefixes: &[String],
) -> (Registry, Vec<Finding>) {
    let mut findings = Vec::new();

    let root: Value = match serde_json::from_str(text) {
        Ok(value) => value,
        Err(e) => {
            findings.push(Finding::error(
                RuleId::Registry,
                source,
                format!("malformed JSON: {e}"),
            ));
            return (Registry::failed(kind, source), findings);
        }
    };

    let mut registry = Registry::empty(kind, Some(source.to_string()), SourceStatus::Loaded);

    let items = match &root {
        Value::Array(items) => items,
        Value::Object(obj) => {
            registry.doctrine_version = string_field(obj, "doctrineVersion");
            registry.generated_at = string_field(obj, "generatedAt");
            match obj.get(kind.as_str()) {
                Some(Value::Array(items)) => items,
                _ => {
                    findings.push(Finding::error(
                        RuleId::Registry,
                        source,
                        format!("expected a `{kind}` array"),
                    ));
                    return (Registry::failed(kind, source), findings);
                }
            }
        }
        _ => {
            findings.push(Finding::error(
                RuleId::Registry,
                source,
                format!("expected an object with a `{kind}` array or a bare array"),
            ));
            return (Registry::failed(kind, source), findings);
        }
    };

    for (index, item) in items.iter().enumerate() {
        let Value::Object(fields) = item else {
            findings.push(Finding::error(
                RuleId::Registry,
                source,
                format!("entry #{index} is not an object"),
            ));
            continue;
        };

        let Some(id) = string_field(fields, "id") else {
            findings.push(Finding::error(
                RuleId::Registry,
                source,
                format!("entry #{index} has no string `id`"),
            ));
            continue;
        };

        let refs = derive_refs(kind, fields, term_prefixes);
        if refs.is_empty() {
            findings.push(Finding::error(
                RuleId::Registry,
                source,
                format!("entry #{index} (`{id}`) has no reference path"),
            ));
        }

        registry
            .entries
            .entry(id.clone())
            .or_default()
            .push(RegistryEntry {
                id,
                index,
                refs,
                fields: fields.clone(),
            });
    }

    (registry, findings)
}

/// Non-empty string value of an object field.
fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Page paths an entry points at: `ref`, `url`, every `variants.*.url`, and
/// for terms the `slug` under each term prefix.
fn derive_refs(kind: RegistryKind, fields: &Map<String, Value>, term_prefixes: &[String]) -> Vec<String> {
    let mut raw = Vec::new();

    for key in ["ref", "url"] {
        if let Some(value) = string_field(fields, key) {
            raw.push(value);
        }
    }

    if let Some(Value::Object(variants)) = fields.get("variants") {
        for variant in variants.values() {
            if let Value::Object(variant) = variant
                && let Some(url) = string_field(variant, "url")
            {
                raw.push(url);
            }
        }
    }

    if kind == RegistryKind::Terms
        && let Some(slug) = string_field(fields, "slug")
    {
        for prefix in term_prefixes {
            let prefix = prefix.trim_end_matches('/');
            raw.push(format!("{prefix}/{}", slug.trim_start_matches('/')));
        }
    }

    let mut refs: Vec<String> = Vec::new();
    for path in raw.iter().filter_map(|r| site_path(r)) {
        if !refs.contains(&path) {
            refs.push(path);
        }
    }
    refs
}

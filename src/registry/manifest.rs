//! Canonical manifest: the index of machine-readable files.

use serde_json::Value;

use super::SourceStatus;
use crate::finding::{Finding, RuleId};
use crate::utils::path::route::site_path;

/// References declared by the manifest.
#[derive(Debug, Clone)]
pub struct Manifest {
    pub source: String,
    pub status: SourceStatus,
    /// Site paths of referenced `.json` files, declaration order, deduplicated.
    pub registry_refs: Vec<String>,
    /// `text/html` distribution URLs, as written.
    pub page_refs: Vec<String>,
}

impl Manifest {
    pub fn missing(source: &str) -> Self {
        Self::empty(source, SourceStatus::Missing)
    }

    pub fn failed(source: &str) -> Self {
        Self::empty(source, SourceStatus::Failed)
    }

    fn empty(source: &str, status: SourceStatus) -> Self {
        Self {
            source: source.to_string(),
            status,
            registry_refs: Vec::new(),
            page_refs: Vec::new(),
        }
    }

    fn push_registry_ref(&mut self, reference: &str) {
        if let Some(path) = site_path(reference)
            && !self.registry_refs.contains(&path)
        {
            self.registry_refs.push(path);
        }
    }
}

/// Decode the manifest.
///
/// References come from the string values of an optional `registries` object
/// and from every `distribution[].contentUrl`.
pub fn parse_manifest(source: &str, text: &str) -> Result<Manifest, Finding> {
    let root: Value = serde_json::from_str(text).map_err(|e| {
        Finding::error(RuleId::Registry, source, format!("malformed JSON: {e}"))
    })?;
    let Value::Object(root) = root else {
        return Err(Finding::error(
            RuleId::Registry,
            source,
            "manifest must be a JSON object",
        ));
    };

    let mut manifest = Manifest::empty(source, SourceStatus::Loaded);

    if let Some(Value::Object(registries)) = root.get("registries") {
        for value in registries.values() {
            if let Some(reference) = value.as_str() {
                manifest.push_registry_ref(reference);
            }
        }
    }

    if let Some(Value::Array(distribution)) = root.get("distribution") {
        for item in distribution {
            let Some(url) = item.get("contentUrl").and_then(Value::as_str) else {
                continue;
            };
            let format = item
                .get("encodingFormat")
                .and_then(Value::as_str)
                .unwrap_or_default();

            if is_json_reference(url) {
                manifest.push_registry_ref(url);
            } else if format.eq_ignore_ascii_case("text/html") {
                manifest.page_refs.push(url.to_string());
            }
        }
    }

    Ok(manifest)
}

fn is_json_reference(url: &str) -> bool {
    site_path(url).is_some_and(|p| p.to_ascii_lowercase().ends_with(".json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_distribution_and_registries() {
        let text = r#"{
  "@type": "Dataset",
  "registries": {"terms": "/data/terms.json", "documents": "data/documents.json"},
  "distribution": [
    {"contentUrl": "https://example.org/", "encodingFormat": "text/html"},
    {"contentUrl": "https://example.org/data/terms.json", "encodingFormat": "application/json"},
    {"contentUrl": "https://example.org/.well-known/ig-terms.json", "encodingFormat": "application/json"},
    {"contentUrl": "https://example.org/llms.txt", "encodingFormat": "text/plain"},
    {"name": "no url"}
  ]
}"#;
        let manifest = parse_manifest("/ig-manifest.json", text).unwrap();
        assert_eq!(manifest.status, SourceStatus::Loaded);
        assert_eq!(
            manifest.registry_refs,
            vec![
                "/data/terms.json".to_string(),
                "/data/documents.json".to_string(),
                "/.well-known/ig-terms.json".to_string(),
            ]
        );
        assert_eq!(manifest.page_refs, vec!["https://example.org/".to_string()]);
    }

    #[test]
    fn test_manifest_must_be_object() {
        let err = parse_manifest("/ig-manifest.json", "[]").unwrap_err();
        assert_eq!(err.rule, RuleId::Registry);
        assert_eq!(err.message, "manifest must be a JSON object");
    }

    #[test]
    fn test_malformed_manifest() {
        let err = parse_manifest("/ig-manifest.json", "{").unwrap_err();
        assert!(err.message.starts_with("malformed JSON"));
    }
}

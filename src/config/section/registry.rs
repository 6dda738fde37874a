//! `[registry]` section configuration.
//!
//! Conventional locations of the machine-readable files, relative to the root.
//! Each registry may also be published under the discovery directory; the
//! mirror is read only when the primary file is absent.
//!
//! ```toml
//! [registry]
//! manifest = "ig-manifest.json"
//! terms = "data/terms.json"
//! documents = "data/documents.json"
//! sitemap = "sitemap.xml"
//! discovery_dir = ".well-known"
//! manifest_mirror = "ig-manifest.json"
//! terms_mirror = "ig-terms.json"
//! documents_mirror = "ig-documents.json"
//! term_prefixes = ["/en/terms/", "/fr/termes/"]
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    pub manifest: String,
    pub terms: String,
    pub documents: String,
    pub sitemap: String,

    /// Well-known discovery directory holding the mirrors.
    pub discovery_dir: String,
    pub manifest_mirror: String,
    pub terms_mirror: String,
    pub documents_mirror: String,

    /// Route prefixes joined with a term's `slug` to derive its page paths.
    pub term_prefixes: Vec<String>,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            manifest: "ig-manifest.json".into(),
            terms: "data/terms.json".into(),
            documents: "data/documents.json".into(),
            sitemap: "sitemap.xml".into(),
            discovery_dir: ".well-known".into(),
            manifest_mirror: "ig-manifest.json".into(),
            terms_mirror: "ig-terms.json".into(),
            documents_mirror: "ig-documents.json".into(),
            term_prefixes: vec!["/en/terms/".into(), "/fr/termes/".into()],
        }
    }
}

impl RegistryConfig {
    /// Join a mirror file name with the discovery directory.
    pub fn mirror_path(&self, name: &str) -> String {
        format!("{}/{}", self.discovery_dir.trim_end_matches('/'), name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mirror_path() {
        let registry = RegistryConfig::default();
        assert_eq!(
            registry.mirror_path(&registry.terms_mirror),
            ".well-known/ig-terms.json"
        );
    }
}

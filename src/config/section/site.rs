//! `[site]` section configuration.
//!
//! ```toml
//! [site]
//! url = "https://interpretive-governance.org"
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Public origin of the site. Enables the canonical host and location checks.
    pub url: Option<String>,
}

impl SiteConfig {
    /// Parsed site URL, if configured and valid.
    pub fn parsed_url(&self) -> Option<url::Url> {
        self.url.as_deref().and_then(|u| url::Url::parse(u).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parsed_url() {
        let site = SiteConfig {
            url: Some("https://example.org".into()),
        };
        assert_eq!(site.parsed_url().unwrap().host_str(), Some("example.org"));

        let invalid = SiteConfig {
            url: Some("example.org".into()),
        };
        assert!(invalid.parsed_url().is_none());
        assert!(SiteConfig::default().parsed_url().is_none());
    }
}

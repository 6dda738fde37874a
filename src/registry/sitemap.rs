//! XML sitemap reader.
//!
//! Only `<loc>` values matter. `xhtml:link` alternates and the other
//! `<url>` children are skipped.

use quick_xml::{Reader, events::Event};

use super::SourceStatus;
use crate::finding::{Finding, RuleId};
use crate::utils::html::unescape;

/// Listed URLs of the sitemap, in document order.
#[derive(Debug, Clone)]
pub struct Sitemap {
    pub source: String,
    pub status: SourceStatus,
    pub entries: Vec<String>,
}

impl Sitemap {
    pub fn missing(source: &str) -> Self {
        Self {
            source: source.to_string(),
            status: SourceStatus::Missing,
            entries: Vec::new(),
        }
    }

    /// Unreadable or undecodable sitemaps count as empty.
    pub fn failed(source: &str) -> Self {
        Self {
            source: source.to_string(),
            status: SourceStatus::Failed,
            entries: Vec::new(),
        }
    }

    pub fn exists(&self) -> bool {
        self.status != SourceStatus::Missing
    }
}

/// Decode the `<loc>` entries of a sitemap.
pub fn parse_sitemap(source: &str, text: &str) -> Result<Sitemap, Finding> {
    let mut reader = Reader::from_str(text);
    let mut entries = Vec::new();
    let mut current: Option<String> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Finding::error(
                RuleId::Registry,
                source,
                format!("malformed XML at byte {}: {e}", reader.buffer_position()),
            )
        })?;

        match event {
            Event::Start(e) if e.local_name().as_ref() == b"loc" => {
                current = Some(String::new());
            }
            Event::End(e) if e.local_name().as_ref() == b"loc" => {
                if let Some(loc) = current.take() {
                    let loc = loc.trim();
                    if !loc.is_empty() {
                        entries.push(loc.to_string());
                    }
                }
            }
            Event::Text(t) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&unescape(&String::from_utf8_lossy(&t)));
                }
            }
            Event::GeneralRef(r) => {
                if let Some(loc) = current.as_mut() {
                    let reference = format!("&{};", String::from_utf8_lossy(&r));
                    loc.push_str(&unescape(&reference));
                }
            }
            Event::CData(t) => {
                if let Some(loc) = current.as_mut() {
                    loc.push_str(&String::from_utf8_lossy(&t));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if current.is_some() {
        return Err(Finding::error(
            RuleId::Registry,
            source,
            "malformed XML: unterminated <loc>",
        ));
    }

    Ok(Sitemap {
        source: source.to_string(),
        status: SourceStatus::Loaded,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITEMAP: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9" xmlns:xhtml="http://www.w3.org/1999/xhtml">
  <url>
    <loc>https://example.org/en/principles</loc>
    <lastmod>2026-01-15</lastmod>
    <xhtml:link rel="alternate" hreflang="fr" href="https://example.org/fr/principes"/>
  </url>
  <url>
    <loc>
      https://example.org/search?q=a&amp;b=c
    </loc>
  </url>
</urlset>
"#;

    #[test]
    fn test_parse_locs() {
        let sitemap = parse_sitemap("/sitemap.xml", SITEMAP).unwrap();
        assert_eq!(sitemap.status, SourceStatus::Loaded);
        assert_eq!(
            sitemap.entries,
            vec![
                "https://example.org/en/principles".to_string(),
                "https://example.org/search?q=a&b=c".to_string(),
            ]
        );
    }

    #[test]
    fn test_empty_urlset() {
        let sitemap = parse_sitemap(
            "/sitemap.xml",
            r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9"></urlset>"#,
        )
        .unwrap();
        assert!(sitemap.entries.is_empty());
        assert!(sitemap.exists());
    }

    #[test]
    fn test_mismatched_tags_are_a_registry_error() {
        let err = parse_sitemap("/sitemap.xml", "<urlset><url><loc>x</url></urlset>").unwrap_err();
        assert_eq!(err.rule, RuleId::Registry);
        assert_eq!(err.subject, "/sitemap.xml");
        assert!(err.message.starts_with("malformed XML"));
    }

    #[test]
    fn test_missing_and_failed_are_empty() {
        assert!(!Sitemap::missing("/sitemap.xml").exists());
        let failed = Sitemap::failed("/sitemap.xml");
        assert!(failed.exists());
        assert!(failed.entries.is_empty());
    }
}

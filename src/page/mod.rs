//! Page records: metadata extracted from one published HTML file.

mod link;
mod markup;
mod parse;

pub use markup::{HtmlDocument, MarkupDocument};
pub use parse::{ParseOptions, parse_page};

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Value of the `ig:classification` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Normative,
    Informative,
}

impl Classification {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Normative => "normative",
            Self::Informative => "informative",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Classification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normative" => Ok(Self::Normative),
            "informative" => Ok(Self::Informative),
            other => Err(format!(
                "unknown classification `{other}` (expected normative or informative)"
            )),
        }
    }
}

/// Metadata record of one page file.
///
/// Identity is `path`. Fields the parser could not recover are `None` and the
/// record is flagged `partial`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    /// Path relative to the root, `/`-separated (`en/terms/alpha.html`).
    pub path: String,
    /// Clean URL the file is served at (`/en/terms/alpha`).
    pub route: String,
    pub lang: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Absolute canonical URL.
    pub canonical: Option<String>,
    /// `<meta name="robots">` content.
    pub robots: Option<String>,
    /// `ig:*` tags, keys lowercased.
    pub ig_tags: BTreeMap<String, String>,
    /// `og:*` and `twitter:*` tags, keys lowercased.
    pub social_tags: BTreeMap<String, String>,
    /// Number of well-formed structured-data blocks.
    pub structured_data: usize,
    /// Internal links, in document order as written.
    pub links: Vec<String>,
    /// Internal links the parser already reported for a markup suffix.
    pub flagged_links: Vec<String>,
    pub partial: bool,
}

impl Page {
    /// Value of an `ig:*` tag, looked up case-insensitively.
    pub fn ig_tag(&self, name: &str) -> Option<&str> {
        self.ig_tags
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn social_tag(&self, name: &str) -> Option<&str> {
        self.social_tags
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
            .filter(|v| !v.is_empty())
    }

    pub fn classification_raw(&self) -> Option<&str> {
        self.ig_tag("ig:classification")
    }

    pub fn status(&self) -> Option<&str> {
        self.ig_tag("ig:status")
    }

    pub fn operability(&self) -> Option<&str> {
        self.ig_tag("ig:operability")
    }

    pub fn doc_id(&self) -> Option<&str> {
        self.ig_tag("ig:doc-id")
    }

    pub fn entity_id(&self) -> Option<&str> {
        self.ig_tag("ig:entity-id")
    }

    pub fn doctrine_version(&self) -> Option<&str> {
        self.ig_tag("ig:doctrine-version")
    }

    /// Pages whose robots directive contains `noindex` are not published for indexing.
    pub fn is_indexable(&self) -> bool {
        !self.robots.as_deref().is_some_and(|robots| {
            robots
                .split(',')
                .any(|d| d.trim().eq_ignore_ascii_case("noindex"))
        })
    }

    /// Path part of the canonical URL.
    pub fn canonical_path(&self) -> Option<String> {
        let canonical = self.canonical.as_deref()?;
        url::Url::parse(canonical).ok().map(|u| u.path().to_string())
    }
}

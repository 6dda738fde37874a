//! Link classification.

use crate::utils::path::route::is_external_link;

/// Syntactic classification of an `href`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// External link with URL scheme (https://, mailto:, tel:, etc.) or protocol-relative.
    External,
    /// Pure fragment/anchor link (#section, ./#section).
    Fragment,
    /// Site-root-relative path (/about, /en/terms/alpha).
    SiteRoot,
    /// File-relative path (about.html, ../principles).
    FileRelative,
}

impl LinkKind {
    /// Parse a link string into its syntactic kind.
    #[inline]
    pub fn parse(link: &str) -> Self {
        if is_external_link(link) || link.starts_with("//") {
            Self::External
        } else if link.starts_with('#') || link.starts_with("./#") {
            Self::Fragment
        } else if link.starts_with('/') {
            Self::SiteRoot
        } else {
            Self::FileRelative
        }
    }

    /// Internal links point into the corpus (site-root or file-relative).
    #[inline]
    pub const fn is_internal(self) -> bool {
        matches!(self, Self::SiteRoot | Self::FileRelative)
    }
}

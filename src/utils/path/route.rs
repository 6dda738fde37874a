//! URL and route utilities.
//!
//! Pure string functions shared by the page parser, the registry parser and
//! the rules:
//! - Link type detection (external vs internal)
//! - Markup-file suffix detection
//! - Clean-URL routes for page files
//! - Site paths for absolute or relative references

/// Check if a link is external (has a URL scheme like http:, mailto:, etc.)
///
/// A valid scheme must:
/// - Have at least 1 character before the colon
/// - Only contain ASCII alphanumeric or `+`, `-`, `.`
#[inline]
pub fn is_external_link(link: &str) -> bool {
    link.find(':').is_some_and(|pos| {
        pos > 0
            && link[..pos]
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
    })
}

/// Strip the query string and fragment from a link.
///
/// # Examples
/// ```ignore
/// assert_eq!(strip_query_fragment("/about?x=1#team"), "/about");
/// ```
#[inline]
pub fn strip_query_fragment(link: &str) -> &str {
    let end = link.find(['?', '#']).unwrap_or(link.len());
    &link[..end]
}

/// Check if the path part of a link ends in one of the markup suffixes.
///
/// Suffixes are compared case-insensitively and must include the dot.
pub fn has_markup_suffix(link: &str, suffixes: &[String]) -> bool {
    let path = strip_query_fragment(link).to_ascii_lowercase();
    suffixes
        .iter()
        .any(|suffix| path.ends_with(&suffix.to_ascii_lowercase()))
}

/// Clean-URL route a page file is served at.
///
/// `rel_path` is relative to the site root, using `/` separators.
///
/// # Examples
/// ```ignore
/// assert_eq!(route_for_file("index.html", &suffixes), "/");
/// assert_eq!(route_for_file("en/index.html", &suffixes), "/en/");
/// assert_eq!(route_for_file("en/terms/alpha.html", &suffixes), "/en/terms/alpha");
/// ```
pub fn route_for_file(rel_path: &str, suffixes: &[String]) -> String {
    let rel_path = rel_path.trim_start_matches('/');
    let lower = rel_path.to_ascii_lowercase();
    let stem = suffixes
        .iter()
        .find(|suffix| lower.ends_with(&suffix.to_ascii_lowercase()))
        .map_or(rel_path, |suffix| &rel_path[..rel_path.len() - suffix.len()]);

    if stem == "index" {
        return "/".to_string();
    }
    if let Some(dir) = stem.strip_suffix("/index") {
        return format!("/{dir}/");
    }
    format!("/{stem}")
}

/// Site path of a reference that may be an absolute URL, a root-relative
/// path, or a root-relative path without the leading slash.
///
/// Returns `None` for non-HTTP external references (mailto:, tel:, ...) and
/// unparsable URLs.
pub fn site_path(reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.starts_with("http://") || reference.starts_with("https://") {
        let url = url::Url::parse(reference).ok()?;
        return Some(url.path().to_string());
    }
    if is_external_link(reference) {
        return None;
    }
    let path = strip_query_fragment(reference);
    if path.starts_with('/') {
        Some(path.to_string())
    } else {
        Some(format!("/{path}"))
    }
}

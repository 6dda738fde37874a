//! Page metadata extraction.
//!
//! Turns one markup document into a [`Page`] plus the findings raised while
//! reading it. A malformed page never aborts the run: whatever could be
//! recovered enters the site model and the record is flagged `partial`.

use super::{HtmlDocument, MarkupDocument, Page};
use crate::finding::{Finding, RuleId};
use crate::utils::path::route::has_markup_suffix;

/// Parser settings shared by every page of a run.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Lowercase markup file suffixes with leading dot.
    pub markup_suffixes: Vec<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            markup_suffixes: vec![".html".into(), ".htm".into()],
        }
    }
}

/// Result of parsing one page.
#[derive(Debug, Clone)]
pub struct ParsedPage {
    pub page: Page,
    pub findings: Vec<Finding>,
}

/// Parse one page file.
///
/// `path` is root-relative, `route` the clean URL the file is served at.
pub fn parse_page(path: &str, route: &str, text: &str, options: &ParseOptions) -> ParsedPage {
    match HtmlDocument::parse(text) {
        Ok(doc) => extract(&doc, path, route, options),
        Err(message) => {
            let page = Page {
                path: path.to_string(),
                route: route.to_string(),
                partial: true,
                ..Page::default()
            };
            ParsedPage {
                page,
                findings: vec![Finding::error(RuleId::Parse, route, message)],
            }
        }
    }
}

/// Build a page record from any markup document.
fn extract<D: MarkupDocument>(
    doc: &D,
    path: &str,
    route: &str,
    options: &ParseOptions,
) -> ParsedPage {
    let mut findings = Vec::new();
    let mut page = Page {
        path: path.to_string(),
        route: route.to_string(),
        ..Page::default()
    };

    page.lang = doc.lang();
    if page.lang.is_none() {
        findings.push(Finding::error(RuleId::Parse, route, "missing <html lang>"));
    }

    page.title = doc.title().filter(|t| !t.is_empty());
    if page.title.is_none() {
        findings.push(Finding::error(RuleId::Parse, route, "missing or empty <title>"));
    }

    page.description = doc.meta_tag("description").filter(|d| !d.is_empty());
    if page.description.is_none() {
        findings.push(Finding::error(
            RuleId::Parse,
            route,
            "missing or empty meta description",
        ));
    }

    page.canonical = read_canonical(doc, route, &mut findings);
    page.robots = doc.meta_tag("robots");

    for (key, content) in doc.meta_tags() {
        let key = key.to_ascii_lowercase();
        if key.starts_with("ig:") {
            page.ig_tags.entry(key).or_insert(content);
        } else if key.starts_with("og:") || key.starts_with("twitter:") {
            page.social_tags.entry(key).or_insert(content);
        }
    }

    for (index, block) in doc.structured_data_blocks().iter().enumerate() {
        match serde_json::from_str::<serde_json::Value>(block) {
            Ok(_) => page.structured_data += 1,
            Err(e) => findings.push(Finding::error(
                RuleId::Parse,
                route,
                format!("malformed structured data block #{}: {e}", index + 1),
            )),
        }
    }

    page.partial = !findings.is_empty();

    for link in doc.internal_links() {
        if has_markup_suffix(&link, &options.markup_suffixes) {
            findings.push(Finding::error(
                RuleId::R5,
                route,
                format!("internal link uses markup-file suffix: {link}"),
            ));
            page.flagged_links.push(link.clone());
        }
        page.links.push(link);
    }

    ParsedPage { page, findings }
}

/// First canonical target, if present and absolute.
fn read_canonical<D: MarkupDocument>(
    doc: &D,
    route: &str,
    findings: &mut Vec<Finding>,
) -> Option<String> {
    let Some(first) = doc.canonical_link() else {
        findings.push(Finding::error(RuleId::Parse, route, "missing canonical link"));
        return None;
    };

    let targets = doc.canonical_links();
    let mut distinct: Vec<&str> = Vec::new();
    for target in &targets {
        if !distinct.contains(&target.as_str()) {
            distinct.push(target);
        }
    }
    if distinct.len() > 1 {
        findings.push(Finding::error(
            RuleId::Parse,
            route,
            format!("conflicting canonical links: {}", distinct.join(", ")),
        ));
    }

    let absolute = url::Url::parse(&first).is_ok_and(|u| u.has_host());
    if !absolute {
        findings.push(Finding::error(
            RuleId::Parse,
            route,
            format!("canonical URL is not absolute: {first}"),
        ));
        return None;
    }

    Some(first)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::Severity;

    fn page_html(head: &str, body: &str) -> String {
        format!("<!DOCTYPE html><html lang=\"en\"><head>{head}</head><body>{body}</body></html>")
    }

    const FULL_HEAD: &str = r#"<title>Principles | IG</title>
<meta name="description" content="The principles."/>
<link rel="canonical" href="https://example.org/principles"/>
<meta name="robots" content="index,follow"/>
<meta name="ig:classification" content="normative"/>
<meta name="ig:status" content="stable"/>
<meta name="ig:operability" content="reference"/>
<meta name="ig:doc-id" content="IG-DOC-001"/>
<meta property="og:url" content="https://example.org/principles"/>
<meta name="twitter:card" content="summary"/>
<script type="application/ld+json">{"@type":"WebPage"}</script>"#;

    fn parse(html: &str) -> ParsedPage {
        parse_page("principles.html", "/principles", html, &ParseOptions::default())
    }

    #[test]
    fn test_complete_page_has_no_findings() {
        let parsed = parse(&page_html(FULL_HEAD, r#"<a href="/scope">Scope</a>"#));
        assert!(parsed.findings.is_empty(), "{:?}", parsed.findings);

        let page = parsed.page;
        assert!(!page.partial);
        assert_eq!(page.path, "principles.html");
        assert_eq!(page.route, "/principles");
        assert_eq!(page.lang.as_deref(), Some("en"));
        assert_eq!(page.title.as_deref(), Some("Principles | IG"));
        assert_eq!(page.canonical.as_deref(), Some("https://example.org/principles"));
        assert_eq!(page.doc_id(), Some("IG-DOC-001"));
        assert_eq!(page.social_tag("og:url"), Some("https://example.org/principles"));
        assert_eq!(page.social_tag("twitter:card"), Some("summary"));
        assert_eq!(page.structured_data, 1);
        assert_eq!(page.links, vec!["/scope".to_string()]);
    }

    #[test]
    fn test_missing_fields_mark_page_partial() {
        let parsed = parse("<html><head></head><body></body></html>");
        let messages: Vec<_> = parsed.findings.iter().map(|f| f.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "missing <html lang>",
                "missing or empty <title>",
                "missing or empty meta description",
                "missing canonical link",
            ]
        );
        assert!(parsed.findings.iter().all(|f| f.rule == RuleId::Parse));
        assert!(parsed.page.partial);
    }

    #[test]
    fn test_conflicting_canonicals() {
        let head = r#"<title>T</title><meta name="description" content="D"/>
<link rel="canonical" href="https://example.org/a"/>
<link rel="canonical" href="https://example.org/b"/>"#;
        let parsed = parse(&page_html(head, ""));
        assert_eq!(parsed.findings.len(), 1);
        assert!(parsed.findings[0].message.starts_with("conflicting canonical links"));
        assert_eq!(parsed.page.canonical.as_deref(), Some("https://example.org/a"));
    }

    #[test]
    fn test_relative_canonical_is_rejected() {
        let head = r#"<title>T</title><meta name="description" content="D"/>
<link rel="canonical" href="/principles"/>"#;
        let parsed = parse(&page_html(head, ""));
        assert_eq!(parsed.findings.len(), 1);
        assert_eq!(
            parsed.findings[0].message,
            "canonical URL is not absolute: /principles"
        );
        assert_eq!(parsed.page.canonical, None);
    }

    #[test]
    fn test_malformed_structured_data() {
        let head = format!(
            "{FULL_HEAD}<script type=\"application/ld+json\">{{\"@type\": </script>"
        );
        let parsed = parse(&page_html(&head, ""));
        assert_eq!(parsed.page.structured_data, 1);
        assert_eq!(parsed.findings.len(), 1);
        assert!(
            parsed.findings[0]
                .message
                .starts_with("malformed structured data block #2")
        );
        assert!(parsed.page.partial);
    }

    #[test]
    fn test_suffixed_internal_links_reported_under_link_rule() {
        let body = r#"<a href="about.html">About</a>
<a href="/scope.htm#x">Scope</a>
<a href="https://other.example/page.html">Ext</a>
<a href="/clean">Clean</a>"#;
        let parsed = parse(&page_html(FULL_HEAD, body));

        assert_eq!(parsed.findings.len(), 2);
        assert!(parsed.findings.iter().all(|f| f.rule == RuleId::R5));
        assert!(parsed.findings.iter().all(|f| f.severity == Severity::Error));
        assert_eq!(
            parsed.page.flagged_links,
            vec!["about.html".to_string(), "/scope.htm#x".to_string()]
        );
        assert_eq!(parsed.page.links.len(), 3);
        assert!(!parsed.page.partial);
    }

    #[test]
    fn test_minified_page_with_unquoted_attributes() {
        let html = "<!doctype html><html lang=en><head><title>A</title>\
<meta name=description content=D><link rel=canonical href=https://example.org/a>\
<script type=application/ld+json>{\"@type\":\"WebPage\"}</script></head>\
<body><a href=/x.html>x</a></body></html>";
        let parsed = parse(html);

        assert_eq!(parsed.page.canonical.as_deref(), Some("https://example.org/a"));
        assert_eq!(parsed.page.structured_data, 1);
        assert_eq!(parsed.page.flagged_links, vec!["/x.html".to_string()]);
        assert_eq!(parsed.findings.len(), 1, "{:?}", parsed.findings);
        assert_eq!(parsed.findings[0].rule, RuleId::R5);
    }
}

//! Markup access behind the `MarkupDocument` capability.
//!
//! The page parser only talks to [`MarkupDocument`]; [`HtmlDocument`] is the
//! `tl`-backed implementation. Any other parser exposing the same queries can
//! be substituted without touching the parser or the rules.

use super::link::LinkKind;
use crate::utils::html::{collapse_whitespace, quote_unquoted_attributes, unescape};

/// Read-only queries the page parser needs from a markup document.
pub trait MarkupDocument {
    /// `lang` attribute of the root `<html>` element.
    fn lang(&self) -> Option<String>;

    /// Text of the first `<title>`, entity-decoded and whitespace-collapsed.
    fn title(&self) -> Option<String>;

    /// All `<meta>` tags as `(name-or-property, content)` pairs, in document order.
    fn meta_tags(&self) -> Vec<(String, String)>;

    /// Non-empty targets of every `<link rel="canonical">` without an `hreflang`.
    fn canonical_links(&self) -> Vec<String>;

    /// Raw bodies of every `<script type="application/ld+json">`.
    fn structured_data_blocks(&self) -> Vec<String>;

    /// Every non-empty `<a href>`, in document order.
    fn links(&self) -> Vec<String>;

    /// Content of the first meta tag whose name or property matches (ASCII case-insensitive).
    fn meta_tag(&self, name: &str) -> Option<String> {
        self.meta_tags()
            .into_iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, content)| content)
    }

    /// First canonical link.
    fn canonical_link(&self) -> Option<String> {
        self.canonical_links().into_iter().next()
    }

    /// Links that point into the corpus.
    fn internal_links(&self) -> Vec<String> {
        self.links()
            .into_iter()
            .filter(|link| LinkKind::parse(link).is_internal())
            .collect()
    }
}

// ============================================================================
// tl-backed implementation
// ============================================================================

/// Elements the queries above read. Everything else is walked through.
const WANTED: [&str; 6] = ["html", "title", "meta", "link", "script", "a"];

/// An element flattened out of the `tl` DOM.
#[derive(Debug, Clone)]
struct Element {
    name: String,
    /// Lowercased attribute names; values entity-decoded.
    attrs: Vec<(String, Option<String>)>,
    /// Raw text content (only kept for `title` and `script`).
    text: String,
}

impl Element {
    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .and_then(|(_, v)| v.as_deref())
    }

    fn has_attr(&self, key: &str) -> bool {
        self.attrs.iter().any(|(k, _)| k == key)
    }
}

/// HTML page parsed with `tl`.
///
/// The DOM is flattened once at parse time into the elements the queries need,
/// so the document owns its data and does not borrow the source text.
#[derive(Debug, Clone, Default)]
pub struct HtmlDocument {
    elements: Vec<Element>,
}

impl HtmlDocument {
    /// Parse HTML source. Fails only when `tl` rejects the input outright.
    pub fn parse(source: &str) -> Result<Self, String> {
        let source = quote_unquoted_attributes(source);
        let dom = tl::parse(&source, tl::ParserOptions::default())
            .map_err(|_| "markup could not be parsed".to_string())?;
        let parser = dom.parser();

        let mut elements = Vec::new();
        for handle in dom.children() {
            collect_elements(*handle, parser, &mut elements);
        }
        Ok(Self { elements })
    }

    fn elements_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Element> + 's {
        self.elements.iter().filter(move |e| e.name == name)
    }
}

/// Walk a `tl` node, flattening wanted elements in document order.
fn collect_elements(handle: tl::NodeHandle, parser: &tl::Parser<'_>, out: &mut Vec<Element>) {
    let Some(tl::Node::Tag(tag)) = handle.get(parser) else {
        return;
    };

    let name = tag.name().as_utf8_str().to_ascii_lowercase();
    if WANTED.contains(&name.as_str()) {
        let attrs = tag
            .attributes()
            .iter()
            .map(|(key, value)| {
                let key: &str = key.as_ref();
                (
                    key.to_ascii_lowercase(),
                    value.map(|v| unescape(&v).into_owned()),
                )
            })
            .collect();
        let text = if matches!(name.as_str(), "title" | "script") {
            text_of(tag, parser)
        } else {
            String::new()
        };
        out.push(Element { name, attrs, text });
    }

    for child in tag.children().top().iter() {
        collect_elements(*child, parser, out);
    }
}

/// Concatenated raw text below a tag.
fn text_of(tag: &tl::HTMLTag<'_>, parser: &tl::Parser<'_>) -> String {
    let mut text = String::new();
    for child in tag.children().top().iter() {
        match child.get(parser) {
            Some(tl::Node::Raw(bytes)) => text.push_str(&bytes.as_utf8_str()),
            Some(tl::Node::Tag(inner)) => text.push_str(&text_of(inner, parser)),
            _ => {}
        }
    }
    text
}

impl MarkupDocument for HtmlDocument {
    fn lang(&self) -> Option<String> {
        self.elements_named("html")
            .next()
            .and_then(|e| e.attr("lang"))
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .map(str::to_string)
    }

    fn title(&self) -> Option<String> {
        self.elements_named("title")
            .next()
            .map(|e| collapse_whitespace(&unescape(&e.text)))
    }

    fn meta_tags(&self) -> Vec<(String, String)> {
        self.elements_named("meta")
            .filter_map(|e| {
                let key = e.attr("name").or_else(|| e.attr("property"))?;
                let content = e.attr("content").unwrap_or_default();
                Some((key.trim().to_string(), content.trim().to_string()))
            })
            .collect()
    }

    fn canonical_links(&self) -> Vec<String> {
        self.elements_named("link")
            .filter(|e| {
                e.attr("rel").is_some_and(|rel| {
                    rel.split_whitespace()
                        .any(|token| token.eq_ignore_ascii_case("canonical"))
                })
            })
            .filter(|e| !e.has_attr("hreflang"))
            .filter_map(|e| e.attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }

    fn structured_data_blocks(&self) -> Vec<String> {
        self.elements_named("script")
            .filter(|e| {
                e.attr("type")
                    .is_some_and(|t| t.trim().eq_ignore_ascii_case("application/ld+json"))
            })
            .map(|e| e.text.clone())
            .collect()
    }

    fn links(&self) -> Vec<String> {
        self.elements_named("a")
            .filter_map(|e| e.attr("href"))
            .map(str::trim)
            .filter(|href| !href.is_empty())
            .map(str::to_string)
            .collect()
    }
}

//! Site model: every record of one run, aggregated into lookup tables.
//!
//! Tables are keyed by value in `BTreeMap`s and pages are sorted by file path
//! before indexing, so the model does not depend on enumeration order. Rules
//! only ever see `&SiteModel`.

use std::collections::BTreeMap;

use crate::corpus::SiteFiles;
use crate::finding::{Finding, RuleId};
use crate::page::Page;
use crate::registry::{Manifest, Registry, RegistryKind, Sitemap};

/// Settings the rules read from the model.
#[derive(Debug, Clone)]
pub struct ModelOptions {
    /// Public origin of the site, when configured.
    pub site_url: Option<url::Url>,
    /// Lowercase markup file suffixes with leading dot.
    pub markup_suffixes: Vec<String>,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            site_url: None,
            markup_suffixes: vec![".html".into(), ".htm".into()],
        }
    }
}

/// Decoded machine-readable files of one run.
#[derive(Debug, Clone)]
pub struct Registries {
    pub manifest: Manifest,
    pub terms: Registry,
    pub documents: Registry,
}

impl Registries {
    pub fn get(&self, kind: RegistryKind) -> Option<&Registry> {
        match kind {
            RegistryKind::Manifest => None,
            RegistryKind::Terms => Some(&self.terms),
            RegistryKind::Documents => Some(&self.documents),
        }
    }
}

#[derive(Debug)]
pub struct SiteModel {
    /// Indexable pages, sorted by file path.
    pages: Vec<Page>,
    /// Pages dropped for a `noindex` robots directive.
    noindex: usize,
    pub registries: Registries,
    pub sitemap: Sitemap,
    pub files: SiteFiles,
    pub options: ModelOptions,

    by_route: BTreeMap<String, usize>,
    by_canonical: BTreeMap<String, Vec<usize>>,
    by_canonical_path: BTreeMap<String, usize>,
    by_title: BTreeMap<String, Vec<usize>>,
    by_description: BTreeMap<String, Vec<usize>>,
}

impl SiteModel {
    /// Aggregate parsed records.
    ///
    /// Returns one `model` error per group of pages sharing a canonical URL.
    pub fn build(
        mut pages: Vec<Page>,
        registries: Registries,
        sitemap: Sitemap,
        files: SiteFiles,
        options: ModelOptions,
    ) -> (Self, Vec<Finding>) {
        pages.sort_by(|a, b| a.path.cmp(&b.path));
        let total = pages.len();
        pages.retain(Page::is_indexable);

        let mut model = Self {
            pages,
            noindex: 0,
            registries,
            sitemap,
            files,
            options,
            by_route: BTreeMap::new(),
            by_canonical: BTreeMap::new(),
            by_canonical_path: BTreeMap::new(),
            by_title: BTreeMap::new(),
            by_description: BTreeMap::new(),
        };
        model.noindex = total - model.pages.len();

        for (index, page) in model.pages.iter().enumerate() {
            model.by_route.entry(page.route.clone()).or_insert(index);
            if let Some(canonical) = &page.canonical {
                model
                    .by_canonical
                    .entry(canonical.clone())
                    .or_default()
                    .push(index);
            }
            if let Some(path) = page.canonical_path() {
                model.by_canonical_path.entry(path).or_insert(index);
            }
            if let Some(title) = &page.title {
                model.by_title.entry(title.clone()).or_default().push(index);
            }
            if let Some(description) = &page.description {
                model
                    .by_description
                    .entry(description.clone())
                    .or_default()
                    .push(index);
            }
        }

        let findings = model
            .by_canonical
            .iter()
            .filter(|(_, group)| group.len() > 1)
            .map(|(canonical, group)| {
                let routes = model.routes(group);
                Finding::error(
                    RuleId::Model,
                    routes[0],
                    format!(
                        "canonical URL {canonical} is shared with {}",
                        routes[1..].join(", ")
                    ),
                )
            })
            .collect();

        (model, findings)
    }

    /// Indexable pages, sorted by file path.
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn noindex_count(&self) -> usize {
        self.noindex
    }

    /// Whether some indexable page declares this canonical URL.
    pub fn has_canonical(&self, canonical: &str) -> bool {
        self.by_canonical.contains_key(canonical)
    }

    /// Page served at, or declaring its canonical at, a site path.
    ///
    /// A missing or extra trailing slash still matches (`/en` finds `/en/`).
    pub fn page_for_path(&self, site_path: &str) -> Option<&Page> {
        let toggled = match site_path.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            Some(_) => site_path.to_string(),
            None => format!("{site_path}/"),
        };
        [site_path, toggled.as_str()].into_iter().find_map(|path| {
            self.by_route
                .get(path)
                .or_else(|| self.by_canonical_path.get(path))
                .map(|&i| &self.pages[i])
        })
    }

    /// Groups of pages sharing a title, in title order.
    pub fn duplicate_titles(&self) -> impl Iterator<Item = (&str, Vec<&Page>)> {
        duplicate_groups(&self.by_title, &self.pages)
    }

    /// Groups of pages sharing a description, in description order.
    pub fn duplicate_descriptions(&self) -> impl Iterator<Item = (&str, Vec<&Page>)> {
        duplicate_groups(&self.by_description, &self.pages)
    }

    /// Site-wide doctrine version, taken from the terms registry first.
    pub fn doctrine_version(&self) -> Option<&str> {
        self.registries
            .terms
            .doctrine_version
            .as_deref()
            .or(self.registries.documents.doctrine_version.as_deref())
    }

    fn routes(&self, group: &[usize]) -> Vec<&str> {
        group.iter().map(|&i| self.pages[i].route.as_str()).collect()
    }
}

fn duplicate_groups<'a>(
    table: &'a BTreeMap<String, Vec<usize>>,
    pages: &'a [Page],
) -> impl Iterator<Item = (&'a str, Vec<&'a Page>)> {
    table
        .iter()
        .filter(|(_, group)| group.len() > 1)
        .map(|(key, group)| (key.as_str(), group.iter().map(|&i| &pages[i]).collect()))
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::registry::{Manifest, Registry, RegistryKind, Sitemap};

    /// Page with the fields every rule reads.
    pub fn page(path: &str, route: &str, title: &str) -> Page {
        Page {
            path: path.into(),
            route: route.into(),
            lang: Some("en".into()),
            title: Some(title.into()),
            description: Some(format!("{title} description")),
            canonical: Some(format!("https://example.org{route}")),
            ..Page::default()
        }
    }

    pub fn empty_registries() -> Registries {
        Registries {
            manifest: Manifest::missing("/ig-manifest.json"),
            terms: Registry::missing(RegistryKind::Terms),
            documents: Registry::missing(RegistryKind::Documents),
        }
    }

    pub fn model_of(pages: Vec<Page>) -> SiteModel {
        SiteModel::build(
            pages,
            empty_registries(),
            Sitemap::missing("/sitemap.xml"),
            SiteFiles::default(),
            ModelOptions::default(),
        )
        .0
    }

    #[test]
    fn test_pages_sorted_and_noindex_dropped() {
        let mut hidden = page("drafts.html", "/drafts", "Drafts");
        hidden.robots = Some("noindex".into());
        let model = model_of(vec![
            page("scope.html", "/scope", "Scope"),
            hidden,
            page("about.html", "/about", "About"),
        ]);

        let paths: Vec<_> = model.pages().iter().map(|p| p.path.as_str()).collect();
        assert_eq!(paths, vec!["about.html", "scope.html"]);
        assert_eq!(model.noindex_count(), 1);
        assert!(model.page_for_path("/drafts").is_none());
    }

    #[test]
    fn test_duplicate_canonical_is_a_model_error() {
        let mut b = page("b.html", "/b", "B");
        b.canonical = Some("https://example.org/a".into());
        let (_, findings) = SiteModel::build(
            vec![b, page("a.html", "/a", "A")],
            empty_registries(),
            Sitemap::missing("/sitemap.xml"),
            SiteFiles::default(),
            ModelOptions::default(),
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule, RuleId::Model);
        assert_eq!(findings[0].subject, "/a");
        assert_eq!(
            findings[0].message,
            "canonical URL https://example.org/a is shared with /b"
        );
    }

    #[test]
    fn test_build_is_order_independent() {
        let pages = vec![
            page("b.html", "/b", "Same"),
            page("a.html", "/a", "Same"),
            page("c.html", "/c", "Other"),
        ];
        let mut reversed = pages.clone();
        reversed.reverse();

        let groups = |model: &SiteModel| -> Vec<(String, Vec<String>)> {
            model
                .duplicate_titles()
                .map(|(t, g)| (t.to_string(), g.iter().map(|p| p.route.clone()).collect()))
                .collect()
        };
        let a = model_of(pages);
        let b = model_of(reversed);
        assert_eq!(groups(&a), groups(&b));
        assert_eq!(
            groups(&a),
            vec![("Same".to_string(), vec!["/a".to_string(), "/b".to_string()])]
        );
    }

    #[test]
    fn test_page_for_path() {
        let mut term = page("en/terms/alpha.html", "/en/terms/alpha", "Alpha");
        term.canonical = Some("https://example.org/en/terms/alpha-term".into());
        let model = model_of(vec![page("en/index.html", "/en/", "Home"), term]);

        assert_eq!(model.page_for_path("/en/").unwrap().path, "en/index.html");
        assert_eq!(model.page_for_path("/en").unwrap().path, "en/index.html");
        assert_eq!(
            model.page_for_path("/en/terms/alpha-term").unwrap().path,
            "en/terms/alpha.html"
        );
        assert!(model.page_for_path("/terms/alpha").is_none());
        assert!(model.page_for_path("/").is_none());
    }
}

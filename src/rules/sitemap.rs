//! R8: the sitemap lists exactly the indexable pages.

use std::collections::BTreeSet;

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::utils::path::route::has_markup_suffix;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let sitemap = &model.sitemap;
    if !sitemap.exists() {
        return vec![Finding::error(
            RuleId::R8,
            sitemap.source.as_str(),
            "sitemap is missing",
        )];
    }

    let mut findings = Vec::new();

    for entry in &sitemap.entries {
        if has_markup_suffix(entry, &model.options.markup_suffixes) {
            findings.push(Finding::error(
                RuleId::R8,
                entry.as_str(),
                "sitemap entry must not use markup-file suffix",
            ));
        } else if !model.has_canonical(entry) {
            findings.push(Finding::error(
                RuleId::R8,
                entry.as_str(),
                "sitemap entry matches no indexable page",
            ));
        }
    }

    let listed: BTreeSet<&str> = sitemap.entries.iter().map(String::as_str).collect();
    for page in model.pages() {
        if let Some(canonical) = page.canonical.as_deref()
            && !listed.contains(canonical)
        {
            findings.push(Finding::error(
                RuleId::R8,
                page.route.as_str(),
                format!("canonical URL {canonical} is not listed in the sitemap"),
            ));
        }
    }

    findings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SiteFiles;
    use crate::model::tests::{empty_registries, page};
    use crate::model::{ModelOptions, SiteModel};
    use crate::page::Page;
    use crate::registry::{Sitemap, parse_sitemap};

    fn build(pages: Vec<Page>, sitemap: Sitemap) -> SiteModel {
        SiteModel::build(
            pages,
            empty_registries(),
            sitemap,
            SiteFiles::default(),
            ModelOptions::default(),
        )
        .0
    }

    fn sitemap_of(locs: &[&str]) -> Sitemap {
        let body: String = locs
            .iter()
            .map(|loc| format!("<url><loc>{loc}</loc></url>"))
            .collect();
        parse_sitemap("/sitemap.xml", &format!("<urlset>{body}</urlset>")).unwrap()
    }

    #[test]
    fn test_missing_sitemap() {
        let findings = check(&build(Vec::new(), Sitemap::missing("/sitemap.xml")));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].message, "sitemap is missing");
    }

    #[test]
    fn test_extra_entry_is_cited() {
        let model = build(
            vec![page("principles.html", "/principles", "Principles")],
            sitemap_of(&[
                "https://example.org/principles",
                "https://example.org/terms/alpha",
            ]),
        );
        let findings = check(&model);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].subject, "https://example.org/terms/alpha");
        assert_eq!(findings[0].message, "sitemap entry matches no indexable page");
    }

    #[test]
    fn test_unlisted_page_and_suffixed_entry() {
        let model = build(
            vec![page("about.html", "/about", "About")],
            sitemap_of(&["https://example.org/about.html"]),
        );
        let messages: Vec<_> = check(&model)
            .into_iter()
            .map(|f| format!("{}: {}", f.subject, f.message))
            .collect();
        assert_eq!(
            messages,
            vec![
                "https://example.org/about.html: sitemap entry must not use markup-file suffix",
                "/about: canonical URL https://example.org/about is not listed in the sitemap",
            ]
        );
    }

    #[test]
    fn test_empty_corpus_with_empty_and_non_empty_sitemap() {
        assert!(check(&build(Vec::new(), sitemap_of(&[]))).is_empty());
        assert_eq!(
            check(&build(Vec::new(), sitemap_of(&["https://example.org/x"]))).len(),
            1
        );
    }
}

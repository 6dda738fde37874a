//! R2: canonical URLs are clean, secure and point where the page is served.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::page::Page;
use crate::utils::path::route::has_markup_suffix;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let mut findings = Vec::new();
    for page in model.pages() {
        let Some(canonical) = page.canonical.as_deref() else {
            continue;
        };
        check_page(model, page, canonical, &mut findings);
    }
    findings
}

fn check_page(model: &SiteModel, page: &Page, canonical: &str, findings: &mut Vec<Finding>) {
    let route = page.route.as_str();

    if has_markup_suffix(canonical, &model.options.markup_suffixes) {
        findings.push(Finding::error(
            RuleId::R2,
            route,
            "canonical URL must not use markup-file suffix",
        ));
    }

    let Ok(url) = url::Url::parse(canonical) else {
        return;
    };

    if url.scheme() != "https" {
        findings.push(Finding::error(
            RuleId::R2,
            route,
            format!("canonical URL must use https: {canonical}"),
        ));
    }

    if let Some(site) = &model.options.site_url {
        if url.host_str() != site.host_str() {
            findings.push(Finding::warning(
                RuleId::R2,
                route,
                format!(
                    "canonical URL {canonical} is not on {}",
                    site.host_str().unwrap_or_default()
                ),
            ));
        } else if url.path() != route {
            findings.push(Finding::warning(
                RuleId::R2,
                route,
                format!("canonical URL {canonical} differs from the served location {route}"),
            ));
        }
    }

    if let Some(og_url) = page.social_tag("og:url")
        && og_url != canonical
    {
        findings.push(Finding::warning(
            RuleId::R2,
            route,
            format!("og:url {og_url} differs from canonical URL {canonical}"),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::SiteFiles;
    use crate::finding::Severity;
    use crate::model::tests::{empty_registries, model_of, page};
    use crate::model::{ModelOptions, SiteModel};
    use crate::registry::Sitemap;

    fn with_canonical(route: &str, canonical: &str) -> Page {
        let mut p = page("about.html", route, "About");
        p.canonical = Some(canonical.into());
        p
    }

    fn with_site(pages: Vec<Page>, site: &str) -> SiteModel {
        let options = ModelOptions {
            site_url: url::Url::parse(site).ok(),
            ..ModelOptions::default()
        };
        SiteModel::build(
            pages,
            empty_registries(),
            Sitemap::missing("/sitemap.xml"),
            SiteFiles::default(),
            options,
        )
        .0
    }

    #[test]
    fn test_markup_suffix_canonical() {
        let model = model_of(vec![with_canonical(
            "/about",
            "https://example.org/about.html",
        )]);
        let findings = check(&model);
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].to_string(),
            "[error] R2 /about: canonical URL must not use markup-file suffix"
        );
    }

    #[test]
    fn test_clean_https_canonical_passes() {
        let model = model_of(vec![with_canonical("/about", "https://example.org/about")]);
        assert!(check(&model).is_empty());
    }

    #[test]
    fn test_http_canonical() {
        let model = model_of(vec![with_canonical("/about", "http://example.org/about")]);
        let findings = check(&model);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Error);
        assert!(findings[0].message.contains("https"));
    }

    #[test]
    fn test_site_host_and_location_warnings() {
        let model = with_site(
            vec![
                with_canonical("/about", "https://mirror.example/about"),
                {
                    let mut p = with_canonical("/scope", "https://example.org/scope-old");
                    p.path = "scope.html".into();
                    p.title = Some("Scope".into());
                    p
                },
            ],
            "https://example.org",
        );
        let findings = check(&model);
        assert_eq!(findings.len(), 2, "{findings:?}");
        assert!(findings.iter().all(|f| f.severity == Severity::Warning));
        assert!(findings[0].message.contains("is not on example.org"));
        assert!(findings[1].message.contains("differs from the served location /scope"));
    }

    #[test]
    fn test_og_url_mismatch() {
        let mut p = with_canonical("/about", "https://example.org/about");
        p.social_tags
            .insert("og:url".into(), "https://example.org/about.html".into());
        let findings = check(&model_of(vec![p]));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].severity, Severity::Warning);
        assert!(findings[0].message.starts_with("og:url"));
    }
}

//! R4: classification, status, operability and an identifier are declared.
//!
//! Applied to every indexable page, informative ones included.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::page::{Classification, Page};

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let mut findings = Vec::new();
    for page in model.pages() {
        check_page(page, &mut findings);
    }
    findings
}

fn check_page(page: &Page, findings: &mut Vec<Finding>) {
    let route = page.route.as_str();
    let mut missing = |message: String| findings.push(Finding::error(RuleId::R4, route, message));

    match page.classification_raw() {
        None => missing("missing ig:classification".into()),
        Some(raw) => {
            if let Err(e) = raw.parse::<Classification>() {
                missing(format!("invalid ig:classification: {e}"));
            }
        }
    }
    if page.status().is_none() {
        missing("missing ig:status".into());
    }
    if page.operability().is_none() {
        missing("missing ig:operability".into());
    }
    if page.doc_id().is_none() && page.entity_id().is_none() {
        missing("missing ig:doc-id or ig:entity-id".into());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{model_of, page};

    fn tagged(path: &str, route: &str, tags: &[(&str, &str)]) -> Page {
        let mut p = page(path, route, route);
        for (k, v) in tags {
            p.ig_tags.insert((*k).into(), (*v).into());
        }
        p
    }

    #[test]
    fn test_complete_page_passes() {
        let model = model_of(vec![tagged(
            "t.html",
            "/t",
            &[
                ("ig:classification", "informative"),
                ("ig:status", "stable"),
                ("ig:operability", "non-operational"),
                ("ig:entity-id", "IG-T-001"),
            ],
        )]);
        assert!(check(&model).is_empty());
    }

    #[test]
    fn test_untagged_page_reports_each_gap() {
        let model = model_of(vec![tagged("a.html", "/a", &[])]);
        let messages: Vec<_> = check(&model).into_iter().map(|f| f.message).collect();
        assert_eq!(
            messages,
            vec![
                "missing ig:classification",
                "missing ig:status",
                "missing ig:operability",
                "missing ig:doc-id or ig:entity-id",
            ]
        );
    }

    #[test]
    fn test_unknown_classification() {
        let model = model_of(vec![tagged(
            "a.html",
            "/a",
            &[
                ("ig:classification", "draft"),
                ("ig:status", "stable"),
                ("ig:operability", "reference"),
                ("ig:doc-id", "IG-DOC-001"),
            ],
        )]);
        let findings = check(&model);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].message.starts_with("invalid ig:classification"));
    }
}

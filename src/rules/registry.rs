//! R6: registry entries and the pages claiming them agree.
//!
//! Checked both ways: every entry reference resolves to a page, and every
//! page identifier (`ig:doc-id` for documents, `ig:entity-id` for terms) has
//! an entry that references that page.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::page::Page;
use crate::registry::Registry;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let mut findings = Vec::new();
    let registries = &model.registries;

    for registry in [&registries.terms, &registries.documents] {
        check_entries(model, registry, &mut findings);
    }

    for page in model.pages() {
        if let Some(id) = page.doc_id() {
            check_claim(model, page, id, "ig:doc-id", &registries.documents, &mut findings);
        }
        if let Some(id) = page.entity_id() {
            check_claim(model, page, id, "ig:entity-id", &registries.terms, &mut findings);
        }
        check_doctrine_version(model, page, &mut findings);
    }

    findings
}

/// Duplicate ids and dangling references.
fn check_entries(model: &SiteModel, registry: &Registry, findings: &mut Vec<Finding>) {
    let kind = registry.kind;

    for (id, group) in registry.duplicates() {
        let indices: Vec<String> = group.iter().map(|e| format!("#{}", e.index)).collect();
        findings.push(Finding::error(
            RuleId::R6,
            id.as_str(),
            format!("duplicate id in {kind} registry (entries {})", indices.join(", ")),
        ));
    }

    for entry in registry.iter() {
        for reference in &entry.refs {
            if model.page_for_path(reference).is_none() {
                findings.push(Finding::error(
                    RuleId::R6,
                    entry.id.as_str(),
                    format!("{kind} entry references {reference}, which resolves to no page"),
                ));
            }
        }
    }
}

/// A page identifier must name an entry that references the page back.
fn check_claim(
    model: &SiteModel,
    page: &Page,
    id: &str,
    tag: &str,
    registry: &Registry,
    findings: &mut Vec<Finding>,
) {
    let kind = registry.kind;
    let route = page.route.as_str();

    let Some(entry) = registry.get(id) else {
        findings.push(Finding::error(
            RuleId::R6,
            route,
            format!("{tag} {id} has no entry in the {kind} registry"),
        ));
        return;
    };

    let referenced = entry
        .refs
        .iter()
        .any(|r| model.page_for_path(r).is_some_and(|p| p.path == page.path));
    if !referenced {
        findings.push(Finding::error(
            RuleId::R6,
            route,
            format!("{kind} entry {id} does not reference this page"),
        ));
    }

    if let (Some(declared), Some(expected)) = (page.ig_tag("ig:termCode"), entry.field("termCode"))
        && declared != expected
    {
        findings.push(Finding::error(
            RuleId::R6,
            route,
            format!("ig:termCode {declared} differs from {kind} entry {id} termCode {expected}"),
        ));
    }
}

fn check_doctrine_version(model: &SiteModel, page: &Page, findings: &mut Vec<Finding>) {
    if let (Some(declared), Some(expected)) = (page.doctrine_version(), model.doctrine_version())
        && declared != expected
    {
        findings.push(Finding::warning(
            RuleId::R6,
            page.route.as_str(),
            format!("ig:doctrine-version {declared} differs from registry doctrine version {expected}"),
        ));
    }
}

//! R7: the manifest exists and references loadable registries.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::registry::{RegistryKind, SourceStatus};

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let manifest = &model.registries.manifest;
    let subject = manifest.source.as_str();

    match manifest.status {
        SourceStatus::Missing => {
            return vec![Finding::error(RuleId::R7, subject, "manifest is missing")];
        }
        SourceStatus::Failed => {
            return vec![Finding::error(RuleId::R7, subject, "manifest is unreadable")];
        }
        SourceStatus::Loaded => {}
    }

    let mut findings = Vec::new();

    for reference in &manifest.registry_refs {
        if !model.files.contains(reference) {
            findings.push(Finding::error(
                RuleId::R7,
                subject,
                format!("referenced file {reference} does not exist"),
            ));
            continue;
        }
        if let Some(kind) = model.files.registry_kind(reference)
            && let Some(registry) = model.registries.get(kind)
            && !registry.is_loaded()
        {
            findings.push(Finding::error(
                RuleId::R7,
                subject,
                format!("referenced {kind} registry {reference} did not load"),
            ));
        }
    }

    for kind in [RegistryKind::Terms, RegistryKind::Documents] {
        let referenced = manifest
            .registry_refs
            .iter()
            .any(|r| model.files.registry_kind(r) == Some(kind));
        if !referenced {
            findings.push(Finding::error(
                RuleId::R7,
                subject,
                format!("manifest does not reference the {kind} registry"),
            ));
        }
    }

    for url in &manifest.page_refs {
        if !model.has_canonical(url) {
            findings.push(Finding::warning(
                RuleId::R7,
                subject,
                format!("distribution URL {url} matches no page canonical"),
            ));
        }
    }

    findings
}

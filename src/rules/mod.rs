//! Rule engine.
//!
//! A fixed table of independent checks evaluated in declared order. Every
//! check is a pure function of the site model; severity overrides from the
//! configuration are applied afterwards by the gate.

mod canonical;
mod identity;
mod links;
mod manifest;
mod registry;
mod sitemap;
mod structured_data;
mod uniqueness;

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;

/// One entry of the rule table.
pub struct Rule {
    pub id: RuleId,
    pub name: &'static str,
    pub description: &'static str,
    pub check: fn(&SiteModel) -> Vec<Finding>,
}

/// The rule table, in evaluation order.
pub static RULES: &[Rule] = &[
    Rule {
        id: RuleId::R1,
        name: "uniqueness",
        description: "every title and every meta description is unique",
        check: uniqueness::check,
    },
    Rule {
        id: RuleId::R2,
        name: "canonical-cleanliness",
        description: "canonical URLs are https and carry no markup-file suffix",
        check: canonical::check,
    },
    Rule {
        id: RuleId::R3,
        name: "structured-data",
        description: "every page carries a well-formed structured-data block",
        check: structured_data::check,
    },
    Rule {
        id: RuleId::R4,
        name: "classification",
        description: "classification, status, operability and an identifier are declared",
        check: identity::check,
    },
    Rule {
        id: RuleId::R5,
        name: "link-cleanliness",
        description: "internal links carry no markup-file suffix",
        check: links::check,
    },
    Rule {
        id: RuleId::R6,
        name: "registry-consistency",
        description: "registry entries and the pages claiming them agree",
        check: registry::check,
    },
    Rule {
        id: RuleId::R7,
        name: "manifest-integrity",
        description: "the manifest exists and references loadable registries",
        check: manifest::check,
    },
    Rule {
        id: RuleId::R8,
        name: "sitemap-completeness",
        description: "the sitemap lists exactly the indexable pages",
        check: sitemap::check,
    },
];

/// Run every rule in table order.
pub fn evaluate(model: &SiteModel) -> Vec<Finding> {
    RULES.iter().flat_map(|rule| (rule.check)(model)).collect()
}

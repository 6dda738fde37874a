//! R3: every page carries at least one well-formed structured-data block.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    model
        .pages()
        .iter()
        .filter(|page| page.structured_data == 0)
        .map(|page| {
            Finding::error(
                RuleId::R3,
                page.route.as_str(),
                "missing structured data (application/ld+json)",
            )
        })
        .collect()
}

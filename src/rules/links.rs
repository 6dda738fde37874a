//! R5: internal links carry no markup-file suffix.
//!
//! The page parser reports suffixed links as it reads them; this pass covers
//! any link it did not flag.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::utils::path::route::has_markup_suffix;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let suffixes = &model.options.markup_suffixes;
    model
        .pages()
        .iter()
        .flat_map(|page| {
            page.links
                .iter()
                .filter(move |link| !page.flagged_links.contains(*link))
                .filter(move |link| has_markup_suffix(link, suffixes))
                .map(move |link| {
                    Finding::error(
                        RuleId::R5,
                        page.route.as_str(),
                        format!("internal link uses markup-file suffix: {link}"),
                    )
                })
        })
        .collect()
}

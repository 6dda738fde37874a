//! R1: titles and descriptions are unique across the page set.

use crate::finding::{Finding, RuleId};
use crate::model::SiteModel;
use crate::page::Page;

pub fn check(model: &SiteModel) -> Vec<Finding> {
    let titles = model
        .duplicate_titles()
        .map(|(title, group)| duplicate(&group, &format!("duplicate title \"{title}\"")));
    let descriptions = model
        .duplicate_descriptions()
        .map(|(_, group)| duplicate(&group, "duplicate meta description"));
    titles.chain(descriptions).collect()
}

/// One finding per group, reported on the first page.
fn duplicate(group: &[&Page], what: &str) -> Finding {
    let others: Vec<&str> = group[1..].iter().map(|p| p.route.as_str()).collect();
    Finding::error(
        RuleId::R1,
        group[0].route.as_str(),
        format!("{what} also used by {}", others.join(", ")),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::tests::{model_of, page};

    #[test]
    fn test_one_finding_per_duplicate_group() {
        let model = model_of(vec![
            page("a.html", "/a", "Shared"),
            page("b.html", "/b", "Shared"),
            page("c.html", "/c", "Shared"),
            page("d.html", "/d", "Unique"),
        ]);
        let findings = check(&model);
        assert_eq!(findings.len(), 2, "{findings:?}");
        assert_eq!(findings[0].subject, "/a");
        assert_eq!(
            findings[0].message,
            "duplicate title \"Shared\" also used by /b, /c"
        );
        assert_eq!(
            findings[1].message,
            "duplicate meta description also used by /b, /c"
        );
    }

    #[test]
    fn test_unique_pages_pass() {
        let model = model_of(vec![page("a.html", "/a", "A"), page("b.html", "/b", "B")]);
        assert!(check(&model).is_empty());
    }
}

//! `rules` command: list the rule table.

use std::io::{Write, stdout};

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use crate::rules::RULES;

pub fn list_rules() -> Result<()> {
    let width = RULES.iter().map(|r| r.name.len()).max().unwrap_or_default();

    let mut out = stdout().lock();
    for rule in RULES {
        let id = rule.id.as_str();
        writeln!(
            out,
            "{}  {:<width$}  {}",
            id.if_supports_color(Stream::Stdout, |id| id.bold()),
            rule.name,
            rule.description,
        )
        .context("failed to write rule table")?;
    }
    Ok(())
}

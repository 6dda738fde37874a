//! Findings report: ordering, rendering and the run outcome.

use std::fmt;

use owo_colors::{OwoColorize, Stream};
use serde::Serialize;

use crate::finding::{Finding, Severity};
use crate::utils::plural_s;

/// Ordered findings of one run.
///
/// Errors come first, then warnings; within a group findings are ordered by
/// subject, then rule, then message. The order only depends on the findings
/// themselves, so an unchanged tree renders byte-identical output.
#[derive(Debug, Clone, Default)]
pub struct Report {
    findings: Vec<Finding>,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    passed: bool,
    errors: usize,
    warnings: usize,
    findings: &'a [Finding],
}

impl Report {
    pub fn new(mut findings: Vec<Finding>) -> Self {
        findings.sort_by(|a, b| {
            a.severity
                .cmp(&b.severity)
                .then_with(|| a.subject.cmp(&b.subject))
                .then_with(|| a.rule.cmp(&b.rule))
                .then_with(|| a.message.cmp(&b.message))
        });
        findings.dedup();
        Self { findings }
    }

    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn error_count(&self) -> usize {
        self.findings.iter().filter(|f| f.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.findings.len() - self.error_count()
    }

    /// A run passes iff it produced no error.
    pub fn is_passing(&self) -> bool {
        self.error_count() == 0
    }

    /// One line per finding, newline-terminated.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for finding in &self.findings {
            out.push_str(&render_line(finding));
            out.push('\n');
        }
        out
    }

    /// The same ordered findings as a JSON document.
    pub fn render_json(&self) -> serde_json::Result<String> {
        let report = JsonReport {
            passed: self.is_passing(),
            errors: self.error_count(),
            warnings: self.warning_count(),
            findings: &self.findings,
        };
        serde_json::to_string_pretty(&report).map(|mut json| {
            json.push('\n');
            json
        })
    }
}

/// `[severity] rule subject: message`, severity colored on a terminal.
fn render_line(finding: &Finding) -> String {
    let tag = format!("[{}]", finding.severity);
    let tag = match finding.severity {
        Severity::Error => tag
            .if_supports_color(Stream::Stdout, |t| t.red().bold().to_string())
            .to_string(),
        Severity::Warning => tag
            .if_supports_color(Stream::Stdout, |t| t.yellow().to_string())
            .to_string(),
    };
    format!(
        "{tag} {} {}: {}",
        finding.rule, finding.subject, finding.message
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let errors = self.error_count();
        let warnings = self.warning_count();

        if errors == 0 {
            f.write_str("all checks passed")?;
        } else {
            write!(f, "found {errors} error{}", plural_s(errors))?;
        }
        if warnings > 0 {
            write!(f, " ({warnings} warning{})", plural_s(warnings))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finding::RuleId;

    fn sample() -> Vec<Finding> {
        vec![
            Finding::warning(RuleId::R2, "/about", "og:url differs"),
            Finding::error(RuleId::R8, "/about", "not listed"),
            Finding::error(RuleId::R2, "/about", "canonical URL must not use markup-file suffix"),
            Finding::error(RuleId::Parse, "/scope", "missing <html lang>"),
            Finding::error(RuleId::Corpus, "/about", "cannot read file"),
        ]
    }

    #[test]
    fn test_ordering() {
        let report = Report::new(sample());
        let lines: Vec<_> = report.findings().iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "[error] corpus /about: cannot read file",
                "[error] R2 /about: canonical URL must not use markup-file suffix",
                "[error] R8 /about: not listed",
                "[error] parse /scope: missing <html lang>",
                "[warning] R2 /about: og:url differs",
            ]
        );
    }

    #[test]
    fn test_order_is_input_independent() {
        let mut reversed = sample();
        reversed.reverse();
        assert_eq!(
            Report::new(sample()).findings(),
            Report::new(reversed).findings()
        );
    }

    #[test]
    fn test_outcome() {
        let report = Report::new(sample());
        assert!(!report.is_passing());
        assert_eq!(report.error_count(), 4);
        assert_eq!(report.warning_count(), 1);

        assert_eq!(report.to_string(), "found 4 errors (1 warning)");

        let warnings_only = Report::new(vec![Finding::warning(RuleId::R7, "/m", "x")]);
        assert!(warnings_only.is_passing());
        assert_eq!(warnings_only.to_string(), "all checks passed (1 warning)");
        assert!(Report::default().is_passing());
    }

    #[test]
    fn test_render_text_line() {
        let report = Report::new(vec![Finding::error(RuleId::R6, "T1", "dangling")]);
        let text = report.render_text();
        assert!(text.contains("[error]"), "{text}");
        assert!(text.ends_with(" R6 T1: dangling\n"), "{text}");
        assert_eq!(text.lines().count(), 1);
    }

    #[test]
    fn test_render_json() {
        let report = Report::new(vec![Finding::warning(RuleId::R2, "/a", "w")]);
        let value: serde_json::Value = serde_json::from_str(&report.render_json().unwrap()).unwrap();
        assert_eq!(value["passed"], true);
        assert_eq!(value["warnings"], 1);
        assert_eq!(value["findings"][0]["rule"], "R2");
        assert_eq!(value["findings"][0]["severity"], "warning");
        assert_eq!(value["findings"][0]["subject"], "/a");
    }
}

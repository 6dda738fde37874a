//! `check` command: run the gate and print the report.

use std::io::{Write, stdout};

use anyhow::{Context, Result};

use super::{CheckArgs, OutputFormat};
use crate::config::GateConfig;
use crate::{debug, gate, log};

/// Run the gate for `args`. Returns whether the run passed.
pub fn run_check(args: &CheckArgs) -> Result<bool> {
    let config = GateConfig::load(args)?;
    if let Some(path) = &config.config_path {
        debug!("config"; "using {}", path.display());
    }

    let report = gate::run(&config)?;

    let rendered = match args.format {
        OutputFormat::Text => report.render_text(),
        OutputFormat::Json => report.render_json().context("failed to render report")?,
    };

    let mut out = stdout().lock();
    out.write_all(rendered.as_bytes())
        .and_then(|()| out.flush())
        .context("failed to write report")?;

    let module = if report.is_passing() { "gate" } else { "error" };
    log!(module; "{}", report);

    Ok(report.is_passing())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::tests::conforming_site;

    #[test]
    fn test_conforming_site_passes() {
        let dir = tempfile::tempdir().unwrap();
        conforming_site(dir.path());

        assert!(run_check(&CheckArgs::for_root(dir.path())).unwrap());

        let mut args = CheckArgs::for_root(dir.path());
        args.format = OutputFormat::Json;
        assert!(run_check(&args).unwrap());
    }

    #[test]
    fn test_rule_errors_fail_the_run() {
        let dir = tempfile::tempdir().unwrap();
        conforming_site(dir.path());
        std::fs::remove_file(dir.path().join("sitemap.xml")).unwrap();

        assert!(!run_check(&CheckArgs::for_root(dir.path())).unwrap());

        let mut args = CheckArgs::for_root(dir.path());
        args.warn_only = true;
        assert!(run_check(&args).unwrap());
    }

    #[test]
    fn test_missing_root_aborts() {
        let dir = tempfile::tempdir().unwrap();
        let err = run_check(&CheckArgs::for_root(&dir.path().join("missing"))).unwrap_err();
        assert!(format!("{err:#}").contains("site root not found"), "{err:#}");
    }
}

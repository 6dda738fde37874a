//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Quality gate for the interpretive-governance site corpus
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Enable verbose output for debugging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Validate pages, registries and sitemap against the content policy
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },

    /// List the rule table
    #[command(visible_alias = "r")]
    Rules,
}

/// Check command arguments.
#[derive(clap::Args, Debug, Clone)]
pub struct CheckArgs {
    /// Site root directory
    #[arg(value_name = "ROOT", default_value = ".", value_hint = clap::ValueHint::DirPath)]
    pub root: PathBuf,

    /// Config file path (default: <ROOT>/ig-gate.toml when present)
    #[arg(short = 'C', long, value_hint = clap::ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Override the public site URL used for canonical host checks
    #[arg(short = 'U', long = "site-url", value_hint = clap::ValueHint::Url)]
    pub site_url: Option<String>,

    /// Treat rule failures as warnings instead of errors
    #[arg(long, short = 'w')]
    pub warn_only: bool,

    /// Report format written to stdout
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

/// Report output format.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// One `[severity] rule subject: message` line per finding
    #[default]
    Text,
    /// JSON document with all findings and the outcome
    Json,
}

#[cfg(test)]
impl CheckArgs {
    /// Arguments equivalent to `ig-gate check <root>`.
    pub fn for_root(root: &std::path::Path) -> Self {
        Self {
            root: root.to_path_buf(),
            config: None,
            site_url: None,
            warn_only: false,
            format: OutputFormat::Text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_short_flags_do_not_collide() {
        let cli = Cli::try_parse_from(["ig-gate", "-v", "check"]).unwrap();
        assert!(cli.verbose);

        let err = Cli::try_parse_from(["ig-gate", "-V"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_parse_check_defaults() {
        let cli = Cli::try_parse_from(["ig-gate", "check"]).unwrap();
        let Commands::Check { args } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.root, PathBuf::from("."));
        assert_eq!(args.format, OutputFormat::Text);
        assert!(!args.warn_only);
    }

    #[test]
    fn test_parse_check_flags() {
        let cli = Cli::try_parse_from([
            "ig-gate",
            "c",
            "site",
            "--format",
            "json",
            "-w",
            "--site-url",
            "https://example.org",
            "--verbose",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Check { args } = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(args.root, PathBuf::from("site"));
        assert_eq!(args.format, OutputFormat::Json);
        assert!(args.warn_only);
        assert_eq!(args.site_url.as_deref(), Some("https://example.org"));
    }

    #[test]
    fn test_parse_rules() {
        let cli = Cli::try_parse_from(["ig-gate", "rules"]).unwrap();
        assert!(matches!(cli.command, Commands::Rules));
    }
}

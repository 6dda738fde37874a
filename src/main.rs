//! ig-gate - Quality gate for the interpretive-governance site corpus.
//!
//! Reads the published tree (pages, registries, manifest, sitemap), builds a
//! model of the site and evaluates the content rules. Exit status is 0 when
//! no error was found, 1 when errors were found, 2 when the run aborted.

mod cli;
mod config;
mod corpus;
mod finding;
mod gate;
mod logger;
mod model;
mod page;
mod registry;
mod report;
mod rules;
mod utils;

use std::process::ExitCode;

use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};

/// Errors were found.
const EXIT_FAILED: u8 = 1;
/// The run could not complete.
const EXIT_ABORTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let outcome = match &cli.command {
        Commands::Check { args } => cli::check::run_check(args),
        Commands::Rules => cli::rules::list_rules().map(|()| true),
    };

    ExitCode::from(exit_status(&outcome))
}

/// Exit status for a command outcome. Aborted runs are logged.
fn exit_status(outcome: &anyhow::Result<bool>) -> u8 {
    match outcome {
        Ok(true) => 0,
        Ok(false) => EXIT_FAILED,
        Err(e) => {
            log!("error"; "{:#}", e);
            EXIT_ABORTED
        }
    }
}

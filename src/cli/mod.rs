//! Command-line interface module.

mod args;
pub mod check;
pub mod rules;

pub use args::{CheckArgs, Cli, Commands, OutputFormat};

//! `career-sync` command-line adapter.
//!
//! Argument parsing lives in [`args`]; [`CliRunner`] turns a parsed command
//! into controller calls and renders the resulting state as JSON.

mod args;
mod runner;

pub use args::{Cli, Command, EntityKind};
pub use runner::{CliError, CliPorts, CliRunner, CommandOutput};

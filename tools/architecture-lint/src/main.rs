//! Command-line entry point for the layering lint.
//!
//! With no argument the lint checks `client/` under the workspace root;
//! passing a path checks that crate directory instead.

use std::env;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn main() -> ExitCode {
    let Some(client_dir) = env::args_os().nth(1).map(PathBuf::from).or_else(default_client_dir)
    else {
        report("unable to locate the workspace root (no Cargo.toml with a [workspace] table)");
        return ExitCode::FAILURE;
    };

    match architecture_lint::lint_client_sources(&client_dir) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err.to_string());
            ExitCode::FAILURE
        }
    }
}

fn report(message: &str) {
    drop(writeln!(io::stderr().lock(), "{message}"));
}

fn default_client_dir() -> Option<PathBuf> {
    let candidates = [
        env::var_os("CARGO_WORKSPACE_DIR").map(PathBuf::from),
        env::current_dir().ok(),
        Some(PathBuf::from(env!("CARGO_MANIFEST_DIR"))),
    ];
    candidates
        .iter()
        .flatten()
        .find_map(|start| workspace_root(start))
        .map(|root| root.join("client"))
}

fn workspace_root(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        let manifest = std::fs::read_to_string(dir.join("Cargo.toml")).ok()?;
        manifest
            .lines()
            .any(|line| line.trim() == "[workspace]")
            .then(|| dir.to_path_buf())
    })
}

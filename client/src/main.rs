//! `career-sync` entry-point: wires configuration, outbound adapters, and the
//! CLI runner, then prints the resulting state as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tokio::runtime::Builder;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use client::config::ClientSettings;
use client::inbound::cli::{Cli, CliPorts, CliRunner};
use client::outbound::credentials::FileCredentialStore;
use client::outbound::graphql::GraphQlHttpGateway;

fn main() -> Result<ExitCode> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let runtime = Builder::new_current_thread()
        .enable_all()
        .build()
        .wrap_err("create Tokio runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> Result<ExitCode> {
    let settings = ClientSettings::load_from_iter([OsString::from("career-sync")])
        .map_err(|error| eyre!("load configuration: {error}"))?;

    let gateway = GraphQlHttpGateway::with_user_agent(
        settings.endpoint()?,
        settings.request_timeout()?,
        settings.user_agent(),
    )
    .wrap_err("build HTTP client")?;
    let credentials_dir = settings.credentials_dir();
    let credentials = FileCredentialStore::open(&credentials_dir).wrap_err_with(|| {
        format!("open credentials directory '{}'", credentials_dir.display())
    })?;

    let runner = CliRunner::new(CliPorts {
        gateway: Arc::new(gateway),
        credentials: Arc::new(credentials),
    });
    let output = runner.run(cli.command).await?;

    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{}", output.json).wrap_err("write output")?;
    Ok(if output.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

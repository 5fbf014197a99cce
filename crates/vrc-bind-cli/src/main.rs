//! `vrc-bind` binary: wires the VRChat client, the binding store and the
//! console transport together.

mod bootstrap_helpers;
mod cli_args;
mod console_transport;

use std::sync::Arc;

use anyhow::{Context, Result};
use bootstrap_helpers::init_tracing;
use clap::Parser;
use cli_args::Cli;
use console_transport::run_console_transport;
use tokio::io::BufReader;
use vrc_bind_api::VrcApiClient;
use vrc_bind_runtime::{BindingRuntime, UserStore};

pub(crate) fn build_runtime(cli: &Cli) -> Result<BindingRuntime> {
    let client = VrcApiClient::new(cli.api_config()).context("failed to create vrchat client")?;
    let store = UserStore::load(cli.store_path.clone())?;
    tracing::info!(
        store = %store.path().display(),
        bindings = store.len(),
        api_base = %cli.api_base,
        "vrc-bind runtime ready"
    );
    Ok(BindingRuntime::new(Arc::new(client), store))
}

async fn run_cli(cli: Cli) -> Result<()> {
    let mut runtime = build_runtime(&cli)?;
    let stdin = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = run_console_transport(&mut runtime, stdin, tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            println!("vrc-bind shutdown requested");
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    run_cli(cli).await
}

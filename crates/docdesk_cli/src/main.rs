mod cli;
mod commands;
mod logging;
mod render;

use std::process::ExitCode;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use docdesk_client::{ClientSettings, DocumentsStore, HttpDocumentApi};

use crate::cli::Cli;
use crate::logging::LogDestination;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let destination = match cli.log_file.clone() {
        Some(path) => LogDestination::Both(path),
        None => LogDestination::Terminal,
    };
    logging::initialize(logging::level_for_verbosity(cli.verbose), destination);

    match run(cli).await {
        Ok(0) => ExitCode::SUCCESS,
        Ok(_) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Runs one command against a fresh session store; returns the number of failed operations.
async fn run(cli: Cli) -> Result<usize> {
    let mut settings = ClientSettings::from_env().context("invalid environment")?;
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }
    if let Some(secs) = cli.timeout_secs {
        settings.request_timeout = Duration::from_secs(secs);
    }

    let api = Arc::new(HttpDocumentApi::new(settings).context("cannot build HTTP client")?);
    let store = DocumentsStore::new(api.clone());
    let failures = Arc::new(AtomicUsize::new(0));
    let printer = commands::spawn_event_printer(store.subscribe(), failures.clone());

    let outcome = commands::run(cli.command, &store, api.as_ref()).await;

    // Closing the store ends the printer's event stream.
    drop(store);
    let printer_ok = commands::join_printer(printer);
    outcome?;
    // A lost printer may have missed failures; never report a clean run then.
    let failed = failures.load(Ordering::Relaxed);
    Ok(if printer_ok { failed } else { failed.max(1) })
}

// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap and validate them
// 2. Set up logging (tracing) and Ctrl-C cancellation
// 3. Run the check, drawing progress on its own task
// 4. Print a summary and exit with proper code
//    (0 = no broken links, 1 = broken links, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod checker; // src/checker/ - probing, dispatching, progress
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - validated run settings
mod error; // src/error.rs - run-level errors
mod input; // src/input.rs - reading the link list
mod pipeline; // src/pipeline.rs - read, check, write
mod report; // src/report.rs - csv/json/txt/xlsx output
mod ui; // src/ui.rs - progress bar and summary

use std::future::Future;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use checker::{ChannelProgressSink, NoopProgress, ReqwestTransport};
use cli::Cli;
use error::CheckError;

// The #[tokio::main] attribute transforms our async main into a real main function
#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = no broken links
//   Ok(1) = broken links found
//   Err = invalid arguments, unreadable input, unwritable output, cancelled
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    init_tracing(cli.quiet, cli.verbose)?;

    let quiet = cli.quiet;
    let config = cli.into_config().context("invalid arguments")?;

    let transport = ReqwestTransport::new().map_err(|e| CheckError::Client(e.to_string()))?;
    let transport = Arc::new(transport);

    // First Ctrl-C cancels the run, a second one exits right away
    let cancel = CancellationToken::new();
    tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if watch_interrupts(tokio::signal::ctrl_c, cancel).await {
                eprintln!("Interrupted");
                std::process::exit(2);
            }
        }
    });

    if !quiet {
        println!("🔍 Checking links from {}", config.input_path.display());
    }

    let result = if quiet {
        pipeline::check_file(&config, transport, &NoopProgress, cancel).await
    } else {
        let (sink, rx) = ChannelProgressSink::new();
        let bar = ui::spawn_progress_bar(rx);
        let result = pipeline::check_file(&config, transport, &sink, cancel).await;
        // Closing the channel lets the bar task finish
        drop(sink);
        let _ = bar.await;
        result
    };

    let report = result
        .with_context(|| format!("checking {} failed", config.input_path.display()))?;

    if !quiet {
        ui::print_summary(&report, &config);
    }

    Ok(if report.broken > 0 { 1 } else { 0 })
}

// Waits for interrupts from `next_interrupt`
//
// Returns: true on the second interrupt, false if the signal source fails
async fn watch_interrupts<F, Fut>(mut next_interrupt: F, cancel: CancellationToken) -> bool
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::io::Result<()>>,
{
    let mut seen = 0;
    while next_interrupt().await.is_ok() {
        seen += 1;
        if seen > 1 {
            return true;
        }
        warn!("interrupt received, cancelling (press Ctrl-C again to exit now)");
        cancel.cancel();
    }
    false
}

// Log level: LINK_SWEEP_LOG if set, otherwise from --quiet / --verbose
fn init_tracing(quiet: bool, verbose: bool) -> Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "link_sweep=debug"
    } else {
        "warn"
    };

    let filter =
        EnvFilter::try_from_env("LINK_SWEEP_LOG").unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize tracing subscriber: {}", e))
}

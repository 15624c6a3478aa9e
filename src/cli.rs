// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things). The parsed values are
// then checked by `RunConfig::new` before anything runs.
// =============================================================================

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::checker::{ReportMode, DEFAULT_TIMEOUT};
use crate::config::{default_workers, ConfigError, OutputFormat, RunConfig};

// This struct represents our entire CLI application
#[derive(Parser, Debug)]
#[command(
    name = "link-sweep",
    version,
    about = "Check a list of URLs for broken links, concurrently",
    long_about = "link-sweep reads a text file with one URL per line, checks every link with a \
                  bounded pool of concurrent requests and writes the broken ones to a CSV, JSON, \
                  text or XLSX report.\n\n\
                  Exit codes: 0 = no broken links, 1 = broken links found, 2 = error."
)]
pub struct Cli {
    /// Text file with one URL per line (blank lines are skipped)
    pub input: PathBuf,

    /// Where to write the report
    #[arg(short, long)]
    pub output: PathBuf,

    /// Report format (default: taken from the output file extension)
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    /// How many links are checked at the same time (1-50)
    #[arg(short, long, default_value_t = default_workers())]
    pub workers: usize,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT.as_secs())]
    pub timeout: u64,

    /// Also list working links in the report
    #[arg(long)]
    pub all: bool,

    /// No progress bar, only errors are logged
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Debug logging (one line per checked link)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Result<RunConfig, ConfigError> {
        let report_mode = if self.all {
            ReportMode::All
        } else {
            ReportMode::BrokenOnly
        };

        RunConfig::new(
            self.input,
            self.output,
            self.format,
            self.workers,
            Duration::from_secs(self.timeout),
            report_mode,
        )
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Doc comments become help text
//    - The `///` lines above each field show up in `link-sweep --help`
//
// 2. Option<OutputFormat>
//    - None when --format isn't given, so we can fall back to the extension
//
// 3. value_enum
//    - clap lists the allowed values (csv, json, txt, xlsx) and rejects
//      anything else before our code runs
// -----------------------------------------------------------------------------

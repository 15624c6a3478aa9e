// src/config.rs
// =============================================================================
// The validated settings of one run.
//
// The CLI collects raw values; `RunConfig::new` checks them all before any
// network traffic happens. Once built, a RunConfig is never modified.
// =============================================================================

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::ValueEnum;

use crate::checker::{DispatchOptions, ReportMode, MAX_WORKERS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
    Txt,
    Xlsx,
}

impl OutputFormat {
    // Picks the format from the output file's extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" => Ok(OutputFormat::Csv),
            "json" => Ok(OutputFormat::Json),
            "txt" | "text" => Ok(OutputFormat::Txt),
            "xlsx" => Ok(OutputFormat::Xlsx),
            _ => Err(ConfigError::UnknownFormat(ext)),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OutputFormat::Csv => "csv",
            OutputFormat::Json => "json",
            OutputFormat::Txt => "txt",
            OutputFormat::Xlsx => "xlsx",
        };
        f.write_str(name)
    }
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("worker count must be between 1 and {}, got {}", MAX_WORKERS, .0)]
    InvalidWorkers(usize),
    #[error("timeout must be greater than zero")]
    InvalidTimeout,
    #[error("unknown output format '{0}' (expected csv, json, txt or xlsx)")]
    UnknownFormat(String),
    #[error("input file {} does not exist", .0.display())]
    MissingInput(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub output_format: OutputFormat,
    pub max_workers: usize,
    pub timeout: Duration,
    pub report_mode: ReportMode,
}

impl RunConfig {
    // Parameters:
    //   format: None means "infer from the output extension"
    //
    // Returns: a config that is safe to run, or the first problem found
    pub fn new(
        input_path: PathBuf,
        output_path: PathBuf,
        format: Option<OutputFormat>,
        max_workers: usize,
        timeout: Duration,
        report_mode: ReportMode,
    ) -> Result<Self, ConfigError> {
        if !(1..=MAX_WORKERS).contains(&max_workers) {
            return Err(ConfigError::InvalidWorkers(max_workers));
        }
        if timeout.is_zero() {
            return Err(ConfigError::InvalidTimeout);
        }
        if !input_path.is_file() {
            return Err(ConfigError::MissingInput(input_path));
        }

        let output_format = match format {
            Some(format) => format,
            None => OutputFormat::from_path(&output_path)?,
        };

        Ok(Self {
            input_path,
            output_path,
            output_format,
            max_workers,
            timeout,
            report_mode,
        })
    }

    pub fn dispatch_options(&self) -> DispatchOptions {
        DispatchOptions {
            max_workers: self.max_workers,
            timeout: self.timeout,
            report_mode: self.report_mode,
        }
    }
}

/// min(10, CPU count).
pub fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .min(10)
}

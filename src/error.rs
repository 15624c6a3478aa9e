// src/error.rs
// =============================================================================
// Run-level errors.
//
// A broken link is NOT an error: it is a Classification in the results.
// Only problems that stop the whole run end up here.
// =============================================================================

use std::path::PathBuf;

use crate::report::ReportError;

#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("cannot read input file {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write output file {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("run cancelled after {completed} of {total} link(s)")]
    Cancelled { completed: usize, total: usize },

    #[error("could not build report: {0}")]
    Report(#[from] ReportError),

    #[error("cannot create HTTP client: {0}")]
    Client(String),
}

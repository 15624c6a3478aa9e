// src/checker/mod.rs
// =============================================================================
// This module contains all link checking logic.
//
// Submodules:
// - transport: The HTTP seam (reqwest in production, a mock in tests)
// - probe: Checks one URL and classifies the outcome
// - progress: The progress event contract and ready-made sinks
// - dispatch: Runs probes for a whole list with a bounded worker pool
//
// This file (mod.rs) is the module root - it ties everything together and
// exports the public API that other parts of our application can use.
// =============================================================================

mod dispatch;
mod probe;
mod progress;
mod transport;

#[cfg(test)]
pub(crate) mod mock;

// Re-export public items from submodules
// This lets users write `checker::Dispatcher` instead of
// `checker::dispatch::Dispatcher`
pub use dispatch::{DispatchOptions, Dispatcher, ReportMode, RunReport, MAX_WORKERS};
pub use probe::{CheckResult, Classification, DEFAULT_TIMEOUT};
pub use progress::{ChannelProgressSink, NoopProgress, ProgressEvent, ProgressSink};
pub use transport::{ReqwestTransport, Transport};

// src/checker/dispatch.rs
// =============================================================================
// The dispatcher runs the probes for a whole input list.
//
// How it works:
// 1. Trim every entry and drop the blank ones
// 2. Feed the rest through a stream with `buffer_unordered(workers)`, so at
//    most `workers` probes are in flight at once
// 3. Consume completions as they arrive and report progress after each one
// 4. Emit a final 100% event and return the results sorted by input line
//
// Blank lines are not counted: 3 URLs and 2 blank lines means 3 checks and
// percentages out of 3.
//
// Rust concepts:
// - Streams: async iterators, here bounded with buffer_unordered
// - tokio::select!: wait on "next completion" and "cancelled" at once
// - Arc<dyn Trait>: share one transport between all probes
// =============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::stream::{self, StreamExt};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::probe::{probe, CheckResult, DEFAULT_TIMEOUT};
use super::progress::{percent, ProgressEvent, ProgressSink};
use super::transport::Transport;
use crate::error::CheckError;

/// Upper bound on concurrent probes, protects the local machine and the
/// remote hosts.
pub const MAX_WORKERS: usize = 50;

// Which results the caller wants back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportMode {
    /// Only links that are not Ok
    #[default]
    BrokenOnly,
    /// Every checked link
    All,
}

#[derive(Debug, Clone)]
pub struct DispatchOptions {
    pub max_workers: usize,
    pub timeout: Duration,
    pub report_mode: ReportMode,
}

impl Default for DispatchOptions {
    fn default() -> Self {
        Self {
            max_workers: 10,
            timeout: DEFAULT_TIMEOUT,
            report_mode: ReportMode::BrokenOnly,
        }
    }
}

/// Everything a completed run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    /// Sorted by input line
    pub results: Vec<CheckResult>,
    /// Number of non-blank entries that were probed
    pub checked: usize,
    /// Number of those that were not Ok
    pub broken: usize,
    pub elapsed: Duration,
}

pub struct Dispatcher {
    transport: Arc<dyn Transport>,
    options: DispatchOptions,
    cancel: CancellationToken,
}

impl Dispatcher {
    pub fn new(transport: Arc<dyn Transport>, options: DispatchOptions) -> Self {
        Self {
            transport,
            options,
            cancel: CancellationToken::new(),
        }
    }

    // Lets the caller stop the run from outside (Ctrl-C in the CLI)
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    // Checks every non-blank entry
    //
    // Parameters:
    //   entries: raw input lines, in file order
    //   sink: receives a ProgressEvent after every completion
    //
    // Returns: a RunReport accounting for every non-blank entry, or an error
    // if the run was cancelled. There is no partial success.
    pub async fn run(
        &self,
        entries: &[String],
        sink: &dyn ProgressSink,
    ) -> Result<RunReport, CheckError> {
        let started = Instant::now();

        // (line number, trimmed link); line numbers are 1-based
        let work: Vec<(usize, String)> = entries
            .iter()
            .enumerate()
            .filter_map(|(idx, raw)| {
                let link = raw.trim();
                (!link.is_empty()).then(|| (idx + 1, link.to_string()))
            })
            .collect();

        let total = work.len();
        let workers = clamp_workers(self.options.max_workers);
        info!(
            total,
            skipped = entries.len() - total,
            workers,
            "link check started"
        );

        if self.cancel.is_cancelled() {
            warn!("run cancelled before start");
            return Err(CheckError::Cancelled {
                completed: 0,
                total,
            });
        }

        let timeout = self.options.timeout;
        let transport: &dyn Transport = self.transport.as_ref();

        let mut completions = stream::iter(work)
            .map(|(line, link)| async move {
                let classification = probe(transport, &link, timeout).await;
                CheckResult {
                    line,
                    link,
                    classification,
                }
            })
            .buffer_unordered(workers);

        let mut results = Vec::new();
        let mut completed = 0;
        let mut broken = 0;

        loop {
            let next = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => {
                    warn!(completed, total, "run cancelled, abandoning in-flight probes");
                    return Err(CheckError::Cancelled { completed, total });
                }
                next = completions.next() => next,
            };

            let Some(result) = next else { break };

            completed += 1;
            if result.is_broken() {
                broken += 1;
            }

            sink.emit(ProgressEvent::new(
                percent(completed, total),
                format!("Checking link {}/{} - Broken: {}", completed, total, broken),
                broken,
            ));

            if result.is_broken() || self.options.report_mode == ReportMode::All {
                results.push(result);
            }
        }

        debug_assert_eq!(completed, total);

        // Completion order depends on the network, sort for stable output
        results.sort_by_key(|r| r.line);

        sink.emit(ProgressEvent::new(
            100,
            format!("Checked {} link(s) - Broken: {}", total, broken),
            broken,
        ));

        let elapsed = started.elapsed();
        info!(checked = total, broken, ?elapsed, "link check completed");

        Ok(RunReport {
            results,
            checked: total,
            broken,
            elapsed,
        })
    }
}

pub fn clamp_workers(requested: usize) -> usize {
    requested.clamp(1, MAX_WORKERS)
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does buffer_unordered(n) do?
//    - It polls up to n futures from the stream at the same time
//    - A new one is pulled in only when one of the n finishes
//    - Results come out in the order they finish, not the input order
//
// 2. Why `biased;` in select!?
//    - Without it tokio picks a random ready branch
//    - With it the branches are checked top to bottom, so a cancel that
//      is already pending always wins over another completion
//
// 3. What happens to in-flight probes on cancel?
//    - Returning drops `completions`, which drops the unfinished futures
//    - Dropping a future in Rust cancels it; its request is abandoned
//
// 4. let-else:
//    - `let Some(result) = next else { break };` binds `result` or runs the
//      else block, which must leave the loop/function
// -----------------------------------------------------------------------------

// src/checker/progress.rs
// =============================================================================
// Progress reporting contract between the dispatcher and whoever shows it.
//
// The dispatcher calls `ProgressSink::emit` from its consuming loop. The
// sink must be cheap: it runs inline, so a slow sink slows the whole run.
// `ChannelProgressSink` hands events to another task through an unbounded
// channel, which never blocks.
// =============================================================================

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// A snapshot of how far a run has got.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// 0 to 100, never decreases within a run
    pub percent: u8,
    pub message: String,
    /// Broken links seen so far, never decreases within a run
    pub broken_so_far: usize,
}

impl ProgressEvent {
    pub fn new(percent: u8, message: impl Into<String>, broken_so_far: usize) -> Self {
        Self {
            percent,
            message: message.into(),
            broken_so_far,
        }
    }
}

pub trait ProgressSink: Send + Sync {
    fn emit(&self, event: ProgressEvent);
}

// Any plain closure works as a sink
impl<F> ProgressSink for F
where
    F: Fn(ProgressEvent) + Send + Sync,
{
    fn emit(&self, event: ProgressEvent) {
        self(event)
    }
}

/// Drops every event.
pub struct NoopProgress;

impl ProgressSink for NoopProgress {
    fn emit(&self, _event: ProgressEvent) {}
}

/// Forwards events to a receiver owned by the presentation layer.
pub struct ChannelProgressSink {
    tx: UnboundedSender<ProgressEvent>,
}

impl ChannelProgressSink {
    pub fn new() -> (Self, UnboundedReceiver<ProgressEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl ProgressSink for ChannelProgressSink {
    fn emit(&self, event: ProgressEvent) {
        // The receiver going away only means nobody is watching anymore
        let _ = self.tx.send(event);
    }
}

// floor(completed / total * 100), computed in integers
pub fn percent(completed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    ((completed.min(total) * 100) / total) as u8
}

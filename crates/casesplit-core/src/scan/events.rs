//! Outgoing scan events and the incoming cancellation flag.
//!
//! A running job talks to its host through exactly one [`EventSink`] and
//! one [`CancelFlag`]. Delivery is push-only with no acknowledgement.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};

/// Event emitted while a run progresses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ScanEvent {
    /// Continuous progress; `fraction` is in `[0, 1]`.
    Progress { fraction: f64, message: String },
    /// Milestone such as a saved chunk.
    Info { fraction: f64, message: String },
    /// Unrecoverable failure, or a non-fatal output problem.
    Error { message: String },
    /// Terminal: every page was assigned to a chunk.
    Complete { message: String },
    /// Terminal: the host asked the run to stop.
    Cancelled { message: String },
    /// Terminal: the remaining pages never resolved a boundary.
    NoBoundary { message: String },
}

impl ScanEvent {
    pub fn progress(fraction: f64, message: impl Into<String>) -> Self {
        Self::Progress {
            fraction,
            message: message.into(),
        }
    }

    pub fn info(fraction: f64, message: impl Into<String>) -> Self {
        Self::Info {
            fraction,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }

    /// Whether this event ends the run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete { .. } | Self::Cancelled { .. } | Self::NoBoundary { .. }
        )
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Progress { message, .. }
            | Self::Info { message, .. }
            | Self::Error { message }
            | Self::Complete { message }
            | Self::Cancelled { message }
            | Self::NoBoundary { message } => message,
        }
    }
}

/// Receiver of scan events.
pub trait EventSink {
    fn emit(&self, event: ScanEvent);
}

impl<T: EventSink + ?Sized> EventSink for &T {
    fn emit(&self, event: ScanEvent) {
        (**self).emit(event)
    }
}

// A dropped receiver only means nobody is listening any more.
impl EventSink for std::sync::mpsc::Sender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        let _ = self.send(event);
    }
}

impl EventSink for tokio::sync::mpsc::UnboundedSender<ScanEvent> {
    fn emit(&self, event: ScanEvent) {
        let _ = self.send(event);
    }
}

/// Adapts a closure into a sink.
pub struct FnSink<F>(pub F);

impl<F: Fn(ScanEvent)> EventSink for FnSink<F> {
    fn emit(&self, event: ScanEvent) {
        (self.0)(event)
    }
}

/// Discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn emit(&self, _event: ScanEvent) {}
}

/// Keeps every event in memory.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Mutex<Vec<ScanEvent>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the events received so far.
    pub fn events(&self) -> Vec<ScanEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: ScanEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

/// Cooperative cancellation flag shared between a job and its host.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask the run to stop at the next page boundary.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

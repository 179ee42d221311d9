//! Boundary scanning: carry state, the scanner state machine and the job
//! that drives a whole run.

mod carry;
mod events;
mod job;
mod scanner;

pub use carry::{CarryState, Resolved};
pub use events::{CancelFlag, EventLog, EventSink, FnSink, NoopSink, ScanEvent};
pub use job::{RunReport, SplitJob};
pub use scanner::{BoundaryScanner, ChunkScan, ScanOutcome, ScanReport};

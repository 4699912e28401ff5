//! Progress reporting and report aggregation.
//!
//! The scan engine talks to the outside world through [`ScanReporter`]:
//! the CLI plugs in a terminal progress bar, tests and library callers use
//! [`NullReporter`]. Every method has a no-op default.

pub mod summary;

pub use summary::{
    ErrorRecord, FileOutcome, MatchRecord, ReportAggregator, ScanReport, ScanStatus,
};

/// Receives scan lifecycle events.
///
/// All calls come from the thread that invoked [`crate::run_scan`], in order.
pub trait ScanReporter: Send + Sync {
    /// Work list is built; `total` files will be dispatched to `workers` workers.
    fn scan_started(&self, _total: usize, _workers: usize) {}

    /// One file finished. `completed` counts outcomes received so far.
    fn file_processed(&self, _outcome: &FileOutcome, _completed: usize, _total: usize) {}

    /// Cancellation was observed; no further files will be dispatched.
    fn scan_cancelled(&self) {}

    fn scan_finished(&self, _report: &ScanReport) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl ScanReporter for NullReporter {}

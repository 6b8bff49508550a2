//! The `TraceWriter` trait implemented by trace backends.

use crate::{OutputResult, TickSummaryRow, TraceRow};

/// Sink for per-tick unit traces.
///
/// All methods are infallible from the observer's perspective: errors are
/// stored internally and retrieved with
/// [`TraceObserver::take_error`][crate::TraceObserver::take_error].
pub trait TraceWriter {
    /// Write a batch of unit rows.
    fn write_traces(&mut self, rows: &[TraceRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

//! CSV trace backend.
//!
//! Creates two files in the configured output directory:
//! - `unit_traces.csv`
//! - `tick_summaries.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::trace::TraceWriter;
use crate::{OutputResult, TickSummaryRow, TraceRow};

pub const TRACE_HEADER: [&str; 9] =
    ["tick", "unit", "x", "y", "z", "orientation", "kind", "slot", "unit_state"];

pub const SUMMARY_HEADER: [&str; 3] = ["tick", "elapsed_ms", "units_ticked"];

/// Writes unit traces and tick summaries to two CSV files.
pub struct CsvTraceWriter {
    traces:    Writer<File>,
    summaries: Writer<File>,
    finished:  bool,
}

impl CsvTraceWriter {
    /// Open (or create) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut traces = Writer::from_path(dir.join("unit_traces.csv"))?;
        traces.write_record(TRACE_HEADER)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        Ok(Self { traces, summaries, finished: false })
    }
}

impl TraceWriter for CsvTraceWriter {
    fn write_traces(&mut self, rows: &[TraceRow]) -> OutputResult<()> {
        for row in rows {
            self.traces.write_record(&[
                row.tick.to_string(),
                row.unit.to_string(),
                format!("{:.3}", row.x),
                format!("{:.3}", row.y),
                format!("{:.3}", row.z),
                format!("{:.4}", row.orientation),
                row.kind.to_string(),
                row.slot.to_string(),
                row.unit_state.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            row.elapsed_ms.to_string(),
            row.units_ticked.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.traces.flush()?;
        self.summaries.flush()?;
        Ok(())
    }
}

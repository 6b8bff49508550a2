//! `mm-output`: trace writers for the motion-master workspace.
//!
//! The CSV backend creates two files:
//!
//! | File                  | One row per                                          |
//! |-----------------------|------------------------------------------------------|
//! | `unit_traces.csv`     | unit per snapshot: position, running kind and slot   |
//! | `tick_summaries.csv`  | tick: elapsed time and units ticked                  |
//!
//! Backends implement [`TraceWriter`] and are driven by [`TraceObserver`],
//! which implements `mm_sim::SimObserver`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use mm_output::{CsvTraceWriter, TraceObserver};
//!
//! let writer = CsvTraceWriter::new(Path::new("./output"))?;
//! let mut obs = TraceObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! obs.take_error().map(|e| eprintln!("output error: {e}"));
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod trace;


pub use csv::CsvTraceWriter;
pub use error::{OutputError, OutputResult};
pub use observer::{trace_row, TraceObserver};
pub use row::{TickSummaryRow, TraceRow};
pub use trace::TraceWriter;

//! `TraceObserver<W>`: bridges `SimObserver` to a `TraceWriter`.

use mm_core::{SimConfig, Tick};
use mm_motion::{MotionMaster, MovementSlot};
use mm_sim::{SimObserver, UnitBody};

use crate::row::{TickSummaryRow, TraceRow};
use crate::trace::TraceWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that writes one trace row per in-world unit at every
/// snapshot and one summary row per tick.
///
/// Errors from the writer are stored internally because `SimObserver` methods
/// have no return value.  After `sim.run()` returns, check for errors with
/// [`take_error`][Self::take_error].
pub struct TraceObserver<W: TraceWriter> {
    writer:     W,
    tick_ms:    u32,
    last_error: Option<OutputError>,
}

impl<W: TraceWriter> TraceObserver<W> {
    /// Create an observer backed by `writer`, using `config` for the
    /// elapsed-time column.
    pub fn new(writer: W, config: &SimConfig) -> Self {
        Self { writer, tick_ms: config.tick_ms, last_error: None }
    }

    /// Take the stored write error (if any) after `sim.run()` returns.
    ///
    /// Returns `None` if all writes succeeded.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the sim).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            tracing::warn!(error = %e, "trace write failed");
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

/// Build the row for one unit.
pub fn trace_row(tick: Tick, body: &UnitBody, motion: &MotionMaster) -> TraceRow {
    let slot = match motion.current_slot() {
        Some(MovementSlot::Default) => "default",
        Some(MovementSlot::Active)  => "active",
        None                        => "",
    };
    TraceRow {
        tick:        tick.0,
        unit:        body.id.0,
        x:           body.position.x,
        y:           body.position.y,
        z:           body.position.z,
        orientation: body.position.orientation,
        kind:        motion.current_kind().map_or("", |k| k.as_str()),
        slot,
        unit_state:  body.unit_state.bits(),
    }
}

impl<W: TraceWriter> SimObserver for TraceObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, ticked: usize) {
        let row = TickSummaryRow {
            tick:         tick.0,
            elapsed_ms:   tick.0 * self.tick_ms as u64,
            units_ticked: ticked as u64,
        };
        let result = self.writer.write_tick_summary(&row);
        self.store_err(result);
    }

    fn on_snapshot(&mut self, tick: Tick, bodies: &[UnitBody], motion: &[MotionMaster]) {
        let rows: Vec<TraceRow> = bodies
            .iter()
            .zip(motion)
            .filter(|(body, _)| body.in_world)
            .map(|(body, motion)| trace_row(tick, body, motion))
            .collect();

        if !rows.is_empty() {
            let result = self.writer.write_traces(&rows);
            self.store_err(result);
        }
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}

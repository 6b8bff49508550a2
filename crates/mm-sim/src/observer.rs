//! Simulation observer trait for progress reporting and data collection.

use mm_core::Tick;
use mm_motion::MotionMaster;

use crate::UnitBody;

/// Callbacks invoked by [`Sim::run`][crate::Sim::run] at key points in the
/// tick loop.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: progress printer
///
/// ```rust,ignore
/// struct ProgressPrinter { interval: u64 }
///
/// impl SimObserver for ProgressPrinter {
///     fn on_tick_end(&mut self, tick: Tick, ticked: usize) {
///         if tick.0 % self.interval == 0 {
///             println!("tick {tick}: {ticked} units");
///         }
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called at the very start of each tick, before any processing.
    fn on_tick_start(&mut self, _tick: Tick) {}

    /// Called at the end of each tick with the number of in-world units
    /// whose scheduler was ticked.
    fn on_tick_end(&mut self, _tick: Tick, _ticked: usize) {}

    /// Called at snapshot intervals (every `config.output_interval_ticks`
    /// ticks).
    ///
    /// `bodies[i]` is driven by `motion[i]`; both are sorted by unit id and
    /// include despawned units (check `in_world`).
    fn on_snapshot(
        &mut self,
        _tick:   Tick,
        _bodies: &[UnitBody],
        _motion: &[MotionMaster],
    ) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`SimObserver`] that does nothing.  Use when you need to call `run` but
/// don't want progress callbacks.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}

//! arena: runnable demo for the motion-master workspace.
//!
//! Puts a handful of units in a small arena, drives them with a scripted
//! AI and writes per-tick traces to `output/arena`.
//!
//! ```text
//! cargo run -p arena                                           # built-in ambush
//! cargo run -p arena -- demos/arena/scenarios/sentries.json     # scenario file
//! RUST_LOG=mm_motion=debug cargo run -p arena                  # scheduler decisions
//! ```

mod scenario;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use mm_behavior::ScriptedAi;
use mm_core::Tick;
use mm_motion::{MotionMaster, MotionServices};
use mm_output::{CsvTraceWriter, TraceObserver, TraceWriter};
use mm_paths::{PathStore, TaxiPath};
use mm_sim::{SimBuilder, SimObserver, UnitBody};

use scenario::Scenario;

// ── Constants ─────────────────────────────────────────────────────────────────

const OUTPUT_DIR: &str = "output/arena";

// ── Observer wrapper to count rows ───────────────────────────────────────────

struct CountingObserver<W: TraceWriter> {
    inner:        TraceObserver<W>,
    trace_rows:   usize,
    summary_rows: usize,
}

impl<W: TraceWriter> CountingObserver<W> {
    fn new(inner: TraceObserver<W>) -> Self {
        Self { inner, trace_rows: 0, summary_rows: 0 }
    }
}

impl<W: TraceWriter> SimObserver for CountingObserver<W> {
    fn on_tick_end(&mut self, tick: Tick, ticked: usize) {
        self.summary_rows += 1;
        self.inner.on_tick_end(tick, ticked);
    }

    fn on_snapshot(&mut self, tick: Tick, bodies: &[UnitBody], motion: &[MotionMaster]) {
        self.trace_rows += bodies.iter().filter(|b| b.in_world).count();
        self.inner.on_snapshot(tick, bodies, motion);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .init();

    // 1. Scenario.
    let scenario = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => Scenario::load(&path)?,
        None => Scenario::ambush()?,
    };
    let config = scenario.config.clone();
    let known = scenario.unit_ids();

    println!("=== arena: motion master demo ===");
    println!(
        "Units: {}  |  Rules: {}  |  Ticks: {} × {} ms  |  Seed: {}",
        scenario.units.len(),
        scenario.rules.len(),
        config.total_ticks,
        config.tick_ms,
        config.seed,
    );
    println!();

    // 2. Path data and shared scheduler services.
    let paths = PathStore::from_paths(scenario.paths, Vec::<TaxiPath>::new());
    println!("Waypoint paths: {}", paths.waypoint_path_count());
    let services = Arc::new(MotionServices::new(scenario.motion, Arc::new(paths)));

    // 3. Scripted AI.
    let ai = ScriptedAi::from_rules(scenario.rules);
    ai.validate(&known)?;

    // 4. Build sim.
    let mut sim = SimBuilder::new(config.clone(), services, ai)
        .units(scenario.units)
        .build()?;

    // 5. Set up output.
    let writer = CsvTraceWriter::new(Path::new(OUTPUT_DIR))?;
    let mut obs = CountingObserver::new(TraceObserver::new(writer, &config));

    // 6. Run.
    let t0 = Instant::now();
    sim.run(&mut obs)?;
    let elapsed = t0.elapsed();

    if let Some(e) = obs.inner.take_error() {
        eprintln!("output error: {e}");
    }

    // 7. Summary.
    let stats = sim.stats;
    println!("Simulation complete in {:.3} s", elapsed.as_secs_f64());
    println!("  unit_traces.csv     : {} rows", obs.trace_rows);
    println!("  tick_summaries.csv  : {} rows", obs.summary_rows);
    println!(
        "  intents applied {}  |  informs {}  |  waypoints reached {}  |  generators finalized {}",
        stats.intents_applied, stats.informs, stats.waypoints_reached, stats.generators_finalized,
    );
    println!();

    // 8. Final unit table.
    println!(
        "{:<6} {:<14} {:<20} {:<8} {:>8} {:>8} {:>6}",
        "Unit", "Name", "Behavior", "Slot", "X", "Y", "Stack"
    );
    println!("{}", "-".repeat(76));
    for (body, motion) in sim.bodies.iter().zip(&sim.motion) {
        let slot = match motion.current_slot() {
            Some(slot) => format!("{slot:?}"),
            None => "-".to_owned(),
        };
        println!(
            "{:<6} {:<14} {:<20} {:<8} {:>8.2} {:>8.2} {:>6}",
            body.id.0,
            body.name,
            motion.current_kind().map_or("-", |k| k.as_str()),
            slot,
            body.position.x,
            body.position.y,
            motion.size(),
        );
    }

    Ok(())
}

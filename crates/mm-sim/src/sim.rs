//! The `Sim` struct and its tick loop.

use std::sync::Arc;

use mm_behavior::{AiContext, CreatureAi, MovementIntent};
use mm_core::{GeneratorId, MoveType, SimClock, SimConfig, Tick, UnitId, UnitRng, UnitState};
use mm_motion::{MotionMaster, MotionServices, MovementSlot};
use rustc_hash::FxHashMap;

use crate::{SimError, SimObserver, SimResult, UnitBody, UnitCtx, WorldSnapshot};

// ── Counters ──────────────────────────────────────────────────────────────────

/// Running totals over the whole run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SimStats {
    pub ticks:                u64,
    pub intents_applied:      u64,
    pub informs:              u64,
    pub waypoints_reached:    u64,
    pub generators_finalized: u64,
}

// ── Sim ───────────────────────────────────────────────────────────────────────

/// The main simulation runner.
///
/// `Sim<A>` holds every unit's body and scheduler and drives the two-phase
/// tick loop:
///
/// 1. **Snapshot**: capture every in-world unit into a [`WorldSnapshot`].
/// 2. **Think phase** (optionally parallel with the `parallel` feature):
///    call [`CreatureAi::think`] for each unit against the snapshot.
/// 3. **Apply phase** (sequential, ascending `UnitId` for determinism), per
///    unit:
///    - apply the unit's intents to its `MotionMaster`,
///    - advance its body along the running spline by one tick,
///    - tick its `MotionMaster`.
///
/// Create via [`SimBuilder`][crate::SimBuilder].
pub struct Sim<A: CreatureAi> {
    /// Global configuration (total ticks, seed, tick length, …).
    pub config: SimConfig,

    /// Tracks the current tick.
    pub clock: SimClock,

    /// Shared by every scheduler.
    pub services: Arc<MotionServices>,

    /// Unit bodies sorted by id.  `motion[i]` drives `bodies[i]`.
    pub bodies: Vec<UnitBody>,

    pub motion: Vec<MotionMaster>,

    /// Per-unit AI RNGs, separated for the split-borrow pattern.
    pub rngs: Vec<UnitRng>,

    /// The decision layer.  Called once per unit per tick.
    pub ai: A,

    /// Flat floor height handed to the schedulers; `None` for a void world.
    pub ground_z: Option<f32>,

    pub stats: SimStats,

    pub(crate) index: FxHashMap<UnitId, usize>,
}

impl<A: CreatureAi> Sim<A> {
    // ── Public API ────────────────────────────────────────────────────────

    /// Run the simulation from the current tick to `config.end_tick()`.
    ///
    /// Calls observer hooks at every tick boundary.  Use
    /// [`NoopObserver`][crate::NoopObserver] if you don't need callbacks.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick < self.config.end_tick() {
            self.step(observer)?;
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores `end_tick`).
    ///
    /// Useful for tests and incremental stepping.
    pub fn run_ticks<O: SimObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            self.step(observer)?;
        }
        Ok(())
    }

    fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        let ticked = self.process_tick(now)?;
        observer.on_tick_end(now, ticked);
        if self.config.output_interval_ticks > 0
            && now.0.is_multiple_of(self.config.output_interval_ticks)
        {
            observer.on_snapshot(now, &self.bodies, &self.motion);
        }
        self.clock.advance();
        Ok(())
    }

    // ── Unit access ───────────────────────────────────────────────────────

    fn slot(&self, unit: UnitId) -> SimResult<usize> {
        self.index.get(&unit).copied().ok_or(SimError::UnknownUnit(unit))
    }

    pub fn unit_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn body(&self, unit: UnitId) -> Option<&UnitBody> {
        self.index.get(&unit).map(|&i| &self.bodies[i])
    }

    pub fn motion_master(&self, unit: UnitId) -> Option<&MotionMaster> {
        self.index.get(&unit).map(|&i| &self.motion[i])
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot::capture(&self.bodies, &self.motion, self.ground_z)
    }

    /// Run `f` against one unit's scheduler outside the tick loop, with the
    /// current world as the unit's view.
    pub fn with_unit<R>(
        &mut self,
        unit: UnitId,
        f:    impl FnOnce(&mut MotionMaster, &mut UnitCtx<'_, A>) -> R,
    ) -> SimResult<R> {
        let i = self.slot(unit)?;
        let world = self.snapshot();
        let mut ctx = UnitCtx::new(&mut self.bodies[i], &world, &self.ai, &mut self.stats);
        Ok(f(&mut self.motion[i], &mut ctx))
    }

    /// Apply one intent immediately, as an external script would.
    pub fn request(&mut self, unit: UnitId, intent: MovementIntent) -> SimResult<Option<GeneratorId>> {
        self.with_unit(unit, |motion, ctx| intent.apply(motion, ctx))
    }

    /// Change a unit's speed and tell its running generator.
    pub fn set_speed(&mut self, unit: UnitId, move_type: MoveType, speed: f32) -> SimResult<()> {
        let i = self.slot(unit)?;
        self.bodies[i].set_speed(move_type, speed);
        self.motion[i].propagate_speed_change();
        Ok(())
    }

    /// Kill a unit: every generator is dropped and it stands idle.
    pub fn kill(&mut self, unit: UnitId) -> SimResult<()> {
        self.with_unit(unit, |motion, ctx| {
            ctx.body.alive = false;
            ctx.body.unit_state.insert(UnitState::DIED);
            motion.clear(ctx);
            motion.clear_slot(ctx, MovementSlot::Default);
            ctx.body.stop();
        })?;
        tracing::debug!(unit = %unit, "unit killed");
        Ok(())
    }

    /// Take a unit out of the world.  Its scheduler is torn down and it is
    /// skipped from then on.
    pub fn despawn(&mut self, unit: UnitId) -> SimResult<()> {
        self.with_unit(unit, |motion, ctx| {
            motion.remove_from_world(ctx);
            ctx.body.stop();
            ctx.body.in_world = false;
        })?;
        tracing::debug!(unit = %unit, "unit despawned");
        Ok(())
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<usize> {
        let tick_ms = self.config.tick_ms;

        // ── Phase 1: snapshot ─────────────────────────────────────────────
        let world = self.snapshot();

        // ── Phase 2: think (produce) ──────────────────────────────────────
        let intents = self.compute_intents(now, &world);

        // ── Phase 3: apply (consume) ──────────────────────────────────────
        //
        // Bodies are sorted by id, so sequential application in index order
        // is deterministic even when the think phase ran in parallel.
        let mut ticked = 0;
        for (i, unit_intents) in intents.into_iter().enumerate() {
            let body = &mut self.bodies[i];
            if !body.in_world {
                continue;
            }
            let motion = &mut self.motion[i];
            let mut ctx = UnitCtx::new(body, &world, &self.ai, &mut self.stats);

            ctx.apply_intents(motion, unit_intents);
            ctx.body.advance(tick_ms);
            motion.update(&mut ctx, tick_ms);
            ticked += 1;
        }

        self.stats.ticks += 1;
        Ok(ticked)
    }

    /// Think for every unit.  The result is indexed like `bodies`;
    /// despawned units get an empty list.
    ///
    /// With the `parallel` Cargo feature the calls run on Rayon's thread pool.
    fn compute_intents(&mut self, now: Tick, world: &WorldSnapshot) -> Vec<Vec<MovementIntent>> {
        // Explicit field borrows so the borrow checker sees disjoint access.
        let bodies = self.bodies.as_slice();
        let ai     = &self.ai;
        let rngs   = &mut self.rngs;

        let ctx = AiContext::new(now, self.config.tick_ms, &world.views);

        #[cfg(not(feature = "parallel"))]
        {
            bodies
                .iter()
                .zip(rngs.iter_mut())
                .map(|(body, rng)| {
                    if body.in_world { ai.think(body.id, &ctx, rng) } else { Vec::new() }
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            bodies
                .par_iter()
                .zip(rngs.par_iter_mut())
                .map(|(body, rng)| {
                    if body.in_world { ai.think(body.id, &ctx, rng) } else { Vec::new() }
                })
                .collect()
        }
    }
}

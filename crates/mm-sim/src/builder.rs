//! Fluent builder for constructing a [`Sim`].

use std::sync::Arc;

use mm_behavior::{CreatureAi, MovementIntent};
use mm_core::{SimConfig, UnitId, UnitRng};
use mm_motion::{MotionMaster, MotionServices};
use rustc_hash::FxHashMap;

use crate::{Sim, SimError, SimResult, SimStats, UnitBody, UnitCtx, UnitSpec, WorldSnapshot};

/// Stream discriminator separating AI RNGs from generator RNGs of the same
/// unit.
const AI_RNG_STREAM: u64 = u64::MAX;

/// Fluent builder for [`Sim<A>`].
///
/// # Required inputs
///
/// - [`SimConfig`]: total ticks, seed, tick length, …
/// - [`MotionServices`]: scheduler tunables, path store, default selector
/// - `A: CreatureAi`: the decision layer
///
/// # Optional inputs (have defaults)
///
/// | Method                 | Default           |
/// |------------------------|-------------------|
/// | `.unit(spec)`          | No units          |
/// | `.ground_z(z)`         | `Some(0.0)`       |
/// | `.initial_intent(..)`  | None              |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(config, services, NoopAi)
///     .unit(UnitSpec::creature(UnitId(1), "Wolf", Position::new(0.0, 0.0, 0.0)))
///     .build()?;
/// sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder<A: CreatureAi> {
    config:   SimConfig,
    services: Arc<MotionServices>,
    ai:       A,
    units:    Vec<UnitSpec>,
    ground_z: Option<f32>,
    initial:  Vec<(UnitId, MovementIntent)>,
}

impl<A: CreatureAi> SimBuilder<A> {
    /// Create a builder with all required inputs.
    pub fn new(config: SimConfig, services: Arc<MotionServices>, ai: A) -> Self {
        Self {
            config,
            services,
            ai,
            units:    Vec::new(),
            ground_z: Some(0.0),
            initial:  Vec::new(),
        }
    }

    pub fn unit(mut self, spec: UnitSpec) -> Self {
        self.units.push(spec);
        self
    }

    pub fn units(mut self, specs: impl IntoIterator<Item = UnitSpec>) -> Self {
        self.units.extend(specs);
        self
    }

    /// Flat floor height of the world; `None` makes every fall fail.
    pub fn ground_z(mut self, ground_z: Option<f32>) -> Self {
        self.ground_z = ground_z;
        self
    }

    /// A request issued before the unit enters the world.  It is queued by
    /// the unit's scheduler and replayed once the default is selected.
    pub fn initial_intent(mut self, unit: UnitId, intent: MovementIntent) -> Self {
        self.initial.push((unit, intent));
        self
    }

    /// Validate inputs, spawn every unit and return a ready-to-run [`Sim`].
    pub fn build(self) -> SimResult<Sim<A>> {
        if self.config.tick_ms == 0 {
            return Err(SimError::Config("tick_ms must be positive".into()));
        }

        // ── Validate and order units ──────────────────────────────────────
        let mut units = self.units;
        units.sort_by_key(|spec| spec.id);
        if let Some(dup) = units.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(SimError::DuplicateUnit(dup[0].id));
        }
        if let Some(spec) = units.iter().find(|spec| !spec.id.is_valid()) {
            return Err(SimError::Config(format!("unit `{}` has the invalid id", spec.name)));
        }

        let index: FxHashMap<UnitId, usize> =
            units.iter().enumerate().map(|(i, spec)| (spec.id, i)).collect();
        for (unit, _) in &self.initial {
            if !index.contains_key(unit) {
                return Err(SimError::UnknownUnit(*unit));
            }
        }

        #[cfg(feature = "parallel")]
        if let Some(threads) = self.config.num_threads {
            // The global pool can only be configured once per process.
            if let Err(err) = rayon::ThreadPoolBuilder::new().num_threads(threads).build_global() {
                tracing::debug!(threads, error = %err, "rayon pool already configured");
            }
        }

        // ── Build bodies, schedulers and AI RNGs ──────────────────────────
        let seed = self.config.seed;
        let rngs = units.iter().map(|spec| UnitRng::with_stream(seed, spec.id, AI_RNG_STREAM)).collect();
        let mut motion: Vec<MotionMaster> =
            units.iter().map(|spec| MotionMaster::new(spec.id, Arc::clone(&self.services))).collect();
        let mut bodies: Vec<UnitBody> = units.into_iter().map(UnitBody::from_spec).collect();

        // ── Spawn ─────────────────────────────────────────────────────────
        //
        // Initial intents are queued first, then every scheduler is added to
        // the world against the spawn snapshot.
        let world = WorldSnapshot::capture(&bodies, &motion, self.ground_z);
        let mut stats = SimStats::default();
        for (unit, intent) in self.initial {
            let i = index[&unit];
            let mut ctx = UnitCtx::new(&mut bodies[i], &world, &self.ai, &mut stats);
            ctx.apply_intents(&mut motion[i], vec![intent]);
        }
        for (body, master) in bodies.iter_mut().zip(motion.iter_mut()) {
            let mut ctx = UnitCtx::new(body, &world, &self.ai, &mut stats);
            master.add_to_world(&mut ctx);
        }
        tracing::debug!(units = bodies.len(), "simulation built");

        Ok(Sim {
            clock:    self.config.make_clock(),
            config:   self.config,
            services: self.services,
            bodies,
            motion,
            rngs,
            ai:       self.ai,
            ground_z: self.ground_z,
            stats,
            index,
        })
    }
}

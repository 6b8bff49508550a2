//! `MotionMaster`: per-unit scheduler of movement generators.
//!
//! # Storage
//!
//! * `default`: the single fallback generator (never empty once the
//!   scheduler has been added to the world).
//! * `active`: the active stack, kept sorted by [`comparator::compare`] so
//!   the front is the generator that runs.
//! * `base_states`: which active generators contribute each unit-state bit.
//!   A bit is set on the owner when its first contributor arrives and
//!   cleared when the last one leaves.
//! * `delayed`: FIFO of mutations requested while direct mutation was
//!   forbidden (before `add_to_world`, or from inside a tick).
//!
//! # Ticking
//!
//! `update` checks the top generator out of its slot, ticks it with the
//! scheduler itself available for reentrant requests, and puts it back (or
//! retires it if it concluded).  While it is checked out, a header copy of
//! it stays visible to the queries, so lookups issued from inside the tick
//! still find the running generator.  Every mutation issued during the tick
//! is queued and replayed in request order once the tick is over, and a
//! speed change is handed to the generator once it is back in its slot.

use std::collections::VecDeque;
use std::sync::Arc;

use mm_core::{GeneratorId, Position, UnitId, UnitRng, UnitState};
use rustc_hash::FxHashMap;

use crate::comparator;
use crate::delayed::{DelayedAction, DelayedActionKind, DelayedOp};
use crate::{
    Generator, GeneratorFlags, MotionConfig, MotionMasterFlags, MotionOwner, MotionServices,
    MovementKind, MovementMode, MovementPriority, MovementSlot,
};

/// Movement scheduler bound to one unit.
///
/// The owner is never stored: every mutating call takes it as
/// `&mut dyn MotionOwner`, and it must be the same unit each time.
pub struct MotionMaster {
    owner:       UnitId,
    services:    Arc<MotionServices>,
    default:     Option<Generator>,
    active:      Vec<Generator>,
    base_states: FxHashMap<UnitState, Vec<GeneratorId>>,
    delayed:     VecDeque<DelayedAction>,
    flags:       MotionMasterFlags,
    /// Slot and header copy of the generator checked out by `update`.
    ticking:     Option<(MovementSlot, Generator)>,
    /// Counter feeding independent RNG streams to randomized generators.
    rng_streams: u64,
}

impl MotionMaster {
    /// A scheduler awaiting [`add_to_world`][Self::add_to_world].  Requests
    /// made before then are queued.
    pub fn new(owner: UnitId, services: Arc<MotionServices>) -> Self {
        Self {
            owner,
            services,
            default:     None,
            active:      Vec::new(),
            base_states: FxHashMap::default(),
            delayed:     VecDeque::new(),
            flags:       MotionMasterFlags::INITIALIZATION_PENDING,
            ticking:     None,
            rng_streams: 0,
        }
    }

    #[inline]
    pub fn owner_id(&self) -> UnitId {
        self.owner
    }

    #[inline]
    pub fn services(&self) -> &Arc<MotionServices> {
        &self.services
    }

    #[inline]
    pub fn config(&self) -> &MotionConfig {
        &self.services.config
    }

    #[inline]
    pub fn flags(&self) -> MotionMasterFlags {
        self.flags
    }

    #[inline]
    fn has_flag(&self, flag: MotionMasterFlags) -> bool {
        self.flags.intersects(flag)
    }

    /// A fresh RNG stream for one randomized generator.
    pub(crate) fn next_rng(&mut self) -> UnitRng {
        self.rng_streams += 1;
        UnitRng::with_stream(self.services.config.seed, self.owner, self.rng_streams)
    }

    // ── Lifecycle ─────────────────────────────────────────────────────────

    /// First initialization, once the owner is in the world.  Selects the
    /// default generator, then replays everything queued so far.  Later
    /// calls are no-ops.
    pub fn add_to_world(&mut self, owner: &mut dyn MotionOwner) {
        if !self.has_flag(MotionMasterFlags::INITIALIZATION_PENDING) {
            return;
        }
        tracing::debug!(unit = %self.owner, queued = self.delayed.len(), "motion master added to world");

        self.flags.insert(MotionMasterFlags::INITIALIZING);
        self.flags.remove(MotionMasterFlags::INITIALIZATION_PENDING);

        self.direct_initialize(owner);
        self.resolve_delayed_actions(owner);

        self.flags.remove(MotionMasterFlags::INITIALIZING);
    }

    /// Drop every generator and re-select the default.
    ///
    /// No-op before [`add_to_world`][Self::add_to_world] (which initializes
    /// anyway); queued when called from inside a tick.
    pub fn initialize(&mut self, owner: &mut dyn MotionOwner) {
        if self.has_flag(MotionMasterFlags::INITIALIZATION_PENDING) {
            return;
        }
        if self.has_flag(MotionMasterFlags::UPDATE) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::Initialize));
            return;
        }
        self.direct_initialize(owner);
    }

    /// Tear down: finalize the active stack front to back, then the default,
    /// without informs.  Queued actions are dropped and the scheduler
    /// returns to its uninitialized state.
    ///
    /// Refused (logged) from inside a tick.
    pub fn remove_from_world(&mut self, owner: &mut dyn MotionOwner) {
        if self.has_flag(MotionMasterFlags::UPDATE) {
            tracing::error!(unit = %self.owner, "remove_from_world called during update, ignored");
            return;
        }
        tracing::debug!(unit = %self.owner, generators = self.size(), "motion master removed from world");

        // Anything requested by the finalizers below is queued, then dropped.
        self.flags = MotionMasterFlags::INITIALIZATION_PENDING;

        let stack = std::mem::take(&mut self.active);
        let stack_was_empty = stack.is_empty();
        for (i, generator) in stack.into_iter().enumerate() {
            self.delete(owner, generator, i == 0, false);
        }
        if let Some(default) = self.default.take() {
            self.delete(owner, default, stack_was_empty, false);
        }

        self.clear_base_states(owner);
        self.delayed.clear();
        self.ticking = None;
    }

    /// Tick the top generator by `diff` milliseconds, retire it if it
    /// concluded, then replay queued mutations.
    ///
    /// No-op until the scheduler has been added to the world.
    pub fn update(&mut self, owner: &mut dyn MotionOwner, diff: u32) {
        if self.has_flag(MotionMasterFlags::INITIALIZATION_PENDING | MotionMasterFlags::INITIALIZING) {
            return;
        }
        if self.has_flag(MotionMasterFlags::UPDATE) {
            tracing::error!(unit = %self.owner, "reentrant update ignored");
            return;
        }

        self.flags.insert(MotionMasterFlags::UPDATE);

        let Some((slot, mut top)) = self.take_top() else {
            debug_assert!(false, "update on an empty motion master ({})", self.owner);
            tracing::error!(unit = %self.owner, "update on an empty motion master");
            self.flags.remove(MotionMasterFlags::UPDATE);
            return;
        };
        self.ticking = Some((slot, top.checked_out_copy()));

        if self.has_flag(MotionMasterFlags::STATIC_INITIALIZATION_PENDING) && top.is_static() {
            self.flags.remove(MotionMasterFlags::STATIC_INITIALIZATION_PENDING);
            top.initialize(owner, self);
        }
        if top.has_flag(GeneratorFlags::INITIALIZATION_PENDING) {
            top.initialize(owner, self);
        }
        if top.has_flag(GeneratorFlags::DEACTIVATED) {
            top.reset(owner, self);
        }
        debug_assert!(
            !top.has_flag(GeneratorFlags::INITIALIZATION_PENDING | GeneratorFlags::DEACTIVATED),
            "top generator {} ({}) not ready: {:?}",
            top.id(),
            top.kind(),
            top.flags(),
        );

        self.ticking = Some((slot, top.checked_out_copy()));

        let running = top.update(owner, self, diff);
        self.ticking = None;
        if running {
            self.restore_top(slot, top);
        } else {
            self.retire_top(owner, slot, top);
        }

        if self.has_flag(MotionMasterFlags::SPEED_CHANGE_PENDING) {
            self.flags.remove(MotionMasterFlags::SPEED_CHANGE_PENDING);
            self.propagate_speed_change();
        }
        self.flags.remove(MotionMasterFlags::UPDATE);
        self.resolve_delayed_actions(owner);
    }

    fn take_top(&mut self) -> Option<(MovementSlot, Generator)> {
        if !self.active.is_empty() {
            return Some((MovementSlot::Active, self.active.remove(0)));
        }
        self.default.take().map(|g| (MovementSlot::Default, g))
    }

    fn restore_top(&mut self, slot: MovementSlot, generator: Generator) {
        match slot {
            MovementSlot::Active  => self.active.insert(0, generator),
            MovementSlot::Default => self.default = Some(generator),
        }
    }

    /// Natural conclusion: the only path that informs.  A concluded default
    /// falls back to the static idle.
    fn retire_top(&mut self, owner: &mut dyn MotionOwner, slot: MovementSlot, generator: Generator) {
        tracing::debug!(unit = %self.owner, kind = %generator.kind(), id = %generator.id(), "movement concluded");
        if slot == MovementSlot::Default {
            self.default = Some(Generator::idle());
            self.flags.insert(MotionMasterFlags::STATIC_INITIALIZATION_PENDING);
        }
        self.delete(owner, generator, true, true);
    }

    // ── Mutations ─────────────────────────────────────────────────────────

    /// Add `generator` to `slot`, or queue the addition while mutation is
    /// delayed.
    pub fn add(&mut self, owner: &mut dyn MotionOwner, generator: Generator, slot: MovementSlot) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::Add(generator, slot)));
            return;
        }
        self.direct_add(owner, generator, slot);
    }

    /// Remove the generator with `id` from `slot`.  Informs are never sent.
    pub fn remove(&mut self, owner: &mut dyn MotionOwner, id: GeneratorId, slot: MovementSlot) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::guarded(
                DelayedOp::Remove(id, slot),
                Box::new(move |motion: &MotionMaster| motion.contains(id)),
            ));
            return;
        }
        if self.is_empty() {
            return;
        }

        match slot {
            MovementSlot::Default => {
                if self.default.as_ref().is_some_and(|g| g.id() == id) {
                    self.direct_clear_default(owner);
                }
            }
            MovementSlot::Active => {
                if let Some(index) = self.active.iter().position(|g| g.id() == id) {
                    let generator = self.active.remove(index);
                    self.delete(owner, generator, index == 0, false);
                }
            }
        }
    }

    /// Remove the first generator of `kind` from `slot`.
    pub fn remove_kind(&mut self, owner: &mut dyn MotionOwner, kind: MovementKind, slot: MovementSlot) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::RemoveKind(kind, slot)));
            return;
        }
        if self.is_empty() {
            return;
        }

        match slot {
            MovementSlot::Default => {
                if self.default.as_ref().is_some_and(|g| g.kind() == kind) {
                    self.direct_clear_default(owner);
                }
            }
            MovementSlot::Active => {
                if let Some(index) = self.active.iter().position(|g| g.kind() == kind) {
                    let generator = self.active.remove(index);
                    self.delete(owner, generator, index == 0, false);
                }
            }
        }
    }

    /// Empty the active stack.
    pub fn clear(&mut self, owner: &mut dyn MotionOwner) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::Clear));
            return;
        }
        if !self.is_empty() {
            self.direct_clear(owner);
        }
    }

    /// Empty one slot.  Clearing the default slot leaves the static idle.
    pub fn clear_slot(&mut self, owner: &mut dyn MotionOwner, slot: MovementSlot) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::ClearSlot(slot)));
            return;
        }
        if self.is_empty() {
            return;
        }
        match slot {
            MovementSlot::Default => self.direct_clear_default(owner),
            MovementSlot::Active  => self.direct_clear(owner),
        }
    }

    /// Remove every active generator in `mode`.
    pub fn clear_mode(&mut self, owner: &mut dyn MotionOwner, mode: MovementMode) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::ClearMode(mode)));
            return;
        }
        if !self.is_empty() {
            self.direct_clear_where(owner, |g| g.mode() == mode);
        }
    }

    /// Remove every active generator with `priority`.
    pub fn clear_priority(&mut self, owner: &mut dyn MotionOwner, priority: MovementPriority) {
        if self.has_flag(MotionMasterFlags::DELAYED) {
            self.delayed.push_back(DelayedAction::new(DelayedOp::ClearPriority(priority)));
            return;
        }
        if !self.is_empty() {
            self.direct_clear_where(owner, |g| g.priority() == priority);
        }
    }

    /// Tell the current generator the owner's speed changed.
    ///
    /// From inside a tick the change is held until the ticked generator is
    /// back in its slot (or has been replaced by the next one).
    pub fn propagate_speed_change(&mut self) {
        if self.ticking.is_some() {
            self.flags.insert(MotionMasterFlags::SPEED_CHANGE_PENDING);
            return;
        }
        let current = if self.active.is_empty() { self.default.as_mut() } else { self.active.first_mut() };
        if let Some(generator) = current {
            generator.unit_speed_changed();
        }
    }

    // ── Direct operations ─────────────────────────────────────────────────

    fn direct_initialize(&mut self, owner: &mut dyn MotionOwner) {
        self.direct_clear_default(owner);
        self.direct_clear(owner);
        self.initialize_default(owner);
    }

    fn initialize_default(&mut self, owner: &mut dyn MotionOwner) {
        let services = Arc::clone(&self.services);
        let movement = services.selector.select(&*owner, &services.paths);
        let generator = match self.build_default(&*owner, movement) {
            Ok(generator) => generator,
            Err(err) => {
                tracing::warn!(unit = %self.owner, error = %err, "default movement unavailable, idling");
                Generator::idle()
            }
        };
        self.add(owner, generator, MovementSlot::Default);
    }

    /// Finalize the whole active stack (front first, informs off) and clear
    /// every contributed state bit.
    fn direct_clear(&mut self, owner: &mut dyn MotionOwner) {
        let stack = std::mem::take(&mut self.active);
        for (i, generator) in stack.into_iter().enumerate() {
            self.delete(owner, generator, i == 0, false);
        }
        self.clear_base_states(owner);
    }

    /// Replace the default with the static idle.
    fn direct_clear_default(&mut self, owner: &mut dyn MotionOwner) {
        let Some(previous) = self.default.replace(Generator::idle()) else {
            self.default = None;
            return;
        };
        self.flags.insert(MotionMasterFlags::STATIC_INITIALIZATION_PENDING);
        let active = self.active.is_empty();
        self.delete(owner, previous, active, false);
    }

    fn direct_clear_where(&mut self, owner: &mut dyn MotionOwner, pred: impl Fn(&Generator) -> bool) {
        let Some(top) = self.active.first().map(Generator::id) else {
            return;
        };
        let (removed, kept): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.active).into_iter().partition(|g| pred(g));
        self.active = kept;
        for generator in removed {
            let was_top = generator.id() == top;
            self.delete(owner, generator, was_top, false);
        }
    }

    fn direct_add(&mut self, owner: &mut dyn MotionOwner, generator: Generator, slot: MovementSlot) {
        tracing::debug!(
            unit = %self.owner,
            kind = %generator.kind(),
            id = %generator.id(),
            %slot,
            "adding movement generator",
        );
        match slot {
            MovementSlot::Default => {
                if generator.is_static() {
                    self.flags.insert(MotionMasterFlags::STATIC_INITIALIZATION_PENDING);
                }
                if let Some(previous) = self.default.replace(generator) {
                    let active = self.active.is_empty();
                    self.delete(owner, previous, active, false);
                }
            }
            MovementSlot::Active => {
                let key = generator.sort_key();
                match self.active.first().map(Generator::sort_key) {
                    Some(top_key) if key == top_key => {
                        let previous = self.active.remove(0);
                        self.delete(owner, previous, true, false);
                    }
                    Some(top_key) if key > top_key => {
                        self.active[0].deactivate(owner);
                    }
                    Some(_) => {
                        if let Some(index) = self.active.iter().position(|g| g.sort_key() == key) {
                            let previous = self.active.remove(index);
                            self.delete(owner, previous, false, false);
                        }
                    }
                    None => {
                        if let Some(default) = self.default.as_mut() {
                            default.deactivate(owner);
                        }
                    }
                }

                self.add_base_state(owner, &generator);
                let index = comparator::insertion_index(&self.active, &generator);
                self.active.insert(index, generator);
            }
        }
    }

    /// Finalize a generator already detached from its slot and release its
    /// contributed state.
    fn delete(
        &mut self,
        owner:           &mut dyn MotionOwner,
        mut generator:   Generator,
        active:          bool,
        movement_inform: bool,
    ) {
        generator.finalize(owner, self, active, movement_inform);
        self.clear_base_state(owner, &generator);
    }

    fn resolve_delayed_actions(&mut self, owner: &mut dyn MotionOwner) {
        while let Some(action) = self.delayed.pop_front() {
            action.resolve(self, owner);
        }
    }

    // ── Contributed state ─────────────────────────────────────────────────

    fn add_base_state(&mut self, owner: &mut dyn MotionOwner, generator: &Generator) {
        let state = generator.base_state();
        if state.is_empty() {
            return;
        }
        for bit in state.single_bits() {
            self.base_states.entry(bit).or_default().push(generator.id());
        }
        owner.add_unit_state(state);
    }

    fn clear_base_state(&mut self, owner: &mut dyn MotionOwner, generator: &Generator) {
        let id = generator.id();
        for bit in generator.base_state().single_bits() {
            let Some(contributors) = self.base_states.get_mut(&bit) else {
                continue;
            };
            let before = contributors.len();
            contributors.retain(|&g| g != id);
            if contributors.len() != before && contributors.is_empty() {
                self.base_states.remove(&bit);
                owner.clear_unit_state(bit);
            }
        }
    }

    fn clear_base_states(&mut self, owner: &mut dyn MotionOwner) {
        let all = self.base_states.keys().fold(UnitState::empty(), |acc, &bit| acc | bit);
        if !all.is_empty() {
            owner.clear_unit_state(all);
        }
        self.base_states.clear();
    }

    /// Unit-state bits currently contributed by active generators.
    pub fn contributed_state(&self) -> UnitState {
        self.base_states.keys().fold(UnitState::empty(), |acc, &bit| acc | bit)
    }

    // ── Queries ───────────────────────────────────────────────────────────

    /// `true` if no generator is present (only before initialization).
    pub fn is_empty(&self) -> bool {
        self.default.is_none() && self.active.is_empty() && self.ticking.is_none()
    }

    /// Number of generators, default included.
    pub fn size(&self) -> usize {
        usize::from(self.default.is_some()) + self.active.len() + usize::from(self.ticking.is_some())
    }

    pub fn current_slot(&self) -> Option<MovementSlot> {
        if let Some((slot, _)) = &self.ticking {
            return Some(*slot);
        }
        if !self.active.is_empty() {
            Some(MovementSlot::Active)
        } else if self.default.is_some() {
            Some(MovementSlot::Default)
        } else {
            None
        }
    }

    /// Kind of the generator driving the unit.
    pub fn current_kind(&self) -> Option<MovementKind> {
        self.current_generator().map(Generator::kind)
    }

    pub fn current_kind_in(&self, slot: MovementSlot) -> Option<MovementKind> {
        self.current_generator_in(slot).map(Generator::kind)
    }

    /// The generator driving the unit.
    ///
    /// From inside a tick this is the header copy of the ticked generator
    /// (see [`Generator::is_checked_out`]).
    pub fn current_generator(&self) -> Option<&Generator> {
        if let Some((_, generator)) = &self.ticking {
            return Some(generator);
        }
        self.active.first().or(self.default.as_ref())
    }

    pub fn current_generator_in(&self, slot: MovementSlot) -> Option<&Generator> {
        match slot {
            MovementSlot::Default => self.checked_out_in(slot).or(self.default.as_ref()),
            MovementSlot::Active  => self.checked_out_in(slot).or(self.active.first()),
        }
    }

    fn checked_out_in(&self, slot: MovementSlot) -> Option<&Generator> {
        self.ticking.as_ref().filter(|(ticking, _)| *ticking == slot).map(|(_, generator)| generator)
    }

    pub fn generator(&self, id: GeneratorId) -> Option<&Generator> {
        self.generators().find(|g| g.id() == id)
    }

    /// `true` if a generator with `id` is stored in either slot.
    pub fn contains(&self, id: GeneratorId) -> bool {
        self.generator(id).is_some()
    }

    /// First generator in `slot` matching `pred`, front of the stack first.
    ///
    /// A generator being ticked is tested through its header copy, which
    /// answers everything but [`Generator::motion`].
    pub fn movement_generator(
        &self,
        pred: impl Fn(&Generator) -> bool,
        slot: MovementSlot,
    ) -> Option<&Generator> {
        match slot {
            MovementSlot::Default => self.current_generator_in(slot).filter(|g| pred(g)),
            MovementSlot::Active  => self.slot_iter(slot).find(|g| pred(g)),
        }
    }

    pub fn has_movement_generator(&self, pred: impl Fn(&Generator) -> bool, slot: MovementSlot) -> bool {
        self.movement_generator(pred, slot).is_some()
    }

    /// The stored active stack, front first.  It does not hold a generator
    /// checked out for a tick.
    #[inline]
    pub fn active_stack(&self) -> &[Generator] {
        &self.active
    }

    /// Default first, then the active stack front to back.
    pub fn generators(&self) -> impl Iterator<Item = &Generator> {
        self.slot_iter(MovementSlot::Default).chain(self.slot_iter(MovementSlot::Active))
    }

    fn slot_iter(&self, slot: MovementSlot) -> impl Iterator<Item = &Generator> {
        let stored = match slot {
            MovementSlot::Default => self.default.as_ref().map_or(&[][..], std::slice::from_ref),
            MovementSlot::Active  => self.active.as_slice(),
        };
        self.checked_out_in(slot).into_iter().chain(stored)
    }

    /// Slot and kind of the generator being ticked, if called from inside a
    /// tick.
    #[inline]
    pub fn ticking(&self) -> Option<(MovementSlot, MovementKind)> {
        self.ticking.as_ref().map(|(slot, generator)| (*slot, generator.kind()))
    }

    pub fn pending_actions(&self) -> usize {
        self.delayed.len()
    }

    pub fn pending_action_kinds(&self) -> Vec<DelayedActionKind> {
        self.delayed.iter().map(DelayedAction::kind).collect()
    }

    /// Final point of the owner's running spline.
    pub fn destination(&self, owner: &dyn MotionOwner) -> Option<Position> {
        if owner.spline_finalized() {
            return None;
        }
        owner.spline_destination()
    }
}

impl std::fmt::Debug for MotionMaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionMaster")
            .field("owner", &self.owner)
            .field("flags", &self.flags)
            .field("default", &self.default.as_ref().map(Generator::kind))
            .field("active", &self.active.iter().map(Generator::kind).collect::<Vec<_>>())
            .field("delayed", &self.delayed.len())
            .finish()
    }
}

//! Movement generators: one runnable strategy each.
//!
//! A [`Generator`] is the scheduler-facing header (identity, ordering key,
//! contributed unit state, lifecycle flags) around a [`Motion`], the closed
//! sum of strategy structs.  The header applies the lifecycle bookkeeping
//! common to every strategy; strategies only implement their own movement.
//!
//! # Lifecycle
//!
//! ```text
//! created ─► pending init ─► initialized ⇄ deactivated
//!                                 │
//!                                 ▼
//!                             finalized
//! ```
//!
//! Initialization is lazy: a generator is initialized the first time it is
//! ticked as top.  Finalize runs exactly once, whatever the removal path.

mod chase;
mod checked_out;
mod confused;
mod distract;
mod effect;
mod fleeing;
mod flight;
mod follow;
mod home;
mod idle;
mod point;
mod random;
mod rotate;
mod waypoint;

pub use chase::ChaseMovement;
pub use checked_out::CheckedOutMovement;
pub use confused::ConfusedMovement;
pub use distract::DistractMovement;
pub use effect::EffectMovement;
pub use fleeing::FleeingMovement;
pub use flight::FlightMovement;
pub use follow::FollowMovement;
pub use home::HomeMovement;
pub use idle::{IdleMovement, IDLE_MOVEMENT};
pub use point::PointMovement;
pub use random::RandomMovement;
pub use rotate::RotateMovement;
pub use waypoint::WaypointMovement;

use mm_core::{GeneratorId, UnitId, UnitState};

use crate::{
    GeneratorFlags, MotionMaster, MotionOwner, MovementKind, MovementMode, MovementPriority,
};

// ── Strategy contract ─────────────────────────────────────────────────────────

/// Everything a strategy may touch while it runs.
///
/// `motion` is the scheduler that owns the generator.  The generator is
/// checked out of it for the duration of the call, so requests issued
/// through `motion` never alias the running strategy.
pub struct MotionContext<'a> {
    pub owner:  &'a mut dyn MotionOwner,
    pub motion: &'a mut MotionMaster,
    pub flags:  &'a mut GeneratorFlags,
}

/// Behavior of one movement strategy.
///
/// Flag bookkeeping (`INITIALIZED`, `DEACTIVATED`, `FINALIZED`,
/// `INFORM_ENABLED`) is done by [`Generator`]; implementations only handle
/// the transitory flags they care about.
pub trait MovementStrategy {
    fn kind(&self) -> MovementKind;

    /// Start moving.  Called once, right before the first update.
    fn initialize(&mut self, cx: &mut MotionContext<'_>);

    /// Resume after being displaced by a higher-ranked generator.
    fn reset(&mut self, cx: &mut MotionContext<'_>) {
        self.initialize(cx);
    }

    /// Advance by `diff` milliseconds.  Returns `false` once the movement has
    /// concluded on its own.
    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool;

    /// Stop driving the unit without finalizing; `reset` follows if the
    /// generator becomes top again.
    fn deactivate(&mut self, _owner: &mut dyn MotionOwner) {}

    /// Release whatever the strategy set on the owner.  `active` is `true`
    /// when the generator was driving the unit.
    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, movement_inform: bool);

    fn unit_speed_changed(&mut self, _flags: &mut GeneratorFlags) {}

    /// Unit this strategy moves relative to.
    fn target(&self) -> Option<UnitId> {
        None
    }

    /// Id reported through `movement_inform` on natural completion.  `None`
    /// means the strategy never informs.
    fn inform_id(&self) -> Option<u32> {
        None
    }
}

// ── Motion ────────────────────────────────────────────────────────────────────

/// Closed set of strategies.
#[derive(Debug)]
pub enum Motion {
    /// The shared static idle strategy.
    Idle,
    Random(RandomMovement),
    Waypoint(WaypointMovement),
    Confused(ConfusedMovement),
    Chase(ChaseMovement),
    Follow(FollowMovement),
    Home(HomeMovement),
    Flight(FlightMovement),
    Point(PointMovement),
    Fleeing(FleeingMovement),
    Distract(DistractMovement),
    Rotate(RotateMovement),
    Effect(EffectMovement),
    /// Header copy of the generator `update` is ticking.
    CheckedOut(CheckedOutMovement),
}

/// Run `$call` against the strategy inside `$motion`, bound as `$m`.
macro_rules! dispatch {
    ($motion:expr, $m:ident => $call:expr) => {
        match $motion {
            Motion::Idle => {
                let $m = &IDLE_MOVEMENT;
                $call
            }
            Motion::Random($m)   => $call,
            Motion::Waypoint($m) => $call,
            Motion::Confused($m) => $call,
            Motion::Chase($m)    => $call,
            Motion::Follow($m)   => $call,
            Motion::Home($m)     => $call,
            Motion::Flight($m)   => $call,
            Motion::Point($m)    => $call,
            Motion::Fleeing($m)  => $call,
            Motion::Distract($m) => $call,
            Motion::Rotate($m)   => $call,
            Motion::Effect($m)   => $call,
            Motion::CheckedOut($m) => $call,
        }
    };
}

macro_rules! motion_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Motion {
                #[inline]
                fn from(strategy: $ty) -> Self {
                    Motion::$variant(strategy)
                }
            }
        )*
    };
}

motion_from! {
    Random(RandomMovement),
    Waypoint(WaypointMovement),
    Confused(ConfusedMovement),
    Chase(ChaseMovement),
    Follow(FollowMovement),
    Home(HomeMovement),
    Flight(FlightMovement),
    Point(PointMovement),
    Fleeing(FleeingMovement),
    Distract(DistractMovement),
    Rotate(RotateMovement),
    Effect(EffectMovement),
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// Sort key of an active generator: mode first, then priority.
pub type SortKey = (MovementMode, MovementPriority);

/// Scheduler-facing header around one strategy.
#[derive(Debug)]
pub struct Generator {
    id:         GeneratorId,
    mode:       MovementMode,
    priority:   MovementPriority,
    base_state: UnitState,
    flags:      GeneratorFlags,
    motion:     Motion,
}

impl Generator {
    /// A new generator awaiting initialization, `Default` mode, `Normal`
    /// priority, no contributed state.
    pub fn new(motion: impl Into<Motion>) -> Self {
        Self::with_id(GeneratorId::next(), motion)
    }

    /// Like [`new`][Self::new] with a pre-allocated id.
    pub fn with_id(id: GeneratorId, motion: impl Into<Motion>) -> Self {
        Self {
            id,
            mode:       MovementMode::Default,
            priority:   MovementPriority::Normal,
            base_state: UnitState::empty(),
            flags:      GeneratorFlags::INITIALIZATION_PENDING,
            motion:     motion.into(),
        }
    }

    /// A fresh header on the static idle strategy.
    ///
    /// It is initialized by the scheduler's static-initialization path rather
    /// than the pending-initialization one.
    pub fn idle() -> Self {
        Self {
            id:         GeneratorId::next(),
            mode:       MovementMode::Default,
            priority:   MovementPriority::Normal,
            base_state: UnitState::empty(),
            flags:      GeneratorFlags::empty(),
            motion:     Motion::Idle,
        }
    }

    pub fn with_mode(mut self, mode: MovementMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_priority(mut self, priority: MovementPriority) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_base_state(mut self, state: UnitState) -> Self {
        self.base_state = state;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn id(&self) -> GeneratorId {
        self.id
    }

    #[inline]
    pub fn kind(&self) -> MovementKind {
        dispatch!(&self.motion, m => m.kind())
    }

    #[inline]
    pub fn mode(&self) -> MovementMode {
        self.mode
    }

    #[inline]
    pub fn priority(&self) -> MovementPriority {
        self.priority
    }

    #[inline]
    pub fn sort_key(&self) -> SortKey {
        (self.mode, self.priority)
    }

    /// Unit state bits contributed while the generator is in the active
    /// stack.
    #[inline]
    pub fn base_state(&self) -> UnitState {
        self.base_state
    }

    #[inline]
    pub fn flags(&self) -> GeneratorFlags {
        self.flags
    }

    #[inline]
    pub fn has_flag(&self, flag: GeneratorFlags) -> bool {
        self.flags.intersects(flag)
    }

    /// `true` for headers on the shared static idle strategy.
    #[inline]
    pub fn is_static(&self) -> bool {
        match &self.motion {
            Motion::Idle => true,
            Motion::CheckedOut(m) => m.is_static(),
            _ => false,
        }
    }

    /// `true` for the copy standing in for the generator being ticked.
    #[inline]
    pub fn is_checked_out(&self) -> bool {
        matches!(self.motion, Motion::CheckedOut(_))
    }

    pub fn target(&self) -> Option<UnitId> {
        dispatch!(&self.motion, m => m.target())
    }

    pub fn inform_id(&self) -> Option<u32> {
        dispatch!(&self.motion, m => m.inform_id())
    }

    #[inline]
    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    /// Copy of the header, same id, whose strategy only answers queries.
    pub(crate) fn checked_out_copy(&self) -> Generator {
        Self {
            id:         self.id,
            mode:       self.mode,
            priority:   self.priority,
            base_state: self.base_state,
            flags:      self.flags,
            motion:     Motion::CheckedOut(CheckedOutMovement::new(
                self.kind(),
                self.target(),
                self.inform_id(),
                self.is_static(),
            )),
        }
    }

    // ── Lifecycle (driven by MotionMaster) ────────────────────────────────

    pub(crate) fn initialize(&mut self, owner: &mut dyn MotionOwner, motion: &mut MotionMaster) {
        if self.guard_finalized("initialize") || self.flags.contains(GeneratorFlags::INITIALIZED) {
            return;
        }
        self.flags.remove(
            GeneratorFlags::INITIALIZATION_PENDING
                | GeneratorFlags::TRANSITORY
                | GeneratorFlags::DEACTIVATED,
        );
        self.flags.insert(GeneratorFlags::INITIALIZED);
        let mut cx = MotionContext { owner, motion, flags: &mut self.flags };
        dispatch!(&mut self.motion, m => m.initialize(&mut cx));
    }

    pub(crate) fn reset(&mut self, owner: &mut dyn MotionOwner, motion: &mut MotionMaster) {
        if self.guard_finalized("reset") {
            return;
        }
        self.flags.remove(GeneratorFlags::TRANSITORY | GeneratorFlags::DEACTIVATED);
        let mut cx = MotionContext { owner, motion, flags: &mut self.flags };
        dispatch!(&mut self.motion, m => m.reset(&mut cx));
    }

    pub(crate) fn update(
        &mut self,
        owner:  &mut dyn MotionOwner,
        motion: &mut MotionMaster,
        diff:   u32,
    ) -> bool {
        if self.guard_finalized("update") {
            return false;
        }
        let mut cx = MotionContext { owner, motion, flags: &mut self.flags };
        let running = dispatch!(&mut self.motion, m => m.update(&mut cx, diff));
        if !running {
            self.flags.insert(GeneratorFlags::INFORM_ENABLED);
        }
        running
    }

    pub(crate) fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        if self.guard_finalized("deactivate") {
            return;
        }
        self.flags.insert(GeneratorFlags::DEACTIVATED);
        dispatch!(&mut self.motion, m => m.deactivate(owner));
    }

    pub(crate) fn finalize(
        &mut self,
        owner:           &mut dyn MotionOwner,
        motion:          &mut MotionMaster,
        active:          bool,
        movement_inform: bool,
    ) {
        if self.guard_finalized("finalize") {
            return;
        }
        self.flags.insert(GeneratorFlags::FINALIZED);
        {
            let mut cx = MotionContext { owner: &mut *owner, motion: &mut *motion, flags: &mut self.flags };
            dispatch!(&mut self.motion, m => m.finalize(&mut cx, active, movement_inform));
        }

        let kind = self.kind();
        if movement_inform && self.flags.contains(GeneratorFlags::INFORM_ENABLED) {
            if let Some(id) = self.inform_id() {
                owner.movement_inform(motion, kind, id);
            }
        }
        owner.generator_finalized(kind);
    }

    pub(crate) fn unit_speed_changed(&mut self) {
        if self.guard_finalized("unit_speed_changed") {
            return;
        }
        let flags = &mut self.flags;
        dispatch!(&mut self.motion, m => m.unit_speed_changed(flags));
    }

    /// `true` (and a debug assertion) if the generator was already finalized.
    fn guard_finalized(&self, call: &'static str) -> bool {
        if self.flags.contains(GeneratorFlags::FINALIZED) {
            debug_assert!(false, "{call} on finalized generator {} ({})", self.id, self.kind());
            tracing::error!(id = %self.id, kind = %self.kind(), call, "call on finalized generator");
            return true;
        }
        false
    }
}

//! Read-only world state passed to every AI callback.

use mm_core::{Position, Tick, UnitId, UnitState};
use mm_motion::{MovementKind, MovementSlot};

/// What one unit looked like at the start of the tick.
#[derive(Clone, Debug, PartialEq)]
pub struct UnitView {
    pub id:           UnitId,
    pub position:     Position,
    pub alive:        bool,
    pub player:       bool,
    /// Kind of the generator currently driving the unit.
    pub current_kind: Option<MovementKind>,
    pub current_slot: Option<MovementSlot>,
    pub unit_state:   UnitState,
}

/// A read-only snapshot of the world passed to every
/// [`CreatureAi`][crate::CreatureAi] callback.
///
/// Built once per tick by mm-sim before the think phase and shared
/// immutably across all units, so `think` can run in parallel.
pub struct AiContext<'a> {
    pub tick:    Tick,
    /// Milliseconds one tick represents.
    pub tick_ms: u32,
    /// Every unit in the world, sorted by ascending `UnitId`.
    pub units:   &'a [UnitView],
}

impl<'a> AiContext<'a> {
    #[inline]
    pub fn new(tick: Tick, tick_ms: u32, units: &'a [UnitView]) -> Self {
        debug_assert!(units.windows(2).all(|w| w[0].id < w[1].id), "units must be sorted by id");
        Self { tick, tick_ms, units }
    }

    /// Look a unit up by id.
    pub fn unit(&self, id: UnitId) -> Option<&'a UnitView> {
        self.units
            .binary_search_by_key(&id, |u| u.id)
            .ok()
            .map(|i| &self.units[i])
    }

    /// Planar distance between two units, `None` if either is missing.
    pub fn distance_2d(&self, a: UnitId, b: UnitId) -> Option<f32> {
        let a = self.unit(a)?;
        let b = self.unit(b)?;
        Some(a.position.distance_2d(b.position))
    }

    /// Simulated milliseconds since tick 0.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.tick.0 * self.tick_ms as u64
    }
}

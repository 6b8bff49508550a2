//! The `MotionOwner` trait: everything the scheduler needs from the unit it
//! drives.

use mm_core::{MoveType, PathId, Position, UnitId, UnitState};

use crate::{MotionMaster, MovementKind, SplineRequest};

/// Default movement a creature's data asks for.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DefaultMovement {
    #[default]
    Idle,
    Random { wander_distance: f32 },
    Waypoint { path: PathId, repeatable: bool },
}

/// The unit a [`MotionMaster`] belongs to.
///
/// The scheduler never stores its owner; every mutating call receives it as
/// `&mut dyn MotionOwner`.  Implementors bundle three collaborators:
///
/// * the entity-state system (unit state bits, position, facing),
/// * the spatial view (other units, floor height),
/// * the path/spline service (`launch_spline` and friends).
///
/// The AI hooks at the bottom receive the scheduler back so a reaction can
/// issue new movement requests.  Requests made while the scheduler is
/// ticking are queued and applied after the tick.
pub trait MotionOwner {
    // ── Identity ──────────────────────────────────────────────────────────

    fn guid(&self) -> UnitId;

    fn name(&self) -> &str;

    fn is_player(&self) -> bool;

    fn is_alive(&self) -> bool {
        true
    }

    fn is_flying(&self) -> bool {
        false
    }

    // ── Position ──────────────────────────────────────────────────────────

    fn position(&self) -> Position;

    /// Where the unit returns to on evade.
    fn home_position(&self) -> Position;

    /// Speed in yards per second for `move_type`.
    fn speed(&self, move_type: MoveType) -> f32;

    fn set_orientation(&mut self, orientation: f32);

    // ── Spatial view ──────────────────────────────────────────────────────

    /// Position of another unit, or `None` if it does not exist.
    fn target_position(&self, target: UnitId) -> Option<Position>;

    fn target_name(&self, target: UnitId) -> Option<String>;

    /// The unit controlling this one (pet owner, charmer).
    fn charmer_or_owner(&self) -> Option<UnitId> {
        None
    }

    /// Ground height under `at`, or `None` over the void.
    fn floor_z(&self, at: Position) -> Option<f32>;

    // ── Unit state ────────────────────────────────────────────────────────

    fn unit_state(&self) -> UnitState;

    fn add_unit_state(&mut self, state: UnitState);

    fn clear_unit_state(&mut self, state: UnitState);

    #[inline]
    fn has_unit_state(&self, state: UnitState) -> bool {
        self.unit_state().intersects(state)
    }

    /// Default movement configured in the unit's data.
    fn default_movement(&self) -> DefaultMovement {
        DefaultMovement::Idle
    }

    // ── Path / spline service ─────────────────────────────────────────────

    /// Start moving along `spline`; returns the travel time in milliseconds.
    fn launch_spline(&mut self, spline: SplineRequest) -> u32;

    /// `true` once the last launched spline has arrived (or none is running).
    fn spline_finalized(&self) -> bool;

    /// Final point of the running spline.
    fn spline_destination(&self) -> Option<Position>;

    fn stop_moving(&mut self);

    // ── AI hooks ──────────────────────────────────────────────────────────

    /// A generator concluded naturally.  The only completion notification.
    fn movement_inform(&mut self, _motion: &mut MotionMaster, _kind: MovementKind, _id: u32) {}

    /// A waypoint generator left for `node`.
    fn waypoint_started(&mut self, _motion: &mut MotionMaster, _node: u32, _path: PathId) {}

    /// A waypoint generator arrived at `node`.
    fn waypoint_reached(&mut self, _motion: &mut MotionMaster, _node: u32, _path: PathId) {}

    /// Called once for every generator the scheduler finalizes, whatever the
    /// reason.
    fn generator_finalized(&mut self, _kind: MovementKind) {}
}

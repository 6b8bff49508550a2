use mm_core::{Countdown, MoveType, Position, UnitId, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{ChaseAngle, ChaseRange, Facing, MotionOwner, MovementKind, SplineRequest};

/// Target movement below which a running chase spline is not re-pathed.
const REPATH_THRESHOLD: f32 = 0.5;

/// Keep within range (and optionally at an angle) of a moving target.
///
/// Concludes when the target disappears.
#[derive(Debug)]
pub struct ChaseMovement {
    target:          UnitId,
    range:           ChaseRange,
    angle:           Option<ChaseAngle>,
    recheck:         Countdown,
    recheck_ms:      u32,
    moving:          bool,
    last_target_pos: Option<Position>,
}

impl ChaseMovement {
    pub fn new(target: UnitId, range: ChaseRange, angle: Option<ChaseAngle>, recheck_ms: u32) -> Self {
        Self {
            target,
            range,
            angle,
            recheck: Countdown::new(0),
            recheck_ms,
            moving: false,
            last_target_pos: None,
        }
    }

    #[inline]
    pub fn range(&self) -> ChaseRange {
        self.range
    }

    #[inline]
    pub fn angle(&self) -> Option<ChaseAngle> {
        self.angle
    }

    fn position_okay(&self, pos: Position, target_pos: Position) -> bool {
        let angle_ok = self.angle.is_none_or(|a| a.is_angle_okay(target_pos.relative_angle(pos)));
        self.range.contains(pos.distance_2d(target_pos)) && angle_ok
    }

    fn target_moved(&self, target_pos: Position) -> bool {
        self.last_target_pos
            .is_none_or(|last| last.distance(target_pos) > REPATH_THRESHOLD)
    }

    fn chase(&mut self, owner: &mut dyn MotionOwner, pos: Position, target_pos: Position) {
        let dist = self.range.corrected(pos.distance_2d(target_pos));
        let angle = match self.angle {
            Some(a) if !a.is_angle_okay(target_pos.relative_angle(pos)) => {
                target_pos.orientation + a.relative_angle
            }
            _ => target_pos.absolute_angle(pos),
        };
        let mut destination = target_pos.offset_2d(dist, angle);
        if let Some(z) = owner.floor_z(destination) {
            destination.z = z;
        }

        owner.launch_spline(
            SplineRequest::to(destination)
                .move_type(MoveType::Run)
                .generate_path(true)
                .facing(Facing::Target(self.target)),
        );
        owner.add_unit_state(UnitState::CHASE_MOVE);
        self.moving = true;
        self.last_target_pos = Some(target_pos);
    }
}

impl MovementStrategy for ChaseMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Chase
    }

    fn initialize(&mut self, _cx: &mut MotionContext<'_>) {
        self.moving = false;
        self.last_target_pos = None;
        self.recheck.reset(0);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        let owner = &mut *cx.owner;
        let Some(target_pos) = owner.target_position(self.target) else {
            return false;
        };
        if owner.has_unit_state(UnitState::NOT_MOVE) {
            owner.stop_moving();
            owner.clear_unit_state(UnitState::CHASE_MOVE);
            self.moving = false;
            return true;
        }

        let pos = owner.position();
        if self.moving && owner.spline_finalized() {
            self.moving = false;
            owner.clear_unit_state(UnitState::CHASE_MOVE);
            owner.set_orientation(pos.absolute_angle(target_pos));
        }

        self.recheck.update(diff);
        if self.recheck.passed() {
            self.recheck.reset(self.recheck_ms);
            if !self.position_okay(pos, target_pos) && (!self.moving || self.target_moved(target_pos)) {
                self.chase(owner, pos, target_pos);
            }
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::CHASE_MOVE);
        self.moving = false;
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::CHASE_MOVE);
        }
    }

    fn target(&self) -> Option<UnitId> {
        Some(self.target)
    }
}

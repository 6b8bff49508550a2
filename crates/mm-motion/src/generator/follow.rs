use mm_core::{Countdown, MoveType, Position, UnitId, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{ChaseAngle, Facing, MotionOwner, MovementKind, SplineRequest};

/// Stay `distance` yards from a target at a fixed angle to its facing.
#[derive(Debug)]
pub struct FollowMovement {
    target:          UnitId,
    distance:        f32,
    angle:           ChaseAngle,
    tolerance:       f32,
    recheck:         Countdown,
    recheck_ms:      u32,
    moving:          bool,
    last_target_pos: Option<Position>,
}

impl FollowMovement {
    /// `tolerance` is the slack in yards allowed around `distance`.
    pub fn new(target: UnitId, distance: f32, angle: ChaseAngle, tolerance: f32, recheck_ms: u32) -> Self {
        Self {
            target,
            distance,
            angle,
            tolerance,
            recheck: Countdown::new(0),
            recheck_ms,
            moving: false,
            last_target_pos: None,
        }
    }

    #[inline]
    pub fn distance(&self) -> f32 {
        self.distance
    }

    #[inline]
    pub fn angle(&self) -> ChaseAngle {
        self.angle
    }

    fn position_okay(&self, pos: Position, target_pos: Position) -> bool {
        pos.distance_2d(target_pos) <= self.distance + self.tolerance
            && self.angle.is_angle_okay(target_pos.relative_angle(pos))
    }

    fn follow(&mut self, owner: &mut dyn MotionOwner, target_pos: Position) {
        let angle = target_pos.orientation + self.angle.relative_angle;
        let mut destination = target_pos.offset_2d(self.distance, angle);
        if let Some(z) = owner.floor_z(destination) {
            destination.z = z;
        }

        owner.launch_spline(
            SplineRequest::to(destination)
                .move_type(MoveType::Run)
                .generate_path(true)
                .facing(Facing::Angle(target_pos.orientation)),
        );
        owner.add_unit_state(UnitState::FOLLOW_MOVE);
        self.moving = true;
        self.last_target_pos = Some(target_pos);
    }
}

impl MovementStrategy for FollowMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Follow
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
            owner.clear_unit_state(UnitState::FOLLOW_MOVE);
            self.moving = false;
            return true;
        }

        if self.moving && owner.spline_finalized() {
            self.moving = false;
            owner.clear_unit_state(UnitState::FOLLOW_MOVE);
        }

        self.recheck.update(diff);
        if self.recheck.passed() {
            self.recheck.reset(self.recheck_ms);
            let target_moved = self
                .last_target_pos
                .is_none_or(|last| last.distance(target_pos) > self.tolerance);
            if !self.position_okay(owner.position(), target_pos) && (!self.moving || target_moved) {
                self.follow(owner, target_pos);
            }
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::FOLLOW_MOVE);
        self.moving = false;
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::FOLLOW_MOVE);
        }
    }

    fn target(&self) -> Option<UnitId> {
        Some(self.target)
    }
}

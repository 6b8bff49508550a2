use std::f32::consts::TAU;

use mm_core::{Countdown, MoveType, Position, UnitRng, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Stagger around the spot where confusion started.
#[derive(Debug)]
pub struct ConfusedMovement {
    rng:       UnitRng,
    timer:     Countdown,
    reference: Position,
    radius:    f32,
    pause_ms:  (u32, u32),
}

impl ConfusedMovement {
    pub fn new(rng: UnitRng, radius: f32, pause_ms: (u32, u32)) -> Self {
        Self { rng, timer: Countdown::new(0), reference: Position::default(), radius, pause_ms }
    }

    fn stagger(&mut self, owner: &mut dyn MotionOwner) {
        let dist = self.rng.gen_range(0.0..=self.radius);
        let angle = self.rng.gen_range(0.0..TAU);
        let mut destination = self.reference.offset_2d(dist, angle);
        if let Some(z) = owner.floor_z(destination) {
            destination.z = z;
        }

        let travel = owner.launch_spline(
            SplineRequest::to(destination).move_type(MoveType::Walk).generate_path(true),
        );
        owner.add_unit_state(UnitState::CONFUSED_MOVE);
        let pause = self.rng.millis(self.pause_ms.0, self.pause_ms.1);
        self.timer.reset(travel.saturating_add(pause));
    }
}

impl MovementStrategy for ConfusedMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Confused
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        self.reference = cx.owner.position();
        cx.owner.stop_moving();
        self.timer.reset(0);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        let owner = &mut *cx.owner;
        if owner.has_unit_state(UnitState::ROOT | UnitState::STUNNED | UnitState::DISTRACTED) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            owner.stop_moving();
            return true;
        }
        cx.flags.remove(GeneratorFlags::INTERRUPTED);

        self.timer.update(diff);
        let speed_update = cx.flags.contains(GeneratorFlags::SPEED_UPDATE_PENDING);
        if (speed_update && !owner.spline_finalized()) || (self.timer.passed() && owner.spline_finalized()) {
            cx.flags.remove(GeneratorFlags::SPEED_UPDATE_PENDING);
            self.stagger(owner);
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::CONFUSED_MOVE);
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::CONFUSED_MOVE);
            cx.owner.stop_moving();
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }
}

use std::f32::consts::TAU;

use mm_core::{Countdown, MoveType, Position, UnitRng, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Wander around the home position, pausing between legs.
#[derive(Debug)]
pub struct RandomMovement {
    wander_distance:   f32,
    rng:               UnitRng,
    timer:             Countdown,
    reference:         Position,
    short_pause_ms:    (u32, u32),
    long_pause_ms:     (u32, u32),
    long_pause_chance: f64,
}

impl RandomMovement {
    pub fn new(
        wander_distance:   f32,
        rng:               UnitRng,
        short_pause_ms:    (u32, u32),
        long_pause_ms:     (u32, u32),
        long_pause_chance: f64,
    ) -> Self {
        Self {
            wander_distance,
            rng,
            timer: Countdown::new(0),
            reference: Position::default(),
            short_pause_ms,
            long_pause_ms,
            long_pause_chance,
        }
    }

    #[inline]
    pub fn wander_distance(&self) -> f32 {
        self.wander_distance
    }

    fn pause(&mut self) -> u32 {
        let (min, max) = if self.rng.gen_bool(self.long_pause_chance) {
            self.long_pause_ms
        } else {
            self.short_pause_ms
        };
        self.rng.millis(min, max)
    }

    fn set_random_location(&mut self, owner: &mut dyn MotionOwner) {
        if !self.wander_distance.is_finite() || self.wander_distance <= 0.0 {
            let pause = self.pause();
            self.timer.reset(pause);
            return;
        }

        let angle = self.rng.gen_range(0.0..TAU);
        let dist = self.rng.gen_range(0.0..=self.wander_distance);
        let mut destination = self.reference.offset_2d(dist, angle);
        if let Some(z) = owner.floor_z(destination) {
            destination.z = z;
        }

        let travel = owner.launch_spline(
            SplineRequest::to(destination).move_type(MoveType::Walk).generate_path(true),
        );
        owner.add_unit_state(UnitState::ROAMING_MOVE);
        let pause = self.pause();
        self.timer.reset(travel.saturating_add(pause));
    }
}

impl MovementStrategy for RandomMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Random
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        self.reference = cx.owner.home_position();
        cx.owner.stop_moving();
        self.timer.reset(0);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        let owner = &mut *cx.owner;
        if owner.has_unit_state(UnitState::NOT_MOVE | UnitState::CASTING) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            owner.stop_moving();
            owner.clear_unit_state(UnitState::ROAMING_MOVE);
            return true;
        }
        cx.flags.remove(GeneratorFlags::INTERRUPTED);

        if cx.flags.contains(GeneratorFlags::SPEED_UPDATE_PENDING) {
            cx.flags.remove(GeneratorFlags::SPEED_UPDATE_PENDING);
            if !owner.spline_finalized() {
                self.set_random_location(owner);
                return true;
            }
        }

        self.timer.update(diff);
        if self.timer.passed() && owner.spline_finalized() {
            owner.clear_unit_state(UnitState::ROAMING_MOVE);
            self.set_random_location(owner);
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::ROAMING_MOVE);
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        cx.owner.clear_unit_state(UnitState::ROAMING_MOVE);
        if active {
            cx.owner.stop_moving();
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }
}

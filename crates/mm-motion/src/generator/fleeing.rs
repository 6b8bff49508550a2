use std::f32::consts::{FRAC_PI_4, TAU};

use mm_core::{Countdown, MoveType, UnitId, UnitRng, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Run away from an enemy in short legs.
///
/// The timed variant concludes once its duration runs out; the untimed one
/// runs until removed.
#[derive(Debug)]
pub struct FleeingMovement {
    enemy:    UnitId,
    rng:      UnitRng,
    timer:    Countdown,
    total:    Option<Countdown>,
    distance: (f32, f32),
    pause_ms: (u32, u32),
}

impl FleeingMovement {
    pub fn new(enemy: UnitId, rng: UnitRng, distance: (f32, f32), pause_ms: (u32, u32)) -> Self {
        Self { enemy, rng, timer: Countdown::new(0), total: None, distance, pause_ms }
    }

    /// Flee for `duration_ms`, then conclude.
    pub fn timed(mut self, duration_ms: u32) -> Self {
        self.total = Some(Countdown::new(duration_ms));
        self
    }

    #[inline]
    pub fn enemy(&self) -> UnitId {
        self.enemy
    }

    fn set_target_location(&mut self, owner: &mut dyn MotionOwner) {
        let pos = owner.position();
        let angle = match owner.target_position(self.enemy) {
            Some(enemy_pos) => {
                enemy_pos.absolute_angle(pos) + self.rng.gen_range(-FRAC_PI_4..=FRAC_PI_4)
            }
            None => self.rng.gen_range(0.0..TAU),
        };
        let (min, max) = self.distance;
        let dist = if min < max { self.rng.gen_range(min..=max) } else { min };
        let mut destination = pos.offset_2d(dist, angle);
        if let Some(z) = owner.floor_z(destination) {
            destination.z = z;
        }

        let travel = owner.launch_spline(
            SplineRequest::to(destination).move_type(MoveType::Run).generate_path(true),
        );
        owner.add_unit_state(UnitState::FLEEING_MOVE);
        let pause = self.rng.millis(self.pause_ms.0, self.pause_ms.1);
        self.timer.reset(travel.saturating_add(pause));
    }
}

impl MovementStrategy for FleeingMovement {
    fn kind(&self) -> MovementKind {
        if self.total.is_some() { MovementKind::TimedFleeing } else { MovementKind::Fleeing }
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
        self.timer.reset(0);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        if let Some(total) = self.total.as_mut() {
            total.update(diff);
            if total.passed() {
                return false;
            }
        }

        let owner = &mut *cx.owner;
        if owner.has_unit_state(UnitState::ROOT | UnitState::STUNNED) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            owner.stop_moving();
            owner.clear_unit_state(UnitState::FLEEING_MOVE);
            return true;
        }

        self.timer.update(diff);
        let interrupted = cx.flags.contains(GeneratorFlags::INTERRUPTED) && owner.spline_finalized();
        let speed_update = cx.flags.contains(GeneratorFlags::SPEED_UPDATE_PENDING) && !owner.spline_finalized();
        if interrupted || speed_update || (self.timer.passed() && owner.spline_finalized()) {
            cx.flags.remove(GeneratorFlags::TRANSITORY);
            self.set_target_location(owner);
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::FLEEING_MOVE);
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        cx.owner.clear_unit_state(UnitState::FLEEING_MOVE);
        if active {
            cx.owner.stop_moving();
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }
}

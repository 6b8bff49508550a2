use mm_core::{MoveType, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::{Facing, GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Run back to the home position and face its orientation.
#[derive(Debug, Default)]
pub struct HomeMovement;

impl HomeMovement {
    pub fn new() -> Self {
        Self
    }

    fn set_target_location(&self, cx: &mut MotionContext<'_>) {
        if cx.owner.has_unit_state(UnitState::ROOT | UnitState::STUNNED | UnitState::DISTRACTED) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            return;
        }
        let home = cx.owner.home_position();
        cx.owner.launch_spline(
            SplineRequest::to(home)
                .move_type(MoveType::Run)
                .generate_path(true)
                .facing(Facing::Angle(home.orientation)),
        );
        cx.flags.remove(GeneratorFlags::INTERRUPTED);
        cx.owner.add_unit_state(UnitState::ROAMING_MOVE | UnitState::EVADE);
    }
}

impl MovementStrategy for HomeMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Home
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        self.set_target_location(cx);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, _diff: u32) -> bool {
        if cx.flags.intersects(GeneratorFlags::TRANSITORY) {
            cx.flags.remove(GeneratorFlags::SPEED_UPDATE_PENDING);
            self.set_target_location(cx);
            return true;
        }
        !cx.owner.spline_finalized()
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::ROAMING_MOVE);
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::ROAMING_MOVE | UnitState::EVADE);
        }
        if movement_inform && cx.flags.contains(GeneratorFlags::INFORM_ENABLED) {
            let home = cx.owner.home_position();
            cx.owner.set_orientation(home.orientation);
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }

    fn inform_id(&self) -> Option<u32> {
        Some(0)
    }
}

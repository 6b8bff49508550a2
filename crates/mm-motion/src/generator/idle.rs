use mm_core::UnitId;

use super::MotionContext;
use crate::{GeneratorFlags, MotionOwner, MovementKind};

/// Stand still.  Carries no state, so a single read-only instance serves
/// every scheduler.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IdleMovement;

/// The process-wide idle strategy every default slot falls back to.
pub static IDLE_MOVEMENT: IdleMovement = IdleMovement;

impl IdleMovement {
    pub fn kind(&self) -> MovementKind {
        MovementKind::Idle
    }

    pub fn initialize(&self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
    }

    pub fn reset(&self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
    }

    pub fn update(&self, _cx: &mut MotionContext<'_>, _diff: u32) -> bool {
        true
    }

    pub fn deactivate(&self, _owner: &mut dyn MotionOwner) {}

    pub fn finalize(&self, _cx: &mut MotionContext<'_>, _active: bool, _movement_inform: bool) {}

    pub fn unit_speed_changed(&self, _flags: &mut GeneratorFlags) {}

    pub fn target(&self) -> Option<UnitId> {
        None
    }

    pub fn inform_id(&self) -> Option<u32> {
        None
    }
}

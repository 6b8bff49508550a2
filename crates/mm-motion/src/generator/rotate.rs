use std::f32::consts::TAU;

use mm_core::normalize_orientation;

use super::{MotionContext, MovementStrategy};
use crate::{MovementKind, RotateDirection};

/// Turn in place, one full turn per `duration_ms`, until the time runs out.
#[derive(Debug)]
pub struct RotateMovement {
    id:          u32,
    duration_ms: u32,
    remaining:   u32,
    direction:   RotateDirection,
}

impl RotateMovement {
    pub fn new(id: u32, duration_ms: u32, direction: RotateDirection) -> Self {
        Self { id, duration_ms, remaining: duration_ms, direction }
    }

    #[inline]
    pub fn direction(&self) -> RotateDirection {
        self.direction
    }
}

impl MovementStrategy for RotateMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Rotate
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        let step = diff as f32 * TAU / self.duration_ms.max(1) as f32;
        let signed = match self.direction {
            RotateDirection::Left  => step,
            RotateDirection::Right => -step,
        };
        let orientation = cx.owner.position().orientation + signed;
        cx.owner.set_orientation(normalize_orientation(orientation));

        if self.remaining > diff {
            self.remaining -= diff;
            return true;
        }
        false
    }

    fn finalize(&mut self, _cx: &mut MotionContext<'_>, _active: bool, _movement_inform: bool) {}

    fn inform_id(&self) -> Option<u32> {
        Some(self.id)
    }
}

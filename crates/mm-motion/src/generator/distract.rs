use mm_core::Countdown;

use super::{MotionContext, MovementStrategy};
use crate::MovementKind;

/// Stop, face a direction and stand still for a while.
///
/// The assistance variant follows a successful call for assistance.
#[derive(Debug)]
pub struct DistractMovement {
    timer:       Countdown,
    orientation: f32,
    assistance:  bool,
}

impl DistractMovement {
    pub fn new(duration_ms: u32, orientation: f32) -> Self {
        Self { timer: Countdown::new(duration_ms), orientation, assistance: false }
    }

    pub fn assistance(duration_ms: u32, orientation: f32) -> Self {
        Self { assistance: true, ..Self::new(duration_ms, orientation) }
    }

    #[inline]
    pub fn remaining_ms(&self) -> u32 {
        self.timer.remaining()
    }
}

impl MovementStrategy for DistractMovement {
    fn kind(&self) -> MovementKind {
        if self.assistance { MovementKind::AssistanceDistract } else { MovementKind::Distract }
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
        cx.owner.set_orientation(self.orientation);
    }

    fn reset(&mut self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
    }

    fn update(&mut self, _cx: &mut MotionContext<'_>, diff: u32) -> bool {
        self.timer.update(diff);
        !self.timer.passed()
    }

    fn finalize(&mut self, _cx: &mut MotionContext<'_>, _active: bool, _movement_inform: bool) {}
}

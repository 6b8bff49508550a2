use mm_core::Countdown;

use super::{MotionContext, MovementStrategy};
use crate::{MovementKind, SplineRequest};

/// Play one prepared spline (jump, knockback, fall, landing, circle path)
/// and inform when it ends.
///
/// Displacement cancels the spline for good: `reset` does not relaunch it.
#[derive(Debug)]
pub struct EffectMovement {
    kind:     MovementKind,
    id:       u32,
    spline:   SplineRequest,
    duration: Countdown,
}

impl EffectMovement {
    pub fn new(kind: MovementKind, id: u32, spline: SplineRequest) -> Self {
        Self { kind, id, spline, duration: Countdown::new(0) }
    }

    #[inline]
    pub fn spline(&self) -> &SplineRequest {
        &self.spline
    }
}

impl MovementStrategy for EffectMovement {
    fn kind(&self) -> MovementKind {
        self.kind
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        let travel = cx.owner.launch_spline(self.spline.clone());
        self.duration.reset(travel);
    }

    fn reset(&mut self, _cx: &mut MotionContext<'_>) {}

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        self.duration.update(diff);
        !(self.duration.passed() || cx.owner.spline_finalized())
    }

    fn finalize(&mut self, _cx: &mut MotionContext<'_>, _active: bool, _movement_inform: bool) {}

    fn inform_id(&self) -> Option<u32> {
        Some(self.id)
    }
}

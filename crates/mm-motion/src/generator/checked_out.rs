use mm_core::UnitId;

use super::{MotionContext, MovementStrategy};
use crate::MovementKind;

/// What the scheduler still knows about a generator while `update` has it
/// checked out.
///
/// Sits in a header copy so that queries issued from inside the tick see
/// the running generator.  It never runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedOutMovement {
    kind:      MovementKind,
    target:    Option<UnitId>,
    inform_id: Option<u32>,
    is_static: bool,
}

impl CheckedOutMovement {
    pub(crate) fn new(kind: MovementKind, target: Option<UnitId>, inform_id: Option<u32>, is_static: bool) -> Self {
        Self { kind, target, inform_id, is_static }
    }

    /// `true` if the running generator is the static idle.
    #[inline]
    pub fn is_static(&self) -> bool {
        self.is_static
    }
}

impl MovementStrategy for CheckedOutMovement {
    fn kind(&self) -> MovementKind {
        self.kind
    }

    fn initialize(&mut self, _cx: &mut MotionContext<'_>) {}

    fn update(&mut self, _cx: &mut MotionContext<'_>, _diff: u32) -> bool {
        true
    }

    fn finalize(&mut self, _cx: &mut MotionContext<'_>, _active: bool, _movement_inform: bool) {}

    fn target(&self) -> Option<UnitId> {
        self.target
    }

    fn inform_id(&self) -> Option<u32> {
        self.inform_id
    }
}

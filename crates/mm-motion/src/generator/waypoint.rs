use std::sync::Arc;

use mm_core::{Countdown, UnitState};
use mm_paths::WaypointPath;

use super::{MotionContext, MovementStrategy};
use crate::{Facing, GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Walk a scripted path node by node, waiting at each node for its delay.
///
/// The AI hears about every node through `waypoint_started` and
/// `waypoint_reached`.  A non-repeatable path concludes on arrival at its
/// last node; a repeatable one wraps around forever.
#[derive(Debug)]
pub struct WaypointMovement {
    path:       Arc<WaypointPath>,
    repeatable: bool,
    current:    usize,
    next_move:  Countdown,
    /// A spline towards `current` is running.
    moving:     bool,
}

impl WaypointMovement {
    pub fn new(path: Arc<WaypointPath>, repeatable: bool) -> Self {
        Self { path, repeatable, current: 0, next_move: Countdown::new(0), moving: false }
    }

    #[inline]
    pub fn path(&self) -> &WaypointPath {
        &self.path
    }

    /// Index of the node currently travelled to (or waited at).
    #[inline]
    pub fn current_node(&self) -> usize {
        self.current
    }

    fn start_move(&mut self, cx: &mut MotionContext<'_>) {
        let Some(node) = self.path.node(self.current).cloned() else {
            return;
        };
        cx.owner.waypoint_started(cx.motion, node.id, self.path.id);

        let mut spline = SplineRequest::to(node.position)
            .move_type(node.move_type)
            .generate_path(true);
        if let Some(orientation) = node.orientation {
            spline = spline.facing(Facing::Angle(orientation));
        }
        cx.owner.launch_spline(spline);
        cx.owner.add_unit_state(UnitState::ROAMING_MOVE);
        self.moving = true;
    }

    /// Handle arrival at the current node.  Returns `false` when the path is
    /// exhausted.
    fn arrive(&mut self, cx: &mut MotionContext<'_>) -> bool {
        self.moving = false;
        cx.owner.clear_unit_state(UnitState::ROAMING_MOVE);

        let Some(node) = self.path.node(self.current).cloned() else {
            return false;
        };
        if let Some(orientation) = node.orientation {
            cx.owner.set_orientation(orientation);
        }
        cx.owner.waypoint_reached(cx.motion, node.id, self.path.id);

        if self.current + 1 >= self.path.len() {
            if !self.repeatable {
                return false;
            }
            self.current = 0;
        } else {
            self.current += 1;
        }
        self.next_move.reset(node.delay_ms);
        true
    }
}

impl MovementStrategy for WaypointMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Waypoint
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        cx.owner.stop_moving();
        self.moving = false;
        self.next_move.reset(0);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, diff: u32) -> bool {
        if cx.owner.has_unit_state(UnitState::NOT_MOVE) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            cx.owner.stop_moving();
            cx.owner.clear_unit_state(UnitState::ROAMING_MOVE);
            self.moving = false;
            return true;
        }
        cx.flags.remove(GeneratorFlags::INTERRUPTED);

        if self.moving {
            if !cx.owner.spline_finalized() {
                if cx.flags.contains(GeneratorFlags::SPEED_UPDATE_PENDING) {
                    cx.flags.remove(GeneratorFlags::SPEED_UPDATE_PENDING);
                    self.start_move(cx);
                }
                return true;
            }
            return self.arrive(cx);
        }

        self.next_move.update(diff);
        if self.next_move.passed() {
            self.start_move(cx);
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::ROAMING_MOVE);
        self.moving = false;
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::ROAMING_MOVE);
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }
}

use mm_core::{Position, UnitState};

use super::{MotionContext, MovementStrategy};
use crate::constants::event_id;
use crate::{Facing, GeneratorFlags, MotionOwner, MovementKind, SplineRequest};

/// Move to a single point and inform on arrival.
///
/// Also drives charges (explicit speed) and seeking assistance: the
/// assistance variant never informs; on arrival it has the creature stand
/// distracted for a moment instead.
#[derive(Debug)]
pub struct PointMovement {
    id:                u32,
    destination:       Position,
    generate_path:     bool,
    speed:             Option<f32>,
    final_orientation: Option<f32>,
    /// `Some(distract_ms)` for the seek-assistance variant.
    assistance:        Option<u32>,
}

impl PointMovement {
    pub fn new(id: u32, destination: Position, generate_path: bool) -> Self {
        Self {
            id,
            destination,
            generate_path,
            speed: None,
            final_orientation: None,
            assistance: None,
        }
    }

    /// Seek assistance at `destination`, then stand distracted for
    /// `distract_ms`.
    pub fn assistance(destination: Position, distract_ms: u32) -> Self {
        Self { assistance: Some(distract_ms), ..Self::new(event_id::ASSIST_MOVE, destination, true) }
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = Some(speed);
        self
    }

    pub fn with_final_orientation(mut self, orientation: Option<f32>) -> Self {
        self.final_orientation = orientation;
        self
    }

    #[inline]
    pub fn id(&self) -> u32 {
        self.id
    }

    #[inline]
    pub fn destination(&self) -> Position {
        self.destination
    }

    fn launch(&self, owner: &mut dyn MotionOwner) {
        let mut spline = SplineRequest::to(self.destination).generate_path(self.generate_path);
        if let Some(speed) = self.speed {
            spline = spline.velocity(speed);
        }
        if let Some(orientation) = self.final_orientation {
            spline = spline.facing(Facing::Angle(orientation));
        }
        owner.launch_spline(spline);
    }
}

impl MovementStrategy for PointMovement {
    fn kind(&self) -> MovementKind {
        if self.assistance.is_some() { MovementKind::Assistance } else { MovementKind::Point }
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        if self.id == event_id::CHARGE_PREPATH {
            cx.owner.add_unit_state(UnitState::ROAMING_MOVE);
            return;
        }
        if cx.owner.has_unit_state(UnitState::NOT_MOVE) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            cx.owner.stop_moving();
            return;
        }
        cx.owner.add_unit_state(UnitState::ROAMING_MOVE);
        self.launch(cx.owner);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, _diff: u32) -> bool {
        let owner = &mut *cx.owner;
        if self.id == event_id::CHARGE_PREPATH {
            return !owner.spline_finalized();
        }

        if owner.has_unit_state(UnitState::NOT_MOVE) {
            cx.flags.insert(GeneratorFlags::INTERRUPTED);
            owner.stop_moving();
            return true;
        }

        let interrupted = cx.flags.contains(GeneratorFlags::INTERRUPTED) && owner.spline_finalized();
        let speed_update = cx.flags.contains(GeneratorFlags::SPEED_UPDATE_PENDING) && !owner.spline_finalized();
        if interrupted || speed_update {
            cx.flags.remove(GeneratorFlags::TRANSITORY);
            owner.add_unit_state(UnitState::ROAMING_MOVE);
            self.launch(owner);
            return true;
        }

        if owner.spline_finalized() {
            owner.clear_unit_state(UnitState::ROAMING_MOVE);
            return false;
        }
        true
    }

    fn deactivate(&mut self, owner: &mut dyn MotionOwner) {
        owner.clear_unit_state(UnitState::ROAMING_MOVE);
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, movement_inform: bool) {
        if active {
            cx.owner.clear_unit_state(UnitState::ROAMING_MOVE);
        }
        let arrived = movement_inform && cx.flags.contains(GeneratorFlags::INFORM_ENABLED);
        if let Some(distract_ms) = self.assistance {
            if arrived && cx.owner.is_alive() {
                cx.motion.move_seek_assistance_distract(cx.owner, distract_ms);
            }
        }
    }

    fn unit_speed_changed(&mut self, flags: &mut GeneratorFlags) {
        flags.insert(GeneratorFlags::SPEED_UPDATE_PENDING);
    }

    fn inform_id(&self) -> Option<u32> {
        if self.assistance.is_some() { None } else { Some(self.id) }
    }
}

//! Spline launch requests handed to the owner's path service.
//!
//! Generators never move a unit themselves.  They describe the movement as a
//! [`SplineRequest`] and pass it to
//! [`MotionOwner::launch_spline`][crate::MotionOwner::launch_spline], which
//! returns the travel time in milliseconds.

use mm_core::{MoveType, Position, UnitId};

use crate::constants::{AnimTier, GRAVITY};

/// Which way the unit faces at the end of the spline.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Facing {
    Angle(f32),
    Target(UnitId),
    Point(Position),
}

/// A movement along one or more points.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineRequest {
    /// Points to visit, in order.  The unit's current position is implied as
    /// the start.
    pub path:              Vec<Position>,
    pub move_type:         MoveType,
    /// Explicit speed in yards per second; `None` uses the unit's speed for
    /// `move_type`.
    pub velocity:          Option<f32>,
    pub facing:            Option<Facing>,
    /// Loop the path forever.
    pub cyclic:            bool,
    /// Ask the path service to route around obstacles.
    pub generate_path:     bool,
    /// Apex height of a parabolic arc (jumps, knockbacks).
    pub parabolic:         Option<f32>,
    pub animation:         Option<AnimTier>,
    pub fall:              bool,
    /// Keep the current facing for the whole move.
    pub orientation_fixed: bool,
}

impl SplineRequest {
    /// Straight move to a single point.
    pub fn to(destination: Position) -> Self {
        Self::along(vec![destination])
    }

    pub fn along(path: Vec<Position>) -> Self {
        Self {
            path,
            move_type:         MoveType::Run,
            velocity:          None,
            facing:            None,
            cyclic:            false,
            generate_path:     false,
            parabolic:         None,
            animation:         None,
            fall:              false,
            orientation_fixed: false,
        }
    }

    pub fn move_type(mut self, move_type: MoveType) -> Self {
        self.move_type = move_type;
        self
    }

    pub fn velocity(mut self, velocity: f32) -> Self {
        self.velocity = Some(velocity);
        self
    }

    pub fn facing(mut self, facing: Facing) -> Self {
        self.facing = Some(facing);
        self
    }

    pub fn cyclic(mut self) -> Self {
        self.cyclic = true;
        self
    }

    pub fn generate_path(mut self, generate: bool) -> Self {
        self.generate_path = generate;
        self
    }

    pub fn parabolic(mut self, max_height: f32) -> Self {
        self.parabolic = Some(max_height);
        self
    }

    pub fn animation(mut self, animation: AnimTier) -> Self {
        self.animation = Some(animation);
        self
    }

    pub fn fall(mut self) -> Self {
        self.fall = true;
        self
    }

    pub fn orientation_fixed(mut self) -> Self {
        self.orientation_fixed = true;
        self
    }

    /// Last point of the path, if any.
    #[inline]
    pub fn destination(&self) -> Option<Position> {
        self.path.last().copied()
    }
}

/// Apex height reached by a jump launched upwards at `speed_z`.
#[inline]
pub fn jump_apex_height(speed_z: f32) -> f32 {
    speed_z * speed_z / (2.0 * GRAVITY)
}

/// Horizontal distance covered by a jump launched at `speed_xy`/`speed_z`.
#[inline]
pub fn jump_distance(speed_xy: f32, speed_z: f32) -> f32 {
    let move_time_half = speed_z / GRAVITY;
    2.0 * move_time_half * speed_xy
}

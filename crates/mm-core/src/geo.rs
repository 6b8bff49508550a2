//! World-space position type and angle utilities.
//!
//! `Position` uses `f32` coordinates in yards plus an orientation in radians.
//! Orientation is always kept in `[0, 2π)`; use [`normalize_orientation`]
//! when combining angles.

use std::f32::consts::TAU;

/// Wrap an angle into `[0, 2π)`.
#[inline]
pub fn normalize_orientation(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// A point in world space with a facing.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Facing in radians, `[0, 2π)`.
    pub orientation: f32,
}

impl Position {
    #[inline]
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z, orientation: 0.0 }
    }

    /// Same coordinates, new facing (normalized).
    #[inline]
    pub fn with_orientation(self, orientation: f32) -> Self {
        Self { orientation: normalize_orientation(orientation), ..self }
    }

    /// Planar distance, ignoring height.
    #[inline]
    pub fn distance_2d(self, other: Position) -> f32 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Full 3-D distance.
    #[inline]
    pub fn distance(self, other: Position) -> f32 {
        let dz = other.z - self.z;
        (self.distance_2d(other).powi(2) + dz * dz).sqrt()
    }

    /// World-space angle from `self` towards `other`, in `[0, 2π)`.
    #[inline]
    pub fn absolute_angle(self, other: Position) -> f32 {
        normalize_orientation((other.y - self.y).atan2(other.x - self.x))
    }

    /// Angle towards `other` measured from `self`'s facing, in `[0, 2π)`.
    ///
    /// `0` means straight ahead, `π` directly behind.
    #[inline]
    pub fn relative_angle(self, other: Position) -> f32 {
        normalize_orientation(self.absolute_angle(other) - self.orientation)
    }

    /// The point `dist` yards away along the world-space `angle`, at the same
    /// height.  The returned facing points along `angle`.
    #[inline]
    pub fn offset_2d(self, dist: f32, angle: f32) -> Position {
        Position {
            x:           self.x + dist * angle.cos(),
            y:           self.y + dist * angle.sin(),
            z:           self.z,
            orientation: normalize_orientation(angle),
        }
    }

    /// `true` if `other` lies within `dist` yards on the plane.
    #[inline]
    pub fn is_within_dist_2d(self, other: Position, dist: f32) -> bool {
        self.distance_2d(other) <= dist
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2}, {:.2}, o {:.3})", self.x, self.y, self.z, self.orientation)
    }
}

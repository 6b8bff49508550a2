//! Range and angle tolerances used by chase and follow.

use std::f32::consts::TAU;

use mm_core::normalize_orientation;

use crate::constants::{CONTACT_DISTANCE, DEFAULT_ANGLE_TOLERANCE};

/// How close a chaser must stay to its target.
///
/// The chaser re-paths when closer than `min_range` (moving out to
/// `min_tolerance`) or farther than `max_range` (moving in to
/// `max_tolerance`).
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChaseRange {
    pub min_range:     f32,
    pub min_tolerance: f32,
    pub max_range:     f32,
    pub max_tolerance: f32,
}

impl ChaseRange {
    /// Keep roughly `range` yards away.
    pub fn new(range: f32) -> Self {
        Self {
            min_range:     if range > CONTACT_DISTANCE { 0.0 } else { range - CONTACT_DISTANCE },
            min_tolerance: range,
            max_range:     range + CONTACT_DISTANCE,
            max_tolerance: range,
        }
    }

    /// Stay between `min` and `max` yards.
    pub fn between(min: f32, max: f32) -> Self {
        let min_tolerance = (min + CONTACT_DISTANCE).min((min + max) / 2.0);
        Self {
            min_range: min,
            min_tolerance,
            max_range: max,
            max_tolerance: (max - CONTACT_DISTANCE).max(min_tolerance),
        }
    }

    pub fn with_tolerances(min: f32, min_tolerance: f32, max_tolerance: f32, max: f32) -> Self {
        Self { min_range: min, min_tolerance, max_range: max, max_tolerance }
    }

    /// `true` if `dist` needs no correction.
    #[inline]
    pub fn contains(&self, dist: f32) -> bool {
        dist >= self.min_range && dist <= self.max_range
    }

    /// The distance to move to from `dist`.
    #[inline]
    pub fn corrected(&self, dist: f32) -> f32 {
        if dist > self.max_range {
            self.max_tolerance
        } else if dist < self.min_range {
            self.min_tolerance
        } else {
            dist
        }
    }
}

/// Where around its target a chaser or follower wants to stand.
///
/// `relative_angle` is measured from the target's facing: `0` is in front,
/// `π` is behind.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChaseAngle {
    pub relative_angle: f32,
    pub tolerance:      f32,
}

impl ChaseAngle {
    pub fn new(angle: f32) -> Self {
        Self::with_tolerance(angle, DEFAULT_ANGLE_TOLERANCE)
    }

    pub fn with_tolerance(angle: f32, tolerance: f32) -> Self {
        Self { relative_angle: normalize_orientation(angle), tolerance }
    }

    #[inline]
    pub fn upper_bound(&self) -> f32 {
        normalize_orientation(self.relative_angle + self.tolerance)
    }

    #[inline]
    pub fn lower_bound(&self) -> f32 {
        normalize_orientation(self.relative_angle - self.tolerance)
    }

    /// `true` if `rel_angle` is within tolerance, wrapping around `2π`.
    pub fn is_angle_okay(&self, rel_angle: f32) -> bool {
        let diff = (rel_angle - self.relative_angle).abs();
        diff.min(TAU - diff) <= self.tolerance
    }
}

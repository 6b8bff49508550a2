//! Movement enums and numeric constants shared by the scheduler and every
//! generator.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};
use std::fmt;

use crate::MotionError;

// ── Distances, speeds, physics ────────────────────────────────────────────────

/// Distance at which two units are considered touching.
pub const CONTACT_DISTANCE: f32 = 0.5;

/// Distance a pet keeps behind its owner when following home.
pub const PET_FOLLOW_DIST: f32 = 1.0;

/// Angle (relative to the owner's facing) a pet follows at.
pub const PET_FOLLOW_ANGLE: f32 = FRAC_PI_2;

/// Default angular tolerance of a [`ChaseAngle`][crate::ChaseAngle].
pub const DEFAULT_ANGLE_TOLERANCE: f32 = FRAC_PI_4;

/// Horizontal speed of a charge, in yards per second.
pub const SPEED_CHARGE: f32 = 42.0;

/// Gravity used for jump and knockback arcs, in yards per second².
pub const GRAVITY: f32 = 19.291_105;

/// A fall shorter than this is not worth a spline.
pub const MIN_FALL_HEIGHT: f32 = 0.1;

/// Jumps and knockbacks slower than this horizontally are dropped.
pub const MIN_JUMP_SPEED: f32 = 0.01;

// ── Event ids ─────────────────────────────────────────────────────────────────

/// Well-known movement-inform ids.
pub mod event_id {
    pub const CHARGE: u32 = 1003;
    pub const JUMP: u32 = 1004;
    /// Charge whose spline was already launched by the caller.  The point
    /// generator waits for it instead of launching its own.
    pub const CHARGE_PREPATH: u32 = 1005;
    pub const ASSIST_MOVE: u32 = 1009;
}

// ── MovementKind ──────────────────────────────────────────────────────────────

/// Closed set of generator kinds.
///
/// Discriminants match the values stored in creature data.  `3` is the upper
/// bound of the kinds data may select as a default movement and is never a
/// kind itself.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MovementKind {
    Idle               = 0,
    Random             = 1,
    Waypoint           = 2,
    Confused           = 4,
    Chase              = 5,
    Home               = 6,
    Flight             = 7,
    Point              = 8,
    Fleeing            = 9,
    Distract           = 10,
    Assistance         = 11,
    AssistanceDistract = 12,
    TimedFleeing       = 13,
    Follow             = 14,
    Rotate             = 15,
    Effect             = 16,
    SplineChain        = 17,
    Formation          = 18,
}

impl MovementKind {
    /// Exclusive upper bound of kinds creature data may select.
    pub const MAX_DB: u8 = 3;

    /// `true` for kinds that may be loaded as a creature's default movement.
    #[inline]
    pub fn is_db_kind(self) -> bool {
        (self as u8) < Self::MAX_DB
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MovementKind::Idle               => "idle",
            MovementKind::Random             => "random",
            MovementKind::Waypoint           => "waypoint",
            MovementKind::Confused           => "confused",
            MovementKind::Chase              => "chase",
            MovementKind::Home               => "home",
            MovementKind::Flight             => "flight",
            MovementKind::Point              => "point",
            MovementKind::Fleeing            => "fleeing",
            MovementKind::Distract           => "distract",
            MovementKind::Assistance         => "assistance",
            MovementKind::AssistanceDistract => "assistance_distract",
            MovementKind::TimedFleeing       => "timed_fleeing",
            MovementKind::Follow             => "follow",
            MovementKind::Rotate             => "rotate",
            MovementKind::Effect             => "effect",
            MovementKind::SplineChain        => "spline_chain",
            MovementKind::Formation          => "formation",
        }
    }
}

impl TryFrom<u8> for MovementKind {
    type Error = MotionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Ok(match value {
            0  => MovementKind::Idle,
            1  => MovementKind::Random,
            2  => MovementKind::Waypoint,
            4  => MovementKind::Confused,
            5  => MovementKind::Chase,
            6  => MovementKind::Home,
            7  => MovementKind::Flight,
            8  => MovementKind::Point,
            9  => MovementKind::Fleeing,
            10 => MovementKind::Distract,
            11 => MovementKind::Assistance,
            12 => MovementKind::AssistanceDistract,
            13 => MovementKind::TimedFleeing,
            14 => MovementKind::Follow,
            15 => MovementKind::Rotate,
            16 => MovementKind::Effect,
            17 => MovementKind::SplineChain,
            18 => MovementKind::Formation,
            _  => return Err(MotionError::InvalidKind(value)),
        })
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Slots, modes, priorities ──────────────────────────────────────────────────

/// Where a generator lives inside the scheduler.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum MovementSlot {
    /// The single fallback generator that runs when nothing else does.
    Default = 0,
    /// The ordered stack of temporary generators.
    Active  = 1,
}

impl TryFrom<u8> for MovementSlot {
    type Error = MotionError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MovementSlot::Default),
            1 => Ok(MovementSlot::Active),
            _ => Err(MotionError::InvalidSlot(value)),
        }
    }
}

impl fmt::Display for MovementSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            MovementSlot::Default => "default",
            MovementSlot::Active  => "active",
        })
    }
}

/// Ordering class of an active generator.  `Override` always outranks
/// `Default`.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementMode {
    #[default]
    Default,
    Override,
}

/// Priority inside a mode.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MovementPriority {
    None,
    #[default]
    Normal,
    Highest,
}

/// Turning direction of a rotate generator.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RotateDirection {
    /// Counter-clockwise, orientation increases.
    Left,
    /// Clockwise, orientation decreases.
    Right,
}

/// Animation tier change played by a spline (take-off, landing).
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AnimTier {
    ToGround,
    ToFly,
}

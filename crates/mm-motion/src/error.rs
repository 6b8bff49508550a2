use mm_core::{PathId, UnitId};
use thiserror::Error;

/// Why a movement request was rejected.
///
/// Errors never cross the scheduler's public request API: the request is
/// logged and dropped with no state change.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum MotionError {
    #[error("unit cannot target itself")]
    TargetIsSelf,

    #[error("target {0} does not exist")]
    UnknownTarget(UnitId),

    #[error("path id {0} is reserved")]
    ReservedPath(PathId),

    #[error("path {0} is not loaded")]
    UnknownPath(PathId),

    #[error("only players may request {0}")]
    PlayerOnly(&'static str),

    #[error("only creatures may request {0}")]
    CreatureOnly(&'static str),

    #[error("a flight generator is already present")]
    DuplicateFlight,

    #[error("duration must be non-zero")]
    ZeroDuration,

    #[error("horizontal speed {0} is too low")]
    SpeedTooLow(f32),

    #[error("{what} must be finite, got {value}")]
    NonFinite { what: &'static str, value: f32 },

    #[error("{what} must not be negative, got {value}")]
    Negative { what: &'static str, value: f32 },

    #[error("no floor below the unit")]
    NoFloor,

    #[error("unit is already on the ground")]
    AlreadyOnGround,

    #[error("unit is rooted or stunned")]
    Rooted,

    #[error("circle path needs at least 2 steps, got {0}")]
    TooFewSteps(u8),

    #[error("invalid movement kind {0}")]
    InvalidKind(u8),

    #[error("movement kind {0} cannot be a default movement")]
    NotDefaultKind(u8),

    #[error("invalid movement slot {0}")]
    InvalidSlot(u8),
}

pub type MotionResult<T> = Result<T, MotionError>;

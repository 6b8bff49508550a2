//! Choice of the default generator a scheduler (re)initializes with.

use mm_core::PathId;
use mm_paths::PathStore;

use crate::{DefaultMovement, MotionError, MotionOwner, MotionResult, MovementKind};

/// AI selection service consulted on every scheduler (re)initialization.
pub trait MovementSelector {
    /// Default movement `owner` should run.  The scheduler builds the
    /// generator; an unbuildable answer falls back to idle.
    fn select(&self, owner: &dyn MotionOwner, paths: &PathStore) -> DefaultMovement;
}

/// Players idle; creatures run whatever their data configures, falling back
/// to idle when the configured path is missing.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultSelector;

impl MovementSelector for DefaultSelector {
    fn select(&self, owner: &dyn MotionOwner, paths: &PathStore) -> DefaultMovement {
        if owner.is_player() {
            return DefaultMovement::Idle;
        }
        match owner.default_movement() {
            DefaultMovement::Waypoint { path, .. } if paths.waypoint_path(path).is_none() => {
                tracing::warn!(unit = %owner.guid(), path = %path, "default waypoint path missing, idling");
                DefaultMovement::Idle
            }
            movement => movement,
        }
    }
}

impl DefaultMovement {
    /// Decode a default movement from raw creature data.
    ///
    /// # Errors
    ///
    /// Fails if `kind` is not a movement kind, or is one data may not select.
    pub fn from_db(kind: u8, wander_distance: f32, path: PathId) -> MotionResult<Self> {
        match MovementKind::try_from(kind)? {
            MovementKind::Idle     => Ok(DefaultMovement::Idle),
            MovementKind::Random   => Ok(DefaultMovement::Random { wander_distance }),
            MovementKind::Waypoint => Ok(DefaultMovement::Waypoint { path, repeatable: true }),
            _                      => Err(MotionError::NotDefaultKind(kind)),
        }
    }
}

//! Tunables and shared services of every scheduler in a run.

use std::sync::Arc;

use mm_paths::PathStore;

use crate::constants::{CONTACT_DISTANCE, PET_FOLLOW_ANGLE, PET_FOLLOW_DIST, SPEED_CHARGE};
use crate::{DefaultSelector, MovementSelector};

/// Behavior tunables.
///
/// Durations are in milliseconds and ranges are inclusive `(min, max)`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MotionConfig {
    /// Master seed for every randomized generator.
    pub seed: u64,

    pub contact_distance:    f32,
    pub pet_follow_distance: f32,
    pub pet_follow_angle:    f32,
    pub charge_speed:        f32,

    /// How often chase and follow re-check their target.
    pub chase_recheck_ms:  u32,
    pub follow_recheck_ms: u32,

    /// Random wander: pause after each leg, long pauses taken with
    /// `random_long_pause_chance`.
    pub random_short_pause_ms:    (u32, u32),
    pub random_long_pause_ms:     (u32, u32),
    pub random_long_pause_chance: f64,

    pub confused_radius:   f32,
    pub confused_pause_ms: (u32, u32),

    /// Fleeing: leg length and pause between legs.
    pub flee_distance: (f32, f32),
    pub flee_pause_ms: (u32, u32),

    /// How long a creature stands distracted after calling for assistance.
    pub assistance_distract_ms: u32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            seed:                     0,
            contact_distance:         CONTACT_DISTANCE,
            pet_follow_distance:      PET_FOLLOW_DIST,
            pet_follow_angle:         PET_FOLLOW_ANGLE,
            charge_speed:             SPEED_CHARGE,
            chase_recheck_ms:         100,
            follow_recheck_ms:        100,
            random_short_pause_ms:    (1_000, 2_000),
            random_long_pause_ms:     (5_000, 10_000),
            random_long_pause_chance: 0.5,
            confused_radius:          4.0,
            confused_pause_ms:        (800, 1_500),
            flee_distance:            (10.0, 20.0),
            flee_pause_ms:            (500, 1_500),
            assistance_distract_ms:   1_500,
        }
    }
}

/// Read-only services shared by every scheduler of a run.
pub struct MotionServices {
    pub config:   MotionConfig,
    pub paths:    Arc<PathStore>,
    pub selector: Arc<dyn MovementSelector + Send + Sync>,
}

impl MotionServices {
    /// Services with the [`DefaultSelector`].
    pub fn new(config: MotionConfig, paths: Arc<PathStore>) -> Self {
        Self::with_selector(config, paths, Arc::new(DefaultSelector))
    }

    pub fn with_selector(
        config:   MotionConfig,
        paths:    Arc<PathStore>,
        selector: Arc<dyn MovementSelector + Send + Sync>,
    ) -> Self {
        Self { config, paths, selector }
    }
}

impl Default for MotionServices {
    fn default() -> Self {
        Self::new(MotionConfig::default(), Arc::new(PathStore::new()))
    }
}

impl std::fmt::Debug for MotionServices {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MotionServices")
            .field("config", &self.config)
            .field("waypoint_paths", &self.paths.waypoint_path_count())
            .field("taxi_paths", &self.paths.taxi_path_count())
            .finish_non_exhaustive()
    }
}

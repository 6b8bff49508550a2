//! The `CreatureAi` trait, the main extension point for user code.

use mm_core::{PathId, UnitId, UnitRng};
use mm_motion::MovementKind;

use crate::{AiContext, MovementIntent};

/// Pluggable creature decision logic sitting on top of the scheduler.
///
/// Only [`think`][Self::think] is required.  The notification hooks mirror
/// the scheduler's AI callbacks and default to doing nothing.
///
/// # Thread safety
///
/// mm-sim may call `think` for many units in parallel via Rayon, so
/// implementations must be `Send + Sync`.  The hooks run during the
/// sequential apply phase while a unit's scheduler is ticking; intents they
/// return are queued by the scheduler and applied after the tick.
///
/// # Example
///
/// ```rust,ignore
/// struct Guard { intruder: UnitId }
///
/// impl CreatureAi for Guard {
///     fn think(&self, unit: UnitId, ctx: &AiContext, _rng: &mut UnitRng) -> Vec<MovementIntent> {
///         match ctx.distance_2d(unit, self.intruder) {
///             Some(d) if d < 10.0 => vec![MovementIntent::Chase {
///                 target: self.intruder, range: None, angle: None,
///             }],
///             _ => vec![],
///         }
///     }
/// }
/// ```
pub trait CreatureAi: Send + Sync + 'static {
    /// Called once per unit per tick before any scheduler runs.
    ///
    /// An empty `Vec` leaves the unit's movement untouched.
    fn think(
        &self,
        unit: UnitId,
        ctx:  &AiContext<'_>,
        rng:  &mut UnitRng,
    ) -> Vec<MovementIntent>;

    /// A generator of `unit` concluded naturally.
    fn movement_inform(&self, _unit: UnitId, _kind: MovementKind, _id: u32) -> Vec<MovementIntent> {
        vec![]
    }

    /// A waypoint generator of `unit` arrived at `node`.
    fn waypoint_reached(&self, _unit: UnitId, _path: PathId, _node: u32) -> Vec<MovementIntent> {
        vec![]
    }

    /// A waypoint generator of `unit` left for `node`.
    fn waypoint_started(&self, _unit: UnitId, _path: PathId, _node: u32) -> Vec<MovementIntent> {
        vec![]
    }
}

//! Movement intents: what an AI asks its unit's scheduler to do.

use mm_core::{GeneratorId, PathId, Position, UnitId};
use mm_motion::{
    ChaseAngle, ChaseRange, MotionMaster, MotionOwner, MovementKind, MovementMode, MovementSlot,
    RotateDirection,
};

/// A movement request produced by a [`CreatureAi`][crate::CreatureAi].
///
/// Intents are plain data so the think phase can run without touching any
/// scheduler.  mm-sim applies them afterwards with [`apply`][Self::apply],
/// one unit at a time, in the order the AI returned them.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum MovementIntent {
    // ── Default slot ──────────────────────────────────────────────────────
    Idle,
    Random {
        wander_distance: f32,
    },
    Path {
        path:       PathId,
        repeatable: bool,
    },

    // ── Targeted ──────────────────────────────────────────────────────────
    Chase {
        target: UnitId,
        range:  Option<ChaseRange>,
        angle:  Option<ChaseAngle>,
    },
    Follow {
        target:   UnitId,
        distance: f32,
        angle:    ChaseAngle,
        slot:     MovementSlot,
    },
    Flee {
        enemy:   UnitId,
        /// `0` flees until removed.
        time_ms: u32,
    },
    Home,
    CloserAndStop {
        id:       u32,
        target:   UnitId,
        distance: f32,
    },

    // ── Point movement ────────────────────────────────────────────────────
    Point {
        id:                u32,
        destination:       Position,
        generate_path:     bool,
        final_orientation: Option<f32>,
    },
    Charge {
        id:          u32,
        destination: Position,
        speed:       Option<f32>,
    },
    SeekAssistance {
        destination: Position,
    },

    // ── Stationary ────────────────────────────────────────────────────────
    Confused,
    Distract {
        time_ms:     u32,
        orientation: f32,
    },
    Rotate {
        id:        u32,
        time_ms:   u32,
        direction: RotateDirection,
    },

    // ── Splines ───────────────────────────────────────────────────────────
    TaxiFlight {
        path:       PathId,
        start_node: u32,
    },
    Jump {
        id:          u32,
        destination: Position,
        speed_xy:    f32,
        speed_z:     f32,
    },
    Knockback {
        origin:   Position,
        speed_xy: f32,
        speed_z:  f32,
    },
    Fall {
        id: u32,
    },
    CirclePath {
        center:    Position,
        radius:    f32,
        clockwise: bool,
        steps:     u8,
    },

    // ── Removal ───────────────────────────────────────────────────────────
    Clear,
    ClearSlot {
        slot: MovementSlot,
    },
    ClearMode {
        mode: MovementMode,
    },
    RemoveKind {
        kind: MovementKind,
        slot: MovementSlot,
    },
}

impl MovementIntent {
    /// Issue the request on `motion`.
    ///
    /// Returns the id of the generator the request created; removal intents
    /// and rejected requests return `None`.
    pub fn apply(self, motion: &mut MotionMaster, owner: &mut dyn MotionOwner) -> Option<GeneratorId> {
        match self {
            MovementIntent::Idle => motion.move_idle(owner),
            MovementIntent::Random { wander_distance } => motion.move_random(owner, wander_distance),
            MovementIntent::Path { path, repeatable } => motion.move_path(owner, path, repeatable),

            MovementIntent::Chase { target, range, angle } => motion.move_chase(owner, target, range, angle),
            MovementIntent::Follow { target, distance, angle, slot } => {
                motion.move_follow(owner, target, distance, angle, slot)
            }
            MovementIntent::Flee { enemy, time_ms } => motion.move_fleeing(owner, enemy, time_ms),
            MovementIntent::Home => motion.move_targeted_home(owner),
            MovementIntent::CloserAndStop { id, target, distance } => {
                motion.move_closer_and_stop(owner, id, target, distance)
            }

            MovementIntent::Point { id, destination, generate_path, final_orientation } => {
                motion.move_point(owner, id, destination, generate_path, final_orientation)
            }
            MovementIntent::Charge { id, destination, speed } => {
                motion.move_charge(owner, destination, speed, id, true)
            }
            MovementIntent::SeekAssistance { destination } => motion.move_seek_assistance(owner, destination),

            MovementIntent::Confused => motion.move_confused(owner),
            MovementIntent::Distract { time_ms, orientation } => motion.move_distract(owner, time_ms, orientation),
            MovementIntent::Rotate { id, time_ms, direction } => motion.move_rotate(owner, id, time_ms, direction),

            MovementIntent::TaxiFlight { path, start_node } => motion.move_taxi_flight(owner, path, start_node),
            MovementIntent::Jump { id, destination, speed_xy, speed_z } => {
                motion.move_jump(owner, destination, speed_xy, speed_z, id, false)
            }
            MovementIntent::Knockback { origin, speed_xy, speed_z } => {
                motion.move_knockback_from(owner, origin, speed_xy, speed_z)
            }
            MovementIntent::Fall { id } => motion.move_fall(owner, id),
            MovementIntent::CirclePath { center, radius, clockwise, steps } => {
                motion.move_circle_path(owner, center, radius, clockwise, steps)
            }

            MovementIntent::Clear => {
                motion.clear(owner);
                None
            }
            MovementIntent::ClearSlot { slot } => {
                motion.clear_slot(owner, slot);
                None
            }
            MovementIntent::ClearMode { mode } => {
                motion.clear_mode(owner, mode);
                None
            }
            MovementIntent::RemoveKind { kind, slot } => {
                motion.remove_kind(owner, kind, slot);
                None
            }
        }
    }

    /// Short label for logs and traces.
    pub fn name(&self) -> &'static str {
        match self {
            MovementIntent::Idle                => "idle",
            MovementIntent::Random { .. }       => "random",
            MovementIntent::Path { .. }         => "path",
            MovementIntent::Chase { .. }        => "chase",
            MovementIntent::Follow { .. }       => "follow",
            MovementIntent::Flee { .. }         => "flee",
            MovementIntent::Home                => "home",
            MovementIntent::CloserAndStop { .. } => "closer_and_stop",
            MovementIntent::Point { .. }        => "point",
            MovementIntent::Charge { .. }       => "charge",
            MovementIntent::SeekAssistance { .. } => "seek_assistance",
            MovementIntent::Confused            => "confused",
            MovementIntent::Distract { .. }     => "distract",
            MovementIntent::Rotate { .. }       => "rotate",
            MovementIntent::TaxiFlight { .. }   => "taxi_flight",
            MovementIntent::Jump { .. }         => "jump",
            MovementIntent::Knockback { .. }    => "knockback",
            MovementIntent::Fall { .. }         => "fall",
            MovementIntent::CirclePath { .. }   => "circle_path",
            MovementIntent::Clear               => "clear",
            MovementIntent::ClearSlot { .. }    => "clear_slot",
            MovementIntent::ClearMode { .. }    => "clear_mode",
            MovementIntent::RemoveKind { .. }   => "remove_kind",
        }
    }

    /// Unit this intent moves relative to, if any.
    pub fn target(&self) -> Option<UnitId> {
        match *self {
            MovementIntent::Chase { target, .. }
            | MovementIntent::Follow { target, .. }
            | MovementIntent::CloserAndStop { target, .. } => Some(target),
            MovementIntent::Flee { enemy, .. } => Some(enemy),
            _ => None,
        }
    }
}

//! `mm-motion`: per-unit movement generator scheduler.
//!
//! A [`MotionMaster`] decides which movement behavior drives its unit.  It
//! holds one *default* generator (what the unit does when nothing else is
//! going on) and an ordered *active* stack of temporary ones (chase, flee,
//! charge, ...).  Every tick only the top generator runs.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                    |
//! |-----------------|-------------------------------------------------------------|
//! | [`master`]      | `MotionMaster`: slots, lifecycle, deferred queue, queries   |
//! | [`requests`]    | `move_*` request API                                        |
//! | [`generator`]   | `Generator` header, `MovementStrategy`, strategy structs    |
//! | [`comparator`]  | Total order over the active stack                           |
//! | [`delayed`]     | `DelayedAction`: mutations queued during a tick             |
//! | [`owner`]       | `MotionOwner`: what the scheduler needs from its unit       |
//! | [`selector`]    | `MovementSelector`, `DefaultSelector`                       |
//! | [`config`]      | `MotionConfig`, `MotionServices`                            |
//! | [`spline`]      | `SplineRequest`, `Facing`, jump arc helpers                 |
//! | [`tolerance`]   | `ChaseRange`, `ChaseAngle`                                  |
//! | [`constants`]   | Kinds, slots, modes, priorities, physics constants          |
//! | [`flags`]       | `MotionMasterFlags`, `GeneratorFlags`                       |
//! | [`info`]        | `MovementGeneratorInfo`                                     |
//! | [`error`]       | `MotionError`, `MotionResult<T>`                            |
//!
//! # Reentrancy
//!
//! Generators and AI hooks get the scheduler back while they run.  Anything
//! they request is queued and applied, in request order, once the current
//! tick is over.  The same queue holds requests made before
//! [`MotionMaster::add_to_world`].
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | `Serialize`/`Deserialize` on `MotionConfig` and the enums. |

pub mod comparator;
pub mod config;
pub mod constants;
pub mod delayed;
pub mod error;
pub mod flags;
pub mod generator;
pub mod info;
pub mod master;
pub mod owner;
pub mod requests;
pub mod selector;
pub mod spline;
pub mod tolerance;

#[cfg(test)]
mod tests;

pub use config::{MotionConfig, MotionServices};
pub use constants::{
    event_id, AnimTier, MovementKind, MovementMode, MovementPriority, MovementSlot, RotateDirection,
};
pub use delayed::{DelayedAction, DelayedActionKind, DelayedOp};
pub use error::{MotionError, MotionResult};
pub use flags::{GeneratorFlags, MotionMasterFlags};
pub use generator::{Generator, Motion, MotionContext, MovementStrategy};
pub use info::MovementGeneratorInfo;
pub use master::MotionMaster;
pub use owner::{DefaultMovement, MotionOwner};
pub use selector::{DefaultSelector, MovementSelector};
pub use spline::{Facing, SplineRequest};
pub use tolerance::{ChaseAngle, ChaseRange};

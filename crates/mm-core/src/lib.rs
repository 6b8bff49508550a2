//! `mm-core`: foundational types for the motion-master workspace.
//!
//! This crate is a dependency of every other `mm-*` crate.  It intentionally
//! has no `mm-*` dependencies and minimal external ones (`bitflags`, `rand`
//! and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `UnitId`, `PathId`, `GeneratorId`                     |
//! | [`geo`]         | `Position`, orientation helpers                       |
//! | [`time`]        | `Tick`, `SimClock`, `SimConfig`, `Countdown`          |
//! | [`rng`]         | `UnitRng` seeded per unit and stream                  |
//! | [`speed`]       | `MoveType` enum                                       |
//! | [`unit_state`]  | `UnitState` bit set                                   |
//! | [`error`]       | `MmError`, `MmResult`                                 |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod speed;
pub mod time;
pub mod unit_state;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{MmError, MmResult};
pub use geo::{normalize_orientation, Position};
pub use ids::{GeneratorId, PathId, UnitId};
pub use rng::UnitRng;
pub use speed::MoveType;
pub use time::{Countdown, SimClock, SimConfig, Tick};
pub use unit_state::UnitState;

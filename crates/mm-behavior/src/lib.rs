//! `mm-behavior`: creature AI trait and movement intents.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                       |
//! |---------------|----------------------------------------------------------------|
//! | [`intent`]    | `MovementIntent`: one scheduler request as plain data          |
//! | [`context`]   | `AiContext<'a>`, `UnitView`: read-only tick snapshot           |
//! | [`model`]     | `CreatureAi` trait                                             |
//! | [`scripted`]  | `ScriptedAi`: rule table keyed by unit                         |
//! | [`noop`]      | `NoopAi`: never asks for anything                              |
//! | [`error`]     | `BehaviorError`, `BehaviorResult<T>`                           |
//!
//! # Design notes
//!
//! mm-sim drives every tick in two phases:
//!
//! 1. **Think phase** (parallel): call `CreatureAi::think` for every unit.
//!    All reads go through `&AiContext`; nothing is mutated.
//!
//! 2. **Apply phase** (sequential, ascending `UnitId`): apply the collected
//!    intents to each unit's `MotionMaster`, then tick it.  Completion
//!    hooks fire here and their intents are queued by the scheduler.

pub mod context;
pub mod error;
pub mod intent;
pub mod model;
pub mod noop;
pub mod scripted;


pub use context::{AiContext, UnitView};
pub use error::{BehaviorError, BehaviorResult};
pub use intent::MovementIntent;
pub use model::CreatureAi;
pub use noop::NoopAi;
pub use scripted::{ScriptedAi, ScriptedRule, Trigger};

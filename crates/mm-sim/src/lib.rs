//! `mm-sim`: tick loop harness for the motion-master workspace.
//!
//! # Two-phase tick loop
//!
//! ```text
//! for tick in 0..config.total_ticks:
//!   ① Snapshot  capture every in-world unit into a WorldSnapshot.
//!   ② Think     call CreatureAi::think for each unit
//!                 (parallel with the `parallel` feature).
//!   ③ Apply     for each unit in ascending UnitId order:
//!                   apply its MovementIntents to its MotionMaster
//!                   advance its body along the running spline
//!                   MotionMaster::update(tick_ms)
//! ```
//!
//! Completion hooks (`movement_inform`, `waypoint_reached`) fire inside
//! step ③ and route to the AI; whatever the AI asks for is queued by the
//! scheduler and applied when its update returns.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Runs the think phase on Rayon's thread pool.           |
//! | `serde`    | `Serialize`/`Deserialize` on `UnitSpec`.               |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use mm_behavior::NoopAi;
//! use mm_core::{Position, SimConfig, UnitId};
//! use mm_sim::{NoopObserver, SimBuilder, UnitSpec};
//!
//! let mut sim = SimBuilder::new(config, services, NoopAi)
//!     .unit(UnitSpec::creature(UnitId(1), "Wolf", Position::new(0.0, 0.0, 0.0)))
//!     .build()?;
//! sim.run(&mut NoopObserver)?;
//! ```

pub mod body;
pub mod builder;
pub mod error;
pub mod observer;
pub mod owner;
pub mod sim;
pub mod world;

#[cfg(test)]
mod tests;

pub use body::{SplineDriver, UnitBody, UnitSpec};
pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use owner::UnitCtx;
pub use sim::{Sim, SimStats};
pub use world::WorldSnapshot;

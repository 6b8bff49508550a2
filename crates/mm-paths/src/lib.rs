//! `mm-paths`: scripted waypoint paths, taxi paths, and CSV loading.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`waypoint`]  | `WaypointNode`, `WaypointPath`                            |
//! | [`taxi`]      | `TaxiNode`, `TaxiPath`                                    |
//! | [`store`]     | `PathStore`: id → shared path lookup                      |
//! | [`loader`]    | `load_waypoints_reader`, `load_taxi_reader`, file helpers |
//! | [`error`]     | `PathError`, `PathResult<T>`                              |
//!
//! Paths are immutable once loaded and shared by `Arc`, so every movement
//! generator walking the same path reads the same node list.  A request that
//! names a path id missing from the store is rejected before the scheduler
//! touches any slot.

pub mod error;
pub mod loader;
pub mod store;
pub mod taxi;
pub mod waypoint;

#[cfg(test)]
mod tests;

pub use error::{PathError, PathResult};
pub use loader::{load_taxi_csv, load_taxi_reader, load_waypoints_csv, load_waypoints_reader};
pub use store::PathStore;
pub use taxi::{TaxiNode, TaxiPath};
pub use waypoint::{WaypointNode, WaypointPath};

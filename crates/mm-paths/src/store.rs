//! `PathStore`: read-only lookup of every loaded path.

use std::sync::Arc;

use mm_core::PathId;
use rustc_hash::FxHashMap;

use crate::{TaxiPath, WaypointPath};

/// Holds every scripted waypoint path and taxi path by id.
///
/// Built once at startup (usually from CSV via [`crate::loader`]) and shared
/// read-only afterwards.  Lookups hand out `Arc` clones so generators can
/// keep a path alive independently of the store.
#[derive(Debug, Default, Clone)]
pub struct PathStore {
    waypoints: FxHashMap<PathId, Arc<WaypointPath>>,
    taxi:      FxHashMap<PathId, Arc<TaxiPath>>,
}

impl PathStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from already-loaded paths.  Later duplicates replace
    /// earlier ones.
    pub fn from_paths(
        waypoints: impl IntoIterator<Item = WaypointPath>,
        taxi:      impl IntoIterator<Item = TaxiPath>,
    ) -> Self {
        let mut store = Self::new();
        for path in waypoints {
            store.insert_waypoint_path(path);
        }
        for path in taxi {
            store.insert_taxi_path(path);
        }
        store
    }

    pub fn insert_waypoint_path(&mut self, path: WaypointPath) {
        let id = path.id;
        if self.waypoints.insert(id, Arc::new(path)).is_some() {
            tracing::debug!(path = %id, "replaced waypoint path");
        }
    }

    pub fn insert_taxi_path(&mut self, path: TaxiPath) {
        let id = path.id;
        if self.taxi.insert(id, Arc::new(path)).is_some() {
            tracing::debug!(path = %id, "replaced taxi path");
        }
    }

    #[inline]
    pub fn waypoint_path(&self, id: PathId) -> Option<Arc<WaypointPath>> {
        self.waypoints.get(&id).cloned()
    }

    #[inline]
    pub fn taxi_path(&self, id: PathId) -> Option<Arc<TaxiPath>> {
        self.taxi.get(&id).cloned()
    }

    pub fn waypoint_path_count(&self) -> usize {
        self.waypoints.len()
    }

    pub fn taxi_path_count(&self) -> usize {
        self.taxi.len()
    }
}

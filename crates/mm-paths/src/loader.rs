//! CSV path loaders.
//!
//! # Waypoint CSV format
//!
//! One row per node.  Rows for the same path may appear in any order; nodes
//! are sorted by `node_id` when the path is built.
//!
//! ```csv
//! path_id,node_id,x,y,z,orientation,delay_ms,move_type
//! 1,0,10.0,0.0,0.0,,0,walk
//! 1,1,10.0,10.0,0.0,1.57,2000,walk
//! 1,2,0.0,10.0,0.0,,0,run
//! ```
//!
//! An empty `orientation` keeps the unit's facing.  `move_type` is one of
//! `walk`, `run` or `flight`.
//!
//! # Taxi CSV format
//!
//! ```csv
//! path_id,node_index,x,y,z
//! 7,0,0.0,0.0,20.0
//! 7,1,100.0,0.0,30.0
//! ```
//!
//! Path id `0` is reserved and rejected.

use std::io::Read;
use std::path::Path;

use mm_core::{MoveType, PathId, Position};
use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{PathError, PathResult, TaxiNode, TaxiPath, WaypointNode, WaypointPath};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct WaypointRecord {
    path_id:     u32,
    node_id:     u32,
    x:           f32,
    y:           f32,
    z:           f32,
    orientation: Option<f32>,
    delay_ms:    u32,
    move_type:   String,
}

#[derive(Deserialize)]
struct TaxiRecord {
    path_id:    u32,
    node_index: u32,
    x:          f32,
    y:          f32,
    z:          f32,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load every waypoint path from a CSV file.
pub fn load_waypoints_csv(path: &Path) -> PathResult<Vec<WaypointPath>> {
    let file = std::fs::File::open(path).map_err(PathError::Io)?;
    load_waypoints_reader(file)
}

/// Like [`load_waypoints_csv`] but accepts any `Read` source.
///
/// Paths are returned sorted by id.
pub fn load_waypoints_reader<R: Read>(reader: R) -> PathResult<Vec<WaypointPath>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_path: FxHashMap<u32, Vec<WaypointNode>> = FxHashMap::default();

    for result in csv_reader.deserialize::<WaypointRecord>() {
        let row = result.map_err(|e| PathError::Parse(e.to_string()))?;
        check_path_id(row.path_id)?;
        let move_type = MoveType::parse(&row.move_type).ok_or_else(|| {
            PathError::Parse(format!(
                "invalid move_type {:?}: expected \"walk\", \"run\" or \"flight\"",
                row.move_type
            ))
        })?;
        by_path.entry(row.path_id).or_default().push(WaypointNode {
            id:          row.node_id,
            position:    Position::new(row.x, row.y, row.z),
            orientation: row.orientation,
            delay_ms:    row.delay_ms,
            move_type,
        });
    }

    let mut paths = by_path
        .into_iter()
        .map(|(id, nodes)| WaypointPath::new(PathId(id), nodes))
        .collect::<PathResult<Vec<_>>>()?;
    paths.sort_by_key(|p| p.id);
    tracing::debug!(count = paths.len(), "loaded waypoint paths");
    Ok(paths)
}

/// Load every taxi path from a CSV file.
pub fn load_taxi_csv(path: &Path) -> PathResult<Vec<TaxiPath>> {
    let file = std::fs::File::open(path).map_err(PathError::Io)?;
    load_taxi_reader(file)
}

/// Like [`load_taxi_csv`] but accepts any `Read` source.
pub fn load_taxi_reader<R: Read>(reader: R) -> PathResult<Vec<TaxiPath>> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut by_path: FxHashMap<u32, Vec<TaxiNode>> = FxHashMap::default();

    for result in csv_reader.deserialize::<TaxiRecord>() {
        let row = result.map_err(|e| PathError::Parse(e.to_string()))?;
        check_path_id(row.path_id)?;
        by_path.entry(row.path_id).or_default().push(TaxiNode {
            index:    row.node_index,
            position: Position::new(row.x, row.y, row.z),
        });
    }

    let mut paths = by_path
        .into_iter()
        .map(|(id, nodes)| TaxiPath::new(PathId(id), nodes))
        .collect::<PathResult<Vec<_>>>()?;
    paths.sort_by_key(|p| p.id);
    tracing::debug!(count = paths.len(), "loaded taxi paths");
    Ok(paths)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn check_path_id(id: u32) -> PathResult<()> {
    if id == 0 {
        return Err(PathError::Parse("path_id 0 is reserved".to_string()));
    }
    Ok(())
}

//! Unit tests for mm-paths.

use std::io::Cursor;

use mm_core::{MoveType, PathId, Position};

use crate::{
    load_taxi_reader, load_waypoints_reader, PathError, PathStore, TaxiNode, TaxiPath,
    WaypointNode, WaypointPath,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn node(id: u32, x: f32) -> WaypointNode {
    WaypointNode {
        id,
        position:    Position::new(x, 0.0, 0.0),
        orientation: None,
        delay_ms:    0,
        move_type:   MoveType::Walk,
    }
}

// ── WaypointPath ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod waypoint_path {
    use super::*;

    #[test]
    fn new_sorts_by_node_id() {
        let path = WaypointPath::new(PathId(1), vec![node(2, 2.0), node(0, 0.0), node(1, 1.0)])
            .unwrap();
        let ids: Vec<u32> = path.nodes().iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(path.len(), 3);
        assert!(!path.is_empty());
    }

    #[test]
    fn empty_path_rejected() {
        let err = WaypointPath::new(PathId(4), vec![]).unwrap_err();
        assert!(matches!(err, PathError::EmptyPath(PathId(4))));
    }

    #[test]
    fn duplicate_node_rejected() {
        let err = WaypointPath::new(PathId(1), vec![node(1, 0.0), node(1, 1.0)]).unwrap_err();
        assert!(matches!(err, PathError::DuplicateNode { node: 1, .. }));
    }
}

// ── TaxiPath ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod taxi_path {
    use super::*;

    fn taxi() -> TaxiPath {
        TaxiPath::new(
            PathId(7),
            vec![
                TaxiNode { index: 1, position: Position::new(10.0, 0.0, 5.0) },
                TaxiNode { index: 0, position: Position::new(0.0, 0.0, 5.0) },
                TaxiNode { index: 2, position: Position::new(20.0, 0.0, 5.0) },
            ],
        )
        .unwrap()
    }

    #[test]
    fn destination_is_last_node() {
        assert_eq!(taxi().destination(), Position::new(20.0, 0.0, 5.0));
    }

    #[test]
    fn positions_from_skips_earlier_nodes() {
        let pts = taxi().positions_from(1);
        assert_eq!(pts.len(), 2);
        assert_eq!(pts[0].x, 10.0);
    }
}

// ── PathStore ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod path_store {
    use super::*;

    #[test]
    fn lookup_hits_and_misses() {
        let path = WaypointPath::new(PathId(3), vec![node(0, 0.0)]).unwrap();
        let store = PathStore::from_paths([path], []);
        assert!(store.waypoint_path(PathId(3)).is_some());
        assert!(store.waypoint_path(PathId(4)).is_none());
        assert!(store.taxi_path(PathId(3)).is_none());
        assert_eq!(store.waypoint_path_count(), 1);
        assert_eq!(store.taxi_path_count(), 0);
    }
}

// ── Loader ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use super::*;

    const WAYPOINTS: &str = "\
path_id,node_id,x,y,z,orientation,delay_ms,move_type
2,1,5.0,0.0,0.0,,0,run
1,1,10.0,10.0,0.0,1.5,2000,walk
1,0,10.0,0.0,0.0,,0,walk
";

    #[test]
    fn waypoints_grouped_and_sorted() {
        let paths = load_waypoints_reader(Cursor::new(WAYPOINTS)).unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(paths[0].id, PathId(1));
        assert_eq!(paths[0].len(), 2);
        let second = paths[0].node(1).unwrap();
        assert_eq!(second.delay_ms, 2000);
        assert_eq!(second.orientation, Some(1.5));
        assert_eq!(paths[0].node(0).unwrap().orientation, None);
        assert_eq!(paths[1].node(0).unwrap().move_type, MoveType::Run);
    }

    #[test]
    fn bad_move_type_is_parse_error() {
        let csv = "path_id,node_id,x,y,z,orientation,delay_ms,move_type\n1,0,0,0,0,,0,swim\n";
        let err = load_waypoints_reader(Cursor::new(csv)).unwrap_err();
        assert!(matches!(err, PathError::Parse(_)));
    }

    #[test]
    fn reserved_path_id_rejected() {
        let csv = "path_id,node_index,x,y,z\n0,0,0,0,0\n";
        assert!(load_taxi_reader(Cursor::new(csv)).is_err());
    }

    #[test]
    fn taxi_rows_loaded() {
        let csv = "path_id,node_index,x,y,z\n7,1,100,0,30\n7,0,0,0,20\n";
        let paths = load_taxi_reader(Cursor::new(csv)).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths[0].nodes()[0].index, 0);
        assert_eq!(paths[0].destination().x, 100.0);
    }
}

//! Scripted waypoint paths.

use mm_core::{MoveType, PathId, Position};

use crate::{PathError, PathResult};

/// One stop on a scripted path.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointNode {
    /// Node id reported to the AI when the node is started or reached.
    pub id: u32,

    /// Where the unit should be when the node is reached.  An orientation of
    /// `None` leaves the unit's facing unchanged.
    pub position: Position,
    pub orientation: Option<f32>,

    /// How long to wait at this node before moving on, in milliseconds.
    pub delay_ms: u32,

    /// Speed class used to travel *to* this node.
    pub move_type: MoveType,
}

/// An ordered, non-empty list of waypoint nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct WaypointPath {
    pub id: PathId,
    nodes: Vec<WaypointNode>,
}

impl WaypointPath {
    /// Build a path, sorting nodes by `id`.
    ///
    /// # Errors
    ///
    /// Returns an error if `nodes` is empty or two nodes share an id.
    pub fn new(id: PathId, mut nodes: Vec<WaypointNode>) -> PathResult<Self> {
        if nodes.is_empty() {
            return Err(PathError::EmptyPath(id));
        }
        nodes.sort_by_key(|n| n.id);
        if let Some(pair) = nodes.windows(2).find(|w| w[0].id == w[1].id) {
            return Err(PathError::DuplicateNode { path: id, node: pair[0].id });
        }
        Ok(Self { id, nodes })
    }

    #[inline]
    pub fn nodes(&self) -> &[WaypointNode] {
        &self.nodes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always `false`: construction rejects empty paths.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn node(&self, index: usize) -> Option<&WaypointNode> {
        self.nodes.get(index)
    }
}

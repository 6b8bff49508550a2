//! Taxi (flight master) paths.

use mm_core::{PathId, Position};

use crate::{PathError, PathResult};

/// One node of a taxi path.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxiNode {
    pub index: u32,
    pub position: Position,
}

/// A flight route flown in one continuous spline.
#[derive(Debug, Clone, PartialEq)]
pub struct TaxiPath {
    pub id: PathId,
    nodes: Vec<TaxiNode>,
}

impl TaxiPath {
    /// Build a path, sorting nodes by `index`.
    ///
    /// # Errors
    ///
    /// Returns an error if `nodes` is empty or two nodes share an index.
    pub fn new(id: PathId, mut nodes: Vec<TaxiNode>) -> PathResult<Self> {
        if nodes.is_empty() {
            return Err(PathError::EmptyPath(id));
        }
        nodes.sort_by_key(|n| n.index);
        if let Some(pair) = nodes.windows(2).find(|w| w[0].index == w[1].index) {
            return Err(PathError::DuplicateNode { path: id, node: pair[0].index });
        }
        Ok(Self { id, nodes })
    }

    #[inline]
    pub fn nodes(&self) -> &[TaxiNode] {
        &self.nodes
    }

    /// Positions from node `start` (clamped) to the end of the route.
    pub fn positions_from(&self, start: u32) -> Vec<Position> {
        self.nodes
            .iter()
            .filter(|n| n.index >= start)
            .map(|n| n.position)
            .collect()
    }

    #[inline]
    pub fn destination(&self) -> Position {
        // `new` guarantees at least one node.
        self.nodes[self.nodes.len() - 1].position
    }
}

use std::sync::Arc;

use mm_core::{MoveType, Position};
use mm_paths::TaxiPath;

use super::{MotionContext, MovementStrategy};
use crate::{AnimTier, MovementKind, SplineRequest};

/// Fly a taxi path in one continuous spline.
#[derive(Debug)]
pub struct FlightMovement {
    path:       Arc<TaxiPath>,
    start_node: u32,
}

impl FlightMovement {
    pub fn new(path: Arc<TaxiPath>, start_node: u32) -> Self {
        Self { path, start_node }
    }

    #[inline]
    pub fn path(&self) -> &TaxiPath {
        &self.path
    }

    /// Index of the node nearest to `pos`, never before the start node.
    fn resume_node(&self, pos: Position) -> u32 {
        self.path
            .nodes()
            .iter()
            .filter(|n| n.index >= self.start_node)
            .min_by(|a, b| pos.distance(a.position).total_cmp(&pos.distance(b.position)))
            .map_or(self.start_node, |n| n.index)
    }

    fn launch(&self, cx: &mut MotionContext<'_>, from: u32) {
        let points = self.path.positions_from(from);
        if points.is_empty() {
            return;
        }
        cx.owner.launch_spline(
            SplineRequest::along(points)
                .move_type(MoveType::Flight)
                .animation(AnimTier::ToFly),
        );
    }
}

impl MovementStrategy for FlightMovement {
    fn kind(&self) -> MovementKind {
        MovementKind::Flight
    }

    fn initialize(&mut self, cx: &mut MotionContext<'_>) {
        self.launch(cx, self.start_node);
    }

    fn reset(&mut self, cx: &mut MotionContext<'_>) {
        let from = self.resume_node(cx.owner.position());
        self.launch(cx, from);
    }

    fn update(&mut self, cx: &mut MotionContext<'_>, _diff: u32) -> bool {
        !cx.owner.spline_finalized()
    }

    fn finalize(&mut self, cx: &mut MotionContext<'_>, active: bool, _movement_inform: bool) {
        if active && !cx.owner.spline_finalized() {
            cx.owner.stop_moving();
        }
    }
}

//! `UnitCtx`: the `MotionOwner` a scheduler sees while the sim drives it.

use mm_behavior::{CreatureAi, MovementIntent};
use mm_core::{MoveType, PathId, Position, UnitId, UnitState};
use mm_motion::{DefaultMovement, Facing, MotionMaster, MotionOwner, MovementKind, SplineRequest};

use crate::{SimStats, UnitBody, WorldSnapshot};

/// Binds one unit's body to the world snapshot and the AI for the duration
/// of a scheduler call.
pub struct UnitCtx<'a, A: CreatureAi + ?Sized> {
    pub body: &'a mut UnitBody,
    world:    &'a WorldSnapshot,
    ai:       &'a A,
    stats:    &'a mut SimStats,
}

impl<'a, A: CreatureAi + ?Sized> UnitCtx<'a, A> {
    pub fn new(
        body:  &'a mut UnitBody,
        world: &'a WorldSnapshot,
        ai:    &'a A,
        stats: &'a mut SimStats,
    ) -> Self {
        Self { body, world, ai, stats }
    }

    /// Issue `intents` in order.  Returns how many created a generator.
    pub fn apply_intents(&mut self, motion: &mut MotionMaster, intents: Vec<MovementIntent>) -> usize {
        let mut created = 0;
        for intent in intents {
            tracing::trace!(unit = %self.body.id, intent = intent.name(), "applying intent");
            self.stats.intents_applied += 1;
            if intent.apply(motion, self).is_some() {
                created += 1;
            }
        }
        created
    }
}

impl<A: CreatureAi + ?Sized> MotionOwner for UnitCtx<'_, A> {
    fn guid(&self) -> UnitId {
        self.body.id
    }

    fn name(&self) -> &str {
        &self.body.name
    }

    fn is_player(&self) -> bool {
        self.body.player
    }

    fn is_alive(&self) -> bool {
        self.body.alive
    }

    fn is_flying(&self) -> bool {
        self.body.flying
    }

    fn position(&self) -> Position {
        self.body.position
    }

    fn home_position(&self) -> Position {
        self.body.home
    }

    fn speed(&self, move_type: MoveType) -> f32 {
        self.body.speed(move_type)
    }

    fn set_orientation(&mut self, orientation: f32) {
        self.body.position = self.body.position.with_orientation(orientation);
    }

    fn target_position(&self, target: UnitId) -> Option<Position> {
        self.world.position(target)
    }

    fn target_name(&self, target: UnitId) -> Option<String> {
        self.world.name(target).map(str::to_owned)
    }

    fn floor_z(&self, _at: Position) -> Option<f32> {
        self.world.ground_z
    }

    fn unit_state(&self) -> UnitState {
        self.body.unit_state
    }

    fn add_unit_state(&mut self, state: UnitState) {
        self.body.unit_state.insert(state);
    }

    fn clear_unit_state(&mut self, state: UnitState) {
        self.body.unit_state.remove(state);
    }

    fn default_movement(&self) -> DefaultMovement {
        self.body.default_movement
    }

    fn launch_spline(&mut self, mut spline: SplineRequest) -> u32 {
        if let Some(Facing::Target(target)) = spline.facing {
            spline.facing = self.world.position(target).map(Facing::Point);
        }
        self.body.launch(spline)
    }

    fn spline_finalized(&self) -> bool {
        !self.body.is_moving()
    }

    fn spline_destination(&self) -> Option<Position> {
        self.body.spline().and_then(|s| s.destination())
    }

    fn stop_moving(&mut self) {
        self.body.stop();
    }

    // ── AI hooks ──────────────────────────────────────────────────────────

    fn movement_inform(&mut self, motion: &mut MotionMaster, kind: MovementKind, id: u32) {
        tracing::debug!(unit = %self.body.id, kind = %kind, id, "movement inform");
        self.stats.informs += 1;
        let ai = self.ai;
        let intents = ai.movement_inform(self.body.id, kind, id);
        self.apply_intents(motion, intents);
    }

    fn waypoint_started(&mut self, motion: &mut MotionMaster, node: u32, path: PathId) {
        let ai = self.ai;
        let intents = ai.waypoint_started(self.body.id, path, node);
        self.apply_intents(motion, intents);
    }

    fn waypoint_reached(&mut self, motion: &mut MotionMaster, node: u32, path: PathId) {
        self.stats.waypoints_reached += 1;
        let ai = self.ai;
        let intents = ai.waypoint_reached(self.body.id, path, node);
        self.apply_intents(motion, intents);
    }

    fn generator_finalized(&mut self, _kind: MovementKind) {
        self.stats.generators_finalized += 1;
    }
}

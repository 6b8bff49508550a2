//! Integration tests for mm-sim.

use std::sync::Arc;

use mm_behavior::{CreatureAi, MovementIntent, NoopAi, ScriptedAi, ScriptedRule, Trigger};
use mm_core::{MoveType, PathId, Position, SimConfig, Tick, UnitId, UnitState};
use mm_motion::{DefaultMovement, MotionConfig, MotionMaster, MotionServices, MovementKind, SplineRequest};
use mm_paths::{PathStore, TaxiPath, WaypointNode, WaypointPath};

use crate::{NoopObserver, Sim, SimBuilder, SimError, SimObserver, UnitBody, UnitSpec};

// ── Helpers ───────────────────────────────────────────────────────────────────

const WOLF: UnitId = UnitId(1);
const HERO: UnitId = UnitId(2);
const BOAR: UnitId = UnitId(3);

fn test_config(total_ticks: u64) -> SimConfig {
    SimConfig {
        tick_ms:               100,
        total_ticks,
        seed:                  42,
        num_threads:           Some(1),
        output_interval_ticks: 1,
    }
}

fn walk_node(id: u32, x: f32) -> WaypointNode {
    WaypointNode {
        id,
        position:    Position::new(x, 0.0, 0.0),
        orientation: None,
        delay_ms:    0,
        move_type:   MoveType::Walk,
    }
}

/// Waypoint path 1 walks two nodes along +x.
fn services() -> Arc<MotionServices> {
    let walk = WaypointPath::new(PathId(1), vec![walk_node(1, 5.0), walk_node(2, 10.0)]).unwrap();
    let paths = PathStore::from_paths([walk], Vec::<TaxiPath>::new());
    Arc::new(MotionServices::new(MotionConfig::default(), Arc::new(paths)))
}

fn wolf() -> UnitSpec {
    UnitSpec::creature(WOLF, "Wolf", Position::new(0.0, 0.0, 0.0))
}

fn hero() -> UnitSpec {
    UnitSpec::player(HERO, "Hero", Position::new(30.0, 0.0, 0.0))
}

fn build<A: CreatureAi>(ai: A, units: Vec<UnitSpec>) -> Sim<A> {
    SimBuilder::new(test_config(100), services(), ai).units(units).build().unwrap()
}

fn point(id: u32, x: f32) -> MovementIntent {
    MovementIntent::Point {
        id,
        destination:       Position::new(x, 0.0, 0.0),
        generate_path:     false,
        final_orientation: None,
    }
}

// ── SimBuilder validation ─────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn builds_and_sorts_units() {
        let sim = build(NoopAi, vec![hero(), wolf()]);
        assert_eq!(sim.unit_count(), 2);
        assert_eq!(sim.bodies[0].id, WOLF);
        assert_eq!(sim.bodies[1].id, HERO);
        assert_eq!(sim.motion[0].owner_id(), WOLF);
    }

    #[test]
    fn every_unit_starts_idle() {
        let sim = build(NoopAi, vec![wolf(), hero()]);
        for motion in &sim.motion {
            assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        }
    }

    #[test]
    fn duplicate_unit_errors() {
        let result = SimBuilder::new(test_config(10), services(), NoopAi)
            .unit(wolf())
            .unit(wolf())
            .build();
        assert!(matches!(result, Err(SimError::DuplicateUnit(id)) if id == WOLF));
    }

    #[test]
    fn zero_tick_length_errors() {
        let config = SimConfig { tick_ms: 0, ..test_config(10) };
        let result = SimBuilder::new(config, services(), NoopAi).unit(wolf()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn initial_intent_for_unknown_unit_errors() {
        let result = SimBuilder::new(test_config(10), services(), NoopAi)
            .unit(wolf())
            .initial_intent(BOAR, MovementIntent::Confused)
            .build();
        assert!(matches!(result, Err(SimError::UnknownUnit(id)) if id == BOAR));
    }

    #[test]
    fn initial_intent_replayed_after_spawn() {
        let sim = SimBuilder::new(test_config(10), services(), NoopAi)
            .unit(wolf())
            .initial_intent(WOLF, MovementIntent::Confused)
            .build()
            .unwrap();
        let motion = sim.motion_master(WOLF).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Confused));
        assert_eq!(motion.size(), 2);
    }

    #[test]
    fn home_defaults_to_spawn() {
        let sim = build(NoopAi, vec![wolf()]);
        assert_eq!(sim.body(WOLF).unwrap().home, Position::new(0.0, 0.0, 0.0));
    }
}

// ── Spline driver ─────────────────────────────────────────────────────────────

#[cfg(test)]
mod body_tests {
    use super::*;

    fn body() -> UnitBody {
        UnitBody::from_spec(wolf())
    }

    #[test]
    fn launch_reports_travel_time() {
        let mut body = body();
        let ms = body.launch(SplineRequest::to(Position::new(7.0, 0.0, 0.0)));
        assert_eq!(ms, 1_000);
        assert!(body.is_moving());
        assert_eq!(body.splines_launched, 1);
    }

    #[test]
    fn explicit_velocity_wins() {
        let mut body = body();
        let ms = body.launch(SplineRequest::to(Position::new(10.0, 0.0, 0.0)).velocity(20.0));
        assert_eq!(ms, 500);
    }

    #[test]
    fn advance_moves_then_arrives() {
        let mut body = body();
        body.launch(SplineRequest::to(Position::new(7.0, 0.0, 0.0)));
        assert!(!body.advance(500));
        assert!((body.position.x - 3.5).abs() < 1e-4);
        assert!(body.advance(600));
        assert!(!body.is_moving());
        assert!((body.position.x - 7.0).abs() < 1e-4);
    }

    #[test]
    fn multi_point_path_visits_every_point() {
        let mut body = body();
        body.launch(SplineRequest::along(vec![
            Position::new(7.0, 0.0, 0.0),
            Position::new(7.0, 7.0, 0.0),
        ]));
        assert!(!body.advance(1_500));
        assert!((body.position.x - 7.0).abs() < 1e-4);
        assert!((body.position.y - 3.5).abs() < 1e-4);
        assert!(body.advance(1_000));
    }

    #[test]
    fn cyclic_path_never_finishes() {
        let mut body = body();
        body.launch(
            SplineRequest::along(vec![Position::new(7.0, 0.0, 0.0), Position::new(0.0, 0.0, 0.0)]).cyclic(),
        );
        for _ in 0..10 {
            assert!(!body.advance(1_000));
        }
        assert!(body.is_moving());
    }

    #[test]
    fn final_facing_applied_on_arrival() {
        let mut body = body();
        body.launch(
            SplineRequest::to(Position::new(7.0, 0.0, 0.0)).facing(mm_motion::Facing::Angle(1.0)),
        );
        assert!(body.advance(2_000));
        assert!((body.position.orientation - 1.0).abs() < 1e-4);
    }

    #[test]
    fn speed_change_applies_to_next_launch() {
        let mut body = body();
        body.set_speed(MoveType::Run, 14.0);
        assert_eq!(body.launch(SplineRequest::to(Position::new(7.0, 0.0, 0.0))), 500);
    }
}

// ── Tick loop ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tick_tests {
    use super::*;

    #[test]
    fn point_request_arrives_and_informs() {
        let mut sim = build(NoopAi, vec![wolf()]);
        let id = sim.request(WOLF, point(1, 10.0)).unwrap();
        assert!(id.is_some());

        sim.run_ticks(30, &mut NoopObserver).unwrap();

        let body = sim.body(WOLF).unwrap();
        assert!((body.position.x - 10.0).abs() < 1e-3);
        assert_eq!(sim.stats.informs, 1);
        assert_eq!(sim.motion_master(WOLF).unwrap().current_kind(), Some(MovementKind::Idle));
        assert!(!body.unit_state.contains(UnitState::ROAMING_MOVE));
    }

    #[test]
    fn inform_rule_chains_next_point() {
        let ai = ScriptedAi::new()
            .with_rule(ScriptedRule::new(WOLF, Trigger::AtTick { tick: Tick(0) }, vec![point(1, 10.0)]))
            .with_rule(ScriptedRule::new(
                WOLF,
                Trigger::OnInform { kind: MovementKind::Point, id: Some(1) },
                vec![point(2, 0.0)],
            ));
        let mut sim = build(ai, vec![wolf()]);
        sim.run_ticks(60, &mut NoopObserver).unwrap();

        assert_eq!(sim.stats.informs, 2);
        assert!(sim.body(WOLF).unwrap().position.x.abs() < 1e-3);
        assert_eq!(sim.stats.intents_applied, 2);
    }

    #[test]
    fn chase_closes_distance() {
        let ai = ScriptedAi::new().with_rule(
            ScriptedRule::new(
                WOLF,
                Trigger::TargetWithin { target: HERO, distance: 50.0 },
                vec![MovementIntent::Chase { target: HERO, range: None, angle: None }],
            )
            .unless_kind(MovementKind::Chase),
        );
        let mut sim = build(ai, vec![wolf(), hero()]);
        sim.run_ticks(60, &mut NoopObserver).unwrap();

        let wolf_pos = sim.body(WOLF).unwrap().position;
        let hero_pos = sim.body(HERO).unwrap().position;
        assert!(wolf_pos.distance_2d(hero_pos) < 5.0);
        assert_eq!(sim.motion_master(WOLF).unwrap().current_kind(), Some(MovementKind::Chase));
        // The guard kept the rule from stacking chases.
        assert_eq!(sim.stats.intents_applied, 1);
    }

    #[test]
    fn waypoint_default_walks_path_then_idles() {
        let spec = wolf().default_movement(DefaultMovement::Waypoint { path: PathId(1), repeatable: false });
        let mut sim = build(NoopAi, vec![spec]);
        assert_eq!(sim.motion_master(WOLF).unwrap().current_kind(), Some(MovementKind::Waypoint));

        sim.run_ticks(100, &mut NoopObserver).unwrap();

        assert_eq!(sim.stats.waypoints_reached, 2);
        assert!((sim.body(WOLF).unwrap().position.x - 10.0).abs() < 1e-3);
        assert_eq!(sim.motion_master(WOLF).unwrap().current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn speed_change_reaches_running_generator() {
        let mut sim = build(NoopAi, vec![wolf()]);
        sim.request(WOLF, point(1, 70.0)).unwrap();
        sim.run_ticks(2, &mut NoopObserver).unwrap();
        let launched = sim.body(WOLF).unwrap().splines_launched;

        sim.set_speed(WOLF, MoveType::Run, 14.0).unwrap();
        sim.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(sim.body(WOLF).unwrap().splines_launched, launched + 1);
    }

    #[test]
    fn random_default_is_deterministic() {
        let run = || {
            let spec = wolf().default_movement(DefaultMovement::Random { wander_distance: 8.0 });
            let mut sim = build(NoopAi, vec![spec]);
            sim.run_ticks(200, &mut NoopObserver).unwrap();
            sim.body(WOLF).unwrap().position
        };
        assert_eq!(run(), run());
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle_tests {
    use super::*;

    #[test]
    fn kill_drops_every_generator() {
        let mut sim = build(NoopAi, vec![wolf()]);
        sim.request(WOLF, MovementIntent::Confused).unwrap();
        sim.kill(WOLF).unwrap();

        let body = sim.body(WOLF).unwrap();
        assert!(!body.alive);
        assert!(body.unit_state.contains(UnitState::DIED));
        assert!(!body.unit_state.contains(UnitState::CONFUSED));
        let motion = sim.motion_master(WOLF).unwrap();
        assert_eq!(motion.size(), 1);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn despawned_unit_is_skipped() {
        let mut sim = build(NoopAi, vec![wolf(), hero()]);
        sim.despawn(WOLF).unwrap();
        assert!(sim.motion_master(WOLF).unwrap().is_empty());
        assert!(!sim.body(WOLF).unwrap().in_world);

        let mut counter = TickCounter::default();
        sim.run_ticks(3, &mut counter).unwrap();
        assert_eq!(counter.ticked, vec![1, 1, 1]);
        assert!(sim.snapshot().view(WOLF).is_none());
    }

    #[test]
    fn unknown_unit_errors() {
        let mut sim = build(NoopAi, vec![wolf()]);
        assert!(matches!(sim.kill(BOAR), Err(SimError::UnknownUnit(_))));
        assert!(matches!(sim.request(BOAR, MovementIntent::Idle), Err(SimError::UnknownUnit(_))));
    }

    #[test]
    fn targets_resolve_against_snapshot() {
        let mut sim = build(NoopAi, vec![wolf(), hero()]);
        let info = sim
            .with_unit(WOLF, |motion, ctx| {
                motion.move_chase(ctx, HERO, None, None);
                motion.movement_generators_info(ctx)
            })
            .unwrap();
        assert_eq!(info.last().and_then(|i| i.target_name.clone()), Some("Hero".to_string()));
    }
}

// ── Observer ──────────────────────────────────────────────────────────────────

#[derive(Default)]
struct TickCounter {
    starts:    u64,
    ticked:    Vec<usize>,
    snapshots: u64,
    ended:     Option<Tick>,
}

impl SimObserver for TickCounter {
    fn on_tick_start(&mut self, _tick: Tick) {
        self.starts += 1;
    }

    fn on_tick_end(&mut self, _tick: Tick, ticked: usize) {
        self.ticked.push(ticked);
    }

    fn on_snapshot(&mut self, _tick: Tick, bodies: &[UnitBody], motion: &[MotionMaster]) {
        assert_eq!(bodies.len(), motion.len());
        self.snapshots += 1;
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.ended = Some(final_tick);
    }
}

#[cfg(test)]
mod observer_tests {
    use super::*;

    #[test]
    fn run_reports_every_tick() {
        let mut sim = SimBuilder::new(test_config(5), services(), NoopAi).unit(wolf()).build().unwrap();
        let mut counter = TickCounter::default();
        sim.run(&mut counter).unwrap();
        assert_eq!(counter.starts, 5);
        assert_eq!(counter.ticked, vec![1; 5]);
        assert_eq!(counter.snapshots, 5);
        assert_eq!(counter.ended, Some(Tick(5)));
        assert_eq!(sim.stats.ticks, 5);
    }

    #[test]
    fn snapshot_interval_respected() {
        let config = SimConfig { output_interval_ticks: 2, ..test_config(6) };
        let mut sim = SimBuilder::new(config, services(), NoopAi).unit(wolf()).build().unwrap();
        let mut counter = TickCounter::default();
        sim.run(&mut counter).unwrap();
        assert_eq!(counter.snapshots, 3);
    }
}

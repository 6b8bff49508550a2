//! Unit tests for mm-motion.

use std::sync::Arc;

use mm_core::{MoveType, PathId, Position, UnitId, UnitState};
use mm_paths::{PathStore, TaxiNode, TaxiPath, WaypointNode, WaypointPath};
use rustc_hash::FxHashMap;

use crate::{
    DefaultMovement, MotionConfig, MotionMaster, MotionOwner, MotionServices, MovementKind,
    SplineRequest,
};

// ── Helpers ───────────────────────────────────────────────────────────────────

type InformReaction = Box<dyn FnMut(&mut MotionMaster, &mut TestUnit, MovementKind, u32)>;
type WaypointReaction = Box<dyn FnMut(&mut MotionMaster, &mut TestUnit)>;

const SELF_ID: UnitId = UnitId(1);
const TARGET: UnitId = UnitId(2);
const OTHER: UnitId = UnitId(3);

/// Scripted unit: splines run until `arrive()` is called.
struct TestUnit {
    guid:             UnitId,
    player:           bool,
    alive:            bool,
    flying:           bool,
    pos:              Position,
    home:             Position,
    state:            UnitState,
    floor:            Option<f32>,
    spline_active:    bool,
    launched:         Vec<SplineRequest>,
    targets:          FxHashMap<UnitId, (Position, String)>,
    charmer:          Option<UnitId>,
    default_movement: DefaultMovement,
    informs:          Vec<(MovementKind, u32)>,
    finalized:        Vec<MovementKind>,
    started:          Vec<u32>,
    on_inform:        Option<InformReaction>,
    on_waypoint:      Option<WaypointReaction>,
}

impl TestUnit {
    fn creature() -> Self {
        let mut targets = FxHashMap::default();
        targets.insert(TARGET, (Position::new(10.0, 0.0, 0.0), "Boar".to_string()));
        targets.insert(OTHER, (Position::new(0.0, 10.0, 0.0), "Wolf".to_string()));
        Self {
            guid:             SELF_ID,
            player:           false,
            alive:            true,
            flying:           false,
            pos:              Position::new(0.0, 0.0, 0.0),
            home:             Position::new(-5.0, 0.0, 0.0).with_orientation(1.0),
            state:            UnitState::empty(),
            floor:            Some(0.0),
            spline_active:    false,
            launched:         Vec::new(),
            targets,
            charmer:          None,
            default_movement: DefaultMovement::Idle,
            informs:          Vec::new(),
            finalized:        Vec::new(),
            started:          Vec::new(),
            on_inform:        None,
            on_waypoint:      None,
        }
    }

    fn player() -> Self {
        Self { player: true, ..Self::creature() }
    }

    /// The running spline reaches its end.
    fn arrive(&mut self) {
        if let Some(dest) = self.launched.last().and_then(SplineRequest::destination) {
            self.pos = dest;
        }
        self.spline_active = false;
    }

    fn finalized_count(&self, kind: MovementKind) -> usize {
        self.finalized.iter().filter(|&&k| k == kind).count()
    }
}

impl MotionOwner for TestUnit {
    fn guid(&self) -> UnitId {
        self.guid
    }

    fn name(&self) -> &str {
        "Tester"
    }

    fn is_player(&self) -> bool {
        self.player
    }

    fn is_alive(&self) -> bool {
        self.alive
    }

    fn is_flying(&self) -> bool {
        self.flying
    }

    fn position(&self) -> Position {
        self.pos
    }

    fn home_position(&self) -> Position {
        self.home
    }

    fn speed(&self, _move_type: MoveType) -> f32 {
        7.0
    }

    fn set_orientation(&mut self, orientation: f32) {
        self.pos.orientation = orientation;
    }

    fn target_position(&self, target: UnitId) -> Option<Position> {
        self.targets.get(&target).map(|(pos, _)| *pos)
    }

    fn target_name(&self, target: UnitId) -> Option<String> {
        self.targets.get(&target).map(|(_, name)| name.clone())
    }

    fn charmer_or_owner(&self) -> Option<UnitId> {
        self.charmer
    }

    fn floor_z(&self, _at: Position) -> Option<f32> {
        self.floor
    }

    fn unit_state(&self) -> UnitState {
        self.state
    }

    fn add_unit_state(&mut self, state: UnitState) {
        self.state.insert(state);
    }

    fn clear_unit_state(&mut self, state: UnitState) {
        self.state.remove(state);
    }

    fn default_movement(&self) -> DefaultMovement {
        self.default_movement
    }

    fn launch_spline(&mut self, spline: SplineRequest) -> u32 {
        self.launched.push(spline);
        self.spline_active = true;
        1_000
    }

    fn spline_finalized(&self) -> bool {
        !self.spline_active
    }

    fn spline_destination(&self) -> Option<Position> {
        if !self.spline_active {
            return None;
        }
        self.launched.last().and_then(SplineRequest::destination)
    }

    fn stop_moving(&mut self) {
        self.spline_active = false;
    }

    fn movement_inform(&mut self, motion: &mut MotionMaster, kind: MovementKind, id: u32) {
        self.informs.push((kind, id));
        if let Some(mut reaction) = self.on_inform.take() {
            reaction(motion, self, kind, id);
            self.on_inform.get_or_insert(reaction);
        }
    }

    fn waypoint_started(&mut self, motion: &mut MotionMaster, node: u32, _path: PathId) {
        self.started.push(node);
        if let Some(mut reaction) = self.on_waypoint.take() {
            reaction(motion, self);
            self.on_waypoint.get_or_insert(reaction);
        }
    }

    fn generator_finalized(&mut self, kind: MovementKind) {
        self.finalized.push(kind);
    }
}

fn walk_node(id: u32, x: f32) -> WaypointNode {
    WaypointNode {
        id,
        position: Position::new(x, 0.0, 0.0),
        orientation: None,
        delay_ms: 0,
        move_type: MoveType::Walk,
    }
}

/// Waypoint path 1 (two nodes) and taxi path 2.
fn services() -> Arc<MotionServices> {
    let walk = WaypointPath::new(PathId(1), vec![walk_node(1, 5.0), walk_node(2, 10.0)]).unwrap();
    let taxi = TaxiPath::new(PathId(2), vec![
        TaxiNode { index: 0, position: Position::new(0.0, 0.0, 50.0) },
        TaxiNode { index: 1, position: Position::new(100.0, 0.0, 50.0) },
    ])
    .unwrap();
    let paths = PathStore::from_paths([walk], [taxi]);
    Arc::new(MotionServices::new(MotionConfig::default(), Arc::new(paths)))
}

fn spawned(unit: &mut TestUnit) -> MotionMaster {
    let mut motion = MotionMaster::new(unit.guid, services());
    motion.add_to_world(unit);
    motion
}

// ── Ordering ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ordering {
    use std::cmp::Ordering;

    use crate::comparator::{compare, insertion_index};
    use crate::generator::DistractMovement;
    use crate::{Generator, MovementMode, MovementPriority};

    fn generator(mode: MovementMode, priority: MovementPriority) -> Generator {
        Generator::new(DistractMovement::new(1_000, 0.0)).with_mode(mode).with_priority(priority)
    }

    #[test]
    fn override_mode_outranks_any_priority() {
        let over = generator(MovementMode::Override, MovementPriority::None);
        let high = generator(MovementMode::Default, MovementPriority::Highest);
        assert_eq!(compare(&over, &high), Ordering::Less);
        assert_eq!(compare(&high, &over), Ordering::Greater);
    }

    #[test]
    fn higher_priority_first_within_mode() {
        let high = generator(MovementMode::Default, MovementPriority::Highest);
        let normal = generator(MovementMode::Default, MovementPriority::Normal);
        assert_eq!(compare(&high, &normal), Ordering::Less);
    }

    #[test]
    fn equal_keys_keep_older_first() {
        let older = generator(MovementMode::Default, MovementPriority::Normal);
        let newer = generator(MovementMode::Default, MovementPriority::Normal);
        assert_eq!(compare(&older, &newer), Ordering::Less);
    }

    #[test]
    fn insertion_index_keeps_stack_sorted() {
        let stack = vec![
            generator(MovementMode::Override, MovementPriority::Normal),
            generator(MovementMode::Default, MovementPriority::Highest),
            generator(MovementMode::Default, MovementPriority::None),
        ];
        let normal = generator(MovementMode::Default, MovementPriority::Normal);
        assert_eq!(insertion_index(&stack, &normal), 2);
        let top = generator(MovementMode::Override, MovementPriority::Highest);
        assert_eq!(insertion_index(&stack, &top), 0);
        let bottom = generator(MovementMode::Default, MovementPriority::None);
        assert_eq!(insertion_index(&stack, &bottom), 3);
    }
}

// ── Lifecycle ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod lifecycle {
    use super::*;
    use crate::{DelayedActionKind, MotionMasterFlags, MovementSlot};

    #[test]
    fn update_before_add_to_world_is_a_no_op() {
        let mut unit = TestUnit::creature();
        let mut motion = MotionMaster::new(unit.guid, services());
        motion.update(&mut unit, 100);
        assert!(motion.is_empty());
        assert_eq!(motion.size(), 0);
        assert!(unit.launched.is_empty());
        assert!(unit.finalized.is_empty());
        assert_eq!(motion.flags(), MotionMasterFlags::INITIALIZATION_PENDING);
    }

    #[test]
    fn add_to_world_installs_static_idle() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        assert_eq!(motion.current_slot(), Some(MovementSlot::Default));
        assert_eq!(motion.size(), 1);
        assert!(motion.current_generator().is_some_and(|g| g.is_static()));
        assert!(motion.flags().contains(MotionMasterFlags::STATIC_INITIALIZATION_PENDING));

        motion.update(&mut unit, 100);
        assert!(!motion.flags().contains(MotionMasterFlags::STATIC_INITIALIZATION_PENDING));
    }

    #[test]
    fn add_to_world_twice_is_a_no_op() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let default = motion.current_generator().map(|g| g.id());
        motion.add_to_world(&mut unit);
        assert_eq!(motion.current_generator().map(|g| g.id()), default);
        assert!(unit.finalized.is_empty());
    }

    #[test]
    fn default_follows_creature_data() {
        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Random { wander_distance: 5.0 };
        let motion = spawned(&mut unit);
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Random));

        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Waypoint { path: PathId(1), repeatable: true };
        let motion = spawned(&mut unit);
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Waypoint));
    }

    #[test]
    fn players_and_missing_paths_idle() {
        let mut unit = TestUnit::player();
        unit.default_movement = DefaultMovement::Random { wander_distance: 5.0 };
        let motion = spawned(&mut unit);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));

        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Waypoint { path: PathId(42), repeatable: true };
        let motion = spawned(&mut unit);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn requests_before_add_to_world_are_queued() {
        let mut unit = TestUnit::creature();
        let mut motion = MotionMaster::new(unit.guid, services());
        let id = motion.move_point(&mut unit, 7, Position::new(5.0, 0.0, 0.0), true, None).unwrap();
        assert_eq!(motion.pending_actions(), 1);
        assert_eq!(motion.pending_action_kinds(), vec![DelayedActionKind::Add]);
        assert!(motion.is_empty());

        motion.add_to_world(&mut unit);
        assert_eq!(motion.pending_actions(), 0);
        assert_eq!(motion.current_kind(), Some(MovementKind::Point));
        assert!(motion.contains(id));
    }

    #[test]
    fn guarded_remove_is_skipped_once_target_is_gone() {
        let mut unit = TestUnit::creature();
        let mut motion = MotionMaster::new(unit.guid, services());
        let id = motion.move_point(&mut unit, 7, Position::new(5.0, 0.0, 0.0), true, None).unwrap();
        motion.clear(&mut unit);
        motion.remove(&mut unit, id, MovementSlot::Active);
        assert_eq!(
            motion.pending_action_kinds(),
            vec![DelayedActionKind::Add, DelayedActionKind::Clear, DelayedActionKind::Remove],
        );

        motion.add_to_world(&mut unit);
        assert_eq!(unit.finalized_count(MovementKind::Point), 1);
        assert!(!motion.contains(id));
        assert_eq!(motion.pending_actions(), 0);
    }

    #[test]
    fn remove_from_world_finalizes_everything_once() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), Some(20.0), 1003, false).unwrap();
        motion.update(&mut unit, 100);
        assert!(unit.state.contains(UnitState::CHASE | UnitState::CHARGING));

        motion.remove_from_world(&mut unit);
        assert_eq!(unit.finalized, vec![MovementKind::Point, MovementKind::Chase, MovementKind::Idle]);
        assert!(unit.informs.is_empty());
        assert!(motion.is_empty());
        assert!(!unit.state.intersects(UnitState::CHASE | UnitState::CHARGING));
        assert_eq!(motion.flags(), MotionMasterFlags::INITIALIZATION_PENDING);

        motion.update(&mut unit, 100);
        assert!(motion.is_empty());

        motion.add_to_world(&mut unit);
        assert_eq!(motion.size(), 1);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn initialize_drops_active_generators() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        motion.initialize(&mut unit);
        assert_eq!(motion.size(), 1);
        assert_eq!(unit.finalized_count(MovementKind::Chase), 1);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn concluded_default_falls_back_to_idle() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_path(&mut unit, PathId(1), false).unwrap();

        // Node 1: start, arrive.  Node 2: start, arrive, conclude.
        motion.update(&mut unit, 100);
        unit.arrive();
        motion.update(&mut unit, 100);
        motion.update(&mut unit, 100);
        unit.arrive();
        motion.update(&mut unit, 100);

        assert_eq!(unit.started, vec![1, 2]);
        assert_eq!(unit.finalized_count(MovementKind::Waypoint), 1);
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Idle));
        assert_eq!(motion.size(), 1);
        assert!(unit.informs.is_empty());

        motion.update(&mut unit, 100);
        assert!(motion.current_generator().is_some_and(|g| g.has_flag(crate::GeneratorFlags::INITIALIZED)));
    }
}

// ── Slots ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod slots {
    use super::*;
    use crate::generator::DistractMovement;
    use crate::{Generator, GeneratorFlags, MovementMode, MovementPriority, MovementSlot};

    fn stalled(priority: MovementPriority) -> Generator {
        Generator::new(DistractMovement::new(60_000, 0.0)).with_priority(priority)
    }

    #[test]
    fn higher_priority_displaces_without_finalizing() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let chase = motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let charge = motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), None, 1003, false).unwrap();

        assert_eq!(motion.current_generator().map(|g| g.id()), Some(charge));
        assert!(motion.generator(chase).is_some_and(|g| g.has_flag(GeneratorFlags::DEACTIVATED)));
        assert!(unit.finalized.is_empty());
        assert_eq!(motion.size(), 3);
    }

    #[test]
    fn override_mode_goes_on_top() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let charge = motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), None, 1003, false).unwrap();
        let over = stalled(MovementPriority::None).with_mode(MovementMode::Override);
        let over_id = over.id();
        motion.add(&mut unit, over, MovementSlot::Active);

        assert_eq!(motion.current_generator().map(|g| g.id()), Some(over_id));
        assert!(motion.generator(charge).is_some_and(|g| g.has_flag(GeneratorFlags::DEACTIVATED)));

        motion.clear_mode(&mut unit, MovementMode::Override);
        assert_eq!(motion.current_generator().map(|g| g.id()), Some(charge));
        assert_eq!(unit.finalized_count(MovementKind::Distract), 1);
    }

    #[test]
    fn same_bucket_replaces_top_exactly_once() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let first = motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let second = motion.move_chase(&mut unit, OTHER, None, None).unwrap();

        assert_eq!(unit.finalized, vec![MovementKind::Chase]);
        assert!(!motion.contains(first));
        assert_eq!(motion.current_generator().map(|g| g.id()), Some(second));
        assert_eq!(motion.size(), 2);
        assert!(unit.state.contains(UnitState::CHASE));
    }

    #[test]
    fn same_bucket_below_top_is_replaced() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_confused(&mut unit).unwrap();
        let first = motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let second = motion.move_chase(&mut unit, OTHER, None, None).unwrap();

        assert_eq!(unit.finalized, vec![MovementKind::Chase]);
        assert!(!motion.contains(first));
        assert_eq!(motion.current_kind(), Some(MovementKind::Confused));
        assert_eq!(motion.active_stack()[1].id(), second);
    }

    #[test]
    fn clearing_default_leaves_idle() {
        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Random { wander_distance: 5.0 };
        let mut motion = spawned(&mut unit);
        motion.clear_slot(&mut unit, MovementSlot::Default);
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Idle));
        assert_eq!(unit.finalized, vec![MovementKind::Random]);

        motion.remove_kind(&mut unit, MovementKind::Idle, MovementSlot::Default);
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Idle));
        assert_eq!(motion.size(), 1);
    }

    #[test]
    fn contributed_state_is_reference_counted() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let point = motion.move_point(&mut unit, 7, Position::new(3.0, 0.0, 0.0), true, None).unwrap();
        let roaming = stalled(MovementPriority::Highest).with_base_state(UnitState::ROAMING);
        let roaming_id = roaming.id();
        motion.add(&mut unit, roaming, MovementSlot::Active);
        assert_eq!(motion.contributed_state(), UnitState::ROAMING);

        motion.remove(&mut unit, point, MovementSlot::Active);
        assert!(unit.state.contains(UnitState::ROAMING));

        motion.remove(&mut unit, roaming_id, MovementSlot::Active);
        assert!(!unit.state.contains(UnitState::ROAMING));
        assert!(motion.contributed_state().is_empty());
    }

    #[test]
    fn clear_priority_keeps_other_buckets() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let chase = motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        motion.move_confused(&mut unit).unwrap();
        motion.clear_priority(&mut unit, MovementPriority::Highest);

        assert_eq!(unit.finalized, vec![MovementKind::Confused]);
        assert_eq!(motion.current_generator().map(|g| g.id()), Some(chase));
        assert!(!unit.state.contains(UnitState::CONFUSED));
    }

    #[test]
    fn remove_by_kind_and_id() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let confused = motion.move_confused(&mut unit).unwrap();

        motion.remove_kind(&mut unit, MovementKind::Chase, MovementSlot::Active);
        assert_eq!(unit.finalized, vec![MovementKind::Chase]);

        motion.remove(&mut unit, confused, MovementSlot::Default);
        assert!(motion.contains(confused));
        motion.remove(&mut unit, confused, MovementSlot::Active);
        assert!(!motion.contains(confused));
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }
}

// ── Ticking ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ticking {
    use super::*;
    use crate::constants::event_id;
    use crate::generator::DistractMovement;
    use crate::{
        DelayedActionKind, Generator, GeneratorFlags, MotionMasterFlags, MovementPriority,
        MovementSlot,
    };

    #[test]
    fn inform_only_on_natural_completion() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let removed = motion.move_point(&mut unit, 6, Position::new(3.0, 0.0, 0.0), true, None).unwrap();
        motion.update(&mut unit, 100);
        motion.remove(&mut unit, removed, MovementSlot::Active);
        assert_eq!(unit.finalized_count(MovementKind::Point), 1);
        assert!(unit.informs.is_empty());

        motion.move_point(&mut unit, 7, Position::new(3.0, 0.0, 0.0), true, None).unwrap();
        motion.update(&mut unit, 100);
        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(unit.informs, vec![(MovementKind::Point, 7)]);
        assert_eq!(unit.finalized_count(MovementKind::Point), 2);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn mutations_during_update_apply_after_the_tick_in_order() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        unit.on_inform = Some(Box::new(|motion: &mut MotionMaster, unit: &mut TestUnit, kind: MovementKind, _id: u32| {
            if kind != MovementKind::Point {
                return;
            }
            assert!(motion.flags().contains(MotionMasterFlags::UPDATE));
            motion.move_chase(unit, TARGET, None, None).unwrap();
            motion.move_distract(unit, 5_000, 1.0).unwrap();
            assert_eq!(motion.pending_action_kinds(), vec![DelayedActionKind::Add, DelayedActionKind::Add]);
            assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        }));

        motion.move_point(&mut unit, 7, Position::new(3.0, 0.0, 0.0), true, None).unwrap();
        motion.update(&mut unit, 100);
        unit.arrive();
        motion.update(&mut unit, 100);

        assert_eq!(motion.pending_actions(), 0);
        assert_eq!(motion.size(), 3);
        let kinds: Vec<_> = motion.active_stack().iter().map(|g| g.kind()).collect();
        assert_eq!(kinds, vec![MovementKind::Distract, MovementKind::Chase]);
        let stack = motion.active_stack();
        assert!(stack[1].id() < stack[0].id());
    }

    #[test]
    fn displaced_chase_resumes_after_charge() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let chase = motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.len(), 1);

        motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), Some(30.0), event_id::CHARGE, false).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Point));
        assert!(motion.generator(chase).is_some_and(|g| g.has_flag(GeneratorFlags::DEACTIVATED)));

        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.last().and_then(|s| s.velocity), Some(30.0));
        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(unit.informs, vec![(MovementKind::Point, event_id::CHARGE)]);
        assert!(!unit.state.contains(UnitState::CHARGING));

        motion.update(&mut unit, 100);
        let resumed = motion.current_generator().unwrap();
        assert_eq!(resumed.id(), chase);
        assert!(!resumed.has_flag(GeneratorFlags::DEACTIVATED));
        assert_eq!(unit.finalized_count(MovementKind::Chase), 0);
    }

    #[test]
    fn double_deferred_clear_finalizes_once() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        unit.on_inform = Some(Box::new(|motion: &mut MotionMaster, unit: &mut TestUnit, kind: MovementKind, _id: u32| {
            if kind == MovementKind::Point {
                motion.clear_slot(unit, MovementSlot::Active);
                motion.clear_slot(unit, MovementSlot::Active);
                assert_eq!(motion.pending_actions(), 2);
            }
        }));

        motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), None, event_id::CHARGE, false).unwrap();
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let low = Generator::new(DistractMovement::new(60_000, 0.0)).with_priority(MovementPriority::None);
        motion.add(&mut unit, low, MovementSlot::Active);

        motion.update(&mut unit, 100);
        unit.arrive();
        motion.update(&mut unit, 100);

        assert_eq!(unit.finalized_count(MovementKind::Point), 1);
        assert_eq!(unit.finalized_count(MovementKind::Chase), 1);
        assert_eq!(unit.finalized_count(MovementKind::Distract), 1);
        assert!(motion.active_stack().is_empty());
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        assert!(!unit.state.intersects(UnitState::CHASE | UnitState::CHARGING));
    }

    #[test]
    fn queries_see_the_generator_being_ticked() {
        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Waypoint { path: PathId(1), repeatable: true };
        let mut motion = spawned(&mut unit);
        unit.on_waypoint = Some(Box::new(|motion: &mut MotionMaster, unit: &mut TestUnit| {
            assert_eq!(motion.current_kind(), Some(MovementKind::Waypoint));
            assert_eq!(motion.current_slot(), Some(MovementSlot::Default));
            assert_eq!(motion.ticking().map(|(slot, _)| slot), Some(MovementSlot::Default));
            assert_eq!(motion.size(), 1);
            assert!(!motion.is_empty());
            assert!(motion.current_generator().is_some_and(Generator::is_checked_out));
            assert!(motion.active_stack().is_empty());

            let info = motion.movement_generators_info(&*unit);
            assert_eq!(info.len(), 1);
            assert_eq!(info[0].kind, MovementKind::Waypoint);

            motion.remove_from_world(unit);
        }));

        motion.update(&mut unit, 100);
        assert_eq!(unit.started, vec![1]);
        assert_eq!(motion.size(), 1);
        assert_eq!(motion.current_kind(), Some(MovementKind::Waypoint));
        assert!(motion.ticking().is_none());
        assert!(unit.finalized.is_empty());
    }

    #[test]
    fn running_generator_answers_lookups_and_speed_changes() {
        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Waypoint { path: PathId(1), repeatable: true };
        let mut motion = spawned(&mut unit);
        let path = motion.current_generator().map(|g| g.id()).unwrap();
        let mut fired = false;
        unit.on_waypoint = Some(Box::new(move |motion: &mut MotionMaster, _unit: &mut TestUnit| {
            if fired {
                return;
            }
            fired = true;
            assert!(motion.has_movement_generator(|g| g.kind() == MovementKind::Waypoint, MovementSlot::Default));
            assert!(!motion.has_movement_generator(|g| g.kind() == MovementKind::Waypoint, MovementSlot::Active));
            assert!(motion.generator(path).is_some_and(|g| g.is_checked_out() && !g.is_static()));
            assert!(motion.contains(path));
            motion.propagate_speed_change();
            assert!(motion.flags().contains(MotionMasterFlags::SPEED_CHANGE_PENDING));
        }));

        motion.update(&mut unit, 100);
        assert_eq!(unit.started, vec![1]);
        assert!(!motion.flags().contains(MotionMasterFlags::SPEED_CHANGE_PENDING));
        let waypoint = motion.current_generator().unwrap();
        assert_eq!(waypoint.id(), path);
        assert!(!waypoint.is_checked_out());
        assert!(waypoint.has_flag(GeneratorFlags::SPEED_UPDATE_PENDING));

        // The pending speed update relaunches the spline toward the same node.
        motion.update(&mut unit, 100);
        assert_eq!(unit.started, vec![1, 1]);
        assert_eq!(unit.launched.len(), 2);
    }

    #[test]
    fn initialize_during_update_is_queued() {
        let mut unit = TestUnit::creature();
        unit.default_movement = DefaultMovement::Waypoint { path: PathId(1), repeatable: true };
        let mut motion = spawned(&mut unit);
        let first = motion.current_generator().map(|g| g.id()).unwrap();
        let mut fired = false;
        unit.on_waypoint = Some(Box::new(move |motion: &mut MotionMaster, unit: &mut TestUnit| {
            if !fired {
                fired = true;
                motion.initialize(unit);
                assert_eq!(motion.pending_action_kinds(), vec![DelayedActionKind::Initialize]);
            }
        }));

        motion.update(&mut unit, 100);
        assert_eq!(unit.finalized_count(MovementKind::Waypoint), 1);
        assert_eq!(motion.current_kind(), Some(MovementKind::Waypoint));
        assert!(!motion.contains(first));
    }

    #[test]
    fn assistance_ends_in_distract_without_inform() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_seek_assistance(&mut unit, Position::new(8.0, 0.0, 0.0)).unwrap();
        motion.update(&mut unit, 100);
        assert_eq!(motion.current_kind(), Some(MovementKind::Assistance));
        unit.arrive();
        motion.update(&mut unit, 100);

        assert!(unit.informs.is_empty());
        assert_eq!(motion.current_kind(), Some(MovementKind::AssistanceDistract));
        assert!(unit.state.contains(UnitState::DISTRACTED));
    }

    #[test]
    fn dead_units_do_not_call_for_assistance() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_seek_assistance(&mut unit, Position::new(8.0, 0.0, 0.0)).unwrap();
        motion.update(&mut unit, 100);
        unit.alive = false;
        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
    }

    #[test]
    fn rotate_informs_when_done() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_rotate(&mut unit, 9, 1_000, crate::RotateDirection::Left).unwrap();
        motion.update(&mut unit, 600);
        assert!(unit.pos.orientation > 0.0);
        motion.update(&mut unit, 600);
        assert_eq!(unit.informs, vec![(MovementKind::Rotate, 9)]);
        assert!(!unit.state.contains(UnitState::ROTATING));
    }

    #[test]
    fn distract_faces_and_expires() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_distract(&mut unit, 500, 1.5).unwrap();
        motion.update(&mut unit, 100);
        assert!((unit.pos.orientation - 1.5).abs() < 1e-6);
        motion.update(&mut unit, 500);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        assert!(unit.informs.is_empty());
    }

    #[test]
    fn home_informs_and_faces_home() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_targeted_home(&mut unit).unwrap();
        motion.update(&mut unit, 100);
        assert!(unit.state.contains(UnitState::EVADE));
        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(unit.informs, vec![(MovementKind::Home, 0)]);
        assert!((unit.pos.orientation - 1.0).abs() < 1e-6);
        assert!(!unit.state.contains(UnitState::EVADE));
    }

    #[test]
    fn speed_change_reaches_the_running_generator() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_point(&mut unit, 7, Position::new(3.0, 0.0, 0.0), true, None).unwrap();
        motion.update(&mut unit, 100);
        motion.propagate_speed_change();
        assert!(motion.current_generator().is_some_and(|g| g.has_flag(GeneratorFlags::SPEED_UPDATE_PENDING)));

        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.len(), 2);
    }

    #[test]
    fn destination_tracks_running_spline() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let dest = Position::new(3.0, 4.0, 0.0);
        motion.move_point(&mut unit, 7, dest, true, None).unwrap();
        assert_eq!(motion.destination(&unit), None);
        motion.update(&mut unit, 100);
        assert_eq!(motion.destination(&unit), Some(dest));
        unit.arrive();
        assert_eq!(motion.destination(&unit), None);
    }

    #[test]
    fn timed_fleeing_concludes() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_fleeing(&mut unit, TARGET, 300).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::TimedFleeing));
        motion.update(&mut unit, 100);
        assert!(unit.state.contains(UnitState::FLEEING));
        motion.update(&mut unit, 300);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));
        assert!(!unit.state.contains(UnitState::FLEEING));
    }
}

// ── Requests ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod requests {
    use super::*;
    use crate::constants::{CONTACT_DISTANCE, PET_FOLLOW_DIST};
    use crate::{ChaseAngle, ChaseRange, Facing, Motion, MovementPriority, MovementSlot};

    #[test]
    fn chase_validates_target() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_chase(&mut unit, SELF_ID, None, None).is_none());
        assert!(motion.move_chase(&mut unit, UnitId(99), None, None).is_none());
        assert_eq!(motion.size(), 1);

        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        assert!(motion.has_movement_generator(
            |g| matches!(g.motion(), Motion::Chase(c) if c.range() == ChaseRange::new(CONTACT_DISTANCE)),
            MovementSlot::Active,
        ));
    }

    #[test]
    fn follow_goes_to_requested_slot() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_follow(&mut unit, TARGET, 2.0, ChaseAngle::new(0.0), MovementSlot::Default).unwrap();
        assert_eq!(motion.current_kind_in(MovementSlot::Default), Some(MovementKind::Follow));
        assert!(motion.move_follow(&mut unit, SELF_ID, 2.0, ChaseAngle::new(0.0), MovementSlot::Active).is_none());
    }

    #[test]
    fn default_movements_validate_inputs() {
        let mut player = TestUnit::player();
        let mut motion = spawned(&mut player);
        assert!(motion.move_random(&mut player, 5.0).is_none());

        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_path(&mut unit, PathId(0), true).is_none());
        assert!(motion.move_path(&mut unit, PathId(9), true).is_none());
        motion.move_path(&mut unit, PathId(1), true).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Waypoint));
        motion.move_random(&mut unit, 5.0).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Random));
        assert_eq!(unit.finalized, vec![MovementKind::Idle, MovementKind::Waypoint]);
        motion.move_idle(&mut unit).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));

        let idle = motion.current_generator().map(|g| g.id());
        assert!(motion.move_random(&mut unit, f32::INFINITY).is_none());
        assert!(motion.move_random(&mut unit, f32::NAN).is_none());
        assert!(motion.move_random(&mut unit, -1.0).is_none());
        assert_eq!(motion.current_generator().map(|g| g.id()), idle);
        motion.update(&mut unit, 100);
        assert_eq!(motion.current_kind(), Some(MovementKind::Idle));

        assert!(motion.move_follow(&mut unit, TARGET, f32::NAN, ChaseAngle::new(0.0), MovementSlot::Active).is_none());
        assert!(motion.move_charge(&mut unit, Position::new(3.0, 0.0, 0.0), Some(f32::INFINITY), 1, true).is_none());
        assert!(motion.move_closer_and_stop(&mut unit, 4, TARGET, f32::NAN).is_none());
        assert!(motion.move_distract(&mut unit, 500, f32::NAN).is_none());
        assert_eq!(motion.size(), 1);
    }

    #[test]
    fn taxi_flight_is_player_only_and_unique() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_taxi_flight(&mut unit, PathId(2), 0).is_none());

        let mut player = TestUnit::player();
        let mut motion = spawned(&mut player);
        assert!(motion.move_taxi_flight(&mut player, PathId(9), 0).is_none());
        motion.move_taxi_flight(&mut player, PathId(2), 0).unwrap();
        assert!(motion.move_taxi_flight(&mut player, PathId(2), 1).is_none());
        assert_eq!(motion.current_kind(), Some(MovementKind::Flight));
        assert!(player.state.contains(UnitState::IN_FLIGHT));
    }

    #[test]
    fn fleeing_is_timed_for_creatures_only() {
        let mut player = TestUnit::player();
        let mut motion = spawned(&mut player);
        motion.move_fleeing(&mut player, TARGET, 1_000).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Fleeing));
        assert!(motion.move_fleeing(&mut player, UnitId(99), 0).is_none());
    }

    #[test]
    fn rotate_needs_a_duration() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_rotate(&mut unit, 1, 0, crate::RotateDirection::Right).is_none());
    }

    #[test]
    fn targeted_home_follows_charmer() {
        let mut unit = TestUnit::creature();
        unit.charmer = Some(OTHER);
        let mut motion = spawned(&mut unit);
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        motion.move_targeted_home(&mut unit).unwrap();

        assert_eq!(unit.finalized, vec![MovementKind::Chase]);
        let follow = motion.current_generator().unwrap();
        assert_eq!(follow.kind(), MovementKind::Follow);
        assert_eq!(follow.target(), Some(OTHER));
        assert!(matches!(follow.motion(), Motion::Follow(f) if f.distance() == PET_FOLLOW_DIST));

        let mut player = TestUnit::player();
        let mut motion = spawned(&mut player);
        assert!(motion.move_targeted_home(&mut player).is_none());
    }

    #[test]
    fn jumps_validate_speed_and_arc() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let dest = Position::new(10.0, 0.0, 0.0).with_orientation(2.0);
        assert!(motion.move_jump(&mut unit, dest, 0.0, 5.0, 1, false).is_none());
        assert!(motion.move_jump(&mut unit, dest, f32::NAN, 5.0, 1, false).is_none());
        assert!(motion.move_jump(&mut unit, dest, f32::INFINITY, 5.0, 1, false).is_none());
        assert!(motion.move_jump(&mut unit, dest, 10.0, f32::NAN, 1, false).is_none());
        assert!(motion.move_jump_to(&mut unit, 0.0, f32::NAN, 5.0).is_none());
        assert_eq!(motion.size(), 1);

        motion.move_jump(&mut unit, dest, 10.0, 5.0, 1, true).unwrap();
        motion.update(&mut unit, 100);
        let spline = unit.launched.last().unwrap();
        assert!(spline.parabolic.is_some_and(|h| h > 0.0));
        assert_eq!(spline.velocity, Some(10.0));
        assert_eq!(spline.facing, Some(Facing::Angle(2.0)));
        assert!(unit.state.contains(UnitState::JUMPING));
        assert_eq!(motion.current_generator().map(|g| g.priority()), Some(MovementPriority::Highest));

        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(unit.informs, vec![(MovementKind::Effect, 1)]);
    }

    #[test]
    fn jump_to_and_knockback_are_creature_only() {
        let mut player = TestUnit::player();
        let mut motion = spawned(&mut player);
        assert!(motion.move_jump_to(&mut player, 0.0, 10.0, 5.0).is_none());
        assert!(motion.move_knockback_from(&mut player, Position::new(-1.0, 0.0, 0.0), 10.0, 5.0).is_none());

        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_knockback_from(&mut unit, Position::new(-1.0, 0.0, 0.0), 0.0, 5.0).is_none());
        assert!(motion.move_knockback_from(&mut unit, Position::new(-1.0, 0.0, 0.0), 10.0, f32::INFINITY).is_none());
        motion.move_knockback_from(&mut unit, Position::new(-1.0, 0.0, 0.0), 10.0, 5.0).unwrap();
        motion.update(&mut unit, 100);
        let spline = unit.launched.last().unwrap();
        assert!(spline.orientation_fixed);
        assert!(spline.destination().is_some_and(|d| d.x > 0.0));
    }

    #[test]
    fn fall_needs_height_and_freedom() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        assert!(motion.move_fall(&mut unit, 1).is_none());

        unit.pos.z = 10.0;
        unit.floor = None;
        assert!(motion.move_fall(&mut unit, 1).is_none());

        unit.floor = Some(0.0);
        unit.state.insert(UnitState::ROOT);
        assert!(motion.move_fall(&mut unit, 1).is_none());

        unit.state.remove(UnitState::ROOT);
        motion.move_fall(&mut unit, 1).unwrap();
        motion.update(&mut unit, 100);
        let spline = unit.launched.last().unwrap();
        assert!(spline.fall);
        assert_eq!(spline.destination().map(|d| d.z), Some(0.0));
    }

    #[test]
    fn closer_and_stop_moves_or_faces() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_closer_and_stop(&mut unit, 4, TARGET, 5.0).unwrap();
        assert!(matches!(
            motion.current_generator().unwrap().motion(),
            Motion::Point(p) if (p.destination().x - 5.0).abs() < 1e-3
        ));

        unit.targets.insert(OTHER, (Position::new(3.0, 0.0, 0.0), "Wolf".to_string()));
        let mut motion = spawned(&mut unit);
        motion.move_closer_and_stop(&mut unit, 4, OTHER, 5.0).unwrap();
        assert_eq!(motion.current_kind(), Some(MovementKind::Effect));
        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.last().and_then(|s| s.facing), Some(Facing::Target(OTHER)));
        assert_eq!(unit.launched.last().and_then(SplineRequest::destination), Some(unit.pos));
        unit.arrive();
        motion.update(&mut unit, 100);
        assert_eq!(unit.informs, vec![(MovementKind::Effect, 4)]);

        assert!(motion.move_closer_and_stop(&mut unit, 4, UnitId(99), 5.0).is_none());
    }

    #[test]
    fn circle_path_starts_here_and_loops() {
        let mut unit = TestUnit::creature();
        unit.pos = Position::new(10.0, 0.0, 0.0);
        let mut motion = spawned(&mut unit);
        assert!(motion.move_circle_path(&mut unit, Position::new(0.0, 0.0, 0.0), 10.0, true, 1).is_none());
        assert!(motion.move_circle_path(&mut unit, Position::new(0.0, 0.0, 0.0), f32::NAN, true, 4).is_none());
        assert!(motion.move_circle_path(&mut unit, Position::new(0.0, 0.0, 0.0), -10.0, true, 4).is_none());

        motion.move_circle_path(&mut unit, Position::new(0.0, 0.0, 0.0), 10.0, true, 4).unwrap();
        motion.update(&mut unit, 100);
        let spline = unit.launched.last().unwrap();
        assert_eq!(spline.path.len(), 4);
        assert_eq!(spline.path[0], Position::new(10.0, 0.0, 0.0));
        assert!(spline.cyclic);
        assert_eq!(spline.move_type, MoveType::Walk);
        assert!((spline.path[2].x + 10.0).abs() < 1e-3);
        assert_eq!(spline.animation, None);
    }

    #[test]
    fn flying_circle_path_keeps_altitude() {
        let mut unit = TestUnit::creature();
        unit.flying = true;
        unit.pos = Position::new(10.0, 0.0, 15.0);
        let mut motion = spawned(&mut unit);
        motion.move_circle_path(&mut unit, Position::new(0.0, 0.0, 0.0), 10.0, false, 8).unwrap();
        motion.update(&mut unit, 100);

        let spline = unit.launched.last().unwrap();
        assert_eq!(spline.move_type, MoveType::Flight);
        assert_eq!(spline.animation, Some(crate::AnimTier::ToFly));
        assert!(spline.path.iter().all(|p| (p.z - 15.0).abs() < 1e-6));
    }

    #[test]
    fn launch_move_spline_validates_kind() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        let spline = SplineRequest::to(Position::new(1.0, 0.0, 0.0));
        assert!(motion.launch_move_spline(&mut unit, spline.clone(), 1, MovementPriority::Highest, 99).is_none());
        assert!(motion.launch_move_spline(&mut unit, spline.clone(), 1, MovementPriority::Highest, 1).is_none());

        motion.launch_move_spline(&mut unit, spline, 1, MovementPriority::Highest, 16).unwrap();
        let current = motion.current_generator().unwrap();
        assert_eq!(current.kind(), MovementKind::Effect);
        assert_eq!(current.priority(), MovementPriority::Highest);
    }

    #[test]
    fn land_and_takeoff_play_animation() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_takeoff(&mut unit, 3, Position::new(0.0, 0.0, 20.0)).unwrap();
        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.last().and_then(|s| s.animation), Some(crate::AnimTier::ToFly));
        unit.arrive();
        motion.update(&mut unit, 100);

        motion.move_land(&mut unit, 4, Position::new(0.0, 0.0, 0.0)).unwrap();
        motion.update(&mut unit, 100);
        assert_eq!(unit.launched.last().and_then(|s| s.animation), Some(crate::AnimTier::ToGround));
        assert_eq!(unit.informs, vec![(MovementKind::Effect, 3)]);
    }

    #[test]
    fn generators_info_lists_default_then_stack() {
        let mut unit = TestUnit::creature();
        let mut motion = spawned(&mut unit);
        motion.move_chase(&mut unit, TARGET, None, None).unwrap();
        let info = motion.movement_generators_info(&unit);
        assert_eq!(info.len(), 2);
        assert_eq!(info[0].kind, MovementKind::Idle);
        assert_eq!(info[0].target, None);
        assert_eq!(info[1].kind, MovementKind::Chase);
        assert_eq!(info[1].target, Some(TARGET));
        assert_eq!(info[1].target_name.as_deref(), Some("Boar"));
    }
}

// ── Values ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod values {
    use std::f32::consts::{PI, TAU};

    use crate::{
        ChaseAngle, ChaseRange, DefaultMovement, MotionError, MovementKind, MovementSlot,
    };
    use mm_core::PathId;

    #[test]
    fn chase_range_corrections() {
        let range = ChaseRange::new(5.0);
        assert!(range.contains(3.0));
        assert!(!range.contains(6.0));
        assert_eq!(range.corrected(8.0), 5.0);
        assert_eq!(range.corrected(3.0), 3.0);

        let between = ChaseRange::between(2.0, 10.0);
        assert!(!between.contains(1.0));
        assert!((between.corrected(1.0) - 2.5).abs() < 1e-6);
        assert!((between.corrected(12.0) - 9.5).abs() < 1e-6);
    }

    #[test]
    fn chase_angle_wraps() {
        let behind = ChaseAngle::new(PI);
        assert!(behind.is_angle_okay(PI + 0.5));
        assert!(!behind.is_angle_okay(0.0));
        assert!(ChaseAngle::new(0.1).is_angle_okay(TAU - 0.1));
        assert!(ChaseAngle::with_tolerance(1.0, 0.25).upper_bound() > 1.0);
    }

    #[test]
    fn raw_values_are_validated() {
        assert_eq!(MovementKind::try_from(5), Ok(MovementKind::Chase));
        assert_eq!(MovementKind::try_from(3), Err(MotionError::InvalidKind(3)));
        assert_eq!(MovementSlot::try_from(1), Ok(MovementSlot::Active));
        assert_eq!(MovementSlot::try_from(2), Err(MotionError::InvalidSlot(2)));
        assert!(MovementKind::Waypoint.is_db_kind());
        assert!(!MovementKind::Chase.is_db_kind());
        assert_eq!(MovementKind::TimedFleeing.to_string(), "timed_fleeing");
    }

    #[test]
    fn default_movement_from_data() {
        assert_eq!(
            DefaultMovement::from_db(1, 5.0, PathId(0)),
            Ok(DefaultMovement::Random { wander_distance: 5.0 }),
        );
        assert_eq!(
            DefaultMovement::from_db(2, 0.0, PathId(4)),
            Ok(DefaultMovement::Waypoint { path: PathId(4), repeatable: true }),
        );
        assert_eq!(DefaultMovement::from_db(5, 0.0, PathId(0)), Err(MotionError::NotDefaultKind(5)));
    }
}

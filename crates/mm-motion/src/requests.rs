//! Movement requests: validate, build a generator, hand it to the scheduler.
//!
//! Every `move_*` call returns the new generator's id, or `None` when the
//! request was rejected.  Rejections are logged at `warn` and leave the
//! scheduler untouched.  Accepted requests go through
//! [`MotionMaster::add`], so they are queued like any other mutation while
//! the scheduler is ticking or not yet in the world.

use std::f32::consts::TAU;

use mm_core::{GeneratorId, MoveType, PathId, Position, UnitId, UnitState};

use crate::constants::{event_id, MIN_FALL_HEIGHT, MIN_JUMP_SPEED};
use crate::generator::{
    ChaseMovement, ConfusedMovement, DistractMovement, EffectMovement, FleeingMovement,
    FlightMovement, FollowMovement, HomeMovement, PointMovement, RandomMovement, RotateMovement,
    WaypointMovement,
};
use crate::spline::{jump_apex_height, jump_distance};
use crate::{
    AnimTier, ChaseAngle, ChaseRange, DefaultMovement, Facing, Generator, MotionError,
    MotionMaster, MotionOwner, MotionResult, MovementKind, MovementPriority, MovementSlot,
    RotateDirection, SplineRequest,
};

/// `target`'s position, unless it is the owner itself or does not exist.
fn check_target(owner: &dyn MotionOwner, target: UnitId) -> MotionResult<Position> {
    if target == owner.guid() {
        return Err(MotionError::TargetIsSelf);
    }
    owner.target_position(target).ok_or(MotionError::UnknownTarget(target))
}

fn creature_only(owner: &dyn MotionOwner, request: &'static str) -> MotionResult<()> {
    if owner.is_player() { Err(MotionError::CreatureOnly(request)) } else { Ok(()) }
}

fn player_only(owner: &dyn MotionOwner, request: &'static str) -> MotionResult<()> {
    if owner.is_player() { Ok(()) } else { Err(MotionError::PlayerOnly(request)) }
}

fn check_finite(what: &'static str, value: f32) -> MotionResult<f32> {
    if value.is_finite() { Ok(value) } else { Err(MotionError::NonFinite { what, value }) }
}

/// A distance, radius or speed: finite and not negative.
fn check_length(what: &'static str, value: f32) -> MotionResult<f32> {
    if check_finite(what, value)? < 0.0 {
        return Err(MotionError::Negative { what, value });
    }
    Ok(value)
}

fn check_jump_speed(speed_xy: f32, speed_z: f32) -> MotionResult<()> {
    check_finite("vertical speed", speed_z)?;
    if check_finite("horizontal speed", speed_xy)? < MIN_JUMP_SPEED {
        return Err(MotionError::SpeedTooLow(speed_xy));
    }
    Ok(())
}

/// Log a request rejected before a generator could be built.
fn reject(unit: UnitId, request: &'static str, err: &MotionError) {
    tracing::warn!(%unit, request, error = %err, "movement request rejected");
}

/// `at` dropped onto the floor, or left where it is over the void.
fn grounded(owner: &dyn MotionOwner, mut at: Position) -> Position {
    if let Some(z) = owner.floor_z(at) {
        at.z = z;
    }
    at
}

impl MotionMaster {
    /// Log and add an accepted request; log a rejected one.
    fn submit(
        &mut self,
        owner:   &mut dyn MotionOwner,
        request: &'static str,
        built:   MotionResult<Generator>,
        slot:    MovementSlot,
    ) -> Option<GeneratorId> {
        match built {
            Ok(generator) => {
                let id = generator.id();
                tracing::debug!(unit = %self.owner_id(), request, %id, %slot, "movement request accepted");
                self.add(owner, generator, slot);
                Some(id)
            }
            Err(err) => {
                reject(self.owner_id(), request, &err);
                None
            }
        }
    }

    // ── Default movements ─────────────────────────────────────────────────

    /// Build the generator for a selected default movement.
    pub(crate) fn build_default(
        &mut self,
        owner:    &dyn MotionOwner,
        movement: DefaultMovement,
    ) -> MotionResult<Generator> {
        match movement {
            DefaultMovement::Idle                          => Ok(Generator::idle()),
            DefaultMovement::Random { wander_distance }    => self.random_generator(owner, wander_distance),
            DefaultMovement::Waypoint { path, repeatable } => self.path_generator(path, repeatable),
        }
    }

    fn random_generator(&mut self, owner: &dyn MotionOwner, wander_distance: f32) -> MotionResult<Generator> {
        check_length("wander distance", wander_distance)?;
        creature_only(owner, "random movement")?;
        let rng = self.next_rng();
        let cfg = &self.services().config;
        let strategy = RandomMovement::new(
            wander_distance,
            rng,
            cfg.random_short_pause_ms,
            cfg.random_long_pause_ms,
            cfg.random_long_pause_chance,
        );
        Ok(Generator::new(strategy).with_base_state(UnitState::ROAMING))
    }

    fn path_generator(&self, path: PathId, repeatable: bool) -> MotionResult<Generator> {
        if path.0 == 0 {
            return Err(MotionError::ReservedPath(path));
        }
        let data = self.services().paths.waypoint_path(path).ok_or(MotionError::UnknownPath(path))?;
        Ok(Generator::new(WaypointMovement::new(data, repeatable)).with_base_state(UnitState::ROAMING))
    }

    /// Replace the default with the static idle.
    pub fn move_idle(&mut self, owner: &mut dyn MotionOwner) -> Option<GeneratorId> {
        self.submit(owner, "idle", Ok(Generator::idle()), MovementSlot::Default)
    }

    /// Wander around the current position.  Creatures only.
    pub fn move_random(&mut self, owner: &mut dyn MotionOwner, wander_distance: f32) -> Option<GeneratorId> {
        let built = self.random_generator(&*owner, wander_distance);
        self.submit(owner, "random", built, MovementSlot::Default)
    }

    /// Patrol a loaded waypoint path as the default movement.
    pub fn move_path(&mut self, owner: &mut dyn MotionOwner, path: PathId, repeatable: bool) -> Option<GeneratorId> {
        let built = self.path_generator(path, repeatable);
        self.submit(owner, "path", built, MovementSlot::Default)
    }

    // ── Targeted movements ────────────────────────────────────────────────

    /// Chase `target`.  `range` defaults to contact distance; without `angle`
    /// any side of the target will do.
    pub fn move_chase(
        &mut self,
        owner:  &mut dyn MotionOwner,
        target: UnitId,
        range:  Option<ChaseRange>,
        angle:  Option<ChaseAngle>,
    ) -> Option<GeneratorId> {
        let cfg = &self.services().config;
        let built = check_target(&*owner, target).map(|_| {
            let range = range.unwrap_or_else(|| ChaseRange::new(cfg.contact_distance));
            Generator::new(ChaseMovement::new(target, range, angle, cfg.chase_recheck_ms))
                .with_base_state(UnitState::CHASE)
        });
        self.submit(owner, "chase", built, MovementSlot::Active)
    }

    pub fn move_follow(
        &mut self,
        owner:    &mut dyn MotionOwner,
        target:   UnitId,
        distance: f32,
        angle:    ChaseAngle,
        slot:     MovementSlot,
    ) -> Option<GeneratorId> {
        let built = check_length("follow distance", distance)
            .and_then(|_| check_finite("follow angle", angle.relative_angle))
            .and_then(|_| check_target(&*owner, target))
            .map(|_| self.follow_generator(target, distance, angle));
        self.submit(owner, "follow", built, slot)
    }

    fn follow_generator(&self, target: UnitId, distance: f32, angle: ChaseAngle) -> Generator {
        let cfg = &self.services().config;
        Generator::new(FollowMovement::new(
            target,
            distance,
            angle,
            cfg.contact_distance,
            cfg.follow_recheck_ms,
        ))
        .with_base_state(UnitState::FOLLOW)
    }

    /// Run away from `enemy`.  Creatures given a non-zero `time_ms` stop
    /// fleeing once it runs out.
    pub fn move_fleeing(&mut self, owner: &mut dyn MotionOwner, enemy: UnitId, time_ms: u32) -> Option<GeneratorId> {
        let built = match check_target(&*owner, enemy) {
            Ok(_) => {
                let rng = self.next_rng();
                let cfg = &self.services().config;
                let mut strategy = FleeingMovement::new(enemy, rng, cfg.flee_distance, cfg.flee_pause_ms);
                if !owner.is_player() && time_ms > 0 {
                    strategy = strategy.timed(time_ms);
                }
                Ok(Generator::new(strategy)
                    .with_priority(MovementPriority::Highest)
                    .with_base_state(UnitState::FLEEING))
            }
            Err(err) => Err(err),
        };
        self.submit(owner, "fleeing", built, MovementSlot::Active)
    }

    /// Walk home, or back to the charmer if the unit has one.  Clears the
    /// active stack first.  Creatures only.
    pub fn move_targeted_home(&mut self, owner: &mut dyn MotionOwner) -> Option<GeneratorId> {
        if let Err(err) = creature_only(&*owner, "targeted home") {
            reject(self.owner_id(), "targeted_home", &err);
            return None;
        }
        self.clear(owner);

        let generator = match owner.charmer_or_owner() {
            Some(charmer) => {
                let cfg = &self.services().config;
                let (distance, angle) = (cfg.pet_follow_distance, ChaseAngle::new(cfg.pet_follow_angle));
                self.follow_generator(charmer, distance, angle)
            }
            None => Generator::new(HomeMovement::new()).with_base_state(UnitState::ROAMING),
        };
        self.submit(owner, "targeted_home", Ok(generator), MovementSlot::Active)
    }

    // ── Point movements ───────────────────────────────────────────────────

    /// Move to `destination`; informs `id` on arrival.
    pub fn move_point(
        &mut self,
        owner:             &mut dyn MotionOwner,
        id:                u32,
        destination:       Position,
        generate_path:     bool,
        final_orientation: Option<f32>,
    ) -> Option<GeneratorId> {
        let generator = Generator::new(
            PointMovement::new(id, destination, generate_path).with_final_orientation(final_orientation),
        )
        .with_base_state(UnitState::ROAMING);
        self.submit(owner, "point", Ok(generator), MovementSlot::Active)
    }

    /// Charge to `destination` at `speed` (the configured charge speed when
    /// `None`).
    pub fn move_charge(
        &mut self,
        owner:         &mut dyn MotionOwner,
        destination:   Position,
        speed:         Option<f32>,
        id:            u32,
        generate_path: bool,
    ) -> Option<GeneratorId> {
        let speed = speed.unwrap_or(self.services().config.charge_speed);
        let built = check_length("charge speed", speed).map(|speed| {
            Generator::new(PointMovement::new(id, destination, generate_path).with_speed(speed))
                .with_priority(MovementPriority::Highest)
                .with_base_state(UnitState::CHARGING)
        });
        self.submit(owner, "charge", built, MovementSlot::Active)
    }

    /// Run to `destination` to call for help, then stand distracted.
    /// Creatures only.
    pub fn move_seek_assistance(&mut self, owner: &mut dyn MotionOwner, destination: Position) -> Option<GeneratorId> {
        let distract_ms = self.services().config.assistance_distract_ms;
        let built = creature_only(&*owner, "seek assistance").map(|()| {
            Generator::new(PointMovement::assistance(destination, distract_ms))
                .with_base_state(UnitState::ROAMING)
        });
        self.submit(owner, "seek_assistance", built, MovementSlot::Active)
    }

    /// Stand still facing the current direction for `time_ms`.  Creatures
    /// only.
    pub fn move_seek_assistance_distract(&mut self, owner: &mut dyn MotionOwner, time_ms: u32) -> Option<GeneratorId> {
        let built = creature_only(&*owner, "seek assistance distract").map(|()| {
            Generator::new(DistractMovement::assistance(time_ms, owner.position().orientation))
                .with_base_state(UnitState::DISTRACTED)
        });
        self.submit(owner, "seek_assistance_distract", built, MovementSlot::Active)
    }

    /// Move up to `distance` from `target`, or just face it when already
    /// that close.
    pub fn move_closer_and_stop(
        &mut self,
        owner:    &mut dyn MotionOwner,
        id:       u32,
        target:   UnitId,
        distance: f32,
    ) -> Option<GeneratorId> {
        let checked = check_length("stop distance", distance).and_then(|_| check_target(&*owner, target));
        let target_pos = match checked {
            Ok(pos) => pos,
            Err(err) => {
                reject(self.owner_id(), "closer_and_stop", &err);
                return None;
            }
        };

        let pos = owner.position();
        let travel = pos.distance(target_pos) - distance;
        if travel > 0.0 {
            let mut destination = pos.offset_2d(travel, pos.absolute_angle(target_pos));
            destination.z = target_pos.z;
            self.move_point(owner, id, destination, true, None)
        } else {
            let spline = SplineRequest::to(pos).facing(Facing::Target(target));
            let generator = Generator::new(EffectMovement::new(MovementKind::Effect, id, spline));
            self.submit(owner, "closer_and_stop", Ok(generator), MovementSlot::Active)
        }
    }

    // ── Stationary movements ──────────────────────────────────────────────

    pub fn move_confused(&mut self, owner: &mut dyn MotionOwner) -> Option<GeneratorId> {
        let rng = self.next_rng();
        let cfg = &self.services().config;
        let generator = Generator::new(ConfusedMovement::new(rng, cfg.confused_radius, cfg.confused_pause_ms))
            .with_priority(MovementPriority::Highest)
            .with_base_state(UnitState::CONFUSED);
        self.submit(owner, "confused", Ok(generator), MovementSlot::Active)
    }

    /// Stand still facing `orientation` for `time_ms`.
    pub fn move_distract(&mut self, owner: &mut dyn MotionOwner, time_ms: u32, orientation: f32) -> Option<GeneratorId> {
        let built = check_finite("orientation", orientation).map(|orientation| {
            Generator::new(DistractMovement::new(time_ms, orientation))
                .with_priority(MovementPriority::Highest)
                .with_base_state(UnitState::DISTRACTED)
        });
        self.submit(owner, "distract", built, MovementSlot::Active)
    }

    /// Turn in place for `time_ms`; informs `id` when done.
    pub fn move_rotate(
        &mut self,
        owner:     &mut dyn MotionOwner,
        id:        u32,
        time_ms:   u32,
        direction: RotateDirection,
    ) -> Option<GeneratorId> {
        let built = if time_ms == 0 {
            Err(MotionError::ZeroDuration)
        } else {
            Ok(Generator::new(RotateMovement::new(id, time_ms, direction)).with_base_state(UnitState::ROTATING))
        };
        self.submit(owner, "rotate", built, MovementSlot::Active)
    }

    // ── Flights ───────────────────────────────────────────────────────────

    /// Fly a taxi path from `start_node`.  Players only, one flight at a
    /// time.
    pub fn move_taxi_flight(&mut self, owner: &mut dyn MotionOwner, path: PathId, start_node: u32) -> Option<GeneratorId> {
        let built = self.taxi_generator(&*owner, path, start_node);
        self.submit(owner, "taxi_flight", built, MovementSlot::Active)
    }

    fn taxi_generator(&self, owner: &dyn MotionOwner, path: PathId, start_node: u32) -> MotionResult<Generator> {
        player_only(owner, "taxi flight")?;
        let data = self.services().paths.taxi_path(path).ok_or(MotionError::UnknownPath(path))?;
        if self.has_movement_generator(|g| g.kind() == MovementKind::Flight, MovementSlot::Active) {
            return Err(MotionError::DuplicateFlight);
        }
        Ok(Generator::new(FlightMovement::new(data, start_node))
            .with_priority(MovementPriority::Highest)
            .with_base_state(UnitState::IN_FLIGHT))
    }

    // ── Effects (one prepared spline each) ────────────────────────────────

    fn effect(&self, id: u32, spline: SplineRequest) -> Generator {
        Generator::new(EffectMovement::new(MovementKind::Effect, id, spline))
    }

    /// Jump to `destination` on a parabolic arc.
    pub fn move_jump(
        &mut self,
        owner:           &mut dyn MotionOwner,
        destination:     Position,
        speed_xy:        f32,
        speed_z:         f32,
        id:              u32,
        has_orientation: bool,
    ) -> Option<GeneratorId> {
        let built = check_jump_speed(speed_xy, speed_z).map(|()| {
            let mut spline = SplineRequest::to(destination)
                .parabolic(jump_apex_height(speed_z))
                .velocity(speed_xy);
            if has_orientation {
                spline = spline.facing(Facing::Angle(destination.orientation));
            }
            self.effect(id, spline)
                .with_priority(MovementPriority::Highest)
                .with_base_state(UnitState::JUMPING)
        });
        self.submit(owner, "jump", built, MovementSlot::Active)
    }

    /// Jump `angle` radians off the current facing, as far as the speeds
    /// carry.  Creatures only.
    pub fn move_jump_to(
        &mut self,
        owner:    &mut dyn MotionOwner,
        angle:    f32,
        speed_xy: f32,
        speed_z:  f32,
    ) -> Option<GeneratorId> {
        let checked = creature_only(&*owner, "jump to")
            .and_then(|()| check_finite("jump angle", angle))
            .and_then(|_| check_jump_speed(speed_xy, speed_z));
        if let Err(err) = checked {
            reject(self.owner_id(), "jump_to", &err);
            return None;
        }
        let pos = owner.position();
        let destination = grounded(&*owner, pos.offset_2d(jump_distance(speed_xy, speed_z), pos.orientation + angle));
        self.move_jump(owner, destination, speed_xy, speed_z, event_id::JUMP, false)
    }

    /// Knock the unit away from `origin`.  Creatures only.
    pub fn move_knockback_from(
        &mut self,
        owner:    &mut dyn MotionOwner,
        origin:   Position,
        speed_xy: f32,
        speed_z:  f32,
    ) -> Option<GeneratorId> {
        let built = creature_only(&*owner, "knockback")
            .and_then(|()| check_jump_speed(speed_xy, speed_z))
            .map(|()| {
                let pos = owner.position();
                let dist = jump_distance(speed_xy, speed_z);
                let destination = grounded(&*owner, pos.offset_2d(dist, origin.absolute_angle(pos)));
                let spline = SplineRequest::to(destination)
                    .parabolic(jump_apex_height(speed_z))
                    .orientation_fixed()
                    .velocity(speed_xy);
                self.effect(0, spline).with_priority(MovementPriority::Highest)
            });
        self.submit(owner, "knockback", built, MovementSlot::Active)
    }

    /// Drop to the floor below.  Creatures only.
    pub fn move_fall(&mut self, owner: &mut dyn MotionOwner, id: u32) -> Option<GeneratorId> {
        let built = self.fall_generator(&*owner, id);
        self.submit(owner, "fall", built, MovementSlot::Active)
    }

    fn fall_generator(&self, owner: &dyn MotionOwner, id: u32) -> MotionResult<Generator> {
        let pos = owner.position();
        let floor = owner.floor_z(pos).ok_or(MotionError::NoFloor)?;
        if (pos.z - floor).abs() <= MIN_FALL_HEIGHT {
            return Err(MotionError::AlreadyOnGround);
        }
        if owner.has_unit_state(UnitState::ROOT | UnitState::STUNNED) {
            return Err(MotionError::Rooted);
        }
        creature_only(owner, "fall")?;

        let destination = Position { z: floor, ..pos };
        Ok(self.effect(id, SplineRequest::to(destination).fall()).with_priority(MovementPriority::Highest))
    }

    pub fn move_land(&mut self, owner: &mut dyn MotionOwner, id: u32, destination: Position) -> Option<GeneratorId> {
        let generator = self.effect(id, SplineRequest::to(destination).animation(AnimTier::ToGround));
        self.submit(owner, "land", Ok(generator), MovementSlot::Active)
    }

    pub fn move_takeoff(&mut self, owner: &mut dyn MotionOwner, id: u32, destination: Position) -> Option<GeneratorId> {
        let generator = self.effect(id, SplineRequest::to(destination).animation(AnimTier::ToFly));
        self.submit(owner, "takeoff", Ok(generator), MovementSlot::Active)
    }

    /// Circle `center` forever in `steps` legs, starting from the current
    /// position.
    pub fn move_circle_path(
        &mut self,
        owner:     &mut dyn MotionOwner,
        center:    Position,
        radius:    f32,
        clockwise: bool,
        steps:     u8,
    ) -> Option<GeneratorId> {
        let built = if steps < 2 {
            Err(MotionError::TooFewSteps(steps))
        } else if let Err(err) = check_length("circle radius", radius) {
            Err(err)
        } else {
            let pos = owner.position();
            let flying = owner.is_flying();
            let step = TAU / f32::from(steps) * if clockwise { -1.0 } else { 1.0 };
            let start = center.absolute_angle(pos);

            let mut path = Vec::with_capacity(usize::from(steps));
            path.push(pos);
            for i in 1..steps {
                let mut point = center.offset_2d(radius, start + step * f32::from(i));
                point.z = if flying { pos.z } else { owner.floor_z(point).unwrap_or(center.z) };
                path.push(point);
            }

            let spline = SplineRequest::along(path).cyclic();
            let spline = if flying {
                spline.move_type(MoveType::Flight).animation(AnimTier::ToFly)
            } else {
                spline.move_type(MoveType::Walk)
            };
            Ok(self.effect(0, spline))
        };
        self.submit(owner, "circle_path", built, MovementSlot::Active)
    }

    /// Play a caller-prepared spline as an active generator of kind `kind`
    /// (raw value, validated).
    pub fn launch_move_spline(
        &mut self,
        owner:    &mut dyn MotionOwner,
        spline:   SplineRequest,
        id:       u32,
        priority: MovementPriority,
        kind:     u8,
    ) -> Option<GeneratorId> {
        let built = MovementKind::try_from(kind).and_then(|k| {
            if k.is_db_kind() {
                return Err(MotionError::InvalidKind(kind));
            }
            Ok(Generator::new(EffectMovement::new(k, id, spline)).with_priority(priority))
        });
        self.submit(owner, "launch_move_spline", built, MovementSlot::Active)
    }
}

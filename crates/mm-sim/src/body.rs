//! Unit bodies: the physical side of a simulated unit.
//!
//! A body owns its position, speeds and unit-state bits, and moves along the
//! most recently launched spline in straight segments.  There is no
//! pathfinding and no physics: a jump arc is flown as a straight line at the
//! requested horizontal speed.

use mm_core::{MoveType, Position, UnitId, UnitState};
use mm_motion::{DefaultMovement, Facing, SplineRequest};

/// How a unit enters the world.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnitSpec {
    pub id:               UnitId,
    pub name:             String,
    pub position:         Position,
    /// Evade position; defaults to the spawn position.
    #[cfg_attr(feature = "serde", serde(default))]
    pub home:             Option<Position>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub player:           bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub flying:           bool,
    #[cfg_attr(feature = "serde", serde(default = "default_walk_speed"))]
    pub walk_speed:       f32,
    #[cfg_attr(feature = "serde", serde(default = "default_run_speed"))]
    pub run_speed:        f32,
    #[cfg_attr(feature = "serde", serde(default = "default_flight_speed"))]
    pub flight_speed:     f32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_movement: DefaultMovement,
}

fn default_walk_speed() -> f32 {
    2.5
}

fn default_run_speed() -> f32 {
    7.0
}

fn default_flight_speed() -> f32 {
    7.0
}

impl UnitSpec {
    pub fn creature(id: UnitId, name: impl Into<String>, position: Position) -> Self {
        Self {
            id,
            name:             name.into(),
            position,
            home:             None,
            player:           false,
            flying:           false,
            walk_speed:       default_walk_speed(),
            run_speed:        default_run_speed(),
            flight_speed:     default_flight_speed(),
            default_movement: DefaultMovement::Idle,
        }
    }

    pub fn player(id: UnitId, name: impl Into<String>, position: Position) -> Self {
        Self { player: true, ..Self::creature(id, name, position) }
    }

    pub fn default_movement(mut self, movement: DefaultMovement) -> Self {
        self.default_movement = movement;
        self
    }

    pub fn home(mut self, home: Position) -> Self {
        self.home = Some(home);
        self
    }
}

// ── Spline driver ─────────────────────────────────────────────────────────────

/// Progress along one launched spline.
#[derive(Clone, Debug, PartialEq)]
pub struct SplineDriver {
    points:            Vec<Position>,
    next:              usize,
    speed:             f32,
    cyclic:            bool,
    facing:            Option<Facing>,
    orientation_fixed: bool,
}

impl SplineDriver {
    pub fn destination(&self) -> Option<Position> {
        self.points.last().copied()
    }

    fn loop_length(&self) -> f32 {
        let closing = match (self.points.last(), self.points.first()) {
            (Some(&last), Some(&first)) => last.distance(first),
            _ => 0.0,
        };
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum::<f32>() + closing
    }
}

/// One unit's physical state.
#[derive(Clone, Debug)]
pub struct UnitBody {
    pub id:               UnitId,
    pub name:             String,
    pub position:         Position,
    pub home:             Position,
    pub player:           bool,
    pub alive:            bool,
    pub flying:           bool,
    /// `false` once despawned.
    pub in_world:         bool,
    pub unit_state:       UnitState,
    pub default_movement: DefaultMovement,
    walk_speed:           f32,
    run_speed:            f32,
    flight_speed:         f32,
    spline:               Option<SplineDriver>,
    /// Splines launched over the body's lifetime.
    pub splines_launched: u64,
}

impl UnitBody {
    pub fn from_spec(spec: UnitSpec) -> Self {
        Self {
            id:               spec.id,
            home:             spec.home.unwrap_or(spec.position),
            name:             spec.name,
            position:         spec.position,
            player:           spec.player,
            alive:            true,
            flying:           spec.flying,
            in_world:         true,
            unit_state:       UnitState::empty(),
            default_movement: spec.default_movement,
            walk_speed:       spec.walk_speed,
            run_speed:        spec.run_speed,
            flight_speed:     spec.flight_speed,
            spline:           None,
            splines_launched: 0,
        }
    }

    pub fn speed(&self, move_type: MoveType) -> f32 {
        match move_type {
            MoveType::Walk   => self.walk_speed,
            MoveType::Run    => self.run_speed,
            MoveType::Flight => self.flight_speed,
        }
    }

    /// Speed used by every spline from now on.  Running splines keep theirs
    /// until the scheduler relaunches them.
    pub fn set_speed(&mut self, move_type: MoveType, speed: f32) {
        match move_type {
            MoveType::Walk   => self.walk_speed = speed,
            MoveType::Run    => self.run_speed = speed,
            MoveType::Flight => self.flight_speed = speed,
        }
    }

    #[inline]
    pub fn is_moving(&self) -> bool {
        self.spline.is_some()
    }

    pub fn spline(&self) -> Option<&SplineDriver> {
        self.spline.as_ref()
    }

    /// Start a new spline, replacing the running one.  Returns the travel
    /// time in milliseconds.
    pub fn launch(&mut self, request: SplineRequest) -> u32 {
        self.splines_launched += 1;
        let speed = request
            .velocity
            .unwrap_or_else(|| self.speed(request.move_type))
            .max(f32::EPSILON);

        let mut length = 0.0;
        let mut from = self.position;
        for &point in &request.path {
            length += from.distance(point);
            from = point;
        }

        if request.path.is_empty() {
            self.spline = None;
            if let Some(facing) = request.facing {
                self.apply_facing(facing);
            }
            return 0;
        }

        self.spline = Some(SplineDriver {
            points:            request.path,
            next:              0,
            speed,
            cyclic:            request.cyclic,
            facing:            request.facing,
            orientation_fixed: request.orientation_fixed,
        });
        (length / speed * 1_000.0).round() as u32
    }

    pub fn stop(&mut self) {
        self.spline = None;
    }

    /// Move along the running spline for `diff_ms`.  Returns `true` if the
    /// spline finished during this call.
    pub fn advance(&mut self, diff_ms: u32) -> bool {
        let Some(mut driver) = self.spline.take() else {
            return false;
        };
        let mut budget = driver.speed * diff_ms as f32 / 1_000.0;

        loop {
            let Some(&target) = driver.points.get(driver.next) else {
                if let Some(facing) = driver.facing {
                    self.apply_facing(facing);
                }
                return true;
            };
            let dist = self.position.distance(target);
            if dist > budget {
                let t = budget / dist;
                let orientation = if driver.orientation_fixed {
                    self.position.orientation
                } else {
                    self.position.absolute_angle(target)
                };
                self.position = Position {
                    x: self.position.x + (target.x - self.position.x) * t,
                    y: self.position.y + (target.y - self.position.y) * t,
                    z: self.position.z + (target.z - self.position.z) * t,
                    orientation,
                };
                self.spline = Some(driver);
                return false;
            }

            budget -= dist;
            let orientation = self.position.orientation;
            self.position = target.with_orientation(orientation);
            driver.next += 1;
            if driver.cyclic && driver.next == driver.points.len() {
                driver.next = 0;
                if budget <= 0.0 || driver.loop_length() < f32::EPSILON {
                    self.spline = Some(driver);
                    return false;
                }
            }
        }
    }

    fn apply_facing(&mut self, facing: Facing) {
        match facing {
            Facing::Angle(angle) => self.position = self.position.with_orientation(angle),
            Facing::Point(point) => {
                let angle = self.position.absolute_angle(point);
                self.position = self.position.with_orientation(angle);
            }
            // Converted to a point before launch.
            Facing::Target(_) => {}
        }
    }
}

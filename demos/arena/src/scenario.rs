//! Arena scenario: units, scripted rules and patrol paths.
//!
//! A scenario is either the built-in ambush below or a JSON file:
//!
//! ```json
//! {
//!   "config":    { "tick_ms": 100, "total_ticks": 300, "seed": 7, "output_interval_ticks": 1 },
//!   "motion":    { "seed": 7 },
//!   "waypoints": "patrol.csv",
//!   "units":     [ { "id": 1, "name": "Gatekeeper", "position": { "x": 0, "y": 0, "z": 0, "orientation": 0 } } ],
//!   "rules":     [ { "unit": 1, "trigger": { "on": "at_tick", "tick": 5 }, "intents": [ { "type": "confused" } ] } ]
//! }
//! ```
//!
//! `waypoints` is resolved relative to the scenario file.

use std::f32::consts::PI;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use mm_behavior::{MovementIntent, ScriptedRule, Trigger};
use mm_core::{PathId, Position, SimConfig, Tick, UnitId};
use mm_motion::{DefaultMovement, MotionConfig, MovementKind};
use mm_paths::{WaypointPath, load_waypoints_csv, load_waypoints_reader};
use mm_sim::UnitSpec;

// ── Built-in scenario constants ───────────────────────────────────────────────

const SEED:                  u64 = 42;
const TICK_MS:               u32 = 100;
const TOTAL_TICKS:           u64 = 600; // one minute
const OUTPUT_INTERVAL_TICKS: u64 = 5;

const GATEKEEPER: UnitId = UnitId(1);
const WOLF:       UnitId = UnitId(2);
const HUNTER:     UnitId = UnitId(3);
const RAVEN:      UnitId = UnitId(4);

const PATROL: PathId = PathId(1);

// Square patrol around the gate; the keeper looks outwards at each corner.
const PATROL_CSV: &str = "\
path_id,node_id,x,y,z,orientation,delay_ms,move_type\n\
1,0,10.0,-10.0,0.0,,0,walk\n\
1,1,10.0,10.0,0.0,0.785,2000,walk\n\
1,2,-10.0,10.0,0.0,,0,walk\n\
1,3,-10.0,-10.0,0.0,3.927,2000,run\n\
";

// ── Scenario ──────────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct Scenario {
    pub config: SimConfig,
    #[serde(default)]
    pub motion: MotionConfig,
    /// Waypoint CSV path.  Ignored by the built-in scenario.
    #[serde(default)]
    waypoints:  Option<PathBuf>,
    pub units:  Vec<UnitSpec>,
    #[serde(default)]
    pub rules:  Vec<ScriptedRule>,
    #[serde(skip)]
    pub paths:  Vec<WaypointPath>,
}

impl Scenario {
    /// Read a JSON scenario and the waypoint file it names.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading scenario {}", path.display()))?;
        let mut scenario: Scenario = serde_json::from_str(&text)
            .with_context(|| format!("parsing scenario {}", path.display()))?;

        if let Some(file) = scenario.waypoints.take() {
            let file = path.parent().unwrap_or(Path::new(".")).join(file);
            scenario.paths = load_waypoints_csv(&file)
                .with_context(|| format!("loading waypoints {}", file.display()))?;
        }
        Ok(scenario)
    }

    /// A gatekeeper on patrol, a wolf that stalks the hunter, the hunter
    /// crossing the arena and a raven circling overhead.
    pub fn ambush() -> Result<Self> {
        let config = SimConfig {
            tick_ms:               TICK_MS,
            total_ticks:           TOTAL_TICKS,
            seed:                  SEED,
            num_threads:           None,
            output_interval_ticks: OUTPUT_INTERVAL_TICKS,
        };
        let motion = MotionConfig { seed: SEED, ..MotionConfig::default() };

        let units = vec![
            UnitSpec::creature(GATEKEEPER, "Gatekeeper", Position::new(10.0, -10.0, 0.0))
                .default_movement(DefaultMovement::Waypoint { path: PATROL, repeatable: true }),
            UnitSpec::creature(WOLF, "Timber Wolf", Position::new(-25.0, 20.0, 0.0))
                .default_movement(DefaultMovement::Random { wander_distance: 8.0 }),
            UnitSpec::player(HUNTER, "Hunter", Position::new(30.0, 0.0, 0.0)),
            UnitSpec { flying: true, ..UnitSpec::creature(RAVEN, "Raven", Position::new(0.0, 0.0, 15.0)) },
        ];

        let there = Position::new(-30.0, 0.0, 0.0);
        let back = Position::new(30.0, 5.0, 0.0);
        let rules = vec![
            // Hunter walks across and back, forever.
            ScriptedRule::new(HUNTER, Trigger::AtTick { tick: Tick(0) }, vec![point(1, there)]),
            ScriptedRule::new(
                HUNTER,
                Trigger::OnInform { kind: MovementKind::Point, id: Some(1) },
                vec![point(2, back)],
            ),
            ScriptedRule::new(
                HUNTER,
                Trigger::OnInform { kind: MovementKind::Point, id: Some(2) },
                vec![point(1, there)],
            ),
            // Wolf stalks the hunter when close and sometimes loses its nerve.
            ScriptedRule::new(
                WOLF,
                Trigger::TargetWithin { target: HUNTER, distance: 20.0 },
                vec![MovementIntent::Chase { target: HUNTER, range: None, angle: None }],
            )
            .unless_kind(MovementKind::Chase),
            ScriptedRule::new(
                WOLF,
                Trigger::Every { period: 100, offset: 99 },
                vec![MovementIntent::Flee { enemy: HUNTER, time_ms: 3_000 }],
            )
            .chance(0.5),
            // Gatekeeper glances around at the far corner.
            ScriptedRule::new(
                GATEKEEPER,
                Trigger::OnWaypointReached { path: PATROL, node: Some(2) },
                vec![MovementIntent::Distract { time_ms: 1_500, orientation: PI }],
            ),
            // Raven circles the gate.
            ScriptedRule::new(
                RAVEN,
                Trigger::AtTick { tick: Tick(10) },
                vec![MovementIntent::CirclePath {
                    center:    Position::new(0.0, 0.0, 15.0),
                    radius:    12.0,
                    clockwise: true,
                    steps:     16,
                }],
            ),
        ];

        let paths = load_waypoints_reader(Cursor::new(PATROL_CSV))?;
        Ok(Self { config, motion, waypoints: None, units, rules, paths })
    }

    pub fn unit_ids(&self) -> Vec<UnitId> {
        self.units.iter().map(|u| u.id).collect()
    }
}

fn point(id: u32, destination: Position) -> MovementIntent {
    MovementIntent::Point { id, destination, generate_path: true, final_orientation: None }
}

//! Rule-driven AI: a table of "when X, request Y" entries per unit.

use mm_core::{PathId, Tick, UnitId, UnitRng};
use mm_motion::MovementKind;
use rustc_hash::FxHashMap;

use crate::{AiContext, BehaviorError, BehaviorResult, CreatureAi, MovementIntent};

// ── Rules ─────────────────────────────────────────────────────────────────────

/// When a [`ScriptedRule`] fires.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "on", rename_all = "snake_case"))]
pub enum Trigger {
    /// Exactly once, at the given tick.
    AtTick { tick: Tick },
    /// Every `period` ticks starting at `offset`.
    Every { period: u64, offset: u64 },
    /// A generator of this kind concluded; `id` narrows to one point id.
    OnInform { kind: MovementKind, id: Option<u32> },
    /// A waypoint path reached a node; `node: None` matches every node.
    OnWaypointReached { path: PathId, node: Option<u32> },
    /// `target` is alive and within `distance` yards on the plane.
    TargetWithin { target: UnitId, distance: f32 },
}

impl Trigger {
    /// Evaluated during `think`.  Event triggers never match here.
    fn matches_tick(&self, unit: UnitId, ctx: &AiContext<'_>) -> bool {
        match *self {
            Trigger::AtTick { tick } => ctx.tick == tick,
            Trigger::Every { period, offset } => {
                period > 0 && ctx.tick.0 >= offset && (ctx.tick.0 - offset) % period == 0
            }
            Trigger::TargetWithin { target, distance } => {
                ctx.unit(target).is_some_and(|t| t.alive)
                    && ctx.distance_2d(unit, target).is_some_and(|d| d <= distance)
            }
            Trigger::OnInform { .. } | Trigger::OnWaypointReached { .. } => false,
        }
    }
}

/// One entry of a [`ScriptedAi`] table.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScriptedRule {
    pub unit:        UnitId,
    pub trigger:     Trigger,
    pub intents:     Vec<MovementIntent>,
    /// Skip while the unit is already driven by this kind.
    #[cfg_attr(feature = "serde", serde(default))]
    pub unless_kind: Option<MovementKind>,
    /// Probability of firing when the trigger matches.  Only tick triggers
    /// roll; event triggers always fire.
    #[cfg_attr(feature = "serde", serde(default))]
    pub chance:      Option<f64>,
}

impl ScriptedRule {
    pub fn new(unit: UnitId, trigger: Trigger, intents: Vec<MovementIntent>) -> Self {
        Self { unit, trigger, intents, unless_kind: None, chance: None }
    }

    pub fn unless_kind(mut self, kind: MovementKind) -> Self {
        self.unless_kind = Some(kind);
        self
    }

    pub fn chance(mut self, chance: f64) -> Self {
        self.chance = Some(chance);
        self
    }
}

// ── ScriptedAi ────────────────────────────────────────────────────────────────

/// A [`CreatureAi`] driven by a static rule table.
///
/// Rules of one unit are checked in insertion order and every matching rule
/// contributes its intents.
#[derive(Clone, Debug, Default)]
pub struct ScriptedAi {
    rules: FxHashMap<UnitId, Vec<ScriptedRule>>,
}

impl ScriptedAi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_rules(rules: impl IntoIterator<Item = ScriptedRule>) -> Self {
        let mut ai = Self::new();
        for rule in rules {
            ai.add_rule(rule);
        }
        ai
    }

    pub fn add_rule(&mut self, rule: ScriptedRule) {
        self.rules.entry(rule.unit).or_default().push(rule);
    }

    pub fn with_rule(mut self, rule: ScriptedRule) -> Self {
        self.add_rule(rule);
        self
    }

    pub fn rules_for(&self, unit: UnitId) -> &[ScriptedRule] {
        self.rules.get(&unit).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn rule_count(&self) -> usize {
        self.rules.values().map(Vec::len).sum()
    }

    /// Check every rule against the set of units that will exist in the run.
    pub fn validate(&self, known: &[UnitId]) -> BehaviorResult<()> {
        for (&unit, rules) in &self.rules {
            for (index, rule) in rules.iter().enumerate() {
                if let Trigger::Every { period: 0, .. } = rule.trigger {
                    return Err(BehaviorError::Config(format!(
                        "rule {index} of {unit}: `every` needs a non-zero period"
                    )));
                }
                if let Some(chance) = rule.chance.filter(|c| !(0.0..=1.0).contains(c)) {
                    return Err(BehaviorError::Config(format!(
                        "rule {index} of {unit}: chance {chance} outside [0, 1]"
                    )));
                }
                let trigger_target = match rule.trigger {
                    Trigger::TargetWithin { target, .. } => Some(target),
                    _ => None,
                };
                let targets = trigger_target
                    .into_iter()
                    .chain(rule.intents.iter().filter_map(MovementIntent::target));
                for target in targets {
                    if !known.contains(&target) {
                        return Err(BehaviorError::UnknownUnit { unit, rule: index, target });
                    }
                }
            }
        }
        Ok(())
    }

    fn fire<'a>(
        &'a self,
        unit:    UnitId,
        matches: impl Fn(&Trigger) -> bool + 'a,
    ) -> impl Iterator<Item = MovementIntent> + 'a {
        self.rules_for(unit)
            .iter()
            .filter(move |rule| matches(&rule.trigger))
            .flat_map(|rule| rule.intents.iter().cloned())
    }
}

impl CreatureAi for ScriptedAi {
    fn think(
        &self,
        unit: UnitId,
        ctx:  &AiContext<'_>,
        rng:  &mut UnitRng,
    ) -> Vec<MovementIntent> {
        let current = ctx.unit(unit).and_then(|u| u.current_kind);
        let mut intents = Vec::new();
        for rule in self.rules_for(unit) {
            if !rule.trigger.matches_tick(unit, ctx) {
                continue;
            }
            if rule.unless_kind.is_some() && rule.unless_kind == current {
                continue;
            }
            if rule.chance.is_some_and(|chance| !rng.gen_bool(chance)) {
                continue;
            }
            tracing::trace!(unit = %unit, tick = %ctx.tick, "scripted rule fired");
            intents.extend(rule.intents.iter().cloned());
        }
        intents
    }

    fn movement_inform(&self, unit: UnitId, kind: MovementKind, id: u32) -> Vec<MovementIntent> {
        self.fire(unit, move |trigger| {
            matches!(*trigger, Trigger::OnInform { kind: k, id: want }
                if k == kind && want.is_none_or(|w| w == id))
        })
        .collect()
    }

    fn waypoint_reached(&self, unit: UnitId, path: PathId, node: u32) -> Vec<MovementIntent> {
        self.fire(unit, move |trigger| {
            matches!(*trigger, Trigger::OnWaypointReached { path: p, node: want }
                if p == path && want.is_none_or(|w| w == node))
        })
        .collect()
    }
}

//! Active attacks: damage distribution, hit outcomes, side effects, and
//! the weight-shifting customization players use between battles.
//!
//! An attack's damage never lives as state. The per-element distribution is
//! derived from the user's level and the attack's own stats on every read,
//! so customization and level-ups are reflected immediately.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::trace;

use crate::character::Character;
use crate::rolls;
use crate::stats::{Boost, Element, Formula, Stat};

/// Step size for damage-weight customization.
pub const WEIGHT_QUANTUM: f64 = 12.5;

/// Baseline damage for a hit at the given level, before multipliers.
/// A level-1 hit is worth a fifth of a standard 100 HP pool; each level
/// past the first adds 5% of that.
pub fn hit_base(level: u8) -> f64 {
    20.0 * (1.0 + 0.05 * f64::from(level.saturating_sub(1)))
}

/// Rejected damage-weight edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CustomizeError {
    #[error("cannot raise and lower the same {0} weight")]
    SameWeight(Element),
    #[error("the {0} damage weight cannot go any lower")]
    WeightAtFloor(Element),
}

/// How a primary hit landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Miss,
    Normal,
    Critical,
}

impl HitOutcome {
    /// Battle-text flourish for the outcome, if it warrants one.
    pub fn narrative(&self) -> Option<&'static str> {
        match self {
            HitOutcome::Miss => Some("A glancing blow!"),
            HitOutcome::Critical => Some("A critical hit!"),
            HitOutcome::Normal => None,
        }
    }
}

/// A boost an attack may inflict on whoever it damages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SideEffect {
    pub boost: Boost,
    /// Trigger chance in percent.
    pub chance: f64,
}

/// Save-file discriminator for the two attack families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveKind {
    #[serde(rename = "ElementalAttack")]
    Elemental,
    #[serde(rename = "MeleeAttack")]
    Melee,
}

fn default_attack_base() -> f64 {
    10.0
}

fn default_weight_bases() -> BTreeMap<Element, f64> {
    Element::ALL.iter().map(|el| (*el, 10.0)).collect()
}

/// Plain base values for an attack's stats; the serialized shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackBases {
    #[serde(default = "default_attack_base")]
    pub damage_multiplier: f64,
    #[serde(default)]
    pub cleave: f64,
    #[serde(default = "default_attack_base")]
    pub miss_chance: f64,
    #[serde(default = "default_attack_base")]
    pub crit_chance: f64,
    #[serde(default = "default_attack_base")]
    pub miss_multiplier: f64,
    #[serde(default = "default_attack_base")]
    pub crit_multiplier: f64,
    #[serde(default = "default_weight_bases")]
    pub weights: BTreeMap<Element, f64>,
}

impl Default for AttackBases {
    fn default() -> Self {
        Self {
            damage_multiplier: default_attack_base(),
            cleave: 0.0,
            miss_chance: default_attack_base(),
            crit_chance: default_attack_base(),
            miss_multiplier: default_attack_base(),
            crit_multiplier: default_attack_base(),
            weights: default_weight_bases(),
        }
    }
}

/// An attack's live stats. Serializes as bare bases, the same trade as a
/// character's stat block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "AttackBases", into = "AttackBases")]
pub struct AttackStats {
    pub multiplier: Stat,
    pub cleave: Stat,
    pub miss_chance: Stat,
    pub crit_chance: Stat,
    pub miss_multiplier: Stat,
    pub crit_multiplier: Stat,
    pub weights: BTreeMap<Element, Stat>,
}

impl From<AttackBases> for AttackStats {
    fn from(bases: AttackBases) -> Self {
        let weights = Element::ALL
            .iter()
            .map(|el| {
                let base = bases.weights.get(el).copied().unwrap_or(0.0);
                (*el, Stat::new(Formula::DamageWeight, base))
            })
            .collect();
        Self {
            multiplier: Stat::new(Formula::DamageMultiplier, bases.damage_multiplier),
            cleave: Stat::new(Formula::Cleave, bases.cleave),
            miss_chance: Stat::new(Formula::MissChance, bases.miss_chance),
            crit_chance: Stat::new(Formula::CritChance, bases.crit_chance),
            miss_multiplier: Stat::new(Formula::MissMultiplier, bases.miss_multiplier),
            crit_multiplier: Stat::new(Formula::CritMultiplier, bases.crit_multiplier),
            weights,
        }
    }
}

impl From<AttackStats> for AttackBases {
    fn from(stats: AttackStats) -> Self {
        Self {
            damage_multiplier: stats.multiplier.base,
            cleave: stats.cleave.base,
            miss_chance: stats.miss_chance.base,
            crit_chance: stats.crit_chance.base,
            miss_multiplier: stats.miss_multiplier.base,
            crit_multiplier: stats.crit_multiplier.base,
            weights: stats.weights.iter().map(|(el, s)| (*el, s.base)).collect(),
        }
    }
}

impl Default for AttackStats {
    fn default() -> Self {
        AttackBases::default().into()
    }
}

/// A usable attack.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Active {
    #[serde(rename = "type")]
    pub kind: ActiveKind,
    pub name: String,
    #[serde(default)]
    pub energy_cost: i32,
    #[serde(default)]
    pub stats: AttackStats,
    #[serde(default)]
    pub side_effects: Vec<SideEffect>,
}

impl Active {
    /// An element-flavored attack with an energy cost.
    pub fn elemental(name: impl Into<String>, multiplier_base: f64, energy_cost: i32) -> Self {
        let mut stats = AttackStats::default();
        stats.multiplier.base = multiplier_base;
        Self {
            kind: ActiveKind::Elemental,
            name: name.into(),
            energy_cost,
            stats,
            side_effects: Vec::new(),
        }
    }

    /// A free basic attack with explicit chance and multiplier bases.
    pub fn melee(
        name: impl Into<String>,
        multiplier_base: f64,
        miss_chance_base: f64,
        crit_chance_base: f64,
        miss_multiplier_base: f64,
        crit_multiplier_base: f64,
    ) -> Self {
        let mut attack = Self::elemental(name, multiplier_base, 0);
        attack.kind = ActiveKind::Melee;
        attack.stats.miss_chance.base = miss_chance_base;
        attack.stats.crit_chance.base = crit_chance_base;
        attack.stats.miss_multiplier.base = miss_multiplier_base;
        attack.stats.crit_multiplier.base = crit_multiplier_base;
        attack
    }

    pub fn with_cleave(mut self, base: f64) -> Self {
        self.stats.cleave.base = base;
        self
    }

    pub fn with_crit_chance(mut self, base: f64) -> Self {
        self.stats.crit_chance.base = base;
        self
    }

    pub fn with_side_effect(mut self, boost: Boost, chance: f64) -> Self {
        self.side_effects.push(SideEffect { boost, chance });
        self
    }

    pub fn set_weight_base(&mut self, element: Element, base: f64) {
        self.weight_stat_mut(element).base = base;
    }

    pub fn weight_base(&self, element: Element) -> f64 {
        self.stats.weights.get(&element).map_or(0.0, |s| s.base)
    }

    fn weight_stat_mut(&mut self, element: Element) -> &mut Stat {
        self.stats
            .weights
            .entry(element)
            .or_insert_with(|| Stat::new(Formula::DamageWeight, 0.0))
    }

    /// Whether `user` can afford this attack right now.
    pub fn can_use(&self, user: &Character) -> bool {
        user.energy() >= self.energy_cost
    }

    /// Split the attack's total damage across the elements, proportional to
    /// each damage weight. Recomputed on every call; weights need not sum
    /// to anything in particular, and an all-zero split deals nothing.
    pub fn damage_distribution(&self, user_level: u8) -> BTreeMap<Element, f64> {
        let total = hit_base(user_level) * self.stats.multiplier.value();
        let split: f64 = self.stats.weights.values().map(Stat::value).sum();
        Element::ALL
            .iter()
            .map(|el| {
                let share = if split.abs() < f64::EPSILON {
                    0.0
                } else {
                    total / split * self.stats.weights.get(el).map_or(0.0, Stat::value)
                };
                (*el, share)
            })
            .collect()
    }

    /// Total damage of a normal hit at the given level.
    pub fn total_damage(&self, user_level: u8) -> f64 {
        self.damage_distribution(user_level).values().sum()
    }

    /// Classify a percentage roll. The miss check runs first, so when the
    /// miss and crit ranges overlap the miss wins. Chances are clamped to
    /// [0, 100] here, at the point of use.
    pub fn outcome_for_roll(&self, roll: f64) -> HitOutcome {
        let miss = self.stats.miss_chance.value().clamp(0.0, 100.0);
        let crit = self.stats.crit_chance.value().clamp(0.0, 100.0);
        if roll <= miss {
            HitOutcome::Miss
        } else if roll >= 100.0 - crit {
            HitOutcome::Critical
        } else {
            HitOutcome::Normal
        }
    }

    /// Draw the miss/crit roll with the user's luck and classify it.
    pub fn roll_outcome<R: Rng>(&self, user_luck: f64, rng: &mut R) -> HitOutcome {
        let roll = rolls::percentage_with_rng(rng, user_luck);
        let outcome = self.outcome_for_roll(roll);
        trace!(attack = %self.name, roll, ?outcome, "hit roll");
        outcome
    }

    /// Damage multiplier for an outcome.
    pub fn outcome_multiplier(&self, outcome: HitOutcome) -> f64 {
        match outcome {
            HitOutcome::Miss => self.stats.miss_multiplier.value(),
            HitOutcome::Normal => 1.0,
            HitOutcome::Critical => self.stats.crit_multiplier.value(),
        }
    }

    /// Roll every side effect independently with the user's luck; returns
    /// the boost templates that triggered, in declaration order.
    pub fn triggered_side_effects<R: Rng>(&self, user_luck: f64, rng: &mut R) -> Vec<Boost> {
        self.side_effects
            .iter()
            .filter(|effect| {
                let roll = rolls::percentage_with_rng(rng, user_luck);
                rolls::triggers(roll, effect.chance.clamp(0.0, 100.0))
            })
            .map(|effect| effect.boost.clone())
            .collect()
    }

    /// Move one quantum of damage weight from `decrease` onto `increase`.
    /// The donor weight must currently be positive; the pair must differ.
    /// Total weight is unchanged, so total damage is too.
    pub fn shift_damage_weight(
        &mut self,
        increase: Element,
        decrease: Element,
    ) -> Result<(), CustomizeError> {
        if increase == decrease {
            return Err(CustomizeError::SameWeight(increase));
        }
        if self.weight_base(decrease) <= 0.0 {
            return Err(CustomizeError::WeightAtFloor(decrease));
        }
        self.weight_stat_mut(increase).base += WEIGHT_QUANTUM;
        self.weight_stat_mut(decrease).base -= WEIGHT_QUANTUM;
        Ok(())
    }

    /// One-line listing for stat sheets.
    pub fn summary(&self, user_level: u8) -> String {
        format!(
            "{}: {} damage, costs {} energy",
            self.name,
            self.total_damage(user_level) as i32,
            self.energy_cost
        )
    }

    /// Full damage breakdown at the given user level.
    pub fn describe(&self, user_level: u8) -> String {
        let mut lines = vec![self.name.clone()];
        for (element, damage) in self.damage_distribution(user_level) {
            lines.push(format!("    {} damage: {}", element, damage as i32));
        }
        lines.push(format!(
            "Critical hit chance: {}%",
            self.stats.crit_chance.value() as i32
        ));
        lines.push(format!(
            "Miss chance: {}%",
            self.stats.miss_chance.value() as i32
        ));
        lines.push(format!(
            "Critical hit multiplier: {}%",
            (self.stats.crit_multiplier.value() * 100.0) as i32
        ));
        lines.push(format!(
            "Miss multiplier: {}%",
            (self.stats.miss_multiplier.value() * 100.0) as i32
        ));
        lines.push(format!(
            "Cleave damage: {}% of damage from initial hit",
            (self.stats.cleave.value() * 100.0) as i32
        ));
        lines.push(format!("Costs {} energy", self.energy_cost));
        for effect in &self.side_effects {
            lines.push(format!(
                "    {}% chance to inflict {}",
                effect.chance as i32, effect.boost
            ));
        }
        lines.join("\n")
    }
}

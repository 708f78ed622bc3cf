//! Stats, formulas, and boosts.
//!
//! Every numeric attribute in the engine is a [`Stat`]: a base value fed
//! through a fixed formula, plus a stack of timed [`Boost`] modifiers that
//! decay once per battle tick.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The five elements. Every character aligns with one, and every attack
/// carries a damage weight per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Element {
    Lightning,
    Rain,
    Hail,
    Wind,
    Stone,
}

impl Element {
    pub const ALL: [Element; 5] = [
        Element::Lightning,
        Element::Rain,
        Element::Hail,
        Element::Wind,
        Element::Stone,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Element::Lightning => "lightning",
            Element::Rain => "rain",
            Element::Hail => "hail",
            Element::Wind => "wind",
            Element::Stone => "stone",
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of character-scoped stats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CharacterStat {
    /// Energy capacity, which attacks spend.
    Energy,
    /// Scales boosts and healing received upward and percent damage downward.
    Potency,
    Resistance,
    Control,
    /// Weights every percentage roll this character makes.
    Luck,
}

impl CharacterStat {
    pub const ALL: [CharacterStat; 5] = [
        CharacterStat::Energy,
        CharacterStat::Potency,
        CharacterStat::Resistance,
        CharacterStat::Control,
        CharacterStat::Luck,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CharacterStat::Energy => "energy",
            CharacterStat::Potency => "potency",
            CharacterStat::Resistance => "resistance",
            CharacterStat::Control => "control",
            CharacterStat::Luck => "luck",
        }
    }
}

impl fmt::Display for CharacterStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The closed set of stat formulas. Each [`Stat`] names one, so a stat's
/// derived value is always `formula(base) + active boosts`.
///
/// The numbers are placeholders for balancing later; the shapes are what
/// matter. Bases may be negative and formulas are never clamped here;
/// percentages clamp to [0, 100] at the point of use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Formula {
    /// Character stats: 0 -> 20, +1 base -> +1.
    Character,
    /// Damage multiplier: 0 -> 1.0, 10 -> 1.25, 20 -> 1.5.
    DamageMultiplier,
    /// Damage weights pass the base straight through.
    DamageWeight,
    /// Fraction of the primary hit splashed onto other enemies.
    Cleave,
    /// Miss chance in percent: 0 -> 40, 10 -> 20, 20 -> 0.
    MissChance,
    /// Crit chance in percent: 10 -> 20.
    CritChance,
    /// Damage multiplier on a miss: 10 -> 0.75.
    MissMultiplier,
    /// Damage multiplier on a crit: 10 -> 1.5.
    CritMultiplier,
}

impl Formula {
    pub fn apply(&self, base: f64) -> f64 {
        match self {
            Formula::Character => 20.0 + base,
            Formula::DamageMultiplier => 1.0 + base * 0.025,
            Formula::DamageWeight => base,
            Formula::Cleave => base * 0.05,
            Formula::MissChance => 40.0 - 2.0 * base,
            Formula::CritChance => 2.0 * base,
            Formula::MissMultiplier => 0.5 + 0.025 * base,
            Formula::CritMultiplier => 1.0 + 0.05 * base,
        }
    }
}

/// An immutable boost template: configuration data describing a timed
/// modifier to one character stat. Templates are what passives, items, and
/// side effects carry; nothing ever counts down on a template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Boost {
    pub stat: CharacterStat,
    pub amount: f64,
    /// How many battle ticks the boost lasts once applied.
    pub turns: u8,
    /// Display label naming what inflicted the boost.
    pub source: String,
}

impl Boost {
    pub fn new(stat: CharacterStat, amount: f64, turns: u8, source: impl Into<String>) -> Self {
        Self {
            stat,
            amount,
            turns,
            source: source.into(),
        }
    }

    /// A copy with the amount scaled, leaving this template untouched.
    /// Potency scaling happens through here.
    pub fn scaled_by(&self, multiplier: f64) -> Boost {
        Boost {
            amount: self.amount * multiplier,
            ..self.clone()
        }
    }

    /// Mint a live instance with its own countdown. Every application goes
    /// through this so no two targets ever share a decay timer.
    pub fn instantiate(&self) -> BoostInstance {
        BoostInstance {
            amount: self.amount,
            remaining: self.turns,
            source: self.source.clone(),
        }
    }
}

impl fmt::Display for Boost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let plural = if self.turns == 1 { "turn" } else { "turns" };
        write!(
            f,
            "{:+} {} for {} {}",
            self.amount, self.stat, self.turns, plural
        )
    }
}

/// A live boost applied to one stat, counting down each tick.
#[derive(Debug, Clone, PartialEq)]
pub struct BoostInstance {
    pub amount: f64,
    pub remaining: u8,
    pub source: String,
}

impl BoostInstance {
    /// An instance contributes only while it has turns left. An instance
    /// minted from a zero-turn template is inert from the start.
    pub fn is_active(&self) -> bool {
        self.remaining > 0
    }

    fn tick(&mut self) {
        self.remaining = self.remaining.saturating_sub(1);
    }
}

/// One named numeric attribute: base, formula, and the boosts currently
/// stacked on it.
#[derive(Debug, Clone)]
pub struct Stat {
    pub formula: Formula,
    pub base: f64,
    boosts: Vec<BoostInstance>,
}

impl Stat {
    pub fn new(formula: Formula, base: f64) -> Self {
        Self {
            formula,
            base,
            boosts: Vec::new(),
        }
    }

    /// Derived value: `formula(base)` plus every unexpired boost. Never
    /// cached, so it always reflects the current base and boost stack.
    pub fn value(&self) -> f64 {
        let boosted: f64 = self
            .boosts
            .iter()
            .filter(|b| b.is_active())
            .map(|b| b.amount)
            .sum();
        self.formula.apply(self.base) + boosted
    }

    /// Appends without merging: boosts on the same stat coexist and sum.
    pub fn apply_boost(&mut self, instance: BoostInstance) {
        self.boosts.push(instance);
    }

    /// Counts every boost down one turn and prunes the expired. Called once
    /// per battle tick by the owning character, never mid-resolution.
    pub fn tick(&mut self) {
        for boost in &mut self.boosts {
            boost.tick();
        }
        self.boosts.retain(|b| b.is_active());
    }

    /// Drops all boosts. Battle init starts every stat from a clean stack.
    pub fn reset(&mut self) {
        self.boosts.clear();
    }

    pub fn active_boosts(&self) -> usize {
        self.boosts.iter().filter(|b| b.is_active()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_multiplier_formula() {
        assert_eq!(Formula::DamageMultiplier.apply(0.0), 1.0);
        assert_eq!(Formula::DamageMultiplier.apply(10.0), 1.25);
        assert_eq!(Formula::DamageMultiplier.apply(20.0), 1.5);
    }

    #[test]
    fn test_chance_formulas() {
        assert_eq!(Formula::MissChance.apply(10.0), 20.0);
        assert_eq!(Formula::CritChance.apply(10.0), 20.0);
        assert_eq!(Formula::MissMultiplier.apply(10.0), 0.75);
        assert_eq!(Formula::CritMultiplier.apply(10.0), 1.5);
    }

    #[test]
    fn test_formulas_not_clamped() {
        // A heavily customized attack can push chances past the usual range;
        // clamping is the consumer's job.
        assert_eq!(Formula::MissChance.apply(25.0), -10.0);
        assert_eq!(Formula::Cleave.apply(-5.0), -0.25);
        assert_eq!(Formula::Character.apply(-30.0), -10.0);
    }

    #[test]
    fn test_value_sums_active_boosts() {
        let mut stat = Stat::new(Formula::Character, 0.0);
        assert_eq!(stat.value(), 20.0);

        stat.apply_boost(Boost::new(CharacterStat::Luck, 0.5, 2, "a").instantiate());
        stat.apply_boost(Boost::new(CharacterStat::Luck, 0.25, 1, "b").instantiate());
        assert_eq!(stat.value(), 20.75);
    }

    #[test]
    fn test_zero_turn_boost_never_counts() {
        let mut stat = Stat::new(Formula::Character, 0.0);
        stat.apply_boost(Boost::new(CharacterStat::Luck, 5.0, 0, "inert").instantiate());
        assert_eq!(stat.value(), 20.0);
        assert_eq!(stat.active_boosts(), 0);
    }

    #[test]
    fn test_tick_expires_boosts_in_order() {
        let mut stat = Stat::new(Formula::Character, 0.0);
        stat.apply_boost(Boost::new(CharacterStat::Luck, 1.0, 1, "short").instantiate());
        stat.apply_boost(Boost::new(CharacterStat::Luck, 2.0, 3, "long").instantiate());

        stat.tick();
        assert_eq!(stat.value(), 22.0);
        stat.tick();
        assert_eq!(stat.value(), 22.0);
        stat.tick();
        assert_eq!(stat.value(), 20.0);
        assert_eq!(stat.active_boosts(), 0);
    }

    #[test]
    fn test_instance_decay_leaves_template_untouched() {
        let template = Boost::new(CharacterStat::Resistance, 0.5, 3, "ward");
        let mut first = template.instantiate();
        first.tick();
        first.tick();

        assert_eq!(first.remaining, 1);
        assert_eq!(template.turns, 3);
        // A later instance starts fresh.
        assert_eq!(template.instantiate().remaining, 3);
    }

    #[test]
    fn test_scaled_by_copies() {
        let template = Boost::new(CharacterStat::Luck, 0.5, 2, "charm");
        let scaled = template.scaled_by(1.2);
        assert!((scaled.amount - 0.6).abs() < 1e-9);
        assert_eq!(template.amount, 0.5);
        assert_eq!(scaled.turns, 2);
    }

    #[test]
    fn test_reset_clears_stack() {
        let mut stat = Stat::new(Formula::Character, 5.0);
        stat.apply_boost(Boost::new(CharacterStat::Energy, 3.0, 4, "x").instantiate());
        stat.reset();
        assert_eq!(stat.value(), 25.0);
        assert_eq!(stat.active_boosts(), 0);
    }

    #[test]
    fn test_boost_display() {
        let boost = Boost::new(CharacterStat::Resistance, 0.5, 1, "ward");
        assert_eq!(boost.to_string(), "+0.5 resistance for 1 turn");

        let drain = Boost::new(CharacterStat::Control, -0.25, 3, "hex");
        assert_eq!(drain.to_string(), "-0.25 control for 3 turns");
    }
}

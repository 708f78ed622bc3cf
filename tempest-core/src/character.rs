//! Characters: the five-stat block, HP and energy pools, equipment,
//! event listeners, and level progression.
//!
//! A character's numeric state is rebuilt at the start of every battle by
//! [`Character::init_for_battle`]; between battles only bases, levels, and
//! equipment persist. Save files therefore carry no HP, energy, or boost
//! state.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, trace};
use uuid::Uuid;

use crate::actives::Active;
use crate::events::{ActionRegistry, BattleEvent, HitContext, Reaction};
use crate::items::Item;
use crate::passives::Passive;
use crate::stats::{Boost, CharacterStat, Element, Formula, Stat};

/// Maximum HP for every character at present.
pub const MAX_HP: i32 = 100;

/// Levels stop at 20; further XP accumulates without effect.
pub const LEVEL_CAP: u8 = 20;

/// Fraction of energy capacity regained on each update tick.
const ENERGY_REGEN_RATE: f64 = 0.15;

/// XP needed to finish level N is N times this.
const XP_PER_LEVEL: u32 = 10;

/// Stable identity for a character within a battle. Persisted with the
/// character so references survive a save/load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub Uuid);

impl CharacterId {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for CharacterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Save-file discriminator for the two character roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CharacterKind {
    #[serde(rename = "PlayerCharacter")]
    Player,
    #[serde(rename = "EnemyCharacter")]
    Enemy,
}

/// Plain base values for the five character stats. This is the shape that
/// lands in JSON; the richer [`StatBlock`] is rebuilt from it on load.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBases {
    #[serde(default)]
    pub energy: f64,
    #[serde(default)]
    pub potency: f64,
    #[serde(default)]
    pub resistance: f64,
    #[serde(default)]
    pub control: f64,
    #[serde(default)]
    pub luck: f64,
}

/// The five character stats as live [`Stat`]s. Serializes as bare bases,
/// since formulas are fixed and boosts never outlive a battle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(from = "StatBases", into = "StatBases")]
pub struct StatBlock {
    energy: Stat,
    potency: Stat,
    resistance: Stat,
    control: Stat,
    luck: Stat,
}

impl From<StatBases> for StatBlock {
    fn from(bases: StatBases) -> Self {
        Self {
            energy: Stat::new(Formula::Character, bases.energy),
            potency: Stat::new(Formula::Character, bases.potency),
            resistance: Stat::new(Formula::Character, bases.resistance),
            control: Stat::new(Formula::Character, bases.control),
            luck: Stat::new(Formula::Character, bases.luck),
        }
    }
}

impl From<StatBlock> for StatBases {
    fn from(block: StatBlock) -> Self {
        Self {
            energy: block.energy.base,
            potency: block.potency.base,
            resistance: block.resistance.base,
            control: block.control.base,
            luck: block.luck.base,
        }
    }
}

impl Default for StatBlock {
    fn default() -> Self {
        StatBases::default().into()
    }
}

impl StatBlock {
    pub fn get(&self, stat: CharacterStat) -> &Stat {
        match stat {
            CharacterStat::Energy => &self.energy,
            CharacterStat::Potency => &self.potency,
            CharacterStat::Resistance => &self.resistance,
            CharacterStat::Control => &self.control,
            CharacterStat::Luck => &self.luck,
        }
    }

    pub fn get_mut(&mut self, stat: CharacterStat) -> &mut Stat {
        match stat {
            CharacterStat::Energy => &mut self.energy,
            CharacterStat::Potency => &mut self.potency,
            CharacterStat::Resistance => &mut self.resistance,
            CharacterStat::Control => &mut self.control,
            CharacterStat::Luck => &mut self.luck,
        }
    }

    pub fn value(&self, stat: CharacterStat) -> f64 {
        self.get(stat).value()
    }

    fn tick_all(&mut self) {
        for stat in CharacterStat::ALL {
            self.get_mut(stat).tick();
        }
    }

    fn reset_all(&mut self) {
        for stat in CharacterStat::ALL {
            self.get_mut(stat).reset();
        }
    }
}

/// A combatant, playable or hostile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Character {
    #[serde(rename = "type")]
    pub kind: CharacterKind,
    #[serde(default = "CharacterId::new")]
    pub id: CharacterId,
    pub name: String,
    pub element: Element,
    #[serde(default = "default_level")]
    pub level: u8,
    #[serde(default)]
    pub xp: u32,
    #[serde(default)]
    pub customization_points: u8,
    #[serde(default = "default_max_hp")]
    pub max_hp: i32,
    #[serde(default)]
    pub stats: StatBlock,
    #[serde(default)]
    pub actives: Vec<Active>,
    #[serde(default)]
    pub passives: Vec<Passive>,
    #[serde(default)]
    pub equipped_items: Vec<Item>,
    /// Battle-only state below; rebuilt by [`Character::init_for_battle`].
    #[serde(skip)]
    rem_hp: i32,
    #[serde(skip)]
    energy: i32,
    #[serde(skip)]
    registry: ActionRegistry,
}

fn default_level() -> u8 {
    1
}

fn default_max_hp() -> i32 {
    MAX_HP
}

impl Character {
    pub fn new(kind: CharacterKind, name: impl Into<String>, element: Element) -> Self {
        Self {
            kind,
            id: CharacterId::new(),
            name: name.into(),
            element,
            level: 1,
            xp: 0,
            customization_points: 0,
            max_hp: MAX_HP,
            stats: StatBlock::default(),
            actives: Vec::new(),
            passives: Vec::new(),
            equipped_items: Vec::new(),
            rem_hp: MAX_HP,
            energy: 0,
            registry: ActionRegistry::new(),
        }
    }

    pub fn player(name: impl Into<String>, element: Element) -> Self {
        Self::new(CharacterKind::Player, name, element)
    }

    pub fn enemy(name: impl Into<String>, element: Element) -> Self {
        Self::new(CharacterKind::Enemy, name, element)
    }

    pub fn with_stat_bases(mut self, bases: StatBases) -> Self {
        self.stats = bases.into();
        self
    }

    pub fn with_active(mut self, active: Active) -> Self {
        self.actives.push(active);
        self
    }

    pub fn with_passive(mut self, passive: Passive) -> Self {
        self.passives.push(passive);
        self
    }

    pub fn with_level(mut self, level: u8) -> Self {
        self.level = level;
        self
    }

    // ==================== stats and pools ====================

    pub fn stat_value(&self, stat: CharacterStat) -> f64 {
        self.stats.value(stat)
    }

    pub fn hp(&self) -> i32 {
        self.rem_hp
    }

    pub fn energy(&self) -> i32 {
        self.energy
    }

    /// Current energy ceiling: the energy stat's value, truncated.
    pub fn energy_capacity(&self) -> i32 {
        self.stat_value(CharacterStat::Energy) as i32
    }

    pub fn is_koed(&self) -> bool {
        self.rem_hp <= 0
    }

    /// Remaining HP as a truncated percentage of max, floored at zero while
    /// the pool is transiently negative from overkill damage.
    pub fn hp_percent(&self) -> i32 {
        ((f64::from(self.rem_hp) / f64::from(self.max_hp) * 100.0) as i32).max(0)
    }

    fn potency_multiplier(&self, sign: f64) -> f64 {
        1.0 + sign * self.stat_value(CharacterStat::Potency) / 100.0
    }

    /// Subtract damage from the HP pool. No floor here: the pool may go
    /// negative, and the battle layer's KO check squares it up.
    pub fn take_damage(&mut self, amount: i32) {
        self.rem_hp -= amount;
        trace!(name = %self.name, amount, rem_hp = self.rem_hp, "damage taken");
    }

    /// The battle layer's KO floor: once a character is down, the pool
    /// reads zero rather than whatever overkill left behind.
    pub fn apply_ko_floor(&mut self) {
        if self.rem_hp < 0 {
            self.rem_hp = 0;
        }
    }

    /// Heal a percentage of max HP. Received healing scales up with
    /// potency; the returned number is the unscaled amount, which is what
    /// battle text reports.
    pub fn heal(&mut self, percent: f64) -> i32 {
        let healing = f64::from(self.max_hp) * percent / 100.0;
        let scaled = healing * self.potency_multiplier(1.0);
        self.rem_hp = (self.rem_hp + scaled as i32).min(self.max_hp);
        healing as i32
    }

    /// Deal a percentage of max HP as damage, scaled *down* by potency.
    /// Returns the damage actually dealt, even past zero HP.
    pub fn harm(&mut self, percent: f64) -> i32 {
        let amount =
            (f64::from(self.max_hp) * percent / 100.0 * self.potency_multiplier(-1.0)) as i32;
        self.take_damage(amount);
        amount
    }

    /// Gain energy scaled up by potency, clamped to capacity. Returns the
    /// scaled gain even when the clamp eats part of it. A capacity debuffed
    /// below zero counts as an empty pool.
    pub fn gain_energy(&mut self, amount: f64) -> i32 {
        let gained = (amount * self.potency_multiplier(1.0)) as i32;
        self.energy = (self.energy + gained).clamp(0, self.energy_capacity().max(0));
        gained
    }

    /// Spend energy; the pool floors at zero and nothing scales the cost.
    pub fn lose_energy(&mut self, amount: i32) {
        self.energy = (self.energy - amount).max(0);
    }

    /// Apply a boost template, scaled by this character's potency. Returns
    /// the boost as applied, for display.
    pub fn boost(&mut self, template: &Boost) -> Boost {
        let applied = template.scaled_by(self.potency_multiplier(1.0));
        self.stats.get_mut(applied.stat).apply_boost(applied.instantiate());
        trace!(name = %self.name, boost = %applied, "boost applied");
        applied
    }

    // ==================== battle lifecycle ====================

    /// Reset battle state: clear listeners and boosts, re-register every
    /// passive and equipped item, refill HP, and set energy to half
    /// capacity. Repeating this never stacks duplicate listeners.
    pub fn init_for_battle(&mut self) {
        self.registry.clear();
        self.stats.reset_all();
        for passive in &self.passives {
            passive.register_to(&mut self.registry);
        }
        for item in &self.equipped_items {
            item.register_to(&mut self.registry);
        }
        self.rem_hp = self.max_hp;
        self.energy = ((self.stat_value(CharacterStat::Energy) / 2.0) as i32).max(0);
        debug!(name = %self.name, energy = self.energy, "battle init");
    }

    /// End-of-turn tick. Fires the update event (listeners may apply
    /// boosts), grants energy regen, then decays every boost. A boost
    /// applied by a listener this tick counts down here too, so a one-turn
    /// boost lasts only through the remainder of this tick.
    pub fn update(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        for template in self.registry.update_reactions(self.hp_percent()) {
            let applied = self.boost(&template);
            lines.push(format!("{} is inflicted with {}", self.name, applied));
        }
        let regen = self.stat_value(CharacterStat::Energy) * ENERGY_REGEN_RATE;
        self.gain_energy(regen);
        self.stats.tick_all();
        lines
    }

    /// Collect hit reactions from this character's listeners without
    /// applying anything. The battle layer routes each reaction to the
    /// right side of the hit.
    pub fn hit_reactions<R: Rng>(
        &self,
        event: BattleEvent,
        ctx: &HitContext,
        rng: &mut R,
    ) -> Vec<Reaction> {
        self.registry.hit_reactions(event, ctx, rng)
    }

    pub fn listener_count(&self) -> usize {
        self.registry.total_count()
    }

    // ==================== equipment and progression ====================

    /// Equip an item. No slot limit; membership in this list is what makes
    /// the item register at battle init.
    pub fn equip(&mut self, mut item: Item) {
        item.equipped = true;
        self.equipped_items.push(item);
    }

    /// XP needed to finish the current level.
    pub fn xp_to_next(&self) -> u32 {
        u32::from(self.level) * XP_PER_LEVEL
    }

    /// Grant XP, leveling up as many times as thresholds allow. Leftover
    /// XP carries over. Returns the progression messages.
    pub fn gain_xp(&mut self, amount: u32) -> Vec<String> {
        let mut lines = vec![format!("{} gained {} XP", self.name, amount)];
        self.xp += amount;
        while self.level < LEVEL_CAP && self.xp >= self.xp_to_next() {
            self.xp -= self.xp_to_next();
            self.level_up(&mut lines);
        }
        lines
    }

    fn level_up(&mut self, lines: &mut Vec<String>) {
        self.level += 1;
        self.customization_points = self.customization_points.saturating_add(1);
        for item in &mut self.equipped_items {
            item.customization_points = item.customization_points.saturating_add(1);
        }
        self.rem_hp = self.max_hp;
        debug!(name = %self.name, level = self.level, "level up");
        lines.push(format!("{} reached level {}!", self.name, self.level));
        lines.push(self.describe());
    }

    /// Multi-line stat sheet.
    pub fn describe(&self) -> String {
        let mut lines = vec![
            format!("{} Lv. {} ({})", self.name, self.level, self.element),
            format!("XP: {}/{}", self.xp, self.xp_to_next()),
            "STATS:".to_string(),
        ];
        for stat in CharacterStat::ALL {
            lines.push(format!("    {:<10}: {}", stat.name(), self.stat_value(stat)));
        }
        if !self.actives.is_empty() {
            lines.push("ACTIVES:".to_string());
            for active in &self.actives {
                lines.push(format!("* {}", active.summary(self.level)));
            }
        }
        if !self.passives.is_empty() {
            lines.push("PASSIVES:".to_string());
            for passive in &self.passives {
                lines.push(format!("* {}", passive.describe()));
            }
        }
        if !self.equipped_items.is_empty() {
            lines.push("ITEMS:".to_string());
            for item in &self.equipped_items {
                lines.push(format!("* {}", item));
            }
        }
        lines.join("\n")
    }
}

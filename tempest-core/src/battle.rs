//! Turn resolution: one attack fully resolved against the opposing team,
//! then the acting side's end-of-turn tick.
//!
//! The battle owns both teams and mutates them through one entry point,
//! [`Battle::take_turn`]. Everything narratable comes back as report lines
//! for the display layer; nothing here prints.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::actives::HitOutcome;
use crate::character::CharacterId;
use crate::events::{BattleEvent, HitContext, HitSide, Reaction};
use crate::items::Item;
use crate::stats::CharacterStat;
use crate::team::Team;

/// Which team is acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Players,
    Enemies,
}

impl Side {
    pub fn opponent(&self) -> Side {
        match self {
            Side::Players => Side::Enemies,
            Side::Enemies => Side::Players,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleStatus {
    Ongoing,
    PlayersWon,
    EnemiesWon,
}

/// Caller contract violations during a turn. Affordability and targeting
/// are the caller's to check; none of these silently self-correct.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BattleError {
    #[error("no living member can act")]
    NoActingMember,
    #[error("no attack at index {index}")]
    NoSuchActive { index: usize },
    #[error("{attack} needs {required} energy but only {available} remains")]
    NotEnoughEnergy {
        attack: String,
        required: i32,
        available: i32,
    },
    #[error("no living target to attack")]
    NoLivingTarget,
}

/// Everything that happened during one turn, as data.
#[derive(Debug, Clone)]
pub struct TurnReport {
    pub actor: String,
    pub attack: String,
    /// `None` when the attack dealt no primary hit (zero multiplier).
    pub outcome: Option<HitOutcome>,
    pub lines: Vec<String>,
}

/// Configuration for staging a fight against catalog enemies.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    pub name: String,
    pub description: String,
    pub enemy_names: Vec<String>,
    pub level: u8,
    #[serde(default)]
    pub rewards: Vec<Item>,
}

/// A fight in progress between two initialized teams.
#[derive(Debug, Clone)]
pub struct Battle {
    pub players: Team,
    pub enemies: Team,
    turn_count: u32,
}

impl Battle {
    /// Start a battle: both teams get a fresh battle init.
    pub fn new(mut players: Team, mut enemies: Team) -> Self {
        players.init_for_battle();
        enemies.init_for_battle();
        Self {
            players,
            enemies,
            turn_count: 0,
        }
    }

    pub fn turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn status(&self) -> BattleStatus {
        if self.enemies.is_defeated() {
            BattleStatus::PlayersWon
        } else if self.players.is_defeated() {
            BattleStatus::EnemiesWon
        } else {
            BattleStatus::Ongoing
        }
    }

    fn sides_mut(&mut self, side: Side) -> (&mut Team, &mut Team) {
        match side {
            Side::Players => (&mut self.players, &mut self.enemies),
            Side::Enemies => (&mut self.enemies, &mut self.players),
        }
    }

    /// Resolve one turn: the acting side's active member uses the attack at
    /// `active_index` against the opposing active member. Resolution order:
    /// energy deduction, outcome roll, primary damage, hit-given then
    /// hit-taken reactions, side effects on the target, cleave splash with
    /// its own side-effect rolls, KO floor and active-slot advance, then
    /// one update tick for the acting side.
    pub fn take_turn<R: Rng>(
        &mut self,
        side: Side,
        active_index: usize,
        rng: &mut R,
    ) -> Result<TurnReport, BattleError> {
        let (acting, defending) = self.sides_mut(side);

        let ai = acting
            .ensure_living_active()
            .ok_or(BattleError::NoActingMember)?;

        let (attack, actor_id, actor_name, actor_level) = {
            let actor = &mut acting.members[ai];
            let attack = actor
                .actives
                .get(active_index)
                .cloned()
                .ok_or(BattleError::NoSuchActive {
                    index: active_index,
                })?;
            if !attack.can_use(actor) {
                return Err(BattleError::NotEnoughEnergy {
                    attack: attack.name.clone(),
                    required: attack.energy_cost,
                    available: actor.energy(),
                });
            }
            actor.lose_energy(attack.energy_cost);
            (attack, actor.id, actor.name.clone(), actor.level)
        };

        let already_down: Vec<CharacterId> = defending
            .members
            .iter()
            .filter(|m| m.is_koed())
            .map(|m| m.id)
            .collect();

        let mut lines = Vec::new();
        let mut outcome = None;

        if attack.stats.multiplier.value() != 0.0 {
            let di = defending
                .ensure_living_active()
                .ok_or(BattleError::NoLivingTarget)?;

            let actor_luck = acting.members[ai].stat_value(CharacterStat::Luck);
            let rolled = attack.roll_outcome(actor_luck, rng);
            outcome = Some(rolled);
            if let Some(flourish) = rolled.narrative() {
                lines.push(flourish.to_string());
            }

            let dealt =
                (attack.total_damage(actor_level) * attack.outcome_multiplier(rolled)) as i32;
            let target = &mut defending.members[di];
            let target_id = target.id;
            let target_luck = target.stat_value(CharacterStat::Luck);
            target.take_damage(dealt);
            lines.push(format!("{} took {} damage", target.name, dealt));

            let ctx = HitContext {
                hitter: actor_id,
                hitee: target_id,
                hitter_luck: actor_luck,
                hitee_luck: target_luck,
                damage: dealt,
            };
            let given = acting.members[ai].hit_reactions(BattleEvent::HitGiven, &ctx, rng);
            apply_reactions(given, acting, ai, defending, di, &mut lines);
            let taken = defending.members[di].hit_reactions(BattleEvent::HitTaken, &ctx, rng);
            apply_reactions(taken, acting, ai, defending, di, &mut lines);

            // Reactions may have shifted the user's luck, so re-read it for
            // the side-effect rolls.
            let luck_now = acting.members[ai].stat_value(CharacterStat::Luck);
            for template in attack.triggered_side_effects(luck_now, rng) {
                let target = &mut defending.members[di];
                let applied = target.boost(&template);
                lines.push(format!("{} is inflicted with {}", target.name, applied));
            }
        }

        let cleave = attack.stats.cleave.value();
        if cleave != 0.0 {
            // Cleave splashes a fraction of the un-scaled total onto every
            // other living defender; no outcome roll, no hit events, but
            // side effects roll fresh per victim.
            let splash = (attack.total_damage(actor_level) * cleave) as i32;
            let di = defending.active_index();
            for idx in 0..defending.members.len() {
                if idx == di || defending.members[idx].is_koed() {
                    continue;
                }
                defending.members[idx].take_damage(splash);
                lines.push(format!("{} took {} damage", defending.members[idx].name, splash));
                let luck_now = acting.members[ai].stat_value(CharacterStat::Luck);
                for template in attack.triggered_side_effects(luck_now, rng) {
                    let victim = &mut defending.members[idx];
                    let applied = victim.boost(&template);
                    lines.push(format!("{} is inflicted with {}", victim.name, applied));
                }
            }
        }

        for member in &mut defending.members {
            if member.is_koed() {
                member.apply_ko_floor();
                if !already_down.contains(&member.id) {
                    lines.push(format!("{} is down!", member.name));
                }
            }
        }
        defending.ensure_living_active();

        for member in &mut acting.members {
            if !member.is_koed() {
                lines.extend(member.update());
            }
        }

        self.turn_count += 1;
        debug!(
            turn = self.turn_count,
            ?side,
            actor = %actor_name,
            attack = %attack.name,
            ?outcome,
            "turn resolved"
        );
        Ok(TurnReport {
            actor: actor_name,
            attack: attack.name,
            outcome,
            lines,
        })
    }

    /// XP payout after a player victory: every player member earns ten
    /// times the encounter level. Does nothing unless the players have won.
    pub fn award_victory(&mut self, encounter_level: u8) -> Vec<String> {
        if self.status() != BattleStatus::PlayersWon {
            return Vec::new();
        }
        let reward = 10 * u32::from(encounter_level);
        let mut lines = Vec::new();
        for member in &mut self.players.members {
            lines.extend(member.gain_xp(reward));
        }
        lines
    }
}

fn apply_reactions(
    reactions: Vec<Reaction>,
    acting: &mut Team,
    actor_idx: usize,
    defending: &mut Team,
    target_idx: usize,
    lines: &mut Vec<String>,
) {
    for reaction in reactions {
        let member = match reaction.apply_to {
            HitSide::Hitter => &mut acting.members[actor_idx],
            HitSide::Hitee => &mut defending.members[target_idx],
        };
        let applied = member.boost(&reaction.boost);
        lines.push(format!("{} is inflicted with {}", member.name, applied));
    }
}

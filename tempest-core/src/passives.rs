//! Passive abilities.
//!
//! A passive is pure configuration: a trigger condition plus a boost
//! template. Characters register their passives into an action registry at
//! battle init; the battle loop then asks the registry for reactions when
//! the matching event fires. Passives never mutate anything themselves.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::events::{ActionRegistry, BattleEvent, HitContext, HitSide, Listener, ListenerId, Reaction};
use crate::rolls;
use crate::stats::Boost;

/// The three passive trigger shapes. The serde tag doubles as the save-file
/// discriminator, so renaming a variant label breaks old saves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Passive {
    /// Fires on every battle tick while the owner's HP percentage is at or
    /// below the threshold. Re-fires each tick, so the boost holds steady
    /// while the owner stays hurt.
    #[serde(rename = "Threshold Passive")]
    Threshold {
        name: String,
        boost: Boost,
        /// Fraction of max HP, e.g. 0.25 for "quarter health or less".
        threshold: f64,
    },
    /// Chance to fire whenever the owner lands a hit. Rolls with the
    /// owner's luck.
    #[serde(rename = "On Hit Given Passive")]
    OnHitGiven {
        name: String,
        boost: Boost,
        /// Trigger chance as a fraction, e.g. 0.25 for 25%.
        chance: f64,
        /// Whether the boost lands on the owner or on the other party.
        targets_user: bool,
    },
    /// Chance to fire whenever the owner takes a hit. Rolls with the
    /// owner's luck.
    #[serde(rename = "On Hit Taken Passive")]
    OnHitTaken {
        name: String,
        boost: Boost,
        chance: f64,
        targets_user: bool,
    },
}

impl Passive {
    pub fn threshold(name: impl Into<String>, boost: Boost, threshold: f64) -> Self {
        Passive::Threshold {
            name: name.into(),
            boost,
            threshold,
        }
    }

    pub fn on_hit_given(
        name: impl Into<String>,
        boost: Boost,
        chance: f64,
        targets_user: bool,
    ) -> Self {
        Passive::OnHitGiven {
            name: name.into(),
            boost,
            chance,
            targets_user,
        }
    }

    pub fn on_hit_taken(
        name: impl Into<String>,
        boost: Boost,
        chance: f64,
        targets_user: bool,
    ) -> Self {
        Passive::OnHitTaken {
            name: name.into(),
            boost,
            chance,
            targets_user,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Passive::Threshold { name, .. }
            | Passive::OnHitGiven { name, .. }
            | Passive::OnHitTaken { name, .. } => name,
        }
    }

    pub fn boost(&self) -> &Boost {
        match self {
            Passive::Threshold { boost, .. }
            | Passive::OnHitGiven { boost, .. }
            | Passive::OnHitTaken { boost, .. } => boost,
        }
    }

    /// Which battle event this passive listens for.
    pub fn event(&self) -> BattleEvent {
        match self {
            Passive::Threshold { .. } => BattleEvent::Update,
            Passive::OnHitGiven { .. } => BattleEvent::HitGiven,
            Passive::OnHitTaken { .. } => BattleEvent::HitTaken,
        }
    }

    /// Register a copy of this passive under its event.
    pub fn register_to(&self, registry: &mut ActionRegistry) -> ListenerId {
        registry.register(self.event(), Listener::Passive(self.clone()))
    }

    /// Tick reaction: the boost to re-apply to the owner, if the threshold
    /// condition holds at the given HP percentage.
    pub fn update_reaction(&self, hp_percent: i32) -> Option<Boost> {
        match self {
            Passive::Threshold {
                boost, threshold, ..
            } if f64::from(hp_percent) <= threshold * 100.0 => Some(boost.clone()),
            _ => None,
        }
    }

    /// Hit reaction: rolls the trigger chance with the owner's luck and, on
    /// success, says which side of the hit the boost lands on.
    pub fn hit_reaction<R: Rng>(&self, ctx: &HitContext, rng: &mut R) -> Option<Reaction> {
        let (boost, apply_to) = match self {
            Passive::OnHitGiven {
                boost,
                chance,
                targets_user,
                ..
            } => {
                let roll = rolls::percentage_with_rng(rng, ctx.hitter_luck);
                if !rolls::triggers(roll, chance * 100.0) {
                    return None;
                }
                let target = if *targets_user {
                    HitSide::Hitter
                } else {
                    HitSide::Hitee
                };
                (boost, target)
            }
            Passive::OnHitTaken {
                boost,
                chance,
                targets_user,
                ..
            } => {
                let roll = rolls::percentage_with_rng(rng, ctx.hitee_luck);
                if !rolls::triggers(roll, chance * 100.0) {
                    return None;
                }
                let target = if *targets_user {
                    HitSide::Hitee
                } else {
                    HitSide::Hitter
                };
                (boost, target)
            }
            Passive::Threshold { .. } => return None,
        };
        Some(Reaction {
            apply_to,
            boost: boost.clone(),
        })
    }

    pub fn describe(&self) -> String {
        match self {
            Passive::Threshold {
                name,
                boost,
                threshold,
            } => format!(
                "{}: inflicts you with {} when at or below {}% max HP",
                name,
                boost,
                (threshold * 100.0) as i32
            ),
            Passive::OnHitGiven {
                name,
                boost,
                chance,
                targets_user,
            } => format!(
                "{}: your hits have a {}% chance to inflict {} with {}",
                name,
                (chance * 100.0) as i32,
                if *targets_user { "you" } else { "the target" },
                boost
            ),
            Passive::OnHitTaken {
                name,
                boost,
                chance,
                targets_user,
            } => format!(
                "{}: hits against you have a {}% chance to inflict {} with {}",
                name,
                (chance * 100.0) as i32,
                if *targets_user { "you" } else { "the attacker" },
                boost
            ),
        }
    }
}

//! Battle events and the per-character action registry.
//!
//! Character behaviors (passives, item enchantments) subscribe to battle
//! events by registering a listener. Evaluation is split from application:
//! the registry only *collects* the boosts a fired event calls for, and the
//! battle loop applies them, so no listener ever holds a mutable borrow of
//! a character mid-resolution.

use rand::Rng;
use std::collections::HashMap;

use crate::character::CharacterId;
use crate::items::Item;
use crate::passives::Passive;
use crate::stats::Boost;

/// The battle events listeners can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattleEvent {
    /// End-of-turn tick, fired once per living character.
    Update,
    /// The subscribing character landed a hit.
    HitGiven,
    /// The subscribing character took a hit.
    HitTaken,
}

/// Handle returned by [`ActionRegistry::register`], usable to remove that
/// one listener later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u32);

/// Everything that can subscribe to an event. Listeners are stored by
/// value; registration clones the behavior's configuration.
#[derive(Debug, Clone)]
pub enum Listener {
    Passive(Passive),
    Enchantment(Item),
}

/// Facts about a resolved hit, handed to hit listeners.
#[derive(Debug, Clone)]
pub struct HitContext {
    pub hitter: CharacterId,
    pub hitee: CharacterId,
    pub hitter_luck: f64,
    pub hitee_luck: f64,
    pub damage: i32,
}

/// Which party of a hit a reaction boost lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitSide {
    Hitter,
    Hitee,
}

/// A boost a hit listener wants applied, and to whom.
#[derive(Debug, Clone)]
pub struct Reaction {
    pub apply_to: HitSide,
    pub boost: Boost,
}

/// One character's event subscriptions for the current battle.
///
/// Listeners fire in registration order. Battle init clears the registry
/// and re-registers everything, which keeps repeated inits from stacking
/// duplicate subscriptions.
#[derive(Debug, Clone, Default)]
pub struct ActionRegistry {
    next_id: u32,
    listeners: HashMap<BattleEvent, Vec<(ListenerId, Listener)>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, event: BattleEvent, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.entry(event).or_default().push((id, listener));
        id
    }

    /// Remove a single listener by handle. Returns whether it was present.
    pub fn remove(&mut self, id: ListenerId) -> bool {
        for list in self.listeners.values_mut() {
            if let Some(pos) = list.iter().position(|(lid, _)| *lid == id) {
                list.remove(pos);
                return true;
            }
        }
        false
    }

    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    pub fn count(&self, event: BattleEvent) -> usize {
        self.listeners.get(&event).map_or(0, Vec::len)
    }

    pub fn total_count(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    /// Fire the tick event: collect the boosts every update listener wants
    /// applied to the owner at the given HP percentage.
    pub fn update_reactions(&self, hp_percent: i32) -> Vec<Boost> {
        let mut boosts = Vec::new();
        if let Some(list) = self.listeners.get(&BattleEvent::Update) {
            for (_, listener) in list {
                if let Some(boost) = listener.update_reaction(hp_percent) {
                    boosts.push(boost);
                }
            }
        }
        boosts
    }

    /// Fire a hit event: collect the reactions of every listener on that
    /// event, rolling trigger chances with the given RNG.
    pub fn hit_reactions<R: Rng>(
        &self,
        event: BattleEvent,
        ctx: &HitContext,
        rng: &mut R,
    ) -> Vec<Reaction> {
        let mut reactions = Vec::new();
        if let Some(list) = self.listeners.get(&event) {
            for (_, listener) in list {
                if let Some(reaction) = listener.hit_reaction(ctx, rng) {
                    reactions.push(reaction);
                }
            }
        }
        reactions
    }
}

impl Listener {
    fn update_reaction(&self, hp_percent: i32) -> Option<Boost> {
        match self {
            Listener::Passive(passive) => passive.update_reaction(hp_percent),
            // An equipped item re-applies its enchantment unconditionally.
            Listener::Enchantment(item) => Some(item.enchant_boost()),
        }
    }

    fn hit_reaction<R: Rng>(&self, ctx: &HitContext, rng: &mut R) -> Option<Reaction> {
        match self {
            Listener::Passive(passive) => passive.hit_reaction(ctx, rng),
            Listener::Enchantment(_) => None,
        }
    }
}

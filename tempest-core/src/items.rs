//! Equippable items.
//!
//! An item is a steady enchantment on one character stat. Rather than a
//! separate "permanent modifier" path, an equipped item listens for the
//! battle tick and re-applies a one-turn boost every time, so its effect
//! holds for exactly as long as it stays equipped and registered.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::events::{ActionRegistry, BattleEvent, Listener, ListenerId};
use crate::stats::{Boost, CharacterStat};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    pub stat: CharacterStat,
    pub amount: f64,
    /// Earned alongside the wearer's level-ups; spent on future upgrades.
    #[serde(default)]
    pub customization_points: u8,
    #[serde(default)]
    pub equipped: bool,
}

impl Item {
    pub fn new(name: impl Into<String>, stat: CharacterStat, amount: f64) -> Self {
        Self {
            name: name.into(),
            stat,
            amount,
            customization_points: 0,
            equipped: false,
        }
    }

    /// The boost this item re-applies each tick. One turn long, so it wears
    /// off the moment the item stops being registered.
    pub fn enchant_boost(&self) -> Boost {
        Boost::new(self.stat, self.amount, 1, self.name.clone())
    }

    /// Register a copy of this item as a tick listener.
    pub fn register_to(&self, registry: &mut ActionRegistry) -> ListenerId {
        registry.register(BattleEvent::Update, Listener::Enchantment(self.clone()))
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:+} {} while equipped", self.name, self.amount, self.stat)
    }
}

/// Hands out "Random Item #N" names in order. Callers that want stable
/// numbering across sessions can persist this alongside their other state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameSequence {
    next: u32,
}

impl Default for NameSequence {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl NameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_name(&mut self) -> String {
        let name = format!("Random Item #{}", self.next);
        self.next += 1;
        name
    }
}

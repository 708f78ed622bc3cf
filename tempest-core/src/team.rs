//! Teams: ordered members, one active combatant, and (for player teams)
//! the shared inventory of unequipped items.

use serde::{Deserialize, Serialize};

use crate::character::Character;
use crate::items::Item;

/// Save-file discriminator for the two team roles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TeamKind {
    #[serde(rename = "PlayerTeam")]
    Player,
    #[serde(rename = "EnemyTeam")]
    Enemy,
}

/// A battle side. Which member is active is battle state and never
/// persists; a loaded team starts from its first member.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(rename = "type")]
    pub kind: TeamKind,
    pub name: String,
    pub members: Vec<Character>,
    /// Unequipped items owned by the team. Equipping moves an item out of
    /// here and onto a member.
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(skip)]
    active: usize,
}

impl Team {
    pub fn new(kind: TeamKind, name: impl Into<String>, members: Vec<Character>) -> Self {
        Self {
            kind,
            name: name.into(),
            members,
            inventory: Vec::new(),
            active: 0,
        }
    }

    pub fn player(name: impl Into<String>, members: Vec<Character>) -> Self {
        Self::new(TeamKind::Player, name, members)
    }

    pub fn enemy(name: impl Into<String>, members: Vec<Character>) -> Self {
        Self::new(TeamKind::Enemy, name, members)
    }

    /// Reset every member's battle state and lead with the first member.
    pub fn init_for_battle(&mut self) {
        for member in &mut self.members {
            member.init_for_battle();
        }
        self.active = 0;
    }

    pub fn active_index(&self) -> usize {
        self.active
    }

    pub fn active_member(&self) -> Option<&Character> {
        self.members.get(self.active)
    }

    pub fn active_member_mut(&mut self) -> Option<&mut Character> {
        self.members.get_mut(self.active)
    }

    /// All members still standing.
    pub fn living_members(&self) -> impl Iterator<Item = &Character> {
        self.members.iter().filter(|m| !m.is_koed())
    }

    pub fn is_defeated(&self) -> bool {
        self.members.iter().all(Character::is_koed)
    }

    /// Keep the active slot on a living member, advancing past KOs in
    /// order and wrapping around. Returns the active index, or `None` when
    /// nobody is left.
    pub fn ensure_living_active(&mut self) -> Option<usize> {
        let count = self.members.len();
        if count == 0 {
            return None;
        }
        for offset in 0..count {
            let idx = (self.active + offset) % count;
            if !self.members[idx].is_koed() {
                self.active = idx;
                return Some(idx);
            }
        }
        None
    }

    /// Add an item to the shared inventory, unequipped.
    pub fn acquire(&mut self, mut item: Item) {
        item.equipped = false;
        self.inventory.push(item);
    }

    /// Inventory items not currently worn by anyone.
    pub fn available_items(&self) -> Vec<&Item> {
        self.inventory.iter().filter(|i| !i.equipped).collect()
    }
}

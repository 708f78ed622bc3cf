//! Testing utilities for the combat core.
//!
//! This module provides tools for integration testing:
//! - Seeded RNG construction for reproducible rolls
//! - Ready-made fighters with the default loadout
//! - `BattleHarness` for scripted battle scenarios
//! - Assertion helpers for verifying battle state

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::battle::{Battle, BattleError, BattleStatus, Side, TurnReport};
use crate::character::Character;
use crate::content;
use crate::stats::Element;
use crate::team::Team;

/// A seeded RNG for reproducible rolls.
pub fn seeded(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// A player character with the default loadout for their element.
pub fn sample_player(name: &str, element: Element) -> Character {
    content::default_player(name, element)
}

/// A catalog enemy. Panics on unknown names so fixtures fail loudly.
pub fn sample_enemy(name: &str) -> Character {
    content::enemy_by_name(name)
        .unwrap_or_else(|| panic!("no catalog enemy named '{name}'"))
}

/// Harness for running battle scenarios with a seeded RNG.
pub struct BattleHarness {
    /// The battle under test.
    pub battle: Battle,
    /// The roll source, seeded at construction.
    pub rng: StdRng,
}

impl BattleHarness {
    pub fn new(players: Team, enemies: Team, seed: u64) -> Self {
        Self {
            battle: Battle::new(players, enemies),
            rng: seeded(seed),
        }
    }

    /// A one-on-one duel with default loadouts.
    pub fn duel(seed: u64) -> Self {
        let players = Team::player(
            "Challengers",
            vec![sample_player("Tess", Element::Wind)],
        );
        let enemies = Team::enemy("Opposition", vec![sample_enemy("Stone Soldier")]);
        Self::new(players, enemies, seed)
    }

    /// Take one turn for a side using the attack at `active_index`.
    pub fn act(&mut self, side: Side, active_index: usize) -> Result<TurnReport, BattleError> {
        self.battle.take_turn(side, active_index, &mut self.rng)
    }

    /// The first attack the side's active member can afford, falling back
    /// to index 0 when nothing fits.
    pub fn affordable_index(&self, side: Side) -> usize {
        let team = match side {
            Side::Players => &self.battle.players,
            Side::Enemies => &self.battle.enemies,
        };
        team.active_member()
            .and_then(|member| {
                member
                    .actives
                    .iter()
                    .position(|active| active.can_use(member))
            })
            .unwrap_or(0)
    }

    /// Alternate sides, players first, until the battle resolves or the
    /// turn cap is reached. Each side uses its first affordable attack.
    pub fn run_to_completion(&mut self, turn_cap: u32) -> BattleStatus {
        let mut side = Side::Players;
        while self.battle.status() == BattleStatus::Ongoing
            && self.battle.turn_count() < turn_cap
        {
            let index = self.affordable_index(side);
            if self.act(side, index).is_err() {
                break;
            }
            side = side.opponent();
        }
        self.battle.status()
    }

    pub fn status(&self) -> BattleStatus {
        self.battle.status()
    }

    /// HP of a player-side member.
    pub fn player_hp(&self, index: usize) -> i32 {
        self.battle.players.members[index].hp()
    }

    /// HP of an enemy-side member.
    pub fn enemy_hp(&self, index: usize) -> i32 {
        self.battle.enemies.members[index].hp()
    }
}

// ============================================================================
// Assertion Helpers
// ============================================================================

/// Assert the battle is at the expected status.
#[track_caller]
pub fn assert_status(battle: &Battle, expected: BattleStatus) {
    assert_eq!(
        battle.status(),
        expected,
        "Expected battle status {expected:?}, got {:?}",
        battle.status()
    );
}

/// Assert a team member's HP is at the expected value.
#[track_caller]
pub fn assert_member_hp(team: &Team, index: usize, expected: i32) {
    let actual = team.members[index].hp();
    assert_eq!(
        actual, expected,
        "Expected {} at {expected} HP, got {actual}",
        team.members[index].name
    );
}

/// Assert a report carries a narrative line containing the fragment.
#[track_caller]
pub fn assert_report_mentions(report: &TurnReport, fragment: &str) {
    assert!(
        report.lines.iter().any(|line| line.contains(fragment)),
        "Expected a report line containing '{fragment}', got {:?}",
        report.lines
    );
}

//! Turn-based elemental combat engine.
//!
//! This crate provides:
//! - Five-element stat system with formula-derived values and expiring boosts
//! - Attack resolution: damage weights, miss/crit rolls, cleave, side effects
//! - Event-driven passives and enchanted items reacting to battle events
//! - Team battles with XP progression and level-ups
//! - Versioned roster persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use tempest_core::{content, Battle, BattleStatus, Element, NameSequence, Side, Team};
//!
//! let mut rng = rand::thread_rng();
//! let mut names = NameSequence::new();
//!
//! let players = Team::player(
//!     "Storm Chasers",
//!     vec![content::default_player("Tess", Element::Wind)],
//! );
//! let encounter = content::random_encounter(&mut names, &mut rng);
//! let enemies = content::encounter_team(&encounter).ok_or("unknown enemy")?;
//!
//! let mut battle = Battle::new(players, enemies);
//! let mut side = Side::Players;
//! while battle.status() == BattleStatus::Ongoing {
//!     let report = battle.take_turn(side, 0, &mut rng)?;
//!     for line in &report.lines {
//!         println!("{line}");
//!     }
//!     side = side.opponent();
//! }
//! for line in battle.award_victory(encounter.level) {
//!     println!("{line}");
//! }
//! ```

pub mod actives;
pub mod battle;
pub mod character;
pub mod content;
pub mod events;
pub mod items;
pub mod passives;
pub mod persist;
pub mod rolls;
pub mod stats;
pub mod team;
pub mod testing;

// Primary public API
pub use actives::{Active, ActiveKind, CustomizeError, HitOutcome};
pub use battle::{Battle, BattleError, BattleStatus, Encounter, Side, TurnReport};
pub use character::{Character, CharacterId, CharacterKind, StatBases};
pub use events::{ActionRegistry, BattleEvent, HitContext, Listener};
pub use items::{Item, NameSequence};
pub use passives::Passive;
pub use persist::{PersistError, Roster, SaveRepository, SavedRoster};
pub use stats::{Boost, CharacterStat, Element, Formula, Stat};
pub use team::{Team, TeamKind};
pub use testing::BattleHarness;

//! Default content catalog: the attacks every character starts with, the
//! stock passives, the five elemental enemies, and random item/encounter
//! generation.
//!
//! Catalog entries are templates. Builders hand out fresh characters with
//! their own identities, so two spawns of the same enemy never alias.

use lazy_static::lazy_static;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::actives::Active;
use crate::battle::Encounter;
use crate::character::{Character, StatBases};
use crate::items::{Item, NameSequence};
use crate::passives::Passive;
use crate::stats::{Boost, CharacterStat, Element};
use crate::team::Team;

struct EnemyDef {
    name: &'static str,
    element: Element,
    bases: StatBases,
}

lazy_static! {
    static ref ENEMY_DEFS: Vec<EnemyDef> = vec![
        EnemyDef {
            name: "Lightning Entity",
            element: Element::Lightning,
            bases: StatBases {
                energy: 10.0,
                resistance: -10.0,
                ..StatBases::default()
            },
        },
        EnemyDef {
            name: "Rain Entity",
            element: Element::Rain,
            bases: StatBases {
                potency: 10.0,
                control: -10.0,
                ..StatBases::default()
            },
        },
        EnemyDef {
            name: "Hail Entity",
            element: Element::Hail,
            bases: StatBases {
                resistance: 10.0,
                luck: -10.0,
                ..StatBases::default()
            },
        },
        EnemyDef {
            name: "Wind Entity",
            element: Element::Wind,
            bases: StatBases {
                luck: 10.0,
                potency: -10.0,
                ..StatBases::default()
            },
        },
        EnemyDef {
            name: "Stone Soldier",
            element: Element::Stone,
            bases: StatBases {
                control: 5.0,
                resistance: 10.0,
                luck: -5.0,
                energy: -5.0,
                potency: -5.0,
            },
        },
    ];
    static ref DEFAULT_PASSIVES: Vec<Passive> = vec![
        Passive::threshold(
            "Bulwark",
            Boost::new(CharacterStat::Resistance, 0.5, 1, "Bulwark"),
            0.25,
        ),
        Passive::on_hit_given(
            "Momentum",
            Boost::new(CharacterStat::Luck, 0.25, 3, "Momentum"),
            0.25,
            true,
        ),
        Passive::on_hit_taken(
            "Retribution",
            Boost::new(CharacterStat::Control, -0.25, 3, "Retribution"),
            0.25,
            false,
        ),
    ];
}

/// The four attacks every fresh character knows: an elemental bolt
/// weighted toward their element, plus the three basic melee strikes.
pub fn default_actives(element: Element) -> Vec<Active> {
    let mut bolt =
        Active::elemental(format!("{} bolt", element), 17.0, 5).with_crit_chance(8.0);
    for el in Element::ALL {
        bolt.set_weight_base(el, if el == element { 30.0 } else { 5.0 });
    }
    let slash = Active::melee("Slash", 10.0, 10.0, 10.0, 10.0, 10.0).with_cleave(10.0);
    let jab = Active::melee("Jab", 5.0, 5.0, 15.0, 5.0, 15.0);
    let slam = Active::melee("Slam", 15.0, 5.0, 10.0, 10.0, 10.0);
    vec![bolt, slash, jab, slam]
}

pub fn default_passives() -> Vec<Passive> {
    DEFAULT_PASSIVES.clone()
}

/// A fresh playable character with the default loadout for their element.
pub fn default_player(name: impl Into<String>, element: Element) -> Character {
    let mut character = Character::player(name, element);
    character.actives = default_actives(element);
    character.passives = default_passives();
    character
}

fn build_enemy(def: &EnemyDef) -> Character {
    let mut character =
        Character::enemy(def.name, def.element).with_stat_bases(def.bases.clone());
    character.actives = default_actives(def.element);
    character.passives = default_passives();
    character
}

/// One of each catalog enemy, freshly built.
pub fn default_enemies() -> Vec<Character> {
    ENEMY_DEFS.iter().map(build_enemy).collect()
}

/// Case-insensitive catalog lookup.
pub fn enemy_by_name(name: &str) -> Option<Character> {
    ENEMY_DEFS
        .iter()
        .find(|def| def.name.eq_ignore_ascii_case(name))
        .map(build_enemy)
}

pub fn enemy_names() -> Vec<&'static str> {
    ENEMY_DEFS.iter().map(|def| def.name).collect()
}

/// A randomly generated trinket: one random stat, a small random bonus,
/// and the next name in the sequence.
pub fn random_item<R: Rng>(seq: &mut NameSequence, rng: &mut R) -> Item {
    let stat = CharacterStat::ALL
        .choose(rng)
        .copied()
        .unwrap_or(CharacterStat::Luck);
    let amount = 0.25 * f64::from(rng.gen_range(1..=3));
    Item::new(seq.next_name(), stat, amount)
}

/// A level-1 skirmish against one to four random catalog enemies, paying
/// out one random item.
pub fn random_encounter<R: Rng>(seq: &mut NameSequence, rng: &mut R) -> Encounter {
    let count = rng.gen_range(1..=4);
    let mut enemy_names = Vec::with_capacity(count);
    for _ in 0..count {
        if let Some(def) = ENEMY_DEFS.choose(rng) {
            enemy_names.push(def.name.to_string());
        }
    }
    Encounter {
        name: "Random encounter".to_string(),
        description: "Random battle".to_string(),
        enemy_names,
        level: 1,
        rewards: vec![random_item(seq, rng)],
    }
}

/// Stage an encounter's enemy team from the catalog, leveled to the
/// encounter. `None` if any enemy name is unknown.
pub fn encounter_team(encounter: &Encounter) -> Option<Team> {
    let mut members = Vec::with_capacity(encounter.enemy_names.len());
    for name in &encounter.enemy_names {
        let mut enemy = enemy_by_name(name)?;
        enemy.level = encounter.level.max(1);
        members.push(enemy);
    }
    Some(Team::enemy(encounter.name.clone(), members))
}

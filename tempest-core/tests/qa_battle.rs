//! QA tests for full battle flows.
//!
//! These tests drive complete battles through the public API with seeded
//! RNG, checking the invariants a display layer relies on.
//! Run with: `cargo test -p tempest-core --test qa_battle -- --nocapture`

use tempest_core::content;
use tempest_core::testing::{seeded, BattleHarness};
use tempest_core::{
    Active, Battle, BattleStatus, Boost, Character, CharacterStat, CustomizeError, Element,
    NameSequence, Side, Team,
};

/// Every member of both teams sits inside the 0..=100 HP window.
fn assert_hp_in_bounds(battle: &Battle) {
    for member in battle.players.members.iter().chain(&battle.enemies.members) {
        assert!(
            (0..=100).contains(&member.hp()),
            "{} has out-of-bounds HP {}",
            member.name,
            member.hp()
        );
    }
}

// =============================================================================
// TEST 1: A default-loadout duel runs to completion
// =============================================================================

#[test]
fn test_full_default_duel_resolves() {
    println!("\n=== TEST: Full Default Duel ===\n");

    let players = Team::player(
        "Storm Chasers",
        vec![content::default_player("Tess", Element::Wind)],
    );
    let enemies = Team::enemy(
        "The Field",
        vec![content::enemy_by_name("Stone Soldier").expect("catalog enemy")],
    );
    let mut harness = BattleHarness::new(players, enemies, 42);

    let mut side = Side::Players;
    let mut turns = 0;
    while harness.status() == BattleStatus::Ongoing && turns < 300 {
        let index = harness.affordable_index(side);
        let report = harness.act(side, index).expect("turn should resolve");

        println!("[turn {}] {} used {}", turns + 1, report.actor, report.attack);
        for line in &report.lines {
            println!("  {line}");
        }

        assert_hp_in_bounds(&harness.battle);
        assert_eq!(harness.battle.turn_count(), turns + 1);

        side = side.opponent();
        turns += 1;
    }

    let status = harness.status();
    println!("\nBattle ended after {turns} turns: {status:?}");
    assert_ne!(status, BattleStatus::Ongoing, "duel should resolve");

    if status == BattleStatus::PlayersWon {
        let lines = harness.battle.award_victory(1);
        for line in &lines {
            println!("  {line}");
        }
        assert!(
            lines.iter().any(|l| l.contains("gained 10 XP")),
            "winners should be paid out"
        );
    }

    println!("\nSUCCESS: Duel ran to completion with invariants intact!");
}

// =============================================================================
// TEST 2: Boosts tick only on the owner's turns
// =============================================================================

#[test]
fn test_boosts_tick_only_on_own_turns() {
    println!("\n=== TEST: Boost Ticking Across Turns ===\n");

    // Flattened outcome multipliers keep the damage identical whatever the
    // roll, and no passives means no surprise boosts.
    let strike = || Active::melee("Strike", 10.0, 10.0, 10.0, 20.0, 0.0);
    let players = Team::player(
        "Solo",
        vec![Character::player("Tess", Element::Wind).with_active(strike())],
    );
    let enemies = Team::enemy(
        "Opposition",
        vec![Character::enemy("Golem", Element::Stone).with_active(strike())],
    );
    let mut battle = Battle::new(players, enemies);
    let mut rng = seeded(5);

    let baseline = battle.players.members[0].stat_value(CharacterStat::Resistance);
    let ward = Boost::new(CharacterStat::Resistance, 0.5, 2, "Ward");
    battle.players.members[0].boost(&ward);
    assert!(battle.players.members[0].stat_value(CharacterStat::Resistance) > baseline);

    // Tess's first turn ends with one tick: a turn remains.
    battle.take_turn(Side::Players, 0, &mut rng).expect("turn resolves");
    assert!(battle.players.members[0].stat_value(CharacterStat::Resistance) > baseline);

    // The enemy's turn must not consume Tess's boost.
    battle.take_turn(Side::Enemies, 0, &mut rng).expect("turn resolves");
    assert!(battle.players.members[0].stat_value(CharacterStat::Resistance) > baseline);

    // Tess's second turn burns the last charge.
    battle.take_turn(Side::Players, 0, &mut rng).expect("turn resolves");
    assert_eq!(
        battle.players.members[0].stat_value(CharacterStat::Resistance),
        baseline
    );

    println!("SUCCESS: Boost expired after exactly two of the owner's turns!");
}

// =============================================================================
// TEST 3: Random encounter journey
// =============================================================================

#[test]
fn test_random_encounter_journey() {
    println!("\n=== TEST: Random Encounter Journey ===\n");

    let mut rng = seeded(11);
    let mut names = NameSequence::new();

    let encounter = content::random_encounter(&mut names, &mut rng);
    println!(
        "Encounter '{}': {} enemies, {} reward(s)",
        encounter.name,
        encounter.enemy_names.len(),
        encounter.rewards.len()
    );

    let players = Team::player(
        "Storm Chasers",
        vec![
            content::default_player("Tess", Element::Wind),
            content::default_player("Orrin", Element::Stone),
            content::default_player("Mara", Element::Rain),
        ],
    );
    let enemies = content::encounter_team(&encounter).expect("catalog enemies");
    let mut harness = BattleHarness::new(players, enemies, 11);

    let status = harness.run_to_completion(400);
    println!("Outcome after {} turns: {status:?}", harness.battle.turn_count());
    assert_ne!(status, BattleStatus::Ongoing, "encounter should resolve");

    // Payout and loot only flow on a player win.
    let award = harness.battle.award_victory(encounter.level);
    if status == BattleStatus::PlayersWon {
        assert!(!award.is_empty(), "a win should pay XP");
        for line in &award {
            println!("  {line}");
        }
        for reward in encounter.rewards {
            harness.battle.players.acquire(reward);
        }
        assert_eq!(harness.battle.players.available_items().len(), 1);
    } else {
        assert!(award.is_empty(), "a loss should pay nothing");
    }

    println!("\nSUCCESS: Encounter staged, fought, and settled!");
}

// =============================================================================
// TEST 4: Damage weight customization
// =============================================================================

#[test]
fn test_weight_customization_preserves_total() {
    println!("\n=== TEST: Damage Weight Customization ===\n");

    let mut tess = content::default_player("Tess", Element::Wind);
    let bolt = &mut tess.actives[0];
    let total_before = bolt.total_damage(1);
    println!("Before: {:?}", bolt.damage_distribution(1));

    bolt.shift_damage_weight(Element::Wind, Element::Rain)
        .expect("rain still has weight to give");
    println!("After:  {:?}", bolt.damage_distribution(1));

    assert!(
        (bolt.total_damage(1) - total_before).abs() < 1e-9,
        "shifting weight must not change the total"
    );
    assert!(bolt.weight_base(Element::Wind) > 30.0);
    assert!(bolt.weight_base(Element::Rain) < 5.0);

    // Rain is spent now; a second draw from it is refused.
    let err = bolt
        .shift_damage_weight(Element::Hail, Element::Rain)
        .expect_err("rain is drained");
    assert_eq!(err, CustomizeError::WeightAtFloor(Element::Rain));

    let err = bolt
        .shift_damage_weight(Element::Wind, Element::Wind)
        .expect_err("same element");
    assert_eq!(err, CustomizeError::SameWeight(Element::Wind));

    println!("\nSUCCESS: Customization rules hold!");
}

// =============================================================================
// TEST 5: XP journey to the level cap
// =============================================================================

#[test]
fn test_xp_journey_reaches_level_cap() {
    println!("\n=== TEST: XP Journey to the Cap ===\n");

    let mut tess = content::default_player("Tess", Element::Wind);
    assert_eq!(tess.level, 1);

    let mut victories = 0;
    while tess.level < 20 && victories < 1000 {
        tess.gain_xp(10 * u32::from(tess.level));
        victories += 1;
    }
    println!("Reached level {} after {victories} victories", tess.level);

    assert_eq!(tess.level, 20, "the cap should be reachable");
    assert!(tess.customization_points >= 19, "each level-up pays a point");

    // Past the cap, more XP changes nothing about the level.
    tess.gain_xp(10_000);
    assert_eq!(tess.level, 20);

    println!("\nSUCCESS: Progression capped cleanly at 20!");
}

//! QA tests for save/load and persistence functionality.
//!
//! These tests verify that rosters survive the disk round trip with their
//! progression and customization intact, and that bad save files are
//! rejected instead of half-loaded.
//! Run with: `cargo test -p tempest-core --test qa_persistence -- --nocapture`

use tempfile::TempDir;

use tempest_core::content;
use tempest_core::testing::seeded;
use tempest_core::{
    Battle, CharacterStat, Element, Item, PersistError, Roster, SaveRepository, Side, Team,
};

fn sample_roster() -> Roster {
    let mut tess = content::default_player("Tess", Element::Wind);
    tess.gain_xp(25);
    tess.actives[0]
        .shift_damage_weight(Element::Wind, Element::Rain)
        .expect("rain has weight to give");
    tess.equip(Item::new("Glass Charm", CharacterStat::Luck, 0.5));

    let mut team = Team::player("Storm Chasers", vec![tess]);
    team.inventory
        .push(Item::new("Spare Ring", CharacterStat::Potency, 0.25));
    Roster::new("Storm Chasers", team)
}

// =============================================================================
// TEST 1: Full save/load journey
// =============================================================================

#[tokio::test]
async fn test_roster_save_load_journey() {
    println!("\n=== TEST: Roster Save/Load Journey ===\n");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = SaveRepository::new(temp_dir.path());

    let roster = sample_roster();
    repo.save(&roster).await.expect("Save should succeed");
    println!("Saved roster to {:?}", repo.path_for(&roster.name));

    let loaded = repo.load("Storm Chasers").await.expect("Load should succeed");
    let tess = &loaded.roster.team.members[0];

    // Progression survives.
    assert_eq!(tess.level, 2, "level should be preserved");
    assert_eq!(tess.xp, 15, "leftover XP should be preserved");
    assert_eq!(tess.customization_points, 1);

    // Customization survives.
    assert_eq!(tess.actives[0].weight_base(Element::Wind), 42.5);
    assert_eq!(tess.actives[0].weight_base(Element::Rain), -7.5);

    // Gear survives on both sides of the equip line.
    assert_eq!(tess.equipped_items.len(), 1);
    assert!(tess.equipped_items[0].equipped);
    assert_eq!(loaded.roster.team.inventory.len(), 1);
    assert_eq!(loaded.roster.team.inventory[0].name, "Spare Ring");

    // The loaded team is battle-ready.
    let enemies = Team::enemy(
        "The Field",
        vec![content::enemy_by_name("Hail Entity").expect("catalog enemy")],
    );
    let mut battle = Battle::new(loaded.roster.team, enemies);
    let mut rng = seeded(3);
    let report = battle
        .take_turn(Side::Players, 0, &mut rng)
        .expect("loaded roster should fight");
    println!("First turn after load: {} used {}", report.actor, report.attack);

    println!("\nSUCCESS: Roster round trip preserved everything that matters!");
}

// =============================================================================
// TEST 2: Save file content verification
// =============================================================================

#[tokio::test]
async fn test_save_file_wire_format() {
    println!("\n=== TEST: Save File Wire Format ===\n");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = SaveRepository::new(temp_dir.path());
    repo.save(&sample_roster()).await.expect("Save should succeed");

    let content = std::fs::read_to_string(repo.path_for("Storm Chasers"))
        .expect("Failed to read save file");
    println!("Save file size: {} bytes", content.len());

    let parsed: serde_json::Value =
        serde_json::from_str(&content).expect("Save file should be valid JSON");

    assert_eq!(parsed["version"], 1);
    assert_eq!(parsed["roster"]["team"]["type"], "PlayerTeam");

    let member = &parsed["roster"]["team"]["members"][0];
    assert_eq!(member["type"], "PlayerCharacter");
    assert_eq!(member["element"], "wind");
    assert_eq!(member["actives"][0]["type"], "ElementalAttack");
    assert_eq!(member["actives"][1]["type"], "MeleeAttack");
    assert_eq!(member["passives"][0]["type"], "Threshold Passive");
    assert_eq!(member["passives"][1]["type"], "On Hit Given Passive");
    assert_eq!(member["passives"][2]["type"], "On Hit Taken Passive");

    // Stats land as bare bases, not live stat state.
    assert!(member["stats"]["energy"].is_number());
    assert!(member["stats"].get("boosts").is_none());

    println!("\nSUCCESS: Wire format matches the documented discriminators!");
}

// =============================================================================
// TEST 3: Unknown discriminators are rejected
// =============================================================================

#[tokio::test]
async fn test_unknown_discriminator_rejected() {
    println!("\n=== TEST: Unknown Discriminator Rejection ===\n");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = SaveRepository::new(temp_dir.path());
    repo.save(&sample_roster()).await.expect("Save should succeed");

    let path = repo.path_for("Storm Chasers");
    let content = std::fs::read_to_string(&path).expect("Failed to read save file");
    let doctored = content.replace("PlayerCharacter", "AstralCharacter");
    std::fs::write(&path, doctored).expect("Failed to write save file");

    let err = repo.load("Storm Chasers").await.expect_err("should fail");
    println!("Got expected error: {err}");
    assert!(matches!(err, PersistError::Json(_)));

    println!("\nSUCCESS: Doctored save file was refused!");
}

// =============================================================================
// TEST 4: Version gate on raw files
// =============================================================================

#[tokio::test]
async fn test_version_gate_on_raw_file() {
    println!("\n=== TEST: Version Gate ===\n");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = SaveRepository::new(temp_dir.path());
    repo.save(&sample_roster()).await.expect("Save should succeed");

    let path = repo.path_for("Storm Chasers");
    let content = std::fs::read_to_string(&path).expect("Failed to read save file");
    let doctored = content.replacen("\"version\": 1", "\"version\": 999", 1);
    std::fs::write(&path, doctored).expect("Failed to write save file");

    let err = repo.load("Storm Chasers").await.expect_err("should fail");
    println!("Got expected error: {err}");
    assert!(matches!(
        err,
        PersistError::VersionMismatch {
            expected: 1,
            found: 999,
        }
    ));

    println!("\nSUCCESS: Old save versions are turned away at the door!");
}

// =============================================================================
// TEST 5: Listing and peeking
// =============================================================================

#[tokio::test]
async fn test_list_and_peek_journey() {
    println!("\n=== TEST: Listing and Peeking ===\n");

    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = SaveRepository::new(temp_dir.path());

    for name in ["Westward Company", "Anchor Watch", "Gale Riders"] {
        let team = Team::player(
            format!("{name} team"),
            vec![
                content::default_player("A", Element::Hail),
                content::default_player("B", Element::Stone),
            ],
        );
        repo.save(&Roster::new(name, team))
            .await
            .expect("Save should succeed");
    }

    let saves = repo.list().await.expect("List should succeed");
    let names: Vec<_> = saves
        .iter()
        .map(|s| s.metadata.roster_name.as_str())
        .collect();
    println!("Found saves: {names:?}");
    assert_eq!(names, vec!["Anchor Watch", "Gale Riders", "Westward Company"]);

    let peeked = repo.peek("Gale Riders").await.expect("Peek should succeed");
    assert_eq!(peeked.team_size, 2);
    assert_eq!(peeked.highest_level, 1);

    println!("\nSUCCESS: The save directory reads like a menu!");
}

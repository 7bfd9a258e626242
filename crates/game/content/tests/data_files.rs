//! The shipped data directory loads and is self-consistent.

use std::path::PathBuf;

use combat_content::ContentFactory;
use combat_core::{EncounterKind, EntityId, ItemKind, Recovery};

fn factory() -> ContentFactory {
    ContentFactory::new(PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("data"))
}

#[test]
fn shipped_content_loads() {
    let factory = factory();
    let config = factory.load_config().unwrap();
    assert!(config.skip_defeated_turns);

    let roster = factory.load_roster(&config).unwrap();
    let aria = roster.get(&EntityId::new("giocatore_1")).unwrap();
    assert!(aria.is_player());
    assert_eq!(aria.weapon_faces(), 8);
    assert_eq!(aria.abilities["colpo_potente"].cooldown, 3);
    assert_eq!(
        aria.abilities["cura_ferite"].charges.and_then(|c| c.recovery),
        Some(Recovery::LongRest)
    );
    assert!(aria
        .inventory
        .iter()
        .any(|item| item.kind == ItemKind::Armor));

    let shaman = roster.get(&EntityId::new("sciamano")).unwrap();
    assert!(shaman.is_opponent());
    assert_eq!(shaman.level, 2);
}

#[test]
fn every_encounter_references_known_combatants() {
    let factory = factory();
    let config = factory.load_config().unwrap();
    let roster = factory.load_roster(&config).unwrap();

    let encounters = factory.load_encounters().unwrap();
    assert!(!encounters.is_empty());
    for spec in &encounters {
        spec.validate(&roster).unwrap();
    }

    let duel = factory.load_encounter("duello", &roster).unwrap();
    assert_eq!(duel.kind, EncounterKind::Duel);
    assert!(factory.load_encounter("drago", &roster).is_err());
}

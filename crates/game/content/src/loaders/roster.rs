//! Combatant roster loader.
//!
//! Rosters are RON lists of [`CombatantSpec`]. Older data files store an
//! ability as a bare potency number instead of a full record; both shapes are
//! accepted here and normalized before anything reaches the engine.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, bail};
use combat_core::{
    AbilityScores, Charges, CombatConfig, Combatant, Equipment, Item, Recovery, Roster,
    SpecialAbility, Tags,
};
use serde::Deserialize;
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Ability entry as written in data files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AbilitySpec {
    /// Bare potency; cooldown falls back to the default.
    Legacy(i32),
    Record {
        value: i32,
        #[serde(default)]
        cooldown: Option<u32>,
        /// Uses between rests.
        #[serde(default)]
        charges: Option<u32>,
        /// `"riposo_breve"` or `"riposo_lungo"`.
        #[serde(default)]
        recovery: Option<String>,
    },
}

impl AbilitySpec {
    pub fn resolve(&self, default_cooldown: u32) -> LoadResult<SpecialAbility> {
        match self {
            Self::Legacy(value) => Ok(SpecialAbility::new(*value, default_cooldown)),
            Self::Record {
                value,
                cooldown,
                charges,
                recovery,
            } => {
                let ability = SpecialAbility::new(*value, cooldown.unwrap_or(default_cooldown));
                let recovery = recovery.as_deref().map(parse_recovery).transpose()?;
                Ok(match charges {
                    Some(max) => ability.with_charges(Charges::full(*max, recovery)),
                    None => ability,
                })
            }
        }
    }
}

// Untagged records are buffered before matching, so enum identifiers do not
// survive the trip through RON; recovery is spelled as a string instead.
fn parse_recovery(name: &str) -> LoadResult<Recovery> {
    match name {
        "riposo_breve" => Ok(Recovery::ShortRest),
        "riposo_lungo" => Ok(Recovery::LongRest),
        other => bail!("unknown recovery '{other}'"),
    }
}

/// Combatant record as written in data files.
#[derive(Clone, Debug, Deserialize)]
pub struct CombatantSpec {
    pub id: String,
    pub name: String,
    pub hp_max: u32,
    /// Starting hp; full health when omitted.
    #[serde(default)]
    pub hp: Option<u32>,
    #[serde(default)]
    pub mana_max: u32,
    #[serde(default)]
    pub scores: AbilityScores,
    pub tags: Tags,
    #[serde(default)]
    pub abilities: BTreeMap<String, AbilitySpec>,
    #[serde(default)]
    pub inventory: Vec<Item>,
    #[serde(default)]
    pub equipment: Equipment,
    #[serde(default)]
    pub gold: u32,
    #[serde(default = "default_level")]
    pub level: u32,
    #[serde(default)]
    pub experience_value: Option<u32>,
}

fn default_level() -> u32 {
    1
}

impl CombatantSpec {
    pub fn build(&self, default_cooldown: u32) -> LoadResult<Combatant> {
        if self.hp_max == 0 {
            bail!("combatant '{}' has hp_max 0", self.id);
        }
        if self.hp.is_some_and(|hp| hp > self.hp_max) {
            bail!("combatant '{}' starts above hp_max", self.id);
        }

        let mut combatant = Combatant::new(self.id.as_str(), self.name.as_str(), self.hp_max)
            .with_tags(self.tags)
            .with_scores(self.scores)
            .with_gold(self.gold)
            .with_level(self.level);
        combatant.hp = self.hp.unwrap_or(self.hp_max);
        combatant.mana_max = self.mana_max;
        combatant.mana = self.mana_max;
        combatant.inventory = self.inventory.clone();
        combatant.equipment = self.equipment.clone();
        combatant.experience_value = self.experience_value;
        for (name, spec) in &self.abilities {
            let ability = spec
                .resolve(default_cooldown)
                .with_context(|| format!("ability '{name}' of '{}'", self.id))?;
            combatant.abilities.insert(name.clone(), ability);
        }
        Ok(combatant)
    }
}

/// Loader for combatant rosters from RON files.
pub struct RosterLoader;

impl RosterLoader {
    /// Load a roster from a RON file.
    ///
    /// RON format: `Vec<CombatantSpec>`
    pub fn load(path: &Path) -> LoadResult<Roster> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Roster> {
        Self::parse_with_cooldown(content, CombatConfig::DEFAULT_COOLDOWN)
    }

    /// Like [`RosterLoader::parse`], with legacy abilities taking
    /// `default_cooldown`.
    pub fn parse_with_cooldown(content: &str, default_cooldown: u32) -> LoadResult<Roster> {
        let specs: Vec<CombatantSpec> =
            ron::from_str(content).context("Failed to parse roster RON")?;

        let mut roster = Roster::new();
        for spec in &specs {
            let combatant = spec.build(default_cooldown)?;
            if roster.insert(combatant).is_some() {
                bail!("duplicate combatant id '{}'", spec.id);
            }
        }
        debug!(target: "content", combatants = roster.len(), "roster loaded");
        Ok(roster)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EntityId, ItemKind};

    const ROSTER: &str = r#"
        [
            (
                id: "eroe",
                name: "Eroe",
                hp_max: 30,
                scores: (strength: 14, dexterity: 12),
                tags: ["player"],
                abilities: {
                    "colpo_potente": 5,
                    "cura_ferite": (value: 0, cooldown: 2, charges: 1, recovery: Some("riposo_breve")),
                },
                inventory: [
                    (id: "pozione", name: "Pozione", kind: HealingPotion(heal: 12)),
                ],
            ),
            (
                id: "goblin_1",
                name: "Goblin",
                hp_max: 8,
                hp: Some(5),
                tags: ["nemico"],
                gold: 4,
                experience_value: Some(10),
            ),
        ]
    "#;

    #[test]
    fn legacy_and_record_abilities_normalize() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        let eroe = roster.get(&EntityId::new("eroe")).unwrap();

        assert_eq!(eroe.abilities["colpo_potente"], SpecialAbility::new(5, 3));
        let heal = eroe.abilities["cura_ferite"];
        assert_eq!(heal.cooldown, 2);
        assert_eq!(
            heal.charges,
            Some(Charges::full(1, Some(Recovery::ShortRest)))
        );
        assert_eq!(eroe.scores.strength_mod(), 2);
        assert_eq!(
            eroe.inventory[0].kind,
            ItemKind::HealingPotion { heal: 12 }
        );
    }

    #[test]
    fn optional_fields_take_defaults() {
        let roster = RosterLoader::parse(ROSTER).unwrap();
        let goblin = roster.get(&EntityId::new("goblin_1")).unwrap();

        assert_eq!(goblin.hp, 5);
        assert_eq!(goblin.level, 1);
        assert!(goblin.is_opponent());
        assert_eq!(goblin.experience_value, Some(10));
        assert!(goblin.abilities.is_empty());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let err = RosterLoader::parse(
            r#"[
                (id: "a", name: "A", hp_max: 5, tags: []),
                (id: "a", name: "B", hp_max: 5, tags: []),
            ]"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"));
    }

    #[test]
    fn unknown_tags_fail_to_parse() {
        assert!(
            RosterLoader::parse(r#"[(id: "a", name: "A", hp_max: 5, tags: ["drago"])]"#).is_err()
        );
    }

    #[test]
    fn unknown_recovery_is_rejected() {
        let err = RosterLoader::parse(
            r#"[(id: "a", name: "A", hp_max: 5, tags: [], abilities: {
                "cura_ferite": (value: 0, charges: 1, recovery: Some("sonnellino")),
            })]"#,
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("sonnellino"));
    }

    #[test]
    fn hp_above_max_is_rejected() {
        assert!(
            RosterLoader::parse(r#"[(id: "a", name: "A", hp_max: 5, hp: Some(9), tags: [])]"#)
                .is_err()
        );
    }
}

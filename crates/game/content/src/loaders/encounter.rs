//! Named encounter loader.

use std::path::Path;

use anyhow::{Context, bail, ensure};
use combat_core::{CombatWorld, EncounterContext, EncounterKind, EntityId};
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

/// An encounter as written in data files.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct EncounterSpec {
    pub name: String,
    #[serde(default)]
    pub kind: EncounterKind,
    pub participants: Vec<String>,
}

impl EncounterSpec {
    pub fn context(&self) -> EncounterContext {
        EncounterContext::new(self.participants.iter().map(String::as_str)).with_kind(self.kind)
    }

    /// Checks every participant resolves in `world`.
    pub fn validate<W: CombatWorld + ?Sized>(&self, world: &W) -> LoadResult<()> {
        ensure!(
            !self.participants.is_empty(),
            "encounter '{}' has no participants",
            self.name
        );
        if self.kind == EncounterKind::Duel {
            ensure!(
                self.participants.len() == 2,
                "duel '{}' needs exactly two participants",
                self.name
            );
        }
        for id in &self.participants {
            if world.combatant(&EntityId::new(id.as_str())).is_none() {
                bail!(
                    "encounter '{}' references unknown combatant '{}'",
                    self.name,
                    id
                );
            }
        }
        Ok(())
    }
}

/// Loader for encounter lists from RON files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// RON format: `Vec<EncounterSpec>`
    pub fn load(path: &Path) -> LoadResult<Vec<EncounterSpec>> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<Vec<EncounterSpec>> {
        ron::from_str(content).context("Failed to parse encounter RON")
    }
}

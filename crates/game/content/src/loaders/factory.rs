//! Content factory for loading everything an encounter needs from one directory.

use std::path::{Path, PathBuf};

use anyhow::Context;
use combat_core::{CombatConfig, Roster};

use crate::loaders::{ConfigLoader, EncounterLoader, EncounterSpec, LoadResult, RosterLoader};

/// Content factory that loads all combat content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── combat.toml
/// ├── roster.ron
/// └── encounters.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load combat rules from `combat.toml`, falling back to defaults when
    /// the file is absent.
    pub fn load_config(&self) -> LoadResult<CombatConfig> {
        let path = self.data_dir.join("combat.toml");
        if !path.exists() {
            tracing::debug!(target: "content", path = %path.display(), "no combat.toml, using defaults");
            return Ok(CombatConfig::default());
        }
        ConfigLoader::load(&path)
    }

    /// Load the combatant roster from `roster.ron`.
    pub fn load_roster(&self, config: &CombatConfig) -> LoadResult<Roster> {
        let path = self.data_dir.join("roster.ron");
        let content = crate::loaders::read_file(&path)?;
        RosterLoader::parse_with_cooldown(&content, config.default_cooldown)
            .with_context(|| format!("in {}", path.display()))
    }

    /// Load named encounters from `encounters.ron`.
    pub fn load_encounters(&self) -> LoadResult<Vec<EncounterSpec>> {
        EncounterLoader::load(&self.data_dir.join("encounters.ron"))
    }

    /// Load one encounter by name and check it against `roster`.
    pub fn load_encounter(&self, name: &str, roster: &Roster) -> LoadResult<EncounterSpec> {
        let spec = self
            .load_encounters()?
            .into_iter()
            .find(|spec| spec.name == name)
            .with_context(|| format!("no encounter named '{name}'"))?;
        spec.validate(roster)?;
        Ok(spec)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn missing_config_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), CombatConfig::default());
        assert!(factory.load_roster(&CombatConfig::default()).is_err());
    }
}

//! Combat rules loader.

use std::path::Path;

use anyhow::Context;
use combat_core::CombatConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for combat configuration from TOML files.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load a [`CombatConfig`] from a TOML file.
    ///
    /// Every key is optional; missing keys keep the engine defaults.
    pub fn load(path: &Path) -> LoadResult<CombatConfig> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in {}", path.display()))
    }

    pub fn parse(content: &str) -> LoadResult<CombatConfig> {
        let config: CombatConfig =
            toml::from_str(content).context("Failed to parse combat config TOML")?;
        anyhow::ensure!(
            config.ai.decision_die > 0,
            "ai.decision_die must be at least 1"
        );
        anyhow::ensure!(
            config.message_window > 0,
            "message_window must be at least 1"
        );
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CriticalRule;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse(
            r#"
            gold_cap = 50
            critical_rule = "natural_twenty_always_damages"

            [ai]
            heal_chance = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.gold_cap, 50);
        assert_eq!(config.critical_rule, CriticalRule::NaturalTwentyAlwaysDamages);
        assert_eq!(config.ai.heal_chance, 5);
        assert_eq!(config.ai.power_strike_chance, 4);
        assert_eq!(config.default_cooldown, CombatConfig::DEFAULT_COOLDOWN);
    }

    #[test]
    fn empty_file_is_the_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), CombatConfig::default());
    }

    #[test]
    fn zero_sided_decision_die_is_rejected() {
        let err = ConfigLoader::parse("[ai]\ndecision_die = 0").unwrap_err();
        assert!(err.to_string().contains("decision_die"));
    }
}

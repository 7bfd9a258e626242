//! Data-driven content definitions and loaders.
//!
//! This crate reads the static data an encounter is built from:
//! - Combatant rosters (RON)
//! - Named encounters (RON)
//! - Combat rules configuration (TOML)
//!
//! Content is resolved once at startup and handed to the runtime as plain
//! `combat-core` values; legacy data shapes never reach the engine.

pub mod loaders;

pub use loaders::{
    AbilitySpec, CombatantSpec, ConfigLoader, ContentFactory, EncounterLoader, EncounterSpec,
    LoadResult, RosterLoader,
};

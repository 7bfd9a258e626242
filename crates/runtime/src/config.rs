//! Runtime settings, read from `COMBAT_*` environment variables.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use combat_core::CombatConfig;

use crate::api::{Result, RuntimeError};

/// Where sessions are persisted between calls.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PersistenceMode {
    /// One JSON file per session under `save_dir`.
    #[default]
    File,
    /// Process-local map; sessions survive eviction but not a restart.
    Memory,
    /// Sessions live only while they are in the session map.
    Disabled,
}

impl FromStr for PersistenceMode {
    type Err = ();

    fn from_str(value: &str) -> std::result::Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "file" => Ok(Self::File),
            "memory" => Ok(Self::Memory),
            "none" | "off" | "disabled" => Ok(Self::Disabled),
            _ => Err(()),
        }
    }
}

/// Runtime configuration shared across the session manager and workers.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub combat: CombatConfig,
    /// Idle time after which a session is evicted from memory.
    pub session_ttl: Duration,
    pub persistence: PersistenceMode,
    pub save_dir: PathBuf,
    /// Fixed dice seed for every new session; random when unset.
    pub seed: Option<u64>,
    pub broadcast_interval: Duration,
    /// Upper bound on AI turns run inside a single call.
    pub ai_turn_limit: usize,
    pub event_buffer_size: usize,
}

impl RuntimeConfig {
    pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);
    pub const DEFAULT_BROADCAST_INTERVAL: Duration = Duration::from_secs(2);
    pub const DEFAULT_AI_TURN_LIMIT: usize = 64;

    /// Reads overrides from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads overrides through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(secs) = parse_var::<u64>(&lookup, "COMBAT_SESSION_TTL_SECS")? {
            config.session_ttl = Duration::from_secs(secs);
        }
        if let Some(dir) = lookup("COMBAT_SAVE_DIR") {
            config.save_dir = PathBuf::from(dir);
        }
        if let Some(mode) = parse_var::<PersistenceMode>(&lookup, "COMBAT_PERSISTENCE")? {
            config.persistence = mode;
        }
        config.seed = parse_var::<u64>(&lookup, "COMBAT_SEED")?;
        if let Some(ms) = parse_var::<u64>(&lookup, "COMBAT_BROADCAST_MS")? {
            config.broadcast_interval = Duration::from_millis(ms.max(1));
        }
        if let Some(limit) = parse_var::<usize>(&lookup, "COMBAT_AI_TURN_LIMIT")? {
            config.ai_turn_limit = limit;
        }

        Ok(config)
    }

    pub fn with_combat(mut self, combat: CombatConfig) -> Self {
        self.combat = combat;
        self
    }

    pub fn with_persistence(mut self, persistence: PersistenceMode) -> Self {
        self.persistence = persistence;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// `<data dir>/sessions`, or `./sessions` when no home directory exists.
    pub fn default_save_dir() -> PathBuf {
        directories::ProjectDirs::from("", "", "combat")
            .map(|dirs| dirs.data_dir().join("sessions"))
            .unwrap_or_else(|| PathBuf::from("sessions"))
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            combat: CombatConfig::default(),
            session_ttl: Self::DEFAULT_SESSION_TTL,
            persistence: PersistenceMode::default(),
            save_dir: Self::default_save_dir(),
            seed: None,
            broadcast_interval: Self::DEFAULT_BROADCAST_INTERVAL,
            ai_turn_limit: Self::DEFAULT_AI_TURN_LIMIT,
            event_buffer_size: 100,
        }
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>> {
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    trimmed
        .parse()
        .map(Some)
        .map_err(|_| RuntimeError::InvalidConfig { key, value: raw })
}

//! Client settings: environment first, then command-line arguments.
use std::path::PathBuf;

use anyhow::{Result, bail};

/// Data shipped with the content crate, used when `COMBAT_DATA_DIR` is unset.
const BUNDLED_DATA_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../game/content/data");

pub const DEFAULT_ENCOUNTER: &str = "imboscata";
pub const DEFAULT_MAX_ACTIONS: usize = 1_000;

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub data_dir: PathBuf,
    pub encounter: String,
    /// Session key; reusing an id resumes the stored session.
    pub session_id: String,
    /// Let the auto-pilot pick the player's actions.
    pub auto: bool,
    /// Upper bound on submitted actions before the client gives up.
    pub max_actions: usize,
    pub log_dir: Option<PathBuf>,
}

impl ClientConfig {
    /// Environment variables:
    /// - `COMBAT_DATA_DIR` - directory holding roster, encounters and config
    /// - `COMBAT_ENCOUNTER` - encounter name (default: `imboscata`)
    /// - `COMBAT_SESSION_ID` - session key (default: timestamped)
    /// - `COMBAT_AUTO` - `1`/`true` to play with the auto-pilot
    /// - `COMBAT_MAX_ACTIONS` - action cap (default: 1000)
    /// - `COMBAT_LOG_DIR` - log directory override
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(dir) = lookup("COMBAT_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(name) = lookup("COMBAT_ENCOUNTER") {
            config.encounter = name;
        }
        if let Some(id) = lookup("COMBAT_SESSION_ID") {
            config.session_id = id;
        }
        if let Some(flag) = lookup("COMBAT_AUTO") {
            config.auto = matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true" | "si");
        }
        if let Some(raw) = lookup("COMBAT_MAX_ACTIONS") {
            config.max_actions = match raw.trim().parse() {
                Ok(limit) => limit,
                Err(_) => bail!("COMBAT_MAX_ACTIONS: expected a number, got {raw:?}"),
            };
        }
        config.log_dir = lookup("COMBAT_LOG_DIR").map(PathBuf::from);

        Ok(config)
    }

    /// Applies `[encounter] [--auto] [--data <dir>] [--session <id>]`.
    pub fn with_args(mut self, args: impl IntoIterator<Item = String>) -> Result<Self> {
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--auto" => self.auto = true,
                "--data" => match args.next() {
                    Some(dir) => self.data_dir = PathBuf::from(dir),
                    None => bail!("--data needs a directory"),
                },
                "--session" => match args.next() {
                    Some(id) => self.session_id = id,
                    None => bail!("--session needs an id"),
                },
                flag if flag.starts_with("--") => bail!("unknown option {flag}"),
                name => self.encounter = name.to_owned(),
            }
        }
        Ok(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(BUNDLED_DATA_DIR),
            encounter: DEFAULT_ENCOUNTER.to_owned(),
            session_id: default_session_id(),
            auto: false,
            max_actions: DEFAULT_MAX_ACTIONS,
            log_dir: None,
        }
    }
}

fn default_session_id() -> String {
    format!("partita_{}", chrono::Utc::now().format("%Y%m%d_%H%M%S"))
}

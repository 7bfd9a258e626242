//! Terminal client binary.
//!
//! Loads content from the data directory, opens (or resumes) one encounter
//! through the session manager and plays it on stdin/stdout.
//!
//! ```bash
//! # play the default encounter
//! cargo run -p combat-client
//!
//! # let the auto-pilot fight the duel with a fixed seed
//! COMBAT_SEED=7 cargo run -p combat-client -- duello --auto
//! ```

use anyhow::Result;
use combat_client::{Client, ClientConfig, logging};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let config = ClientConfig::from_env()?.with_args(std::env::args().skip(1))?;
    let _guard = logging::setup_logging(&config.session_id, config.log_dir.as_deref())?;

    tracing::info!("Starting combat client");
    tracing::info!("Session ID: {}", config.session_id);
    tracing::info!("Encounter: {}", config.encounter);

    Client::build(config)?.run().await
}

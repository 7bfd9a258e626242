//! Terminal client: composition root for content, runtime and a player-side
//! action provider.
//!
//! ```text
//! Client
//!   ├─→ ContentFactory (roster, encounter, combat rules from disk)
//!   ├─→ SessionManager + SessionWorker (runtime)
//!   └─→ ActionProvider (stdin or auto-pilot)
//! ```
pub mod command;
pub mod config;
pub mod logging;
pub mod providers;
pub mod render;

pub use config::ClientConfig;
pub use providers::{AutoProvider, StdinProvider};

use std::sync::Arc;

use anyhow::{Context, Result};
use combat_content::{ContentFactory, EncounterSpec};
use combat_core::{CombatView, Roster};
use combat_runtime::{
    ActionProvider, RuntimeConfig, RuntimeError, SessionId, SessionManager, SessionWorker,
    TurnReport,
};

pub struct Client {
    config: ClientConfig,
    manager: Arc<SessionManager>,
    roster: Roster,
    encounter: EncounterSpec,
    provider: Box<dyn ActionProvider>,
}

impl Client {
    /// Loads content and assembles the runtime. Nothing is played yet.
    pub fn build(config: ClientConfig) -> Result<Self> {
        let factory = ContentFactory::new(&config.data_dir);
        let combat = factory.load_config()?;
        let roster = factory.load_roster(&combat)?;
        let encounter = factory.load_encounter(&config.encounter, &roster)?;

        let runtime_config = RuntimeConfig::from_env()?.with_combat(combat);
        tracing::info!(
            persistence = ?runtime_config.persistence,
            save_dir = %runtime_config.save_dir.display(),
            "runtime configured"
        );
        let manager = SessionManager::from_config(runtime_config)
            .context("failed to set up session storage")?;

        let provider: Box<dyn ActionProvider> = if config.auto {
            Box::new(AutoProvider)
        } else {
            Box::new(StdinProvider::new())
        };

        Ok(Self {
            config,
            manager: Arc::new(manager),
            roster,
            encounter,
            provider,
        })
    }

    /// Plays the encounter to its end, the action cap, or Ctrl-C.
    pub async fn run(self) -> Result<()> {
        let worker = SessionWorker::spawn(Arc::clone(&self.manager));
        let id = SessionId::new(self.config.session_id.clone());

        let result = self.play(&id).await;
        worker.shutdown().await?;

        let view = result?;
        if !view.active {
            self.manager.close(&id).await?;
        }
        tracing::info!("Client shutdown complete");
        Ok(())
    }

    async fn play(&self, id: &SessionId) -> Result<CombatView> {
        let mut view = self.start(id).await?;

        for _ in 0..self.config.max_actions {
            let step = tokio::select! {
                step = self.manager.step(id, &view, self.provider.as_ref()) => step?,
                _ = tokio::signal::ctrl_c() => {
                    tracing::info!(session = %id, "interrupted");
                    let view = self.manager.terminate(id, true).await?;
                    print!("\n{}", render::view(&view));
                    return Ok(view);
                }
            };
            let Some(report) = step else {
                return Ok(view);
            };
            show(&report);
            view = report.view;
        }

        tracing::warn!(session = %id, limit = self.config.max_actions, "action cap reached");
        Ok(view)
    }

    /// Opens the configured encounter, or resumes it when the session id is
    /// already stored.
    async fn start(&self, id: &SessionId) -> Result<CombatView> {
        match self
            .manager
            .open(id.clone(), self.roster.clone(), self.encounter.context())
            .await
        {
            Ok(report) => {
                println!("Incontro: {}", self.encounter.name);
                show(&report);
                Ok(report.view)
            }
            Err(RuntimeError::SessionExists(_)) => {
                tracing::info!(session = %id, "resuming stored session");
                let view = self.manager.restore(id).await?;
                println!("Ripresa la partita {id}");
                print!("{}", render::view(&view));
                Ok(view)
            }
            Err(error) => Err(error.into()),
        }
    }
}

fn show(report: &TurnReport) {
    for response in &report.responses {
        println!("{}", render::response(response));
    }
    print!("{}", render::view(&report.view));
}

//! Session manager: the in-process API a transport layer calls.
//!
//! Every call locks exactly one session for its whole read-modify-write, so
//! two requests for the same encounter never interleave while requests for
//! different encounters run in parallel. Non-player turns unblocked by a human
//! action are resolved inside the same call.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use combat_core::{
    CombatAction, CombatEngine, CombatState, CombatView, EncounterContext, PcgRoller, Roster,
};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock, broadcast};
use tracing::{debug, info, warn};

use crate::api::{ActionProvider, ActionResponse, Result, RuntimeError, TurnReport};
use crate::config::{PersistenceMode, RuntimeConfig};
use crate::repository::{FileSessionRepository, InMemorySessionRepository, SessionRepository};
use crate::session::{Session, SessionId};

type SessionHandle = Arc<Mutex<Session>>;

/// A view published to subscribers.
#[derive(Clone, Debug)]
pub struct SessionView {
    pub session: SessionId,
    pub view: CombatView,
}

pub struct SessionManager {
    config: RuntimeConfig,
    sessions: RwLock<HashMap<SessionId, SessionHandle>>,
    repository: Option<Arc<dyn SessionRepository>>,
    views: broadcast::Sender<SessionView>,
}

impl SessionManager {
    pub fn new(config: RuntimeConfig, repository: Option<Arc<dyn SessionRepository>>) -> Self {
        let (views, _) = broadcast::channel(config.event_buffer_size.max(1));
        Self {
            config,
            sessions: RwLock::new(HashMap::new()),
            repository,
            views,
        }
    }

    /// Builds the repository named by `config.persistence`.
    pub fn from_config(config: RuntimeConfig) -> Result<Self> {
        let repository: Option<Arc<dyn SessionRepository>> = match config.persistence {
            PersistenceMode::File => Some(Arc::new(FileSessionRepository::new(&config.save_dir)?)),
            PersistenceMode::Memory => Some(Arc::new(InMemorySessionRepository::new())),
            PersistenceMode::Disabled => None,
        };
        Ok(Self::new(config, repository))
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Subscribe to views published after actions and by the session worker.
    pub fn subscribe(&self) -> broadcast::Receiver<SessionView> {
        self.views.subscribe()
    }

    /// Ids of the sessions currently held in memory.
    pub async fn session_ids(&self) -> Vec<SessionId> {
        let mut ids: Vec<_> = self.sessions.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Opens an encounter, rolls initiative and plays any opening AI turns.
    pub async fn open(
        &self,
        id: impl Into<SessionId>,
        roster: Roster,
        context: EncounterContext,
    ) -> Result<TurnReport> {
        let id = id.into();
        if let Some(repository) = &self.repository {
            if repository.exists(id.as_str())? {
                return Err(RuntimeError::SessionExists(id.to_string()));
            }
        }

        let state = CombatState::from_context(context)?;
        let seed = self.config.seed.unwrap_or_else(rand::random);
        let mut session = Session::new(id.clone(), state, roster, seed);

        let responses = {
            let mut engine = session.engine(&self.config.combat)?;
            engine.begin()?;
            self.run_ai_turns(&mut engine)
        };
        let report = self.report(&session, responses);

        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&id) {
            return Err(RuntimeError::SessionExists(id.to_string()));
        }
        self.persist(&session);
        sessions.insert(id.clone(), Arc::new(Mutex::new(session)));
        drop(sessions);

        info!(target: "runtime", session = %id, seed, "session opened");
        self.publish(&id, &report.view);
        Ok(report)
    }

    /// Executes one action, then every AI turn it unblocks.
    ///
    /// A rejected action comes back as an unsuccessful response and consumes
    /// nothing.
    pub async fn act(&self, id: &SessionId, action: CombatAction) -> Result<TurnReport> {
        let mut session = self.lock(id).await?;

        let responses = {
            let mut engine = session.engine(&self.config.combat)?;
            let first = engine.execute(&action);
            if let Err(error) = &first {
                debug!(target: "runtime", session = %id, code = %combat_core::GameError::error_code(error), "action rejected");
            }
            let accepted = first.is_ok();
            let mut responses = vec![ActionResponse::from(first)];
            if accepted {
                responses.extend(self.run_ai_turns(&mut engine));
            }
            responses
        };

        self.persist(&session);
        let report = self.report(&session, responses);
        drop(session);

        self.publish(id, &report.view);
        Ok(report)
    }

    /// Plays pending AI turns without a human action.
    pub async fn run_ai(&self, id: &SessionId) -> Result<TurnReport> {
        let mut session = self.lock(id).await?;

        let responses = {
            let mut engine = session.engine(&self.config.combat)?;
            self.run_ai_turns(&mut engine)
        };
        self.persist(&session);
        Ok(self.report(&session, responses))
    }

    pub async fn view(&self, id: &SessionId) -> Result<CombatView> {
        let session = self.lock(id).await?;
        Ok(session.view(self.config.combat.message_window))
    }

    /// Runs `f` against the session's engine and persists the result.
    ///
    /// Used for menu flows that change the phase without resolving an action.
    pub async fn with_engine<T>(
        &self,
        id: &SessionId,
        f: impl FnOnce(&mut CombatEngine<'_, Roster, PcgRoller>) -> T,
    ) -> Result<T> {
        let mut session = self.lock(id).await?;
        let value = {
            let mut engine = session.engine(&self.config.combat)?;
            f(&mut engine)
        };
        self.persist(&session);
        Ok(value)
    }

    /// Ends an encounter. A running combat can only be ended with `forced`.
    pub async fn terminate(&self, id: &SessionId, forced: bool) -> Result<CombatView> {
        let mut session = self.lock(id).await?;

        if session.state().is_active() && !forced {
            return Err(RuntimeError::CombatStillActive(id.to_string()));
        }
        session.engine(&self.config.combat)?.terminate(forced);
        self.persist(&session);
        Ok(session.view(self.config.combat.message_window))
    }

    /// Drops a session from memory and from storage.
    pub async fn close(&self, id: &SessionId) -> Result<()> {
        let removed = self.sessions.write().await.remove(id).is_some();
        let stored = match &self.repository {
            Some(repository) => {
                let stored = repository.exists(id.as_str())?;
                repository.delete(id.as_str())?;
                stored
            }
            None => false,
        };
        if !removed && !stored {
            return Err(RuntimeError::SessionNotFound(id.to_string()));
        }
        info!(target: "runtime", session = %id, "session closed");
        Ok(())
    }

    /// Loads a stored session back into memory.
    pub async fn restore(&self, id: &SessionId) -> Result<CombatView> {
        self.view(id).await
    }

    /// Persists and drops sessions idle for longer than the configured TTL.
    ///
    /// Sessions locked by an in-flight call are never evicted. An evicted
    /// copy is marked under its lock, so a call still holding the old handle
    /// resolves the id again instead of acting on a stale state.
    pub async fn evict_expired(&self) -> Vec<SessionId> {
        let now = Instant::now();
        let ttl = self.config.session_ttl;
        let mut evicted = Vec::new();

        self.sessions.write().await.retain(|id, handle| {
            let Ok(mut session) = handle.try_lock() else {
                return true;
            };
            if session.idle_for(now) < ttl {
                return true;
            }
            self.persist(&session);
            session.mark_evicted();
            evicted.push(id.clone());
            false
        });

        for id in &evicted {
            debug!(target: "runtime", session = %id, "session evicted");
        }
        evicted
    }

    /// Publishes the view of every idle session; returns how many were sent.
    pub async fn broadcast_views(&self) -> usize {
        if self.views.receiver_count() == 0 {
            return 0;
        }
        let window = self.config.combat.message_window;
        let sessions = self.sessions.read().await;
        let mut published = 0;
        for (id, handle) in sessions.iter() {
            if let Ok(session) = handle.try_lock() {
                self.publish(id, &session.view(window));
                published += 1;
            }
        }
        published
    }

    /// Drives a session with `provider` for the player side until combat ends
    /// or `max_actions` steps were taken.
    pub async fn play(
        &self,
        id: &SessionId,
        provider: &dyn ActionProvider,
        max_actions: usize,
    ) -> Result<CombatView> {
        let mut view = self.view(id).await?;
        for _ in 0..max_actions {
            match self.step(id, &view, provider).await? {
                Some(report) => view = report.view,
                None => break,
            }
        }
        Ok(view)
    }

    /// Takes one step from `view`: asks `provider` for the player's action,
    /// or plays AI turns left over from a capped AI loop. `None` once the
    /// combat is over.
    ///
    /// Dropping the returned future before it completes leaves the session
    /// as it was or with the step fully applied.
    pub async fn step(
        &self,
        id: &SessionId,
        view: &CombatView,
        provider: &dyn ActionProvider,
    ) -> Result<Option<TurnReport>> {
        if !view.active {
            return Ok(None);
        }
        let Some(actor) = view.current.as_ref() else {
            return Ok(None);
        };
        // Menus are only built for players.
        let report = if view.menu.is_empty() {
            self.run_ai(id).await?
        } else {
            let action = provider.provide_action(actor, view).await?;
            self.act(id, action).await?
        };
        Ok(Some(report))
    }

    /// Locks the live copy of a session, resolving the id again when the
    /// handle was evicted between lookup and lock.
    async fn lock(&self, id: &SessionId) -> Result<OwnedMutexGuard<Session>> {
        loop {
            let session = self.session(id).await?.lock_owned().await;
            if !session.is_evicted() {
                return Ok(session);
            }
            debug!(target: "runtime", session = %id, "handle evicted while waiting, resolving again");
        }
    }

    async fn session(&self, id: &SessionId) -> Result<SessionHandle> {
        if let Some(handle) = self.sessions.read().await.get(id) {
            return Ok(Arc::clone(handle));
        }

        let repository = self
            .repository
            .as_ref()
            .ok_or_else(|| RuntimeError::SessionNotFound(id.to_string()))?;
        let record = repository
            .load(id.as_str())?
            .ok_or_else(|| RuntimeError::SessionNotFound(id.to_string()))?;
        let restored = Session::restore(id.clone(), record)?;

        let mut sessions = self.sessions.write().await;
        let handle = sessions
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(restored)));
        info!(target: "runtime", session = %id, "session restored");
        Ok(Arc::clone(handle))
    }

    fn run_ai_turns(&self, engine: &mut CombatEngine<'_, Roster, PcgRoller>) -> Vec<ActionResponse> {
        let mut responses = Vec::new();
        while engine.state().is_active() && engine.is_ai_turn() {
            if responses.len() >= self.config.ai_turn_limit {
                warn!(target: "runtime", limit = self.config.ai_turn_limit, "AI turn limit reached");
                break;
            }
            match engine.run_ai_turn() {
                Ok(outcome) => responses.push(outcome.into()),
                Err(error) => {
                    warn!(target: "runtime", %error, "AI turn failed");
                    responses.push((&error).into());
                    break;
                }
            }
        }
        responses
    }

    fn report(&self, session: &Session, responses: Vec<ActionResponse>) -> TurnReport {
        TurnReport {
            responses,
            view: session.view(self.config.combat.message_window),
        }
    }

    fn persist(&self, session: &Session) {
        let Some(repository) = &self.repository else {
            return;
        };
        if let Err(error) = repository.save(session.id().as_str(), &session.record()) {
            warn!(target: "runtime", session = %session.id(), %error, "failed to persist session");
        }
    }

    fn publish(&self, id: &SessionId, view: &CombatView) {
        // No subscribers is not an error.
        let _ = self.views.send(SessionView {
            session: id.clone(),
            view: view.clone(),
        });
    }
}

//! One live encounter and the data it owns.

use std::fmt;
use std::time::Instant;

use chrono::{DateTime, Utc};
use combat_core::{CombatConfig, CombatEngine, CombatState, CombatView, PcgRoller, Roster};

use crate::api::Result;
use crate::repository::SessionRecord;

/// Opaque key of a session.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(String);

impl SessionId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for SessionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A combat state with the combatants and dice stream it is played with.
///
/// Sessions are only ever touched behind the manager's per-session lock.
pub struct Session {
    id: SessionId,
    state: CombatState,
    roster: Roster,
    dice: PcgRoller,
    touched: Instant,
    updated_at: DateTime<Utc>,
    /// Set under the lock when the manager drops this copy from memory.
    /// A caller that locks an evicted session must resolve the id again.
    evicted: bool,
}

impl Session {
    pub fn new(id: SessionId, state: CombatState, roster: Roster, seed: u64) -> Self {
        Self {
            id,
            state,
            roster,
            dice: PcgRoller::new(seed),
            touched: Instant::now(),
            updated_at: Utc::now(),
            evicted: false,
        }
    }

    /// Rebuilds a session from storage, validating the stored state.
    pub fn restore(id: SessionId, record: SessionRecord) -> Result<Self> {
        Ok(Self {
            id,
            state: record.state.rehydrate()?,
            roster: record.roster,
            dice: record.dice,
            touched: Instant::now(),
            updated_at: record.updated_at,
            evicted: false,
        })
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn state(&self) -> &CombatState {
        &self.state
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    pub fn is_evicted(&self) -> bool {
        self.evicted
    }

    pub(crate) fn mark_evicted(&mut self) {
        self.evicted = true;
    }

    /// Time since the last call that touched this session.
    pub fn idle_for(&self, now: Instant) -> std::time::Duration {
        now.saturating_duration_since(self.touched)
    }

    /// Borrows the session as an engine for one call.
    pub fn engine<'a>(
        &'a mut self,
        config: &'a CombatConfig,
    ) -> Result<CombatEngine<'a, Roster, PcgRoller>> {
        self.touched = Instant::now();
        self.updated_at = Utc::now();
        Ok(CombatEngine::new(
            &mut self.state,
            &mut self.roster,
            &mut self.dice,
            config,
        )?)
    }

    pub fn view(&self, window: usize) -> CombatView {
        CombatView::build(&self.state, &self.roster, window)
    }

    pub fn record(&self) -> SessionRecord {
        SessionRecord {
            state: self.state.clone(),
            roster: self.roster.clone(),
            dice: self.dice,
            updated_at: self.updated_at,
        }
    }
}

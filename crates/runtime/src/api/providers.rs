//! Asynchronous abstraction for sourcing human intent.
//!
//! Non-player turns are decided by the engine itself. Runtime users plug in
//! [`ActionProvider`] implementations for the player side so an encounter can
//! run with human input, scripted fixtures, or an auto-pilot.
use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use combat_core::{CombatAction, CombatView, EntityId};

use super::errors::{Result, RuntimeError};

/// Trait for providing the action of the combatant holding the turn.
///
/// Different implementations can handle:
/// - Player input (from UI/CLI)
/// - Scripted/replayed actions
/// - Testing fixtures
#[async_trait]
pub trait ActionProvider: Send + Sync {
    /// Provide an action for `actor` given the current view of the encounter.
    async fn provide_action(&self, actor: &EntityId, view: &CombatView) -> Result<CombatAction>;
}

/// Always passes the turn. Useful for testing or as a fallback.
pub struct PassActionProvider;

#[async_trait]
impl ActionProvider for PassActionProvider {
    async fn provide_action(&self, actor: &EntityId, _view: &CombatView) -> Result<CombatAction> {
        Ok(CombatAction::pass(actor.clone()))
    }
}

/// Replays a fixed queue of actions, one per call.
#[derive(Default)]
pub struct ScriptedActionProvider {
    queue: Mutex<VecDeque<CombatAction>>,
}

impl ScriptedActionProvider {
    pub fn new(actions: impl IntoIterator<Item = CombatAction>) -> Self {
        Self {
            queue: Mutex::new(actions.into_iter().collect()),
        }
    }

    pub fn remaining(&self) -> usize {
        self.queue.lock().map(|queue| queue.len()).unwrap_or(0)
    }
}

#[async_trait]
impl ActionProvider for ScriptedActionProvider {
    async fn provide_action(&self, actor: &EntityId, _view: &CombatView) -> Result<CombatAction> {
        let next = match self.queue.lock() {
            Ok(mut queue) => queue.pop_front(),
            Err(poisoned) => poisoned.into_inner().pop_front(),
        };
        next.ok_or_else(|| RuntimeError::ProviderExhausted {
            actor: actor.clone(),
        })
    }
}

//! Unified error types surfaced by the runtime API.
//!
//! Wraps failures from the combat engine, repositories and action providers so
//! clients can bubble them up with consistent context. Expected action
//! failures are not errors here; they come back as unsuccessful
//! [`ActionResponse`](super::ActionResponse)s.
use combat_core::{ActionError, EntityId, InitError, StateError, TurnError};
use thiserror::Error;

pub use crate::repository::RepositoryError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("session '{0}' not found")]
    SessionNotFound(String),

    #[error("session '{0}' already exists")]
    SessionExists(String),

    #[error("combat in session '{0}' is still running; terminate it with force")]
    CombatStillActive(String),

    #[error("failed to open encounter")]
    Init(#[from] InitError),

    #[error("turn order failure")]
    Turn(#[from] TurnError),

    #[error("stored session is inconsistent")]
    State(#[from] StateError),

    #[error("action rejected")]
    Action(#[from] ActionError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("no action available for {actor}")]
    ProviderExhausted { actor: EntityId },

    #[error("invalid value {value:?} for {key}")]
    InvalidConfig { key: &'static str, value: String },

    #[error("session worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),
}

//! Session runtime for server-authoritative combat encounters.
//!
//! This crate keeps many encounters alive at once and serializes every
//! read-modify-write per session. Consumers embed a [`SessionManager`] to open
//! encounters, submit human actions (AI turns run inside the same call), read
//! renderer views and persist sessions between calls.
//!
//! Modules are organized by responsibility:
//! - [`manager`] hosts the session map and the per-call engine driver
//! - [`api`] exposes the types downstream clients interact with
//! - [`repository`] persists sessions as JSON
//! - [`config`] reads runtime settings from the environment
//! - `workers` keeps background tasks internal to the crate
pub mod api;
pub mod config;
pub mod manager;
pub mod repository;
pub mod session;

mod workers;

pub use api::{
    ActionProvider, ActionResponse, PassActionProvider, Result, RuntimeError,
    ScriptedActionProvider, TurnReport,
};
pub use config::{PersistenceMode, RuntimeConfig};
pub use manager::{SessionManager, SessionView};
pub use repository::{
    FileSessionRepository, InMemorySessionRepository, RepositoryError, SessionRecord,
    SessionRepository,
};
pub use session::{Session, SessionId};
pub use workers::SessionWorker;

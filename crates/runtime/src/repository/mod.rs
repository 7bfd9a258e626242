//! Repository layer for live sessions.
//!
//! Repositories handle data that CHANGES during play: the combat state, the
//! combatants it mutates and the dice stream. Static content (rosters,
//! encounters, rules) is loaded by `combat-content`, not stored here.

mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileSessionRepository;
pub use memory::InMemorySessionRepository;
pub use record::SessionRecord;
pub use traits::SessionRepository;

//! Repository contract for saving and loading sessions.

use super::{Result, SessionRecord};

/// Persistence for live sessions, keyed by session id.
///
/// Implementations must tolerate concurrent calls for different ids; the
/// session manager never issues concurrent calls for the same id.
pub trait SessionRepository: Send + Sync {
    /// Save (or overwrite) a session.
    fn save(&self, session_id: &str, record: &SessionRecord) -> Result<()>;

    /// Load a session, `None` when it was never saved.
    fn load(&self, session_id: &str) -> Result<Option<SessionRecord>>;

    /// Delete a session. Deleting a missing session is not an error.
    fn delete(&self, session_id: &str) -> Result<()>;

    /// List all stored session ids, sorted.
    fn list_sessions(&self) -> Result<Vec<String>>;

    fn exists(&self, session_id: &str) -> Result<bool> {
        Ok(self.load(session_id)?.is_some())
    }
}

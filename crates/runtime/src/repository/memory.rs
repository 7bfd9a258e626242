//! In-memory session repository for tests and ephemeral servers.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{RepositoryError, Result, SessionRecord, SessionRepository};

/// Keeps serialized records in a map, so a save/load cycle goes through
/// the same JSON encoding as the file repository.
#[derive(Default)]
pub struct InMemorySessionRepository {
    records: RwLock<BTreeMap<String, String>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionRepository for InMemorySessionRepository {
    fn save(&self, session_id: &str, record: &SessionRecord) -> Result<()> {
        let json = serde_json::to_string(record)?;
        self.records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .insert(session_id.to_owned(), json);
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let records = self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        records
            .get(session_id)
            .map(|json| serde_json::from_str(json).map_err(RepositoryError::from))
            .transpose()
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        self.records
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .remove(session_id);
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        Ok(self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .keys()
            .cloned()
            .collect())
    }

    fn exists(&self, session_id: &str) -> Result<bool> {
        Ok(self
            .records
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?
            .contains_key(session_id))
    }
}

//! File-based SessionRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use super::{RepositoryError, Result, SessionRecord, SessionRepository};

/// Stores each session as `{base_dir}/{session_id}.json`.
///
/// Writes go to a temporary file first and are renamed into place, so a crash
/// mid-write never leaves a truncated session behind.
pub struct FileSessionRepository {
    base_dir: PathBuf,
}

impl FileSessionRepository {
    /// Create a new file-based session repository, creating `base_dir` if needed.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn session_path(&self, session_id: &str) -> Result<PathBuf> {
        let valid = !session_id.is_empty()
            && session_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::InvalidSessionId(session_id.to_owned()));
        }
        Ok(self.base_dir.join(format!("{session_id}.json")))
    }
}

impl SessionRepository for FileSessionRepository {
    fn save(&self, session_id: &str, record: &SessionRecord) -> Result<()> {
        let path = self.session_path(session_id)?;
        let temp_path = path.with_extension("json.tmp");

        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!("Saved session {} to {}", session_id, path.display());
        Ok(())
    }

    fn load(&self, session_id: &str) -> Result<Option<SessionRecord>> {
        let path = self.session_path(session_id)?;
        if !path.exists() {
            return Ok(None);
        }

        let bytes = fs::read(&path)?;
        let record = serde_json::from_slice(&bytes)?;

        tracing::debug!("Loaded session {} from {}", session_id, path.display());
        Ok(Some(record))
    }

    fn delete(&self, session_id: &str) -> Result<()> {
        let path = self.session_path(session_id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted session {}", session_id);
        }
        Ok(())
    }

    fn list_sessions(&self) -> Result<Vec<String>> {
        let mut sessions = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                sessions.push(stem.to_owned());
            }
        }
        sessions.sort_unstable();
        Ok(sessions)
    }

    fn exists(&self, session_id: &str) -> Result<bool> {
        Ok(self.session_path(session_id)?.exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use combat_core::{CombatState, Combatant, PcgRoller, Roster, Tags};

    fn record() -> SessionRecord {
        let roster = Roster::new()
            .with(Combatant::new("eroe", "Eroe", 12).with_tags(Tags::PLAYER))
            .with(Combatant::new("lupo", "Lupo", 6).with_tags(Tags::ENEMY));
        SessionRecord {
            state: CombatState::duel("eroe", "lupo").unwrap(),
            roster,
            dice: PcgRoller::new(3),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn save_load_delete_cycle() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path().join("sessions")).unwrap();
        let record = record();

        repo.save("partita-1", &record).unwrap();
        assert!(repo.exists("partita-1").unwrap());
        assert_eq!(repo.list_sessions().unwrap(), vec!["partita-1".to_owned()]);
        assert_eq!(repo.load("partita-1").unwrap(), Some(record));

        repo.delete("partita-1").unwrap();
        assert!(repo.load("partita-1").unwrap().is_none());
        repo.delete("partita-1").unwrap();
    }

    #[test]
    fn path_like_ids_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();

        assert!(matches!(
            repo.save("../fuori", &record()),
            Err(RepositoryError::InvalidSessionId(_))
        ));
        assert!(matches!(
            repo.load(""),
            Err(RepositoryError::InvalidSessionId(_))
        ));
    }

    #[test]
    fn no_temp_file_survives_a_save() {
        let dir = tempfile::tempdir().unwrap();
        let repo = FileSessionRepository::new(dir.path()).unwrap();
        repo.save("s1", &record()).unwrap();

        let names: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(names, vec![std::ffi::OsString::from("s1.json")]);
    }
}

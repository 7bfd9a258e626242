use chrono::{DateTime, Utc};
use combat_core::{CombatState, PcgRoller, Roster};
use serde::{Deserialize, Serialize};

/// Everything needed to resume a session after a restart.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub state: CombatState,
    pub roster: Roster,
    pub dice: PcgRoller,
    pub updated_at: DateTime<Utc>,
}

use crate::combatant::EntityId;
use crate::error::{ErrorSeverity, GameError};

/// Errors that can occur during turn bookkeeping.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TurnError {
    #[error("participant {0} is unknown to the world")]
    UnknownCombatant(EntityId),

    #[error("no participants to order")]
    NoParticipants,
}

impl GameError for TurnError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCombatant(_) => "TURN_UNKNOWN_COMBATANT",
            Self::NoParticipants => "TURN_NO_PARTICIPANTS",
        }
    }
}

use crate::combatant::EntityId;
use crate::error::{ErrorSeverity, GameError};

/// Errors raised while assembling an encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InitError {
    #[error("an encounter needs at least one participant")]
    EmptyRoster,

    #[error("participant {0} joined the encounter twice")]
    DuplicateParticipant(EntityId),

    #[error("too many participants (max {max})")]
    TooManyParticipants { max: usize },

    #[error("participant {0} is unknown to the world")]
    UnknownCombatant(EntityId),
}

impl GameError for InitError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyRoster => "INIT_EMPTY_ROSTER",
            Self::DuplicateParticipant(_) => "INIT_DUPLICATE_PARTICIPANT",
            Self::TooManyParticipants { .. } => "INIT_TOO_MANY_PARTICIPANTS",
            Self::UnknownCombatant(_) => "INIT_UNKNOWN_COMBATANT",
        }
    }
}

/// Inconsistencies found when rehydrating a stored encounter.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum StateError {
    #[error("stored encounter has no participants")]
    NoParticipants,

    #[error("participant {0} appears twice")]
    DuplicateParticipant(EntityId),

    #[error("initiative order is not a permutation of the participants")]
    OrderMismatch,

    #[error("current turn {0} is not in the initiative order")]
    CurrentNotInOrder(EntityId),

    #[error("active encounter has no current turn")]
    MissingCurrentTurn,

    #[error("round counter must start at 1")]
    InvalidRound,
}

impl GameError for StateError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoParticipants => "STATE_NO_PARTICIPANTS",
            Self::DuplicateParticipant(_) => "STATE_DUPLICATE_PARTICIPANT",
            Self::OrderMismatch => "STATE_ORDER_MISMATCH",
            Self::CurrentNotInOrder(_) => "STATE_CURRENT_NOT_IN_ORDER",
            Self::MissingCurrentTurn => "STATE_MISSING_CURRENT_TURN",
            Self::InvalidRound => "STATE_INVALID_ROUND",
        }
    }
}

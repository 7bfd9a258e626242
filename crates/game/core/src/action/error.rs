use crate::combatant::EntityId;
use crate::error::{ErrorSeverity, GameError};

/// Expected reasons an action is refused. None of them consume the turn.
///
/// Messages are player-facing and surface verbatim as `messaggio`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActionError {
    #[error("Nessun combattimento in corso")]
    CombatNotActive,

    #[error("Non è il turno di questa entità")]
    NotYourTurn { actor: EntityId },

    #[error("Entità {0} non trovata")]
    UnknownCombatant(EntityId),

    #[error("{0} è fuori combattimento")]
    Defeated(EntityId),

    #[error("Il bersaglio {0} è già sconfitto")]
    TargetDefeated(EntityId),

    #[error("Bersaglio {0} non trovato")]
    TargetNotFound(EntityId),

    #[error("Nessun bersaglio valido")]
    NoTarget,

    #[error("{0} non è un bersaglio valido per questa azione")]
    InvalidTarget(EntityId),

    #[error("Abilità {0} non conosciuta")]
    AbilityNotKnown(String),

    #[error("L'abilità {ability} non è ancora pronta ({remaining} round)")]
    AbilityNotReady { ability: String, remaining: u32 },

    #[error("L'abilità {0} non ha più utilizzi")]
    AbilityExhausted(String),

    #[error("Abilità {0} non ancora implementata")]
    AbilityNotImplemented(String),

    #[error("Oggetto {0} non trovato nell'inventario")]
    ItemNotFound(String),

    #[error("L'oggetto {0} non può essere usato in combattimento")]
    ItemNotUsable(String),

    #[error("L'oggetto {0} non può essere equipaggiato")]
    ItemNotEquippable(String),

    #[error("{0} non è controllato dall'IA")]
    NotAiControlled(EntityId),
}

impl GameError for ActionError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCombatant(_) => ErrorSeverity::Internal,
            Self::AbilityNotImplemented(_) => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CombatNotActive => "ACTION_COMBAT_NOT_ACTIVE",
            Self::NotYourTurn { .. } => "ACTION_NOT_YOUR_TURN",
            Self::UnknownCombatant(_) => "ACTION_UNKNOWN_COMBATANT",
            Self::Defeated(_) => "ACTION_ACTOR_DEFEATED",
            Self::TargetDefeated(_) => "ACTION_TARGET_DEFEATED",
            Self::TargetNotFound(_) => "ACTION_TARGET_NOT_FOUND",
            Self::NoTarget => "ACTION_NO_TARGET",
            Self::InvalidTarget(_) => "ACTION_INVALID_TARGET",
            Self::AbilityNotKnown(_) => "ACTION_ABILITY_NOT_KNOWN",
            Self::AbilityNotReady { .. } => "ACTION_ABILITY_NOT_READY",
            Self::AbilityExhausted(_) => "ACTION_ABILITY_EXHAUSTED",
            Self::AbilityNotImplemented(_) => "ACTION_ABILITY_NOT_IMPLEMENTED",
            Self::ItemNotFound(_) => "ACTION_ITEM_NOT_FOUND",
            Self::ItemNotUsable(_) => "ACTION_ITEM_NOT_USABLE",
            Self::ItemNotEquippable(_) => "ACTION_ITEM_NOT_EQUIPPABLE",
            Self::NotAiControlled(_) => "ACTION_NOT_AI_CONTROLLED",
        }
    }
}

//! Wire payloads returned to transport layers.

use combat_core::{ActionEffect, ActionError, ActionKind, ActionOutcome, CombatView, GameError};
use serde::{Deserialize, Serialize};

/// Result of one action as the API dictionary
/// `{ successo, tipo, messaggio, dettagli }`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionResponse {
    #[serde(rename = "successo")]
    pub success: bool,
    #[serde(rename = "tipo", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<ActionKind>,
    #[serde(rename = "messaggio")]
    pub message: String,
    #[serde(rename = "dettagli", default, skip_serializing_if = "Option::is_none")]
    pub details: Option<ActionEffect>,
    /// Stable error code for failed actions.
    #[serde(rename = "codice", default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl ActionResponse {
    pub fn is_success(&self) -> bool {
        self.success
    }
}

impl From<ActionOutcome> for ActionResponse {
    fn from(outcome: ActionOutcome) -> Self {
        Self {
            success: true,
            kind: Some(outcome.kind),
            message: outcome.message,
            details: Some(outcome.effect),
            code: None,
        }
    }
}

impl From<&ActionError> for ActionResponse {
    fn from(error: &ActionError) -> Self {
        Self {
            success: false,
            kind: None,
            message: error.to_string(),
            details: None,
            code: Some(error.error_code().to_owned()),
        }
    }
}

impl From<Result<ActionOutcome, ActionError>> for ActionResponse {
    fn from(result: Result<ActionOutcome, ActionError>) -> Self {
        match result {
            Ok(outcome) => outcome.into(),
            Err(error) => (&error).into(),
        }
    }
}

/// Everything one call into a session produced: the submitted action, the
/// AI turns it unblocked, and the view afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnReport {
    #[serde(rename = "risposte")]
    pub responses: Vec<ActionResponse>,
    #[serde(rename = "vista")]
    pub view: CombatView,
}

impl TurnReport {
    /// The first response, i.e. the action that was submitted.
    pub fn primary(&self) -> Option<&ActionResponse> {
        self.responses.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{EntityId, HealReport};

    #[test]
    fn success_uses_italian_wire_keys() {
        let outcome = ActionOutcome {
            actor: EntityId::new("eroe"),
            kind: ActionKind::Item,
            message: "Eroe si cura di 10 hp.".into(),
            effect: ActionEffect::Heal(HealReport {
                target: EntityId::new("eroe"),
                amount: 10,
                target_hp: 18,
            }),
        };
        let json = serde_json::to_value(ActionResponse::from(outcome)).unwrap();

        assert_eq!(json["successo"], true);
        assert_eq!(json["tipo"], "oggetto");
        assert_eq!(json["dettagli"]["cura"], 10);
        assert!(json.get("codice").is_none());
    }

    #[test]
    fn failure_carries_message_and_code() {
        let error = ActionError::NotYourTurn {
            actor: EntityId::new("eroe"),
        };
        let response = ActionResponse::from(&error);

        assert!(!response.is_success());
        assert_eq!(response.message, "Non è il turno di questa entità");
        assert_eq!(response.code.as_deref(), Some(error.error_code()));
    }
}

//! Authoritative state of one encounter.
//!
//! [`CombatState`] owns participant ids, the initiative order, the turn
//! pointer, the round counter and the narrative log. Combatants themselves
//! live in the world; the state only references them by id. Runtime layers
//! clone or serialize this state but mutate it exclusively through
//! [`crate::engine::CombatEngine`].
mod error;
mod log;
mod phase;

use std::collections::BTreeMap;

use arrayvec::ArrayVec;

pub use error::{InitError, StateError};
pub use log::MessageLog;
pub use phase::Phase;

use crate::combatant::EntityId;
use crate::config::CombatConfig;

/// Participant ids with a fixed upper bound.
pub type ParticipantList = ArrayVec<EntityId, { CombatConfig::MAX_COMBATANTS }>;

/// Kind of encounter, kept for the legacy single-opponent flow.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EncounterKind {
    #[default]
    #[strum(serialize = "scontro")]
    #[cfg_attr(feature = "serde", serde(rename = "scontro"))]
    Skirmish,
    #[strum(serialize = "duello")]
    #[cfg_attr(feature = "serde", serde(rename = "duello"))]
    Duel,
}

/// Everything needed to open an encounter.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EncounterContext {
    #[cfg_attr(feature = "serde", serde(rename = "partecipanti"))]
    pub participants: Vec<EntityId>,
    #[cfg_attr(feature = "serde", serde(rename = "tipo_incontro", default))]
    pub kind: EncounterKind,
}

impl EncounterContext {
    pub fn new<I, T>(participants: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        Self {
            participants: participants.into_iter().map(Into::into).collect(),
            kind: EncounterKind::Skirmish,
        }
    }

    pub fn with_kind(mut self, kind: EncounterKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Side of the fight, as reported by the winner check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[strum(serialize = "giocatore")]
    #[cfg_attr(feature = "serde", serde(rename = "giocatore"))]
    Players,
    #[strum(serialize = "nemico")]
    #[cfg_attr(feature = "serde", serde(rename = "nemico"))]
    Enemies,
}

/// Loot and experience granted for one defeated opponent.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Reward {
    #[cfg_attr(feature = "serde", serde(rename = "destinatario"))]
    pub recipient: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "sconfitto"))]
    pub source: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "oro"))]
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(rename = "oggetto", default))]
    pub item: Option<String>,
    #[cfg_attr(feature = "serde", serde(rename = "esperienza"))]
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(rename = "livello_aumentato", default))]
    pub leveled_up: bool,
}

/// How an encounter ended.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatOutcome {
    #[cfg_attr(feature = "serde", serde(rename = "vincitore", default))]
    pub winner: Option<Side>,
    #[cfg_attr(feature = "serde", serde(rename = "fuggito", default))]
    pub fled: Option<EntityId>,
    #[cfg_attr(feature = "serde", serde(rename = "forzato", default))]
    pub forced: bool,
    #[cfg_attr(feature = "serde", serde(rename = "ricompense", default))]
    pub rewards: Vec<Reward>,
}

/// Canonical snapshot of an encounter.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatState {
    /// Join order. Fixed once the encounter is created.
    #[cfg_attr(feature = "serde", serde(rename = "partecipanti"))]
    participants: ParticipantList,

    /// Participants sorted by descending initiative; empty until rolled.
    #[cfg_attr(feature = "serde", serde(rename = "ordine_iniziativa", default))]
    order: ParticipantList,

    #[cfg_attr(feature = "serde", serde(rename = "turno_corrente", default))]
    current: Option<EntityId>,

    #[cfg_attr(feature = "serde", serde(rename = "round_corrente"))]
    round: u32,

    #[cfg_attr(feature = "serde", serde(rename = "in_corso"))]
    active: bool,

    #[cfg_attr(feature = "serde", serde(rename = "fase_corrente"))]
    phase: Phase,

    #[cfg_attr(feature = "serde", serde(rename = "messaggi", default))]
    messages: MessageLog,

    /// Scratch values for multi-step menu flows.
    #[cfg_attr(feature = "serde", serde(rename = "dati_temporanei", default))]
    scratch: BTreeMap<String, String>,

    #[cfg_attr(feature = "serde", serde(rename = "tipo_incontro", default))]
    encounter: EncounterKind,

    #[cfg_attr(feature = "serde", serde(rename = "esito", default))]
    outcome: Option<CombatOutcome>,

    /// Position of `current` inside `order`. Recomputed by [`Self::rehydrate`].
    #[cfg_attr(feature = "serde", serde(skip))]
    turn_index: Option<usize>,
}

impl CombatState {
    /// Creates an idle encounter from a participant list.
    pub fn from_context(context: EncounterContext) -> Result<Self, InitError> {
        if context.participants.is_empty() {
            return Err(InitError::EmptyRoster);
        }

        let mut participants = ParticipantList::new();
        for id in context.participants {
            if participants.contains(&id) {
                return Err(InitError::DuplicateParticipant(id));
            }
            participants
                .try_push(id)
                .map_err(|_| InitError::TooManyParticipants {
                    max: CombatConfig::MAX_COMBATANTS,
                })?;
        }

        Ok(Self {
            participants,
            order: ParticipantList::new(),
            current: None,
            round: 1,
            active: false,
            phase: Phase::Initializing,
            messages: MessageLog::default(),
            scratch: BTreeMap::new(),
            encounter: context.kind,
            outcome: None,
            turn_index: None,
        })
    }

    /// Legacy single-opponent encounter.
    pub fn duel(
        player: impl Into<EntityId>,
        opponent: impl Into<EntityId>,
    ) -> Result<Self, InitError> {
        Self::from_context(
            EncounterContext::new([player.into(), opponent.into()])
                .with_kind(EncounterKind::Duel),
        )
    }

    /// Validates a deserialized state and restores the turn pointer.
    pub fn rehydrate(mut self) -> Result<Self, StateError> {
        if self.participants.is_empty() {
            return Err(StateError::NoParticipants);
        }
        for (index, id) in self.participants.iter().enumerate() {
            if self.participants[..index].contains(id) {
                return Err(StateError::DuplicateParticipant(id.clone()));
            }
        }
        if !self.order.is_empty() {
            let is_permutation = self.order.len() == self.participants.len()
                && self.order.iter().all(|id| self.participants.contains(id));
            if !is_permutation {
                return Err(StateError::OrderMismatch);
            }
        }
        if self.round == 0 {
            return Err(StateError::InvalidRound);
        }

        self.turn_index = match &self.current {
            Some(current) => Some(
                self.order
                    .iter()
                    .position(|id| id == current)
                    .ok_or_else(|| StateError::CurrentNotInOrder(current.clone()))?,
            ),
            None if self.active => return Err(StateError::MissingCurrentTurn),
            None => None,
        };

        Ok(self)
    }

    pub fn participants(&self) -> &[EntityId] {
        &self.participants
    }

    pub fn order(&self) -> &[EntityId] {
        &self.order
    }

    pub fn current(&self) -> Option<&EntityId> {
        self.current.as_ref()
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn encounter(&self) -> EncounterKind {
        self.encounter
    }

    pub fn outcome(&self) -> Option<&CombatOutcome> {
        self.outcome.as_ref()
    }

    pub fn log(&self) -> &MessageLog {
        &self.messages
    }

    pub fn recent_messages(&self, window: usize) -> &[String] {
        self.messages.recent(window)
    }

    pub fn scratch(&self) -> &BTreeMap<String, String> {
        &self.scratch
    }

    pub fn scratch_value(&self, key: &str) -> Option<&str> {
        self.scratch.get(key).map(String::as_str)
    }

    pub fn is_participant(&self, id: &EntityId) -> bool {
        self.participants.contains(id)
    }

    pub(crate) fn turn_index(&self) -> Option<usize> {
        self.turn_index
    }

    pub(crate) fn say(&mut self, message: impl Into<String>) {
        self.messages.push(message);
    }

    pub(crate) fn set_phase(&mut self, phase: Phase) {
        self.phase = phase;
    }

    pub(crate) fn set_order(&mut self, order: ParticipantList) {
        self.order = order;
    }

    pub(crate) fn set_turn(&mut self, index: usize) {
        self.turn_index = Some(index);
        self.current = self.order.get(index).cloned();
    }

    pub(crate) fn next_round(&mut self) {
        self.round = self.round.saturating_add(1);
    }

    pub(crate) fn start(&mut self) {
        self.active = true;
        self.round = 1;
        self.outcome = None;
    }

    pub(crate) fn stop(&mut self, outcome: CombatOutcome) {
        self.active = false;
        self.current = None;
        self.turn_index = None;
        self.phase = Phase::Ended;
        self.scratch.clear();
        self.outcome = Some(outcome);
    }

    pub(crate) fn scratch_mut(&mut self) -> &mut BTreeMap<String, String> {
        &mut self.scratch
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_rejects_empty_duplicate_and_oversized_rosters() {
        assert_eq!(
            CombatState::from_context(EncounterContext::default()),
            Err(InitError::EmptyRoster)
        );
        assert_eq!(
            CombatState::from_context(EncounterContext::new(["a", "b", "a"])),
            Err(InitError::DuplicateParticipant("a".into()))
        );

        let crowd = (0..=CombatConfig::MAX_COMBATANTS).map(|i| format!("c{i}"));
        assert_eq!(
            CombatState::from_context(EncounterContext::new(crowd)),
            Err(InitError::TooManyParticipants {
                max: CombatConfig::MAX_COMBATANTS
            })
        );
    }

    #[test]
    fn fresh_state_is_idle() {
        let state = CombatState::duel("giocatore_1", "goblin_1").unwrap();
        assert_eq!(state.participants().len(), 2);
        assert_eq!(state.encounter(), EncounterKind::Duel);
        assert_eq!(state.phase(), Phase::Initializing);
        assert_eq!(state.round(), 1);
        assert!(!state.is_active());
        assert!(state.current().is_none());
        assert!(state.order().is_empty());
    }

    #[test]
    fn rehydrate_restores_turn_pointer() {
        let mut state = CombatState::from_context(EncounterContext::new(["a", "b", "c"])).unwrap();
        let order: ParticipantList = ["c", "a", "b"].into_iter().map(EntityId::from).collect();
        state.set_order(order);
        state.start();
        state.set_turn(2);
        state.turn_index = None;

        let state = state.rehydrate().unwrap();
        assert_eq!(state.turn_index(), Some(2));
        assert_eq!(state.current(), Some(&EntityId::new("b")));
    }

    #[test]
    fn rehydrate_rejects_inconsistent_state() {
        let mut state = CombatState::from_context(EncounterContext::new(["a", "b"])).unwrap();
        state.start();
        assert_eq!(
            state.clone().rehydrate(),
            Err(StateError::MissingCurrentTurn)
        );

        state.set_order(["a"].into_iter().map(EntityId::from).collect());
        assert_eq!(state.clone().rehydrate(), Err(StateError::OrderMismatch));

        state.set_order(["b", "a"].into_iter().map(EntityId::from).collect());
        state.current = Some("z".into());
        assert_eq!(
            state.rehydrate(),
            Err(StateError::CurrentNotInOrder("z".into()))
        );
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serializes_with_wire_keys() {
        let mut state = CombatState::duel("giocatore_1", "goblin_1").unwrap();
        state.say("Inizia il combattimento!");
        let json = serde_json::to_value(&state).unwrap();

        assert_eq!(json["partecipanti"][1], "goblin_1");
        assert_eq!(json["round_corrente"], 1);
        assert_eq!(json["in_corso"], false);
        assert_eq!(json["fase_corrente"], "inizializzazione");
        assert_eq!(json["tipo_incontro"], "duello");
        assert_eq!(json["messaggi"][0], "Inizia il combattimento!");
        assert!(json.get("turn_index").is_none());
    }
}

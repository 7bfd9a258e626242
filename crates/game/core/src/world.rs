//! World lookup capability consumed by the engine.
//!
//! The engine never owns combatants. It resolves them through a
//! [`CombatWorld`], which the surrounding game implements over whatever entity
//! store it has. [`Roster`] is the in-memory implementation used by the
//! runtime and tests.

use std::collections::BTreeMap;

use crate::combatant::{Combatant, EntityId};

/// Resolves combatants by id.
pub trait CombatWorld {
    fn combatant(&self, id: &EntityId) -> Option<&Combatant>;

    fn combatant_mut(&mut self, id: &EntityId) -> Option<&mut Combatant>;

    /// Grants experience and returns whether the combatant gained a level.
    ///
    /// Leveling rules belong to the entity subsystem; the default
    /// implementation only accumulates experience.
    fn award_experience(&mut self, id: &EntityId, amount: u32) -> bool {
        if let Some(combatant) = self.combatant_mut(id) {
            combatant.experience = combatant.experience.saturating_add(amount);
        }
        false
    }
}

/// In-memory set of combatants keyed by id.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Roster {
    combatants: BTreeMap<EntityId, Combatant>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a combatant, replacing any previous one with the same id.
    pub fn insert(&mut self, combatant: Combatant) -> Option<Combatant> {
        self.combatants.insert(combatant.id.clone(), combatant)
    }

    pub fn with(mut self, combatant: Combatant) -> Self {
        self.insert(combatant);
        self
    }

    pub fn get(&self, id: &EntityId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    pub fn remove(&mut self, id: &EntityId) -> Option<Combatant> {
        self.combatants.remove(id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Combatant> {
        self.combatants.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = &EntityId> {
        self.combatants.keys()
    }

    pub fn len(&self) -> usize {
        self.combatants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.combatants.is_empty()
    }
}

impl FromIterator<Combatant> for Roster {
    fn from_iter<T: IntoIterator<Item = Combatant>>(iter: T) -> Self {
        let mut roster = Self::new();
        for combatant in iter {
            roster.insert(combatant);
        }
        roster
    }
}

impl CombatWorld for Roster {
    fn combatant(&self, id: &EntityId) -> Option<&Combatant> {
        self.combatants.get(id)
    }

    fn combatant_mut(&mut self, id: &EntityId) -> Option<&mut Combatant> {
        self.combatants.get_mut(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_experience_award_accumulates_without_leveling() {
        let mut roster = Roster::new().with(Combatant::new("eroe", "Eroe", 10));
        let id = EntityId::new("eroe");

        assert!(!roster.award_experience(&id, 40));
        assert!(!roster.award_experience(&id, 2));
        assert_eq!(roster.get(&id).map(|c| c.experience), Some(42));
        assert!(!roster.award_experience(&EntityId::new("fantasma"), 5));
    }

    #[test]
    fn insert_replaces_same_id() {
        let mut roster = Roster::new();
        assert!(roster.insert(Combatant::new("a", "A", 5)).is_none());
        assert!(roster.insert(Combatant::new("a", "A2", 7)).is_some());
        assert_eq!(roster.len(), 1);
        assert_eq!(roster.get(&"a".into()).map(|c| c.hp_max), Some(7));
    }
}

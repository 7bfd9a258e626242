//! End-of-combat bookkeeping: loot, experience and the no-permadeath rule.

use tracing::info;

use crate::combatant::{Combatant, EntityId};
use crate::dice::DiceRoller;
use crate::state::{CombatOutcome, Reward, Side};
use crate::world::CombatWorld;

use super::CombatEngine;

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// Settles a finished encounter and records its outcome.
    pub(crate) fn conclude(&mut self) -> CombatOutcome {
        let winner = self.winner();
        let rewards = match winner {
            Side::Players => self.distribute_rewards(),
            Side::Enemies => {
                self.revive_defeated_players();
                Vec::new()
            }
        };

        let message = match winner {
            Side::Players => "Vittoria! Tutti i nemici sono stati sconfitti.",
            Side::Enemies => "Sconfitta... ma riesci a sopravvivere.",
        };
        self.state.say(message);

        let outcome = CombatOutcome {
            winner: Some(winner),
            rewards,
            ..CombatOutcome::default()
        };
        info!(
            target: "combat",
            winner = %winner,
            rounds = self.state.round(),
            "combat concluded"
        );
        self.finish(outcome.clone());
        outcome
    }

    /// Stops the encounter and releases every participant.
    pub(crate) fn finish(&mut self, outcome: CombatOutcome) {
        self.release_participants();
        self.state.stop(outcome);
    }

    pub(crate) fn release_participants(&mut self) {
        for id in self.state.participants().to_vec() {
            if let Some(combatant) = self.world.combatant_mut(&id) {
                combatant.in_combat = false;
            }
        }
    }

    /// Loot from every defeated opponent goes to the lead living player.
    fn distribute_rewards(&mut self) -> Vec<Reward> {
        let participants = self.state.participants().to_vec();
        let Some(recipient) = participants
            .iter()
            .find(|id| {
                self.world
                    .combatant(id)
                    .is_some_and(|c| c.is_player() && c.is_alive())
            })
            .cloned()
        else {
            return Vec::new();
        };

        let defeated: Vec<EntityId> = participants
            .into_iter()
            .filter(|id| {
                self.world
                    .combatant(id)
                    .is_some_and(|c| c.is_opponent() && !c.is_alive())
            })
            .collect();

        defeated
            .iter()
            .filter_map(|source| self.loot(&recipient, source))
            .collect()
    }

    fn loot(&mut self, recipient: &EntityId, source: &EntityId) -> Option<Reward> {
        let gold_cap = self.config.gold_cap;
        let fallback = self.config.fallback_experience;

        let loser = self.world.combatant_mut(source)?;
        let gold = loser.gold.min(gold_cap);
        loser.gold -= gold;
        let item = (!loser.inventory.is_empty()).then(|| loser.inventory.remove(0));
        let experience = experience_for(loser, fallback);
        let loser_name = loser.name.clone();

        let winner = self.world.combatant_mut(recipient)?;
        winner.gold = winner.gold.saturating_add(gold);
        let item_name = item.as_ref().map(|item| item.name.clone());
        let item_id = item.as_ref().map(|item| item.id.clone());
        if let Some(item) = item {
            winner.inventory.push(item);
        }
        let winner_name = winner.name.clone();

        let leveled_up = self.world.award_experience(recipient, experience);

        self.state.say(format!(
            "{winner_name} ottiene {gold} oro e {experience} esperienza da {loser_name}."
        ));
        if let Some(name) = item_name {
            self.state.say(format!("{winner_name} raccoglie {name}."));
        }
        if leveled_up {
            self.state.say(format!("{winner_name} sale di livello!"));
        }

        Some(Reward {
            recipient: recipient.clone(),
            source: source.clone(),
            gold,
            item: item_id,
            experience,
            leveled_up,
        })
    }

    /// After a defeat no player is killed: anyone at 0 hp is left at 1.
    fn revive_defeated_players(&mut self) {
        for id in self.state.participants().to_vec() {
            if let Some(combatant) = self.world.combatant_mut(&id) {
                if combatant.is_player() && !combatant.is_alive() {
                    combatant.hp = 1.min(combatant.hp_max);
                }
            }
        }
    }
}

/// `experience_value * (1 + level)`, or the flat fallback per level.
fn experience_for(loser: &Combatant, fallback: u32) -> u32 {
    loser
        .experience_value
        .unwrap_or(fallback)
        .saturating_mul(loser.level.saturating_add(1))
}

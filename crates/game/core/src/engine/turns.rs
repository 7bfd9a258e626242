use tracing::debug;

use crate::combatant::{Combatant, EntityId};
use crate::dice::{DiceRoller, Die};
use crate::state::{ParticipantList, Phase, Side};
use crate::world::CombatWorld;

use super::{CombatEngine, TurnError};

/// Turn and round bookkeeping for CombatEngine.
impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// Rolls `d20 + dexterity modifier` for every participant and sorts
    /// them by descending initiative. Ties keep join order.
    pub fn roll_initiative(&mut self) -> Result<&[EntityId], TurnError> {
        if self.state.participants().is_empty() {
            return Err(TurnError::NoParticipants);
        }

        let mut rolled: Vec<(EntityId, i32)> = Vec::with_capacity(self.state.participants().len());
        for id in self.state.participants().to_vec() {
            let natural = Die::D20.roll(&mut *self.dice);
            let combatant = self
                .world
                .combatant_mut(&id)
                .ok_or_else(|| TurnError::UnknownCombatant(id.clone()))?;
            combatant.initiative = combatant.scores.dexterity_mod() + natural as i32;
            debug!(
                target: "combat",
                combatant = %id,
                natural,
                initiative = combatant.initiative,
                "initiative rolled"
            );
            rolled.push((id, combatant.initiative));
        }

        rolled.sort_by(|a, b| b.1.cmp(&a.1));
        let order: ParticipantList = rolled.into_iter().map(|(id, _)| id).collect();
        self.state.set_order(order);
        Ok(self.state.order())
    }

    /// Hands the first turn to the head of the initiative order, rolling
    /// initiative first if needed.
    pub fn start_turns(&mut self) -> Result<EntityId, TurnError> {
        if self.state.order().is_empty() {
            self.roll_initiative()?;
        }

        self.state.set_turn(0);
        self.state.set_phase(Phase::Action);
        if self.config.skip_defeated_turns && !self.current_is_alive() {
            self.skip_defeated();
        }

        let current = self
            .state
            .current()
            .cloned()
            .ok_or(TurnError::NoParticipants)?;
        let name = self.name_of(&current);
        self.state.say(format!("Tocca a {name}."));
        Ok(current)
    }

    /// Moves the turn pointer one step, starting a new round on wrap.
    ///
    /// Returns `None` when initiative was never rolled.
    pub fn advance_turn(&mut self) -> Option<EntityId> {
        self.step_turn()?;
        if self.config.skip_defeated_turns && !self.current_is_alive() {
            self.skip_defeated();
        }

        let current = self.state.current().cloned()?;
        let name = self.name_of(&current);
        self.state.say(format!("Tocca a {name}."));
        Some(current)
    }

    pub fn is_turn_of(&self, id: &EntityId) -> bool {
        self.state.current() == Some(id)
    }

    /// Participants with hp above zero, in join order.
    pub fn living(&self) -> Vec<EntityId> {
        self.state
            .participants()
            .iter()
            .filter(|id| self.world.combatant(id).is_some_and(Combatant::is_alive))
            .cloned()
            .collect()
    }

    /// True once either side has no one left standing.
    pub fn is_over(&self) -> bool {
        !self.any_living(Combatant::is_player) || !self.any_living(Combatant::is_opponent)
    }

    /// Players win iff no opponent is left standing.
    pub fn winner(&self) -> Side {
        if self.any_living(Combatant::is_opponent) {
            Side::Enemies
        } else {
            Side::Players
        }
    }

    /// Living participants on the other side from `id`.
    pub(crate) fn living_opponents_of(&self, id: &EntityId) -> Vec<EntityId> {
        let Some(me) = self.world.combatant(id) else {
            return Vec::new();
        };
        self.state
            .participants()
            .iter()
            .filter(|other| {
                self.world
                    .combatant(other)
                    .is_some_and(|c| c.is_alive() && me.is_hostile_to(c))
            })
            .cloned()
            .collect()
    }

    fn any_living(&self, side: fn(&Combatant) -> bool) -> bool {
        self.state.participants().iter().any(|id| {
            self.world
                .combatant(id)
                .is_some_and(|c| c.is_alive() && side(c))
        })
    }

    fn current_is_alive(&self) -> bool {
        self.state
            .current()
            .and_then(|id| self.world.combatant(id))
            .is_some_and(Combatant::is_alive)
    }

    fn step_turn(&mut self) -> Option<()> {
        let index = self.state.turn_index()?;
        let len = self.state.order().len();
        if len == 0 {
            return None;
        }

        let next = (index + 1) % len;
        if next == 0 {
            self.state.next_round();
            debug!(target: "combat", round = self.state.round(), "new round");
        }
        self.state.set_turn(next);
        Some(())
    }

    /// Steps past defeated combatants. Gives up after one full lap.
    fn skip_defeated(&mut self) {
        for _ in 0..self.state.order().len() {
            if self.current_is_alive() || self.step_turn().is_none() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::combatant::{AbilityScores, Combatant, EntityId, Tags};
    use crate::config::CombatConfig;
    use crate::dice::ScriptedRoller;
    use crate::engine::CombatEngine;
    use crate::state::{CombatState, EncounterContext, Side};
    use crate::world::{CombatWorld, Roster};

    fn roster() -> Roster {
        Roster::new()
            .with(Combatant::new("eroe", "Eroe", 20).with_tags(Tags::PLAYER))
            .with(
                Combatant::new("goblin_1", "Goblin", 10)
                    .with_tags(Tags::ENEMY)
                    .with_scores(AbilityScores {
                        dexterity: 12,
                        ..AbilityScores::default()
                    }),
            )
            .with(Combatant::new("lupo", "Lupo", 8).with_tags(Tags::HOSTILE))
    }

    fn state() -> CombatState {
        CombatState::from_context(EncounterContext::new(["eroe", "goblin_1", "lupo"])).unwrap()
    }

    #[test]
    fn initiative_sorts_descending_and_keeps_ties_in_join_order() {
        let mut world = roster();
        let mut state = state();
        // eroe 10+0, goblin 9+1, lupo 12+0
        let mut dice = ScriptedRoller::new([10, 9, 12]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();

        let order = engine.roll_initiative().unwrap().to_vec();
        assert_eq!(order, ["lupo", "eroe", "goblin_1"].map(EntityId::from));
        assert_eq!(engine.world().combatant(&"goblin_1".into()).unwrap().initiative, 10);
    }

    #[test]
    fn advancing_a_full_lap_returns_to_start_and_bumps_round() {
        let mut world = roster();
        let mut state = state();
        let mut dice = ScriptedRoller::new([15, 10, 5]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();

        let first = engine.begin().unwrap();
        assert_eq!(engine.state().round(), 1);
        for _ in 0..3 {
            engine.advance_turn();
        }
        assert_eq!(engine.state().current(), Some(&first));
        assert_eq!(engine.state().round(), 2);
    }

    #[test]
    fn advance_is_noop_before_initiative() {
        let mut world = roster();
        let mut state = state();
        let mut dice = ScriptedRoller::default();
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        assert_eq!(engine.advance_turn(), None);
    }

    #[test]
    fn defeated_combatants_keep_their_turn_unless_configured() {
        let mut world = roster();
        world.combatant_mut(&"goblin_1".into()).unwrap().hp = 0;

        let mut state = state();
        let mut dice = ScriptedRoller::new([15, 10, 5]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();
        assert_eq!(engine.advance_turn(), Some("goblin_1".into()));

        let mut state = self::state();
        let mut dice = ScriptedRoller::new([15, 10, 5]);
        let config = CombatConfig::default().with_skip_defeated_turns(true);
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();
        assert_eq!(engine.advance_turn(), Some("lupo".into()));
    }

    #[test]
    fn combat_ends_when_a_side_is_wiped_out() {
        let mut world = roster();
        let mut state = state();
        let mut dice = ScriptedRoller::default();
        let config = CombatConfig::default();

        {
            let engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
            assert!(!engine.is_over());
            assert_eq!(engine.winner(), Side::Enemies);
        }

        world.combatant_mut(&"goblin_1".into()).unwrap().hp = 0;
        world.combatant_mut(&"lupo".into()).unwrap().hp = 0;
        let engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        assert!(engine.is_over());
        assert_eq!(engine.winner(), Side::Players);
        assert_eq!(engine.living(), [EntityId::from("eroe")]);
    }
}

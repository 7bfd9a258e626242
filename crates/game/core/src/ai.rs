//! Heuristic action selection for non-player combatants.
//!
//! A handful of weighted rules, nothing more: heal when badly hurt, throw a
//! power strike now and then, otherwise attack the first player standing.

use tracing::debug;

use crate::action::{ActionError, CombatAction, HEAL_WOUNDS, POWER_STRIKE};
use crate::combatant::EntityId;
use crate::dice::{DiceRoller, Die};
use crate::engine::CombatEngine;
use crate::world::CombatWorld;

/// Who `actor` goes after: the first living player for opponents, the
/// first living opponent for everyone else.
pub(crate) fn default_target<W, R>(
    engine: &CombatEngine<'_, W, R>,
    actor: &EntityId,
) -> Option<EntityId>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    let me = engine.world.combatant(actor)?;
    if me.is_opponent() {
        engine
            .state
            .participants()
            .iter()
            .find(|id| {
                engine
                    .world
                    .combatant(id)
                    .is_some_and(|c| c.is_player() && c.is_alive())
            })
            .cloned()
    } else {
        engine.living_opponents_of(actor).into_iter().next()
    }
}

pub(crate) fn choose_action<W, R>(
    engine: &mut CombatEngine<'_, W, R>,
    actor: &EntityId,
) -> Result<CombatAction, ActionError>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    let me = engine.combatant(actor)?;
    if !me.is_alive() {
        return Ok(CombatAction::pass(actor.clone()));
    }

    let tuning = engine.config.ai;
    let knows_heal = me.abilities.contains_key(HEAL_WOUNDS);
    let knows_power = me.abilities.contains_key(POWER_STRIKE);
    let badly_hurt = me.hp_percent() < tuning.heal_below_percent;

    let Some(target) = default_target(engine, actor) else {
        debug!(target: "combat", actor = %actor, "no target, passing");
        return Ok(CombatAction::pass(actor.clone()));
    };

    let decision = Die::new(tuning.decision_die);
    if knows_heal && badly_hurt && engine.roll(decision) <= tuning.heal_chance {
        return Ok(CombatAction::ability(actor.clone(), HEAL_WOUNDS, [actor.clone()]));
    }
    if knows_power && engine.roll(decision) <= tuning.power_strike_chance {
        return Ok(CombatAction::ability(actor.clone(), POWER_STRIKE, [target]));
    }

    Ok(CombatAction::attack(actor.clone(), target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Combatant, SpecialAbility, Tags};
    use crate::config::CombatConfig;
    use crate::dice::ScriptedRoller;
    use crate::state::{CombatState, EncounterContext};
    use crate::world::Roster;

    fn sciamano(hp: u32) -> Combatant {
        Combatant::new("sciamano", "Sciamano", 20)
            .with_tags(Tags::ENEMY)
            .with_hp(hp)
            .with_ability(HEAL_WOUNDS, SpecialAbility::new(0, 3))
            .with_ability(POWER_STRIKE, SpecialAbility::new(0, 3))
    }

    /// Initiative puts the shaman first; `rolls` then feed the selector.
    fn choose(shaman: Combatant, rolls: &[u32]) -> CombatAction {
        let mut world = Roster::new()
            .with(shaman)
            .with(Combatant::new("eroe", "Eroe", 20).with_tags(Tags::PLAYER));
        let mut state =
            CombatState::from_context(EncounterContext::new(["sciamano", "eroe"])).unwrap();
        let mut dice = ScriptedRoller::new([20, 1].iter().chain(rolls).copied());
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();
        engine.choose_ai_action().unwrap()
    }

    #[test]
    fn badly_hurt_caster_heals_itself_on_low_roll() {
        assert_eq!(
            choose(sciamano(5), &[8]),
            CombatAction::ability("sciamano", HEAL_WOUNDS, ["sciamano"])
        );
    }

    #[test]
    fn heal_roll_failure_falls_through_to_power_strike() {
        assert_eq!(
            choose(sciamano(5), &[9, 4]),
            CombatAction::ability("sciamano", POWER_STRIKE, ["eroe"])
        );
    }

    #[test]
    fn healthy_caster_attacks_when_power_roll_fails() {
        // 30% exactly is not below the threshold, so only the power roll happens
        assert_eq!(
            choose(sciamano(6), &[5]),
            CombatAction::attack("sciamano", "eroe")
        );
    }

    #[test]
    fn no_living_player_means_pass() {
        let mut world = Roster::new()
            .with(sciamano(20))
            .with(
                Combatant::new("eroe", "Eroe", 20)
                    .with_tags(Tags::PLAYER)
                    .with_hp(0),
            );
        let mut state =
            CombatState::from_context(EncounterContext::new(["sciamano", "eroe"])).unwrap();
        let mut dice = ScriptedRoller::new([20, 1]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        assert_eq!(
            engine.choose_ai_action(),
            Ok(CombatAction::pass("sciamano"))
        );
    }

    #[test]
    fn players_are_not_ai_controlled() {
        let mut world = Roster::new()
            .with(sciamano(20))
            .with(Combatant::new("eroe", "Eroe", 20).with_tags(Tags::PLAYER));
        let mut state =
            CombatState::from_context(EncounterContext::new(["sciamano", "eroe"])).unwrap();
        let mut dice = ScriptedRoller::new([1, 20]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        assert!(!engine.is_ai_turn());
        assert_eq!(
            engine.choose_ai_action(),
            Err(ActionError::NotAiControlled("eroe".into()))
        );
    }
}

//! Special abilities with round-based cooldowns.

use crate::combatant::EntityId;
use crate::config::CombatConfig;
use crate::dice::{DiceRoller, Die};
use crate::engine::CombatEngine;
use crate::world::CombatWorld;

use super::attack::Strike;
use super::{ActionEffect, ActionError, ActionKind, ActionOutcome, HealReport};

/// Attack at a to-hit penalty for two d10 of damage.
pub(crate) const POWER_STRIKE: &str = "colpo_potente";
/// Heal `1d8 + wisdom` on self or an ally.
pub(crate) const HEAL_WOUNDS: &str = "cura_ferite";

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    pub(crate) fn resolve_ability(
        &mut self,
        actor: &EntityId,
        name: &str,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        let round = self.state.round();
        let ability = self
            .combatant(actor)?
            .abilities
            .get(name)
            .copied()
            .ok_or_else(|| ActionError::AbilityNotKnown(name.to_owned()))?;

        let remaining = ability.rounds_until_ready(round);
        if remaining > 0 {
            return Err(ActionError::AbilityNotReady {
                ability: name.to_owned(),
                remaining,
            });
        }
        if !ability.has_charges() {
            return Err(ActionError::AbilityExhausted(name.to_owned()));
        }

        let outcome = match name {
            POWER_STRIKE => self.power_strike(actor, targets),
            HEAL_WOUNDS => self.heal_wounds(actor, targets),
            _ => Err(ActionError::AbilityNotImplemented(name.to_owned())),
        }?;

        if let Some(ability) = self.combatant_mut(actor)?.abilities.get_mut(name) {
            ability.mark_used(round);
        }
        Ok(outcome)
    }

    fn power_strike(
        &mut self,
        actor: &EntityId,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        let target = targets.first().ok_or(ActionError::NoTarget)?;
        let report = self.strike(actor, target, Strike::power())?;
        let message = self.describe_strike(actor, "usa Colpo Potente su", &report);
        Ok(ActionOutcome::new(
            actor,
            ActionKind::Ability,
            message,
            ActionEffect::Attack(report),
        ))
    }

    fn heal_wounds(
        &mut self,
        actor: &EntityId,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        let target = targets.first().unwrap_or(actor).clone();
        self.friendly_target(actor, &target)?;

        let wisdom = self.combatant(actor)?.scores.wisdom_mod();
        let amount =
            self.roll(Die::new(CombatConfig::HEAL_WOUNDS_FACES)) + wisdom.max(0) as u32;
        let patient = self.combatant_mut(&target)?;
        let healed = patient.heal(amount);
        let target_hp = patient.hp;

        let healer = self.name_of(actor);
        let message = if &target == actor {
            format!("{healer} si cura di {healed} hp ({target_hp} hp).")
        } else {
            let name = self.name_of(&target);
            format!("{healer} cura {name} di {healed} hp ({target_hp} hp).")
        };

        Ok(ActionOutcome::new(
            actor,
            ActionKind::Ability,
            message,
            ActionEffect::Heal(HealReport {
                target,
                amount: healed,
                target_hp,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{AbilityScores, Charges, Combatant, SpecialAbility, Tags};
    use crate::dice::ScriptedRoller;
    use crate::state::{CombatState, EncounterContext};
    use crate::world::Roster;

    fn world() -> Roster {
        Roster::new()
            .with(
                Combatant::new("chierico", "Chierico", 20)
                    .with_tags(Tags::PLAYER)
                    .with_hp(5)
                    .with_scores(AbilityScores {
                        strength: 14,
                        wisdom: 14,
                        ..AbilityScores::default()
                    })
                    .with_ability(HEAL_WOUNDS, SpecialAbility::new(0, 3))
                    .with_ability(POWER_STRIKE, SpecialAbility::new(0, 3))
                    .with_ability("palla_di_fuoco", SpecialAbility::new(8, 0)),
            )
            .with(Combatant::new("troll", "Troll", 40).with_tags(Tags::ENEMY))
    }

    fn state() -> CombatState {
        CombatState::from_context(EncounterContext::new(["chierico", "troll"])).unwrap()
    }

    #[test]
    fn cooldown_blocks_until_enough_rounds_pass() {
        let mut world = world();
        let mut state = state();
        // initiative, then heal 4, troll passes, retry, troll passes x3, heal 2
        let mut dice = ScriptedRoller::new([20, 1, 4, 2]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        let me = EntityId::from("chierico");
        let troll = EntityId::from("troll");
        let heal = engine.use_ability(&me, HEAL_WOUNDS, &[]).unwrap();
        assert_eq!(heal.heal().map(|h| h.amount), Some(6));
        engine.pass_turn(&troll).unwrap();

        assert_eq!(
            engine.use_ability(&me, HEAL_WOUNDS, &[]),
            Err(ActionError::AbilityNotReady {
                ability: HEAL_WOUNDS.into(),
                remaining: 2,
            })
        );

        engine.pass_turn(&me).unwrap();
        engine.pass_turn(&troll).unwrap();
        engine.pass_turn(&me).unwrap();
        engine.pass_turn(&troll).unwrap();
        assert_eq!(engine.state().round(), 4);

        let heal = engine.use_ability(&me, HEAL_WOUNDS, &[]).unwrap();
        assert_eq!(heal.heal().map(|h| h.target_hp), Some(15));
    }

    #[test]
    fn power_strike_uses_two_d10_at_a_penalty() {
        let mut world = world();
        let mut state = state();
        let mut dice = ScriptedRoller::new([20, 1, 10, 7, 3]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        let outcome = engine
            .use_ability(&"chierico".into(), POWER_STRIKE, &["troll".into()])
            .unwrap();
        let report = outcome.attack().unwrap();
        assert_eq!(report.attack_total, 10);
        assert!(report.hits);
        assert_eq!(report.damage, 12);
        assert_eq!(report.target_hp, 28);
    }

    #[test]
    fn unknown_unimplemented_and_exhausted_abilities_fail() {
        let mut world = world();
        let chierico = world
            .remove(&"chierico".into())
            .unwrap()
            .with_ability(
                "preghiera",
                SpecialAbility::new(0, 0).with_charges(Charges::full(0, None)),
            );
        world.insert(chierico);

        let mut state = state();
        let mut dice = ScriptedRoller::new([20, 1]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();
        let me = EntityId::from("chierico");

        assert_eq!(
            engine.use_ability(&me, "volo", &[]),
            Err(ActionError::AbilityNotKnown("volo".into()))
        );
        assert_eq!(
            engine.use_ability(&me, "palla_di_fuoco", &[]),
            Err(ActionError::AbilityNotImplemented("palla_di_fuoco".into()))
        );
        assert_eq!(
            engine.use_ability(&me, "preghiera", &[]),
            Err(ActionError::AbilityExhausted("preghiera".into()))
        );
        assert_eq!(
            engine.use_ability(&me, POWER_STRIKE, &[]),
            Err(ActionError::NoTarget)
        );
        // refusals never consume the turn or the cooldown
        assert!(engine.is_turn_of(&me));
        assert!(
            engine.world().get(&me).unwrap().abilities[POWER_STRIKE]
                .last_used_round
                .is_none()
        );
    }

    #[test]
    fn healing_an_enemy_is_refused_without_spending_the_ability() {
        let mut world = world();
        let mut state = state();
        let mut dice = ScriptedRoller::new([20, 1, 6]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();
        let me = EntityId::from("chierico");

        assert_eq!(
            engine.use_ability(&me, HEAL_WOUNDS, &["troll".into()]),
            Err(ActionError::InvalidTarget("troll".into()))
        );
        assert!(engine.is_turn_of(&me));
        assert!(
            engine.world().get(&me).unwrap().abilities[HEAL_WOUNDS]
                .last_used_round
                .is_none()
        );
        assert_eq!(engine.world().get(&"troll".into()).unwrap().hp, 40);
    }
}

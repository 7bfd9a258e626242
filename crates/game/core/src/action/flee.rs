use tracing::info;

use crate::combatant::EntityId;
use crate::dice::{DiceRoller, Die};
use crate::engine::CombatEngine;
use crate::state::CombatOutcome;
use crate::world::CombatWorld;

use super::{ActionEffect, ActionError, ActionKind, ActionOutcome, FleeReport};

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// `d20 + dexterity modifier` against a difficulty that grows with
    /// every opponent still standing. Escaping ends the encounter.
    pub(crate) fn resolve_flee(&mut self, actor: &EntityId) -> Result<ActionOutcome, ActionError> {
        let dexterity = self.combatant(actor)?.scores.dexterity_mod();
        let difficulty = self
            .config
            .flee_dc(self.living_opponents_of(actor).len());

        let natural = self.roll(Die::D20);
        let total = natural as i32 + dexterity;
        let escaped = total >= difficulty;

        let name = self.name_of(actor);
        let message = if escaped {
            format!("{name} riesce a fuggire! ({total} contro {difficulty})")
        } else {
            format!("{name} tenta la fuga ma fallisce. ({total} contro {difficulty})")
        };

        if escaped {
            info!(target: "combat", actor = %actor, total, difficulty, "combatant fled");
            self.finish(CombatOutcome {
                fled: Some(actor.clone()),
                ..CombatOutcome::default()
            });
        }

        Ok(ActionOutcome::new(
            actor,
            ActionKind::Flee,
            message,
            ActionEffect::Flee(FleeReport {
                natural,
                total,
                difficulty,
                escaped,
            }),
        ))
    }
}

#[cfg(test)]
mod tests {
    use crate::combatant::{AbilityScores, Combatant, EntityId, Tags};
    use crate::config::CombatConfig;
    use crate::dice::ScriptedRoller;
    use crate::engine::CombatEngine;
    use crate::state::{CombatState, EncounterContext, Phase};
    use crate::world::Roster;

    fn world() -> Roster {
        Roster::new()
            .with(
                Combatant::new("ladro", "Ladro", 12)
                    .with_tags(Tags::PLAYER)
                    .with_scores(AbilityScores {
                        dexterity: 14,
                        ..AbilityScores::default()
                    }),
            )
            .with(Combatant::new("goblin_1", "Goblin", 7).with_tags(Tags::ENEMY))
            .with(Combatant::new("goblin_2", "Goblin", 7).with_tags(Tags::ENEMY))
    }

    fn flee_with(natural: u32) -> (CombatState, bool) {
        let mut world = world();
        let mut state =
            CombatState::from_context(EncounterContext::new(["ladro", "goblin_1", "goblin_2"]))
                .unwrap();
        // initiative, then the flee roll
        let mut dice = ScriptedRoller::new([18, 2, 1, natural]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        let outcome = engine.flee(&"ladro".into()).unwrap();
        let escaped = matches!(
            outcome.effect,
            crate::action::ActionEffect::Flee(report) if report.escaped
        );
        (state, escaped)
    }

    #[test]
    fn flee_succeeds_exactly_at_the_difficulty() {
        // difficulty 10 + 2 * 2 = 14, dexterity +2
        let (state, escaped) = flee_with(12);
        assert!(escaped);
        assert!(!state.is_active());
        assert_eq!(state.phase(), Phase::Ended);
        assert_eq!(
            state.outcome().and_then(|o| o.fled.clone()),
            Some(EntityId::from("ladro"))
        );
    }

    #[test]
    fn failed_flee_consumes_the_turn() {
        let (state, escaped) = flee_with(11);
        assert!(!escaped);
        assert!(state.is_active());
        assert_eq!(state.current(), Some(&EntityId::from("goblin_1")));
    }
}

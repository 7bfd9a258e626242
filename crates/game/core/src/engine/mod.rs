//! Turn scheduling and action execution pipeline.
//!
//! The [`CombatEngine`] is the authoritative reducer for [`CombatState`]. It
//! borrows the state, the world that owns the combatants, a dice roller and
//! the rules for the duration of one driver call. Every state mutation,
//! including turn advancement and end-of-combat bookkeeping, flows through
//! [`CombatEngine::execute`] or the lifecycle methods defined here.
mod errors;
mod rewards;
mod turns;

pub use errors::TurnError;

use tracing::{debug, info, warn};

use crate::action::{ActionEffect, ActionError, ActionKind, ActionOutcome, CombatAction};
use crate::ai;
use crate::combatant::{Combatant, EntityId};
use crate::config::CombatConfig;
use crate::dice::{DiceRoller, Die};
use crate::error::GameError;
use crate::state::{CombatOutcome, CombatState, InitError, Phase};
use crate::world::CombatWorld;

/// Game engine resolving actions and turns for one encounter.
pub struct CombatEngine<'a, W: CombatWorld + ?Sized, R: DiceRoller + ?Sized> {
    pub(crate) state: &'a mut CombatState,
    pub(crate) world: &'a mut W,
    pub(crate) dice: &'a mut R,
    pub(crate) config: &'a CombatConfig,
}

impl<'a, W, R> CombatEngine<'a, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// Binds an encounter to its world. Every participant must resolve.
    pub fn new(
        state: &'a mut CombatState,
        world: &'a mut W,
        dice: &'a mut R,
        config: &'a CombatConfig,
    ) -> Result<Self, InitError> {
        if let Some(missing) = state
            .participants()
            .iter()
            .find(|id| world.combatant(id).is_none())
        {
            return Err(InitError::UnknownCombatant(missing.clone()));
        }

        Ok(Self {
            state,
            world,
            dice,
            config,
        })
    }

    pub fn state(&self) -> &CombatState {
        &*self.state
    }

    pub fn world(&self) -> &W {
        &*self.world
    }

    pub fn config(&self) -> &CombatConfig {
        self.config
    }

    /// Starts the encounter: rolls initiative and hands the first turn out.
    pub fn begin(&mut self) -> Result<EntityId, TurnError> {
        self.state.start();
        self.state.set_phase(Phase::Initiative);
        self.state.say("Il combattimento ha inizio!");

        for id in self.state.participants().to_vec() {
            if let Some(combatant) = self.world.combatant_mut(&id) {
                combatant.in_combat = true;
            }
        }

        self.roll_initiative()?;
        let first = self.start_turns()?;
        info!(
            target: "combat",
            participants = self.state.participants().len(),
            first = %first,
            "combat started"
        );
        Ok(first)
    }

    /// Resolves one action for the combatant holding the turn.
    ///
    /// Refused actions leave the turn untouched. A resolved action either
    /// ends the encounter or passes the turn on.
    pub fn execute(&mut self, action: &CombatAction) -> Result<ActionOutcome, ActionError> {
        let actor = action.actor();
        self.require_current_turn(actor)?;

        if !self.combatant(actor)?.is_alive() && !matches!(action, CombatAction::Pass { .. }) {
            return Err(ActionError::Defeated(actor.clone()));
        }

        let outcome = match action {
            CombatAction::Attack {
                actor,
                target,
                weapon,
            } => self.resolve_attack(actor, target, weapon.as_deref()),
            CombatAction::UseAbility {
                actor,
                ability,
                targets,
            } => self.resolve_ability(actor, ability, targets),
            CombatAction::UseItem {
                actor,
                item,
                targets,
            } => self.resolve_item(actor, item, targets),
            CombatAction::Pass { actor } => self.resolve_pass(actor),
            CombatAction::Flee { actor } => self.resolve_flee(actor),
            CombatAction::Equip { actor, item } => self.resolve_equip(actor, item),
        }?;

        debug!(
            target: "combat",
            actor = %outcome.actor,
            kind = %outcome.kind,
            round = self.state.round(),
            "action resolved"
        );
        self.state.say(outcome.message.clone());
        self.settle();
        Ok(outcome)
    }

    pub fn attack(
        &mut self,
        actor: &EntityId,
        target: &EntityId,
        weapon: Option<&str>,
    ) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::Attack {
            actor: actor.clone(),
            target: target.clone(),
            weapon: weapon.map(str::to_owned),
        })
    }

    pub fn use_ability(
        &mut self,
        actor: &EntityId,
        ability: &str,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::UseAbility {
            actor: actor.clone(),
            ability: ability.to_owned(),
            targets: targets.to_vec(),
        })
    }

    pub fn use_item(
        &mut self,
        actor: &EntityId,
        item: &str,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::UseItem {
            actor: actor.clone(),
            item: item.to_owned(),
            targets: targets.to_vec(),
        })
    }

    pub fn pass_turn(&mut self, actor: &EntityId) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::pass(actor.clone()))
    }

    pub fn flee(&mut self, actor: &EntityId) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::flee(actor.clone()))
    }

    pub fn equip(&mut self, actor: &EntityId, item: &str) -> Result<ActionOutcome, ActionError> {
        self.execute(&CombatAction::equip(actor.clone(), item))
    }

    /// Whether the turn belongs to a combatant the engine should play.
    pub fn is_ai_turn(&self) -> bool {
        self.state.is_active()
            && self
                .state
                .current()
                .and_then(|id| self.world.combatant(id))
                .is_some_and(|combatant| !combatant.is_player())
    }

    /// Picks an action for the non-player combatant holding the turn.
    pub fn choose_ai_action(&mut self) -> Result<CombatAction, ActionError> {
        let actor = self
            .state
            .current()
            .cloned()
            .ok_or(ActionError::CombatNotActive)?;
        if self.combatant(&actor)?.is_player() {
            return Err(ActionError::NotAiControlled(actor));
        }
        ai::choose_action(self, &actor)
    }

    /// Chooses and executes one AI action.
    ///
    /// When the chosen action is refused the engine falls back to a basic
    /// attack on the default target, then to passing.
    pub fn run_ai_turn(&mut self) -> Result<ActionOutcome, ActionError> {
        let action = self.choose_ai_action()?;
        let error = match self.execute(&action) {
            Ok(outcome) => return Ok(outcome),
            Err(error) => error,
        };

        let actor = action.actor().clone();
        warn!(
            target: "combat",
            actor = %actor,
            code = error.error_code(),
            "ai action refused, falling back"
        );

        if !matches!(action, CombatAction::Attack { .. } | CombatAction::Pass { .. }) {
            if let Some(target) = ai::default_target(self, &actor) {
                if let Ok(outcome) = self.execute(&CombatAction::attack(actor.clone(), target)) {
                    return Ok(outcome);
                }
            }
        }

        self.execute(&CombatAction::pass(actor))
    }

    /// Ends the encounter unconditionally. Always succeeds.
    ///
    /// An encounter that already ended keeps its recorded outcome.
    pub fn terminate(&mut self, forced: bool) -> bool {
        if self.state.is_active() {
            self.finish(CombatOutcome {
                forced,
                ..CombatOutcome::default()
            });
        } else {
            self.release_participants();
        }
        self.state.say("Combattimento terminato.");
        info!(target: "combat", forced, "combat terminated");
        true
    }

    /// Fails unless combat is running and `actor` holds the turn.
    pub(crate) fn require_current_turn(&self, actor: &EntityId) -> Result<(), ActionError> {
        if !self.state.is_active() {
            return Err(ActionError::CombatNotActive);
        }
        if !self.is_turn_of(actor) {
            return Err(ActionError::NotYourTurn {
                actor: actor.clone(),
            });
        }
        Ok(())
    }

    /// Post-action bookkeeping: close menus, end or move on.
    fn settle(&mut self) {
        if !self.state.is_active() {
            return;
        }
        self.back_to_menu();
        if self.is_over() {
            self.conclude();
        } else {
            self.advance_turn();
        }
    }

    fn resolve_pass(&mut self, actor: &EntityId) -> Result<ActionOutcome, ActionError> {
        let name = self.name_of(actor);
        Ok(ActionOutcome::new(
            actor,
            ActionKind::Pass,
            format!("{name} passa il turno."),
            ActionEffect::Pass,
        ))
    }

    pub(crate) fn combatant(&self, id: &EntityId) -> Result<&Combatant, ActionError> {
        self.world
            .combatant(id)
            .ok_or_else(|| ActionError::UnknownCombatant(id.clone()))
    }

    pub(crate) fn combatant_mut(&mut self, id: &EntityId) -> Result<&mut Combatant, ActionError> {
        self.world
            .combatant_mut(id)
            .ok_or_else(|| ActionError::UnknownCombatant(id.clone()))
    }

    /// Resolves a target that must take part in this encounter.
    pub(crate) fn target(&self, id: &EntityId) -> Result<&Combatant, ActionError> {
        if !self.state.is_participant(id) {
            return Err(ActionError::TargetNotFound(id.clone()));
        }
        self.world
            .combatant(id)
            .ok_or_else(|| ActionError::TargetNotFound(id.clone()))
    }

    /// Resolves a living target on `actor`'s side for heals.
    pub(crate) fn friendly_target(
        &self,
        actor: &EntityId,
        id: &EntityId,
    ) -> Result<&Combatant, ActionError> {
        let target = self.target(id)?;
        if self.combatant(actor)?.is_hostile_to(target) {
            return Err(ActionError::InvalidTarget(id.clone()));
        }
        if !target.is_alive() {
            return Err(ActionError::TargetDefeated(id.clone()));
        }
        Ok(target)
    }

    pub(crate) fn roll(&mut self, die: Die) -> u32 {
        let value = die.roll(&mut *self.dice);
        debug!(target: "combat", faces = die.faces(), value, "die rolled");
        value
    }

    pub(crate) fn roll_sum(&mut self, die: Die, count: u32) -> u32 {
        (0..count).map(|_| self.roll(die)).sum()
    }

    pub(crate) fn name_of(&self, id: &EntityId) -> String {
        self.world
            .combatant(id)
            .map(|combatant| combatant.name.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

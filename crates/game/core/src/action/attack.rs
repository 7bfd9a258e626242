//! Attack rolls shared by basic attacks and offensive abilities.

use tracing::debug;

use crate::combatant::EntityId;
use crate::config::{CombatConfig, CriticalRule};
use crate::dice::{DiceRoller, Die};
use crate::engine::CombatEngine;
use crate::world::CombatWorld;

use super::{ActionEffect, ActionError, ActionKind, ActionOutcome, AttackReport};

/// Shape of one attack roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Strike {
    /// Subtracted from the attack total.
    pub to_hit_penalty: i32,
    /// Damage dice rolled on a hit; a critical adds one more.
    pub dice: u32,
    pub faces: u32,
}

impl Strike {
    pub(crate) fn basic(faces: u32) -> Self {
        Self {
            to_hit_penalty: 0,
            dice: 1,
            faces,
        }
    }

    pub(crate) fn power() -> Self {
        Self {
            to_hit_penalty: CombatConfig::POWER_STRIKE_PENALTY,
            dice: CombatConfig::POWER_STRIKE_DICE,
            faces: CombatConfig::POWER_STRIKE_FACES,
        }
    }
}

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    pub(crate) fn resolve_attack(
        &mut self,
        actor: &EntityId,
        target: &EntityId,
        weapon: Option<&str>,
    ) -> Result<ActionOutcome, ActionError> {
        let attacker = self.combatant(actor)?;
        let faces = match weapon {
            None => attacker.weapon_faces(),
            Some(weapon) => {
                let item = attacker
                    .item(weapon)
                    .or(attacker.equipment.weapon.as_ref().filter(|w| w.id == weapon))
                    .ok_or_else(|| ActionError::ItemNotFound(weapon.to_owned()))?;
                item.damage_faces()
                    .ok_or_else(|| ActionError::ItemNotUsable(weapon.to_owned()))?
            }
        };

        let report = self.strike(actor, target, Strike::basic(faces))?;
        let message = self.describe_strike(actor, "attacca", &report);
        Ok(ActionOutcome::new(
            actor,
            ActionKind::Attack,
            message,
            ActionEffect::Attack(report),
        ))
    }

    /// Rolls to hit against the target's armor class and applies damage.
    ///
    /// The d20 is rolled before any damage die.
    pub(crate) fn strike(
        &mut self,
        actor: &EntityId,
        target: &EntityId,
        strike: Strike,
    ) -> Result<AttackReport, ActionError> {
        let bonus = self.combatant(actor)?.scores.strength_mod();
        let defender = self.target(target)?;
        if !defender.is_alive() {
            return Err(ActionError::TargetDefeated(target.clone()));
        }
        let armor_class = defender.armor_class();

        let natural = self.roll(Die::D20);
        let attack_total = natural as i32 + bonus - strike.to_hit_penalty;
        let hits = attack_total >= armor_class;
        let critical = natural == 20;
        let fumble = natural == 1;

        let deals_damage = match self.config.critical_rule {
            CriticalRule::RequiresHit => hits,
            CriticalRule::NaturalTwentyAlwaysDamages => hits || critical,
        };
        let damage = if deals_damage {
            let count = strike.dice + u32::from(critical);
            self.roll_sum(Die::new(strike.faces), count) + bonus.max(0) as u32
        } else {
            0
        };

        let target_hp = self.combatant_mut(target)?.apply_damage(damage);
        debug!(
            target: "combat",
            attacker = %actor,
            defender = %target,
            natural,
            attack_total,
            armor_class,
            damage,
            "strike resolved"
        );

        Ok(AttackReport {
            target: target.clone(),
            natural,
            attack_total,
            armor_class,
            hits,
            critical,
            fumble,
            damage,
            target_hp,
        })
    }

    pub(crate) fn describe_strike(
        &self,
        actor: &EntityId,
        verb: &str,
        report: &AttackReport,
    ) -> String {
        let attacker = self.name_of(actor);
        let defender = self.name_of(&report.target);
        let mut message = format!("{attacker} {verb} {defender}");
        if report.critical {
            message.push_str(": colpo critico!");
        } else if report.fumble {
            message.push_str(": fallimento critico!");
        }
        if report.dealt_damage() {
            message.push_str(&format!(
                " Infligge {} danni ({} hp rimanenti).",
                report.damage, report.target_hp
            ));
            if report.target_hp == 0 {
                message.push_str(&format!(" {defender} è sconfitto!"));
            }
        } else {
            message.push_str(" Manca il bersaglio.");
        }
        message
    }
}

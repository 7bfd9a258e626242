//! Consumable items used as a combat action.

use tracing::warn;

use crate::combatant::{EntityId, ItemKind};
use crate::config::CombatConfig;
use crate::dice::{DiceRoller, Die};
use crate::engine::CombatEngine;
use crate::world::CombatWorld;

use super::{ActionEffect, ActionError, ActionKind, ActionOutcome, AreaHit, HealReport};

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    pub(crate) fn resolve_item(
        &mut self,
        actor: &EntityId,
        item_id: &str,
        targets: &[EntityId],
    ) -> Result<ActionOutcome, ActionError> {
        let item = self
            .combatant(actor)?
            .item(item_id)
            .cloned()
            .ok_or_else(|| ActionError::ItemNotFound(item_id.to_owned()))?;

        match item.kind {
            ItemKind::HealingPotion { heal } => {
                let target = targets.first().unwrap_or(actor).clone();
                self.friendly_target(actor, &target)?;

                self.combatant_mut(actor)?.take_item(item_id);
                let patient = self.combatant_mut(&target)?;
                let healed = patient.heal(heal);
                let target_hp = patient.hp;

                let user = self.name_of(actor);
                let name = self.name_of(&target);
                Ok(ActionOutcome::new(
                    actor,
                    ActionKind::Item,
                    format!(
                        "{user} usa {}: {name} recupera {healed} hp ({target_hp} hp).",
                        item.name
                    ),
                    ActionEffect::Heal(HealReport {
                        target,
                        amount: healed,
                        target_hp,
                    }),
                ))
            }
            ItemKind::Bomb { damage } => {
                if targets.is_empty() {
                    return Err(ActionError::NoTarget);
                }

                self.combatant_mut(actor)?.take_item(item_id);
                let mut hits = Vec::with_capacity(targets.len());
                for target in targets {
                    if self.target(target).is_err() {
                        warn!(target: "combat", bomb = item_id, missing = %target, "bomb target skipped");
                        hits.push(AreaHit::missing(target.clone()));
                        continue;
                    }
                    let dealt = damage + self.roll(Die::new(CombatConfig::BOMB_FACES));
                    let target_hp = self.combatant_mut(target)?.apply_damage(dealt);
                    hits.push(AreaHit {
                        target: target.clone(),
                        damage: dealt,
                        target_hp,
                        missing: false,
                    });
                }

                let user = self.name_of(actor);
                let summary = hits
                    .iter()
                    .map(|hit| {
                        if hit.missing {
                            format!("{} non trovato", hit.target)
                        } else {
                            format!("{} -{} hp", self.name_of(&hit.target), hit.damage)
                        }
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                Ok(ActionOutcome::new(
                    actor,
                    ActionKind::Item,
                    format!("{user} lancia {}! {summary}.", item.name),
                    ActionEffect::Area { hits },
                ))
            }
            ItemKind::Weapon { .. } | ItemKind::Armor | ItemKind::Trinket => {
                Err(ActionError::ItemNotUsable(item_id.to_owned()))
            }
        }
    }
}

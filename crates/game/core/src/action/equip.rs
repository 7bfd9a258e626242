use crate::combatant::EntityId;
use crate::dice::DiceRoller;
use crate::engine::CombatEngine;
use crate::world::CombatWorld;

use super::{ActionEffect, ActionError, ActionKind, ActionOutcome};

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// Swaps an inventory weapon or armor into its slot. Costs the turn.
    pub(crate) fn resolve_equip(
        &mut self,
        actor: &EntityId,
        item_id: &str,
    ) -> Result<ActionOutcome, ActionError> {
        let combatant = self.combatant_mut(actor)?;
        let item = combatant
            .item(item_id)
            .ok_or_else(|| ActionError::ItemNotFound(item_id.to_owned()))?;
        let item_name = item.name.clone();
        let slot = combatant
            .equip(item_id)
            .ok_or_else(|| ActionError::ItemNotEquippable(item_id.to_owned()))?;

        let name = self.name_of(actor);
        Ok(ActionOutcome::new(
            actor,
            ActionKind::Equip,
            format!("{name} equipaggia {item_name} ({}).", slot.as_str()),
            ActionEffect::Equip {
                slot,
                item: item_id.to_owned(),
            },
        ))
    }
}

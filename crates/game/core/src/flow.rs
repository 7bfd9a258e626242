//! Multi-step menu flows layered on top of the action phase.
//!
//! Opening a menu moves the encounter into a sub-phase and remembers the
//! offered choices in the state's scratch area, so a stateless driver can
//! pick the flow up again on the next request. None of these steps consume
//! the turn; the action finally chosen does.

use crate::action::{ActionError, ActionKind};
use crate::combatant::{Combatant, EntityId, EquipSlot};
use crate::dice::DiceRoller;
use crate::engine::CombatEngine;
use crate::state::Phase;
use crate::world::CombatWorld;

/// Scratch key holding the comma-separated ids offered by the open menu.
pub const SCRATCH_OPTIONS: &str = "opzioni";
/// Scratch key holding the equipment slot being changed.
pub const SCRATCH_SLOT: &str = "slot";
/// Scratch key holding the action waiting for a target.
pub const SCRATCH_PENDING: &str = "azione";

/// An inventory entry offered by a menu.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemSummary {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(rename = "nome"))]
    pub name: String,
    #[cfg_attr(feature = "serde", serde(rename = "tipo"))]
    pub kind: String,
}

/// A combatant offered as a target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetSummary {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "nome"))]
    pub name: String,
    pub hp: u32,
    pub hp_max: u32,
}

impl TargetSummary {
    fn of(combatant: &Combatant) -> Self {
        Self {
            id: combatant.id.clone(),
            name: combatant.name.clone(),
            hp: combatant.hp,
            hp_max: combatant.hp_max,
        }
    }
}

impl<W, R> CombatEngine<'_, W, R>
where
    W: CombatWorld + ?Sized,
    R: DiceRoller + ?Sized,
{
    /// Lists the items `actor` can use this turn.
    pub fn open_inventory(&mut self, actor: &EntityId) -> Result<Vec<ItemSummary>, ActionError> {
        self.require_current_turn(actor)?;
        let items: Vec<ItemSummary> = self
            .combatant(actor)?
            .inventory
            .iter()
            .filter(|item| item.kind.is_consumable())
            .map(summarize)
            .collect();

        self.enter_menu(Phase::UseItem, items.iter().map(|item| item.id.as_str()));
        Ok(items)
    }

    /// Lists the equipment slots `actor` has a replacement for.
    pub fn open_equipment(&mut self, actor: &EntityId) -> Result<Vec<EquipSlot>, ActionError> {
        self.require_current_turn(actor)?;
        let combatant = self.combatant(actor)?;
        let slots: Vec<EquipSlot> = [EquipSlot::Weapon, EquipSlot::Armor]
            .into_iter()
            .filter(|slot| {
                combatant
                    .inventory
                    .iter()
                    .any(|item| item.kind.slot() == Some(*slot))
            })
            .collect();

        self.enter_menu(Phase::EquipSlot, slots.iter().map(EquipSlot::as_str));
        Ok(slots)
    }

    /// Lists the inventory items that fit `slot`.
    pub fn choose_equipment_slot(
        &mut self,
        actor: &EntityId,
        slot: EquipSlot,
    ) -> Result<Vec<ItemSummary>, ActionError> {
        self.require_current_turn(actor)?;
        let items: Vec<ItemSummary> = self
            .combatant(actor)?
            .inventory
            .iter()
            .filter(|item| item.kind.slot() == Some(slot))
            .map(summarize)
            .collect();

        self.enter_menu(Phase::EquipItem, items.iter().map(|item| item.id.as_str()));
        self.state
            .scratch_mut()
            .insert(SCRATCH_SLOT.to_owned(), slot.as_str().to_owned());
        Ok(items)
    }

    /// Lists valid targets for a pending action: living opponents for
    /// attacks, every living participant otherwise.
    pub fn select_target(
        &mut self,
        actor: &EntityId,
        pending: ActionKind,
    ) -> Result<Vec<TargetSummary>, ActionError> {
        self.require_current_turn(actor)?;
        let candidates = match pending {
            ActionKind::Attack => self.living_opponents_of(actor),
            _ => self.living(),
        };
        let targets: Vec<TargetSummary> = candidates
            .iter()
            .filter_map(|id| self.world.combatant(id))
            .map(TargetSummary::of)
            .collect();
        if targets.is_empty() {
            return Err(ActionError::NoTarget);
        }

        self.enter_menu(
            Phase::SelectTarget,
            targets.iter().map(|target| target.id.as_str()),
        );
        let pending: &'static str = pending.into();
        self.state
            .scratch_mut()
            .insert(SCRATCH_PENDING.to_owned(), pending.to_owned());
        Ok(targets)
    }

    /// Closes any open menu and clears its scratch values.
    pub fn back_to_menu(&mut self) {
        if self.state.is_active() {
            self.state.set_phase(Phase::Action);
        }
        self.state.scratch_mut().clear();
    }

    fn enter_menu<'s>(&mut self, phase: Phase, options: impl Iterator<Item = &'s str>) {
        let options = options.collect::<Vec<_>>().join(",");
        let scratch = self.state.scratch_mut();
        scratch.clear();
        scratch.insert(SCRATCH_OPTIONS.to_owned(), options);
        self.state.set_phase(phase);
    }
}

fn summarize(item: &crate::combatant::Item) -> ItemSummary {
    ItemSummary {
        id: item.id.clone(),
        name: item.name.clone(),
        kind: item.kind.label().to_owned(),
    }
}

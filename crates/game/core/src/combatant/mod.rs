//! Combatants as the engine sees them.
//!
//! Combatants are created and owned by the surrounding world (see
//! [`crate::world::CombatWorld`]). During an encounter the engine reads their
//! scores and mutates hp, initiative, ability bookkeeping, inventory and
//! rewards.
mod abilities;
mod items;
mod tags;

use std::collections::BTreeMap;
use std::fmt;

pub use abilities::{Charges, Recovery, SpecialAbility};
pub use items::{EquipSlot, Equipment, Item, ItemKind};
pub use tags::Tags;

use crate::config::CombatConfig;

/// Unique identifier of a combatant, e.g. `"giocatore_1"` or `"goblin_1"`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct EntityId(String);

impl EntityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntityId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for EntityId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The six classic ability scores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityScores {
    pub strength: i32,
    pub dexterity: i32,
    pub constitution: i32,
    pub intelligence: i32,
    pub wisdom: i32,
    pub charisma: i32,
}

impl AbilityScores {
    /// `floor((score - 10) / 2)`; negative for scores below 10.
    pub const fn modifier(score: i32) -> i32 {
        (score - 10).div_euclid(2)
    }

    pub const fn strength_mod(&self) -> i32 {
        Self::modifier(self.strength)
    }

    pub const fn dexterity_mod(&self) -> i32 {
        Self::modifier(self.dexterity)
    }

    pub const fn wisdom_mod(&self) -> i32 {
        Self::modifier(self.wisdom)
    }
}

impl Default for AbilityScores {
    fn default() -> Self {
        Self {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

/// A participant in combat.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Combatant {
    pub id: EntityId,
    pub name: String,
    pub hp: u32,
    pub hp_max: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub mana_max: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scores: AbilityScores,
    pub tags: Tags,
    /// Initiative rolled at the start of the current encounter.
    #[cfg_attr(feature = "serde", serde(default))]
    pub initiative: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub abilities: BTreeMap<String, SpecialAbility>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub inventory: Vec<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub equipment: Equipment,
    #[cfg_attr(feature = "serde", serde(default))]
    pub gold: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub level: u32,
    /// Experience granted per level when this combatant is defeated.
    #[cfg_attr(feature = "serde", serde(default))]
    pub experience_value: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub in_combat: bool,
}

impl Combatant {
    /// Creates a combatant at full health with average scores and no tags.
    pub fn new(id: impl Into<EntityId>, name: impl Into<String>, hp_max: u32) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            hp: hp_max,
            hp_max,
            mana: 0,
            mana_max: 0,
            scores: AbilityScores::default(),
            tags: Tags::empty(),
            initiative: 0,
            abilities: BTreeMap::new(),
            inventory: Vec::new(),
            equipment: Equipment::default(),
            gold: 0,
            experience: 0,
            level: 1,
            experience_value: None,
            in_combat: false,
        }
    }

    pub fn with_tags(mut self, tags: Tags) -> Self {
        self.tags = tags;
        self
    }

    pub fn with_scores(mut self, scores: AbilityScores) -> Self {
        self.scores = scores;
        self
    }

    pub fn with_hp(mut self, hp: u32) -> Self {
        self.hp = hp.min(self.hp_max);
        self
    }

    pub fn with_ability(mut self, name: impl Into<String>, ability: SpecialAbility) -> Self {
        self.abilities.insert(name.into(), ability);
        self
    }

    pub fn with_item(mut self, item: Item) -> Self {
        self.inventory.push(item);
        self
    }

    pub fn with_gold(mut self, gold: u32) -> Self {
        self.gold = gold;
        self
    }

    pub fn with_level(mut self, level: u32) -> Self {
        self.level = level;
        self
    }

    pub fn with_experience_value(mut self, value: u32) -> Self {
        self.experience_value = Some(value);
        self
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    pub fn is_player(&self) -> bool {
        self.tags.contains(Tags::PLAYER)
    }

    /// Tagged `nemico` or `ostile`.
    pub fn is_opponent(&self) -> bool {
        self.tags.is_opponent()
    }

    /// Opponents fight players and their allies; everyone else fights
    /// opponents.
    pub fn is_hostile_to(&self, other: &Combatant) -> bool {
        if self.is_opponent() {
            other.is_player() || other.tags.contains(Tags::ALLY)
        } else {
            other.is_opponent()
        }
    }

    /// Remaining hp as a whole percentage of maximum.
    pub fn hp_percent(&self) -> u32 {
        if self.hp_max == 0 {
            return 0;
        }
        self.hp.saturating_mul(100) / self.hp_max
    }

    /// Subtracts damage, flooring hp at 0. Returns the hp left.
    pub fn apply_damage(&mut self, amount: u32) -> u32 {
        self.hp = self.hp.saturating_sub(amount).min(self.hp_max);
        self.hp
    }

    /// Restores hp up to `hp_max`. Returns the amount actually healed.
    pub fn heal(&mut self, amount: u32) -> u32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount).min(self.hp_max);
        self.hp - before
    }

    /// `10 + dexterity modifier`, plus a flat bonus while armor is worn.
    pub fn armor_class(&self) -> i32 {
        let armor = if self.equipment.armor.is_some() {
            CombatConfig::ARMOR_BONUS
        } else {
            0
        };
        CombatConfig::BASE_ARMOR_CLASS + self.scores.dexterity_mod() + armor
    }

    /// Damage die of the equipped weapon, or the unarmed default.
    pub fn weapon_faces(&self) -> u32 {
        self.equipment
            .weapon
            .as_ref()
            .and_then(Item::damage_faces)
            .unwrap_or(CombatConfig::UNARMED_DAMAGE_FACES)
    }

    pub fn item(&self, item_id: &str) -> Option<&Item> {
        self.inventory.iter().find(|item| item.id == item_id)
    }

    /// Removes an item from the inventory, preserving the order of the rest.
    pub fn take_item(&mut self, item_id: &str) -> Option<Item> {
        let position = self.inventory.iter().position(|item| item.id == item_id)?;
        Some(self.inventory.remove(position))
    }

    /// Moves an inventory item into its equipment slot; the previously
    /// equipped item goes back to the inventory.
    pub fn equip(&mut self, item_id: &str) -> Option<EquipSlot> {
        let slot = self.item(item_id)?.kind.slot()?;
        let item = self.take_item(item_id)?;
        if let Some(previous) = self.equipment.replace(slot, item) {
            self.inventory.push(previous);
        }
        Some(slot)
    }

    /// Restores charges of abilities that recover on the given rest.
    pub fn rest(&mut self, rest: Recovery) {
        for ability in self.abilities.values_mut() {
            ability.recover(rest);
        }
    }
}

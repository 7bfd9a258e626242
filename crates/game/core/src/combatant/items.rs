//! Inventory items and equipment slots.

/// What an item does when used or worn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ItemKind {
    /// Single-use flat heal on self or an ally.
    HealingPotion {
        #[cfg_attr(feature = "serde", serde(default = "Item::default_potion_heal"))]
        heal: u32,
    },
    /// Single-use area damage: `damage + 1d6` to every target.
    Bomb {
        #[cfg_attr(feature = "serde", serde(default = "Item::default_bomb_damage"))]
        damage: u32,
    },
    Weapon {
        damage_faces: u32,
    },
    Armor,
    /// Loot with no combat use.
    Trinket,
}

impl ItemKind {
    /// Slot the item occupies when equipped.
    pub fn slot(&self) -> Option<EquipSlot> {
        match self {
            Self::Weapon { .. } => Some(EquipSlot::Weapon),
            Self::Armor => Some(EquipSlot::Armor),
            _ => None,
        }
    }

    /// Usable as a combat action.
    pub fn is_consumable(&self) -> bool {
        matches!(self, Self::HealingPotion { .. } | Self::Bomb { .. })
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::HealingPotion { .. } => "pozione_cura",
            Self::Bomb { .. } => "bomba",
            Self::Weapon { .. } => "arma",
            Self::Armor => "armatura",
            Self::Trinket => "oggetto",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Item {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
}

impl Item {
    pub const DEFAULT_POTION_HEAL: u32 = 10;
    pub const DEFAULT_BOMB_DAMAGE: u32 = 6;

    pub fn new(id: impl Into<String>, name: impl Into<String>, kind: ItemKind) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind,
        }
    }

    pub fn healing_potion(id: impl Into<String>) -> Self {
        Self::new(
            id,
            "Pozione di cura",
            ItemKind::HealingPotion {
                heal: Self::DEFAULT_POTION_HEAL,
            },
        )
    }

    pub fn bomb(id: impl Into<String>) -> Self {
        Self::new(
            id,
            "Bomba",
            ItemKind::Bomb {
                damage: Self::DEFAULT_BOMB_DAMAGE,
            },
        )
    }

    pub fn damage_faces(&self) -> Option<u32> {
        match self.kind {
            ItemKind::Weapon { damage_faces } => Some(damage_faces),
            _ => None,
        }
    }

    #[cfg(feature = "serde")]
    fn default_potion_heal() -> u32 {
        Self::DEFAULT_POTION_HEAL
    }

    #[cfg(feature = "serde")]
    fn default_bomb_damage() -> u32 {
        Self::DEFAULT_BOMB_DAMAGE
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::EnumString, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EquipSlot {
    #[strum(serialize = "arma")]
    #[cfg_attr(feature = "serde", serde(rename = "arma"))]
    Weapon,
    #[strum(serialize = "armatura")]
    #[cfg_attr(feature = "serde", serde(rename = "armatura"))]
    Armor,
}

impl EquipSlot {
    pub fn as_str(&self) -> &'static str {
        self.into()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Equipment {
    #[cfg_attr(feature = "serde", serde(default))]
    pub weapon: Option<Item>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub armor: Option<Item>,
}

impl Equipment {
    pub fn get(&self, slot: EquipSlot) -> Option<&Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.as_ref(),
            EquipSlot::Armor => self.armor.as_ref(),
        }
    }

    /// Puts `item` in `slot`, returning whatever was there.
    pub fn replace(&mut self, slot: EquipSlot, item: Item) -> Option<Item> {
        match slot {
            EquipSlot::Weapon => self.weapon.replace(item),
            EquipSlot::Armor => self.armor.replace(item),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_item_kind() {
        assert_eq!(
            ItemKind::Weapon { damage_faces: 6 }.slot(),
            Some(EquipSlot::Weapon)
        );
        assert_eq!(ItemKind::Armor.slot(), Some(EquipSlot::Armor));
        assert_eq!(Item::bomb("b").kind.slot(), None);
    }

    #[test]
    fn slot_names_parse() {
        assert_eq!("arma".parse::<EquipSlot>().unwrap(), EquipSlot::Weapon);
        assert_eq!(EquipSlot::Armor.as_str(), "armatura");
        assert!("scudo".parse::<EquipSlot>().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn consumables_default_their_potency() {
        let potion: ItemKind = serde_json::from_str(r#"{"HealingPotion":{}}"#).unwrap();
        assert_eq!(potion, ItemKind::HealingPotion { heal: 10 });
        let bomb: ItemKind = serde_json::from_str(r#"{"Bomb":{}}"#).unwrap();
        assert_eq!(bomb, ItemKind::Bomb { damage: 6 });
    }
}

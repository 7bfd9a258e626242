use crate::combatant::{EntityId, EquipSlot};

/// Family of an action, surfaced to callers as the `tipo` tag.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::IntoStaticStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActionKind {
    #[strum(serialize = "attacco")]
    #[cfg_attr(feature = "serde", serde(rename = "attacco"))]
    Attack,
    #[strum(serialize = "abilita")]
    #[cfg_attr(feature = "serde", serde(rename = "abilita"))]
    Ability,
    #[strum(serialize = "oggetto")]
    #[cfg_attr(feature = "serde", serde(rename = "oggetto"))]
    Item,
    #[strum(serialize = "passa")]
    #[cfg_attr(feature = "serde", serde(rename = "passa"))]
    Pass,
    #[strum(serialize = "fuga")]
    #[cfg_attr(feature = "serde", serde(rename = "fuga"))]
    Flee,
    #[strum(serialize = "equipaggiamento")]
    #[cfg_attr(feature = "serde", serde(rename = "equipaggiamento"))]
    Equip,
}

/// One resolved attack roll.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackReport {
    #[cfg_attr(feature = "serde", serde(rename = "bersaglio"))]
    pub target: EntityId,
    /// The raw d20.
    #[cfg_attr(feature = "serde", serde(rename = "tiro"))]
    pub natural: u32,
    #[cfg_attr(feature = "serde", serde(rename = "totale_attacco"))]
    pub attack_total: i32,
    #[cfg_attr(feature = "serde", serde(rename = "ca_bersaglio"))]
    pub armor_class: i32,
    #[cfg_attr(feature = "serde", serde(rename = "colpisce"))]
    pub hits: bool,
    #[cfg_attr(feature = "serde", serde(rename = "critico"))]
    pub critical: bool,
    /// Natural 1. Narrative only.
    #[cfg_attr(feature = "serde", serde(rename = "fallimento_critico"))]
    pub fumble: bool,
    #[cfg_attr(feature = "serde", serde(rename = "danno"))]
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(rename = "hp_rimanenti"))]
    pub target_hp: u32,
}

impl AttackReport {
    pub fn dealt_damage(&self) -> bool {
        self.damage > 0
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealReport {
    #[cfg_attr(feature = "serde", serde(rename = "bersaglio"))]
    pub target: EntityId,
    /// Hp actually restored after capping at maximum.
    #[cfg_attr(feature = "serde", serde(rename = "cura"))]
    pub amount: u32,
    #[cfg_attr(feature = "serde", serde(rename = "hp_rimanenti"))]
    pub target_hp: u32,
}

/// Effect of an area item on a single target.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AreaHit {
    #[cfg_attr(feature = "serde", serde(rename = "bersaglio"))]
    pub target: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "danno"))]
    pub damage: u32,
    #[cfg_attr(feature = "serde", serde(rename = "hp_rimanenti"))]
    pub target_hp: u32,
    /// The target could not be resolved and was skipped.
    #[cfg_attr(feature = "serde", serde(rename = "assente", default))]
    pub missing: bool,
}

impl AreaHit {
    pub(crate) fn missing(target: EntityId) -> Self {
        Self {
            target,
            damage: 0,
            target_hp: 0,
            missing: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FleeReport {
    #[cfg_attr(feature = "serde", serde(rename = "tiro"))]
    pub natural: u32,
    #[cfg_attr(feature = "serde", serde(rename = "totale"))]
    pub total: i32,
    #[cfg_attr(feature = "serde", serde(rename = "difficolta"))]
    pub difficulty: i32,
    #[cfg_attr(feature = "serde", serde(rename = "fuggito"))]
    pub escaped: bool,
}

/// Action-specific result payload.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "effetto", rename_all = "snake_case"))]
pub enum ActionEffect {
    Attack(AttackReport),
    Heal(HealReport),
    Area { hits: Vec<AreaHit> },
    Flee(FleeReport),
    Pass,
    Equip { slot: EquipSlot, item: String },
}

/// Successful resolution of one action.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActionOutcome {
    #[cfg_attr(feature = "serde", serde(rename = "entita"))]
    pub actor: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "tipo"))]
    pub kind: ActionKind,
    #[cfg_attr(feature = "serde", serde(rename = "messaggio"))]
    pub message: String,
    #[cfg_attr(feature = "serde", serde(rename = "dettagli"))]
    pub effect: ActionEffect,
}

impl ActionOutcome {
    pub(crate) fn new(
        actor: &EntityId,
        kind: ActionKind,
        message: impl Into<String>,
        effect: ActionEffect,
    ) -> Self {
        Self {
            actor: actor.clone(),
            kind,
            message: message.into(),
            effect,
        }
    }

    pub fn attack(&self) -> Option<&AttackReport> {
        match &self.effect {
            ActionEffect::Attack(report) => Some(report),
            _ => None,
        }
    }

    pub fn heal(&self) -> Option<&HealReport> {
        match &self.effect {
            ActionEffect::Heal(report) => Some(report),
            _ => None,
        }
    }
}

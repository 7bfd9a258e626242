//! Actions a combatant can take on its turn and how they resolve.
//!
//! [`CombatAction`] is the command submitted to
//! [`crate::engine::CombatEngine::execute`]. Each submodule resolves one
//! family of actions against the engine's state, world and dice, and
//! reports an [`ActionOutcome`] or an [`ActionError`].
mod ability;
mod attack;
mod equip;
mod error;
mod flee;
mod item;
mod outcome;

pub use error::ActionError;
pub use outcome::{
    ActionEffect, ActionKind, ActionOutcome, AreaHit, AttackReport, FleeReport, HealReport,
};

pub(crate) use ability::{HEAL_WOUNDS, POWER_STRIKE};

use crate::combatant::EntityId;

/// A command issued by (or on behalf of) the combatant holding the turn.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "azione"))]
pub enum CombatAction {
    #[cfg_attr(feature = "serde", serde(rename = "attacco"))]
    Attack {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(rename = "bersaglio"))]
        target: EntityId,
        /// Inventory weapon wielded for this attack only.
        #[cfg_attr(feature = "serde", serde(rename = "arma", default))]
        weapon: Option<String>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "abilita"))]
    UseAbility {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(rename = "nome"))]
        ability: String,
        #[cfg_attr(feature = "serde", serde(rename = "bersagli", default))]
        targets: Vec<EntityId>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "oggetto"))]
    UseItem {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(rename = "oggetto"))]
        item: String,
        #[cfg_attr(feature = "serde", serde(rename = "bersagli", default))]
        targets: Vec<EntityId>,
    },
    #[cfg_attr(feature = "serde", serde(rename = "passa"))]
    Pass {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
    },
    #[cfg_attr(feature = "serde", serde(rename = "fuga"))]
    Flee {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
    },
    #[cfg_attr(feature = "serde", serde(rename = "equipaggia"))]
    Equip {
        #[cfg_attr(feature = "serde", serde(rename = "entita"))]
        actor: EntityId,
        #[cfg_attr(feature = "serde", serde(rename = "oggetto"))]
        item: String,
    },
}

impl CombatAction {
    pub fn attack(actor: impl Into<EntityId>, target: impl Into<EntityId>) -> Self {
        Self::Attack {
            actor: actor.into(),
            target: target.into(),
            weapon: None,
        }
    }

    pub fn ability<I, T>(actor: impl Into<EntityId>, ability: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        Self::UseAbility {
            actor: actor.into(),
            ability: ability.into(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn item<I, T>(actor: impl Into<EntityId>, item: impl Into<String>, targets: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<EntityId>,
    {
        Self::UseItem {
            actor: actor.into(),
            item: item.into(),
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    pub fn pass(actor: impl Into<EntityId>) -> Self {
        Self::Pass {
            actor: actor.into(),
        }
    }

    pub fn flee(actor: impl Into<EntityId>) -> Self {
        Self::Flee {
            actor: actor.into(),
        }
    }

    pub fn equip(actor: impl Into<EntityId>, item: impl Into<String>) -> Self {
        Self::Equip {
            actor: actor.into(),
            item: item.into(),
        }
    }

    pub fn actor(&self) -> &EntityId {
        match self {
            Self::Attack { actor, .. }
            | Self::UseAbility { actor, .. }
            | Self::UseItem { actor, .. }
            | Self::Pass { actor }
            | Self::Flee { actor }
            | Self::Equip { actor, .. } => actor,
        }
    }

    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Attack { .. } => ActionKind::Attack,
            Self::UseAbility { .. } => ActionKind::Ability,
            Self::UseItem { .. } => ActionKind::Item,
            Self::Pass { .. } => ActionKind::Pass,
            Self::Flee { .. } => ActionKind::Flee,
            Self::Equip { .. } => ActionKind::Equip,
        }
    }
}

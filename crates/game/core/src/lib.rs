//! Turn-based combat rules shared by every driver of an encounter.
//!
//! `combat-core` defines the canonical combat model (combatants, dice, turn
//! order, actions, rewards) and exposes pure APIs that the runtime and offline
//! tools reuse. All mutation of an encounter flows through
//! [`engine::CombatEngine`], which borrows a [`CombatState`], a world that
//! resolves combatants, and a dice roller for the duration of one call.
pub mod action;
pub mod combatant;
pub mod config;
pub mod dice;
pub mod engine;
pub mod error;
pub mod flow;
pub mod state;
pub mod view;
pub mod world;

mod ai;

pub use action::{
    ActionEffect, ActionError, ActionKind, ActionOutcome, AreaHit, AttackReport, CombatAction,
    FleeReport, HealReport,
};
pub use combatant::{
    AbilityScores, Charges, Combatant, EntityId, EquipSlot, Equipment, Item, ItemKind, Recovery,
    SpecialAbility, Tags,
};
pub use config::{AiTuning, CombatConfig, CriticalRule};
pub use dice::{DiceExpr, DiceRoller, Die, NotationError, NotationRoll, PcgRoller, ScriptedRoller};
pub use engine::{CombatEngine, TurnError};
pub use error::{ErrorSeverity, GameError};
pub use flow::{ItemSummary, TargetSummary};
pub use state::{
    CombatOutcome, CombatState, EncounterContext, EncounterKind, InitError, MessageLog, Phase,
    Reward, Side, StateError,
};
pub use view::{BarColor, CombatView, HpBar, MenuAction, MenuEntry};
pub use world::{CombatWorld, Roster};

/// Combat rules and tunable parameters for one engine instance.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Cooldown in rounds applied to abilities that do not declare one.
    pub default_cooldown: u32,
    /// Upper bound on gold looted from a single defeated opponent.
    pub gold_cap: u32,
    /// Experience per level (`fallback_experience * (1 + level)`) for
    /// opponents without an explicit experience value.
    pub fallback_experience: u32,
    /// Number of narrative messages surfaced to callers.
    pub message_window: usize,
    /// Flee succeeds when `d20 + dex modifier >= flee_base_dc + flee_dc_per_enemy * living opponents`.
    pub flee_base_dc: i32,
    pub flee_dc_per_enemy: i32,
    /// Whether a natural 20 deals damage even when the total misses.
    pub critical_rule: CriticalRule,
    /// Skip combatants at 0 hp when advancing the turn pointer.
    pub skip_defeated_turns: bool,
    pub ai: AiTuning,
}

impl CombatConfig {
    // ===== compile-time constants used as type parameters =====
    /// Maximum number of combatants in one encounter.
    pub const MAX_COMBATANTS: usize = 16;

    // ===== fixed rules =====
    pub const BASE_ARMOR_CLASS: i32 = 10;
    pub const ARMOR_BONUS: i32 = 2;
    pub const UNARMED_DAMAGE_FACES: u32 = 8;
    pub const POWER_STRIKE_PENALTY: i32 = 2;
    pub const POWER_STRIKE_FACES: u32 = 10;
    pub const POWER_STRIKE_DICE: u32 = 2;
    pub const HEAL_WOUNDS_FACES: u32 = 8;
    pub const BOMB_FACES: u32 = 6;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_COOLDOWN: u32 = 3;
    pub const DEFAULT_GOLD_CAP: u32 = 20;
    pub const DEFAULT_FALLBACK_EXPERIENCE: u32 = 25;
    pub const DEFAULT_MESSAGE_WINDOW: usize = 10;
    pub const DEFAULT_FLEE_BASE_DC: i32 = 10;
    pub const DEFAULT_FLEE_DC_PER_ENEMY: i32 = 2;

    pub fn new() -> Self {
        Self {
            default_cooldown: Self::DEFAULT_COOLDOWN,
            gold_cap: Self::DEFAULT_GOLD_CAP,
            fallback_experience: Self::DEFAULT_FALLBACK_EXPERIENCE,
            message_window: Self::DEFAULT_MESSAGE_WINDOW,
            flee_base_dc: Self::DEFAULT_FLEE_BASE_DC,
            flee_dc_per_enemy: Self::DEFAULT_FLEE_DC_PER_ENEMY,
            critical_rule: CriticalRule::default(),
            skip_defeated_turns: false,
            ai: AiTuning::default(),
        }
    }

    pub fn with_critical_rule(mut self, rule: CriticalRule) -> Self {
        self.critical_rule = rule;
        self
    }

    pub fn with_skip_defeated_turns(mut self, skip: bool) -> Self {
        self.skip_defeated_turns = skip;
        self
    }

    /// Difficulty of escaping from `living_opponents` enemies.
    pub fn flee_dc(&self, living_opponents: usize) -> i32 {
        self.flee_base_dc + self.flee_dc_per_enemy * living_opponents as i32
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// How a natural 20 interacts with the armor-class check.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum CriticalRule {
    /// Damage requires meeting armor class; a critical only adds a die.
    #[default]
    RequiresHit,
    /// A natural 20 deals damage even when the total is below armor class.
    NaturalTwentyAlwaysDamages,
}

/// Weights for the non-player action selector.
///
/// Chances are expressed as "roll at most N" on a `decision_die`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiTuning {
    pub decision_die: u32,
    /// Self-heal is considered below this hp percentage.
    pub heal_below_percent: u32,
    pub heal_chance: u32,
    pub power_strike_chance: u32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            decision_die: 10,
            heal_below_percent: 30,
            heal_chance: 8,
            power_strike_chance: 4,
        }
    }
}

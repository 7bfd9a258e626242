//! Renderer-facing snapshot of an encounter.
//!
//! [`CombatView`] is what a UI draws: hp bars, the menu for the combatant
//! holding the turn and the tail of the narrative log. Building a view never
//! mutates anything.

use crate::combatant::{Combatant, EntityId};
use crate::state::{CombatOutcome, CombatState, Phase, Side};
use crate::world::CombatWorld;

/// Bar color by remaining hp: above half, above a quarter, the rest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BarColor {
    #[strum(serialize = "verde")]
    #[cfg_attr(feature = "serde", serde(rename = "verde"))]
    Green,
    #[strum(serialize = "giallo")]
    #[cfg_attr(feature = "serde", serde(rename = "giallo"))]
    Yellow,
    #[strum(serialize = "rosso")]
    #[cfg_attr(feature = "serde", serde(rename = "rosso"))]
    Red,
}

impl BarColor {
    pub fn for_hp(hp: u32, hp_max: u32) -> Self {
        let hp = u64::from(hp);
        let hp_max = u64::from(hp_max);
        if hp * 2 > hp_max {
            Self::Green
        } else if hp * 4 > hp_max {
            Self::Yellow
        } else {
            Self::Red
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HpBar {
    pub id: EntityId,
    #[cfg_attr(feature = "serde", serde(rename = "nome"))]
    pub name: String,
    pub hp: u32,
    pub hp_max: u32,
    #[cfg_attr(feature = "serde", serde(rename = "percentuale"))]
    pub percent: u32,
    #[cfg_attr(feature = "serde", serde(rename = "colore"))]
    pub color: BarColor,
    #[cfg_attr(feature = "serde", serde(rename = "fazione"))]
    pub side: Option<Side>,
    #[cfg_attr(feature = "serde", serde(rename = "di_turno"))]
    pub acting: bool,
}

impl HpBar {
    fn of(combatant: &Combatant, acting: bool) -> Self {
        let side = if combatant.is_player() {
            Some(Side::Players)
        } else if combatant.is_opponent() {
            Some(Side::Enemies)
        } else {
            None
        };
        Self {
            id: combatant.id.clone(),
            name: combatant.name.clone(),
            hp: combatant.hp,
            hp_max: combatant.hp_max,
            percent: combatant.hp_percent(),
            color: BarColor::for_hp(combatant.hp, combatant.hp_max),
            side,
            acting,
        }
    }
}

/// Top-level choices of the action menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum MenuAction {
    #[strum(serialize = "attacca")]
    #[cfg_attr(feature = "serde", serde(rename = "attacca"))]
    Attack,
    #[strum(serialize = "abilita")]
    #[cfg_attr(feature = "serde", serde(rename = "abilita"))]
    Ability,
    #[strum(serialize = "oggetti")]
    #[cfg_attr(feature = "serde", serde(rename = "oggetti"))]
    Item,
    #[strum(serialize = "equipaggiamento")]
    #[cfg_attr(feature = "serde", serde(rename = "equipaggiamento"))]
    Equip,
    #[strum(serialize = "fuga")]
    #[cfg_attr(feature = "serde", serde(rename = "fuga"))]
    Flee,
    #[strum(serialize = "passa")]
    #[cfg_attr(feature = "serde", serde(rename = "passa"))]
    Pass,
}

impl MenuAction {
    pub const ALL: [Self; 6] = [
        Self::Attack,
        Self::Ability,
        Self::Item,
        Self::Equip,
        Self::Flee,
        Self::Pass,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Attack => "Attacca",
            Self::Ability => "Abilità",
            Self::Item => "Oggetti",
            Self::Equip => "Equipaggiamento",
            Self::Flee => "Fuggi",
            Self::Pass => "Passa il turno",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MenuEntry {
    #[cfg_attr(feature = "serde", serde(rename = "azione"))]
    pub action: MenuAction,
    #[cfg_attr(feature = "serde", serde(rename = "etichetta"))]
    pub label: String,
    #[cfg_attr(feature = "serde", serde(rename = "abilitata"))]
    pub enabled: bool,
    #[cfg_attr(feature = "serde", serde(rename = "motivo", default))]
    pub reason: Option<String>,
}

impl MenuEntry {
    fn new(action: MenuAction, disabled_because: Option<&str>) -> Self {
        Self {
            action,
            label: action.label().to_owned(),
            enabled: disabled_because.is_none(),
            reason: disabled_because.map(str::to_owned),
        }
    }
}

/// Everything a renderer needs for one frame.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CombatView {
    #[cfg_attr(feature = "serde", serde(rename = "round"))]
    pub round: u32,
    #[cfg_attr(feature = "serde", serde(rename = "in_corso"))]
    pub active: bool,
    #[cfg_attr(feature = "serde", serde(rename = "fase"))]
    pub phase: Phase,
    #[cfg_attr(feature = "serde", serde(rename = "turno_corrente"))]
    pub current: Option<EntityId>,
    #[cfg_attr(feature = "serde", serde(rename = "barre_hp"))]
    pub bars: Vec<HpBar>,
    /// Empty unless a player holds the turn.
    #[cfg_attr(feature = "serde", serde(rename = "menu"))]
    pub menu: Vec<MenuEntry>,
    #[cfg_attr(feature = "serde", serde(rename = "messaggi"))]
    pub messages: Vec<String>,
    #[cfg_attr(feature = "serde", serde(rename = "esito"))]
    pub outcome: Option<CombatOutcome>,
}

impl CombatView {
    pub fn build<W>(state: &CombatState, world: &W, window: usize) -> Self
    where
        W: CombatWorld + ?Sized,
    {
        let current = state.current().cloned();
        let bars = state
            .participants()
            .iter()
            .filter_map(|id| world.combatant(id))
            .map(|combatant| HpBar::of(combatant, current.as_ref() == Some(&combatant.id)))
            .collect();

        let menu = match current.as_ref().and_then(|id| world.combatant(id)) {
            Some(actor) if state.is_active() && actor.is_player() => {
                build_menu(state, world, actor)
            }
            _ => Vec::new(),
        };

        Self {
            round: state.round(),
            active: state.is_active(),
            phase: state.phase(),
            current,
            bars,
            menu,
            messages: state.recent_messages(window).to_vec(),
            outcome: state.outcome().cloned(),
        }
    }
}

fn build_menu<W>(state: &CombatState, world: &W, actor: &Combatant) -> Vec<MenuEntry>
where
    W: CombatWorld + ?Sized,
{
    if !actor.is_alive() {
        return MenuAction::ALL
            .into_iter()
            .map(|action| match action {
                MenuAction::Pass => MenuEntry::new(action, None),
                _ => MenuEntry::new(action, Some("Fuori combattimento")),
            })
            .collect();
    }

    let has_target = state.participants().iter().any(|id| {
        world
            .combatant(id)
            .is_some_and(|other| other.is_alive() && actor.is_hostile_to(other))
    });
    let ability_reason = if actor.abilities.is_empty() {
        Some("Nessuna abilità conosciuta")
    } else if !actor
        .abilities
        .values()
        .any(|ability| ability.is_ready(state.round()))
    {
        Some("Nessuna abilità pronta")
    } else {
        None
    };
    let has_consumable = actor.inventory.iter().any(|item| item.kind.is_consumable());
    let has_gear = actor.inventory.iter().any(|item| item.kind.slot().is_some());

    MenuAction::ALL
        .into_iter()
        .map(|action| {
            let reason = match action {
                MenuAction::Attack => (!has_target).then_some("Nessun bersaglio valido"),
                MenuAction::Ability => ability_reason,
                MenuAction::Item => (!has_consumable).then_some("Nessun oggetto utilizzabile"),
                MenuAction::Equip => (!has_gear).then_some("Nessun equipaggiamento disponibile"),
                MenuAction::Flee | MenuAction::Pass => None,
            };
            MenuEntry::new(action, reason)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combatant::{Item, SpecialAbility, Tags};
    use crate::config::CombatConfig;
    use crate::dice::ScriptedRoller;
    use crate::engine::CombatEngine;
    use crate::state::EncounterContext;
    use crate::world::Roster;

    #[test]
    fn bar_colors_follow_half_and_quarter_thresholds() {
        assert_eq!(BarColor::for_hp(20, 20), BarColor::Green);
        assert_eq!(BarColor::for_hp(11, 20), BarColor::Green);
        assert_eq!(BarColor::for_hp(10, 20), BarColor::Yellow);
        assert_eq!(BarColor::for_hp(6, 20), BarColor::Yellow);
        assert_eq!(BarColor::for_hp(5, 20), BarColor::Red);
        assert_eq!(BarColor::for_hp(0, 20), BarColor::Red);
    }

    #[test]
    fn view_shows_menu_only_for_players() {
        let mut world = Roster::new()
            .with(
                Combatant::new("eroe", "Eroe", 20)
                    .with_tags(Tags::PLAYER)
                    .with_hp(4)
                    .with_item(Item::healing_potion("pozione"))
                    .with_ability("cura_ferite", SpecialAbility::new(0, 3)),
            )
            .with(Combatant::new("goblin_1", "Goblin", 10).with_tags(Tags::ENEMY));
        let mut state =
            CombatState::from_context(EncounterContext::new(["eroe", "goblin_1"])).unwrap();
        let mut dice = ScriptedRoller::new([20, 1]);
        let config = CombatConfig::default();
        let mut engine = CombatEngine::new(&mut state, &mut world, &mut dice, &config).unwrap();
        engine.begin().unwrap();

        let view = CombatView::build(engine.state(), engine.world(), 5);
        assert_eq!(view.round, 1);
        assert_eq!(view.current, Some(EntityId::from("eroe")));
        assert_eq!(view.bars[0].color, BarColor::Red);
        assert!(view.bars[0].acting);
        assert_eq!(view.menu.len(), 6);
        let equip = view
            .menu
            .iter()
            .find(|entry| entry.action == MenuAction::Equip)
            .unwrap();
        assert!(!equip.enabled);
        assert!(view.menu.iter().filter(|entry| entry.enabled).count() == 5);

        engine.pass_turn(&"eroe".into()).unwrap();
        let view = CombatView::build(engine.state(), engine.world(), 5);
        assert!(view.menu.is_empty());
        assert_eq!(view.messages.last().map(String::as_str), Some("Tocca a Goblin."));
    }
}

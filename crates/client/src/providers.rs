//! Player-side action providers for the terminal.
use std::io::Write;

use async_trait::async_trait;
use combat_core::{CombatAction, CombatView, EntityId, MenuAction, Side};
use combat_runtime::{ActionProvider, RuntimeError};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use crate::command::{self, Input};
use crate::render;

/// Reads one command per line from stdin, re-prompting on typos.
pub struct StdinProvider {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl StdinProvider {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }
}

impl Default for StdinProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ActionProvider for StdinProvider {
    async fn provide_action(
        &self,
        actor: &EntityId,
        view: &CombatView,
    ) -> combat_runtime::Result<CombatAction> {
        let mut lines = self.lines.lock().await;
        loop {
            print!("{actor}> ");
            let _ = std::io::stdout().flush();

            let line = match lines.next_line().await {
                Ok(Some(line)) => line,
                Ok(None) => {
                    return Err(RuntimeError::ProviderExhausted {
                        actor: actor.clone(),
                    });
                }
                Err(error) => {
                    tracing::warn!(%error, "failed to read stdin");
                    return Err(RuntimeError::ProviderExhausted {
                        actor: actor.clone(),
                    });
                }
            };

            match command::parse(actor, &line) {
                Ok(Input::Action(action)) => return Ok(action),
                Ok(Input::Help) => print!("{}", render::menu(&view.menu)),
                Err(command::CommandError::Empty) => {}
                Err(error) => println!("{error} (scrivi `aiuto`)"),
            }
        }
    }
}

/// Attacks the first living enemy on the board; passes when it cannot.
#[derive(Clone, Copy, Debug, Default)]
pub struct AutoProvider;

impl AutoProvider {
    pub fn choose(actor: &EntityId, view: &CombatView) -> CombatAction {
        let can_attack = view
            .menu
            .iter()
            .any(|entry| entry.action == MenuAction::Attack && entry.enabled);
        let target = view
            .bars
            .iter()
            .find(|bar| bar.side == Some(Side::Enemies) && bar.hp > 0 && &bar.id != actor);

        match target {
            Some(bar) if can_attack => CombatAction::attack(actor.clone(), bar.id.clone()),
            _ => CombatAction::pass(actor.clone()),
        }
    }
}

#[async_trait]
impl ActionProvider for AutoProvider {
    async fn provide_action(
        &self,
        actor: &EntityId,
        view: &CombatView,
    ) -> combat_runtime::Result<CombatAction> {
        Ok(Self::choose(actor, view))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::{BarColor, HpBar, MenuEntry, Phase};

    fn bar(id: &str, hp: u32, side: Side) -> HpBar {
        HpBar {
            id: EntityId::new(id),
            name: id.to_owned(),
            hp,
            hp_max: 10,
            percent: hp * 10,
            color: BarColor::for_hp(hp, 10),
            side: Some(side),
            acting: false,
        }
    }

    fn view(bars: Vec<HpBar>, attack_enabled: bool) -> CombatView {
        CombatView {
            round: 1,
            active: true,
            phase: Phase::Action,
            current: Some(EntityId::new("giocatore_1")),
            bars,
            menu: vec![MenuEntry {
                action: MenuAction::Attack,
                label: MenuAction::Attack.label().to_owned(),
                enabled: attack_enabled,
                reason: None,
            }],
            messages: Vec::new(),
            outcome: None,
        }
    }

    fn aria() -> EntityId {
        EntityId::new("giocatore_1")
    }

    #[tokio::test]
    async fn auto_pilot_skips_fallen_enemies() {
        let view = view(
            vec![
                bar("giocatore_1", 10, Side::Players),
                bar("goblin_1", 0, Side::Enemies),
                bar("goblin_2", 4, Side::Enemies),
            ],
            true,
        );
        let action = AutoProvider.provide_action(&aria(), &view).await.unwrap();
        assert_eq!(action, CombatAction::attack(aria(), "goblin_2"));
    }

    #[test]
    fn auto_pilot_passes_without_a_usable_attack() {
        let no_enemies = view(vec![bar("giocatore_1", 10, Side::Players)], true);
        assert_eq!(
            AutoProvider::choose(&aria(), &no_enemies),
            CombatAction::pass(aria())
        );

        let disabled = view(vec![bar("goblin_1", 5, Side::Enemies)], false);
        assert_eq!(
            AutoProvider::choose(&aria(), &disabled),
            CombatAction::pass(aria())
        );
    }
}

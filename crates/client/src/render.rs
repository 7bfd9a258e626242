//! Plain-text rendering of views and responses.
use std::fmt::Write;

use combat_core::{CombatOutcome, CombatView, HpBar, MenuEntry};
use combat_runtime::ActionResponse;

const BAR_WIDTH: u32 = 20;

pub fn hp_bar(bar: &HpBar) -> String {
    let filled = if bar.hp_max == 0 {
        0
    } else {
        (bar.hp * BAR_WIDTH / bar.hp_max).min(BAR_WIDTH)
    };
    let marker = if bar.acting { '>' } else { ' ' };
    format!(
        "{marker} {:<12} [{}{}] {:>3}/{:<3} {}",
        bar.name,
        "#".repeat(filled as usize),
        "-".repeat((BAR_WIDTH - filled) as usize),
        bar.hp,
        bar.hp_max,
        bar.color,
    )
}

pub fn menu(entries: &[MenuEntry]) -> String {
    let mut out = String::new();
    for entry in entries {
        match (&entry.reason, entry.enabled) {
            (_, true) => {
                let _ = writeln!(out, "  {}", entry.label);
            }
            (Some(reason), false) => {
                let _ = writeln!(out, "  ({}: {reason})", entry.label);
            }
            (None, false) => {
                let _ = writeln!(out, "  ({})", entry.label);
            }
        }
    }
    out
}

pub fn view(view: &CombatView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "== Round {} ==", view.round);
    for bar in &view.bars {
        let _ = writeln!(out, "{}", hp_bar(bar));
    }
    if !view.menu.is_empty() {
        let _ = writeln!(out, "Azioni:");
        out.push_str(&menu(&view.menu));
    }
    if let Some(outcome) = &view.outcome {
        out.push_str(&self::outcome(outcome));
    }
    out
}

pub fn response(response: &ActionResponse) -> String {
    match (&response.code, response.success) {
        (_, true) => response.message.clone(),
        (Some(code), false) => format!("! {} [{code}]", response.message),
        (None, false) => format!("! {}", response.message),
    }
}

pub fn outcome(outcome: &CombatOutcome) -> String {
    let mut out = String::new();
    match (&outcome.winner, &outcome.fled) {
        (Some(side), _) => {
            let _ = writeln!(out, "Combattimento concluso: vince la fazione {side}");
        }
        (None, Some(fled)) => {
            let _ = writeln!(out, "Combattimento concluso: {fled} è fuggito");
        }
        (None, None) if outcome.forced => {
            let _ = writeln!(out, "Combattimento interrotto");
        }
        (None, None) => {
            let _ = writeln!(out, "Combattimento concluso");
        }
    }
    for reward in &outcome.rewards {
        let _ = write!(
            out,
            "  {} ottiene {} oro e {} PE da {}",
            reward.recipient, reward.gold, reward.experience, reward.source
        );
        if let Some(item) = &reward.item {
            let _ = write!(out, " (+{item})");
        }
        if reward.leveled_up {
            let _ = write!(out, " - livello aumentato!");
        }
        out.push('\n');
    }
    out
}

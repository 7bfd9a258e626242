//! Parses a typed line into the action of the combatant holding the turn.
//!
//! | Command                           | Alias | Action          |
//! |-----------------------------------|-------|-----------------|
//! | `attacca <bersaglio> [arma]`      | `a`   | attack          |
//! | `abilita <nome> [bersagli...]`    | `b`   | special ability |
//! | `usa <oggetto> [bersagli...]`     | `o`   | consumable      |
//! | `equipaggia <oggetto>`            | `e`   | equip           |
//! | `fuggi`                           | `f`   | flee            |
//! | `passa`                           | `p`   | pass            |
//! | `aiuto`                           | `?`   | show the menu   |
use combat_core::{CombatAction, EntityId};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Input {
    Action(CombatAction),
    Help,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("nessun comando")]
    Empty,
    #[error("comando sconosciuto: {0}")]
    Unknown(String),
    #[error("{command}: manca {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },
}

pub fn parse(actor: &EntityId, line: &str) -> Result<Input, CommandError> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Err(CommandError::Empty);
    };
    let actor = actor.clone();

    let action = match head.to_lowercase().as_str() {
        "attacca" | "a" => {
            let target = required(words.next(), "attacca", "il bersaglio")?;
            CombatAction::Attack {
                actor,
                target: EntityId::new(target),
                weapon: words.next().map(str::to_owned),
            }
        }
        "abilita" | "abilità" | "b" => {
            let name = required(words.next(), "abilita", "il nome")?;
            CombatAction::ability(actor, name, words)
        }
        "usa" | "o" => {
            let item = required(words.next(), "usa", "l'oggetto")?;
            CombatAction::item(actor, item, words)
        }
        "equipaggia" | "e" => {
            let item = required(words.next(), "equipaggia", "l'oggetto")?;
            CombatAction::equip(actor, item)
        }
        "fuggi" | "f" => CombatAction::flee(actor),
        "passa" | "p" => CombatAction::pass(actor),
        "aiuto" | "?" => return Ok(Input::Help),
        other => return Err(CommandError::Unknown(other.to_owned())),
    };
    Ok(Input::Action(action))
}

fn required<'a>(
    word: Option<&'a str>,
    command: &'static str,
    argument: &'static str,
) -> Result<&'a str, CommandError> {
    word.ok_or(CommandError::MissingArgument { command, argument })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn aria() -> EntityId {
        EntityId::new("giocatore_1")
    }

    fn action(line: &str) -> CombatAction {
        match parse(&aria(), line).unwrap() {
            Input::Action(action) => action,
            Input::Help => panic!("expected an action for {line:?}"),
        }
    }

    #[test]
    fn attack_with_optional_weapon() {
        assert_eq!(action("a goblin_1"), CombatAction::attack(aria(), "goblin_1"));
        assert_eq!(
            action("attacca goblin_1 ascia"),
            CombatAction::Attack {
                actor: aria(),
                target: EntityId::new("goblin_1"),
                weapon: Some("ascia".into()),
            }
        );
    }

    #[test]
    fn abilities_and_items_take_any_number_of_targets() {
        assert_eq!(
            action("abilita palla_di_fuoco goblin_1 goblin_2"),
            CombatAction::ability(aria(), "palla_di_fuoco", ["goblin_1", "goblin_2"])
        );
        assert_eq!(
            action("o pozione"),
            CombatAction::item(aria(), "pozione", Vec::<EntityId>::new())
        );
    }

    #[test]
    fn one_word_commands() {
        assert_eq!(action("F"), CombatAction::flee(aria()));
        assert_eq!(action("  passa  "), CombatAction::pass(aria()));
        assert_eq!(action("e spada"), CombatAction::equip(aria(), "spada"));
        assert_eq!(parse(&aria(), "?"), Ok(Input::Help));
    }

    #[test]
    fn bad_lines_explain_themselves() {
        assert_eq!(parse(&aria(), "   "), Err(CommandError::Empty));
        assert_eq!(
            parse(&aria(), "balla"),
            Err(CommandError::Unknown("balla".into()))
        );
        let err = parse(&aria(), "attacca").unwrap_err();
        assert_eq!(err.to_string(), "attacca: manca il bersaglio");
    }
}

//! Dice notation such as `2d6+3`, `d20`, `1d8-1` or a bare `5`.

use core::fmt;
use core::str::FromStr;

use super::{DiceRoller, Die};

/// Most dice a single expression may roll.
pub const MAX_DICE: u32 = 100;
/// Largest die an expression may name.
pub const MAX_FACES: u32 = 1000;

/// Errors produced while parsing dice notation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum NotationError {
    #[error("empty dice expression")]
    Empty,

    #[error("invalid dice count in `{0}`")]
    InvalidCount(String),

    #[error("invalid die faces in `{0}`")]
    InvalidFaces(String),

    #[error("invalid modifier in `{0}`")]
    InvalidModifier(String),

    #[error("invalid constant in `{0}`")]
    InvalidConstant(String),

    #[error("`{0}` rolls more than {MAX_DICE} dice or dice above d{MAX_FACES}")]
    TooLarge(String),

    #[error("`{0}` does not fit in a 32-bit total")]
    Overflow(String),
}

impl crate::error::GameError for NotationError {
    fn severity(&self) -> crate::error::ErrorSeverity {
        crate::error::ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Empty => "NOTATION_EMPTY",
            Self::InvalidCount(_) => "NOTATION_INVALID_COUNT",
            Self::InvalidFaces(_) => "NOTATION_INVALID_FACES",
            Self::InvalidModifier(_) => "NOTATION_INVALID_MODIFIER",
            Self::InvalidConstant(_) => "NOTATION_INVALID_CONSTANT",
            Self::TooLarge(_) => "NOTATION_TOO_LARGE",
            Self::Overflow(_) => "NOTATION_OVERFLOW",
        }
    }
}

/// Parsed dice expression `count d faces + modifier`.
///
/// A constant expression (no `d`) has `count == 0` and carries its value in
/// `modifier`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiceExpr {
    pub count: u32,
    pub faces: u32,
    pub modifier: i32,
}

/// Result of rolling a [`DiceExpr`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NotationRoll {
    pub total: i32,
    pub rolls: Vec<u32>,
    pub modifier: i32,
}

impl DiceExpr {
    pub const fn constant(value: i32) -> Self {
        Self {
            count: 0,
            faces: 0,
            modifier: value,
        }
    }

    pub const fn is_constant(&self) -> bool {
        self.count == 0
    }

    pub fn roll<R: DiceRoller + ?Sized>(&self, dice: &mut R) -> NotationRoll {
        let rolls = if self.is_constant() {
            Vec::new()
        } else {
            Die::new(self.faces).roll_many(self.count, dice)
        };
        let sum: i64 = rolls.iter().map(|&roll| i64::from(roll)).sum();
        let total = (sum + i64::from(self.modifier))
            .clamp(i64::from(i32::MIN), i64::from(i32::MAX));
        NotationRoll {
            total: total as i32,
            rolls,
            modifier: self.modifier,
        }
    }
}

impl FromStr for DiceExpr {
    type Err = NotationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let text: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        if text.is_empty() {
            return Err(NotationError::Empty);
        }

        let Some((count, rest)) = text.split_once('d') else {
            // Constant, optionally followed by a modifier: `5`, `5+2`, `-1`.
            let (constant, modifier) = split_modifier(&text, 1)?;
            let constant: i32 = constant
                .parse()
                .map_err(|_| NotationError::InvalidConstant(input.to_owned()))?;
            let value = constant
                .checked_add(modifier)
                .ok_or_else(|| NotationError::Overflow(input.to_owned()))?;
            return Ok(Self::constant(value));
        };

        let count: u32 = if count.is_empty() {
            1
        } else {
            count
                .parse()
                .map_err(|_| NotationError::InvalidCount(input.to_owned()))?
        };
        if count > MAX_DICE {
            return Err(NotationError::TooLarge(input.to_owned()));
        }

        let (faces, modifier) = split_modifier(rest, 0)?;
        let faces: u32 = faces
            .parse()
            .map_err(|_| NotationError::InvalidFaces(input.to_owned()))?;
        if faces == 0 {
            return Err(NotationError::InvalidFaces(input.to_owned()));
        }
        if faces > MAX_FACES {
            return Err(NotationError::TooLarge(input.to_owned()));
        }
        // the highest possible total must still fit in i32
        let highest = i32::try_from(count * faces)
            .ok()
            .and_then(|top| top.checked_add(modifier));
        if highest.is_none() {
            return Err(NotationError::Overflow(input.to_owned()));
        }

        Ok(Self {
            count,
            faces,
            modifier,
        })
    }
}

/// Splits `body+M` / `body-M`, searching for the sign from `from` onward.
fn split_modifier(text: &str, from: usize) -> Result<(&str, i32), NotationError> {
    let position = text
        .char_indices()
        .skip(from)
        .find(|(_, c)| *c == '+' || *c == '-')
        .map(|(index, _)| index);

    match position {
        None => Ok((text, 0)),
        Some(index) => {
            let (body, modifier) = text.split_at(index);
            let modifier: i32 = modifier
                .strip_prefix('+')
                .unwrap_or(modifier)
                .parse()
                .map_err(|_| NotationError::InvalidModifier(text.to_owned()))?;
            Ok((body, modifier))
        }
    }
}

impl fmt::Display for DiceExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_constant() {
            return write!(f, "{}", self.modifier);
        }
        write!(f, "{}d{}", self.count, self.faces)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

/// Parses and rolls `notation` in one step.
pub fn roll_notation<R: DiceRoller + ?Sized>(
    notation: &str,
    dice: &mut R,
) -> Result<NotationRoll, NotationError> {
    Ok(notation.parse::<DiceExpr>()?.roll(dice))
}

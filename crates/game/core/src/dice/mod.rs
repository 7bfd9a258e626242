//! Dice and random number sources.
//!
//! Every random event in an encounter goes through a [`DiceRoller`]. The
//! engine never owns a global RNG: callers inject a seeded [`PcgRoller`] for
//! live play or a [`ScriptedRoller`] to replay fixed rolls.
mod notation;
mod rng;

pub use notation::{DiceExpr, NotationError, NotationRoll, roll_notation};
pub use rng::{PcgRoller, ScriptedRoller};

/// Source of uniformly distributed die faces.
pub trait DiceRoller {
    /// Roll one die with `faces` sides (1..=faces inclusive).
    fn roll(&mut self, faces: u32) -> u32;
}

impl<R: DiceRoller + ?Sized> DiceRoller for &mut R {
    fn roll(&mut self, faces: u32) -> u32 {
        (**self).roll(faces)
    }
}

/// A single die with a fixed number of faces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Die {
    faces: u32,
}

impl Die {
    pub const D6: Self = Self::new(6);
    pub const D8: Self = Self::new(8);
    pub const D10: Self = Self::new(10);
    pub const D20: Self = Self::new(20);

    /// Creates a die; zero faces is treated as a one-sided die.
    pub const fn new(faces: u32) -> Self {
        Self {
            faces: if faces == 0 { 1 } else { faces },
        }
    }

    pub const fn faces(&self) -> u32 {
        self.faces
    }

    /// Rolls once, always landing in `[1, faces]`.
    pub fn roll<R: DiceRoller + ?Sized>(&self, dice: &mut R) -> u32 {
        dice.roll(self.faces).clamp(1, self.faces)
    }

    /// Rolls `count` independent dice.
    pub fn roll_many<R: DiceRoller + ?Sized>(&self, count: u32, dice: &mut R) -> Vec<u32> {
        (0..count).map(|_| self.roll(dice)).collect()
    }

    /// Sum of `count` independent dice.
    pub fn roll_sum<R: DiceRoller + ?Sized>(&self, count: u32, dice: &mut R) -> u32 {
        (0..count).map(|_| self.roll(dice)).sum()
    }

    /// Rolls twice and keeps the best result.
    ///
    /// Returns `(best, first, second)`.
    pub fn roll_with_advantage<R: DiceRoller + ?Sized>(&self, dice: &mut R) -> (u32, u32, u32) {
        let first = self.roll(dice);
        let second = self.roll(dice);
        (first.max(second), first, second)
    }

    /// Rolls twice and keeps the worst result.
    ///
    /// Returns `(worst, first, second)`.
    pub fn roll_with_disadvantage<R: DiceRoller + ?Sized>(
        &self,
        dice: &mut R,
    ) -> (u32, u32, u32) {
        let first = self.roll(dice);
        let second = self.roll(dice);
        (first.min(second), first, second)
    }
}

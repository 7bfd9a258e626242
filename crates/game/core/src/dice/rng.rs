//! Concrete dice rollers.

use std::collections::VecDeque;

use super::DiceRoller;

/// PCG random number generator (Permuted Congruential Generator).
///
/// PCG-XSH-RR: 32-bit output from 64-bit state. The state is plain data so
/// an encounter can be persisted mid-fight and resume the same roll
/// sequence after a reload.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRoller {
    state: u64,
}

impl PcgRoller {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        // Scramble the seed once so nearby seeds diverge immediately.
        Self {
            state: Self::pcg_step(seed ^ 0x9e3779b97f4a7c15),
        }
    }

    /// Current generator state, e.g. for logging a replay point.
    pub fn state(&self) -> u64 {
        self.state
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation (xorshift high, random rotate).
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

impl DiceRoller for PcgRoller {
    fn roll(&mut self, faces: u32) -> u32 {
        if faces <= 1 {
            return 1;
        }
        (self.next_u32() % faces) + 1
    }
}

/// Replays a fixed sequence of die results.
///
/// Used by tests and by tools that re-run a recorded encounter. Once the
/// script runs out every further roll returns 1.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedRoller {
    queue: VecDeque<u32>,
}

impl ScriptedRoller {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            queue: values.into_iter().collect(),
        }
    }

    /// Appends more results to the end of the script.
    pub fn push(&mut self, value: u32) {
        self.queue.push_back(value);
    }

    /// Number of scripted results not consumed yet.
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }
}

impl DiceRoller for ScriptedRoller {
    fn roll(&mut self, faces: u32) -> u32 {
        match self.queue.pop_front() {
            Some(value) => value,
            None => {
                tracing::warn!(faces, "dice script exhausted, rolling 1");
                1
            }
        }
    }
}

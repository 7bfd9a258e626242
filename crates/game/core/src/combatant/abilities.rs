//! Special abilities with round-based cooldowns and optional charges.

/// Rest after which spent charges come back.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Recovery {
    #[cfg_attr(feature = "serde", serde(rename = "riposo_breve"))]
    ShortRest,
    #[cfg_attr(feature = "serde", serde(rename = "riposo_lungo"))]
    LongRest,
}

/// Limited uses of an ability between rests.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Charges {
    pub current: u32,
    pub max: u32,
    pub recovery: Option<Recovery>,
}

impl Charges {
    pub fn full(max: u32, recovery: Option<Recovery>) -> Self {
        Self {
            current: max,
            max,
            recovery,
        }
    }
}

/// An ability known by a combatant.
///
/// Cooldown is measured in rounds: after use in round `r` the ability is
/// usable again from round `r + cooldown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SpecialAbility {
    /// Free-form potency carried from content data.
    pub value: i32,
    pub cooldown: u32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub last_used_round: Option<u32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub charges: Option<Charges>,
}

impl SpecialAbility {
    pub fn new(value: i32, cooldown: u32) -> Self {
        Self {
            value,
            cooldown,
            last_used_round: None,
            charges: None,
        }
    }

    pub fn with_charges(mut self, charges: Charges) -> Self {
        self.charges = Some(charges);
        self
    }

    /// Rounds left before the ability can be used again in `round`.
    pub fn rounds_until_ready(&self, round: u32) -> u32 {
        match self.last_used_round {
            None => 0,
            Some(last) => self.cooldown.saturating_sub(round.saturating_sub(last)),
        }
    }

    pub fn has_charges(&self) -> bool {
        self.charges.is_none_or(|charges| charges.current > 0)
    }

    pub fn is_ready(&self, round: u32) -> bool {
        self.rounds_until_ready(round) == 0 && self.has_charges()
    }

    /// Stamps the round of use and spends a charge.
    pub fn mark_used(&mut self, round: u32) {
        self.last_used_round = Some(round);
        if let Some(charges) = self.charges.as_mut() {
            charges.current = charges.current.saturating_sub(1);
        }
    }

    /// A long rest also restores short-rest abilities.
    pub fn recover(&mut self, rest: Recovery) {
        let Some(charges) = self.charges.as_mut() else {
            return;
        };
        let restores = match (charges.recovery, rest) {
            (Some(Recovery::ShortRest), _) => true,
            (Some(Recovery::LongRest), Recovery::LongRest) => true,
            _ => false,
        };
        if restores {
            charges.current = charges.max;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cooldown_counts_rounds_since_last_use() {
        let mut ability = SpecialAbility::new(0, 3);
        assert!(ability.is_ready(1));
        ability.mark_used(2);
        assert_eq!(ability.rounds_until_ready(2), 3);
        assert_eq!(ability.rounds_until_ready(4), 1);
        assert!(!ability.is_ready(4));
        assert!(ability.is_ready(5));
    }

    #[test]
    fn zero_cooldown_is_always_ready() {
        let mut ability = SpecialAbility::new(0, 0);
        ability.mark_used(1);
        assert!(ability.is_ready(1));
    }

    #[test]
    fn charges_run_out_and_recover_on_matching_rest() {
        let mut ability =
            SpecialAbility::new(0, 0).with_charges(Charges::full(1, Some(Recovery::LongRest)));
        ability.mark_used(1);
        assert!(!ability.is_ready(5));

        ability.recover(Recovery::ShortRest);
        assert!(!ability.has_charges());

        ability.recover(Recovery::LongRest);
        assert!(ability.is_ready(5));
    }

    #[test]
    fn short_rest_abilities_recover_on_any_rest() {
        let mut ability =
            SpecialAbility::new(0, 0).with_charges(Charges::full(2, Some(Recovery::ShortRest)));
        ability.mark_used(1);
        ability.mark_used(2);
        assert!(!ability.has_charges());
        ability.recover(Recovery::LongRest);
        assert_eq!(ability.charges.map(|c| c.current), Some(2));
    }

    #[test]
    fn charges_without_recovery_never_come_back() {
        let mut ability = SpecialAbility::new(0, 0).with_charges(Charges::full(1, None));
        ability.mark_used(1);
        ability.recover(Recovery::LongRest);
        assert!(!ability.has_charges());
    }
}

//! Combat stances.
//!
//! Stances form a one-dimensional ordinal line between the two sides:
//! aggressive is closest to the enemy, defensive furthest away. A hero may
//! pick any stance each round; `closer`/`further` describe single steps on
//! the line for callers that want positional movement.

/// A combatant's chosen proximity for the round.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Stance {
    Aggressive,
    #[default]
    Neutral,
    Defensive,
}

impl Stance {
    pub const ALL: [Stance; 3] = [Stance::Aggressive, Stance::Neutral, Stance::Defensive];

    /// Ordinal distance from the front line (0 = closest).
    pub const fn position(self) -> u8 {
        match self {
            Stance::Aggressive => 0,
            Stance::Neutral => 1,
            Stance::Defensive => 2,
        }
    }

    /// Inverse of [`Stance::position`].
    pub const fn from_position(position: u8) -> Option<Stance> {
        match position {
            0 => Some(Stance::Aggressive),
            1 => Some(Stance::Neutral),
            2 => Some(Stance::Defensive),
            _ => None,
        }
    }

    /// One step towards the enemy; aggressive stays aggressive.
    pub const fn closer(self) -> Stance {
        match self {
            Stance::Aggressive | Stance::Neutral => Stance::Aggressive,
            Stance::Defensive => Stance::Neutral,
        }
    }

    /// One step away from the enemy; defensive stays defensive.
    pub const fn further(self) -> Stance {
        match self {
            Stance::Aggressive => Stance::Neutral,
            Stance::Neutral | Stance::Defensive => Stance::Defensive,
        }
    }

    /// Ordinal distance between two stances on the line.
    pub const fn steps_to(self, other: Stance) -> u8 {
        self.position().abs_diff(other.position())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_round_trip() {
        for stance in Stance::ALL {
            assert_eq!(Stance::from_position(stance.position()), Some(stance));
        }
        assert_eq!(Stance::from_position(3), None);
    }

    #[test]
    fn steps_are_adjacent_only() {
        assert_eq!(Stance::Defensive.closer(), Stance::Neutral);
        assert_eq!(Stance::Defensive.closer().closer(), Stance::Aggressive);
        assert_eq!(Stance::Aggressive.closer(), Stance::Aggressive);
        assert_eq!(Stance::Aggressive.further(), Stance::Neutral);
        assert_eq!(Stance::Aggressive.steps_to(Stance::Defensive), 2);
    }
}

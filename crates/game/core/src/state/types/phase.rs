use super::Side;

/// Match state machine state.
///
/// Selection runs once in the order P1 (1 hero), P2 (2), P1 (2), P2 (1).
/// Rounds then cycle `P1Commit → P2CommitAndReveal → P1Reveal` until a
/// terminal phase is reached.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum MatchPhase {
    #[default]
    SelectingP1First,
    SelectingP2First,
    SelectingP1Last,
    SelectingP2Last,
    P1Commit,
    P2CommitAndReveal,
    P1Reveal,
    P1Win,
    P2Win,
    Tie,
}

impl MatchPhase {
    /// Returns true once the match is decided.
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::P1Win | Self::P2Win | Self::Tie)
    }

    /// Returns true inside the commit/reveal cycle.
    pub const fn is_in_round(self) -> bool {
        matches!(self, Self::P1Commit | Self::P2CommitAndReveal | Self::P1Reveal)
    }

    /// The side whose call advances this phase, if any.
    pub const fn acting_side(self) -> Option<Side> {
        match self {
            Self::SelectingP1First | Self::SelectingP1Last | Self::P1Commit | Self::P1Reveal => {
                Some(Side::P1)
            }
            Self::SelectingP2First | Self::SelectingP2Last | Self::P2CommitAndReveal => {
                Some(Side::P2)
            }
            Self::P1Win | Self::P2Win | Self::Tie => None,
        }
    }

    /// Heroes each side holds once this phase is reached, `[p1, p2]`.
    pub const fn roster_sizes(self) -> [usize; 2] {
        match self {
            Self::SelectingP1First => [0, 0],
            Self::SelectingP2First => [1, 0],
            Self::SelectingP1Last => [1, 2],
            Self::SelectingP2Last => [3, 2],
            _ => [3, 3],
        }
    }

    /// Winner of a terminal phase. `None` for ties and running matches.
    pub const fn winner(self) -> Option<Side> {
        match self {
            Self::P1Win => Some(Side::P1),
            Self::P2Win => Some(Side::P2),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_phases_have_no_actor() {
        for phase in [MatchPhase::P1Win, MatchPhase::P2Win, MatchPhase::Tie] {
            assert!(phase.is_terminal());
            assert_eq!(phase.acting_side(), None);
        }
        assert!(!MatchPhase::P1Reveal.is_terminal());
    }

    #[test]
    fn phases_are_ordered_forward() {
        assert!(MatchPhase::SelectingP1First < MatchPhase::SelectingP2Last);
        assert!(MatchPhase::SelectingP2Last < MatchPhase::P1Commit);
        assert!(MatchPhase::P1Reveal < MatchPhase::P1Win);
    }
}

//! Per-round hero commands.

use crate::action::ProtocolError;
use crate::combat::Stance;
use crate::config::GameConfig;

const HEROES: usize = GameConfig::HEROES_PER_SIDE;

/// What one hero does in a round: which enemy slot it strikes and from
/// which stance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundCommand {
    /// Enemy slot `0..=2`, or [`RoundCommand::NO_TARGET`] for a dead committer.
    pub target: u8,
    pub stance: Stance,
}

impl RoundCommand {
    /// Reserved "not applicable" target carried by dead heroes.
    pub const NO_TARGET: u8 = HEROES as u8;

    /// Number of distinct target values a command can carry.
    pub const TARGET_VALUES: u8 = Self::NO_TARGET + 1;

    pub const fn new(target: u8, stance: Stance) -> Self {
        Self { target, stance }
    }

    /// Placeholder command for a hero that cannot act.
    pub const fn idle() -> Self {
        Self {
            target: Self::NO_TARGET,
            stance: Stance::Neutral,
        }
    }

    /// Target slot if this command names one.
    pub const fn target_slot(&self) -> Option<usize> {
        if self.target < Self::NO_TARGET {
            Some(self.target as usize)
        } else {
            None
        }
    }
}

/// A side's complete move for one round: exactly one command per hero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoundMoves(pub [RoundCommand; HEROES]);

impl RoundMoves {
    pub const fn new(commands: [RoundCommand; HEROES]) -> Self {
        Self(commands)
    }

    /// Builds moves from the parallel target and stance arrays.
    pub fn from_parts(targets: [u8; HEROES], stances: [Stance; HEROES]) -> Self {
        Self(core::array::from_fn(|i| RoundCommand::new(targets[i], stances[i])))
    }

    pub fn targets(&self) -> [u8; HEROES] {
        self.0.map(|command| command.target)
    }

    pub fn stances(&self) -> [Stance; HEROES] {
        self.0.map(|command| command.stance)
    }

    pub fn commands(&self) -> &[RoundCommand; HEROES] {
        &self.0
    }

    /// Checks target ranges against which of the committing side's heroes are alive.
    ///
    /// Living heroes must name an enemy slot (the enemy may already be dead).
    /// Dead heroes may carry any slot or the sentinel.
    pub fn validate(&self, alive: &[bool; HEROES]) -> Result<(), ProtocolError> {
        for (hero, (command, alive)) in self.0.iter().zip(alive).enumerate() {
            let in_range = if *alive {
                command.target < RoundCommand::NO_TARGET
            } else {
                command.target <= RoundCommand::NO_TARGET
            };
            if !in_range {
                return Err(ProtocolError::InvalidTarget {
                    hero,
                    target: command.target,
                    alive: *alive,
                });
            }
        }
        Ok(())
    }
}

impl TryFrom<&[RoundCommand]> for RoundMoves {
    type Error = ProtocolError;

    fn try_from(commands: &[RoundCommand]) -> Result<Self, Self::Error> {
        let commands: [RoundCommand; HEROES] = commands
            .try_into()
            .map_err(|_| ProtocolError::wrong_move_count(commands.len()))?;
        Ok(Self(commands))
    }
}

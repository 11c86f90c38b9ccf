//! Recovery of a forgotten committed move.
//!
//! A client that published a commitment and then lost its local cache can
//! rebuild the cleartext from its secret and the published nonce: the move
//! space is small enough to enumerate.

use crate::combat::Stance;
use crate::config::GameConfig;
use crate::error::{ErrorSeverity, GameError};
use crate::state::{PlayerSecret, RoundCommand, RoundMoves};

use super::{Commitment, Nonce, blinding, commit_blinded};

const HEROES: usize = GameConfig::HEROES_PER_SIDE;

/// Number of candidates [`recover`] tries: 4³ targets × 3³ stances.
pub const CANDIDATES: usize = (RoundCommand::TARGET_VALUES as usize).pow(HEROES as u32)
    * Stance::ALL.len().pow(HEROES as u32);

/// Reconciliation failures. Both mean the state is corrupt or tampered with.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ReconcileError {
    #[error("no move out of {candidates} candidates matches the commitment")]
    NoMatch { candidates: usize },

    #[error("{matches} candidate moves match the commitment")]
    Ambiguous { matches: usize },
}

impl GameError for ReconcileError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Fatal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoMatch { .. } => "RECONCILE_NO_MATCH",
            Self::Ambiguous { .. } => "RECONCILE_AMBIGUOUS",
        }
    }
}

/// Every move a side could have committed to, in a fixed order.
pub fn candidates() -> impl Iterator<Item = RoundMoves> {
    (0..CANDIDATES).map(|index| {
        let mut rest = index;
        let commands = core::array::from_fn(|_| {
            let target = (rest % RoundCommand::TARGET_VALUES as usize) as u8;
            rest /= RoundCommand::TARGET_VALUES as usize;
            let stance = Stance::ALL[rest % Stance::ALL.len()];
            rest /= Stance::ALL.len();
            RoundCommand::new(target, stance)
        });
        RoundMoves::new(commands)
    })
}

/// Recovers the unique move behind `commitment`.
///
/// Always walks the whole candidate space, so a collision is reported rather
/// than resolved by whichever candidate happens to come first.
pub fn recover(
    secret: &PlayerSecret,
    nonce: &Nonce,
    commitment: &Commitment,
) -> Result<RoundMoves, ReconcileError> {
    let blinding = blinding(secret, nonce);

    let mut found = None;
    let mut matches = 0;
    for moves in candidates() {
        if commit_blinded(&blinding, &moves, nonce) == *commitment {
            matches += 1;
            found.get_or_insert(moves);
        }
    }

    match (found, matches) {
        (Some(moves), 1) => Ok(moves),
        (None, _) => Err(ReconcileError::NoMatch {
            candidates: CANDIDATES,
        }),
        (Some(_), matches) => Err(ReconcileError::Ambiguous { matches }),
    }
}

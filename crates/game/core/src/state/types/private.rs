use super::{PlayerId, PlayerSecret, RoundMoves};

/// State owned exclusively by one player's client.
///
/// Holds the key material and the cleartext of a move between choosing it
/// and disclosing it. Never transmitted; the opponent's code path never reads it.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerPrivateState {
    pub secret: PlayerSecret,

    /// Cleartext of the move being committed or submitted this round.
    ///
    /// May be lost across the commit→reveal window (client restart); the
    /// committed value is then recovered by reconciliation.
    pub pending: Option<RoundMoves>,
}

impl PlayerPrivateState {
    pub fn new(secret: PlayerSecret) -> Self {
        Self {
            secret,
            pending: None,
        }
    }

    pub fn player_id(&self) -> PlayerId {
        self.secret.player_id()
    }

    pub fn with_pending(mut self, moves: RoundMoves) -> Self {
        self.pending = Some(moves);
        self
    }
}

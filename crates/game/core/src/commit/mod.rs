//! Move commitments.
//!
//! P1 hides its round move behind a SHA-256 digest before P2 moves in the
//! clear. The digest binds the move to P1's secret through a per-round
//! *blinding* value:
//!
//! ```text
//! blinding   = H(tag_b ‖ secret ‖ nonce)
//! commitment = H(tag_c ‖ blinding ‖ targets ‖ stance ordinals ‖ nonce)
//! ```
//!
//! At reveal P1 discloses the move together with the blinding. Anyone holding
//! the published commitment and nonce can then check the reveal, while the
//! secret itself never leaves P1. Before the reveal the blinding is unknown,
//! so the 1,728 possible moves cannot be tried against the digest by the
//! opponent. P1 itself can, which is what [`reconcile::recover`] does.
//!
//! All digests are domain-separated; changing a tag invalidates every
//! outstanding commitment.

pub mod reconcile;

use std::fmt;

use sha2::{Digest, Sha256};

use crate::state::{PlayerSecret, RoundMoves};

pub use reconcile::{ReconcileError, recover};

const BLINDING_TAG: &[u8] = b"arena:blinding:v1";
const COMMITMENT_TAG: &[u8] = b"arena:commitment:v1";

macro_rules! digest_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(pub [u8; 32]);

        impl $name {
            pub const fn from_bytes(bytes: [u8; 32]) -> Self {
                Self(bytes)
            }

            pub const fn as_bytes(&self) -> &[u8; 32] {
                &self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}(", stringify!($name))?;
                for byte in &self.0[..4] {
                    write!(f, "{byte:02x}")?;
                }
                f.write_str("..)")
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                for byte in &self.0 {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    };
}

digest_newtype!(
    /// Published digest binding P1's hidden round move.
    Commitment
);

digest_newtype!(
    /// Fresh per-round value chosen by P1 and published with the commitment.
    Nonce
);

digest_newtype!(
    /// Single-use value derived from the secret and the round nonce.
    ///
    /// Disclosed together with the move at reveal time in place of the secret.
    Blinding
);

/// Derives the blinding for one round.
pub fn blinding(secret: &PlayerSecret, nonce: &Nonce) -> Blinding {
    let mut hasher = Sha256::new();
    hasher.update(BLINDING_TAG);
    hasher.update(secret.as_bytes());
    hasher.update(nonce.0);
    Blinding(hasher.finalize().into())
}

/// Commits to `moves` under an already derived blinding.
pub fn commit_blinded(blinding: &Blinding, moves: &RoundMoves, nonce: &Nonce) -> Commitment {
    let stances = moves.stances().map(|stance| stance.position());

    let mut hasher = Sha256::new();
    hasher.update(COMMITMENT_TAG);
    hasher.update(blinding.0);
    hasher.update(moves.targets());
    hasher.update(stances);
    hasher.update(nonce.0);
    Commitment(hasher.finalize().into())
}

/// Commits to `moves` on behalf of the owner of `secret`.
pub fn commit(secret: &PlayerSecret, moves: &RoundMoves, nonce: &Nonce) -> Commitment {
    commit_blinded(&blinding(secret, nonce), moves, nonce)
}

/// Returns true iff `commitment` was produced from exactly these inputs.
pub fn verify(
    commitment: &Commitment,
    secret: &PlayerSecret,
    moves: &RoundMoves,
    nonce: &Nonce,
) -> bool {
    commit(secret, moves, nonce) == *commitment
}

/// Verifies a reveal without access to the secret.
pub fn verify_blinded(
    commitment: &Commitment,
    blinding: &Blinding,
    moves: &RoundMoves,
    nonce: &Nonce,
) -> bool {
    commit_blinded(blinding, moves, nonce) == *commitment
}

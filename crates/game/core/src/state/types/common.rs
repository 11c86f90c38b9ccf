use std::fmt;

use sha2::{Digest, Sha256};

const PLAYER_ID_TAG: &[u8] = b"arena:player-id:v1";

/// Private key material owned by exactly one player.
///
/// Never leaves the owning client. Everything public about a player
/// ([`PlayerId`], move commitments) is derived from it through one-way hashes.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerSecret([u8; 32]);

impl PlayerSecret {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Derives the public identifier recorded in shared match state.
    pub fn player_id(&self) -> PlayerId {
        let mut hasher = Sha256::new();
        hasher.update(PLAYER_ID_TAG);
        hasher.update(self.0);
        PlayerId(hasher.finalize().into())
    }
}

impl fmt::Debug for PlayerSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PlayerSecret(<redacted>)")
    }
}

/// Public identity of a player, derived from its [`PlayerSecret`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerId(pub [u8; 32]);

impl PlayerId {
    /// Short form used in logs and error messages.
    pub fn short(&self) -> ShortId<'_> {
        ShortId(&self.0)
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PlayerId({})", self.short())
    }
}

/// First four bytes of an identifier rendered as hex.
pub struct ShortId<'a>(&'a [u8; 32]);

impl fmt::Display for ShortId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0[..4] {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// One of the two seats in a match. P1 commits first and reveals last.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::AsRefStr)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Side {
    #[strum(serialize = "P1")]
    P1,
    #[strum(serialize = "P2")]
    P2,
}

impl Side {
    pub const BOTH: [Side; 2] = [Side::P1, Side::P2];

    #[inline]
    pub const fn opponent(self) -> Side {
        match self {
            Side::P1 => Side::P2,
            Side::P2 => Side::P1,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Side::P1 => 0,
            Side::P2 => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_id_is_stable_and_secret_dependent() {
        let a = PlayerSecret::from_bytes([1; 32]);
        let b = PlayerSecret::from_bytes([2; 32]);

        assert_eq!(a.player_id(), a.clone().player_id());
        assert_ne!(a.player_id(), b.player_id());
        assert_ne!(&a.player_id().0, a.as_bytes());
    }

    #[test]
    fn secret_debug_is_redacted() {
        let secret = PlayerSecret::from_bytes([7; 32]);
        assert_eq!(format!("{secret:?}"), "PlayerSecret(<redacted>)");
    }

    #[test]
    fn display_renders_full_hex() {
        let id = PlayerId([0xab; 32]);
        assert_eq!(id.to_string(), hex::encode([0xab; 32]));
        assert_eq!(id.short().to_string(), "abababab");
    }
}

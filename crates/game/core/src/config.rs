/// Match configuration constants.
///
/// Hero count and health pool are fixed by the rules; balance tables for
/// equipment and stances live next to the code that consumes them
/// ([`crate::stats`] and [`crate::combat`]).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GameConfig {
    /// Upper bound on rounds a single match may run before tooling gives up on it.
    /// Not enforced by the engine; used by automated players and tests.
    pub round_limit: u32,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// Heroes fielded by each side once selection completes.
    pub const HEROES_PER_SIDE: usize = 3;
    /// Accumulated damage at which a hero is dead.
    pub const MAX_HP: u32 = 300;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_ROUND_LIMIT: u32 = 500;

    pub fn new() -> Self {
        Self {
            round_limit: Self::DEFAULT_ROUND_LIMIT,
        }
    }

    pub fn with_round_limit(round_limit: u32) -> Self {
        Self { round_limit }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! Combat resolution system.
//!
//! Pure functions for resolving a single exchange between two heroes. All
//! combat logic is deterministic and side-effect free; round-level
//! bookkeeping lives in [`crate::engine::resolver`].
//!
//! # Core Functions
//!
//! - `calculate_damage`: Stats and stances to damage dealt
//! - `offense` / `exposure`: Stance multipliers on damage dealt and received

pub mod damage;
pub mod stance;

pub use damage::{calculate_damage, exposure, offense};
pub use stance::Stance;

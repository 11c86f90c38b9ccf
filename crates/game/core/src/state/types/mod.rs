pub mod common;
pub mod equipment;
pub mod moves;
pub mod phase;
pub mod private;

pub use common::{PlayerId, PlayerSecret, ShortId, Side};
pub use equipment::{ArmorPiece, ArmorSlot, Hero, HeroBuilder, Item};
pub use moves::{RoundCommand, RoundMoves};
pub use phase::MatchPhase;
pub use private::PlayerPrivateState;

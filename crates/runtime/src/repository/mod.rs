//! Repository layer for player-owned private state.
//!
//! Shared match state lives with the authority and is never persisted here.
//! Repositories only hold what a single player must keep to itself between
//! calls: its secret and the cleartext of a move awaiting disclosure.

mod error;
mod file;
mod memory;
mod traits;

pub use error::RepositoryError;
pub use file::FilePrivateStore;
pub use memory::InMemoryPrivateStore;
pub use traits::{PrivateStateRepository, private_key};

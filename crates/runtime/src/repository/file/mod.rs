//! File-based repository implementations for persistent storage.

mod state;

pub use state::FilePrivateStore;

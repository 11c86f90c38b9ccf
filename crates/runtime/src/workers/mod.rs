//! Worker tasks that back the runtime orchestration.
//!
//! The match authority is the single writer of shared state; practice
//! opponents run as their own tasks (see [`crate::providers`]).

mod authority;

pub use authority::{AuthorityWorker, Command, Receipt, StateStream};

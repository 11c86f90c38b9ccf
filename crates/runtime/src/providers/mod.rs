//! Move provider implementations and the actors that drive them.

pub mod practice;

pub use practice::{PracticeOpponent, PracticeProvider};

//! Deterministic match rules and data types shared across clients.
//!
//! `arena-core` defines the canonical rules of a 3-vs-3 commit-reveal arena
//! (selection, commitments, round resolution) and exposes pure APIs that can
//! be reused by the runtime authority, player sessions and offline tools.
//! All state mutation flows through [`engine::GameEngine`]; nothing in this
//! crate performs I/O.
pub mod action;
pub mod combat;
pub mod commit;
pub mod config;
pub mod engine;
pub mod error;
pub mod state;
pub mod stats;
pub mod view;

pub use action::{
    Action, ActionKind, ActionTransition, DiscloseMove, ProtocolError, PublishCommitment,
    SelectFirstHero, SelectFirstTwoHeroes, SelectLastHero, SelectLastTwoHeroes,
    SubmitCleartextMove,
};
pub use combat::{Stance, calculate_damage};
pub use commit::{Blinding, Commitment, Nonce, ReconcileError, recover};
pub use config::GameConfig;
pub use engine::{
    ExecuteError, ExecutionOutcome, GameEngine, Hit, RoundOutcome, RoundReport, TransitionPhase,
    TransitionPhaseError,
};
pub use error::{ErrorContext, ErrorSeverity, GameError};
pub use state::{
    ArmorPiece, ArmorSlot, Hero, HeroBuilder, Item, MatchPhase, PlayerId, PlayerPrivateState,
    PlayerSecret, RoundCommand, RoundMoves, SharedMatchState, Side, SideState,
};
pub use stats::{CombatStats, stats};
pub use view::{HeroView, NextCall, Outcome, PlayerView, Seat, project};

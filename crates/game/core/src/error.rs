//! Common error infrastructure for arena-core.
//!
//! This module provides shared types and traits used across all error types in arena-core.
//! Domain-specific errors (e.g., `ProtocolError`, `ReconcileError`) are defined in their
//! respective modules alongside the operations they validate.
//!
//! # Design Principles
//!
//! - **Type Safety**: Each failure domain has its own error type with specific variants
//! - **Rich Context**: Errors carry the expected and observed phase for desync debugging
//! - **Severity Classification**: Errors are categorized for recovery strategies

use crate::state::MatchPhase;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// Errors are classified by their recoverability and expected handling:
/// - **Recoverable**: Temporary conditions that may succeed on retry
/// - **Validation**: Invalid input that should be rejected without retry
/// - **Internal**: Unexpected state inconsistencies that require investigation
/// - **Fatal**: Unrecoverable errors indicating corrupted or tampered state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative call.
    ///
    /// Examples: write against an outdated state version
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: wrong phase, double selection, target out of range
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: presence invariant broken after a transition
    /// These indicate bugs and should be investigated.
    Internal,

    /// Fatal error - match state corrupted or tampered, cannot continue.
    ///
    /// Examples: reveal that does not match its commitment, reconciliation
    /// finding zero or several candidates
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }
}

/// Contextual information attached to errors for debugging and diagnostics.
///
/// Captured at the point of error creation from the state the operation ran
/// against, so a rejection can be correlated with a specific log position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    /// Phase observed when the error was raised.
    pub phase: MatchPhase,

    /// Round counter at the time of error.
    pub round: u32,

    /// Accepted-action count at the time of error.
    pub version: u64,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(phase: MatchPhase, round: u32, version: u64) -> Self {
        Self {
            phase,
            round,
            version,
        }
    }
}

/// Common trait for all arena-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Default implementation uses the error type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

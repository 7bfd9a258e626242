//! Common error infrastructure for combat-core.
//!
//! Domain-specific errors (`ActionError`, `TurnError`, `InitError`, ...) are
//! defined next to the code they validate. This module provides the shared
//! severity classification and the trait every error type implements.

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller may simply try a different action
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: unexpected state inconsistencies that require investigation
/// - **Fatal**: unrecoverable errors indicating corrupted encounter state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - can retry with same or alternative action.
    ///
    /// Examples: ability on cooldown, not this combatant's turn
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: item not in inventory, unknown ability
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: participant missing from the world
    Internal,

    /// Fatal error - encounter state corrupted, cannot continue.
    ///
    /// Examples: turn pointer outside the initiative order
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

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all combat-core errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    ///
    /// Useful for categorization, API payloads and testing.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

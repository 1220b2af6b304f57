//! Error types for lock operations.
//!
//! Only `InvalidMinutes` is ever surfaced to a user. Register failures are
//! contained at the machine boundary (fail-open to unlocked) and logged, and
//! inconsistent stored values are healed in place rather than reported.

use focuslock_store::StoreError;

/// All errors that can occur in lock operations.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    /// The minute input did not parse as a whole number of 1 or more.
    #[error("enter a whole number of minutes (1 or more), got {input:?}")]
    InvalidMinutes { input: String },

    /// A register read or write failed. Contained before it reaches a user.
    #[error("deadline register access failed: {0}")]
    Store(#[from] StoreError),
}

/// Convenience type alias for Results using LockError.
pub type Result<T> = std::result::Result<T, LockError>;

//! Error types for register backends.
//!
//! The lock core contains every one of these at its boundary (fail-open): a
//! failed read is treated as "unlocked" and a failed write is logged, so no
//! store error ever reaches a user.

use std::io;

/// All errors a register backend can produce.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("register I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("register format error: {0}")]
    Format(#[from] serde_json::Error),

    #[error("register unavailable: {0}")]
    Unavailable(String),
}

//! # focuslock-store
//!
//! The shared deadline register: one numeric cell per key, shared by every
//! open focus-lock view. A value of `0` means "unlocked"; any other value is
//! an absolute deadline in milliseconds since the Unix epoch.
//!
//! The lock core only sees the [`DeadlineStore`] trait. Two backends ship
//! here:
//!
//! - [`MemoryStore`]: views inside one process, with synchronous change
//!   notification.
//! - [`FileStore`]: views in separate processes sharing a file, with no
//!   notification channel at all. Observers must poll.
//!
//! Notification is best-effort on every backend. Correctness belongs to
//! whoever polls.

pub mod error;
pub mod file;
pub mod memory;
pub mod register;

pub use error::StoreError;
pub use file::FileStore;
pub use memory::MemoryStore;
pub use register::{ChangeListener, DeadlineStore, Subscription};

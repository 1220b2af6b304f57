//! # focuslock-core
//!
//! Core library for focuslock: the lock state machine, the cross-view
//! reconciliation protocol, and the renderer command/intent contract.
//!
//! A user commits to N minutes away from a site; every open view of that
//! site renders a blocking surface until the shared deadline passes. Views
//! coordinate through a single register cell (see `focuslock-store`) and
//! nothing else.
//!
//! ## Design Principles
//!
//! - **The register is the truth**: lock state is derived from the shared
//!   deadline on every evaluation, never cached as authority.
//! - **Polling is the protocol**: change notifications are a best-effort
//!   accelerant; every view runs a bounded-period reconciliation loop from
//!   open to close.
//! - **Fail open**: a broken register reads as "unlocked". The system never
//!   fails into a lock the user cannot leave.
//! - **Reactive rendering**: displays are told what to show and only emit
//!   user intents back.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use focuslock_core::{SystemClock, UserIntent, View, ViewOptions};
//! use focuslock_store::MemoryStore;
//!
//! let store = Arc::new(MemoryStore::new());
//! let view = View::open(store, Arc::new(SystemClock), renderer, ViewOptions::default());
//! view.submit(UserIntent::StartLock { minutes: "25".into() })?;
//! ```

// Public modules
pub mod clock;
pub mod error;
pub mod logging;
pub mod machine;
pub mod options;
pub mod reconcile;
pub mod render;
pub mod view;

// Re-export commonly used items at crate root
pub use clock::{format_countdown, remaining_ms, Clock, SystemClock};
pub use error::{LockError, Result};
pub use machine::{evaluate, LockMachine, LockState, DEADLINE_KEY};
pub use options::ViewOptions;
pub use reconcile::Reconciler;
pub use render::{
    BlockingSurface, RenderCommand, Renderer, StatusIndicator, UserIntent, EARLY_UNLOCK_PROMPT,
};
pub use view::View;

//! Lock state derivation and transitions.
//!
//! The machine owns no state. Every question about "locked or not" goes back
//! to the shared register and through [`evaluate`], so any number of views
//! derive identical answers from identical stored values. The only thing a
//! view keeps is the last state it rendered, and that is display bookkeeping,
//! not authority.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use focuslock_store::DeadlineStore;

use crate::clock::{remaining_ms, Clock};
use crate::error::{LockError, Result};

/// Register key the global lock deadline lives under. Versioned so a future
/// format change can migrate by key.
pub const DEADLINE_KEY: &str = "focus_lock_until_v1";

const MS_PER_MINUTE: u64 = 60_000;

/// Derived lock state. Never persisted, never cached past one evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LockState {
    Unlocked,
    Locked { remaining_ms: u64 },
}

impl LockState {
    pub fn is_locked(&self) -> bool {
        matches!(self, LockState::Locked { .. })
    }
}

/// Pure derivation shared by every view: locked exactly while the deadline
/// lies in the future. A deadline of 0 is the canonical "unlocked".
pub fn evaluate(deadline_at: u64, now: u64) -> LockState {
    let remaining = remaining_ms(deadline_at, now);
    if remaining > 0 {
        LockState::Locked {
            remaining_ms: remaining,
        }
    } else {
        LockState::Unlocked
    }
}

/// One view's handle on the shared lock.
pub struct LockMachine {
    store: Arc<dyn DeadlineStore>,
    clock: Arc<dyn Clock>,
    key: String,
}

impl LockMachine {
    pub fn new(store: Arc<dyn DeadlineStore>, clock: Arc<dyn Clock>) -> Self {
        LockMachine::with_key(store, clock, DEADLINE_KEY)
    }

    pub fn with_key(
        store: Arc<dyn DeadlineStore>,
        clock: Arc<dyn Clock>,
        key: impl Into<String>,
    ) -> Self {
        LockMachine {
            store,
            clock,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Raw stored deadline, failing open to 0 ("unlocked") when the register
    /// cannot be read. A broken register must never hold the user captive.
    pub fn read_deadline(&self) -> u64 {
        match self.store.get(&self.key, 0) {
            Ok(value) => value,
            Err(err) => {
                warn!(error = %err, "deadline read failed, treating as unlocked");
                0
            }
        }
    }

    /// Reads the register, derives the current state, and normalizes stale
    /// values.
    ///
    /// Whenever the derived state is `Unlocked` but the register still holds
    /// a nonzero value (the deadline passed without a reset, or a value
    /// nobody recognizes), 0 is written back so every view converges on the
    /// canonical representation and a late change notification elsewhere
    /// cannot misreport staleness. The write is idempotent.
    pub fn resolve(&self) -> LockState {
        let raw = self.read_deadline();
        let state = evaluate(raw, self.clock.now_ms());
        if !state.is_locked() && raw != 0 {
            info!(stored = raw, "normalizing stale deadline to unlocked");
            if let Err(err) = self.write_deadline(0) {
                warn!(error = %err, "failed to clear stale deadline");
            }
        }
        state
    }

    /// Starts a lock for a whole number of minutes, given the raw input text.
    ///
    /// Rejects anything that is not an integer of 1 or more without touching
    /// the register. On success the new state is returned immediately; the
    /// initiating view never waits for its own change notification.
    pub fn request_start(&self, minutes: &str) -> Result<LockState> {
        let minutes = parse_minutes(minutes)?;
        let now = self.clock.now_ms();
        let deadline_at = now.saturating_add(minutes.saturating_mul(MS_PER_MINUTE));
        match self.write_deadline(deadline_at) {
            Ok(()) => Ok(evaluate(deadline_at, now)),
            Err(err) => {
                // Fail open: report what the register actually holds rather
                // than a lock it never accepted.
                warn!(error = %err, deadline_at, "deadline write failed");
                Ok(self.resolve())
            }
        }
    }

    /// Cancels the active lock, if the user confirmed the prompt.
    ///
    /// Unconfirmed requests change nothing. Confirmed requests write 0 and
    /// report `Unlocked` at once, without waiting for a notification or the
    /// next reconciliation tick; other views catch up on their own schedule.
    pub fn request_early_unlock(&self, confirmed: bool) -> LockState {
        if !confirmed {
            return self.resolve();
        }
        if let Err(err) = self.write_deadline(0) {
            warn!(error = %err, "early unlock write failed");
        }
        LockState::Unlocked
    }

    fn write_deadline(&self, value: u64) -> Result<()> {
        self.store.set(&self.key, value)?;
        Ok(())
    }
}

fn parse_minutes(input: &str) -> Result<u64> {
    let minutes: u64 = input.trim().parse().map_err(|_| LockError::InvalidMinutes {
        input: input.to_string(),
    })?;
    if minutes == 0 {
        return Err(LockError::InvalidMinutes {
            input: input.to_string(),
        });
    }
    Ok(minutes)
}

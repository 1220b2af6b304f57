//! Render commands in, user intents out.
//!
//! A renderer is strictly reactive: on every reconciliation tick it is told
//! what to show, and the only things it ever sends back are user intents.
//! The command carries the exact widget strings, not just the state, so every
//! view of the same register renders identical text.

use serde::{Deserialize, Serialize};

use crate::clock::format_countdown;
use crate::machine::LockState;

/// Confirmation question a host must put to the user before submitting
/// [`UserIntent::EarlyUnlock`] with `confirmed: true`.
pub const EARLY_UNLOCK_PROMPT: &str = "Unlock early? This cancels the active lock.";

const STATUS_READY: &str = "Ready";

/// Two-state widget indicator next to the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusIndicator {
    Ready,
    Locked,
}

/// Content of the full-viewport blocking surface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockingSurface {
    /// Headline, e.g. `"04:32 remaining"`.
    pub message: String,
    /// Large countdown, `"MM:SS"`.
    pub countdown: String,
}

/// One complete render instruction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderCommand {
    pub state: LockState,
    /// Widget status line: `"Ready"`, or `"Locked — 04:32"`.
    pub status_line: String,
    pub indicator: StatusIndicator,
    /// Whether the minute input and start button accept interaction.
    pub controls_enabled: bool,
    /// Present exactly while locked.
    pub surface: Option<BlockingSurface>,
}

impl RenderCommand {
    /// Derives the full instruction from a state alone.
    pub fn for_state(state: LockState) -> Self {
        match state {
            LockState::Unlocked => RenderCommand {
                state,
                status_line: STATUS_READY.to_string(),
                indicator: StatusIndicator::Ready,
                controls_enabled: true,
                surface: None,
            },
            LockState::Locked { remaining_ms } => {
                let countdown = format_countdown(remaining_ms);
                RenderCommand {
                    state,
                    status_line: format!("Locked — {}", countdown),
                    indicator: StatusIndicator::Locked,
                    controls_enabled: false,
                    surface: Some(BlockingSurface {
                        message: format!("{} remaining", countdown),
                        countdown,
                    }),
                }
            }
        }
    }
}

/// User intents a renderer emits back to its view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserIntent {
    /// Raw minute-field content; validation happens in the machine.
    StartLock { minutes: String },
    /// `confirmed` is the user's answer to [`EARLY_UNLOCK_PROMPT`].
    EarlyUnlock { confirmed: bool },
}

/// Display half of a view.
pub trait Renderer: Send + Sync {
    fn render(&self, command: &RenderCommand);
}

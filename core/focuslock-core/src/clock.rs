//! Time source and countdown formatting.

use chrono::Utc;

/// Wall-clock seam. Production code uses [`SystemClock`]; tests substitute a
/// manual clock so state transitions are deterministic.
pub trait Clock: Send + Sync {
    /// Current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// System wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        Utc::now().timestamp_millis().max(0) as u64
    }
}

/// Milliseconds left until `deadline_at`. Never negative.
pub fn remaining_ms(deadline_at: u64, now: u64) -> u64 {
    deadline_at.saturating_sub(now)
}

/// Formats a remaining duration as `MM:SS`.
///
/// Rounds up to the next whole second so the countdown never understates the
/// time left. The minute field grows past 59 for long locks (`"125:07"`);
/// zero and expired both format as `"00:00"`.
pub fn format_countdown(ms: u64) -> String {
    if ms == 0 {
        return "00:00".to_string();
    }
    let total_seconds = ms.div_ceil(1000);
    let minutes = total_seconds / 60;
    let seconds = total_seconds % 60;
    format!("{:02}:{:02}", minutes, seconds)
}

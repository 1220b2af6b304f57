//! Per-view settings.
//!
//! There is no config file of our own; embedders construct these directly or
//! deserialize them from whatever settings mechanism they already have.

use serde::{Deserialize, Serialize};

use crate::machine::DEADLINE_KEY;

fn default_poll_interval_ms() -> u64 {
    1_000
}

fn default_deadline_key() -> String {
    DEADLINE_KEY.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewOptions {
    /// Reconciliation period in milliseconds.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Register key the lock deadline lives under.
    #[serde(default = "default_deadline_key")]
    pub deadline_key: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        ViewOptions {
            poll_interval_ms: default_poll_interval_ms(),
            deadline_key: default_deadline_key(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ViewOptions::default();
        assert_eq!(options.poll_interval_ms, 1_000);
        assert_eq!(options.deadline_key, DEADLINE_KEY);
    }

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let options: ViewOptions = serde_json::from_str(r#"{"poll_interval_ms": 250}"#).unwrap();
        assert_eq!(options.poll_interval_ms, 250);
        assert_eq!(options.deadline_key, DEADLINE_KEY);
    }

    #[test]
    fn test_empty_settings_equal_defaults() {
        let options: ViewOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(options, ViewOptions::default());
    }
}

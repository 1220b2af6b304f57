//! Logging bootstrap for embedders.

use tracing_subscriber::EnvFilter;

/// Installs a fmt subscriber with env-based filtering.
///
/// `FOCUSLOCK_DEBUG_LOG` forces the `debug` level; otherwise the standard
/// `RUST_LOG` filter applies, falling back to `info`. Quietly a no-op when a
/// global subscriber is already installed, so embedders that configure their
/// own logging are left alone.
pub fn init_logging() {
    let filter = if std::env::var("FOCUSLOCK_DEBUG_LOG").is_ok() {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

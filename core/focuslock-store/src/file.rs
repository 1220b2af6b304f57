//! File-backed register for views that live in separate processes.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "deadlines": {
//!     "focus_lock_until_v1": 1700000000000
//!   }
//! }
//! ```
//!
//! # Defensive Design
//!
//! Any other process may overwrite or truncate this file between two of our
//! reads, so loading handles:
//! - Missing files (empty register)
//! - Empty files (empty register, log warning)
//! - Corrupt JSON (empty register, log warning)
//! - Version mismatches (empty register, log warning)
//!
//! An empty register reads as the default for every key, and the lock core's
//! default is 0 ("unlocked"), so the defensive fallback is also the
//! semantically safe one.
//!
//! # Atomic Writes
//!
//! Uses temp file + persist so readers never observe a partial write.
//!
//! # Notification
//!
//! None. `subscribe` returns an inert guard; observers of this backend only
//! ever learn about changes by polling.

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use fs_err as fs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::StoreError;
use crate::register::{ChangeListener, DeadlineStore, Subscription};

const STORE_VERSION: u32 = 1;

/// The on-disk JSON envelope.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version. We only load files with version == 1.
    version: u32,
    /// Key → deadline map.
    deadlines: HashMap<String, u64>,
}

impl Default for StoreFile {
    fn default() -> Self {
        StoreFile {
            version: STORE_VERSION,
            deadlines: HashMap::new(),
        }
    }
}

/// Register persisted as a single JSON file.
///
/// Every `get` re-reads the file and every `set` rewrites it; nothing is
/// cached, so two `FileStore`s pointed at the same path behave as one
/// register.
pub struct FileStore {
    path: PathBuf,
    // Serializes read-modify-write within this process. Cross-process writers
    // race whole-file, which is still last-write-wins.
    write_guard: Mutex<()>,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore {
            path: path.into(),
            write_guard: Mutex::new(()),
        }
    }

    /// Conventional location under the platform data directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::data_dir().map(|dir| dir.join("focuslock").join("deadlines.json"))
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn load(&self) -> Result<StoreFile, StoreError> {
        if !self.path.exists() {
            return Ok(StoreFile::default());
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            warn!(path = %self.path.display(), "empty register file, treating as unset");
            return Ok(StoreFile::default());
        }

        match serde_json::from_str::<StoreFile>(&content) {
            Ok(envelope) if envelope.version == STORE_VERSION => Ok(envelope),
            Ok(envelope) => {
                warn!(
                    path = %self.path.display(),
                    version = envelope.version,
                    "unsupported register file version, treating as unset"
                );
                Ok(StoreFile::default())
            }
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    error = %err,
                    "unparsable register file, treating as unset"
                );
                Ok(StoreFile::default())
            }
        }
    }

    fn save(&self, envelope: &StoreFile) -> Result<(), StoreError> {
        let content = serde_json::to_string_pretty(envelope)?;

        let parent = self.path.parent().ok_or_else(|| {
            StoreError::Unavailable(format!(
                "register path {} has no parent directory",
                self.path.display()
            ))
        })?;
        fs::create_dir_all(parent)?;

        let mut temp_file = NamedTempFile::new_in(parent)?;
        temp_file.write_all(content.as_bytes())?;
        temp_file.flush()?;
        temp_file
            .persist(&self.path)
            .map_err(|err| StoreError::Io(err.error))?;

        Ok(())
    }
}

impl DeadlineStore for FileStore {
    fn get(&self, key: &str, default: u64) -> Result<u64, StoreError> {
        Ok(self.load()?.deadlines.get(key).copied().unwrap_or(default))
    }

    fn set(&self, key: &str, value: u64) -> Result<(), StoreError> {
        let _guard = self
            .write_guard
            .lock()
            .map_err(|_| StoreError::Unavailable("register write guard poisoned".to_string()))?;
        let mut envelope = self.load()?;
        envelope.deadlines.insert(key.to_string(), value);
        self.save(&envelope)
    }

    fn subscribe(&self, _key: &str, _listener: ChangeListener) -> Subscription {
        Subscription::inert()
    }
}

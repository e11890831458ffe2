//! # File Store
//!
//! TOML-backed [`StateStore`] under the platform config directory.
//!
//! ## Load/Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       FileStore Operation                               │
//! │                                                                         │
//! │  read:   registration.toml ──► toml::from_str ──► RecordV1 accessor    │
//! │          (missing file ⇒ default document ⇒ "not registered")          │
//! │                                                                         │
//! │  write:  load document ──► mutate [v1] ──► toml::to_string_pretty      │
//! │          ──► create_dir_all(parent) ──► fs::write                      │
//! │                                                                         │
//! │  Default location:                                                      │
//! │    ~/.config/nimbus-push/registration.toml            (Linux)          │
//! │    ~/Library/Application Support/io.nimbus.push/… (macOS)              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Each operation is a full read-modify-write of the small document. The
//! coordinator serializes operations against each other, so the store only
//! has to make a single call atomic from the caller's perspective.

use std::path::{Path, PathBuf};

use tracing::{debug, info};
use uuid::Uuid;

use nimbus_core::{AcknowledgementLog, RegistrationState, TagSet};

use crate::error::{StoreError, StoreResult};
use crate::record::{RecordV1, StateDocument};
use crate::StateStore;

/// File name of the persisted record inside the config directory.
const STORE_FILE_NAME: &str = "registration.toml";

// =============================================================================
// FileStore
// =============================================================================

/// Registration record persisted as a TOML document.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    /// Creates a store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileStore { path: path.into() }
    }

    /// Creates a store at the platform default location.
    pub fn at_default_location() -> StoreResult<Self> {
        let path = Self::default_path().ok_or(StoreError::NoStorePath)?;
        Ok(FileStore::new(path))
    }

    /// Returns the path this store reads and writes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the default store file path, if the platform exposes a
    /// config directory.
    fn default_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "nimbus", "nimbus-push")
            .map(|dirs| dirs.config_dir().join(STORE_FILE_NAME))
    }

    fn load(&self) -> StoreResult<StateDocument> {
        if !self.path.exists() {
            debug!(path = ?self.path, "Store file not found, treating as unregistered");
            return Ok(StateDocument::default());
        }
        let contents = std::fs::read_to_string(&self.path)?;
        Ok(toml::from_str(&contents)?)
    }

    fn save(&self, document: &StateDocument) -> StoreResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(document)?;
        std::fs::write(&self.path, contents)?;
        debug!(path = ?self.path, "Store document saved");
        Ok(())
    }

    fn update(&self, f: impl FnOnce(&mut RecordV1) -> StoreResult<()>) -> StoreResult<()> {
        let mut document = self.load()?;
        f(&mut document.v1)?;
        self.save(&document)
    }
}

impl StateStore for FileStore {
    fn get(&self) -> StoreResult<Option<RegistrationState>> {
        Ok(self.load()?.v1.registration())
    }

    fn put(&self, state: &RegistrationState) -> StoreResult<()> {
        info!(client_id = %state.client_id, "Saving registration record");
        self.update(|record| {
            record.set_registration(state);
            Ok(())
        })
    }

    fn clear(&self) -> StoreResult<()> {
        info!("Clearing registration record");
        self.save(&StateDocument::default())
    }

    fn tags(&self) -> StoreResult<TagSet> {
        Ok(self.load()?.v1.tags())
    }

    fn set_tags(&self, tags: &TagSet) -> StoreResult<()> {
        self.update(|record| {
            record.set_tags(tags);
            Ok(())
        })
    }

    fn acknowledged(&self) -> StoreResult<AcknowledgementLog> {
        Ok(self.load()?.v1.log()?)
    }

    fn record_acknowledged(&self, id: Uuid) -> StoreResult<()> {
        self.update(|record| {
            let mut log = record.log()?;
            log.record(id);
            record.set_log(&log);
            Ok(())
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

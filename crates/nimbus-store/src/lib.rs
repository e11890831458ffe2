//! # nimbus-store: Persistence for Nimbus Push
//!
//! This crate holds the device's registration record and acknowledgement log
//! behind the [`StateStore`] contract. It is **pure storage**: whether a
//! registration call is needed, which tags survive a partial unregister and
//! when the log evicts are all decided elsewhere (nimbus-core /
//! nimbus-client); this crate only reads and writes what it is told.
//!
//! ## Persisted Layout
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │               registration.toml (schema-versioned)                      │
//! │                                                                         │
//! │  [v1]                                                                   │
//! │  client_id = "5f0c6e9a-…"                                               │
//! │  last_sent_token = "fcm-token-…"                                        │
//! │  registered_tags = "alerts,news,sports"      (canonical, comma-joined)  │
//! │  last_registration_at = "2026-08-07T09:30:00Z"                          │
//! │  acknowledged = "uuid-1,uuid-2,…"            (oldest first, max 100)    │
//! │                                                                         │
//! │  All fields live inside the [v1] table: a future [v2] format can        │
//! │  coexist with stale v1 data without key collisions.                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`record`] - The schema-versioned persisted document
//! - [`file`] - TOML file store under the platform config directory
//! - [`memory`] - In-memory store for tests and custom embedders
//! - [`error`] - Store error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod file;
pub mod memory;
pub mod record;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use record::{RecordV1, StateDocument, SCHEMA_VERSION};

use nimbus_core::{AcknowledgementLog, RegistrationState, TagSet};
use uuid::Uuid;

// =============================================================================
// StateStore Contract
// =============================================================================

/// Accessor/mutator contract for the persisted registration record.
///
/// Absence is not an error: [`StateStore::get`] returns `None` for a device
/// that never registered or fully unregistered, and the tag/log accessors
/// return empty values. Implementations must make each call atomic from the
/// caller's perspective; serializing whole operations against each other is
/// the coordinator's job, not the store's.
pub trait StateStore: Send + Sync {
    /// Returns the current registration, or `None` if not registered.
    fn get(&self) -> StoreResult<Option<RegistrationState>>;

    /// Replaces the stored registration with `state`.
    fn put(&self, state: &RegistrationState) -> StoreResult<()>;

    /// Removes all registration data, acknowledgement log included.
    fn clear(&self) -> StoreResult<()>;

    /// Returns the registered tags; empty when not registered.
    fn tags(&self) -> StoreResult<TagSet>;

    /// Replaces the tags field of the stored registration.
    ///
    /// No-op when no registration exists (there is no record to mutate).
    fn set_tags(&self, tags: &TagSet) -> StoreResult<()>;

    /// Returns the acknowledgement log, oldest entry first.
    fn acknowledged(&self) -> StoreResult<AcknowledgementLog>;

    /// Appends `id` to the acknowledgement log.
    ///
    /// No-op when already present; evicts the oldest entry when the log is
    /// at capacity.
    fn record_acknowledged(&self, id: Uuid) -> StoreResult<()>;
}

//! # Store Error Types
//!
//! Error types for persistence operations.
//!
//! "Not found" is never an error at this layer: an absent record means "not
//! registered" and surfaces as `None` / empty values through the
//! [`StateStore`](crate::StateStore) accessors.

use thiserror::Error;

/// Result type alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error type covering persistence failures.
#[derive(Debug, Error)]
pub enum StoreError {
    // =========================================================================
    // Location Errors
    // =========================================================================
    /// No platform config directory could be resolved for the file store.
    #[error("No store path available: platform config directory unknown")]
    NoStorePath,

    // =========================================================================
    // I/O Errors
    // =========================================================================
    /// Reading or writing the store file failed.
    #[error("Store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    // =========================================================================
    // Format Errors
    // =========================================================================
    /// The store file exists but is not valid TOML for the known schema.
    #[error("Failed to parse store document: {0}")]
    Parse(#[from] toml::de::Error),

    /// The record could not be serialized.
    #[error("Failed to serialize store document: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A stored field decoded to an invalid domain value.
    #[error("Corrupt store record: {0}")]
    Corrupt(#[from] nimbus_core::CoreError),
}

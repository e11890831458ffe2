//! # Error Types
//!
//! Domain-specific error types for nimbus-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  nimbus-core errors (this file)                                        │
//! │  └── CoreError        - Tag and identifier validation failures         │
//! │                                                                         │
//! │  nimbus-store errors (separate crate)                                  │
//! │  └── StoreError       - Persistence failures                           │
//! │                                                                         │
//! │  nimbus-client errors (separate crate)                                 │
//! │  └── PushError        - What embedders see (full taxonomy)             │
//! │                                                                         │
//! │  Flow: CoreError → StoreError → PushError → Embedder                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Domain validation errors.
///
/// These errors represent values that can never enter the domain model:
/// tags that would corrupt the delimited persisted form and identifiers
/// that are not UUIDs.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A tag contains the list delimiter.
    ///
    /// ## When This Occurs
    /// - An embedder passes a tag such as `"news,sports"` to `register`
    ///
    /// Rejecting the delimiter at construction keeps the encode/decode
    /// pair a total round trip.
    #[error("Tag '{tag}' contains the reserved delimiter '{delimiter}'")]
    InvalidTag { tag: String, delimiter: char },

    /// A persisted message id could not be parsed as a UUID.
    ///
    /// ## When This Occurs
    /// - The stored acknowledgement log was edited or corrupted on disk
    #[error("Invalid message id in acknowledgement log: '{0}'")]
    InvalidMessageId(String),
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

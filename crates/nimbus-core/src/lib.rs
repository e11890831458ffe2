//! # nimbus-core: Pure Domain Logic for Nimbus Push
//!
//! This crate is the **heart** of the Nimbus push-registration client. It
//! contains every decision that does not require I/O: what a canonical tag
//! set is, when an acknowledgement log must evict, and what the registration
//! record looks like.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Nimbus Push Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Embedding Application                           │   │
//! │  │     register(tags) ──► mark_message_opened(id) ──► unregister  │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          nimbus-client (coordinator, tracker, HTTP)             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ nimbus-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   tags    │  │    ack    │  │   state   │  │   error   │  │   │
//! │  │   │  TagSet   │  │  AckLog   │  │ RegState  │  │ CoreError │  │   │
//! │  │   │  codec    │  │  FIFO cap │  │ outcomes  │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • NO PERSISTENCE • PURE FUNCTIONS        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                nimbus-store (persistence layer)                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`tags`] - Canonical tag sets and their delimited codec
//! - [`ack`] - Bounded, insertion-ordered acknowledgement log
//! - [`state`] - Registration state record and operation outcomes
//! - [`error`] - Domain error types

// =============================================================================
// Module Declarations
// =============================================================================

pub mod ack;
pub mod error;
pub mod state;
pub mod tags;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use nimbus_core::TagSet` instead of
// `use nimbus_core::tags::TagSet`

pub use ack::AcknowledgementLog;
pub use error::{CoreError, CoreResult};
pub use state::{
    AcknowledgementOutcome, RegistrationOutcome, RegistrationState, UnregistrationOutcome,
};
pub use tags::TagSet;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum number of acknowledged message ids kept in the local log.
///
/// When a 101st distinct id is recorded the oldest entry is evicted (FIFO).
/// Eviction only reclaims local memory; an aged-out id can trigger one
/// duplicate remote acknowledgement, which the backend tolerates.
pub const MAX_ACKNOWLEDGED_MESSAGES: usize = 100;

/// Delimiter used by the persisted form of tag sets and the
/// acknowledgement log.
pub const LIST_DELIMITER: char = ',';

//! # nimbus-client: Registration Engine for Nimbus Push
//!
//! This crate keeps one device's push registration synchronized with the
//! backend and deduplicates message-opened acknowledgements. It decides
//! whether a network call is needed at all, performs exactly one remote
//! call per logical operation, and commits local state only after the
//! backend confirms.
//!
//! ## Architecture Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Push Client Architecture                          │
//! │                                                                         │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │                      PushClient (Facade)                         │  │
//! │  │                                                                  │  │
//! │  │  Explicit object, constructed once with validated config         │  │
//! │  │  Owns the platform-availability precondition                     │  │
//! │  └───────────────┬─────────────────────────────┬────────────────────┘  │
//! │                  ▼                             ▼                        │
//! │  ┌────────────────────────────┐  ┌──────────────────────────────────┐  │
//! │  │  RegistrationCoordinator   │  │  AcknowledgementTracker          │  │
//! │  │                            │  │                                  │  │
//! │  │  skip decision (token+tags │  │  idempotent mark-opened with a   │  │
//! │  │  vs stored record), tag    │  │  bounded FIFO log (capacity 100) │  │
//! │  │  diff on partial unregister│  │                                  │  │
//! │  └──────┬──────────────┬──────┘  └──────┬─────────────────┬─────────┘  │
//! │         │              │                │                 │            │
//! │         ▼              ▼                ▼                 ▼            │
//! │  ┌─────────────┐  ┌─────────────────────────┐  ┌───────────────────┐  │
//! │  │TokenProvider│  │ BackendClient (trait)   │  │ StateStore        │  │
//! │  │ (embedder)  │  │  └─ HttpBackendClient   │  │ (nimbus-store)    │  │
//! │  └─────────────┘  │     form POST, 201/200  │  └───────────────────┘  │
//! │                   └─────────────────────────┘                          │
//! │                                                                         │
//! │  One tokio Mutex serializes register / unregister / acknowledge, so    │
//! │  concurrent calls from the embedder cannot race on the stored record.  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`client`] - The `PushClient` facade
//! - [`config`] - Client configuration and validation
//! - [`coordinator`] - Register / refresh / unregister policy
//! - [`acknowledgements`] - Idempotent message-opened tracking
//! - [`backend`] - The narrow backend contract
//! - [`http`] - reqwest implementation of the wire protocol
//! - [`token`] - Token provider contract and platform availability
//! - [`error`] - The client error taxonomy
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use nimbus_client::{ClientConfig, PushClient};
//! use nimbus_core::TagSet;
//! use nimbus_store::FileStore;
//!
//! let config = ClientConfig::new("sender-id", "app-id", "client-secret");
//! let store = Arc::new(FileStore::at_default_location()?);
//! let client = PushClient::with_http_backend(config, store, token_provider)?;
//!
//! let tags = TagSet::from_tags(["news", "sports"])?;
//! match client.register(Some(&tags)).await? {
//!     outcome => println!("registration: {outcome}"),
//! }
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod acknowledgements;
pub mod backend;
pub mod client;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod http;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use acknowledgements::AcknowledgementTracker;
pub use backend::{BackendClient, RegistrationReply};
pub use client::PushClient;
pub use config::ClientConfig;
pub use coordinator::RegistrationCoordinator;
pub use error::{PushError, PushResult};
pub use http::HttpBackendClient;
pub use token::{PlatformAvailability, TokenProvider};

// Domain types embedders need at the call sites
pub use nimbus_core::{
    AcknowledgementOutcome, RegistrationOutcome, TagSet, UnregistrationOutcome,
};
pub use nimbus_store::{FileStore, MemoryStore, StateStore};

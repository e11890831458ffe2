//! # Backend Client Contract
//!
//! The narrow interface the coordinator and tracker depend on. The wire
//! details (form encoding, status mapping, response body) live entirely
//! behind it in [`HttpBackendClient`](crate::http::HttpBackendClient);
//! tests substitute a recording implementation.
//!
//! The `tags` parameter is an `Option` on purpose: "no tags argument
//! supplied" and "explicitly empty set" are canonicalized identically for
//! the local skip decision, but the distinction is passed through to the
//! implementation unchanged in case the wire protocol treats them
//! differently.

use async_trait::async_trait;
use uuid::Uuid;

use nimbus_core::TagSet;

use crate::error::PushResult;

// =============================================================================
// Replies
// =============================================================================

/// Result of a successful register call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationReply {
    /// Backend-assigned client identifier.
    pub client_id: Uuid,

    /// True when the backend created a new registration, false when it
    /// updated an existing one. Drives the Registered/Refreshed outcome.
    pub created: bool,
}

// =============================================================================
// Backend Client Contract
// =============================================================================

/// The three remote operations of the registration protocol.
///
/// Implementations perform exactly one remote call per invocation: no
/// retries, no backoff, no caching. Timeouts and cancellation, where
/// needed, are the implementation's (or its HTTP stack's) concern.
#[async_trait]
pub trait BackendClient: Send + Sync {
    /// Registers `token` with the backend, replacing any previous tag set
    /// with `tags`.
    async fn register(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<RegistrationReply>;

    /// Removes `tags` from the registration, or the whole registration
    /// when `tags` is `None`.
    async fn unregister(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<()>;

    /// Reports that the message with `message_id` was opened on this
    /// device.
    async fn mark_message_opened(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        message_id: Uuid,
    ) -> PushResult<()>;
}

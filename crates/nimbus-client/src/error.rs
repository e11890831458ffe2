//! # Client Error Types
//!
//! The error taxonomy embedders see.
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Push Error Categories                             │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Precondition   │  │   Transport     │  │     Protocol            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  NotRegistered  │  │  Connection     │  │  MalformedResponse      │ │
//! │  │  InvalidConfig  │  │  UnexpectedSta… │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────────────────────────────────┐  │
//! │  │    Platform     │  │     Wrapped lower layers                    │  │
//! │  │                 │  │                                             │  │
//! │  │  PlatformUnava… │  │  Store (persistence), Domain (validation)   │  │
//! │  │  TokenProvider  │  │                                             │  │
//! │  └─────────────────┘  └─────────────────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stored state is only ever mutated after a confirmed successful remote
//! response, so every variant here implies the record still reflects the
//! last confirmed registration. No retry or backoff happens inside the
//! client; retry policy belongs to the embedder.

use thiserror::Error;

use crate::token::PlatformAvailability;

/// Result type alias for client operations.
pub type PushResult<T> = Result<T, PushError>;

/// Client error type covering every way a push operation can fail.
#[derive(Debug, Error)]
pub enum PushError {
    // =========================================================================
    // Precondition Errors (no network attempted)
    // =========================================================================
    /// The operation requires an existing registration.
    ///
    /// ## When This Occurs
    /// - `refresh_registration` before any successful register
    /// - `mark_message_opened` without a stored token
    #[error("Not registered with the push backend")]
    NotRegistered,

    /// The client configuration is unusable.
    #[error("Invalid client configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Transport Errors (remote call could not be completed)
    // =========================================================================
    /// The HTTP round trip failed (connectivity, DNS, TLS, timeout).
    #[error("Connection to push backend failed: {0}")]
    Connection(String),

    /// The backend answered with a status outside the protocol.
    #[error("Unexpected HTTP status {status} from push backend: {body}")]
    UnexpectedStatus { status: u16, body: String },

    // =========================================================================
    // Protocol Errors (response received but uninterpretable)
    // =========================================================================
    /// The response body could not be interpreted.
    #[error("Malformed push backend response: {0}")]
    MalformedResponse(String),

    // =========================================================================
    // Platform Errors (messaging provider unusable)
    // =========================================================================
    /// The messaging platform is not usable on this device.
    #[error("Messaging platform unavailable: {availability}")]
    PlatformUnavailable { availability: PlatformAvailability },

    /// The token provider failed to complete.
    #[error("Token provider failed: {0}")]
    TokenProvider(String),

    // =========================================================================
    // Wrapped Lower Layers
    // =========================================================================
    /// Persistence failure from the state store.
    #[error("State store failure: {0}")]
    Store(#[from] nimbus_store::StoreError),

    /// Domain validation failure (for example a tag containing the
    /// delimiter).
    #[error(transparent)]
    Domain(#[from] nimbus_core::CoreError),
}

// =============================================================================
// Error Conversions
// =============================================================================

impl From<reqwest::Error> for PushError {
    fn from(err: reqwest::Error) -> Self {
        PushError::Connection(err.to_string())
    }
}

impl From<url::ParseError> for PushError {
    fn from(err: url::ParseError) -> Self {
        PushError::InvalidConfig(err.to_string())
    }
}

// =============================================================================
// Error Categorization
// =============================================================================

impl PushError {
    /// True when the operation failed before any network activity because
    /// of invalid local state.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            PushError::NotRegistered | PushError::InvalidConfig(_)
        )
    }

    /// True when the remote call could not be completed. The stored record
    /// is unchanged and the same operation may succeed later.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            PushError::Connection(_) | PushError::UnexpectedStatus { .. }
        )
    }

    /// True when a response arrived but could not be interpreted.
    pub fn is_protocol(&self) -> bool {
        matches!(self, PushError::MalformedResponse(_))
    }

    /// True when the messaging platform itself is the problem.
    pub fn is_platform_unavailable(&self) -> bool {
        matches!(
            self,
            PushError::PlatformUnavailable { .. } | PushError::TokenProvider(_)
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categorization() {
        assert!(PushError::NotRegistered.is_precondition());
        assert!(PushError::Connection("refused".into()).is_transport());
        assert!(PushError::UnexpectedStatus { status: 500, body: "oops".into() }.is_transport());
        assert!(PushError::MalformedResponse("no clientUuid".into()).is_protocol());
        assert!(PushError::PlatformUnavailable {
            availability: PlatformAvailability::Unsupported
        }
        .is_platform_unavailable());

        assert!(!PushError::NotRegistered.is_transport());
        assert!(!PushError::Connection("refused".into()).is_precondition());
    }

    #[test]
    fn test_unexpected_status_message() {
        let err = PushError::UnexpectedStatus { status: 503, body: "maintenance".into() };
        assert_eq!(
            err.to_string(),
            "Unexpected HTTP status 503 from push backend: maintenance"
        );
    }
}

//! # Registration State & Operation Outcomes
//!
//! The registration record is the device's single source of truth for "what
//! the backend last confirmed". It exists only after a successful
//! registration; its absence means "not registered".
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   RegistrationState Lifecycle                           │
//! │                                                                         │
//! │              register (201/200 confirmed)                               │
//! │   absent ───────────────────────────────────► present                  │
//! │     ▲                                            │                      │
//! │     │ unregister(None) confirmed                 │ register confirmed   │
//! │     │                                            ▼ (full replacement)   │
//! │     └──────────────────────────────────── present'                     │
//! │                                                  │                      │
//! │                     unregister(Some(tags)) confirmed                    │
//! │                                                  ▼                      │
//! │                              present (tags field only shrinks)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every transition is gated on a confirmed successful remote response;
//! a failed call leaves the record exactly as it was.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::tags::TagSet;

// =============================================================================
// Registration State
// =============================================================================

/// The device's current registration as last confirmed by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationState {
    /// Backend-assigned client identifier, returned by the register call.
    pub client_id: Uuid,

    /// The platform messaging token most recently sent to the backend.
    pub last_sent_token: String,

    /// Tags confirmed by the backend, in canonical form.
    pub registered_tags: TagSet,

    /// When the backend last confirmed a registration.
    pub last_registration_at: DateTime<Utc>,
}

impl RegistrationState {
    /// Builds the record persisted after a confirmed registration.
    pub fn confirmed(
        client_id: Uuid,
        token: impl Into<String>,
        tags: TagSet,
        at: DateTime<Utc>,
    ) -> Self {
        RegistrationState {
            client_id,
            last_sent_token: token.into(),
            registered_tags: tags,
            last_registration_at: at,
        }
    }

    /// True when `(token, tags)` matches what the backend already holds,
    /// i.e. a re-registration would be a no-op.
    ///
    /// The caller canonicalizes first; an absent tag argument compares as
    /// the empty set.
    pub fn matches(&self, token: &str, tags: &TagSet) -> bool {
        self.last_sent_token == token && self.registered_tags == *tags
    }
}

// =============================================================================
// Operation Outcomes
// =============================================================================

/// Outcome of a register / refresh operation.
///
/// `Registered` and `Refreshed` mirror the backend's created/updated
/// distinction (HTTP 201 vs 200); they are never inferred locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegistrationOutcome {
    /// The backend created a new registration.
    Registered,

    /// The backend updated an existing registration.
    Refreshed,

    /// Token and tags matched the stored record; no network call was made.
    AlreadyRegistered,
}

/// Outcome of an unregister operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnregistrationOutcome {
    /// The backend confirmed the removal (full or partial).
    Unregistered,

    /// No registration exists; nothing was sent.
    NotRegistered,
}

/// Outcome of a mark-message-opened operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcknowledgementOutcome {
    /// The backend recorded the open; the id is now in the local log.
    Opened,

    /// The id was already in the local log; no network call was made.
    AlreadyOpened,
}

impl std::fmt::Display for RegistrationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationOutcome::Registered => write!(f, "registered"),
            RegistrationOutcome::Refreshed => write!(f, "refreshed"),
            RegistrationOutcome::AlreadyRegistered => write!(f, "already_registered"),
        }
    }
}

impl std::fmt::Display for UnregistrationOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnregistrationOutcome::Unregistered => write!(f, "unregistered"),
            UnregistrationOutcome::NotRegistered => write!(f, "not_registered"),
        }
    }
}

impl std::fmt::Display for AcknowledgementOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcknowledgementOutcome::Opened => write!(f, "opened"),
            AcknowledgementOutcome::AlreadyOpened => write!(f, "already_opened"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

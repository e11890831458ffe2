//! # Acknowledgement Tracker
//!
//! Decides, per message id, whether an open-acknowledgement must still be
//! sent, and records the id only after the backend confirms.
//!
//! ## Idempotence Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      mark_opened(message_id)                            │
//! │                                                                         │
//! │  id in local log? ──yes──► ALREADY_OPENED (zero network calls)          │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  stored token? ──no──► NotRegistered (precondition, no network)         │
//! │        │ yes                                                            │
//! │        ▼                                                                │
//! │  BackendClient::mark_message_opened ──failure──► error, log unchanged   │
//! │        │ success                                                        │
//! │        ▼                                                                │
//! │  append to log (FIFO eviction at 100) ──► OPENED                        │
//! │                                                                         │
//! │  Per message id: Unseen → Acknowledged, terminal. Eviction only         │
//! │  reclaims memory; an aged-out id may be acknowledged remotely twice.    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use uuid::Uuid;

use nimbus_core::AcknowledgementOutcome;
use nimbus_store::StateStore;

use crate::backend::BackendClient;
use crate::config::ClientConfig;
use crate::error::{PushError, PushResult};

// =============================================================================
// Acknowledgement Tracker
// =============================================================================

/// Sends each message-opened acknowledgement at most once per locally
/// remembered id.
pub struct AcknowledgementTracker {
    config: Arc<ClientConfig>,
    store: Arc<dyn StateStore>,
    backend: Arc<dyn BackendClient>,

    /// Per-device operation guard, shared with the coordinator.
    op_guard: Arc<Mutex<()>>,
}

impl AcknowledgementTracker {
    /// Creates a tracker over the supplied collaborators.
    pub fn new(
        config: Arc<ClientConfig>,
        store: Arc<dyn StateStore>,
        backend: Arc<dyn BackendClient>,
        op_guard: Arc<Mutex<()>>,
    ) -> Self {
        AcknowledgementTracker {
            config,
            store,
            backend,
            op_guard,
        }
    }

    /// Reports `message_id` as opened, unless it already was.
    ///
    /// The id enters the local log only after the backend confirms, so a
    /// transport failure never silently marks an unacknowledged message.
    pub async fn mark_opened(&self, message_id: Uuid) -> PushResult<AcknowledgementOutcome> {
        let _guard = self.op_guard.lock().await;

        if self.store.acknowledged()?.contains(message_id) {
            debug!(%message_id, "Message already acknowledged, skipping network call");
            return Ok(AcknowledgementOutcome::AlreadyOpened);
        }

        let state = self.store.get()?.ok_or(PushError::NotRegistered)?;

        self.backend
            .mark_message_opened(
                &self.config.app_id,
                &self.config.client_secret,
                &state.last_sent_token,
                message_id,
            )
            .await?;

        self.store.record_acknowledged(message_id)?;
        info!(%message_id, "Message open acknowledged");
        Ok(AcknowledgementOutcome::Opened)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Push Client Facade
//!
//! The surface embedders hold. A [`PushClient`] is an explicit object built
//! once from a validated [`ClientConfig`] and injected collaborators; there
//! is no process-global instance and no hidden initialization step.
//!
//! The facade owns the platform-availability precondition: register and
//! unregister first ask the token provider whether the messaging platform
//! is usable and fail with [`PushError::PlatformUnavailable`] carrying the
//! explicit availability value, so the embedder can branch on the reason
//! (show a resolution dialog, give up, retry later) without exception-style
//! control flow.

use std::sync::Arc;

use tokio::sync::Mutex;
use uuid::Uuid;

use nimbus_core::{
    AcknowledgementOutcome, RegistrationOutcome, TagSet, UnregistrationOutcome,
};
use nimbus_store::StateStore;

use crate::acknowledgements::AcknowledgementTracker;
use crate::backend::BackendClient;
use crate::config::ClientConfig;
use crate::coordinator::RegistrationCoordinator;
use crate::error::{PushError, PushResult};
use crate::http::HttpBackendClient;
use crate::token::TokenProvider;

// =============================================================================
// Push Client
// =============================================================================

/// One device's handle to the push registration service.
pub struct PushClient {
    coordinator: RegistrationCoordinator,
    tracker: AcknowledgementTracker,
    tokens: Arc<dyn TokenProvider>,
}

impl PushClient {
    /// Creates a client over explicit collaborators.
    ///
    /// Validates `config` up front so a misconfigured client cannot be
    /// constructed at all.
    pub fn new(
        config: ClientConfig,
        store: Arc<dyn StateStore>,
        backend: Arc<dyn BackendClient>,
        tokens: Arc<dyn TokenProvider>,
    ) -> PushResult<Self> {
        config.validate()?;
        let config = Arc::new(config);

        // Coordinator and tracker share one guard: register, unregister and
        // acknowledge serialize against each other per device.
        let op_guard = Arc::new(Mutex::new(()));

        let coordinator = RegistrationCoordinator::new(
            config.clone(),
            store.clone(),
            backend.clone(),
            tokens.clone(),
            op_guard.clone(),
        );
        let tracker = AcknowledgementTracker::new(config, store, backend, op_guard);

        Ok(PushClient {
            coordinator,
            tracker,
            tokens,
        })
    }

    /// Creates a client speaking the HTTP wire protocol to
    /// `config.server_url`.
    pub fn with_http_backend(
        config: ClientConfig,
        store: Arc<dyn StateStore>,
        tokens: Arc<dyn TokenProvider>,
    ) -> PushResult<Self> {
        let backend = Arc::new(HttpBackendClient::new(&config)?);
        Self::new(config, store, backend, tokens)
    }

    /// Registers for push notifications with `tags`.
    ///
    /// An existing registration's tags are replaced, not merged. Returns
    /// [`RegistrationOutcome::AlreadyRegistered`] without touching the
    /// network when nothing changed.
    pub async fn register(&self, tags: Option<&TagSet>) -> PushResult<RegistrationOutcome> {
        self.ensure_platform_available()?;
        self.coordinator.register(tags).await
    }

    /// Refreshes the current registration if needed. Advisable on every
    /// application start; cheap when nothing changed.
    pub async fn refresh_registration(&self) -> PushResult<RegistrationOutcome> {
        self.coordinator.refresh().await
    }

    /// Removes `tags` from the registration, or the whole registration
    /// when `tags` is absent or empty.
    pub async fn unregister(&self, tags: Option<&TagSet>) -> PushResult<UnregistrationOutcome> {
        self.ensure_platform_available()?;
        self.coordinator.unregister(tags).await
    }

    /// Returns the registered tags; empty when not registered.
    pub fn registered_tags(&self) -> PushResult<TagSet> {
        self.coordinator.registered_tags()
    }

    /// Returns the backend-assigned client id, or `None` when not
    /// registered.
    pub fn client_id(&self) -> PushResult<Option<Uuid>> {
        self.coordinator.client_id()
    }

    /// True when this device currently holds a registration.
    pub fn is_registered(&self) -> PushResult<bool> {
        self.coordinator.is_registered()
    }

    /// Reports that the message with `message_id` was opened, at most once
    /// per locally remembered id.
    pub async fn mark_message_opened(
        &self,
        message_id: Uuid,
    ) -> PushResult<AcknowledgementOutcome> {
        self.tracker.mark_opened(message_id).await
    }

    fn ensure_platform_available(&self) -> PushResult<()> {
        let availability = self.tokens.availability();
        if availability.is_available() {
            Ok(())
        } else {
            Err(PushError::PlatformUnavailable { availability })
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

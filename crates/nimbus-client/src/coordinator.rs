//! # Registration Coordinator
//!
//! The central policy of the client: given a freshly obtained platform
//! token and a desired tag set, decide whether the backend must be called
//! at all, and commit local state only after the backend confirms.
//!
//! ## The Skip Decision
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      register(desired_tags)                             │
//! │                                                                         │
//! │  1. token ◄── await token provider (single completion)                  │
//! │                                                                         │
//! │  2. canonical ◄── sort/dedup desired_tags, None ⇒ empty set             │
//! │                                                                         │
//! │  3. stored (last_sent_token, registered_tags) == (token, canonical)?    │
//! │        │ yes                                │ no                        │
//! │        ▼                                    ▼                           │
//! │    ALREADY_REGISTERED                 BackendClient::register           │
//! │    (zero network calls)                     │                           │
//! │                                 201 ⇒ REGISTERED   200 ⇒ REFRESHED      │
//! │                                             │                           │
//! │                                 persist full replacement state          │
//! │                                 (client id, token, tags, now)           │
//! │                                                                         │
//! │  Any failure: stored state untouched, error surfaced, no retry.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! One `tokio::sync::Mutex` serializes register / unregister / acknowledge
//! against each other, so concurrent calls from the embedder cannot race on
//! the read-compare-write sequence. The guard is shared with the
//! acknowledgement tracker by the facade.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use nimbus_core::{
    RegistrationOutcome, RegistrationState, TagSet, UnregistrationOutcome,
};
use nimbus_store::StateStore;

use crate::backend::BackendClient;
use crate::config::ClientConfig;
use crate::error::{PushError, PushResult};
use crate::token::TokenProvider;

// =============================================================================
// Registration Coordinator
// =============================================================================

/// Decides when the backend must be called and keeps the stored record in
/// step with what the backend confirmed.
pub struct RegistrationCoordinator {
    config: Arc<ClientConfig>,
    store: Arc<dyn StateStore>,
    backend: Arc<dyn BackendClient>,
    tokens: Arc<dyn TokenProvider>,

    /// Per-device operation guard, shared with the acknowledgement tracker.
    op_guard: Arc<Mutex<()>>,
}

impl RegistrationCoordinator {
    /// Creates a coordinator over the supplied collaborators.
    pub fn new(
        config: Arc<ClientConfig>,
        store: Arc<dyn StateStore>,
        backend: Arc<dyn BackendClient>,
        tokens: Arc<dyn TokenProvider>,
        op_guard: Arc<Mutex<()>>,
    ) -> Self {
        RegistrationCoordinator {
            config,
            store,
            backend,
            tokens,
            op_guard,
        }
    }

    /// Registers the device with `tags`, replacing any previously
    /// registered tag set.
    ///
    /// Skips the network entirely when the current token and canonical tags
    /// match what the backend already holds.
    pub async fn register(&self, tags: Option<&TagSet>) -> PushResult<RegistrationOutcome> {
        let _guard = self.op_guard.lock().await;
        self.register_locked(tags).await
    }

    /// Re-registers with the currently stored tag set.
    ///
    /// Fails fast with [`PushError::NotRegistered`] before any network
    /// activity when no registration exists.
    pub async fn refresh(&self) -> PushResult<RegistrationOutcome> {
        let _guard = self.op_guard.lock().await;
        let state = self.store.get()?.ok_or(PushError::NotRegistered)?;
        debug!(tags = %state.registered_tags, "Refreshing registration with stored tags");
        self.register_locked(Some(&state.registered_tags)).await
    }

    async fn register_locked(&self, tags: Option<&TagSet>) -> PushResult<RegistrationOutcome> {
        let token = self.tokens.token().await?;

        // None and the empty set canonicalize identically for the skip
        // decision; the Option itself still travels to the backend client.
        let canonical = tags.cloned().unwrap_or_default();

        if let Some(state) = self.store.get()? {
            if state.matches(&token, &canonical) {
                info!("Already registered with identical token and tags, skipping network call");
                return Ok(RegistrationOutcome::AlreadyRegistered);
            }
        }

        let reply = self
            .backend
            .register(&self.config.app_id, &self.config.client_secret, &token, tags)
            .await?;

        let outcome = if reply.created {
            RegistrationOutcome::Registered
        } else {
            RegistrationOutcome::Refreshed
        };

        // Full replacement of the stored record; never a merge.
        self.store.put(&RegistrationState::confirmed(
            reply.client_id,
            &token,
            canonical,
            Utc::now(),
        ))?;

        info!(client_id = %reply.client_id, %outcome, "Registration confirmed");
        Ok(outcome)
    }

    /// Removes `tags` from the registration, or the whole registration
    /// when `tags` is absent or empty.
    pub async fn unregister(&self, tags: Option<&TagSet>) -> PushResult<UnregistrationOutcome> {
        let _guard = self.op_guard.lock().await;

        let Some(state) = self.store.get()? else {
            debug!("Unregister requested but no registration exists");
            return Ok(UnregistrationOutcome::NotRegistered);
        };
        let token = &state.last_sent_token;

        match tags {
            Some(tags) if !tags.is_empty() => {
                self.backend
                    .unregister(&self.config.app_id, &self.config.client_secret, token, Some(tags))
                    .await?;

                let remaining = state.registered_tags.difference(tags);
                self.store.set_tags(&remaining)?;
                info!(removed = %tags, remaining = %remaining, "Tags unregistered");
            }
            _ => {
                self.backend
                    .unregister(&self.config.app_id, &self.config.client_secret, token, None)
                    .await?;

                // The backend no longer knows this device; a provider that
                // fails to invalidate cannot keep the record alive.
                if let Err(e) = self.tokens.invalidate().await {
                    warn!(error = %e, "Token invalidation failed after unregistration");
                }
                self.store.clear()?;
                info!("Registration fully removed");
            }
        }

        Ok(UnregistrationOutcome::Unregistered)
    }

    /// Returns the registered tags; empty when not registered.
    pub fn registered_tags(&self) -> PushResult<TagSet> {
        Ok(self.store.tags()?)
    }

    /// Returns the backend-assigned client id of the current registration.
    pub fn client_id(&self) -> PushResult<Option<Uuid>> {
        Ok(self.store.get()?.map(|state| state.client_id))
    }

    /// True when a registration record exists.
    pub fn is_registered(&self) -> PushResult<bool> {
        Ok(self.store.get()?.is_some())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::Ordering;

    use nimbus_store::MemoryStore;

    use crate::test_support::{BackendCall, RecordingBackend, StaticTokenProvider};

    struct Harness {
        coordinator: RegistrationCoordinator,
        store: Arc<MemoryStore>,
        backend: Arc<RecordingBackend>,
        tokens: Arc<StaticTokenProvider>,
    }

    fn harness() -> Harness {
        let config = Arc::new(ClientConfig {
            sender_id: "sender-1".into(),
            app_id: "app-1".into(),
            client_secret: "secret-1".into(),
            server_url: "https://push.example/push".into(),
            device_type: "android".into(),
        });
        let store = Arc::new(MemoryStore::new());
        let backend = Arc::new(RecordingBackend::new());
        let tokens = Arc::new(StaticTokenProvider::new("tok-1"));
        let coordinator = RegistrationCoordinator::new(
            config,
            store.clone(),
            backend.clone(),
            tokens.clone(),
            Arc::new(Mutex::new(())),
        );
        Harness {
            coordinator,
            store,
            backend,
            tokens,
        }
    }

    fn tags(names: &[&str]) -> TagSet {
        TagSet::from_tags(names.iter().copied()).unwrap()
    }

    #[tokio::test]
    async fn test_second_identical_register_skips_network() {
        let h = harness();
        let set = tags(&["a", "b"]);

        let first = h.coordinator.register(Some(&set)).await.unwrap();
        assert_eq!(first, RegistrationOutcome::Registered);

        let second = h.coordinator.register(Some(&set)).await.unwrap();
        assert_eq!(second, RegistrationOutcome::AlreadyRegistered);

        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_register_performs_one_call_and_stores_tags() {
        let h = harness();
        let set = tags(&["c", "a", "b"]);

        h.coordinator.register(Some(&set)).await.unwrap();

        assert_eq!(h.backend.call_count(), 1);
        assert_eq!(h.coordinator.registered_tags().unwrap(), tags(&["a", "b", "c"]));
        assert_eq!(
            h.backend.calls()[0],
            BackendCall::Register {
                token: "tok-1".into(),
                tags: Some(tags(&["a", "b", "c"])),
            }
        );
    }

    #[tokio::test]
    async fn test_register_persists_backend_client_id() {
        let h = harness();
        h.coordinator.register(None).await.unwrap();
        assert_eq!(h.coordinator.client_id().unwrap(), Some(h.backend.client_id));
    }

    #[tokio::test]
    async fn test_refreshed_outcome_comes_from_backend() {
        let h = harness();
        h.backend.created.store(false, Ordering::SeqCst);

        let outcome = h.coordinator.register(Some(&tags(&["a"]))).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::Refreshed);
    }

    #[tokio::test]
    async fn test_register_failure_leaves_state_untouched() {
        let h = harness();
        h.backend.fail_next.store(true, Ordering::SeqCst);

        let err = h.coordinator.register(Some(&tags(&["a"]))).await.unwrap_err();
        assert!(err.is_transport());
        assert!(h.store.get().unwrap().is_none());

        // The same operation succeeds once the transport recovers.
        let outcome = h.coordinator.register(Some(&tags(&["a"]))).await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::Registered);
    }

    #[tokio::test]
    async fn test_token_rotation_triggers_resend() {
        let h = harness();
        let set = tags(&["a"]);
        h.coordinator.register(Some(&set)).await.unwrap();

        h.tokens.set_token("tok-2");
        h.coordinator.register(Some(&set)).await.unwrap();

        assert_eq!(h.backend.call_count(), 2);
        let state = h.store.get().unwrap().unwrap();
        assert_eq!(state.last_sent_token, "tok-2");
    }

    #[tokio::test]
    async fn test_explicit_empty_and_absent_tags_compare_identically() {
        let h = harness();

        let first = h.coordinator.register(Some(&TagSet::new())).await.unwrap();
        assert_eq!(first, RegistrationOutcome::Registered);

        let second = h.coordinator.register(None).await.unwrap();
        assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_absent_then_explicit_empty_also_skips() {
        let h = harness();
        h.coordinator.register(None).await.unwrap();

        let second = h.coordinator.register(Some(&TagSet::new())).await.unwrap();
        assert_eq!(second, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_surfaces_before_any_call() {
        let h = harness();
        h.tokens.fail_token.store(true, Ordering::SeqCst);

        let err = h.coordinator.register(None).await.unwrap_err();
        assert!(err.is_platform_unavailable());
        assert_eq!(h.backend.call_count(), 0);
        assert!(h.store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_refresh_without_registration_fails_fast() {
        let h = harness();
        let err = h.coordinator.refresh().await.unwrap_err();
        assert!(matches!(err, PushError::NotRegistered));
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_refresh_resends_stored_tags_after_rotation() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a", "b"]))).await.unwrap();

        h.tokens.set_token("tok-2");
        h.coordinator.refresh().await.unwrap();

        assert_eq!(
            h.backend.calls()[1],
            BackendCall::Register {
                token: "tok-2".into(),
                tags: Some(tags(&["a", "b"])),
            }
        );
    }

    #[tokio::test]
    async fn test_refresh_with_current_token_skips_network() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a"]))).await.unwrap();

        let outcome = h.coordinator.refresh().await.unwrap();
        assert_eq!(outcome, RegistrationOutcome::AlreadyRegistered);
        assert_eq!(h.backend.call_count(), 1);
    }

    #[tokio::test]
    async fn test_partial_unregister_leaves_remaining_tags() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a", "b", "c"]))).await.unwrap();

        let outcome = h.coordinator.unregister(Some(&tags(&["a", "b"]))).await.unwrap();
        assert_eq!(outcome, UnregistrationOutcome::Unregistered);
        assert_eq!(h.coordinator.registered_tags().unwrap(), tags(&["c"]));

        // The registration itself survives a partial unregister.
        assert!(h.coordinator.is_registered().unwrap());
        assert_eq!(
            h.backend.calls()[1],
            BackendCall::Unregister {
                token: "tok-1".into(),
                tags: Some(tags(&["a", "b"])),
            }
        );
    }

    #[tokio::test]
    async fn test_partial_unregister_ignores_absent_tags() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a", "b", "c"]))).await.unwrap();

        h.coordinator.unregister(Some(&tags(&["c", "zzz"]))).await.unwrap();
        assert_eq!(h.coordinator.registered_tags().unwrap(), tags(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_full_unregister_clears_everything() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a", "b", "c"]))).await.unwrap();

        let outcome = h.coordinator.unregister(None).await.unwrap();
        assert_eq!(outcome, UnregistrationOutcome::Unregistered);

        assert!(h.coordinator.registered_tags().unwrap().is_empty());
        assert!(h.store.get().unwrap().is_none());
        assert!(h.tokens.invalidated.load(Ordering::SeqCst));
        assert_eq!(
            h.backend.calls()[1],
            BackendCall::Unregister { token: "tok-1".into(), tags: None }
        );

        // A second unregister finds nothing and stays local.
        let again = h.coordinator.unregister(None).await.unwrap();
        assert_eq!(again, UnregistrationOutcome::NotRegistered);
        assert_eq!(h.backend.call_count(), 2);
    }

    #[tokio::test]
    async fn test_unregister_with_empty_set_is_full_unregistration() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a"]))).await.unwrap();

        h.coordinator.unregister(Some(&TagSet::new())).await.unwrap();

        assert!(h.store.get().unwrap().is_none());
        assert_eq!(
            h.backend.calls()[1],
            BackendCall::Unregister { token: "tok-1".into(), tags: None }
        );
    }

    #[tokio::test]
    async fn test_unregister_before_any_registration_is_local() {
        let h = harness();
        let outcome = h.coordinator.unregister(None).await.unwrap();
        assert_eq!(outcome, UnregistrationOutcome::NotRegistered);
        assert_eq!(h.backend.call_count(), 0);
    }

    #[tokio::test]
    async fn test_unregister_failure_preserves_state() {
        let h = harness();
        h.coordinator.register(Some(&tags(&["a", "b"]))).await.unwrap();

        h.backend.fail_next.store(true, Ordering::SeqCst);
        let err = h.coordinator.unregister(None).await.unwrap_err();
        assert!(err.is_transport());

        assert!(h.coordinator.is_registered().unwrap());
        assert_eq!(h.coordinator.registered_tags().unwrap(), tags(&["a", "b"]));
        assert!(!h.tokens.invalidated.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_invalidation_failure_still_clears_state() {
        let h = harness();
        h.coordinator.register(None).await.unwrap();

        h.tokens.fail_invalidate.store(true, Ordering::SeqCst);
        let outcome = h.coordinator.unregister(None).await.unwrap();

        assert_eq!(outcome, UnregistrationOutcome::Unregistered);
        assert!(h.store.get().unwrap().is_none());
    }

    #[tokio::test]
    async fn test_registered_tags_empty_when_never_registered() {
        let h = harness();
        assert!(h.coordinator.registered_tags().unwrap().is_empty());
        assert!(!h.coordinator.is_registered().unwrap());
        assert_eq!(h.coordinator.client_id().unwrap(), None);
    }
}

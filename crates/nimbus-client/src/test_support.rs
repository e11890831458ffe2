//! Shared recording test doubles for the coordinator, tracker and facade
//! tests. Hand-rolled rather than generated: the assertions care about the
//! exact sequence of backend calls and the exact `Option` shape of the tags
//! argument.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use nimbus_core::TagSet;

use crate::backend::{BackendClient, RegistrationReply};
use crate::error::{PushError, PushResult};
use crate::token::{PlatformAvailability, TokenProvider};

// =============================================================================
// Recording Backend
// =============================================================================

/// One observed backend invocation, with the tags argument preserved
/// exactly as the coordinator passed it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum BackendCall {
    Register { token: String, tags: Option<TagSet> },
    Unregister { token: String, tags: Option<TagSet> },
    MessageOpened { token: String, message_id: Uuid },
}

/// Backend double that records every call and can fail on demand.
pub(crate) struct RecordingBackend {
    calls: Mutex<Vec<BackendCall>>,

    /// Client id returned by every register reply.
    pub client_id: Uuid,

    /// `created` flag of the next register reply (201 vs 200).
    pub created: AtomicBool,

    /// When set, the next call records itself and then fails with a
    /// connection error; the flag auto-resets.
    pub fail_next: AtomicBool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        RecordingBackend {
            calls: Mutex::new(Vec::new()),
            client_id: Uuid::new_v4(),
            created: AtomicBool::new(true),
            fail_next: AtomicBool::new(false),
        }
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn record(&self, call: BackendCall) -> PushResult<()> {
        self.calls.lock().unwrap().push(call);
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(PushError::Connection("injected transport failure".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl BackendClient for RecordingBackend {
    async fn register(
        &self,
        _app_id: &str,
        _client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<RegistrationReply> {
        self.record(BackendCall::Register {
            token: token.to_string(),
            tags: tags.cloned(),
        })?;
        Ok(RegistrationReply {
            client_id: self.client_id,
            created: self.created.load(Ordering::SeqCst),
        })
    }

    async fn unregister(
        &self,
        _app_id: &str,
        _client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<()> {
        self.record(BackendCall::Unregister {
            token: token.to_string(),
            tags: tags.cloned(),
        })
    }

    async fn mark_message_opened(
        &self,
        _app_id: &str,
        _client_secret: &str,
        token: &str,
        message_id: Uuid,
    ) -> PushResult<()> {
        self.record(BackendCall::MessageOpened {
            token: token.to_string(),
            message_id,
        })
    }
}

// =============================================================================
// Static Token Provider
// =============================================================================

/// Token provider double with a settable token and failure switches.
pub(crate) struct StaticTokenProvider {
    token: Mutex<String>,
    availability: Mutex<PlatformAvailability>,

    /// Set when `invalidate` has been called.
    pub invalidated: AtomicBool,

    /// When set, `token` fails instead of completing.
    pub fail_token: AtomicBool,

    /// When set, `invalidate` fails.
    pub fail_invalidate: AtomicBool,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        StaticTokenProvider {
            token: Mutex::new(token.into()),
            availability: Mutex::new(PlatformAvailability::Available),
            invalidated: AtomicBool::new(false),
            fail_token: AtomicBool::new(false),
            fail_invalidate: AtomicBool::new(false),
        }
    }

    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.lock().unwrap() = token.into();
    }

    pub fn set_availability(&self, availability: PlatformAvailability) {
        *self.availability.lock().unwrap() = availability;
    }
}

#[async_trait]
impl TokenProvider for StaticTokenProvider {
    fn availability(&self) -> PlatformAvailability {
        *self.availability.lock().unwrap()
    }

    async fn token(&self) -> PushResult<String> {
        if self.fail_token.load(Ordering::SeqCst) {
            return Err(PushError::TokenProvider("injected provider failure".into()));
        }
        Ok(self.token.lock().unwrap().clone())
    }

    async fn invalidate(&self) -> PushResult<()> {
        if self.fail_invalidate.load(Ordering::SeqCst) {
            return Err(PushError::TokenProvider("injected invalidation failure".into()));
        }
        self.invalidated.store(true, Ordering::SeqCst);
        Ok(())
    }
}

//! # Schema-Versioned Persisted Record
//!
//! Every persisted field lives inside a version table (`[v1]`), so a future
//! format change gets its own table instead of colliding with stale keys.
//! The tag set and acknowledgement log are stored in their canonical
//! delimited forms and pass through the nimbus-core codecs on the way in
//! and out; the document itself never interprets them.
//!
//! A record is "registered" only when the token, client id and timestamp are
//! all present. A partial record (for example a file truncated mid-write or
//! hand-edited) decodes as "not registered" rather than erroring, matching
//! the store contract that absence is never a failure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use nimbus_core::{AcknowledgementLog, CoreResult, RegistrationState, TagSet};

/// Name of the version table the current schema writes under.
pub const SCHEMA_VERSION: &str = "v1";

// =============================================================================
// Document
// =============================================================================

/// Root of the persisted TOML document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StateDocument {
    /// Current-schema record. Unknown future tables are ignored on load.
    #[serde(default)]
    pub v1: RecordV1,
}

/// The `[v1]` record: all fields optional so absence round-trips cleanly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordV1 {
    /// Backend-assigned client identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<Uuid>,

    /// The token most recently confirmed by the backend. Absence of this
    /// field is what "not registered" means.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sent_token: Option<String>,

    /// Registered tags in canonical comma-joined form.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registered_tags: Option<String>,

    /// When the backend last confirmed a registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_registration_at: Option<DateTime<Utc>>,

    /// Acknowledged message ids, oldest first, comma-joined.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledged: Option<String>,
}

impl RecordV1 {
    /// Decodes the registration, or `None` when the record is absent or
    /// incomplete.
    pub fn registration(&self) -> Option<RegistrationState> {
        let token = self.last_sent_token.as_ref()?;
        let client_id = self.client_id?;
        let at = self.last_registration_at?;
        let tags = self
            .registered_tags
            .as_deref()
            .map(TagSet::decode)
            .unwrap_or_default();
        Some(RegistrationState::confirmed(client_id, token, tags, at))
    }

    /// Replaces the registration fields from `state`. The acknowledgement
    /// log is untouched.
    pub fn set_registration(&mut self, state: &RegistrationState) {
        self.client_id = Some(state.client_id);
        self.last_sent_token = Some(state.last_sent_token.clone());
        self.registered_tags = Some(state.registered_tags.encode());
        self.last_registration_at = Some(state.last_registration_at);
    }

    /// Decodes the registered tags; empty when not registered.
    pub fn tags(&self) -> TagSet {
        self.registered_tags
            .as_deref()
            .map(TagSet::decode)
            .unwrap_or_default()
    }

    /// Replaces the tags field. No-op when no registration exists.
    pub fn set_tags(&mut self, tags: &TagSet) {
        if self.last_sent_token.is_some() {
            self.registered_tags = Some(tags.encode());
        }
    }

    /// Decodes the acknowledgement log; empty when never written.
    pub fn log(&self) -> CoreResult<AcknowledgementLog> {
        match self.acknowledged.as_deref() {
            Some(encoded) => AcknowledgementLog::decode(encoded),
            None => Ok(AcknowledgementLog::new()),
        }
    }

    /// Replaces the acknowledgement log field.
    pub fn set_log(&mut self, log: &AcknowledgementLog) {
        self.acknowledged = Some(log.encode());
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_state() -> RegistrationState {
        RegistrationState::confirmed(
            Uuid::new_v4(),
            "tok-1",
            TagSet::from_tags(["news", "sports"]).unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn test_empty_record_is_not_registered() {
        let record = RecordV1::default();
        assert!(record.registration().is_none());
        assert!(record.tags().is_empty());
        assert!(record.log().unwrap().is_empty());
    }

    #[test]
    fn test_registration_round_trip() {
        let state = sample_state();
        let mut record = RecordV1::default();
        record.set_registration(&state);

        let loaded = record.registration().unwrap();
        assert_eq!(loaded.client_id, state.client_id);
        assert_eq!(loaded.last_sent_token, state.last_sent_token);
        assert_eq!(loaded.registered_tags, state.registered_tags);
    }

    #[test]
    fn test_partial_record_decodes_as_unregistered() {
        // token present, client id missing
        let record = RecordV1 {
            last_sent_token: Some("tok-1".into()),
            ..RecordV1::default()
        };
        assert!(record.registration().is_none());
    }

    #[test]
    fn test_set_tags_without_registration_is_noop() {
        let mut record = RecordV1::default();
        record.set_tags(&TagSet::from_tags(["news"]).unwrap());
        assert!(record.registered_tags.is_none());
    }

    #[test]
    fn test_document_toml_round_trip() {
        let mut doc = StateDocument::default();
        doc.v1.set_registration(&sample_state());
        let mut log = AcknowledgementLog::new();
        log.record(Uuid::new_v4());
        doc.v1.set_log(&log);

        let encoded = toml::to_string_pretty(&doc).unwrap();
        assert!(encoded.contains("[v1]"));

        let decoded: StateDocument = toml::from_str(&encoded).unwrap();
        assert_eq!(decoded, doc);
    }

    #[test]
    fn test_document_with_unknown_fields_still_loads() {
        // A v2 table written by a future version must not break v1 loading.
        let decoded: StateDocument =
            toml::from_str("[v1]\nlast_sent_token = \"tok\"\n\n[v2]\nanything = 1\n").unwrap();
        assert_eq!(decoded.v1.last_sent_token.as_deref(), Some("tok"));
    }
}

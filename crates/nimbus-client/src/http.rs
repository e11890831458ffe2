//! # HTTP Backend Client
//!
//! reqwest implementation of the [`BackendClient`] contract.
//!
//! ## Wire Protocol
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 Registration Endpoint Protocol                          │
//! │                                                                         │
//! │  POST <server_url>  (application/x-www-form-urlencoded)                 │
//! │                                                                         │
//! │  field        │ register      │ unregister    │ message_opened          │
//! │  ─────────────┼───────────────┼───────────────┼──────────────────       │
//! │  action       │ "register"    │ "unregister"  │ "message_opened"        │
//! │  appId        │ ✓             │ ✓             │ ✓                       │
//! │  clientSecret │ ✓             │ ✓             │ ✓                       │
//! │  type         │ ✓             │ ✓             │ ✓                       │
//! │  token        │ ✓             │ ✓             │ ✓                       │
//! │  tags         │ if non-empty  │ if non-empty  │ —                       │
//! │  uuid         │ —             │ —             │ message id              │
//! │                                                                         │
//! │  status 201 ⇒ newly created registration                                │
//! │  status 200 ⇒ updated / ok                                              │
//! │  anything else ⇒ transport error carrying status and body               │
//! │                                                                         │
//! │  register body: JSON {"clientUuid": "..."} ⇒ persisted client id        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;
use tracing::info;
use url::Url;
use uuid::Uuid;

use nimbus_core::TagSet;

use crate::backend::{BackendClient, RegistrationReply};
use crate::config::ClientConfig;
use crate::error::{PushError, PushResult};

// =============================================================================
// Wire Constants
// =============================================================================

const ACTION_REGISTER: &str = "register";
const ACTION_UNREGISTER: &str = "unregister";
const ACTION_MESSAGE_OPENED: &str = "message_opened";

// =============================================================================
// Form Construction
// =============================================================================

/// Builds the form fields shared by every action.
///
/// The `tags` field is included only when a non-empty set is supplied; an
/// absent argument and an explicitly empty set encode identically at the
/// wire, which the backend treats as "no tag filter".
fn form_fields(
    action: &str,
    app_id: &str,
    client_secret: &str,
    device_type: &str,
    token: &str,
    tags: Option<&TagSet>,
    message_id: Option<Uuid>,
) -> Vec<(&'static str, String)> {
    let mut fields = vec![
        ("action", action.to_string()),
        ("appId", app_id.to_string()),
        ("clientSecret", client_secret.to_string()),
        ("type", device_type.to_string()),
        ("token", token.to_string()),
    ];

    if let Some(tags) = tags {
        if !tags.is_empty() {
            fields.push(("tags", tags.encode()));
        }
    }

    if let Some(id) = message_id {
        fields.push(("uuid", id.to_string()));
    }

    fields
}

/// Parses the register response body.
fn parse_register_body(body: &str) -> PushResult<Uuid> {
    #[derive(Deserialize)]
    struct RegisterBody {
        #[serde(rename = "clientUuid")]
        client_uuid: Uuid,
    }

    let parsed: RegisterBody = serde_json::from_str(body)
        .map_err(|e| PushError::MalformedResponse(e.to_string()))?;
    Ok(parsed.client_uuid)
}

// =============================================================================
// HTTP Backend Client
// =============================================================================

/// [`BackendClient`] speaking the form-encoded registration protocol.
#[derive(Debug, Clone)]
pub struct HttpBackendClient {
    http: reqwest::Client,
    endpoint: Url,
    device_type: String,
}

impl HttpBackendClient {
    /// Creates a client with a fresh HTTP handle.
    pub fn new(config: &ClientConfig) -> PushResult<Self> {
        Self::with_http_client(reqwest::Client::new(), config)
    }

    /// Creates a client reusing an embedder-owned HTTP handle (connection
    /// pools are expensive; share one if the application already has one).
    pub fn with_http_client(http: reqwest::Client, config: &ClientConfig) -> PushResult<Self> {
        Ok(HttpBackendClient {
            http,
            endpoint: Url::parse(&config.server_url)?,
            device_type: config.device_type.clone(),
        })
    }

    async fn post(&self, fields: &[(&'static str, String)]) -> PushResult<(StatusCode, String)> {
        let response = self
            .http
            .post(self.endpoint.clone())
            .form(fields)
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }
}

#[async_trait]
impl BackendClient for HttpBackendClient {
    async fn register(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<RegistrationReply> {
        let fields = form_fields(
            ACTION_REGISTER,
            app_id,
            client_secret,
            &self.device_type,
            token,
            tags,
            None,
        );
        let (status, body) = self.post(&fields).await?;

        let created = match status {
            StatusCode::CREATED => true,
            StatusCode::OK => false,
            _ => {
                return Err(PushError::UnexpectedStatus {
                    status: status.as_u16(),
                    body,
                })
            }
        };

        let client_id = parse_register_body(&body)?;
        if created {
            info!(%client_id, "Registered push client");
        } else {
            info!(%client_id, "Push client registration refreshed");
        }

        Ok(RegistrationReply { client_id, created })
    }

    async fn unregister(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        tags: Option<&TagSet>,
    ) -> PushResult<()> {
        let fields = form_fields(
            ACTION_UNREGISTER,
            app_id,
            client_secret,
            &self.device_type,
            token,
            tags,
            None,
        );
        let (status, body) = self.post(&fields).await?;

        if status != StatusCode::OK {
            return Err(PushError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        info!("Unregistration confirmed by backend");
        Ok(())
    }

    async fn mark_message_opened(
        &self,
        app_id: &str,
        client_secret: &str,
        token: &str,
        message_id: Uuid,
    ) -> PushResult<()> {
        let fields = form_fields(
            ACTION_MESSAGE_OPENED,
            app_id,
            client_secret,
            &self.device_type,
            token,
            None,
            Some(message_id),
        );
        let (status, body) = self.post(&fields).await?;

        if status != StatusCode::OK {
            return Err(PushError::UnexpectedStatus {
                status: status.as_u16(),
                body,
            });
        }

        info!(%message_id, "Message open confirmed by backend");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

//! # Client Configuration
//!
//! Configuration for a push client instance. There is no process-global
//! state: a [`ClientConfig`] is built once by the embedder and handed to
//! [`PushClient::new`](crate::PushClient::new), which validates it before
//! any operation can run.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     NIMBUS_SERVER_URL=https://staging.push.example/push                 │
//! │     NIMBUS_DEVICE_TYPE=android                                          │
//! │                                                                         │
//! │  2. Constructor arguments                                               │
//! │     sender id, app id, client secret                                    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                    │
//! │     production endpoint, device type "android"                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::debug;
use url::Url;

use crate::error::{PushError, PushResult};

/// Production registration endpoint.
const DEFAULT_SERVER_URL: &str = "https://push.nimbuscloud.io/push";

/// Default `type` field sent with every backend call.
const DEFAULT_DEVICE_TYPE: &str = "android";

// =============================================================================
// Client Configuration
// =============================================================================

/// Configuration for one push client instance.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Messaging-platform sender id. The client carries it for the token
    /// provider collaborator; the registration protocol itself never sends
    /// it.
    pub sender_id: String,

    /// Backend application id.
    pub app_id: String,

    /// Backend client secret.
    pub client_secret: String,

    /// Registration endpoint URL.
    pub server_url: String,

    /// Device type reported in the `type` wire field.
    pub device_type: String,
}

impl ClientConfig {
    /// Creates a config for the production endpoint, then applies
    /// environment overrides.
    pub fn new(
        sender_id: impl Into<String>,
        app_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        let mut config = ClientConfig {
            sender_id: sender_id.into(),
            app_id: app_id.into(),
            client_secret: client_secret.into(),
            server_url: DEFAULT_SERVER_URL.to_string(),
            device_type: DEFAULT_DEVICE_TYPE.to_string(),
        };
        config.apply_env_overrides();
        config
    }

    /// Validates the configuration.
    pub fn validate(&self) -> PushResult<()> {
        if self.app_id.is_empty() {
            return Err(PushError::InvalidConfig("app_id must not be empty".into()));
        }
        if self.client_secret.is_empty() {
            return Err(PushError::InvalidConfig(
                "client_secret must not be empty".into(),
            ));
        }

        let url = Url::parse(&self.server_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(PushError::InvalidConfig(format!(
                "Server URL must be http or https, got: {}",
                self.server_url
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(url) = std::env::var("NIMBUS_SERVER_URL") {
            debug!(url = %url, "Overriding server URL from environment");
            self.server_url = url;
        }

        if let Ok(device_type) = std::env::var("NIMBUS_DEVICE_TYPE") {
            debug!(device_type = %device_type, "Overriding device type from environment");
            self.device_type = device_type;
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> ClientConfig {
        ClientConfig {
            sender_id: "sender-1".into(),
            app_id: "app-1".into(),
            client_secret: "secret-1".into(),
            server_url: DEFAULT_SERVER_URL.into(),
            device_type: DEFAULT_DEVICE_TYPE.into(),
        }
    }

    #[test]
    fn test_default_config_validates() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn test_empty_app_id_fails() {
        let mut config = base_config();
        config.app_id = String::new();
        assert!(matches!(config.validate(), Err(PushError::InvalidConfig(_))));
    }

    #[test]
    fn test_empty_secret_fails() {
        let mut config = base_config();
        config.client_secret = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_non_http_url_fails() {
        let mut config = base_config();
        config.server_url = "ftp://push.example/push".into();
        assert!(config.validate().is_err());

        config.server_url = "not a url".into();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_http_url_passes() {
        let mut config = base_config();
        config.server_url = "http://localhost:8080/push".into();
        assert!(config.validate().is_ok());
    }
}

//! Configuration schema definitions.
//!
//! Non-secret settings derive Serde traits so they can come from a TOML file.
//! Secrets live in [`CredentialSources`], which is skipped by serde and only
//! ever filled from the environment.

use serde::{Deserialize, Serialize};

use crate::config::loader::{ConfigError, ENV_API_KEY, ENV_INSTANCE_ID, ENV_SHOPIFY_SECRET};
use crate::config::secret::Secret;

/// Root configuration for the webhook relay.
#[derive(Debug, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RelayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Downstream automation API settings.
    pub maistro: MaistroConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Request limits.
    pub security: SecurityConfig,

    /// Required secrets and identifiers, environment only.
    #[serde(skip)]
    pub credentials: CredentialSources,
}

impl RelayConfig {
    /// Resolve the values every webhook needs before any signature work.
    ///
    /// Fails with [`ConfigError::Missing`] naming each absent variable.
    pub fn credentials(&self) -> Result<Credentials<'_>, ConfigError> {
        let sources = &self.credentials;
        let mut missing = Vec::new();
        if sources.shopify_secret.is_none() {
            missing.push(ENV_SHOPIFY_SECRET);
        }
        if sources.api_key.is_none() {
            missing.push(ENV_API_KEY);
        }
        if sources.instance_id.is_none() {
            missing.push(ENV_INSTANCE_ID);
        }

        match (&sources.shopify_secret, &sources.api_key, &sources.instance_id) {
            (Some(shopify_secret), Some(api_key), Some(instance_id)) => Ok(Credentials {
                shopify_secret,
                api_key,
                instance_id,
            }),
            _ => Err(ConfigError::Missing(missing)),
        }
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Downstream automation API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MaistroConfig {
    /// Endpoint prefix; the instance id and `maistro` are appended as path segments.
    pub base_url: String,

    /// Value of the `overrideagent` header.
    pub override_agent: String,

    /// Value of the `debug` header.
    pub debug: String,
}

impl Default for MaistroConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api-usw.neuralseek.com/v1".to_string(),
            override_agent: "test_order_fulfilled".to_string(),
            debug: "false".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Deadline for the single outbound call, in seconds.
    pub forward_secs: u64,

    /// Deadline for a whole inbound request, in seconds. Must exceed `forward_secs`.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            forward_secs: 25,
            request_secs: 30,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Default filter when `RUST_LOG` is unset.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Prometheus exporter bind address; disabled when unset.
    pub metrics_address: Option<String>,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_address: None,
        }
    }
}

/// Inbound request limits.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 2 * 1024 * 1024, // 2MB
        }
    }
}

/// Raw required values as found in the environment. `None` means absent or empty.
#[derive(Debug, Default)]
pub struct CredentialSources {
    pub shopify_secret: Option<Secret<String>>,
    pub api_key: Option<Secret<String>>,
    pub instance_id: Option<String>,
}

/// Required values, all present, borrowed for one webhook.
#[derive(Debug, Clone, Copy)]
pub struct Credentials<'a> {
    pub shopify_secret: &'a Secret<String>,
    pub api_key: &'a Secret<String>,
    pub instance_id: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RelayConfig::default();
        assert_eq!(config.listener.bind_address, "0.0.0.0:8080");
        assert_eq!(config.maistro.override_agent, "test_order_fulfilled");
        assert_eq!(config.maistro.debug, "false");
        assert_eq!(config.timeouts.forward_secs, 25);
        assert_eq!(config.observability.log_format, LogFormat::Pretty);
    }

    #[test]
    fn test_credentials_lists_every_missing_variable() {
        let config = RelayConfig::default();
        match config.credentials() {
            Err(ConfigError::Missing(names)) => {
                assert_eq!(names, vec![ENV_SHOPIFY_SECRET, ENV_API_KEY, ENV_INSTANCE_ID]);
            }
            other => panic!("expected missing credentials, got {:?}", other),
        }
    }

    #[test]
    fn test_credentials_resolve_when_present() {
        let mut config = RelayConfig::default();
        config.credentials = CredentialSources {
            shopify_secret: Some(Secret::new("s".into())),
            api_key: Some(Secret::new("k".into())),
            instance_id: Some("acme".into()),
        };

        let creds = config.credentials().unwrap();
        assert_eq!(creds.shopify_secret.expose_secret(), "s");
        assert_eq!(creds.api_key.expose_secret(), "k");
        assert_eq!(creds.instance_id, "acme");
    }

    #[test]
    fn test_toml_never_carries_secrets() {
        let config: RelayConfig = toml::from_str(
            r#"
            [maistro]
            override_agent = "order_paid"

            [credentials]
            shopify_secret = "leaked"
            "#,
        )
        .unwrap();

        assert_eq!(config.maistro.override_agent, "order_paid");
        assert!(config.credentials.shopify_secret.is_none());
    }
}

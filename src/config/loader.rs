//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{LogFormat, RelayConfig};
use crate::config::secret::Secret;
use crate::config::validation::{validate_config, ValidationError};

pub const ENV_SHOPIFY_SECRET: &str = "SHOPIFY_SECRET";
pub const ENV_API_KEY: &str = "MAISTRO_API_KEY";
pub const ENV_INSTANCE_ID: &str = "MAISTRO_INSTANCE_ID";
pub const ENV_OVERRIDE_AGENT: &str = "MAISTRO_OVERRIDE_AGENT";
pub const ENV_DEBUG: &str = "MAISTRO_DEBUG";
pub const ENV_BASE_URL: &str = "MAISTRO_BASE_URL";
pub const ENV_TIMEOUT_SECS: &str = "MAISTRO_TIMEOUT_SECS";
pub const ENV_BIND_ADDRESS: &str = "RELAY_BIND_ADDRESS";
pub const ENV_LOG_FORMAT: &str = "RELAY_LOG_FORMAT";
pub const ENV_METRICS_ADDRESS: &str = "METRICS_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Missing required environment variables: {}", .0.join(", "))]
    Missing(Vec<&'static str>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load configuration from an optional TOML file and the process environment.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    load_config_with(path, |name| std::env::var(name).ok())
}

/// Same as [`load_config`], reading variables through `lookup`.
pub fn load_config_with<F>(path: Option<&Path>, lookup: F) -> Result<RelayConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => RelayConfig::default(),
    };

    apply_env(&mut config, lookup)?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment variables onto `config`. Empty values count as absent.
pub fn apply_env<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|value| !value.is_empty());

    config.credentials.shopify_secret = var(ENV_SHOPIFY_SECRET).map(Secret::new);
    config.credentials.api_key = var(ENV_API_KEY).map(Secret::new);
    config.credentials.instance_id = var(ENV_INSTANCE_ID);

    // An empty override agent or debug flag keeps the default instead of
    // sending an empty string downstream.
    if let Some(agent) = var(ENV_OVERRIDE_AGENT) {
        config.maistro.override_agent = agent;
    }
    if let Some(debug) = var(ENV_DEBUG) {
        config.maistro.debug = debug;
    }
    if let Some(base_url) = var(ENV_BASE_URL) {
        config.maistro.base_url = base_url;
    }
    if let Some(value) = var(ENV_TIMEOUT_SECS) {
        config.timeouts.forward_secs = value.parse().map_err(|_| ConfigError::InvalidEnv {
            name: ENV_TIMEOUT_SECS,
            value: value.clone(),
        })?;
    }
    if let Some(address) = var(ENV_BIND_ADDRESS) {
        config.listener.bind_address = address;
    }
    if let Some(value) = var(ENV_LOG_FORMAT) {
        config.observability.log_format = match value.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => {
                return Err(ConfigError::InvalidEnv {
                    name: ENV_LOG_FORMAT,
                    value,
                })
            }
        };
    }
    if let Some(address) = var(ENV_METRICS_ADDRESS) {
        config.observability.metrics_address = Some(address);
    }

    Ok(())
}

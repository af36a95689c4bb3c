//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! built-in defaults
//!     → loader.rs (optional TOML file, then environment overrides)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → shared via Arc with the request handler
//!
//! Per webhook:
//!     RelayConfig::credentials() → Credentials or "Configuration error" (500)
//! ```
//!
//! # Design Decisions
//! - Config is read once at startup; handlers only ever borrow it
//! - Secrets come from the environment only, never from the TOML file
//! - Missing secrets do not stop the server; each webhook is rejected instead
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod secret;
pub mod validation;

pub use loader::{apply_env, load_config, load_config_with, ConfigError};
pub use schema::{
    CredentialSources, Credentials, ListenerConfig, LogFormat, MaistroConfig,
    ObservabilityConfig, RelayConfig, SecurityConfig, TimeoutConfig,
};
pub use secret::Secret;

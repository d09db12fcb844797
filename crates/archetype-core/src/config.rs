//! Server configuration.
//!
//! Provides [`ServerConfig`] for the reference Archetype server. Values are
//! loaded from environment variables.

use std::fmt;

use archetype_auth::{Credentials, DEFAULT_REPLAY_WINDOW_SECS};
use archetype_http::service::DEFAULT_MAX_BODY_BYTES;
use typed_builder::TypedBuilder;

/// Reference server configuration.
///
/// # Examples
///
/// ```
/// use archetype_core::config::ServerConfig;
///
/// let config = ServerConfig::default();
/// assert_eq!(config.gateway_listen, "0.0.0.0:3000");
/// assert!(!config.skip_signature_validation);
/// assert!(config.credentials().is_none());
/// ```
#[derive(Clone, TypedBuilder)]
pub struct ServerConfig {
    /// Bind address (e.g. `"0.0.0.0:3000"`).
    #[builder(default = String::from("0.0.0.0:3000"), setter(into))]
    pub gateway_listen: String,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"), setter(into))]
    pub log_level: String,

    /// JSON seed file for the catalog. Unset means an empty catalog.
    #[builder(default, setter(strip_option, into))]
    pub data_file: Option<String>,

    /// Whether to skip signature validation on incoming requests.
    #[builder(default = false)]
    pub skip_signature_validation: bool,

    /// Allowed clock skew in seconds, in either direction.
    #[builder(default = DEFAULT_REPLAY_WINDOW_SECS)]
    pub replay_window_secs: u64,

    /// Largest accepted request body in bytes.
    #[builder(default = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// API key accepted by the verifier.
    #[builder(default, setter(strip_option, into))]
    pub api_key: Option<String>,

    /// Secret for `api_key`.
    #[builder(default, setter(strip_option, into))]
    pub api_secret: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServerConfig")
            .field("gateway_listen", &self.gateway_listen)
            .field("log_level", &self.log_level)
            .field("data_file", &self.data_file)
            .field("skip_signature_validation", &self.skip_signature_validation)
            .field("replay_window_secs", &self.replay_window_secs)
            .field("max_body_bytes", &self.max_body_bytes)
            .field("api_key", &self.api_key)
            .field("api_secret", &self.api_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `GATEWAY_LISTEN` | `0.0.0.0:3000` |
    /// | `LOG_LEVEL` | `info` |
    /// | `ARCHETYPE_DATA_FILE` | *(unset)* |
    /// | `SKIP_SIGNATURE_VALIDATION` | `false` |
    /// | `REPLAY_WINDOW_SECS` | `300` |
    /// | `MAX_BODY_BYTES` | `65536` |
    /// | `INTERNAL_API_KEY` | *(unset)* |
    /// | `INTERNAL_API_SECRET` | *(unset)* |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unparseable numbers keep their default.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("GATEWAY_LISTEN") {
            config.gateway_listen = v;
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("ARCHETYPE_DATA_FILE").filter(|v| !v.is_empty()) {
            config.data_file = Some(v);
        }
        if let Some(v) = lookup("SKIP_SIGNATURE_VALIDATION") {
            config.skip_signature_validation = parse_bool(&v);
        }
        if let Some(v) = lookup("REPLAY_WINDOW_SECS") {
            if let Ok(n) = v.trim().parse::<u64>() {
                config.replay_window_secs = n;
            }
        }
        if let Some(v) = lookup("MAX_BODY_BYTES") {
            if let Ok(n) = v.trim().parse::<usize>() {
                config.max_body_bytes = n;
            }
        }
        if let Some(v) = lookup("INTERNAL_API_KEY").filter(|v| !v.is_empty()) {
            config.api_key = Some(v);
        }
        if let Some(v) = lookup("INTERNAL_API_SECRET").filter(|v| !v.is_empty()) {
            config.api_secret = Some(v);
        }

        config
    }

    /// The configured credential pair, if both halves are set.
    #[must_use]
    pub fn credentials(&self) -> Option<Credentials> {
        match (&self.api_key, &self.api_secret) {
            (Some(key), Some(secret)) => Some(Credentials::new(key.clone(), secret.clone())),
            _ => None,
        }
    }
}

/// Parse a string as a boolean, accepting `"1"`, `"true"` and `"yes"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    let value = value.trim();
    value == "1" || value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("yes")
}

//! Client configuration.
//!
//! Deployments pass credentials through the environment:
//!
//! | Variable | Default |
//! |----------|---------|
//! | `ARCHETYPE_API_URL` | `http://localhost:3000` |
//! | `INTERNAL_API_KEY` | *(required)* |
//! | `INTERNAL_API_SECRET` | *(required)* |
//! | `ARCHETYPE_API_TIMEOUT_SECS` | `30` |

use std::time::Duration;

use archetype_auth::Credentials;
use typed_builder::TypedBuilder;

use crate::error::ConfigError;

/// Base URL used when `ARCHETYPE_API_URL` is not set.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Per-request timeout used when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Configuration for [`ArchetypeClient`](crate::ArchetypeClient).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
///
/// use archetype_client::{ClientConfig, Credentials};
///
/// let config = ClientConfig::builder()
///     .base_url("https://api.example.com/")
///     .credentials(Credentials::new("key", "secret"))
///     .timeout(Duration::from_secs(5))
///     .build();
/// assert_eq!(config.timeout, Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, TypedBuilder)]
pub struct ClientConfig {
    /// Base URL of the API, e.g. `https://api.example.com`. A trailing `/` is ignored.
    #[builder(setter(into))]
    pub base_url: String,

    /// API key and secret used to sign every request.
    pub credentials: Credentials,

    /// Per-request timeout covering connect, send and body read.
    #[builder(default = DEFAULT_TIMEOUT)]
    pub timeout: Duration,

    /// `User-Agent` header value.
    #[builder(default = default_user_agent(), setter(into))]
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a configuration with default timeout and user agent.
    #[must_use]
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        api_secret: impl Into<String>,
    ) -> Self {
        Self::builder()
            .base_url(base_url)
            .credentials(Credentials::new(api_key, api_secret))
            .build()
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Values are trimmed; empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let api_key = get("INTERNAL_API_KEY").ok_or(ConfigError::MissingEnv("INTERNAL_API_KEY"))?;
        let api_secret =
            get("INTERNAL_API_SECRET").ok_or(ConfigError::MissingEnv("INTERNAL_API_SECRET"))?;
        let base_url = get("ARCHETYPE_API_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());

        let timeout = match get("ARCHETYPE_API_TIMEOUT_SECS") {
            Some(v) => match v.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidEnv {
                        name: "ARCHETYPE_API_TIMEOUT_SECS",
                        value: v,
                    });
                }
            },
            None => DEFAULT_TIMEOUT,
        };

        Ok(Self::builder()
            .base_url(base_url)
            .credentials(Credentials::new(api_key, api_secret))
            .timeout(timeout)
            .build())
    }
}

fn default_user_agent() -> String {
    format!("archetype-client/{}", env!("CARGO_PKG_VERSION"))
}

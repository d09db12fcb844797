//! Credentials and credential lookup.
//!
//! The client holds one [`Credentials`] pair for its whole lifetime. The
//! server resolves secrets by API key through the [`CredentialProvider`]
//! trait, with [`StaticCredentialProvider`] as the in-memory implementation.

use std::collections::HashMap;
use std::fmt;

use crate::error::AuthError;

/// An API key and the secret it signs with.
///
/// `Debug` output redacts the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    api_key: String,
    api_secret: String,
}

impl Credentials {
    /// Create a credential pair.
    #[must_use]
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: api_secret.into(),
        }
    }

    /// The public API key sent in `X-API-Key`.
    #[must_use]
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// The HMAC secret. Never sent over the wire.
    #[must_use]
    pub fn api_secret(&self) -> &str {
        &self.api_secret
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &self.api_key)
            .field("api_secret", &"***")
            .finish()
    }
}

/// Trait for looking up the signing secret of an API key.
///
/// Implementations may back this with a database, configuration file,
/// or any other credential store. Lookup must be an exact match on the key.
pub trait CredentialProvider: Send + Sync {
    /// Retrieve the secret for the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::ApiKeyNotFound`] if the API key is not recognized.
    fn get_secret(&self, api_key: &str) -> Result<String, AuthError>;
}

/// A simple in-memory credential provider backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use archetype_auth::credentials::{CredentialProvider, StaticCredentialProvider};
///
/// let provider = StaticCredentialProvider::new(vec![
///     ("desk-key".to_owned(), "desk-secret".to_owned()),
/// ]);
///
/// assert_eq!(provider.get_secret("desk-key").unwrap(), "desk-secret");
/// assert!(provider.get_secret("DESK-KEY").is_err());
/// ```
#[derive(Clone, Default)]
pub struct StaticCredentialProvider {
    credentials: HashMap<String, String>,
}

impl StaticCredentialProvider {
    /// Create a provider from an iterable of (api_key, api_secret) pairs.
    pub fn new(credentials: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            credentials: credentials.into_iter().collect(),
        }
    }

    /// Number of known API keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether no API keys are configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl From<Credentials> for StaticCredentialProvider {
    fn from(credentials: Credentials) -> Self {
        Self::new([(credentials.api_key, credentials.api_secret)])
    }
}

impl fmt::Debug for StaticCredentialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.credentials.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("StaticCredentialProvider")
            .field("api_keys", &keys)
            .finish()
    }
}

impl CredentialProvider for StaticCredentialProvider {
    fn get_secret(&self, api_key: &str) -> Result<String, AuthError> {
        self.credentials
            .get(api_key)
            .cloned()
            .ok_or_else(|| AuthError::ApiKeyNotFound(api_key.to_owned()))
    }
}

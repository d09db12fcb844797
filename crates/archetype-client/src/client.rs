//! The signed Archetype API client.

use std::sync::Arc;

use archetype_auth::{Credentials, SignedRequest};
use archetype_model::protocol::{
    ARCHETYPE_PATH_PREFIX, CONTENT_TYPE_JSON, HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP,
    STRATEGY_PATH_PREFIX,
};
use archetype_model::{ArchetypeResult, StrategyArchetypesResult};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::{Method, RequestBuilder};
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ConfigError};

/// Characters left unescaped in a path segment (RFC 3986 unreserved set).
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Client for the Archetype API.
///
/// Every request is signed with HMAC-SHA256 over
/// `METHOD|PATH|TIMESTAMP[|BODY]`. Cloning is cheap and clones share the
/// connection pool.
#[derive(Debug, Clone)]
pub struct ArchetypeClient {
    http: reqwest::Client,
    base_url: Arc<str>,
    credentials: Arc<Credentials>,
}

impl ArchetypeClient {
    /// Build a client from configuration.
    pub fn new(config: ClientConfig) -> Result<Self, ConfigError> {
        let base_url = config.base_url.trim().trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://"))
            || base_url.contains(['?', '#'])
        {
            return Err(ConfigError::InvalidBaseUrl(config.base_url));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(ConfigError::HttpClient)?;

        debug!(
            base_url,
            api_key = config.credentials.api_key(),
            timeout_secs = config.timeout.as_secs(),
            "Archetype client configured"
        );

        Ok(Self {
            http,
            base_url: Arc::from(base_url),
            credentials: Arc::new(config.credentials),
        })
    }

    /// Build a client from `ARCHETYPE_API_URL`, `INTERNAL_API_KEY`,
    /// `INTERNAL_API_SECRET` and `ARCHETYPE_API_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Base URL without trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The API key sent with every request.
    #[must_use]
    pub fn api_key(&self) -> &str {
        self.credentials.api_key()
    }

    /// List the archetype IDs of a strategy.
    pub async fn get_strategy_archetypes(
        &self,
        sid: &str,
    ) -> Result<StrategyArchetypesResult, ClientError> {
        self.send_signed(Method::GET, &strategy_path(sid), None)
            .await
    }

    /// Fetch the portfolio of one archetype.
    pub async fn get_archetype(&self, archepid: &str) -> Result<ArchetypeResult, ClientError> {
        self.send_signed(Method::GET, &archetype_path(archepid), None)
            .await
    }

    /// Sign and send a request, decoding a 2xx body as `T`.
    ///
    /// `path` must already be percent-encoded and must not carry a query
    /// string. The signed path is the one the URL parser resolves, so dot
    /// segments such as `..` are removed before signing. A JSON body is
    /// serialized with sorted keys and those exact bytes are both signed and
    /// sent.
    pub async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        self.send_signed_with_query(method, path, &[], body).await
    }

    /// Like [`send_signed`](Self::send_signed), appending `query` as
    /// form-encoded pairs. The query string is sent but not signed.
    pub async fn send_signed_with_query<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, &str)],
        body: Option<&Value>,
    ) -> Result<T, ClientError> {
        let timestamp = chrono::Utc::now().timestamp();
        let mut request = self
            .http
            .request(method.clone(), format!("{}{path}", self.base_url))
            .header(HEADER_API_KEY, self.credentials.api_key())
            .header(HEADER_TIMESTAMP, timestamp.to_string())
            .header(CONTENT_TYPE, CONTENT_TYPE_JSON)
            .header(ACCEPT, CONTENT_TYPE_JSON)
            .build()?;
        if !query.is_empty() {
            request.url_mut().query_pairs_mut().extend_pairs(query);
        }

        let wire_path = request.url().path().to_owned();
        let mut signed = SignedRequest::new(method.as_str(), &wire_path, timestamp);
        if let Some(body) = body {
            signed = signed.with_json_body(body);
        }
        let signature = signed.sign(self.credentials.api_secret());

        debug!(%method, path = %wire_path, timestamp, "Sending signed request");

        let mut request = RequestBuilder::from_parts(self.http.clone(), request)
            .header(HEADER_SIGNATURE, signature.as_str());
        if let Some(body) = signed.body {
            request = request.body(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(%method, path = %wire_path, error = %e, "Request failed");
            ClientError::Transport(e)
        })?;
        let status = response.status();
        let bytes = response.bytes().await?;

        debug!(%method, path = %wire_path, %status, len = bytes.len(), "Received response");

        if !status.is_success() {
            let err = ClientError::from_response(status, &bytes);
            warn!(%method, path = %wire_path, %status, error = %err, "Request rejected");
            return Err(err);
        }

        serde_json::from_slice(&bytes).map_err(|e| ClientError::undecodable(status, &bytes, &e))
    }
}

/// Percent-encode a single path segment.
#[must_use]
pub fn encode_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Wire path for [`ArchetypeClient::get_strategy_archetypes`].
#[must_use]
pub fn strategy_path(sid: &str) -> String {
    format!("{STRATEGY_PATH_PREFIX}{}", encode_segment(sid))
}

/// Wire path for [`ArchetypeClient::get_archetype`].
#[must_use]
pub fn archetype_path(archepid: &str) -> String {
    format!("{ARCHETYPE_PATH_PREFIX}{}", encode_segment(archepid))
}

//! Server-side request verification.
//!
//! The verification flow is:
//!
//! 1. Extract `X-API-Key`, `X-Timestamp` and `X-Signature`.
//! 2. Resolve the secret for the API key (exact match).
//! 3. Reject timestamps more than the replay window away from server time,
//!    in either direction.
//! 4. Rebuild the canonical string from the actual method, path, timestamp
//!    header and canonicalized JSON body.
//! 5. Compare the expected digest against the provided one in constant time.
//!
//! The main entry point is [`Verifier::verify`].

use std::fmt;
use std::sync::Arc;

use archetype_model::protocol::{HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};
use subtle::ConstantTimeEq;
use tracing::debug;

use crate::canonical::{build_canonical_string, canonical_json};
use crate::credentials::CredentialProvider;
use crate::error::AuthError;
use crate::signer::hmac_sha256;

/// Default replay window in seconds.
pub const DEFAULT_REPLAY_WINDOW_SECS: u64 = 300;

/// Length of a hex-encoded SHA-256 digest.
const SIGNATURE_HEX_LEN: usize = 64;

/// The result of a successful verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    /// The API key that signed the request.
    pub api_key: String,
    /// The signed timestamp.
    pub timestamp: i64,
}

/// Verifies signed requests against a credential store.
#[derive(Clone)]
pub struct Verifier {
    credential_provider: Arc<dyn CredentialProvider>,
    replay_window_secs: u64,
}

impl fmt::Debug for Verifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Verifier")
            .field("credential_provider", &"...")
            .field("replay_window_secs", &self.replay_window_secs)
            .finish()
    }
}

impl Verifier {
    /// Create a verifier with the default ±300 second replay window.
    #[must_use]
    pub fn new(credential_provider: Arc<dyn CredentialProvider>) -> Self {
        Self {
            credential_provider,
            replay_window_secs: DEFAULT_REPLAY_WINDOW_SECS,
        }
    }

    /// Override the replay window.
    #[must_use]
    pub fn with_replay_window(mut self, secs: u64) -> Self {
        self.replay_window_secs = secs;
        self
    }

    /// The configured replay window in seconds.
    #[must_use]
    pub fn replay_window_secs(&self) -> u64 {
        self.replay_window_secs
    }

    /// Verify a request against the current wall clock.
    pub fn verify(
        &self,
        parts: &http::request::Parts,
        body: &[u8],
    ) -> Result<AuthResult, AuthError> {
        self.verify_at(parts, body, chrono::Utc::now().timestamp())
    }

    /// Verify a request as if the server clock read `now` (unix seconds).
    pub fn verify_at(
        &self,
        parts: &http::request::Parts,
        body: &[u8],
        now: i64,
    ) -> Result<AuthResult, AuthError> {
        let api_key = extract_header(parts, HEADER_API_KEY)?;
        let timestamp_header = extract_header(parts, HEADER_TIMESTAMP)?;
        let signature_header = extract_header(parts, HEADER_SIGNATURE)?;

        let secret = self.credential_provider.get_secret(api_key)?;

        let timestamp: i64 = timestamp_header
            .parse()
            .map_err(|_| AuthError::InvalidTimestamp(timestamp_header.to_owned()))?;
        check_freshness(timestamp, now, self.replay_window_secs)?;

        let provided = decode_signature(signature_header)?;

        let body = canonical_body(body)?;
        let canonical = build_canonical_string(
            parts.method.as_str(),
            parts.uri.path(),
            timestamp_header,
            body.as_deref(),
        );

        debug!(api_key, canonical = %canonical, "Verifying request signature");

        let expected = hmac_sha256(secret.as_bytes(), canonical.as_bytes());

        if provided.as_slice().ct_eq(expected.as_slice()).into() {
            debug!(api_key, "Signature verification succeeded");
            Ok(AuthResult {
                api_key: api_key.to_owned(),
                timestamp,
            })
        } else {
            debug!(api_key, "Signature mismatch");
            Err(AuthError::SignatureDoesNotMatch)
        }
    }
}

/// Check that `timestamp` is within `window` seconds of `now`.
///
/// The check is symmetric: a request exactly `window` seconds old or ahead
/// is accepted, one second more is rejected.
///
/// # Examples
///
/// ```
/// use archetype_auth::verify::check_freshness;
///
/// assert!(check_freshness(1_000 - 300, 1_000, 300).is_ok());
/// assert!(check_freshness(1_000 + 301, 1_000, 300).is_err());
/// ```
pub fn check_freshness(timestamp: i64, now: i64, window: u64) -> Result<(), AuthError> {
    let skew = now.abs_diff(timestamp);
    if skew > window {
        debug!(timestamp, now, skew, window, "Request timestamp outside replay window");
        return Err(AuthError::RequestExpired { skew, window });
    }
    Ok(())
}

/// Extract a header value as a string from the request parts.
fn extract_header<'a>(
    parts: &'a http::request::Parts,
    name: &'static str,
) -> Result<&'a str, AuthError> {
    parts
        .headers
        .get(name)
        .ok_or(AuthError::MissingHeader(name))?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader(name))
}

/// Decode the provided hex signature into raw digest bytes.
fn decode_signature(signature: &str) -> Result<Vec<u8>, AuthError> {
    if signature.len() != SIGNATURE_HEX_LEN {
        return Err(AuthError::MalformedSignature);
    }
    hex::decode(signature).map_err(|_| AuthError::MalformedSignature)
}

/// Canonicalize a request body. An empty body means no body.
fn canonical_body(body: &[u8]) -> Result<Option<String>, AuthError> {
    if body.is_empty() {
        return Ok(None);
    }
    let value: serde_json::Value =
        serde_json::from_slice(body).map_err(|e| AuthError::InvalidBody(e.to_string()))?;
    Ok(Some(canonical_json(&value)))
}

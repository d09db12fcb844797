//! HMAC-SHA256 request signing.

use std::fmt;

use hmac::{Hmac, KeyInit, Mac};
use serde_json::Value;
use sha2::Sha256;

use crate::canonical::{build_canonical_string, canonical_json};

type HmacSha256 = Hmac<Sha256>;

/// A hex-encoded (lowercase) HMAC-SHA256 signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature(String);

impl Signature {
    /// The hex string, as sent in the `X-Signature` header.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the signature and return the hex string.
    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The tuple whose canonical concatenation is signed.
///
/// # Examples
///
/// ```
/// use archetype_auth::SignedRequest;
///
/// let request = SignedRequest::new("POST", "/internal/orders", 1_700_000_000)
///     .with_json_body(&serde_json::json!({"b": 1, "a": 2}));
/// assert_eq!(request.body.as_deref(), Some(r#"{"a":2,"b":1}"#));
/// assert_eq!(
///     request.canonical_string(),
///     r#"POST|/internal/orders|1700000000|{"a":2,"b":1}"#
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// HTTP method; uppercased when the canonical string is built.
    pub method: String,
    /// Request path without scheme, host or query string.
    pub path: String,
    /// Unix timestamp in seconds.
    pub timestamp: i64,
    /// Request body exactly as it will be sent, if any.
    pub body: Option<String>,
}

impl SignedRequest {
    /// Create a bodiless request.
    #[must_use]
    pub fn new(method: impl Into<String>, path: impl Into<String>, timestamp: i64) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            timestamp,
            body: None,
        }
    }

    /// Attach a raw body. The caller must send these exact bytes.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Attach a JSON body, rendered in canonical form.
    #[must_use]
    pub fn with_json_body(self, value: &Value) -> Self {
        self.with_body(canonical_json(value))
    }

    /// Build the canonical string for this request.
    #[must_use]
    pub fn canonical_string(&self) -> String {
        build_canonical_string(
            &self.method,
            &self.path,
            &self.timestamp.to_string(),
            self.body.as_deref(),
        )
    }

    /// Sign this request under `secret`.
    #[must_use]
    pub fn sign(&self, secret: &str) -> Signature {
        compute_signature(secret, &self.canonical_string())
    }
}

/// Compute `hex(HMAC_SHA256(secret, canonical))`.
///
/// # Examples
///
/// ```
/// use archetype_auth::compute_signature;
///
/// // RFC 4231 test case 2.
/// assert_eq!(
///     compute_signature("Jefe", "what do ya want for nothing?").as_str(),
///     "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
/// );
/// ```
#[must_use]
pub fn compute_signature(secret: &str, canonical: &str) -> Signature {
    Signature(hex::encode(hmac_sha256(
        secret.as_bytes(),
        canonical.as_bytes(),
    )))
}

/// Compute HMAC-SHA256 and return the raw bytes.
pub(crate) fn hmac_sha256(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC can accept keys of any length");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}

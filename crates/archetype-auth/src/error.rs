//! Error types for request verification.
//!
//! Every verification failure is an [`AuthError`]; the HTTP layer renders all
//! of them as `401 Unauthorized`.

/// Errors that can occur while verifying a signed request.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// A required authentication header is missing.
    #[error("Missing required header: {0}")]
    MissingHeader(&'static str),

    /// A header is present but is not valid visible ASCII.
    #[error("Invalid header value: {0}")]
    InvalidHeader(&'static str),

    /// `X-Timestamp` is not an integer number of seconds.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// `X-Signature` is not a 64-character hex string.
    #[error("Malformed signature")]
    MalformedSignature,

    /// The API key is not known to the credential store.
    #[error("Invalid API key")]
    ApiKeyNotFound(String),

    /// The timestamp is outside the replay window.
    #[error("Request timestamp outside of {window}s window (skew {skew}s)")]
    RequestExpired {
        /// Absolute difference between server time and request time.
        skew: u64,
        /// Allowed window in seconds.
        window: u64,
    },

    /// The request body is not valid JSON and cannot be canonicalized.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The computed signature does not match the provided signature.
    #[error("Signature does not match")]
    SignatureDoesNotMatch,
}

//! Client error types.
//!
//! [`ClientError`] is returned by every API call. [`ConfigError`] is returned
//! only while building an [`ArchetypeClient`](crate::ArchetypeClient).

use archetype_model::ErrorBody;
use reqwest::StatusCode;

/// Fallback message for a 401/403 with no usable body.
const AUTHENTICATION_FAILED: &str = "Authentication failed";

/// Errors returned by [`ArchetypeClient`](crate::ArchetypeClient) calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server rejected the credentials or signature (401 or 403).
    #[error("[{status}] {message}")]
    Authentication {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// `errmsg` from the error envelope, or the raw body.
        message: String,
    },

    /// Any other non-2xx response, or a 2xx body that could not be decoded.
    #[error("[{status}] {}{message}", .error_code.map(|c| format!("Error {c}: ")).unwrap_or_default())]
    Api {
        /// HTTP status returned by the server.
        status: StatusCode,
        /// `errmsg` from the error envelope, or a generic description.
        message: String,
        /// `errorcode` from the error envelope, if present.
        error_code: Option<i64>,
        /// Raw response body.
        body: String,
    },

    /// The request never produced a response: DNS, connect, TLS, timeout.
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl ClientError {
    /// HTTP status of the response, if one was received.
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Authentication { status, .. } | Self::Api { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
        }
    }

    /// Application error code from the error envelope.
    #[must_use]
    pub fn error_code(&self) -> Option<i64> {
        match self {
            Self::Api { error_code, .. } => *error_code,
            _ => None,
        }
    }

    /// Whether this is an authentication failure.
    #[must_use]
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication { .. })
    }

    /// Classify a non-2xx response.
    #[must_use]
    pub fn from_response(status: StatusCode, body: &[u8]) -> Self {
        let envelope = serde_json::from_slice::<ErrorBody>(body).ok();
        let raw = String::from_utf8_lossy(body).into_owned();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let message = match envelope {
                Some(envelope) => envelope.errmsg,
                None if !raw.trim().is_empty() => raw.trim().to_owned(),
                None => AUTHENTICATION_FAILED.to_owned(),
            };
            return Self::Authentication { status, message };
        }

        let (message, error_code) = match envelope {
            Some(envelope) => (envelope.errmsg, envelope.errorcode),
            None => (format!("API error: {}", status.as_u16()), None),
        };
        Self::Api {
            status,
            message,
            error_code,
            body: raw,
        }
    }

    /// A 2xx response whose body did not match the expected shape.
    #[must_use]
    pub fn undecodable(status: StatusCode, body: &[u8], source: &serde_json::Error) -> Self {
        Self::Api {
            status,
            message: format!("Invalid response body: {source}"),
            error_code: None,
            body: String::from_utf8_lossy(body).into_owned(),
        }
    }
}

/// Errors raised while building a client.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty.
    #[error("Missing environment variable: {0}")]
    MissingEnv(&'static str),

    /// An environment variable could not be parsed.
    #[error("Invalid value for {name}: {value:?}")]
    InvalidEnv {
        /// Variable name.
        name: &'static str,
        /// Offending value.
        value: String,
    },

    /// The base URL is not an absolute `http` or `https` URL.
    #[error("Invalid base URL: {0:?}")]
    InvalidBaseUrl(String),

    /// The underlying HTTP client could not be constructed.
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

//! API error types.
//!
//! Every non-2xx response from the server carries the same JSON envelope:
//!
//! ```json
//! {"errmsg": "Archetype not found: A052-x", "errorcode": 2004}
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known API error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ApiErrorCode {
    /// Missing, malformed, expired or mismatched request signature.
    AuthenticationFailed,
    /// Malformed identifier or request.
    BadRequest,
    /// The requested strategy or archetype does not exist.
    NotFound,
    /// The path exists but not for this HTTP method.
    MethodNotAllowed,
    /// The request body exceeds the server's size limit.
    PayloadTooLarge,
    /// Unexpected server-side failure.
    #[default]
    InternalError,
}

impl ApiErrorCode {
    /// Numeric code written to the `errorcode` field.
    #[must_use]
    pub fn code(&self) -> i64 {
        match self {
            Self::AuthenticationFailed => 1001,
            Self::BadRequest => 2001,
            Self::NotFound => 2004,
            Self::MethodNotAllowed => 2005,
            Self::PayloadTooLarge => 2013,
            Self::InternalError => 5000,
        }
    }

    /// Returns the short error code string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed => "AuthenticationFailed",
            Self::BadRequest => "BadRequest",
            Self::NotFound => "NotFound",
            Self::MethodNotAllowed => "MethodNotAllowed",
            Self::PayloadTooLarge => "PayloadTooLarge",
            Self::InternalError => "InternalError",
        }
    }

    /// Returns the default HTTP status code for this error.
    #[must_use]
    pub fn default_status_code(&self) -> http::StatusCode {
        match self {
            Self::AuthenticationFailed => http::StatusCode::UNAUTHORIZED,
            Self::BadRequest => http::StatusCode::BAD_REQUEST,
            Self::NotFound => http::StatusCode::NOT_FOUND,
            Self::MethodNotAllowed => http::StatusCode::METHOD_NOT_ALLOWED,
            Self::PayloadTooLarge => http::StatusCode::PAYLOAD_TOO_LARGE,
            Self::InternalError => http::StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ApiErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON error envelope sent with every non-2xx response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Human-readable error message.
    pub errmsg: String,
    /// Numeric error code, see [`ApiErrorCode::code`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errorcode: Option<i64>,
}

/// A server-side API error, rendered as an [`ErrorBody`] response.
#[derive(Debug)]
pub struct ApiError {
    /// The error code.
    pub code: ApiErrorCode,
    /// A human-readable error message.
    pub message: String,
    /// The HTTP status code.
    pub status_code: http::StatusCode,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ApiError({}): {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new `ApiError` with a custom message.
    #[must_use]
    pub fn with_message(code: ApiErrorCode, message: impl Into<String>) -> Self {
        Self {
            status_code: code.default_status_code(),
            message: message.into(),
            code,
        }
    }

    /// Authentication failed.
    #[must_use]
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::AuthenticationFailed, message)
    }

    /// Malformed request.
    #[must_use]
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::BadRequest, message)
    }

    /// Resource not found.
    #[must_use]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::NotFound, message)
    }

    /// Method not allowed on an existing path.
    #[must_use]
    pub fn method_not_allowed(method: &http::Method) -> Self {
        Self::with_message(
            ApiErrorCode::MethodNotAllowed,
            format!("Method not allowed: {method}"),
        )
    }

    /// Request body over `limit` bytes.
    #[must_use]
    pub fn payload_too_large(limit: usize) -> Self {
        Self::with_message(
            ApiErrorCode::PayloadTooLarge,
            format!("Request body exceeds {limit} bytes"),
        )
    }

    /// Internal server error.
    #[must_use]
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::with_message(ApiErrorCode::InternalError, message)
    }

    /// The JSON envelope for this error.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            errmsg: self.message.clone(),
            errorcode: Some(self.code.code()),
        }
    }
}

//! JSON response serialization and error formatting.

use archetype_model::error::ApiError;
use archetype_model::protocol::CONTENT_TYPE_JSON;
use bytes::Bytes;
use serde::Serialize;

use crate::body::ArchetypeResponseBody;

/// Content type of every response.
pub const CONTENT_TYPE: &str = CONTENT_TYPE_JSON;

/// Serialize an API error into its JSON envelope.
///
/// ```json
/// {"errmsg": "Archetype not found: A052-x", "errorcode": 2004}
/// ```
#[must_use]
pub fn error_to_json(error: &ApiError) -> Vec<u8> {
    serde_json::to_vec(&error.to_body()).expect("JSON serialization of error cannot fail")
}

/// Convert an `ApiError` into a complete HTTP error response.
#[must_use]
pub fn error_to_response(error: &ApiError) -> http::Response<ArchetypeResponseBody> {
    http::Response::builder()
        .status(error.status_code)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(ArchetypeResponseBody::new(Bytes::from(error_to_json(error))))
        .expect("valid error response")
}

/// Build a `200 OK` response from JSON bytes.
#[must_use]
pub fn json_response(json: Vec<u8>) -> http::Response<ArchetypeResponseBody> {
    http::Response::builder()
        .status(http::StatusCode::OK)
        .header(http::header::CONTENT_TYPE, CONTENT_TYPE)
        .body(ArchetypeResponseBody::new(Bytes::from(json)))
        .expect("valid JSON response")
}

/// Serialize `value` into a `200 OK` JSON response.
pub fn serialize<T: Serialize>(
    value: &T,
) -> Result<http::Response<ArchetypeResponseBody>, ApiError> {
    let json = serde_json::to_vec(value)
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize response: {e}")))?;
    Ok(json_response(json))
}

//! Response body type.

use bytes::Bytes;
use http_body_util::Full;

/// Response body for Archetype API responses.
///
/// Every response, success or error, is a fully buffered JSON document.
pub type ArchetypeResponseBody = Full<Bytes>;

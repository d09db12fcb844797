//! Header names and resource paths shared by client and server.

/// Header carrying the caller's API key.
pub const HEADER_API_KEY: &str = "x-api-key";

/// Header carrying the unix timestamp (seconds) the request was signed at.
pub const HEADER_TIMESTAMP: &str = "x-timestamp";

/// Header carrying the hex-encoded HMAC-SHA256 signature.
pub const HEADER_SIGNATURE: &str = "x-signature";

/// JSON content type used for every request and response body.
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Path prefix for the archetype lookup: `/internal/archetype/{archepid}`.
pub const ARCHETYPE_PATH_PREFIX: &str = "/internal/archetype/";

/// Path prefix for the strategy lookup: `/internal/archetype/strategy/{sid}`.
pub const STRATEGY_PATH_PREFIX: &str = "/internal/archetype/strategy/";

/// Unauthenticated liveness endpoint of the reference server.
pub const HEALTH_PATH: &str = "/health";

/// Length of a strategy ID, which is also the archepid prefix it groups.
pub const STRATEGY_ID_LEN: usize = 4;

//! Request router.
//!
//! The API exposes two read-only resources, both addressed by a single
//! trailing path segment:
//!
//! ```text
//! GET /internal/archetype/strategy/{sid}
//! GET /internal/archetype/{archepid}
//! ```
//!
//! `/health` is routed by the service before authentication and never
//! reaches this module.

use std::fmt;

use archetype_model::error::ApiError;
use archetype_model::protocol::{ARCHETYPE_PATH_PREFIX, STRATEGY_PATH_PREFIX};
use percent_encoding::percent_decode_str;

/// An authenticated API operation with its decoded path parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArchetypeOperation {
    /// List the archetype IDs of a strategy.
    StrategyArchetypes {
        /// Strategy ID.
        sid: String,
    },
    /// Fetch one archetype's portfolio.
    GetArchetype {
        /// Archetype ID.
        archepid: String,
    },
}

impl ArchetypeOperation {
    /// Operation name used in logs.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StrategyArchetypes { .. } => "StrategyArchetypes",
            Self::GetArchetype { .. } => "GetArchetype",
        }
    }
}

impl fmt::Display for ArchetypeOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolve an operation from the request method and path.
///
/// Unknown paths yield `404`, known paths with a method other than `GET`
/// yield `405`, and segments that are not valid percent-encoded UTF-8 yield
/// `400`.
pub fn resolve_operation(
    method: &http::Method,
    path: &str,
) -> Result<ArchetypeOperation, ApiError> {
    let (segment, is_strategy) = if let Some(rest) = path.strip_prefix(STRATEGY_PATH_PREFIX) {
        (rest, true)
    } else if let Some(rest) = path.strip_prefix(ARCHETYPE_PATH_PREFIX) {
        (rest, false)
    } else {
        return Err(not_found(path));
    };

    if segment.is_empty() || segment.contains('/') {
        return Err(not_found(path));
    }

    if method != http::Method::GET {
        return Err(ApiError::method_not_allowed(method));
    }

    let decoded = percent_decode_str(segment)
        .decode_utf8()
        .map_err(|_| ApiError::bad_request(format!("Invalid path segment: {segment}")))?
        .into_owned();

    Ok(if is_strategy {
        ArchetypeOperation::StrategyArchetypes { sid: decoded }
    } else {
        ArchetypeOperation::GetArchetype { archepid: decoded }
    })
}

fn not_found(path: &str) -> ApiError {
    ApiError::not_found(format!("No route for path: {path}"))
}

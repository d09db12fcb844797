//! Wire types for the Fortuna Archetype API.
//!
//! This crate holds everything the client and the server need to agree on:
//! the two result shapes, the JSON error envelope, the authentication header
//! names and the resource path prefixes.
//!
//! # Modules
//!
//! - [`error`] - Server-side API error type and the JSON error envelope
//! - [`protocol`] - Header names and resource paths
//! - [`types`] - Result shapes returned by the two lookup endpoints

pub mod error;
pub mod protocol;
pub mod types;

pub use error::{ApiError, ApiErrorCode, ErrorBody};
pub use types::{ArchetypeResult, StrategyArchetypesResult};

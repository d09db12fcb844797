//! HMAC-SHA256 request signing and verification for the Fortuna Archetype API.
//!
//! Both sides of the scheme live here so the client and the server cannot
//! drift apart: the client signs with [`SignedRequest::sign`] and the server
//! checks the same canonical string with [`Verifier::verify`].
//!
//! # Overview
//!
//! A request is signed over the canonical string
//!
//! ```text
//! METHOD|PATH|TIMESTAMP            (no body)
//! METHOD|PATH|TIMESTAMP|BODY       (body present, sorted-key compact JSON)
//! ```
//!
//! and carries three headers: `X-API-Key`, `X-Timestamp` and `X-Signature`.
//! The verifier rejects unknown keys, timestamps outside a ±300 second
//! window, and signatures that do not match under a constant-time compare.
//!
//! # Usage
//!
//! ```rust
//! use archetype_auth::SignedRequest;
//!
//! let request = SignedRequest::new("GET", "/internal/archetype/strategy/A052", 1_234_567_890);
//! assert_eq!(
//!     request.canonical_string(),
//!     "GET|/internal/archetype/strategy/A052|1234567890"
//! );
//! let signature = request.sign("s3cr3t");
//! assert_eq!(signature.as_str().len(), 64);
//! ```
//!
//! # Modules
//!
//! - [`canonical`] - Canonical string and canonical JSON construction
//! - [`credentials`] - Credentials and the credential provider trait
//! - [`error`] - Authentication error types
//! - [`signer`] - HMAC-SHA256 signing
//! - [`verify`] - Server-side request verification

pub mod canonical;
pub mod credentials;
pub mod error;
pub mod signer;
pub mod verify;

pub use canonical::{build_canonical_string, canonical_json};
pub use credentials::{CredentialProvider, Credentials, StaticCredentialProvider};
pub use error::AuthError;
pub use signer::{Signature, SignedRequest, compute_signature};
pub use verify::{AuthResult, DEFAULT_REPLAY_WINDOW_SECS, Verifier};

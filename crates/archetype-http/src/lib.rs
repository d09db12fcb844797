//! HTTP service layer for the Archetype API.
//!
//! - **Router**: Maps method and path to an [`ArchetypeOperation`]
//! - **Handler trait**: Defines the boundary between HTTP and business logic
//! - **Service**: Hyper `Service` with health check, HMAC authentication and dispatch
//! - **Response helpers**: JSON success/error response formatting

pub mod body;
pub mod dispatch;
pub mod response;
pub mod router;
pub mod service;

pub use body::ArchetypeResponseBody;
pub use dispatch::{ArchetypeHandler, NotFoundHandler};
pub use router::ArchetypeOperation;
pub use service::{ArchetypeHttpConfig, ArchetypeHttpService};

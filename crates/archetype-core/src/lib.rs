//! Archetype catalog and server configuration.
//!
//! - [`catalog`] - In-memory [`ArchetypeCatalog`] with JSON seed loading
//! - [`handler`] - [`CatalogHandler`] bridging the HTTP layer to the catalog
//! - [`config`] - [`ServerConfig`] loaded from the environment
//! - [`error`] - [`CoreError`] for catalog loading

pub mod catalog;
pub mod config;
pub mod error;
pub mod handler;

pub use catalog::ArchetypeCatalog;
pub use config::ServerConfig;
pub use error::CoreError;
pub use handler::CatalogHandler;

//! HMAC-signed HTTP client for the Fortuna Archetype API.
//!
//! ```no_run
//! use archetype_client::{ArchetypeClient, ClientConfig, ClientError};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ArchetypeClient::new(ClientConfig::new(
//!     "https://api.example.com",
//!     "your-api-key",
//!     "your-api-secret",
//! ))?;
//!
//! let strategy = client.get_strategy_archetypes("A052").await?;
//! for archepid in &strategy.archepids {
//!     match client.get_archetype(archepid).await {
//!         Ok(archetype) => println!("{archepid}: {:?}", archetype.archetypeportfolio),
//!         Err(ClientError::Authentication { message, .. }) => eprintln!("auth: {message}"),
//!         Err(e) => eprintln!("{e}"),
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - The [`ArchetypeClient`] and request path helpers
//! - [`config`] - [`ClientConfig`] and environment loading
//! - [`error`] - [`ClientError`] and [`ConfigError`]

pub mod client;
pub mod config;
pub mod error;

pub use archetype_auth::Credentials;
pub use archetype_model::{ArchetypeResult, StrategyArchetypesResult};
pub use client::ArchetypeClient;
pub use config::ClientConfig;
pub use error::{ClientError, ConfigError};

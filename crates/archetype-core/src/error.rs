//! Catalog loading errors.

use std::path::PathBuf;

/// Errors raised while building an [`ArchetypeCatalog`](crate::ArchetypeCatalog).
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// The seed file could not be read.
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        /// Seed file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The seed document is not valid JSON of the expected shape.
    #[error("Failed to parse archetype catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// An archetype ID is too short to carry a strategy ID.
    #[error("Invalid archetype ID {0:?}: must be at least 4 characters")]
    InvalidArchepid(String),

    /// A portfolio weight is not a finite number.
    #[error("Invalid weight for {ticker} in {archepid}")]
    InvalidWeight {
        /// Archetype ID.
        archepid: String,
        /// Ticker with the bad weight.
        ticker: String,
    },
}

//! In-memory archetype catalog.
//!
//! Archetypes are keyed by archepid. A strategy has no record of its own:
//! its members are the archetypes whose archepid starts with the strategy ID.

use std::collections::BTreeMap;
use std::path::Path;

use archetype_model::error::ApiError;
use archetype_model::protocol::STRATEGY_ID_LEN;
use archetype_model::{ArchetypeResult, StrategyArchetypesResult};
use dashmap::DashMap;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::CoreError;

/// Ticker to weight mapping.
pub type Portfolio = BTreeMap<String, f64>;

/// Seed file layout.
#[derive(Debug, Deserialize)]
struct CatalogFile {
    archetypes: BTreeMap<String, Portfolio>,
}

/// Concurrent store of archetype portfolios.
///
/// # Examples
///
/// ```
/// use archetype_core::ArchetypeCatalog;
///
/// let catalog = ArchetypeCatalog::from_json_str(
///     r#"{"archetypes": {"A052-1": {"HSX:TPB": 0.6, "HSX:VNM": 0.4}}}"#,
/// )
/// .unwrap();
///
/// let strategy = catalog.strategy_archetypes("A052").unwrap();
/// assert_eq!(strategy.archepids, vec!["A052-1"]);
/// ```
#[derive(Debug, Default)]
pub struct ArchetypeCatalog {
    archetypes: DashMap<String, Portfolio>,
}

impl ArchetypeCatalog {
    /// Create an empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a catalog from a JSON seed file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CoreError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(path = %path.display(), archetypes = catalog.len(), "loaded archetype catalog");
        Ok(catalog)
    }

    /// Load a catalog from a JSON seed document.
    ///
    /// ```json
    /// {"archetypes": {"<archepid>": {"<ticker>": 0.5}}}
    /// ```
    pub fn from_json_str(raw: &str) -> Result<Self, CoreError> {
        let file: CatalogFile = serde_json::from_str(raw)?;
        let catalog = Self::new();
        for (archepid, portfolio) in file.archetypes {
            catalog.insert(archepid, portfolio)?;
        }
        Ok(catalog)
    }

    /// Insert or replace an archetype, returning the previous portfolio.
    pub fn insert(
        &self,
        archepid: impl Into<String>,
        portfolio: Portfolio,
    ) -> Result<Option<Portfolio>, CoreError> {
        let archepid = archepid.into();
        if strategy_id(&archepid).is_none() {
            return Err(CoreError::InvalidArchepid(archepid));
        }
        if let Some((ticker, _)) = portfolio.iter().find(|(_, w)| !w.is_finite()) {
            return Err(CoreError::InvalidWeight {
                ticker: ticker.clone(),
                archepid,
            });
        }
        debug!(archepid = %archepid, tickers = portfolio.len(), "inserting archetype");
        Ok(self.archetypes.insert(archepid, portfolio))
    }

    /// Remove an archetype, returning its portfolio.
    pub fn remove(&self, archepid: &str) -> Option<Portfolio> {
        self.archetypes.remove(archepid).map(|(_, portfolio)| portfolio)
    }

    /// Number of archetypes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    /// Whether the catalog is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }

    /// Sorted archepids of a strategy.
    pub fn strategy_archetypes(&self, sid: &str) -> Result<StrategyArchetypesResult, ApiError> {
        validate_sid(sid)?;

        let mut archepids: Vec<String> = self
            .archetypes
            .iter()
            .filter(|entry| strategy_id(entry.key()) == Some(sid))
            .map(|entry| entry.key().clone())
            .collect();

        if archepids.is_empty() {
            return Err(ApiError::not_found(format!("Strategy not found: {sid}")));
        }
        archepids.sort_unstable();
        Ok(StrategyArchetypesResult { archepids })
    }

    /// Portfolio of one archetype.
    pub fn archetype(&self, archepid: &str) -> Result<ArchetypeResult, ApiError> {
        self.archetypes
            .get(archepid)
            .map(|entry| ArchetypeResult {
                archetypeportfolio: entry.value().clone(),
            })
            .ok_or_else(|| ApiError::not_found(format!("Archetype not found: {archepid}")))
    }
}

/// The strategy ID of an archepid: its first four characters.
#[must_use]
pub fn strategy_id(archepid: &str) -> Option<&str> {
    match archepid.char_indices().nth(STRATEGY_ID_LEN) {
        Some((end, _)) => Some(&archepid[..end]),
        None if archepid.chars().count() == STRATEGY_ID_LEN => Some(archepid),
        None => None,
    }
}

fn validate_sid(sid: &str) -> Result<(), ApiError> {
    if sid.len() == STRATEGY_ID_LEN && sid.bytes().all(|b| b.is_ascii_alphanumeric()) {
        Ok(())
    } else {
        Err(ApiError::bad_request(format!(
            "Invalid strategy ID {sid:?}: expected {STRATEGY_ID_LEN} alphanumeric characters"
        )))
    }
}

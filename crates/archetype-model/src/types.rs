//! Result shapes returned by the lookup endpoints.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Response of `GET /internal/archetype/strategy/{sid}`.
///
/// ```json
/// {"archepids": ["A052071812-7a9581c6-...", "A052071813-8b0692d7-..."]}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrategyArchetypesResult {
    /// Archetype IDs belonging to the strategy, in server order.
    pub archepids: Vec<String>,
}

/// Response of `GET /internal/archetype/{archepid}`.
///
/// ```json
/// {"archetypeportfolio": {"HSX:TPB": 0.35, "HSX:SSI": 0.25}}
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArchetypeResult {
    /// Ticker to portfolio weight.
    pub archetypeportfolio: BTreeMap<String, f64>,
}

impl ArchetypeResult {
    /// Sum of all weights in the portfolio.
    #[must_use]
    pub fn total_weight(&self) -> f64 {
        self.archetypeportfolio.values().sum()
    }
}

//! Handler bridging the HTTP layer to the catalog.

use std::sync::Arc;

use archetype_http::body::ArchetypeResponseBody;
use archetype_http::dispatch::{ArchetypeHandler, HandlerFuture};
use archetype_http::response::serialize;
use archetype_http::router::ArchetypeOperation;
use archetype_model::error::ApiError;

use crate::catalog::ArchetypeCatalog;

/// Handler that serves operations from an [`ArchetypeCatalog`].
#[derive(Debug, Clone)]
pub struct CatalogHandler {
    catalog: Arc<ArchetypeCatalog>,
}

impl CatalogHandler {
    /// Create a new handler wrapping a catalog.
    #[must_use]
    pub fn new(catalog: Arc<ArchetypeCatalog>) -> Self {
        Self { catalog }
    }

    /// The shared catalog.
    #[must_use]
    pub fn catalog(&self) -> &Arc<ArchetypeCatalog> {
        &self.catalog
    }
}

impl ArchetypeHandler for CatalogHandler {
    fn handle_operation(&self, op: ArchetypeOperation) -> HandlerFuture {
        let catalog = Arc::clone(&self.catalog);
        Box::pin(async move { dispatch(catalog.as_ref(), op) })
    }
}

/// Dispatch an operation to the matching catalog lookup.
fn dispatch(
    catalog: &ArchetypeCatalog,
    op: ArchetypeOperation,
) -> Result<http::Response<ArchetypeResponseBody>, ApiError> {
    match op {
        ArchetypeOperation::StrategyArchetypes { sid } => {
            serialize(&catalog.strategy_archetypes(&sid)?)
        }
        ArchetypeOperation::GetArchetype { archepid } => {
            serialize(&catalog.archetype(&archepid)?)
        }
    }
}

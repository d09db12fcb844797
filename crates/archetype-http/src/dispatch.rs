//! Handler trait and operation dispatch.

use std::future::Future;
use std::pin::Pin;

use archetype_model::error::ApiError;

use crate::body::ArchetypeResponseBody;
use crate::router::ArchetypeOperation;

/// Future returned by [`ArchetypeHandler::handle_operation`].
pub type HandlerFuture =
    Pin<Box<dyn Future<Output = Result<http::Response<ArchetypeResponseBody>, ApiError>> + Send>>;

/// Trait that the catalog provider must implement.
///
/// The handler receives an already authenticated and routed operation and
/// returns a complete HTTP response.
pub trait ArchetypeHandler: Send + Sync + 'static {
    /// Handle an operation and produce an HTTP response.
    fn handle_operation(&self, op: ArchetypeOperation) -> HandlerFuture;
}

/// Dispatch an operation to the handler.
pub async fn dispatch_operation<H: ArchetypeHandler>(
    handler: &H,
    op: ArchetypeOperation,
) -> Result<http::Response<ArchetypeResponseBody>, ApiError> {
    tracing::debug!(operation = %op, "dispatching archetype operation");
    handler.handle_operation(op).await
}

/// Handler that knows no strategies or archetypes.
#[derive(Debug, Clone, Default)]
pub struct NotFoundHandler;

impl ArchetypeHandler for NotFoundHandler {
    fn handle_operation(&self, op: ArchetypeOperation) -> HandlerFuture {
        Box::pin(async move {
            Err(match op {
                ArchetypeOperation::StrategyArchetypes { sid } => {
                    ApiError::not_found(format!("Strategy not found: {sid}"))
                }
                ArchetypeOperation::GetArchetype { archepid } => {
                    ApiError::not_found(format!("Archetype not found: {archepid}"))
                }
            })
        })
    }
}

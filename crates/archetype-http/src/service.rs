//! Archetype HTTP service implementing the hyper `Service` trait.

use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use archetype_auth::Verifier;
use archetype_model::error::ApiError;
use archetype_model::protocol::HEALTH_PATH;
use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use hyper::body::Incoming;
use tracing::{debug, warn};

use crate::body::ArchetypeResponseBody;
use crate::dispatch::{ArchetypeHandler, dispatch_operation};
use crate::response::{CONTENT_TYPE, error_to_response, json_response};
use crate::router::resolve_operation;

/// Header carrying the per-request UUID.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Value of the `server` response header.
pub const SERVER_NAME: &str = "Archetype";

/// Default request body limit: 64 KiB.
pub const DEFAULT_MAX_BODY_BYTES: usize = 64 * 1024;

/// Boxed error produced by a request body.
type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Configuration for the Archetype HTTP service.
#[derive(Debug, Clone)]
pub struct ArchetypeHttpConfig {
    /// Serve every request without checking signatures.
    pub skip_signature_validation: bool,
    /// Verifier for signed requests. With validation enabled and no
    /// verifier, every non-health request is rejected.
    pub verifier: Option<Arc<Verifier>>,
    /// Largest request body accepted before answering `413`.
    pub max_body_bytes: usize,
}

impl Default for ArchetypeHttpConfig {
    fn default() -> Self {
        Self {
            skip_signature_validation: false,
            verifier: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Hyper `Service` implementation for the Archetype API.
///
/// Wraps an [`ArchetypeHandler`] implementation, authenticates incoming
/// requests and routes them to the handler.
#[derive(Debug)]
pub struct ArchetypeHttpService<H: ArchetypeHandler> {
    handler: Arc<H>,
    config: Arc<ArchetypeHttpConfig>,
}

impl<H: ArchetypeHandler> ArchetypeHttpService<H> {
    /// Create a new `ArchetypeHttpService`.
    pub fn new(handler: Arc<H>, config: ArchetypeHttpConfig) -> Self {
        Self {
            handler,
            config: Arc::new(config),
        }
    }

    /// Run one request through the full pipeline.
    ///
    /// Generic over the request body so it can be driven without a socket.
    pub async fn handle<B>(&self, req: http::Request<B>) -> http::Response<ArchetypeResponseBody>
    where
        B: http_body::Body<Data = Bytes>,
        B::Error: Into<BoxError>,
    {
        let request_id = uuid::Uuid::new_v4().to_string();
        let response = process_request(req, self.handler.as_ref(), &self.config).await;
        add_common_headers(response, &request_id)
    }
}

impl<H: ArchetypeHandler> Clone for ArchetypeHttpService<H> {
    fn clone(&self) -> Self {
        Self {
            handler: Arc::clone(&self.handler),
            config: Arc::clone(&self.config),
        }
    }
}

impl<H: ArchetypeHandler> hyper::service::Service<http::Request<Incoming>>
    for ArchetypeHttpService<H>
{
    type Response = http::Response<ArchetypeResponseBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn call(&self, req: http::Request<Incoming>) -> Self::Future {
        let service = self.clone();
        Box::pin(async move { Ok(service.handle(req).await) })
    }
}

/// Process a single request: health check, body, authentication, routing, dispatch.
async fn process_request<B, H>(
    req: http::Request<B>,
    handler: &H,
    config: &ArchetypeHttpConfig,
) -> http::Response<ArchetypeResponseBody>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<BoxError>,
    H: ArchetypeHandler,
{
    let (parts, incoming) = req.into_parts();
    debug!(method = %parts.method, path = parts.uri.path(), "incoming request");

    // 1. Health check, unauthenticated.
    if parts.uri.path() == HEALTH_PATH {
        if parts.method != http::Method::GET {
            return error_to_response(&ApiError::method_not_allowed(&parts.method));
        }
        return health_response();
    }

    // 2. Collect body, bounded by `max_body_bytes`.
    let body = match collect_body(incoming, config.max_body_bytes).await {
        Ok(body) => body,
        Err(err) => return error_to_response(&err),
    };

    // 3. Authenticate (if enabled).
    if !config.skip_signature_validation {
        let Some(verifier) = config.verifier.as_ref() else {
            warn!("signature validation enabled but no credentials configured");
            return error_to_response(&ApiError::authentication("No credentials configured"));
        };
        match verifier.verify(&parts, &body) {
            Ok(auth) => debug!(api_key = %auth.api_key, "request authenticated"),
            Err(auth_err) => {
                warn!(
                    method = %parts.method,
                    path = parts.uri.path(),
                    error = %auth_err,
                    "authentication failed"
                );
                return error_to_response(&ApiError::authentication(auth_err.to_string()));
            }
        }
    }

    // 4. Route.
    let op = match resolve_operation(&parts.method, parts.uri.path()) {
        Ok(op) => op,
        Err(err) => return error_to_response(&err),
    };

    // 5. Dispatch to handler.
    match dispatch_operation(handler, op).await {
        Ok(response) => response,
        Err(err) => {
            debug!(status = %err.status_code, error = %err, "operation failed");
            error_to_response(&err)
        }
    }
}

/// Collect the incoming body into a single `Bytes` buffer of at most `limit` bytes.
async fn collect_body<B>(incoming: B, limit: usize) -> Result<Bytes, ApiError>
where
    B: http_body::Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    Limited::new(incoming, limit)
        .collect()
        .await
        .map(http_body_util::Collected::to_bytes)
        .map_err(|e| {
            if e.downcast_ref::<LengthLimitError>().is_some() {
                warn!(limit, "request body too large");
                ApiError::payload_too_large(limit)
            } else {
                ApiError::internal_error(format!("Failed to read request body: {e}"))
            }
        })
}

fn health_response() -> http::Response<ArchetypeResponseBody> {
    let json = serde_json::json!({
        "status": "running",
        "version": env!("CARGO_PKG_VERSION"),
    });
    json_response(json.to_string().into_bytes())
}

/// Add common response headers to every response.
fn add_common_headers(
    mut response: http::Response<ArchetypeResponseBody>,
    request_id: &str,
) -> http::Response<ArchetypeResponseBody> {
    let headers = response.headers_mut();

    if let Ok(hv) = http::HeaderValue::from_str(request_id) {
        headers.entry(REQUEST_ID_HEADER).or_insert(hv);
    }

    headers
        .entry(http::header::CONTENT_TYPE)
        .or_insert(http::HeaderValue::from_static(CONTENT_TYPE));

    headers.insert(
        http::header::SERVER,
        http::HeaderValue::from_static(SERVER_NAME),
    );

    response
}

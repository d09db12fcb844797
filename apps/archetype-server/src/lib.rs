//! Reference server wiring: configuration to catalog, verifier and accept loop.
//!
//! The binary in `main.rs` adds tracing, Ctrl-C handling and the
//! `--health-check` mode on top of these functions.

use std::future::Future;
use std::sync::Arc;

use anyhow::{Context, Result};
use archetype_auth::{StaticCredentialProvider, Verifier};
use archetype_core::{ArchetypeCatalog, CatalogHandler, ServerConfig};
use archetype_http::dispatch::ArchetypeHandler;
use archetype_http::service::{ArchetypeHttpConfig, ArchetypeHttpService};
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as HttpConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

/// Server version reported in health check responses.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build the [`ArchetypeHttpConfig`] from the application [`ServerConfig`].
#[must_use]
pub fn build_http_config(config: &ServerConfig) -> ArchetypeHttpConfig {
    let verifier = config.credentials().map(|credentials| {
        let api_key = credentials.api_key().to_owned();
        let provider = StaticCredentialProvider::from(credentials);
        info!(
            %api_key,
            api_keys = provider.len(),
            replay_window_secs = config.replay_window_secs,
            "configured verifier from environment"
        );
        Arc::new(Verifier::new(Arc::new(provider)).with_replay_window(config.replay_window_secs))
    });

    if verifier.is_none() && !config.skip_signature_validation {
        warn!("no credentials configured, all signed requests will be rejected");
    }

    ArchetypeHttpConfig {
        skip_signature_validation: config.skip_signature_validation,
        verifier,
        max_body_bytes: config.max_body_bytes,
    }
}

/// Load the catalog from `data_file`, or start empty.
pub fn build_catalog(config: &ServerConfig) -> Result<ArchetypeCatalog> {
    match &config.data_file {
        Some(path) => ArchetypeCatalog::from_json_file(path)
            .with_context(|| format!("failed to load archetype catalog from {path}")),
        None => {
            info!("no ARCHETYPE_DATA_FILE set, starting with an empty catalog");
            Ok(ArchetypeCatalog::new())
        }
    }
}

/// Build the complete HTTP service for `config`.
pub fn build_service(
    config: &ServerConfig,
) -> Result<ArchetypeHttpService<CatalogHandler>> {
    let catalog = Arc::new(build_catalog(config)?);
    let handler = CatalogHandler::new(catalog);
    Ok(ArchetypeHttpService::new(
        Arc::new(handler),
        build_http_config(config),
    ))
}

/// Run the accept loop until `shutdown` resolves, then drain in-flight connections.
pub async fn serve<H: ArchetypeHandler>(
    listener: TcpListener,
    service: ArchetypeHttpService<H>,
    shutdown: impl Future<Output = ()>,
) -> Result<()> {
    let graceful = hyper_util::server::graceful::GracefulShutdown::new();
    let http = HttpConnBuilder::new(TokioExecutor::new());

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            result = listener.accept() => {
                let (stream, peer_addr) = match result {
                    Ok(conn) => conn,
                    Err(e) => {
                        warn!(error = %e, "failed to accept connection");
                        continue;
                    }
                };

                let svc = service.clone();
                let conn = http.serve_connection(TokioIo::new(stream), svc);
                let conn = graceful.watch(conn.into_owned());

                tokio::spawn(async move {
                    if let Err(e) = conn.await {
                        error!(peer_addr = %peer_addr, error = %e, "connection error");
                    }
                });
            }

            () = &mut shutdown => {
                info!("shutting down gracefully");
                break;
            }
        }
    }

    graceful.shutdown().await;
    info!("all connections drained");

    Ok(())
}

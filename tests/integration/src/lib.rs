//! End-to-end tests for the Archetype client.
//!
//! Each test starts the reference server in-process on an ephemeral
//! loopback port, so no external server is needed.
//!
//! ```text
//! cargo test -p archetype-integration
//! ```

use std::net::SocketAddr;
use std::sync::{Arc, Once};

use archetype_client::{ArchetypeClient, ClientConfig};
use archetype_core::{ArchetypeCatalog, CatalogHandler, ServerConfig};
use archetype_http::service::ArchetypeHttpService;
use archetype_server::{build_http_config, serve};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// API key accepted by the test server.
pub const TEST_API_KEY: &str = "integration-key";

/// Secret for [`TEST_API_KEY`].
pub const TEST_API_SECRET: &str = "integration-secret";

/// Catalog served by [`TestServer::start`].
pub const SEED_CATALOG: &str = r#"{
    "archetypes": {
        "A052071812-7a9581c6-ad66-4a33-bd52-0dc1b2ef5402": {"HSX:TPB": 0.35, "HSX:VNM": 0.65},
        "A052071812-0c7d3f10-1e2a-4b5c-9d8e-7f6a5b4c3d2e": {"HSX:FPT": 1.0},
        "A052 spaced/id": {"HNX:SHS": 1.0},
        "B117000001-aa": {"HSX:HPG": 0.5, "HSX:MWG": 0.5}
    }
}"#;

static INIT: Once = Once::new();

/// Initialize tracing (once).
fn init_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
            )
            .with_test_writer()
            .init();
    });
}

/// Server configuration with the test credentials.
#[must_use]
pub fn test_config() -> ServerConfig {
    ServerConfig::builder()
        .gateway_listen("127.0.0.1:0")
        .api_key(TEST_API_KEY)
        .api_secret(TEST_API_SECRET)
        .build()
}

/// A reference server running on the current tokio runtime.
#[derive(Debug)]
pub struct TestServer {
    /// Bound address.
    pub addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<anyhow::Result<()>>,
}

impl TestServer {
    /// Start a server with [`test_config`] and [`SEED_CATALOG`].
    pub async fn start() -> Self {
        Self::start_with(&test_config()).await
    }

    /// Start a server with `config` and [`SEED_CATALOG`].
    pub async fn start_with(config: &ServerConfig) -> Self {
        let catalog = ArchetypeCatalog::from_json_str(SEED_CATALOG).expect("seed catalog");
        let service = ArchetypeHttpService::new(
            Arc::new(CatalogHandler::new(Arc::new(catalog))),
            build_http_config(config),
        );
        Self::start_service(service).await
    }

    /// Start a server around a prebuilt service.
    pub async fn start_service(service: ArchetypeHttpService<CatalogHandler>) -> Self {
        init_tracing();

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind ephemeral port");
        let addr = listener.local_addr().expect("local addr");
        let (shutdown, rx) = oneshot::channel();

        let task = tokio::spawn(serve(listener, service, async {
            rx.await.ok();
        }));

        Self {
            addr,
            shutdown,
            task,
        }
    }

    /// Base URL of the server.
    #[must_use]
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// A client with the test credentials.
    #[must_use]
    pub fn client(&self) -> ArchetypeClient {
        self.client_with(TEST_API_KEY, TEST_API_SECRET)
    }

    /// A client with arbitrary credentials.
    #[must_use]
    pub fn client_with(&self, api_key: &str, api_secret: &str) -> ArchetypeClient {
        ArchetypeClient::new(ClientConfig::new(self.base_url(), api_key, api_secret))
            .expect("client config")
    }

    /// Stop accepting connections and wait for the accept loop to finish.
    pub async fn shutdown(self) -> anyhow::Result<()> {
        let _ = self.shutdown.send(());
        self.task.await?
    }
}

/// Current unix time in seconds.
#[must_use]
pub fn now_secs() -> i64 {
    i64::try_from(
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("clock after epoch")
            .as_secs(),
    )
    .expect("timestamp fits i64")
}

mod test_archetype;
mod test_auth;
mod test_server;

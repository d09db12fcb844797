//! Server lifecycle, health endpoint and transport failures.

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::time::Duration;

    use archetype_client::{ArchetypeClient, ClientConfig, ClientError, Credentials};
    use archetype_core::ServerConfig;
    use archetype_server::build_service;
    use reqwest::StatusCode;

    use crate::{TEST_API_KEY, TEST_API_SECRET, TestServer};

    #[tokio::test]
    async fn test_should_serve_health_without_credentials() {
        let server = TestServer::start().await;

        let response = reqwest::get(format!("{}/health", server.base_url()))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["server"], "Archetype");
        assert_eq!(response.headers()["content-type"], "application/json");
        assert!(response.headers().contains_key("x-request-id"));

        let json: serde_json::Value = response.json().await.unwrap();
        assert_eq!(json["status"], "running");
    }

    #[tokio::test]
    async fn test_should_assign_unique_request_ids() {
        let server = TestServer::start().await;
        let url = format!("{}/health", server.base_url());

        let first = reqwest::get(&url).await.unwrap();
        let second = reqwest::get(&url).await.unwrap();

        assert_ne!(
            first.headers()["x-request-id"],
            second.headers()["x-request-id"]
        );
    }

    #[tokio::test]
    async fn test_should_load_catalog_from_data_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"archetypes": {"C300-only": {"HSX:SSI": 1.0}}}"#)
            .unwrap();

        let config = ServerConfig::builder()
            .data_file(file.path().to_string_lossy())
            .api_key(TEST_API_KEY)
            .api_secret(TEST_API_SECRET)
            .build();
        let server = TestServer::start_service(build_service(&config).unwrap()).await;

        let result = server.client().get_strategy_archetypes("C300").await.unwrap();
        assert_eq!(result.archepids, vec!["C300-only"]);
    }

    #[tokio::test]
    async fn test_should_shut_down_gracefully() {
        let server = TestServer::start().await;
        let client = server.client();
        assert!(client.get_strategy_archetypes("A052").await.is_ok());

        server.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_should_map_connection_refused_to_transport_error() {
        let server = TestServer::start().await;
        let base_url = server.base_url();
        server.shutdown().await.unwrap();

        let client = ArchetypeClient::new(
            ClientConfig::builder()
                .base_url(base_url)
                .credentials(Credentials::new(TEST_API_KEY, TEST_API_SECRET))
                .timeout(Duration::from_secs(2))
                .build(),
        )
        .unwrap();

        let err = client.get_archetype("A052-x").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)), "got {err:?}");
    }
}

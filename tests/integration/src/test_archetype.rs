//! Strategy and archetype lookups through the signed client.

#[cfg(test)]
mod tests {
    use archetype_client::ClientError;
    use reqwest::{Method, StatusCode};

    use crate::{TestServer, test_config};

    const ARCHEPID: &str = "A052071812-7a9581c6-ad66-4a33-bd52-0dc1b2ef5402";

    #[tokio::test]
    async fn test_should_list_strategy_archetypes() {
        let server = TestServer::start().await;
        let client = server.client();

        let result = client.get_strategy_archetypes("A052").await.unwrap();

        assert_eq!(
            result.archepids,
            vec![
                "A052 spaced/id",
                "A052071812-0c7d3f10-1e2a-4b5c-9d8e-7f6a5b4c3d2e",
                ARCHEPID,
            ]
        );
    }

    #[tokio::test]
    async fn test_should_fetch_archetype_portfolio() {
        let server = TestServer::start().await;
        let client = server.client();

        let result = client.get_archetype(ARCHEPID).await.unwrap();

        assert_eq!(result.archetypeportfolio.len(), 2);
        assert!((result.archetypeportfolio["HSX:TPB"] - 0.35).abs() < f64::EPSILON);
        assert!((result.total_weight() - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_should_walk_strategy_into_archetypes() {
        let server = TestServer::start().await;
        let client = server.client();

        let strategy = client.get_strategy_archetypes("B117").await.unwrap();
        for archepid in &strategy.archepids {
            let archetype = client.get_archetype(archepid).await.unwrap();
            assert!(!archetype.archetypeportfolio.is_empty());
        }
    }

    #[tokio::test]
    async fn test_should_round_trip_ids_needing_percent_encoding() {
        let server = TestServer::start().await;

        let result = server.client().get_archetype("A052 spaced/id").await.unwrap();
        assert!(result.archetypeportfolio.contains_key("HNX:SHS"));
    }

    #[tokio::test]
    async fn test_should_report_unknown_archetype_as_api_error() {
        let server = TestServer::start().await;

        let err = server.client().get_archetype("A052-missing").await.unwrap_err();

        match err {
            ClientError::Api {
                status,
                message,
                error_code,
                ..
            } => {
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(message, "Archetype not found: A052-missing");
                assert_eq!(error_code, Some(2004));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_report_unknown_strategy_as_api_error() {
        let server = TestServer::start().await;

        let err = server.client().get_strategy_archetypes("Z999").await.unwrap_err();

        assert!(!err.is_authentication());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
    }

    #[tokio::test]
    async fn test_should_report_malformed_strategy_id_as_bad_request() {
        let server = TestServer::start().await;

        let err = server.client().get_strategy_archetypes("A0").await.unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.error_code(), Some(2001));
    }

    #[tokio::test]
    async fn test_should_sign_json_body() {
        let server = TestServer::start().await;
        let body = serde_json::json!({"z": [1, 2], "a": {"y": true, "b": null}});

        // The body passes verification; the route then rejects the method.
        let err = server
            .client()
            .send_signed::<serde_json::Value>(
                Method::POST,
                &format!("/internal/archetype/{ARCHEPID}"),
                Some(&body),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::METHOD_NOT_ALLOWED));
        assert_eq!(err.error_code(), Some(2005));
    }

    #[tokio::test]
    async fn test_should_serve_concurrent_calls_from_cloned_clients() {
        let server = TestServer::start().await;
        let client = server.client();

        let mut tasks = Vec::new();
        for _ in 0..16 {
            let client = client.clone();
            tasks.push(tokio::spawn(async move {
                client.get_archetype(ARCHEPID).await
            }));
        }

        for task in tasks {
            let result = task.await.unwrap().unwrap();
            assert_eq!(result.archetypeportfolio.len(), 2);
        }
    }

    #[tokio::test]
    async fn test_should_sign_path_after_dot_segment_resolution() {
        let server = TestServer::start().await;
        let client = server.client();

        // `..` and `.` are resolved by the URL parser before the request is
        // signed, so the server sees a valid signature for an unrouted path.
        for err in [
            client.get_archetype("..").await.unwrap_err(),
            client.get_strategy_archetypes(".").await.unwrap_err(),
            client.get_strategy_archetypes("..").await.unwrap_err(),
        ] {
            assert!(!err.is_authentication(), "got {err:?}");
            assert_eq!(err.status(), Some(StatusCode::NOT_FOUND), "got {err:?}");
            assert_eq!(err.error_code(), Some(2004));
        }
    }

    #[tokio::test]
    async fn test_should_send_unsigned_query_string() {
        let server = TestServer::start().await;

        let result: serde_json::Value = server
            .client()
            .send_signed_with_query(
                Method::GET,
                "/internal/archetype/strategy/A052",
                &[("page", "1"), ("note", "a b&c")],
                None,
            )
            .await
            .unwrap();

        assert_eq!(result["archepids"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_should_report_oversized_body_as_api_error() {
        let mut config = test_config();
        config.max_body_bytes = 64;
        let server = TestServer::start_with(&config).await;
        let body = serde_json::json!({"padding": "x".repeat(128)});

        let err = server
            .client()
            .send_signed::<serde_json::Value>(
                Method::POST,
                &format!("/internal/archetype/{ARCHEPID}"),
                Some(&body),
            )
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(StatusCode::PAYLOAD_TOO_LARGE));
        assert_eq!(err.error_code(), Some(2013));
    }
}

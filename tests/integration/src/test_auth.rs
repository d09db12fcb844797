//! Signature verification as seen by the client.

#[cfg(test)]
mod tests {
    use archetype_auth::SignedRequest;
    use archetype_client::ClientError;
    use archetype_model::protocol::{HEADER_API_KEY, HEADER_SIGNATURE, HEADER_TIMESTAMP};
    use reqwest::StatusCode;

    use crate::{TEST_API_KEY, TEST_API_SECRET, TestServer, now_secs, test_config};

    const PATH: &str = "/internal/archetype/strategy/A052";

    /// Send a hand-built request and classify the response like the client does.
    async fn send_raw(
        server: &TestServer,
        headers: &[(&str, String)],
    ) -> Result<serde_json::Value, ClientError> {
        let mut request = reqwest::Client::new().get(format!("{}{PATH}", server.base_url()));
        for (name, value) in headers {
            request = request.header(*name, value);
        }
        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        if status.is_success() {
            Ok(serde_json::from_slice(&body).unwrap())
        } else {
            Err(ClientError::from_response(status, &body))
        }
    }

    fn signed_headers(timestamp: i64, secret: &str) -> Vec<(&'static str, String)> {
        let signature = SignedRequest::new("GET", PATH, timestamp).sign(secret);
        vec![
            (HEADER_API_KEY, TEST_API_KEY.to_owned()),
            (HEADER_TIMESTAMP, timestamp.to_string()),
            (HEADER_SIGNATURE, signature.into_string()),
        ]
    }

    fn expect_authentication(result: Result<serde_json::Value, ClientError>) -> String {
        match result {
            Err(ClientError::Authentication { status, message }) => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                message
            }
            other => panic!("expected Authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_reject_wrong_secret() {
        let server = TestServer::start().await;

        let err = server
            .client_with(TEST_API_KEY, "not-the-secret")
            .get_strategy_archetypes("A052")
            .await
            .unwrap_err();

        match err {
            ClientError::Authentication { status, message } => {
                assert_eq!(status, StatusCode::UNAUTHORIZED);
                assert_eq!(message, "Signature does not match");
            }
            other => panic!("expected Authentication error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_should_reject_unknown_api_key() {
        let server = TestServer::start().await;

        let err = server
            .client_with("someone-else", TEST_API_SECRET)
            .get_archetype("A052-x")
            .await
            .unwrap_err();

        assert!(err.is_authentication());
        assert_eq!(err.to_string(), "[401 Unauthorized] Invalid API key");
    }

    #[tokio::test]
    async fn test_should_reject_stale_timestamp() {
        let server = TestServer::start().await;

        let headers = signed_headers(now_secs() - 301, TEST_API_SECRET);

        let message = expect_authentication(send_raw(&server, &headers).await);
        assert!(message.contains("300s window"), "{message}");
    }

    #[tokio::test]
    async fn test_should_reject_future_timestamp() {
        let server = TestServer::start().await;

        let headers = signed_headers(now_secs() + 301, TEST_API_SECRET);

        expect_authentication(send_raw(&server, &headers).await);
    }

    #[tokio::test]
    async fn test_should_accept_timestamp_inside_window() {
        let server = TestServer::start().await;

        let json = send_raw(&server, &signed_headers(now_secs() - 299, TEST_API_SECRET))
            .await
            .unwrap();
        assert_eq!(json["archepids"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_should_reject_missing_signature() {
        let server = TestServer::start().await;
        let mut headers = signed_headers(now_secs(), TEST_API_SECRET);
        headers.retain(|(name, _)| *name != HEADER_SIGNATURE);

        let message = expect_authentication(send_raw(&server, &headers).await);
        assert_eq!(message, "Missing required header: x-signature");
    }

    #[tokio::test]
    async fn test_should_reject_malformed_signature() {
        let server = TestServer::start().await;
        let mut headers = signed_headers(now_secs(), TEST_API_SECRET);
        headers[2].1 = "not-a-hex-digest".to_owned();

        let message = expect_authentication(send_raw(&server, &headers).await);
        assert_eq!(message, "Malformed signature");
    }

    #[tokio::test]
    async fn test_should_reject_non_numeric_timestamp() {
        let server = TestServer::start().await;
        let mut headers = signed_headers(now_secs(), TEST_API_SECRET);
        headers[1].1 = "yesterday".to_owned();

        expect_authentication(send_raw(&server, &headers).await);
    }

    #[tokio::test]
    async fn test_should_honor_custom_replay_window() {
        let mut config = test_config();
        config.replay_window_secs = 10;
        let server = TestServer::start_with(&config).await;

        let headers = signed_headers(now_secs() - 60, TEST_API_SECRET);

        expect_authentication(send_raw(&server, &headers).await);
        assert!(server.client().get_strategy_archetypes("A052").await.is_ok());
    }

    #[tokio::test]
    async fn test_should_serve_unsigned_requests_when_validation_is_skipped() {
        let mut config = test_config();
        config.skip_signature_validation = true;
        let server = TestServer::start_with(&config).await;

        let json = send_raw(&server, &[]).await.unwrap();
        assert!(json["archepids"].is_array());
    }
}

//! Integration tests against a mocked LinkedIn API.

#[cfg(test)]
mod integration_tests {
    use crate::{
        AccessToken, AttemptStage, LinkedInConfig, LinkedInError, LinkedInProvider,
    };
    use ras_identity_core::{IdentityError, IdentityProvider};
    use std::time::Duration;
    use tokio_test::{assert_err, assert_ok};
    use tokio_util::sync::CancellationToken;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const V1_DEFAULT_PATH: &str = "/v1/people/~:(id,email-address,first-name,last-name,headline,location,industry,picture-url,public-profile-url)";

    fn ada_profile() -> serde_json::Value {
        serde_json::json!({
            "id": "42",
            "firstName": "Ada",
            "lastName": "Lovelace",
            "emailAddress": "ada@x.io",
            "headline": "Engineer",
            "pictureUrl": "http://img/1.png",
            "publicProfileUrl": "http://li/ada"
        })
    }

    async fn setup(config: LinkedInConfig) -> (MockServer, LinkedInProvider) {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let mock_server = MockServer::start().await;
        let provider = LinkedInProvider::new(config.with_site(mock_server.uri())).unwrap();
        (mock_server, provider)
    }

    fn test_config() -> LinkedInConfig {
        LinkedInConfig::new("mock_client_id", "mock_secret")
    }

    #[tokio::test]
    async fn test_v1_verify_flow() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .and(query_param("format", "json"))
            .and(query_param("oauth2_access_token", "mock_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ada_profile()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let identity = provider
            .verify(serde_json::json!({
                "provider": "linkedin",
                "access_token": "mock_access_token",
                "token_type": "Bearer",
                "expires_in": 3600
            }))
            .await
            .unwrap();

        assert_eq!(identity.provider_id, "linkedin");
        assert_eq!(identity.uid, "42");
        assert_eq!(identity.info.name.as_deref(), Some("Ada Lovelace"));
        assert_eq!(identity.info.email.as_deref(), Some("ada@x.io"));
        assert_eq!(identity.info.image.as_deref(), Some("http://img/1.png"));
        assert_eq!(
            identity.info.urls.unwrap().public_profile.as_deref(),
            Some("http://li/ada")
        );
        assert_eq!(identity.extra["raw_profile"], ada_profile());

        // The v1 API takes the token from the query string only
        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
    }

    #[tokio::test]
    async fn test_v2_verify_flow() {
        let (mock_server, provider) = setup(test_config().with_api_version("v2")).await;

        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .and(header("Authorization", "Bearer mock_access_token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "yrZCpj2Z12",
                "localizedFirstName": "Grace",
                "localizedLastName": "Hopper",
                "emailAddress": "grace@x.io"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let identity = provider
            .verify(serde_json::json!({
                "provider": "linkedin",
                "access_token": "mock_access_token"
            }))
            .await
            .unwrap();

        assert_eq!(identity.uid, "yrZCpj2Z12");
        assert_eq!(identity.info.name.as_deref(), Some("Grace Hopper"));
        assert_eq!(identity.info.first_name.as_deref(), Some("Grace"));
        // Email is not part of the v2 `me` document
        assert_eq!(identity.info.email.as_deref(), Some(""));
        assert_eq!(identity.extra["raw_profile"]["emailAddress"], "grace@x.io");

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests[0].url.query(), None);
    }

    #[tokio::test]
    async fn test_profile_fetched_once_per_attempt() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(ada_profile()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut attempt = provider.begin_attempt(AccessToken::new("mock_access_token"));

        assert_eq!(attempt.uid().await.unwrap(), "42");
        assert_eq!(attempt.stage(), AttemptStage::ProfileFetched);

        let info = attempt.info().await.unwrap();
        assert_eq!(info.last_name.as_deref(), Some("Lovelace"));

        let extra = attempt.extra().await.unwrap();
        assert_eq!(extra["raw_profile"]["id"], "42");

        let first = attempt.raw_profile().await.unwrap().clone();
        let second = attempt.raw_profile().await.unwrap().clone();
        assert_eq!(first, second);

        let identity = attempt.derive_identity().await.unwrap();
        assert_eq!(identity.uid, "42");
        assert_eq!(attempt.stage(), AttemptStage::IdentityDerived);

        assert_eq!(mock_server.received_requests().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_attempts_do_not_share_profiles() {
        let (mock_server, provider) = setup(test_config()).await;

        for (token, id) in [("token_a", "a"), ("token_b", "b")] {
            Mock::given(method("GET"))
                .and(path(V1_DEFAULT_PATH))
                .and(query_param("oauth2_access_token", token))
                .respond_with(
                    ResponseTemplate::new(200).set_body_json(serde_json::json!({ "id": id })),
                )
                .expect(1)
                .mount(&mock_server)
                .await;
        }

        let provider_a = provider.clone();
        let provider_b = provider.clone();
        let handle_a = tokio::spawn(async move {
            let mut attempt = provider_a.begin_attempt(AccessToken::new("token_a"));
            attempt.uid().await
        });
        let handle_b = tokio::spawn(async move {
            let mut attempt = provider_b.begin_attempt(AccessToken::new("token_b"));
            attempt.uid().await
        });

        assert_eq!(handle_a.await.unwrap().unwrap(), "a");
        assert_eq!(handle_b.await.unwrap().unwrap(), "b");
    }

    #[tokio::test]
    async fn test_secure_image_url_projection() {
        let (mock_server, provider) = setup(
            test_config()
                .with_fields(vec!["id".to_string(), "picture-url".to_string()])
                .with_secure_image_url(true),
        )
        .await;

        Mock::given(method("GET"))
            .and(path("/v1/people/~:(id,picture-url;secure=true)"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "id": "7",
                "pictureUrl": "https://img/secure.png"
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let mut attempt = provider.begin_attempt(AccessToken::new("tok"));
        let info = attempt.info().await.unwrap();
        assert_eq!(info.image.as_deref(), Some("https://img/secure.png"));

        // The shared configuration keeps its original field list
        assert_eq!(provider.config().fields, vec!["id", "picture-url"]);
    }

    #[tokio::test]
    async fn test_unknown_api_version_fails_without_requests() {
        let (mock_server, provider) = setup(test_config().with_api_version("v3")).await;

        let mut attempt = provider.begin_attempt(AccessToken::new("tok"));
        let result = attempt.raw_profile().await;
        assert!(matches!(result, Err(LinkedInError::InvalidConfiguration(_))));

        let result = provider
            .verify(serde_json::json!({
                "provider": "linkedin",
                "access_token": "tok"
            }))
            .await;
        assert!(matches!(result, Err(IdentityError::InvalidConfiguration(_))));

        assert!(mock_server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_verify_accepts_oversized_expires_in() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(ada_profile()))
            .expect(2)
            .mount(&mock_server)
            .await;

        for expires_in in [u64::MAX, 100_000_000_000_000] {
            let identity = provider
                .verify(serde_json::json!({
                    "provider": "linkedin",
                    "access_token": "tok",
                    "expires_in": expires_in
                }))
                .await
                .unwrap();
            assert_eq!(identity.uid, "42");
        }
    }

    #[tokio::test]
    async fn test_expired_token_still_fetches_profile() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .and(query_param("oauth2_access_token", "stale"))
            .respond_with(ResponseTemplate::new(200).set_body_json(ada_profile()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let token = AccessToken::from_response(
            serde_json::from_value(serde_json::json!({
                "access_token": "stale",
                "expires_at": 1_000,
                "refresh_token": "refresh"
            }))
            .unwrap(),
        );
        assert!(token.is_expired());

        let mut attempt = provider.begin_attempt(token);
        assert_eq!(attempt.access_token().refresh_token(), Some("refresh"));
        assert_eq!(attempt.uid().await.unwrap(), "42");
    }

    #[tokio::test]
    async fn test_missing_id_fails_verification() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({ "firstName": "Ada" })),
            )
            .mount(&mock_server)
            .await;

        let result = provider
            .verify(serde_json::json!({
                "provider": "linkedin",
                "access_token": "tok"
            }))
            .await;

        assert!(matches!(result, Err(IdentityError::MissingField(field)) if field == "id"));
    }

    #[tokio::test]
    async fn test_profile_error_status_is_not_cached() {
        let (mock_server, provider) = setup(test_config()).await;

        Mock::given(method("GET"))
            .and(path(V1_DEFAULT_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "errorCode": 0,
                "message": "Invalid access token"
            })))
            .expect(2)
            .mount(&mock_server)
            .await;

        let mut attempt = provider.begin_attempt(AccessToken::new("expired"));

        match attempt.raw_profile().await {
            Err(LinkedInError::ProfileFetchFailed { status, body }) => {
                assert_eq!(status, 401);
                assert!(body.contains("Invalid access token"));
            }
            other => panic!("Expected ProfileFetchFailed, got {:?}", other),
        }
        assert_eq!(attempt.stage(), AttemptStage::TokenExchanged);

        // A failed fetch leaves the slot empty, so the caller may retry
        assert_err!(attempt.raw_profile().await);
    }

    #[tokio::test]
    async fn test_malformed_profile_body() {
        let (mock_server, provider) = setup(test_config().with_api_version("v2")).await;

        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let mut attempt = provider.begin_attempt(AccessToken::new("tok"));
        let result = attempt.raw_profile().await;
        assert!(matches!(result, Err(LinkedInError::InvalidProfileResponse(_))));
    }

    #[tokio::test]
    async fn test_attempt_timeout() {
        let (mock_server, provider) = setup(test_config().with_api_version("v2")).await;

        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ada_profile())
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&mock_server)
            .await;

        let mut attempt = provider
            .begin_attempt(AccessToken::new("tok"))
            .with_timeout(Duration::from_millis(100));

        match attempt.raw_profile().await {
            Err(LinkedInError::HttpError(e)) => assert!(e.is_timeout()),
            other => panic!("Expected timeout, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_attempt_cancellation() {
        let (mock_server, provider) = setup(test_config().with_api_version("v2")).await;

        Mock::given(method("GET"))
            .and(path("/v2/me"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(ada_profile())
                    .set_delay(Duration::from_secs(5)),
            )
            .mount(&mock_server)
            .await;

        let cancellation = CancellationToken::new();
        let mut attempt = provider
            .begin_attempt(AccessToken::new("tok"))
            .with_cancellation(cancellation.clone());

        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            cancellation.cancel();
        });

        let result = attempt.raw_profile().await;
        assert!(matches!(result, Err(LinkedInError::Cancelled)));
        assert_ok!(canceller.await);
        assert_eq!(attempt.stage(), AttemptStage::TokenExchanged);
    }
}

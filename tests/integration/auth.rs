//! Integration tests for the client-credentials flow

use super::*;
use plato_client::PlatoError;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::Mock;

#[tokio::test]
async fn test_token_fetched_once_and_reused() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("grant_type=client_credentials"))
        .and(body_string_contains("client_id=billing"))
        .and(body_string_contains("client_secret=s3cret"))
        .and(body_string_contains("scope=templates"))
        .respond_with(token_response("tok-1", 3600))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/templates/invoice"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json("invoice")))
        .expect(2)
        .mount(&server)
        .await;

    let client = authenticated_client_for(&server);

    client.templates().get("invoice").await.unwrap();
    client.templates().get("invoice").await.unwrap();
}

#[tokio::test]
async fn test_expired_token_is_renewed() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token_response("short-lived", 0))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(token_response("renewed", 3600))
        .expect(1)
        .mount(&server)
        .await;

    let client = authenticated_client_for(&server);
    let cache = client.token_cache().unwrap();

    let first = cache.header().await.unwrap();
    assert_eq!(first["Authorization"], "Bearer short-lived");

    tokio::time::sleep(std::time::Duration::from_millis(20)).await;

    let second = cache.header().await.unwrap();
    assert_eq!(second["Authorization"], "Bearer renewed");

    let third = cache.json_header().await.unwrap();
    assert_eq!(third["Authorization"], "Bearer renewed");
    assert_eq!(third["Content-Type"], "application/json");
}

#[tokio::test]
async fn test_rejected_credentials() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/templates/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let result = authenticated_client_for(&server)
        .templates()
        .list(["invoice"])
        .await;

    match result {
        Err(PlatoError::Authentication { status_code, body }) => {
            assert_eq!(status_code, 401);
            assert_eq!(body, "invalid_client");
        }
        other => panic!("Expected Authentication error, got {:?}", other),
    }
}

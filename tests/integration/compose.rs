//! Integration tests for the composition service

use super::*;
use plato_client::{ComposeOptions, PlatoError};
use wiremock::matchers::{body_json, header, method, path, query_param, query_param_is_missing};
use wiremock::Mock;

#[tokio::test]
async fn test_compose_with_default_options() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/ranger/compose"))
        .and(header("accept", "application/pdf"))
        .and(body_json(json!({"name": "Ranger"})))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PDF-DATA".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let document = client_for(&server)
        .composition()
        .compose("ranger", &json!({"name": "Ranger"}), &ComposeOptions::default())
        .await
        .unwrap();

    assert_eq!(document.as_ref(), b"PDF-DATA");

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_compose_sends_only_set_controls() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/ranger/compose"))
        .and(header("accept", "image/png"))
        .and(query_param("page", "0"))
        .and(query_param("width", "320"))
        .and(query_param_is_missing("height"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PNG".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let options = ComposeOptions::new()
        .mime_type("image/png")
        .page(0)
        .resize_width(320);
    let document = client_for(&server)
        .composition()
        .compose("ranger", &json!({}), &options)
        .await
        .unwrap();

    assert_eq!(document.as_ref(), b"PNG");
}

#[tokio::test]
async fn test_template_example() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/template/ranger/example"))
        .and(query_param("height", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"EXAMPLE".to_vec()))
        .expect(1)
        .mount(&server)
        .await;

    let document = client_for(&server)
        .composition()
        .example("ranger", &ComposeOptions::new().resize_height(100))
        .await
        .unwrap();

    assert_eq!(document.as_ref(), b"EXAMPLE");
}

#[tokio::test]
async fn test_compose_error_not_retried() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/ranger/compose"))
        .respond_with(ResponseTemplate::new(500).set_body_string("render failed"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .composition()
        .compose("ranger", &json!({}), &ComposeOptions::default())
        .await;

    assert!(matches!(
        result,
        Err(PlatoError::Service {
            status_code: 500,
            ..
        })
    ));
}

#[tokio::test]
async fn test_compose_to_file_replaces_destination() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/ranger/compose"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PDF-DATA".to_vec()))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("ranger.pdf");
    std::fs::write(&destination, b"stale document").unwrap();

    client_for(&server)
        .composition()
        .compose_to_file("ranger", &json!({}), &ComposeOptions::default(), &destination)
        .await
        .unwrap();

    assert_eq!(std::fs::read(&destination).unwrap(), b"PDF-DATA");
}

#[tokio::test]
async fn test_compose_to_file_error_leaves_no_file() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/ranger/compose"))
        .respond_with(ResponseTemplate::new(404).set_body_string("unknown template"))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let destination = dir.path().join("ranger.pdf");

    let result = client_for(&server)
        .composition()
        .compose_to_file("ranger", &json!({}), &ComposeOptions::default(), &destination)
        .await;

    assert!(result.is_err());
    assert!(!destination.exists());
}

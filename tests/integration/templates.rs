//! Integration tests for the templates service

use super::*;
use plato_client::PlatoError;
use pretty_assertions::assert_eq;
use std::io::Cursor;
use wiremock::matchers::{
    body_json, body_string_contains, header_exists, method, path, query_param,
    query_param_is_missing,
};
use wiremock::Mock;

#[tokio::test]
async fn test_list_templates_without_tags() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/"))
        .and(query_param_is_missing("tags"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([template_json("invoice"), template_json("receipt")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let templates = client_for(&server)
        .templates()
        .list(Vec::<String>::new())
        .await
        .unwrap();

    let ids: Vec<&str> = templates.iter().map(|t| t.template_id.as_str()).collect();
    assert_eq!(ids, vec!["invoice", "receipt"]);
    assert_eq!(templates[0].mime_type, "text/html");
}

#[tokio::test]
async fn test_list_templates_repeats_tag_parameter() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/"))
        .and(query_param("tags", "invoice"))
        .and(query_param("tags", "2024"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let templates = client_for(&server)
        .templates()
        .list(["invoice", "2024"])
        .await
        .unwrap();

    assert!(templates.is_empty());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.query(), Some("tags=invoice&tags=2024"));
}

#[tokio::test]
async fn test_get_template() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/invoice"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json("invoice")))
        .mount(&server)
        .await;

    let template = client_for(&server).templates().get("invoice").await.unwrap();

    assert_eq!(template.template_id, "invoice");
    assert_eq!(template.tags, vec!["invoice".to_string()]);
    assert_eq!(template.metadata, json!({"owner": "billing"}));
}

#[tokio::test]
async fn test_get_template_with_reserved_characters_in_id() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/other%3Fevil%3D1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json("other?evil=1")))
        .expect(1)
        .mount(&server)
        .await;

    let template = client_for(&server)
        .templates()
        .get("other?evil=1")
        .await
        .unwrap();

    assert_eq!(template.template_id, "other?evil=1");
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests[0].url.path(), "/templates/other%3Fevil%3D1");
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn test_get_missing_template_is_service_error() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_string("Template not found"))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server).templates().get("missing").await;

    match result {
        Err(PlatoError::Service { status_code, body }) => {
            assert_eq!(status_code, 404);
            assert_eq!(body, "Template not found");
        }
        other => panic!("Expected Service error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_create_template_multipart() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/create"))
        .and(header_exists("content-type"))
        .and(body_string_contains("name=\"zipfile\""))
        .and(body_string_contains("name=\"template_details\""))
        .and(body_string_contains("ZIP-CONTENT"))
        .and(body_string_contains(r#"{"template_id":"invoice"}"#))
        .respond_with(ResponseTemplate::new(201).set_body_json(template_json("invoice")))
        .expect(1)
        .mount(&server)
        .await;

    let mut bundle = Cursor::new(b"ZIP-CONTENT".to_vec());
    bundle.set_position(4);

    let template = client_for(&server)
        .templates()
        .create(&mut bundle, &json!({"template_id": "invoice"}))
        .await
        .unwrap();

    assert_eq!(template.template_id, "invoice");

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("multipart/form-data"));
}

#[tokio::test]
async fn test_update_template_uses_put() {
    let server = setup_mock_server().await;

    Mock::given(method("PUT"))
        .and(path("/template/invoice/update"))
        .and(body_string_contains("name=\"zipfile\""))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json("invoice")))
        .expect(1)
        .mount(&server)
        .await;

    let template = client_for(&server)
        .templates()
        .update("invoice", &mut Cursor::new(b"ZIP".to_vec()), &json!({}))
        .await
        .unwrap();

    assert_eq!(template.template_id, "invoice");
}

#[tokio::test]
async fn test_update_template_details_uses_patch_json() {
    let server = setup_mock_server().await;
    let details = json!({"tags": ["invoice", "archived"]});

    Mock::given(method("PATCH"))
        .and(path("/template/invoice/update_details"))
        .and(body_json(&details))
        .respond_with(ResponseTemplate::new(200).set_body_json(template_json("invoice")))
        .expect(1)
        .mount(&server)
        .await;

    let result = client_for(&server)
        .templates()
        .update_details("invoice", &details)
        .await;

    assert!(result.is_ok());
}

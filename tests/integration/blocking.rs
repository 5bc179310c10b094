//! Integration tests for the blocking facade

use super::*;
use plato_client::blocking;
use plato_client::ComposeOptions;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::Mock;

fn blocking_client(server: &MockServer) -> blocking::PlatoClient {
    blocking::PlatoClient::new(client_for(server)).unwrap()
}

#[test]
fn test_blocking_operations() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(setup_mock_server());

    runtime.block_on(
        Mock::given(method("GET"))
            .and(path("/templates/invoice"))
            .respond_with(ResponseTemplate::new(200).set_body_json(template_json("invoice")))
            .mount(&server),
    );
    runtime.block_on(
        Mock::given(method("POST"))
            .and(path("/template/invoice/compose"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"PDF-DATA".to_vec()))
            .mount(&server),
    );

    let client = blocking_client(&server);

    let template = assert_ok!(client.template("invoice"));
    assert_eq!(template.template_id, "invoice");

    let document = assert_ok!(client.compose("invoice", &json!({}), &ComposeOptions::default()));
    assert_eq!(document.as_ref(), b"PDF-DATA");

    assert_err!(client.template(""));
}

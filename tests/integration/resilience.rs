//! Integration tests for connectivity retries

use super::*;
use plato_client::{ComposeOptions, PlatoError};
use std::io::Read;
use std::net::{Shutdown, TcpListener};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::Mock;

/// Returns a local URL nothing listens on.
fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    format!("http://127.0.0.1:{}", port)
}

#[tokio::test]
async fn test_unreachable_service_raises_unavailable() {
    let client = PlatoClient::builder()
        .base_url(closed_port_url())
        .max_attempts(2)
        .retry(fast_retry())
        .build()
        .unwrap();

    let result = client.templates().get("invoice").await;

    match result {
        Err(PlatoError::Unavailable { attempts, source }) => {
            assert_eq!(attempts, 2);
            assert!(source.is_connectivity());
        }
        other => panic!("Expected Unavailable, got {:?}", other),
    }
}

/// Accepts connections, reads the request and closes the socket without answering.
fn hang_up_server() -> (String, Arc<AtomicUsize>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());
    let accepted = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&accepted);
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { break };
            counter.fetch_add(1, Ordering::SeqCst);
            let mut buf = [0u8; 4096];
            let _ = stream.read(&mut buf);
            let _ = stream.shutdown(Shutdown::Both);
        }
    });

    (url, accepted)
}

#[tokio::test]
async fn test_connection_closed_before_response_is_retried() {
    let (url, accepted) = hang_up_server();

    let client = PlatoClient::builder()
        .base_url(url)
        .max_attempts(3)
        .retry(fast_retry())
        .build()
        .unwrap();

    let result = client.templates().get("invoice").await;

    match result {
        Err(PlatoError::Unavailable { attempts, source }) => {
            assert_eq!(attempts, 3);
            assert!(source.is_connectivity());
        }
        other => panic!("Expected Unavailable, got {:?}", other),
    }
    assert_eq!(accepted.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_timeouts_are_retried_until_exhausted() {
    let server = setup_mock_server().await;

    Mock::given(method("POST"))
        .and(path("/template/slow/compose"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_bytes(b"late".to_vec())
                .set_delay(Duration::from_secs(2)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let client = PlatoClient::builder()
        .base_url(server.uri())
        .timeout(Duration::from_millis(100))
        .retry(fast_retry())
        .build()
        .unwrap();

    let result = client
        .composition()
        .compose("slow", &json!({}), &ComposeOptions::default())
        .await;

    assert!(matches!(result, Err(PlatoError::Unavailable { attempts: 3, .. })));
}

#[tokio::test]
async fn test_service_error_is_not_retried() {
    let server = setup_mock_server().await;

    Mock::given(method("GET"))
        .and(path("/templates/"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .expect(1)
        .mount(&server)
        .await;

    let client = PlatoClient::builder()
        .base_url(server.uri())
        .max_attempts(5)
        .retry(fast_retry())
        .build()
        .unwrap();

    let result = client.templates().list(Vec::<String>::new()).await;

    assert_eq!(result.unwrap_err().status_code(), Some(503));
}

#[tokio::test]
async fn test_unreachable_token_endpoint_raises_unavailable() {
    let server = setup_mock_server().await;

    let client = PlatoClient::builder()
        .base_url(server.uri())
        .credentials(plato_client::Credentials::new(
            "billing",
            "s3cret",
            closed_port_url(),
        ))
        .max_attempts(2)
        .retry(fast_retry())
        .build()
        .unwrap();

    let result = client.templates().get("invoice").await;

    assert!(matches!(result, Err(PlatoError::Unavailable { attempts: 2, .. })));
    assert!(server.received_requests().await.unwrap().is_empty());
}

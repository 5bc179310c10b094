//! HTTP transport implementation.

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client, ClientBuilder, RequestBuilder};
use std::collections::HashMap;
use std::error::Error;
use std::io;
use std::time::Duration;
use tracing::instrument;

use super::{
    HttpMethod, HttpRequest, HttpResponse, HttpTransport, MultipartPart, RequestBody,
    TransportError,
};

/// HTTP transport implementation using reqwest.
pub struct ReqwestTransport {
    client: Client,
    default_timeout: Duration,
}

impl ReqwestTransport {
    /// Creates a new HTTP transport.
    pub fn new(timeout: Duration) -> Result<Self, TransportError> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .tcp_keepalive(Duration::from_secs(60))
            .build()
            .map_err(|e| TransportError::InvalidRequest {
                message: e.to_string(),
            })?;

        Ok(Self {
            client,
            default_timeout: timeout,
        })
    }

    fn apply_body(
        &self,
        builder: RequestBuilder,
        body: RequestBody,
    ) -> Result<RequestBuilder, TransportError> {
        let builder = match body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(params) => builder.form(&params.to_pairs()),
            RequestBody::Multipart(parts) => {
                let mut form = reqwest::multipart::Form::new();
                for part in parts {
                    form = match part {
                        MultipartPart::Text { name, value } => form.text(name, value),
                        MultipartPart::File {
                            name,
                            filename,
                            content_type,
                            data,
                        } => {
                            let part = reqwest::multipart::Part::bytes(data)
                                .file_name(filename)
                                .mime_str(&content_type)
                                .map_err(|e| TransportError::InvalidRequest {
                                    message: e.to_string(),
                                })?;
                            form.part(name, part)
                        }
                    };
                }
                builder.multipart(form)
            }
        };
        Ok(builder)
    }

    fn map_send_error(&self, error: reqwest::Error, timeout: Duration) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout { timeout }
        } else if error.is_builder() {
            TransportError::InvalidRequest {
                message: error.to_string(),
            }
        } else if error.is_connect() || error.is_request() || is_connection_dropped(&error) {
            // No status line was received.
            TransportError::Connection {
                message: error_chain(&error),
            }
        } else {
            TransportError::InvalidResponse {
                message: error.to_string(),
            }
        }
    }
}

/// Checks the error and its sources for a socket closed by the peer.
fn is_connection_dropped(error: &(dyn Error + 'static)) -> bool {
    let mut current = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<io::Error>() {
            if matches!(
                io.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        current = err.source();
    }
    false
}

fn error_chain(error: &(dyn Error + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(err) = source {
        message.push_str(": ");
        message.push_str(&err.to_string());
        source = err.source();
    }
    message
}

fn header_map(headers: &HeaderMap) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(k, v)| {
            (
                k.as_str().to_lowercase(),
                String::from_utf8_lossy(v.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = request.method.as_str(), url = %request.url))]
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let timeout = request.timeout.unwrap_or(self.default_timeout);

        let mut req_builder = match request.method {
            HttpMethod::Get => self.client.get(&request.url),
            HttpMethod::Post => self.client.post(&request.url),
            HttpMethod::Put => self.client.put(&request.url),
            HttpMethod::Patch => self.client.patch(&request.url),
        };

        for (name, value) in &request.headers {
            req_builder = req_builder.header(name, value);
        }

        if !request.query.is_empty() {
            req_builder = req_builder.query(&request.query.to_pairs());
        }

        req_builder = self.apply_body(req_builder, request.body)?;
        req_builder = req_builder.timeout(timeout);

        tracing::debug!("Sending request");

        let response = req_builder
            .send()
            .await
            .map_err(|e| self.map_send_error(e, timeout))?;

        let status = response.status().as_u16();
        let headers = header_map(response.headers());
        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::InvalidResponse {
                message: e.to_string(),
            })?;

        tracing::debug!(status, body_len = body.len(), "Received response");

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("default_timeout", &self.default_timeout)
            .finish()
    }
}

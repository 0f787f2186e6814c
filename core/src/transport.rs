//! Executes `HttpRequest`s against the network.
//!
//! # Design
//! `Transport` is the seam between the deterministic request pipeline and
//! real I/O. One transport is shared by every call a client makes, so
//! implementations must tolerate concurrent `execute` calls. Timeouts are
//! enforced by the client around `execute`, not by the transport.

use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};

/// Failure below the HTTP layer. HTTP error statuses are not transport
/// errors; they come back as an `HttpResponse`.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,
    #[error("{0}")]
    Network(String),
}

/// An HTTP session able to execute requests.
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;

    /// Release pooled connections. Called at most once, and only for
    /// sessions the client created itself.
    async fn close(&self) {}
}

/// `reqwest`-backed session.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a caller-configured `reqwest::Client`.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            HttpMethod::Get => reqwest::Method::GET,
        };

        let mut builder = self.client.request(method, &request.url);
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        let response = builder.send().await.map_err(classify)?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|value| (name.as_str().to_string(), value.to_string()))
            })
            .collect();
        let body = response.text().await.map_err(classify)?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }

    async fn close(&self) {
        debug!("closing NED NL HTTP session");
    }
}

fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Network(err.to_string())
    }
}

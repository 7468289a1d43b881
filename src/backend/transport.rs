//! Transport seam between the backend client and the wire.
//!
//! The retry loop and response handling are written against this trait so
//! tests can count attempts and script failures without a socket.

use crate::error::BackendError;
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

/// A completed HTTP exchange: status plus raw body. Non-2xx is not an error
/// at this layer; the client decides what a status means.
#[derive(Debug, Clone)]
pub struct WireResponse {
    pub status: u16,
    pub body: String,
}

impl WireResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[async_trait]
pub trait Transport: Send + Sync {
    /// POST a JSON payload. `Err` means the transport itself failed (DNS,
    /// timeout, reset) — the only retryable failure class.
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        payload: &Value,
    ) -> Result<WireResponse, BackendError>;
}

/// Production transport over a shared `reqwest` pool.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(request_timeout: Duration) -> Self {
        Self {
            client: build_http_client(request_timeout),
        }
    }
}

fn build_http_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(90))
        .tcp_keepalive(Duration::from_secs(60))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn post_json(
        &self,
        url: &str,
        bearer_token: Option<&str>,
        payload: &Value,
    ) -> Result<WireResponse, BackendError> {
        let mut request = self.client.post(url).json(payload);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        Ok(WireResponse { status, body })
    }
}

//! Reqwest-backed transport implementation.
//!
//! Connection pooling, TLS, and timeouts live here (well, in reqwest);
//! retrying is layered on top by [`RetryTransport`](super::RetryTransport).

use crate::body::Body;
use crate::error::{Result, TransportError};
use crate::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use std::sync::Arc;
use std::time::Duration;

/// HTTP transport backed by a shared reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Arc<ReqwestClient>,
}

impl HttpTransport {
    /// Create a new HTTP transport with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(Default::default())
    }

    /// Create a new HTTP transport with custom configuration
    pub fn with_config(config: HttpTransportConfig) -> Result<Self> {
        let client = ReqwestClient::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Get a reference to the underlying reqwest client
    pub fn reqwest_client(&self) -> Arc<ReqwestClient> {
        self.client.clone()
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        let method_upper = request.method.to_uppercase();
        let method = match method_upper.as_str() {
            "GET" => reqwest::Method::GET,
            "POST" => reqwest::Method::POST,
            "PUT" => reqwest::Method::PUT,
            "DELETE" => reqwest::Method::DELETE,
            "PATCH" => reqwest::Method::PATCH,
            "HEAD" => reqwest::Method::HEAD,
            "OPTIONS" => reqwest::Method::OPTIONS,
            _ => {
                return Err(TransportError::Http(format!(
                    "Unsupported HTTP method: {}",
                    request.method
                )));
            }
        };

        let mut req = self.client.request(method, &request.url);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(body) = request.body {
            req = match body {
                Body::Bytes(bytes) => req.body(bytes),
                Body::Stream(stream) => req.body(reqwest::Body::wrap_stream(stream)),
            };
        }

        let response = req.send().await.map_err(TransportError::from)?;

        let status = response.status().as_u16();
        let mut headers = std::collections::HashMap::new();
        for (key, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(key.to_string(), v.to_string());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| TransportError::Http(e.to_string()))?
            .to_vec();

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// HTTP transport configuration
#[derive(Clone, Debug)]
pub struct HttpTransportConfig {
    /// Request timeout
    pub timeout: Duration,

    /// Connection timeout
    pub connect_timeout: Duration,

    /// Maximum idle connections per host
    pub pool_max_idle_per_host: usize,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            pool_max_idle_per_host: 10,
        }
    }
}

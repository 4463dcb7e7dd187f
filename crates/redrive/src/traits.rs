//! Transport trait and request/response types.
//!
//! Defines the round-trip contract shared by every transport: a retrying
//! decorator conforms to the same [`Transport`] trait as the transport it
//! wraps, so it is a drop-in substitute anywhere a transport is accepted.

use crate::body::Body;
use crate::context::RequestContext;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

/// HTTP request specification
///
/// Represents an outbound HTTP request to be sent via a [`Transport`].
#[derive(Debug)]
pub struct HttpRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,

    /// Request URL
    pub url: String,

    /// Request headers
    pub headers: HashMap<String, String>,

    /// Request body (optional)
    pub body: Option<Body>,

    /// Per-request context (cancellation, request-scoped values)
    pub context: RequestContext,
}

impl HttpRequest {
    /// Create a new HTTP request
    pub fn new(method: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            url: url.into(),
            headers: HashMap::new(),
            body: None,
            context: RequestContext::new(),
        }
    }

    /// Add a header to the request
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set the request body from text
    pub fn with_text_body(mut self, text: impl Into<String>) -> Self {
        self.body = Some(Body::from(text.into()));
        self
    }

    /// Set the request context
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = context;
        self
    }
}

/// HTTP response
///
/// Represents an HTTP response received from the server, with its body fully
/// collected.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,

    /// Response headers
    pub headers: HashMap<String, String>,

    /// Response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Create a new HTTP response
    pub fn new(status: u16, headers: HashMap<String, String>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body,
        }
    }

    /// Check if response is successful (2xx)
    pub fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Check if response is an error (4xx or 5xx)
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }

    /// Get the response body as a string
    pub fn text(&self) -> std::result::Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    /// Parse response body as JSON
    ///
    /// # Errors
    ///
    /// Returns an error if the response body cannot be parsed as valid JSON
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Into::into)
    }

    /// Get a header value by name (case-insensitive)
    pub fn get_header(&self, name: &str) -> Option<&str> {
        let name_lower = name.to_lowercase();
        self.headers
            .iter()
            .find(|(k, _)| k.to_lowercase() == name_lower)
            .map(|(_, v)| v.as_str())
    }
}

/// One request/response exchange performed by a transport.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Send an HTTP request and receive a response.
    ///
    /// An `Err` means no usable response was received at all; an unfavorable
    /// status code is returned as a normal [`HttpResponse`].
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Arc<T> {
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        (**self).round_trip(request).await
    }
}

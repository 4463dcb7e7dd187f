#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Resilient outbound HTTP transport with transparent, policy-driven retries.
//!
//! The center of this crate is [`RetryTransport`], a decorator that wraps any
//! [`Transport`] and replays requests whose responses carry a retryable
//! status code, while:
//!
//! - buffering the request body once so every attempt sends identical bytes,
//! - honoring caller cancellation at retry boundaries (including mid-backoff),
//! - exposing the current attempt number to the wrapped transport via the
//!   request context ([`attempt_from_context`]).
//!
//! Transport-level errors (connection failures, timeouts) are surfaced
//! immediately and never retried; exhausting the attempt budget returns the
//! last response rather than a synthetic error, leaving status
//! interpretation to the caller.
//!
//! # Usage
//!
//! ```no_run
//! use redrive::{HttpRequest, RetryPolicy, RetryTransport, Transport};
//! use std::time::Duration;
//!
//! # async fn example() -> redrive::Result<()> {
//! let policy = RetryPolicy::builder()
//!     .retryable_statuses([408, 429, 502, 503, 504])
//!     .max_attempts(4)
//!     .backoff(|attempt: u32| Duration::from_millis(250 * attempt as u64))
//!     .build();
//!
//! let transport = RetryTransport::new()?.with_policy(policy);
//!
//! let request = HttpRequest::new("POST", "https://api.example.com/v1/orders")
//!     .with_header("content-type", "application/json")
//!     .with_text_body(r#"{"sku":"A-17"}"#);
//!
//! let response = transport.round_trip(request).await?;
//! println!("final status: {}", response.status);
//! # Ok(())
//! # }
//! ```

pub mod body;
pub mod context;
pub mod error;
pub mod http;
pub mod traits;

// Re-export commonly used types
pub use body::{Body, BufferedBody};
pub use context::{CancellationToken, RequestContext, attempt_from_context};
pub use error::{Result, TransportError};
pub use http::{HttpTransport, HttpTransportConfig, RetryPolicy, RetryPolicyBuilder, RetryTransport};
pub use traits::{HttpRequest, HttpResponse, Transport};

//! HTTP transport implementations.
//!
//! [`HttpTransport`] is the reqwest-backed transport used when no other
//! transport is injected. [`RetryTransport`] is the retrying decorator that
//! wraps any [`Transport`](crate::Transport) behind the same round-trip
//! interface.

pub mod client;
pub mod retry;

pub use client::{HttpTransport, HttpTransportConfig};
pub use retry::{
    DEFAULT_MAX_ATTEMPTS, DEFAULT_RETRYABLE_STATUSES, RetryPolicy, RetryPolicyBuilder,
    RetryTransport,
};

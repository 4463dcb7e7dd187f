//! The retrying transport decorator and its policy.
//!
//! [`RetryTransport`] wraps another [`Transport`] and transparently replays
//! requests whose responses carry a retryable status code. Transport-level
//! errors are never retried: a connection that failed outright is a different
//! signal than a server that answered 503, and the policy only speaks for the
//! latter.

use crate::body::BufferedBody;
use crate::error::Result;
use crate::traits::{HttpRequest, HttpResponse, Transport};
use async_trait::async_trait;
use redrive_core::backoff::{BackoffSchedule, ExponentialBackoff};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use super::client::HttpTransport;

/// Status codes retried by the default policy: request timeout, bad gateway,
/// service unavailable, gateway timeout.
pub const DEFAULT_RETRYABLE_STATUSES: [u16; 4] = [408, 502, 503, 504];

/// Attempt budget of the default policy (1 initial attempt + 4 retries).
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Policy deciding which responses are retried, how often, and after what
/// delay.
///
/// Immutable value; build one with [`RetryPolicy::builder`] or use the
/// production-usable [`RetryPolicy::default`].
///
/// # Examples
///
/// ```rust
/// use redrive::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::builder()
///     .retryable_statuses([429, 503])
///     .max_attempts(3)
///     .backoff(|attempt: u32| Duration::from_millis(50 * attempt as u64))
///     .build();
///
/// assert!(policy.is_retryable(429));
/// assert!(!policy.is_retryable(502));
/// ```
#[derive(Clone)]
pub struct RetryPolicy {
    retryable_statuses: HashSet<u16>,
    max_attempts: u32,
    backoff: Arc<dyn BackoffSchedule>,
}

impl Default for RetryPolicy {
    /// Retry `{408, 502, 503, 504}` up to 5 attempts with exponential
    /// backoff (500ms initial, 10s cap, 10% jitter).
    fn default() -> Self {
        Self {
            retryable_statuses: DEFAULT_RETRYABLE_STATUSES.into_iter().collect(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            backoff: Arc::new(
                ExponentialBackoff::builder()
                    .initial_delay(Duration::from_millis(500))
                    .max_delay(Duration::from_secs(10))
                    .build(),
            ),
        }
    }
}

impl RetryPolicy {
    /// Create a new builder for configuring a retry policy.
    pub fn builder() -> RetryPolicyBuilder {
        RetryPolicyBuilder::default()
    }

    /// Whether a status code is in the retryable set.
    pub fn is_retryable(&self, status: u16) -> bool {
        self.retryable_statuses.contains(&status)
    }

    /// Maximum number of attempts per logical request (always ≥ 1).
    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay to wait after `attempt` (1-indexed) before the next attempt.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.backoff.delay_for(attempt)
    }
}

impl fmt::Debug for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RetryPolicy")
            .field("retryable_statuses", &self.retryable_statuses)
            .field("max_attempts", &self.max_attempts)
            .finish_non_exhaustive()
    }
}

/// Builder for [`RetryPolicy`].
pub struct RetryPolicyBuilder {
    retryable_statuses: HashSet<u16>,
    max_attempts: u32,
    backoff: Arc<dyn BackoffSchedule>,
}

impl Default for RetryPolicyBuilder {
    fn default() -> Self {
        let policy = RetryPolicy::default();
        Self {
            retryable_statuses: policy.retryable_statuses,
            max_attempts: policy.max_attempts,
            backoff: policy.backoff,
        }
    }
}

impl RetryPolicyBuilder {
    /// Replace the retryable status set.
    pub fn retryable_statuses(mut self, statuses: impl IntoIterator<Item = u16>) -> Self {
        self.retryable_statuses = statuses.into_iter().collect();
        self
    }

    /// Add a single status to the retryable set.
    pub fn retryable_status(mut self, status: u16) -> Self {
        self.retryable_statuses.insert(status);
        self
    }

    /// Set the maximum number of attempts per logical request.
    ///
    /// Values below 1 are clamped to 1 (the first attempt always happens).
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the backoff schedule.
    ///
    /// Accepts any [`BackoffSchedule`], including a plain
    /// `Fn(u32) -> Duration` closure.
    pub fn backoff(mut self, schedule: impl BackoffSchedule + 'static) -> Self {
        self.backoff = Arc::new(schedule);
        self
    }

    /// Build the policy.
    pub fn build(self) -> RetryPolicy {
        RetryPolicy {
            retryable_statuses: self.retryable_statuses,
            max_attempts: self.max_attempts.max(1),
            backoff: self.backoff,
        }
    }
}

/// Transport decorator that retries retryable responses.
///
/// Wraps exactly one underlying transport and implements [`Transport`]
/// itself, so it drops in anywhere a plain transport is accepted. Each
/// attempt sees a fresh replay of the request body and a context annotated
/// with the current attempt number (readable via
/// [`attempt_from_context`](crate::attempt_from_context)).
///
/// Retry behavior in brief:
///
/// - responses with a status in the policy's retryable set are retried up to
///   the attempt budget; once the budget is exhausted the last response is
///   returned as-is, never a synthetic error;
/// - transport-level errors are returned immediately, no retry;
/// - cancellation is observed between attempts and during backoff waits,
///   never by aborting an attempt already in flight. A context cancelled
///   before the call still gets its first attempt.
///
/// # Examples
///
/// ```no_run
/// use redrive::{HttpRequest, RetryTransport, Transport};
///
/// # async fn example() -> redrive::Result<()> {
/// let transport = RetryTransport::new()?;
/// let request = HttpRequest::new("GET", "https://api.example.com/health");
/// let response = transport.round_trip(request).await?;
/// println!("status: {}", response.status);
/// # Ok(())
/// # }
/// ```
pub struct RetryTransport {
    inner: Box<dyn Transport>,
    policy: RetryPolicy,
}

impl RetryTransport {
    /// Create a retry transport with the default policy wrapping the default
    /// reqwest-backed [`HttpTransport`].
    pub fn new() -> Result<Self> {
        Ok(Self::with_transport(HttpTransport::new()?))
    }

    /// Create a retry transport with the default policy wrapping the given
    /// transport.
    pub fn with_transport(transport: impl Transport + 'static) -> Self {
        Self {
            inner: Box::new(transport),
            policy: RetryPolicy::default(),
        }
    }

    /// Set the retry policy.
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Replace the wrapped transport.
    ///
    /// Intended for controlled setup (tests, instrumented transports);
    /// exclusive access means this cannot race in-flight round trips.
    pub fn set_transport(&mut self, transport: impl Transport + 'static) {
        self.inner = Box::new(transport);
    }

    /// The active retry policy.
    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }
}

#[async_trait]
impl Transport for RetryTransport {
    async fn round_trip(&self, request: HttpRequest) -> Result<HttpResponse> {
        let HttpRequest {
            method,
            url,
            headers,
            body,
            context,
        } = request;

        // Capture the body once, up front. A body that cannot be read fails
        // the whole operation before any attempt is made.
        let buffered = match body {
            Some(body) => Some(BufferedBody::capture(body).await?),
            None => None,
        };

        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 1;

        loop {
            let attempt_request = HttpRequest {
                method: method.clone(),
                url: url.clone(),
                headers: headers.clone(),
                body: buffered.as_ref().map(BufferedBody::replay),
                context: context.with_attempt(attempt),
            };

            // A transport-level error surfaces immediately, whatever the
            // attempt count.
            let response = self.inner.round_trip(attempt_request).await?;

            if !self.policy.is_retryable(response.status) || attempt >= max_attempts {
                return Ok(response);
            }

            // Cancellation is observed only at retry boundaries; the attempt
            // that just finished is the last one, and its response stands.
            if context.is_done() {
                tracing::debug!(attempt, status = response.status, "context done, not retrying");
                return Ok(response);
            }

            let delay = self.policy.delay_for(attempt);
            tracing::debug!(
                attempt,
                status = response.status,
                delay_ms = delay.as_millis() as u64,
                "retrying request"
            );

            tokio::select! {
                _ = tokio::time::sleep(delay) => {}
                _ = context.done() => {
                    tracing::debug!(attempt, "context done during backoff, not retrying");
                    return Ok(response);
                }
            }

            attempt += 1;
        }
    }
}

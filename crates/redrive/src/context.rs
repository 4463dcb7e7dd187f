//! Per-request context: cancellation, deadlines, and typed request-scoped
//! values.
//!
//! A [`RequestContext`] travels with every [`HttpRequest`](crate::HttpRequest)
//! and is how callers signal "stop retrying": the retry transport checks it
//! between attempts and while waiting out a backoff delay, never by aborting
//! an attempt already in flight.
//!
//! The current attempt number is carried here too, as a typed extension whose
//! key is private to this module, so downstream code (the wrapped transport,
//! instrumentation it triggers) can ask "which attempt is this" via
//! [`attempt_from_context`] without any chance of colliding with unrelated
//! context values.

use http::Extensions;
use std::time::Duration;
use tokio::time::Instant;

pub use tokio_util::sync::CancellationToken;

/// Context for one logical outbound request.
///
/// Cloning is cheap; a clone shares the same cancellation token. Derived
/// contexts (one per attempt) extend the parent immutably, so nothing leaks
/// across unrelated requests.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    cancel: CancellationToken,
    deadline: Option<Instant>,
    extensions: Extensions,
}

impl RequestContext {
    /// Create a context that is never cancelled and has no deadline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a cancellation token.
    ///
    /// The caller keeps the token and cancels it to stop further retries.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// Set an absolute deadline after which the context counts as done.
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Set a deadline relative to now.
    pub fn with_timeout(self, timeout: Duration) -> Self {
        let deadline = Instant::now() + timeout;
        self.with_deadline(deadline)
    }

    /// The cancellation token governing this context.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Whether the context is done (cancelled or past its deadline).
    pub fn is_done(&self) -> bool {
        self.cancel.is_cancelled() || self.deadline.is_some_and(|d| Instant::now() >= d)
    }

    /// Resolve when the context becomes done.
    ///
    /// Pending forever if the context is never cancelled and has no deadline.
    pub async fn done(&self) {
        match self.deadline {
            Some(deadline) => {
                tokio::select! {
                    _ = self.cancel.cancelled() => {}
                    _ = tokio::time::sleep_until(deadline) => {}
                }
            }
            None => self.cancel.cancelled().await,
        }
    }

    /// Request-scoped typed values.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Mutable access to request-scoped typed values.
    pub fn extensions_mut(&mut self) -> &mut Extensions {
        &mut self.extensions
    }

    /// Derive a child context annotated with the current attempt number.
    pub(crate) fn with_attempt(&self, attempt: u32) -> Self {
        let mut derived = self.clone();
        derived.extensions.insert(AttemptNumber(attempt));
        derived
    }
}

/// Private extension key carrying the attempt number.
#[derive(Debug, Clone, Copy)]
struct AttemptNumber(u32);

/// Look up the attempt number recorded in a context.
///
/// Returns `None` for contexts that did not pass through the retry
/// transport.
///
/// # Examples
///
/// ```rust
/// use redrive::{RequestContext, attempt_from_context};
///
/// let context = RequestContext::new();
/// assert_eq!(attempt_from_context(&context), None);
/// ```
pub fn attempt_from_context(context: &RequestContext) -> Option<u32> {
    context.extensions.get::<AttemptNumber>().map(|a| a.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_absent_by_default() {
        assert_eq!(attempt_from_context(&RequestContext::new()), None);
    }

    #[test]
    fn with_attempt_annotates_a_derived_context() {
        let parent = RequestContext::new();
        let child = parent.with_attempt(3);

        assert_eq!(attempt_from_context(&child), Some(3));
        // The parent is untouched.
        assert_eq!(attempt_from_context(&parent), None);
    }

    #[test]
    fn later_derivations_override_the_attempt() {
        let parent = RequestContext::new();
        let first = parent.with_attempt(1);
        let second = parent.with_attempt(2);

        assert_eq!(attempt_from_context(&first), Some(1));
        assert_eq!(attempt_from_context(&second), Some(2));
    }

    #[test]
    fn unrelated_extensions_survive_derivation() {
        #[derive(Debug, Clone, PartialEq)]
        struct TraceId(&'static str);

        let mut parent = RequestContext::new();
        parent.extensions_mut().insert(TraceId("abc-123"));

        let child = parent.with_attempt(1);
        assert_eq!(
            child.extensions().get::<TraceId>(),
            Some(&TraceId("abc-123"))
        );
    }

    #[test]
    fn cancellation_marks_context_done() {
        let token = CancellationToken::new();
        let context = RequestContext::new().with_cancellation(token.clone());

        assert!(!context.is_done());
        token.cancel();
        assert!(context.is_done());
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_marks_context_done() {
        let context = RequestContext::new().with_timeout(Duration::from_millis(5));

        assert!(!context.is_done());
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert!(context.is_done());
    }

    #[tokio::test]
    async fn done_resolves_on_cancellation() {
        let token = CancellationToken::new();
        let context = RequestContext::new().with_cancellation(token.clone());

        token.cancel();
        // Must resolve promptly rather than hang.
        tokio::time::timeout(Duration::from_secs(1), context.done())
            .await
            .expect("done() should resolve after cancellation");
    }

    #[tokio::test(start_paused = true)]
    async fn done_resolves_on_deadline() {
        let context = RequestContext::new().with_timeout(Duration::from_millis(5));
        context.done().await;
        assert!(context.is_done());
    }
}

//! The backoff-schedule trait.

use std::time::Duration;

/// A schedule mapping attempt numbers to delays between retries.
///
/// Attempt numbers are 1-indexed: `delay_for(1)` is the wait after the first
/// attempt failed, before the second attempt is issued. Implementations must
/// be cheap and side-effect free; the retry loop performs (and may interrupt)
/// the actual wait.
///
/// Any `Fn(u32) -> Duration` closure is a schedule, so ad-hoc schedules can
/// be passed without a wrapper type:
///
/// ```rust
/// use redrive_core::backoff::BackoffSchedule;
/// use std::time::Duration;
///
/// let linear = |attempt: u32| Duration::from_millis(100 * attempt as u64);
/// assert_eq!(linear.delay_for(3), Duration::from_millis(300));
/// ```
pub trait BackoffSchedule: Send + Sync {
    /// Delay to wait after `attempt` (1-indexed) before the next attempt.
    fn delay_for(&self, attempt: u32) -> Duration;
}

impl<F> BackoffSchedule for F
where
    F: Fn(u32) -> Duration + Send + Sync,
{
    fn delay_for(&self, attempt: u32) -> Duration {
        self(attempt)
    }
}

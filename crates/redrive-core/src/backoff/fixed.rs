//! Fixed-delay backoff.

use super::schedule::BackoffSchedule;
use std::time::Duration;

/// A schedule that waits the same delay after every attempt.
///
/// `FixedBackoff::none()` waits nothing at all, which keeps retry loops
/// instantaneous in tests.
///
/// # Examples
///
/// ```rust
/// use redrive_core::backoff::{BackoffSchedule, FixedBackoff};
/// use std::time::Duration;
///
/// let backoff = FixedBackoff::new(Duration::from_millis(250));
/// assert_eq!(backoff.delay_for(1), Duration::from_millis(250));
/// assert_eq!(backoff.delay_for(7), Duration::from_millis(250));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FixedBackoff {
    delay: Duration,
}

impl FixedBackoff {
    /// Create a schedule waiting `delay` between every pair of attempts.
    pub const fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Create a schedule that never waits.
    pub const fn none() -> Self {
        Self {
            delay: Duration::ZERO,
        }
    }
}

impl BackoffSchedule for FixedBackoff {
    fn delay_for(&self, _attempt: u32) -> Duration {
        self.delay
    }
}

//! Exponential backoff with jitter.

use super::schedule::BackoffSchedule;
use std::time::Duration;

/// Exponential backoff schedule with configurable jitter.
///
/// Delays grow exponentially: `initial_delay * multiplier^(attempt - 1)`,
/// capped at `max_delay`. Jitter randomizes each delay to prevent thundering
/// herd problems.
///
/// # Mathematical Formula
///
/// For attempt `n` (1-indexed):
/// ```text
/// base_delay = initial_delay * (multiplier ^ (n - 1))
/// jitter_range = base_delay * jitter
/// final_delay = min(base_delay + random(-jitter_range, +jitter_range), max_delay)
/// ```
///
/// # Examples
///
/// ```rust
/// use redrive_core::backoff::{BackoffSchedule, ExponentialBackoff};
/// use std::time::Duration;
///
/// // Default configuration (initial=100ms, max=60s, multiplier=2.0, jitter=0.1)
/// let backoff = ExponentialBackoff::default();
///
/// // Custom configuration
/// let backoff = ExponentialBackoff::builder()
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.1)
///     .build();
///
/// let delay = backoff.delay_for(1);
/// assert!(delay <= Duration::from_secs(30));
/// ```
#[derive(Debug, Clone)]
pub struct ExponentialBackoff {
    initial_delay: Duration,
    max_delay: Duration,
    multiplier: f64,
    jitter: f64,
}

impl ExponentialBackoff {
    /// Create a new builder for configuring exponential backoff.
    pub fn builder() -> ExponentialBackoffBuilder {
        ExponentialBackoffBuilder::default()
    }
}

impl Default for ExponentialBackoff {
    /// Create an exponential backoff with sensible defaults.
    ///
    /// Defaults:
    /// - `initial_delay`: 100ms
    /// - `max_delay`: 60s
    /// - `multiplier`: 2.0 (doubles each time)
    /// - `jitter`: 0.1 (10% randomization)
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(100),
            max_delay: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl BackoffSchedule for ExponentialBackoff {
    fn delay_for(&self, attempt: u32) -> Duration {
        // Attempt numbers are 1-indexed; attempt 1 waits the initial delay.
        let exponent = attempt.saturating_sub(1);
        let base_delay = self.initial_delay.as_secs_f64() * self.multiplier.powi(exponent as i32);

        let jittered = if self.jitter > 0.0 {
            // Range: [base * (1 - jitter), base * (1 + jitter)]
            let jitter_amount = base_delay * self.jitter * (rand::random::<f64>() - 0.5) * 2.0;
            base_delay + jitter_amount
        } else {
            base_delay
        };

        Duration::from_secs_f64(jittered.min(self.max_delay.as_secs_f64()).max(0.0))
    }
}

/// Builder for configuring [`ExponentialBackoff`].
///
/// # Examples
///
/// ```rust
/// use redrive_core::backoff::ExponentialBackoff;
/// use std::time::Duration;
///
/// let backoff = ExponentialBackoff::builder()
///     .initial_delay(Duration::from_millis(100))
///     .max_delay(Duration::from_secs(30))
///     .multiplier(2.0)
///     .jitter(0.1)
///     .build();
/// ```
#[derive(Debug, Default)]
pub struct ExponentialBackoffBuilder {
    initial_delay: Option<Duration>,
    max_delay: Option<Duration>,
    multiplier: Option<f64>,
    jitter: Option<f64>,
}

impl ExponentialBackoffBuilder {
    /// Set the delay after the first failed attempt.
    ///
    /// Default: 100ms
    pub fn initial_delay(mut self, delay: Duration) -> Self {
        self.initial_delay = Some(delay);
        self
    }

    /// Set the maximum delay between attempts.
    ///
    /// Default: 60s
    pub fn max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = Some(delay);
        self
    }

    /// Set the exponential multiplier applied per attempt.
    ///
    /// Default: 2.0 (doubles each time)
    pub fn multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = Some(multiplier);
        self
    }

    /// Set the jitter factor (0.0 to 1.0).
    ///
    /// A jitter of 0.1 means each delay can vary by ±10%. Values outside
    /// [0.0, 1.0] are clamped.
    ///
    /// Default: 0.1
    pub fn jitter(mut self, jitter: f64) -> Self {
        self.jitter = Some(jitter.clamp(0.0, 1.0));
        self
    }

    /// Build the [`ExponentialBackoff`] instance.
    ///
    /// Uses default values for any unset parameters.
    pub fn build(self) -> ExponentialBackoff {
        ExponentialBackoff {
            initial_delay: self.initial_delay.unwrap_or(Duration::from_millis(100)),
            max_delay: self.max_delay.unwrap_or(Duration::from_secs(60)),
            multiplier: self.multiplier.unwrap_or(2.0),
            jitter: self.jitter.unwrap_or(0.1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exponential_delay_calculation() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(100))
            .max_delay(Duration::from_secs(10))
            .multiplier(2.0)
            .jitter(0.0) // No jitter for predictable tests
            .build();

        assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
        assert_eq!(backoff.delay_for(2), Duration::from_millis(200));
        assert_eq!(backoff.delay_for(3), Duration::from_millis(400));
        assert_eq!(backoff.delay_for(4), Duration::from_millis(800));
    }

    #[test]
    fn max_delay_cap() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(5))
            .multiplier(10.0)
            .jitter(0.0)
            .build();

        for attempt in 5..10 {
            let delay = backoff.delay_for(attempt);
            assert!(
                delay <= Duration::from_secs(5),
                "Delay at attempt {} ({:?}) exceeded max_delay",
                attempt,
                delay
            );
        }
    }

    #[test]
    fn jitter_variation() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_secs(1))
            .max_delay(Duration::from_secs(60))
            .multiplier(2.0)
            .jitter(0.5) // 50% jitter
            .build();

        let mut delays = Vec::new();
        for _ in 0..20 {
            delays.push(backoff.delay_for(1));
        }

        // With 50% jitter, delays should be between 0.5s and 1.5s
        for delay in &delays {
            let millis = delay.as_millis();
            assert!(
                (500..=1500).contains(&millis),
                "Delay with 50% jitter should be in range [500ms, 1500ms], got {}ms",
                millis
            );
        }

        // Check that not all delays are identical (very unlikely with jitter)
        let all_same = delays.windows(2).all(|w| w[0] == w[1]);
        assert!(!all_same, "With randomization, delays should vary");
    }

    #[test]
    fn builder_defaults() {
        let backoff = ExponentialBackoff::builder().build();

        assert_eq!(backoff.initial_delay, Duration::from_millis(100));
        assert_eq!(backoff.max_delay, Duration::from_secs(60));
        assert_eq!(backoff.multiplier, 2.0);
        assert_eq!(backoff.jitter, 0.1);
    }

    #[test]
    fn builder_custom_values() {
        let backoff = ExponentialBackoff::builder()
            .initial_delay(Duration::from_millis(200))
            .max_delay(Duration::from_secs(30))
            .multiplier(1.5)
            .jitter(0.2)
            .build();

        assert_eq!(backoff.initial_delay, Duration::from_millis(200));
        assert_eq!(backoff.max_delay, Duration::from_secs(30));
        assert_eq!(backoff.multiplier, 1.5);
        assert_eq!(backoff.jitter, 0.2);
    }

    #[test]
    fn jitter_clamped() {
        let backoff = ExponentialBackoff::builder().jitter(2.0).build();
        assert_eq!(backoff.jitter, 1.0);

        let backoff = ExponentialBackoff::builder().jitter(-0.5).build();
        assert_eq!(backoff.jitter, 0.0);
    }
}

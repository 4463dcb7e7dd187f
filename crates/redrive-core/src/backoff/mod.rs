//! Backoff schedules for retry loops.
//!
//! A schedule answers one question: after attempt `n` failed, how long should
//! the caller wait before issuing attempt `n + 1`? Schedules never sleep
//! themselves; the retry loop owns the wait so it can interrupt it.
//!
//! # Key Types
//!
//! - [`BackoffSchedule`] - core trait (also implemented by plain closures)
//! - [`ExponentialBackoff`] - exponential backoff with jitter
//! - [`FixedBackoff`] - constant delay, including zero for tests
//!
//! # Examples
//!
//! ```rust
//! use redrive_core::backoff::{BackoffSchedule, ExponentialBackoff};
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .initial_delay(Duration::from_millis(250))
//!     .max_delay(Duration::from_secs(5))
//!     .build();
//!
//! let delay = backoff.delay_for(1);
//! assert!(delay <= Duration::from_secs(5));
//! ```

mod exponential;
mod fixed;
mod schedule;

pub use exponential::{ExponentialBackoff, ExponentialBackoffBuilder};
pub use fixed::FixedBackoff;
pub use schedule::BackoffSchedule;

#![deny(unsafe_code)]
#![warn(missing_docs)]

//! Core abstractions for the redrive ecosystem.
//!
//! This crate provides the backoff-schedule abstraction used by the redrive
//! transport layer to decide how long to wait between retry attempts:
//!
//! - [`backoff::BackoffSchedule`] - trait mapping an attempt number to a delay
//! - [`backoff::ExponentialBackoff`] - exponential growth with jitter
//! - [`backoff::FixedBackoff`] - constant (or zero) delay, useful in tests
//!
//! Schedules are pure values: they compute delays but never sleep, so the
//! caller decides how a wait is performed and how it can be interrupted.
//!
//! # Examples
//!
//! ```rust
//! use redrive_core::backoff::{BackoffSchedule, ExponentialBackoff};
//! use std::time::Duration;
//!
//! let backoff = ExponentialBackoff::builder()
//!     .initial_delay(Duration::from_millis(100))
//!     .jitter(0.0)
//!     .build();
//!
//! assert_eq!(backoff.delay_for(1), Duration::from_millis(100));
//! assert_eq!(backoff.delay_for(2), Duration::from_millis(200));
//! ```

pub mod backoff;

/// Convenient re-exports of commonly used items.
pub mod prelude {
    pub use crate::backoff::{BackoffSchedule, ExponentialBackoff, FixedBackoff};
}

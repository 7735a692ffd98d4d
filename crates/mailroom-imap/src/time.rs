//! Time abstraction for testability.
//!
//! This module provides a `Clock` trait that abstracts over the wall clock,
//! so the internal date stamped on uploaded messages can be pinned in tests.
//!
//! # Example
//!
//! ```
//! use chrono::DateTime;
//! use mailroom_imap::time::{Clock, FixedClock, internal_date};
//!
//! let clock = FixedClock::new(DateTime::parse_from_rfc3339("2024-03-05T07:08:09+03:00").unwrap());
//! assert_eq!(internal_date(clock.now()), "05-Mar-2024 07:08:09 +0300");
//! ```

use std::sync::Arc;

use chrono::{DateTime, FixedOffset, Local};

/// Abstraction over the wall clock.
///
/// In production, use [`SystemClock`] which reads the local time.
/// In tests, use [`FixedClock`] to pin time deterministically.
pub trait Clock: Send + Sync {
    /// Returns the current time with its UTC offset.
    fn now(&self) -> DateTime<FixedOffset>;
}

/// System clock that uses real time in the local timezone.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }
}

/// A clock stopped at one instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(DateTime<FixedOffset>);

impl FixedClock {
    /// Creates a clock that always reports `at`.
    #[must_use]
    pub const fn new(at: DateTime<FixedOffset>) -> Self {
        Self(at)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.0
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> DateTime<FixedOffset> {
        self.as_ref().now()
    }
}

/// A boxed clock for dynamic dispatch.
pub type BoxClock = Box<dyn Clock>;

impl Clock for BoxClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.as_ref().now()
    }
}

/// Formats a time as an IMAP internal date: `dd-Mon-yyyy hh:mm:ss +zzzz`.
#[must_use]
pub fn internal_date(at: DateTime<FixedOffset>) -> String {
    at.format("%d-%b-%Y %H:%M:%S %z").to_string()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    #[test]
    fn test_system_clock() {
        let before = Local::now().fixed_offset();
        let from_clock = SystemClock.now();
        let after = Local::now().fixed_offset();

        assert!(from_clock >= before);
        assert!(from_clock <= after);
    }

    #[test]
    fn test_fixed_clock() {
        let clock = FixedClock::new(at("2023-12-31T23:59:59Z"));
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now(), at("2023-12-31T23:59:59Z"));
    }

    #[test]
    fn test_shared_and_boxed_clocks() {
        let fixed = FixedClock::new(at("2020-01-02T03:04:05Z"));
        let shared = Arc::new(fixed);
        let boxed: BoxClock = Box::new(fixed);

        assert_eq!(shared.now(), fixed.now());
        assert_eq!(boxed.now(), fixed.now());
    }

    #[test]
    fn test_internal_date() {
        assert_eq!(
            internal_date(at("2024-03-05T07:08:09+03:00")),
            "05-Mar-2024 07:08:09 +0300"
        );
        assert_eq!(
            internal_date(at("1999-11-20T23:00:00-05:30")),
            "20-Nov-1999 23:00:00 -0530"
        );
    }
}

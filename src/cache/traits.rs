//! Core traits for the freshness checks.

use chrono::{DateTime, Utc};

/// Source of "now" for freshness checks.
///
/// A selector samples the clock once per top-level call, so every record
/// checked during that call is judged against the same instant.
pub trait Clock: Send + Sync {
  fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
  fn now(&self) -> DateTime<Utc> {
    Utc::now()
  }
}

/// Clock pinned to a single instant. Useful for tests and for replaying a
/// captured snapshot as of the moment it was taken.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
  /// Pin the clock to a wire timestamp (milliseconds since the epoch).
  pub fn from_millis(ms: i64) -> Option<Self> {
    DateTime::from_timestamp_millis(ms).map(FixedClock)
  }
}

impl Clock for FixedClock {
  fn now(&self) -> DateTime<Utc> {
    self.0
  }
}

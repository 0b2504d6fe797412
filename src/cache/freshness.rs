//! Timestamp-based freshness.

use chrono::{DateTime, Duration, Utc};

use crate::store::FetchTime;

/// Whether `fetch_time` lies strictly inside the `ttl` window ending at `now`.
///
/// Never-fetched entries are never recent. The in-flight sentinel is the
/// epoch, so on its own it is never recent either; callers that treat
/// in-flight fetches specially check for it before calling this.
pub fn recent(fetch_time: FetchTime, ttl: Duration, now: DateTime<Utc>) -> bool {
  let Some(fetched_ms) = fetch_time.as_millis() else {
    return false;
  };
  now
    .timestamp_millis()
    .saturating_sub(ttl.num_milliseconds())
    < fetched_ms
}

/// A single "now" plus the TTL to judge against.
///
/// Built once per top-level selector call and shared by every check that
/// call makes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Freshness {
  now: DateTime<Utc>,
  ttl: Duration,
}

impl Freshness {
  pub fn new(now: DateTime<Utc>, ttl: Duration) -> Self {
    Self { now, ttl }
  }

  pub fn now(&self) -> DateTime<Utc> {
    self.now
  }

  pub fn ttl(&self) -> Duration {
    self.ttl
  }

  pub fn is_recent(&self, fetch_time: FetchTime) -> bool {
    recent(fetch_time, self.ttl, self.now)
  }
}

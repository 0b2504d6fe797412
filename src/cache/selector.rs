//! Selector entry point: configuration plus a clock.

use chrono::Duration;
use serde_json::Value;
use std::borrow::Cow;

use super::freshness::Freshness;
use super::traits::{Clock, SystemClock};
use crate::config::Config;
use crate::select::{
  self, Action, ActionStatusView, CollectionView, RecordStatus, RecordView, SelectError, Selection,
};
use crate::store::Store;

/// Default cache period in seconds (10 minutes).
pub const DEFAULT_CACHE_PERIOD_SECS: u64 = 600;

/// Per-call overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectOptions {
  /// Cache period for this call only, instead of the selector's default.
  /// A zero interval counts as unset.
  pub interval: Option<Duration>,
}

impl SelectOptions {
  pub fn with_interval(interval: Duration) -> Self {
    Self {
      interval: Some(interval),
    }
  }
}

/// Resolves cached views out of store snapshots.
///
/// Holds the default cache period and a clock; the snapshot itself is passed
/// on every call and never retained.
#[derive(Debug, Clone)]
pub struct Selector<C: Clock = SystemClock> {
  clock: C,
  /// How long before cached data is considered stale
  cache_period: Duration,
}

impl Selector<SystemClock> {
  pub fn new() -> Self {
    Self {
      clock: SystemClock,
      cache_period: Duration::seconds(DEFAULT_CACHE_PERIOD_SECS as i64),
    }
  }

  pub fn from_config(config: &Config) -> Self {
    Self::new().with_cache_period(config.cache.period())
  }
}

impl Default for Selector<SystemClock> {
  fn default() -> Self {
    Self::new()
  }
}

impl<C: Clock> Selector<C> {
  /// Set the default cache period.
  pub fn with_cache_period(mut self, cache_period: Duration) -> Self {
    self.cache_period = cache_period;
    self
  }

  /// Swap the clock, keeping the cache period.
  pub fn with_clock<C2: Clock>(self, clock: C2) -> Selector<C2> {
    Selector {
      clock,
      cache_period: self.cache_period,
    }
  }

  pub fn cache_period(&self) -> Duration {
    self.cache_period
  }

  /// Sample the clock once for a top-level call.
  pub fn freshness(&self, opts: &SelectOptions) -> Freshness {
    let ttl = opts
      .interval
      .filter(|interval| !interval.is_zero())
      .unwrap_or(self.cache_period);
    Freshness::new(self.clock.now(), ttl)
  }

  pub fn select_collection<'a, T>(
    &self,
    model: &str,
    store: &'a Store<T>,
    params: &Value,
    opts: &SelectOptions,
  ) -> CollectionView<'a, T> {
    select::select_collection(model, store, params, &self.freshness(opts))
  }

  pub fn get_record_selection<'a, T>(
    &self,
    model: &str,
    id: Option<&str>,
    store: &'a Store<T>,
    opts: &SelectOptions,
  ) -> RecordView<'a, T> {
    select::get_record_selection(model, id, store, &self.freshness(opts))
  }

  pub fn select_record<'a, T>(
    &self,
    model: &str,
    id: Option<&str>,
    store: &'a Store<T>,
    opts: &SelectOptions,
  ) -> Result<&'a T, RecordStatus<'a>> {
    select::select_record(model, id, store, &self.freshness(opts))
  }

  pub fn select_record_or_empty_object<'a, T: Default + Clone>(
    &self,
    model: &str,
    id: Option<&str>,
    store: &'a Store<T>,
    opts: &SelectOptions,
  ) -> Cow<'a, T> {
    select::select_record_or_empty_object(model, id, store, &self.freshness(opts))
  }

  /// Action statuses carry no timestamps, so no clock is involved.
  pub fn select_action_status<'a, T>(
    &self,
    model: &str,
    store: &'a Store<T>,
    action_key: &str,
  ) -> ActionStatusView<'a> {
    select::select_action_status(model, store, action_key)
  }

  pub fn select<'a, T>(
    &self,
    action: &'a Action,
    store: &'a Store<T>,
    opts: &SelectOptions,
  ) -> Result<Selection<'a, T>, SelectError> {
    select::select(action, store, &self.freshness(opts))
  }
}

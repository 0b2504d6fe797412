//! Freshness rules for cached data.
//!
//! This module decides whether something in the store is still usable:
//! - Timestamp checks against a cache period (`recent`, `Freshness`)
//! - Structural matching of collection params (`find_collection`)
//! - The `Selector` entry point, which samples a `Clock` once per call

mod freshness;
mod params;
mod selector;
mod traits;

pub use freshness::{recent, Freshness};
pub use params::{find_collection, fingerprint, structurally_equal};
pub use selector::{SelectOptions, Selector, DEFAULT_CACHE_PERIOD_SECS};
pub use traits::{Clock, FixedClock, SystemClock};

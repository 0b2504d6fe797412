//! Cache-freshness selectors for a client-side store of fetched data.
//!
//! Given a snapshot of the store and a request (a model plus fetch params,
//! or a model plus a record id), decide whether the cached value can be
//! served, is still loading, failed, or needs a new fetch.
//!
//! ```ignore
//! let selector = Selector::new();
//! let view = selector.select_collection("Book", &store, &json!({}), &SelectOptions::default());
//! if view.needs_fetch() {
//!     dispatch(Action::fetch("Book", json!({})));
//! }
//! ```

pub mod cache;
pub mod config;
pub mod logging;
pub mod select;
pub mod store;

pub use cache::{Clock, FixedClock, Freshness, SelectOptions, Selector, SystemClock};
pub use config::Config;
pub use select::{
  Action, ActionStatusView, ActionType, CollectionView, RecordStatus, RecordView, SelectError,
  SelectedView, Selection, ViewState,
};
pub use store::{FetchError, FetchTime, Id, JsonRecord, Store};

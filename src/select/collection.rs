//! Collection selector.

use serde_json::Value;
use tracing::{debug, trace};

use super::view::{CollectionView, ViewState};
use crate::cache::{find_collection, fingerprint, Freshness};
use crate::store::{FetchTime, Store};

/// Select the collection fetched with `params`.
///
/// 1. No collection matches: loading, needs a fetch
/// 2. The collection's fetch is in flight: loading, no new fetch
/// 3. The collection is stale: loading, needs a fetch
/// 4. Any referenced record is stale (or missing) and not in flight: loading,
///    needs a fetch
/// 5. Otherwise ready, with records in `ids` order
///
/// Any error stored on the matched collection is carried on the view in
/// every case.
pub fn select_collection<'a, T>(
  model: &str,
  store: &'a Store<T>,
  params: &Value,
  freshness: &Freshness,
) -> CollectionView<'a, T> {
  let state = store.model(model);
  let collection = state.and_then(|s| find_collection(&s.collections, params));

  let Some(collection) = collection else {
    debug!(model, params = %fingerprint(params), "collection not cached");
    return CollectionView::loading(true, None);
  };

  let error = collection.error.as_ref();

  if collection.fetch_time.is_in_flight() {
    debug!(model, params = %fingerprint(params), "collection fetch in flight");
    return CollectionView::loading(false, error);
  }
  if !freshness.is_recent(collection.fetch_time) {
    debug!(model, params = %fingerprint(params), "collection is stale");
    return CollectionView::loading(true, error);
  }

  let record = |id: &str| state.and_then(|s| s.record(id));

  let stale = collection.ids.iter().find(|id| {
    let fetch_time = record(id.as_str())
      .map(|entry| entry.fetch_time)
      .unwrap_or(FetchTime::NeverFetched);
    trace!(model, id = %id, ?fetch_time, "checking record freshness");
    !fetch_time.is_in_flight() && !freshness.is_recent(fetch_time)
  });
  if let Some(id) = stale {
    debug!(
      model,
      params = %fingerprint(params),
      id = %id,
      "collection has a stale record"
    );
    return CollectionView::loading(true, error);
  }

  let data = collection
    .ids
    .iter()
    .map(|id| record(id.as_str()).and_then(|entry| entry.record.as_ref()))
    .collect();

  CollectionView {
    state: ViewState::Ready(data),
    other_info: Some(&collection.other_info),
    error,
  }
}

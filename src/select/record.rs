//! Record selectors.

use std::borrow::Cow;
use tracing::debug;

use super::view::{RecordStatus, RecordView, ViewState};
use crate::cache::Freshness;
use crate::store::Store;

/// Select a single record.
///
/// Checked in order:
/// 1. Fetch in flight: loading, no new fetch
/// 2. No id, no entry, or a stale entry: loading, needs a fetch
/// 3. The entry recorded an error: error
/// 4. Otherwise: the record, which may be absent from the entry
pub fn get_record_selection<'a, T>(
  model: &str,
  id: Option<&str>,
  store: &'a Store<T>,
  freshness: &Freshness,
) -> RecordView<'a, T> {
  let entry = id.and_then(|id| store.model(model)?.record(id));

  let entry = match entry {
    Some(entry) if entry.fetch_time.is_in_flight() => {
      return ViewState::Loading { needs_fetch: false };
    }
    Some(entry) if freshness.is_recent(entry.fetch_time) => entry,
    Some(_) => {
      debug!(model, ?id, "record is stale");
      return ViewState::Loading { needs_fetch: true };
    }
    None => {
      debug!(model, ?id, "record not cached");
      return ViewState::Loading { needs_fetch: true };
    }
  };

  if let Some(error) = &entry.error {
    return ViewState::Error(error);
  }

  if entry.record.is_none() {
    debug!(model, ?id, "record entry has no data");
  }
  ViewState::Ready(entry.record.as_ref())
}

/// The bare record when it is ready, otherwise why it is not.
pub fn select_record<'a, T>(
  model: &str,
  id: Option<&str>,
  store: &'a Store<T>,
  freshness: &Freshness,
) -> Result<&'a T, RecordStatus<'a>> {
  match get_record_selection(model, id, store, freshness) {
    ViewState::Ready(Some(record)) => Ok(record),
    ViewState::Ready(None) => Err(RecordStatus::Empty),
    ViewState::Loading { needs_fetch } => Err(RecordStatus::Loading { needs_fetch }),
    ViewState::Error(error) => Err(RecordStatus::Failed(error)),
  }
}

/// The record when it is ready, otherwise an empty record.
pub fn select_record_or_empty_object<'a, T: Default + Clone>(
  model: &str,
  id: Option<&str>,
  store: &'a Store<T>,
  freshness: &Freshness,
) -> Cow<'a, T> {
  match select_record(model, id, store, freshness) {
    Ok(record) => Cow::Borrowed(record),
    Err(_) => Cow::Owned(T::default()),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::JsonRecord;
  use chrono::{DateTime, Duration};
  use serde_json::{json, Value};

  const NOW: i64 = 1_700_000_000_000;

  fn freshness() -> Freshness {
    Freshness::new(
      DateTime::from_timestamp_millis(NOW).unwrap(),
      Duration::minutes(10),
    )
  }

  fn store() -> Store {
    serde_json::from_value(json!({
      "Book": {
        "byId": {
          "fresh": { "record": { "title": "Fresh" }, "fetchTime": NOW, "error": null },
          "in-flight": { "record": { "title": "Old" }, "fetchTime": 0, "error": null },
          "stale": { "record": { "title": "Stale" }, "fetchTime": NOW - 600_000, "error": null },
          "never": { "fetchTime": null },
          "failed": { "fetchTime": NOW, "error": { "message": "not found", "status": 404 } },
          "empty": { "fetchTime": NOW, "error": null }
        }
      }
    }))
    .unwrap()
  }

  fn title(record: &JsonRecord) -> &str {
    record["title"].as_str().unwrap()
  }

  #[test]
  fn test_fresh_record_is_ready() {
    let store = store();
    let view = get_record_selection("Book", Some("fresh"), &store, &freshness());
    assert_eq!(view.record().map(title), Some("Fresh"));
    assert!(!view.is_loading());
    assert!(!view.needs_fetch());
  }

  #[test]
  fn test_in_flight_record_does_not_refetch() {
    let store = store();
    let view = get_record_selection("Book", Some("in-flight"), &store, &freshness());
    assert_eq!(view, ViewState::Loading { needs_fetch: false });
  }

  #[test]
  fn test_stale_missing_and_unset_need_fetch() {
    let store = store();
    for id in [Some("stale"), Some("never"), Some("missing"), None] {
      let view = get_record_selection("Book", id, &store, &freshness());
      assert_eq!(view, ViewState::Loading { needs_fetch: true }, "id {:?}", id);
    }

    let unknown_model = get_record_selection("Author", Some("fresh"), &store, &freshness());
    assert_eq!(unknown_model, ViewState::Loading { needs_fetch: true });
  }

  #[test]
  fn test_recorded_error_is_returned_as_data() {
    let store = store();
    let view = get_record_selection("Book", Some("failed"), &store, &freshness());
    let error = view.error().unwrap();
    assert_eq!(error.message, "not found");
    assert_eq!(error.details["status"], json!(404));
    assert!(!view.is_loading());
    assert!(!view.needs_fetch());
  }

  #[test]
  fn test_fresh_entry_without_record_is_ready_and_empty() {
    let store = store();
    let view = get_record_selection("Book", Some("empty"), &store, &freshness());
    assert_eq!(view, ViewState::Ready(None));
    assert!(!view.is_loading());
    assert!(!view.needs_fetch());

    let status = select_record("Book", Some("empty"), &store, &freshness()).unwrap_err();
    assert_eq!(status, RecordStatus::Empty);
    assert!(!status.needs_fetch());

    let empty = select_record_or_empty_object("Book", Some("empty"), &store, &freshness());
    assert!(empty.is_empty());
  }

  #[test]
  fn test_empty_entry_agrees_with_collection_path() {
    let store: Store = serde_json::from_value(json!({
      "Book": {
        "byId": { "1": { "fetchTime": NOW, "error": null } },
        "collections": [{ "params": {}, "ids": ["1"], "fetchTime": NOW }]
      }
    }))
    .unwrap();

    let record = get_record_selection("Book", Some("1"), &store, &freshness());
    let collection =
      crate::select::select_collection("Book", &store, &json!({}), &freshness());
    assert_eq!(record.needs_fetch(), collection.needs_fetch());
    assert!(!record.is_loading());
    assert_eq!(
      serde_json::to_value(record).unwrap(),
      json!({ "isLoading": false, "needsFetch": false, "data": null })
    );
  }

  #[test]
  fn test_select_record_unwraps_ready_record() {
    let store = store();
    let record = select_record("Book", Some("fresh"), &store, &freshness()).unwrap();
    assert_eq!(title(record), "Fresh");

    let status = select_record("Book", Some("in-flight"), &store, &freshness()).unwrap_err();
    assert!(status.is_loading());
    assert!(!status.needs_fetch());

    let status = select_record("Book", Some("failed"), &store, &freshness()).unwrap_err();
    assert_eq!(status.error().unwrap().message, "not found");
  }

  #[test]
  fn test_select_record_or_empty_object() {
    let store = store();
    let ready = select_record_or_empty_object("Book", Some("fresh"), &store, &freshness());
    assert_eq!(title(&ready), "Fresh");

    for id in ["in-flight", "stale", "missing", "failed"] {
      let empty = select_record_or_empty_object("Book", Some(id), &store, &freshness());
      assert!(empty.is_empty(), "id {}", id);
    }
  }

  #[test]
  fn test_loading_serializes_without_sentinel_error() {
    let store = store();
    let view = get_record_selection("Book", Some("stale"), &store, &freshness());
    let value = serde_json::to_value(view).unwrap();
    assert_eq!(value, json!({ "isLoading": true, "needsFetch": true }));
    assert_eq!(value.get("error"), None::<&Value>);
  }
}

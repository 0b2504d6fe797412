//! View types produced by the selectors.
//!
//! Every view is exactly one of three states, in the spirit of an async
//! query state:
//!
//! ```ignore
//! match selector.get_record_selection("Book", Some("1"), &store, &opts) {
//!     ViewState::Loading { needs_fetch: true } => dispatch_fetch(),
//!     ViewState::Loading { .. } => render_spinner(),
//!     ViewState::Error(e) => render_error(e),
//!     ViewState::Ready(Some(book)) => render_book(book),
//!     ViewState::Ready(None) => render_empty(),
//! }
//! ```
//!
//! Views borrow from the store snapshot they were selected from. They
//! serialize to the camelCase shape render layers expect (`isLoading`,
//! `needsFetch`, `data`, `error`, `otherInfo`).

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};
use std::fmt;

use crate::store::FetchError;

/// Display text for a view that has nothing to show yet.
pub const LOADING_MESSAGE: &str = "Loading...";

/// The state of a selected view
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a, D> {
  /// Nothing usable yet; `needs_fetch` is false when a fetch is already in flight
  Loading { needs_fetch: bool },
  /// The last fetch failed
  Error(&'a FetchError),
  /// Cached data is fresh enough to serve
  Ready(D),
}

impl<'a, D> ViewState<'a, D> {
  pub fn is_loading(&self) -> bool {
    matches!(self, ViewState::Loading { .. })
  }

  pub fn needs_fetch(&self) -> bool {
    matches!(self, ViewState::Loading { needs_fetch: true })
  }

  pub fn is_ready(&self) -> bool {
    matches!(self, ViewState::Ready(_))
  }

  pub fn is_error(&self) -> bool {
    matches!(self, ViewState::Error(_))
  }

  pub fn data(&self) -> Option<&D> {
    match self {
      ViewState::Ready(data) => Some(data),
      _ => None,
    }
  }

  pub fn into_data(self) -> Option<D> {
    match self {
      ViewState::Ready(data) => Some(data),
      _ => None,
    }
  }

  pub fn error(&self) -> Option<&'a FetchError> {
    match self {
      ViewState::Error(e) => Some(*e),
      _ => None,
    }
  }

  pub fn map<E>(self, f: impl FnOnce(D) -> E) -> ViewState<'a, E> {
    match self {
      ViewState::Loading { needs_fetch } => ViewState::Loading { needs_fetch },
      ViewState::Error(e) => ViewState::Error(e),
      ViewState::Ready(data) => ViewState::Ready(f(data)),
    }
  }

  pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error>
  where
    D: Serialize,
  {
    map.serialize_entry("isLoading", &self.is_loading())?;
    map.serialize_entry("needsFetch", &self.needs_fetch())?;
    match self {
      ViewState::Loading { .. } => Ok(()),
      ViewState::Error(e) => map.serialize_entry("error", e),
      ViewState::Ready(data) => map.serialize_entry("data", data),
    }
  }
}

impl<D> fmt::Display for ViewState<'_, D> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ViewState::Loading { .. } => f.write_str(LOADING_MESSAGE),
      ViewState::Error(e) => write!(f, "{}", e),
      ViewState::Ready(_) => f.write_str("Ready"),
    }
  }
}

impl<D: Serialize> Serialize for ViewState<'_, D> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    self.serialize_fields(&mut map)?;
    map.end()
  }
}

/// View of a single record.
///
/// `Ready(None)` is a fresh, error-free entry that holds no record: nothing
/// to show, but nothing to refetch either.
pub type RecordView<'a, T> = ViewState<'a, Option<&'a T>>;

impl<'a, T> ViewState<'a, Option<&'a T>> {
  /// The record, when ready and present.
  pub fn record(&self) -> Option<&'a T> {
    match self {
      ViewState::Ready(record) => *record,
      _ => None,
    }
  }
}

/// Why `select_record` had no record to hand back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RecordStatus<'a> {
  Loading { needs_fetch: bool },
  Failed(&'a FetchError),
  /// Fresh and error-free, but the entry holds no record
  Empty,
}

impl<'a> RecordStatus<'a> {
  pub fn is_loading(&self) -> bool {
    matches!(self, RecordStatus::Loading { .. })
  }

  pub fn needs_fetch(&self) -> bool {
    matches!(self, RecordStatus::Loading { needs_fetch: true })
  }

  pub fn error(&self) -> Option<&'a FetchError> {
    match self {
      RecordStatus::Failed(e) => Some(*e),
      RecordStatus::Loading { .. } | RecordStatus::Empty => None,
    }
  }
}

impl<'a, T> From<RecordStatus<'a>> for RecordView<'a, T> {
  fn from(status: RecordStatus<'a>) -> Self {
    match status {
      RecordStatus::Loading { needs_fetch } => ViewState::Loading { needs_fetch },
      RecordStatus::Failed(e) => ViewState::Error(e),
      RecordStatus::Empty => ViewState::Ready(None),
    }
  }
}

impl fmt::Display for RecordStatus<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      RecordStatus::Loading { .. } => f.write_str(LOADING_MESSAGE),
      RecordStatus::Failed(e) => write!(f, "{}", e),
      RecordStatus::Empty => f.write_str("No record"),
    }
  }
}

impl Serialize for RecordStatus<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let view: RecordView<'_, ()> = (*self).into();
    view.serialize(serializer)
  }
}

/// View of a collection.
///
/// `state` is only ever `Loading` or `Ready`: a collection whose last fetch
/// failed still serves whatever it has, and reports the failure in `error`
/// next to the state.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionView<'a, T> {
  /// Records in `ids` order; `None` where an id has no record yet
  pub state: ViewState<'a, Vec<Option<&'a T>>>,
  pub other_info: Option<&'a Map<String, Value>>,
  /// Error recorded on the matched collection, if any
  pub error: Option<&'a FetchError>,
}

impl<'a, T> CollectionView<'a, T> {
  pub(crate) fn loading(needs_fetch: bool, error: Option<&'a FetchError>) -> Self {
    Self {
      state: ViewState::Loading { needs_fetch },
      other_info: None,
      error,
    }
  }

  pub fn is_loading(&self) -> bool {
    self.state.is_loading()
  }

  pub fn needs_fetch(&self) -> bool {
    self.state.needs_fetch()
  }

  /// Resolved records; empty while loading.
  pub fn data(&self) -> &[Option<&'a T>] {
    self.state.data().map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn other_info(&self) -> Option<&'a Map<String, Value>> {
    self.other_info
  }

  pub fn error(&self) -> Option<&'a FetchError> {
    self.error
  }

  pub(crate) fn serialize_fields<M: SerializeMap>(&self, map: &mut M) -> Result<(), M::Error>
  where
    T: Serialize,
  {
    match self.other_info {
      Some(info) => map.serialize_entry("otherInfo", info)?,
      None => map.serialize_entry("otherInfo", &Map::new())?,
    }
    map.serialize_entry("data", self.data())?;
    map.serialize_entry("isLoading", &self.is_loading())?;
    map.serialize_entry("needsFetch", &self.needs_fetch())?;
    if let Some(error) = self.error {
      map.serialize_entry("error", error)?;
    }
    Ok(())
  }
}

impl<T: Serialize> Serialize for CollectionView<'_, T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    self.serialize_fields(&mut map)?;
    map.end()
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::store::JsonRecord;
  use serde_json::json;

  #[test]
  fn test_view_state_accessors() {
    let loading: ViewState<'_, i32> = ViewState::Loading { needs_fetch: true };
    assert!(loading.is_loading());
    assert!(loading.needs_fetch());
    assert_eq!(loading.data(), None);
    assert_eq!(loading.to_string(), LOADING_MESSAGE);

    let in_flight: ViewState<'_, i32> = ViewState::Loading { needs_fetch: false };
    assert!(in_flight.is_loading());
    assert!(!in_flight.needs_fetch());

    let ready: ViewState<'_, i32> = ViewState::Ready(7);
    assert!(ready.is_ready());
    assert_eq!(ready.map(|n| n * 2).into_data(), Some(14));
  }

  #[test]
  fn test_error_state_serializes_without_data() {
    let err = FetchError::new("boom");
    let view: RecordView<'_, JsonRecord> = ViewState::Error(&err);
    assert_eq!(
      serde_json::to_value(view).unwrap(),
      json!({ "isLoading": false, "needsFetch": false, "error": { "message": "boom" } })
    );
  }

  #[test]
  fn test_record_status_round_trips_into_view() {
    let status = RecordStatus::Loading { needs_fetch: false };
    let view: RecordView<'_, JsonRecord> = status.into();
    assert_eq!(view, ViewState::Loading { needs_fetch: false });
    assert_eq!(
      serde_json::to_value(status).unwrap(),
      json!({ "isLoading": true, "needsFetch": false })
    );
  }

  #[test]
  fn test_empty_record_status_is_ready_without_record() {
    let view: RecordView<'_, JsonRecord> = RecordStatus::Empty.into();
    assert!(view.is_ready());
    assert!(!view.needs_fetch());
    assert_eq!(view.record(), None);
    assert_eq!(
      serde_json::to_value(RecordStatus::Empty).unwrap(),
      json!({ "isLoading": false, "needsFetch": false, "data": null })
    );
  }

  #[test]
  fn test_loading_collection_serializes_empty_data() {
    let view: CollectionView<'_, JsonRecord> = CollectionView::loading(true, None);
    assert!(view.data().is_empty());
    assert_eq!(
      serde_json::to_value(&view).unwrap(),
      json!({ "otherInfo": {}, "data": [], "isLoading": true, "needsFetch": true })
    );
  }
}

//! Routing fetch actions to the matching selector.

use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::collection::select_collection;
use super::record::get_record_selection;
use super::view::{CollectionView, RecordView};
use crate::cache::Freshness;
use crate::store::{Id, Store};

/// Kind of a write-path action, from its `type` string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ActionType {
  /// Fetch a collection
  Fetch,
  /// Fetch a single record
  FetchOne,
  Create,
  Update,
  Delete,
  ApiCall,
  ClearActionStatus,
  /// Anything else, kept verbatim
  Other(String),
}

impl ActionType {
  pub fn as_str(&self) -> &str {
    match self {
      ActionType::Fetch => "FETCH",
      ActionType::FetchOne => "FETCH_ONE",
      ActionType::Create => "CREATE",
      ActionType::Update => "UPDATE",
      ActionType::Delete => "DELETE",
      ActionType::ApiCall => "API_CALL",
      ActionType::ClearActionStatus => "CLEAR_ACTION_STATUS",
      ActionType::Other(s) => s,
    }
  }

  pub fn is_fetch(&self) -> bool {
    matches!(self, ActionType::Fetch | ActionType::FetchOne)
  }
}

impl From<String> for ActionType {
  fn from(s: String) -> Self {
    match s.as_str() {
      "FETCH" => ActionType::Fetch,
      "FETCH_ONE" => ActionType::FetchOne,
      "CREATE" => ActionType::Create,
      "UPDATE" => ActionType::Update,
      "DELETE" => ActionType::Delete,
      "API_CALL" => ActionType::ApiCall,
      "CLEAR_ACTION_STATUS" => ActionType::ClearActionStatus,
      _ => ActionType::Other(s),
    }
  }
}

impl From<&str> for ActionType {
  fn from(s: &str) -> Self {
    ActionType::from(s.to_string())
  }
}

impl From<ActionType> for String {
  fn from(kind: ActionType) -> Self {
    kind.as_str().to_string()
  }
}

impl fmt::Display for ActionType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl Serialize for ActionType {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(self.as_str())
  }
}

impl<'de> Deserialize<'de> for ActionType {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    String::deserialize(deserializer).map(ActionType::from)
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionMeta {
  pub model: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub id: Option<Id>,
  /// Everything else the write path put on the meta (callbacks, keys...)
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub params: Option<Value>,
  /// Request details such as `path` or `method`
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// An action as dispatched on the write path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
  #[serde(rename = "type")]
  pub kind: ActionType,
  pub meta: ActionMeta,
  #[serde(default)]
  pub payload: ActionPayload,
}

impl Action {
  /// A collection fetch for `model` with `params`.
  pub fn fetch(model: impl Into<String>, params: Value) -> Self {
    Self {
      kind: ActionType::Fetch,
      meta: ActionMeta {
        model: model.into(),
        id: None,
        extra: Map::new(),
      },
      payload: ActionPayload {
        params: Some(params),
        extra: Map::new(),
      },
    }
  }

  /// A single-record fetch for `model`.
  pub fn fetch_one(model: impl Into<String>, id: impl Into<Id>) -> Self {
    Self {
      kind: ActionType::FetchOne,
      meta: ActionMeta {
        model: model.into(),
        id: Some(id.into()),
        extra: Map::new(),
      },
      payload: ActionPayload::default(),
    }
  }
}

/// Misuse of the selectors by the caller.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
  #[error("Selecting a record of '{model}', but no ID was given")]
  MissingId { model: String },
  #[error("Action type '{0}' is not a fetch action")]
  UnsupportedAction(String),
}

/// What `select` resolved an action to.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectedView<'a, T> {
  Collection(CollectionView<'a, T>),
  Record(RecordView<'a, T>),
}

impl<'a, T> SelectedView<'a, T> {
  pub fn is_loading(&self) -> bool {
    match self {
      SelectedView::Collection(view) => view.is_loading(),
      SelectedView::Record(view) => view.is_loading(),
    }
  }

  pub fn needs_fetch(&self) -> bool {
    match self {
      SelectedView::Collection(view) => view.needs_fetch(),
      SelectedView::Record(view) => view.needs_fetch(),
    }
  }
}

/// A view plus the action it was selected for.
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<'a, T> {
  pub view: SelectedView<'a, T>,
  /// The originating action, so callers can dispatch it when `needs_fetch`
  pub fetch: &'a Action,
}

impl<'a, T> Selection<'a, T> {
  pub fn is_loading(&self) -> bool {
    self.view.is_loading()
  }

  pub fn needs_fetch(&self) -> bool {
    self.view.needs_fetch()
  }
}

impl<T: Serialize> Serialize for Selection<'_, T> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    match &self.view {
      SelectedView::Collection(view) => view.serialize_fields(&mut map)?,
      SelectedView::Record(view) => view.serialize_fields(&mut map)?,
    }
    map.serialize_entry("fetch", self.fetch)?;
    map.end()
  }
}

/// Select whatever `action` would fetch.
///
/// `FETCH` selects a collection by the action's params (an empty object when
/// none are given), `FETCH_ONE` selects a record by the action's id. Any
/// other action, or `FETCH_ONE` without an id, is a usage error.
pub fn select<'a, T>(
  action: &'a Action,
  store: &'a Store<T>,
  freshness: &Freshness,
) -> Result<Selection<'a, T>, SelectError> {
  let model = action.meta.model.as_str();

  let view = match &action.kind {
    ActionType::Fetch => {
      let empty = Value::Object(Map::new());
      let params = action.payload.params.as_ref().unwrap_or(&empty);
      SelectedView::Collection(select_collection(model, store, params, freshness))
    }
    ActionType::FetchOne => {
      let id = action.meta.id.as_ref().ok_or_else(|| SelectError::MissingId {
        model: model.to_string(),
      })?;
      SelectedView::Record(get_record_selection(
        model,
        Some(id.as_str()),
        store,
        freshness,
      ))
    }
    other => return Err(SelectError::UnsupportedAction(other.to_string())),
  };

  Ok(Selection {
    view,
    fetch: action,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::{DateTime, Duration};
  use serde_json::json;

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
        "byId": { "1": { "record": { "title": "X" }, "fetchTime": NOW } },
        "collections": [{ "params": { "page": 1 }, "ids": ["1"], "fetchTime": NOW }]
      }
    }))
    .unwrap()
  }

  #[test]
  fn test_fetch_routes_to_collection() {
    let store = store();
    let action = Action::fetch("Book", json!({ "page": 1 }));

    let selection = select(&action, &store, &freshness()).unwrap();
    assert!(matches!(selection.view, SelectedView::Collection(_)));
    assert!(!selection.is_loading());
    assert_eq!(
      serde_json::to_value(&selection).unwrap(),
      json!({
        "otherInfo": {},
        "data": [{ "title": "X" }],
        "isLoading": false,
        "needsFetch": false,
        "fetch": { "type": "FETCH", "meta": { "model": "Book" }, "payload": { "params": { "page": 1 } } }
      })
    );
  }

  #[test]
  fn test_fetch_without_params_uses_empty_object() {
    let store = store();
    let action: Action =
      serde_json::from_value(json!({ "type": "FETCH", "meta": { "model": "Book" } })).unwrap();

    let selection = select(&action, &store, &freshness()).unwrap();
    assert!(selection.needs_fetch());
  }

  #[test]
  fn test_fetch_one_routes_to_record() {
    let store = store();
    let action: Action = serde_json::from_value(json!({
      "type": "FETCH_ONE",
      "meta": { "model": "Book", "id": 1 },
      "payload": {}
    }))
    .unwrap();

    let selection = select(&action, &store, &freshness()).unwrap();
    match &selection.view {
      SelectedView::Record(view) => assert_eq!(view.record().unwrap()["title"], json!("X")),
      other => panic!("expected a record view, got {:?}", other),
    }
    assert!(std::ptr::eq(selection.fetch, &action));

    let value = serde_json::to_value(&selection).unwrap();
    assert_eq!(value["data"]["title"], json!("X"));
    assert_eq!(value["fetch"]["meta"]["id"], json!("1"));
  }

  #[test]
  fn test_fetch_carries_the_whole_action() {
    let store = store();
    let raw = json!({
      "type": "FETCH",
      "meta": {
        "model": "Book",
        "params": {},
        "success": "books/loaded",
        "failure": "books/failed"
      },
      "payload": { "method": "get", "path": "/books", "params": {} }
    });
    let action: Action = serde_json::from_value(raw.clone()).unwrap();
    assert_eq!(action.payload.extra["path"], json!("/books"));

    let selection = select(&action, &store, &freshness()).unwrap();
    let value = serde_json::to_value(&selection).unwrap();
    assert_eq!(value["fetch"], raw);
  }

  #[test]
  fn test_fetch_one_without_id_is_usage_error() {
    let store = store();
    let action: Action =
      serde_json::from_value(json!({ "type": "FETCH_ONE", "meta": { "model": "Book" } })).unwrap();

    let err = select(&action, &store, &freshness()).unwrap_err();
    assert_eq!(
      err,
      SelectError::MissingId {
        model: "Book".to_string()
      }
    );
  }

  #[test]
  fn test_non_fetch_action_is_usage_error() {
    let store = store();
    for kind in ["CREATE", "SOMETHING_ELSE"] {
      let action: Action =
        serde_json::from_value(json!({ "type": kind, "meta": { "model": "Book" } })).unwrap();

      let err = select(&action, &store, &freshness()).unwrap_err();
      assert_eq!(err, SelectError::UnsupportedAction(kind.to_string()));
      assert!(err.to_string().contains(kind));
    }
  }

  #[test]
  fn test_loading_looks_the_same_on_both_paths() {
    let store: Store = serde_json::from_value(json!({})).unwrap();
    let collection = Action::fetch("Book", json!({}));
    let record = Action::fetch_one("Book", "1");

    for action in [&collection, &record] {
      let value = serde_json::to_value(select(action, &store, &freshness()).unwrap()).unwrap();
      assert_eq!(value["isLoading"], json!(true));
      assert_eq!(value["needsFetch"], json!(true));
      assert_eq!(value.get("error"), None, "{}", action.kind);
    }
  }

  #[test]
  fn test_action_type_round_trips_known_and_unknown_kinds() {
    assert_eq!(ActionType::from("FETCH_ONE"), ActionType::FetchOne);
    assert!(ActionType::from("FETCH").is_fetch());
    assert!(!ActionType::from("API_CALL").is_fetch());
    assert_eq!(ActionType::from("CUSTOM").as_str(), "CUSTOM");
  }
}

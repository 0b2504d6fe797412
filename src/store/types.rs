//! Entry types for the store snapshot.
//!
//! These mirror the JSON the write path keeps per model: records keyed by
//! id, collections keyed by their fetch parameters, and action statuses.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Default record type: a JSON object.
pub type JsonRecord = Map<String, Value>;

/// When an entry was last fetched.
///
/// On the wire this is milliseconds since the Unix epoch, with `0` reserved
/// for a fetch that is still in flight and `null` (or a missing field) for an
/// entry that was never fetched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchTime {
  #[default]
  NeverFetched,
  /// A fetch has been dispatched and has not resolved yet
  InFlight,
  FetchedAt(DateTime<Utc>),
}

impl FetchTime {
  /// Build from the wire representation. Returns `None` when `ms` is out of
  /// the representable range.
  pub fn from_millis(ms: i64) -> Option<Self> {
    if ms == 0 {
      return Some(FetchTime::InFlight);
    }
    DateTime::from_timestamp_millis(ms).map(FetchTime::FetchedAt)
  }

  /// Wire value in milliseconds; `None` for never-fetched.
  pub fn as_millis(&self) -> Option<i64> {
    match self {
      FetchTime::NeverFetched => None,
      FetchTime::InFlight => Some(0),
      FetchTime::FetchedAt(at) => Some(at.timestamp_millis()),
    }
  }

  pub fn is_in_flight(&self) -> bool {
    matches!(self, FetchTime::InFlight)
  }
}

impl From<DateTime<Utc>> for FetchTime {
  fn from(at: DateTime<Utc>) -> Self {
    FetchTime::FetchedAt(at)
  }
}

impl Serialize for FetchTime {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    match self.as_millis() {
      Some(ms) => serializer.serialize_i64(ms),
      None => serializer.serialize_none(),
    }
  }
}

impl<'de> Deserialize<'de> for FetchTime {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    match Option::<i64>::deserialize(deserializer)? {
      None => Ok(FetchTime::NeverFetched),
      Some(ms) => FetchTime::from_millis(ms)
        .ok_or_else(|| de::Error::custom(format!("fetchTime out of range: {}", ms))),
    }
  }
}

/// Record identifier.
///
/// The write path stores ids as either strings or integers; both are
/// normalized to the string form used as the `byId` key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(String);

impl Id {
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for Id {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Borrow<str> for Id {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for Id {
  fn from(s: &str) -> Self {
    Id(s.to_string())
  }
}

impl From<String> for Id {
  fn from(s: String) -> Self {
    Id(s)
  }
}

impl From<i64> for Id {
  fn from(n: i64) -> Self {
    Id(n.to_string())
  }
}

impl Serialize for Id {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&self.0)
  }
}

impl<'de> Deserialize<'de> for Id {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
      Str(String),
      Int(i64),
      UInt(u64),
    }

    Ok(match RawId::deserialize(deserializer)? {
      RawId::Str(s) => Id(s),
      RawId::Int(n) => Id(n.to_string()),
      RawId::UInt(n) => Id(n.to_string()),
    })
  }
}

/// A failed fetch recorded on a stored entry.
///
/// This is data, not a fault: selectors hand it to the caller inside the view.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FetchError {
  pub message: String,
  /// Anything else the write path recorded (status code, response body...)
  #[serde(flatten)]
  pub details: Map<String, Value>,
}

impl FetchError {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      message: message.into(),
      details: Map::new(),
    }
  }
}

impl<'de> Deserialize<'de> for FetchError {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawError {
      Message(String),
      Object {
        #[serde(default)]
        message: String,
        #[serde(flatten)]
        details: Map<String, Value>,
      },
    }

    Ok(match RawError::deserialize(deserializer)? {
      RawError::Message(message) => FetchError::new(message),
      RawError::Object { message, details } => FetchError { message, details },
    })
  }
}

/// Cached state for one record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordEntry<T> {
  pub record: Option<T>,
  #[serde(default)]
  pub fetch_time: FetchTime,
  #[serde(default)]
  pub error: Option<FetchError>,
}

/// Cached state for one collection, keyed by the params it was fetched with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionEntry {
  #[serde(default)]
  pub params: Value,
  #[serde(default)]
  pub ids: Vec<Id>,
  #[serde(default)]
  pub fetch_time: FetchTime,
  #[serde(default)]
  pub error: Option<FetchError>,
  #[serde(default)]
  pub other_info: Map<String, Value>,
}

/// Lifecycle of a dispatched write action (create, update, delete...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActionStatusEntry {
  /// A stored `null` reads as not pending
  #[serde(default, deserialize_with = "null_as_false")]
  pub pending: bool,
  #[serde(default)]
  pub id: Option<Id>,
  #[serde(default)]
  pub is_success: Option<bool>,
  #[serde(default)]
  pub payload: Option<Value>,
}

fn null_as_false<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
  Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}

/// Everything cached for one model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ModelState<T> {
  #[serde(default)]
  pub by_id: HashMap<String, RecordEntry<T>>,
  #[serde(default)]
  pub collections: Vec<CollectionEntry>,
  #[serde(default)]
  pub action_status: HashMap<String, ActionStatusEntry>,
}

impl<T> Default for ModelState<T> {
  fn default() -> Self {
    Self {
      by_id: HashMap::new(),
      collections: Vec::new(),
      action_status: HashMap::new(),
    }
  }
}

impl<T> ModelState<T> {
  pub fn record(&self, id: &str) -> Option<&RecordEntry<T>> {
    self.by_id.get(id)
  }

  pub fn action_status(&self, key: &str) -> Option<&ActionStatusEntry> {
    self.action_status.get(key)
  }
}

//! Read-only snapshot of the client-side store.
//!
//! The store is owned and written by the fetch/write path; this crate only
//! ever reads a snapshot of it. A snapshot maps model names to the records,
//! collections and action statuses cached for that model.

mod types;

use color_eyre::{eyre::eyre, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub use types::{
  ActionStatusEntry, CollectionEntry, FetchError, FetchTime, Id, JsonRecord, ModelState,
  RecordEntry,
};

/// Store snapshot, keyed by model name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Store<T = JsonRecord> {
  models: HashMap<String, ModelState<T>>,
}

impl<T> Default for Store<T> {
  fn default() -> Self {
    Self {
      models: HashMap::new(),
    }
  }
}

impl<T> Store<T> {
  pub fn new() -> Self {
    Self::default()
  }

  /// Cached state for a model, if anything was ever stored for it.
  pub fn model(&self, name: &str) -> Option<&ModelState<T>> {
    self.models.get(name)
  }

  pub fn model_names(&self) -> impl Iterator<Item = &str> {
    self.models.keys().map(String::as_str)
  }

  /// Replace the cached state of one model. Meant for callers assembling a
  /// snapshot by hand; the selectors never call this.
  pub fn insert_model(&mut self, name: impl Into<String>, state: ModelState<T>) {
    self.models.insert(name.into(), state);
  }
}

impl<T: DeserializeOwned> Store<T> {
  /// Load a snapshot previously dumped as JSON.
  pub fn load(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read store snapshot {}: {}", path.display(), e))?;

    let store: Store<T> = serde_json::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse store snapshot {}: {}", path.display(), e))?;

    tracing::debug!(
      path = %path.display(),
      models = store.models.len(),
      "loaded store snapshot"
    );

    Ok(store)
  }
}

//! Action status selector.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::Value;

use crate::store::{ActionStatusEntry, Id, Store};

/// Lifecycle of a dispatched write action
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ActionStatusView<'a> {
  /// Still waiting on the server
  Pending { id: Option<&'a Id> },
  /// Completed; `response` is whatever payload the write path recorded
  Succeeded {
    id: Option<&'a Id>,
    response: Option<&'a Value>,
  },
  /// Not successful. `error: None` means nothing has been recorded yet,
  /// which is the normal state before the action is ever dispatched.
  Failed {
    id: Option<&'a Id>,
    error: Option<&'a Value>,
  },
}

impl<'a> ActionStatusView<'a> {
  pub fn id(&self) -> Option<&'a Id> {
    match self {
      ActionStatusView::Pending { id }
      | ActionStatusView::Succeeded { id, .. }
      | ActionStatusView::Failed { id, .. } => *id,
    }
  }

  pub fn is_pending(&self) -> bool {
    matches!(self, ActionStatusView::Pending { .. })
  }

  pub fn is_success(&self) -> bool {
    matches!(self, ActionStatusView::Succeeded { .. })
  }

  /// Nothing recorded for this action yet.
  pub fn is_idle(&self) -> bool {
    matches!(self, ActionStatusView::Failed { error: None, .. })
  }
}

impl Serialize for ActionStatusView<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("id", &self.id())?;
    map.serialize_entry("pending", &self.is_pending())?;
    match self {
      ActionStatusView::Pending { .. } => {}
      ActionStatusView::Succeeded { response, .. } => map.serialize_entry("response", response)?,
      ActionStatusView::Failed { error, .. } => map.serialize_entry("error", error)?,
    }
    map.end()
  }
}

/// Report the lifecycle of the action stored under `action_key`.
///
/// A missing model or action key reads as an empty status: not pending,
/// no id, nothing recorded.
pub fn select_action_status<'a, T>(
  model: &str,
  store: &'a Store<T>,
  action_key: &str,
) -> ActionStatusView<'a> {
  let Some(entry) = store.model(model).and_then(|m| m.action_status(action_key)) else {
    return ActionStatusView::Failed {
      id: None,
      error: None,
    };
  };
  status_of(entry)
}

fn status_of(entry: &ActionStatusEntry) -> ActionStatusView<'_> {
  let id = entry.id.as_ref();
  if entry.pending {
    return ActionStatusView::Pending { id };
  }
  if entry.is_success == Some(true) {
    return ActionStatusView::Succeeded {
      id,
      response: entry.payload.as_ref(),
    };
  }
  ActionStatusView::Failed {
    id,
    error: entry.payload.as_ref(),
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn store() -> Store {
    serde_json::from_value(json!({
      "Book": {
        "actionStatus": {
          "create": { "pending": true, "id": null, "isSuccess": null, "payload": null },
          "update": { "pending": false, "id": 5, "isSuccess": true, "payload": { "title": "New" } },
          "delete": { "pending": false, "id": "9", "isSuccess": false, "payload": { "message": "denied" } },
          "pending-with-result": { "pending": true, "id": "1", "isSuccess": true, "payload": {} }
        }
      }
    }))
    .unwrap()
  }

  #[test]
  fn test_missing_status_is_idle() {
    let store = store();
    for (model, key) in [("Book", "nope"), ("Author", "create")] {
      let status = select_action_status(model, &store, key);
      assert!(status.is_idle());
      assert_eq!(
        serde_json::to_value(status).unwrap(),
        json!({ "id": null, "pending": false, "error": null })
      );
    }
  }

  #[test]
  fn test_pending_status() {
    let store = store();
    let status = select_action_status("Book", &store, "create");
    assert_eq!(status, ActionStatusView::Pending { id: None });
    assert_eq!(
      serde_json::to_value(status).unwrap(),
      json!({ "id": null, "pending": true })
    );
  }

  #[test]
  fn test_pending_wins_over_success() {
    let store = store();
    let status = select_action_status("Book", &store, "pending-with-result");
    assert!(status.is_pending());
    assert_eq!(status.id().map(Id::as_str), Some("1"));
  }

  #[test]
  fn test_success_carries_response() {
    let store = store();
    let status = select_action_status("Book", &store, "update");
    assert!(status.is_success());
    assert_eq!(
      serde_json::to_value(status).unwrap(),
      json!({ "id": "5", "pending": false, "response": { "title": "New" } })
    );
  }

  #[test]
  fn test_failure_carries_error_payload() {
    let store = store();
    let status = select_action_status("Book", &store, "delete");
    assert!(!status.is_idle());
    assert_eq!(
      serde_json::to_value(status).unwrap(),
      json!({ "id": "9", "pending": false, "error": { "message": "denied" } })
    );
  }
}

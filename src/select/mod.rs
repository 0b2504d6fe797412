//! Selectors over a store snapshot.
//!
//! Each selector takes a snapshot plus a `Freshness` (one sampled "now" and
//! a TTL) and returns a view borrowing from the snapshot. Selectors never
//! mutate the store and never fail on missing data: an unknown model, an
//! unmatched collection or an absent record all read as "loading, needs a
//! fetch". The only errors are usage errors from `select`.
//!
//! Most callers go through `cache::Selector`, which builds the `Freshness`.

mod collection;
mod dispatch;
mod record;
mod status;
mod view;

pub use collection::select_collection;
pub use dispatch::{
  select, Action, ActionMeta, ActionPayload, ActionType, SelectError, SelectedView, Selection,
};
pub use record::{get_record_selection, select_record, select_record_or_empty_object};
pub use status::{select_action_status, ActionStatusView};
pub use view::{CollectionView, RecordStatus, RecordView, ViewState, LOADING_MESSAGE};

//! Filtered, sorted, paginated multi-select VM inventory table for ratatui.
//!
//! The building blocks (filter, sort, pagination, selection, tree path
//! resolution, query aggregation) are independent and composable; `VmSelectState`
//! wires them into the scope-then-select flow of a migration plan wizard, and
//! `VmTable` renders the current page.
//!
//! Feature flags:
//! - `keymap`: crossterm-based key bindings and `VmSelectState::handle_key*` helpers.
//! - `serde`: serde support for `VmSelectSnapshot` and the inventory model types.

mod action;
mod filter;
mod glyphs;
#[cfg(feature = "keymap")]
mod keymap;
mod page;
pub mod prelude;
mod query;
mod select;
mod sort;
mod style;
mod tree;
mod view;
mod vm;
mod widget;

pub use action::{TableAction, TableEvent};
pub use filter::{FieldValue, FilterCategory, FilterKind, FilterState, FilterValues, ValueSource};
pub use glyphs::TableGlyphs;
#[cfg(feature = "keymap")]
pub use keymap::{KeymapProfile, TableKeyBindings};
pub use page::{PageInfo, PaginationState};
pub use query::{
    AggregateStatus, InventoryError, LoadPhase, QueryProbe, QueryState, SourceError,
    aggregate_status, first_error,
};
pub use select::{EqFn, LocalSelection, SelectionState, SelectionStore};
pub use sort::{SortBy, SortDirection, SortKeys, SortState, SortValue};
pub use style::VmTableStyle;
pub use tree::{
    FOLDER_PATH_SEPARATOR, NodeKind, TreeNode, TreePathInfo, resolve_paths, vms_in_scope,
};
pub use view::{
    COLUMN_TITLES, DEFAULT_PER_PAGE, DEFAULT_SORT_COLUMN, SORT_COLUMNS, VmRow, VmSelectSnapshot,
    VmSelectState, filter_key,
};
pub use vm::{
    ANALYSIS_LABELS, Concern, ConcernCategory, Vm, analysis_label, concern_summary,
    matches_concern_text, most_severe_concern, vm_identity,
};
pub use widget::VmTable;

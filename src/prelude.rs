pub use crate::{
    Concern, ConcernCategory, FieldValue, FilterCategory, FilterState, FilterValues, LoadPhase,
    LocalSelection, NodeKind, PageInfo, PaginationState, QueryState, SelectionState,
    SelectionStore, SortBy, SortDirection, SortState, TableAction, TableEvent, TableGlyphs,
    TreeNode, TreePathInfo, Vm, VmRow, VmSelectSnapshot, VmSelectState, VmTable, VmTableStyle,
    filter_key, resolve_paths, vm_identity, vms_in_scope,
};

#[cfg(feature = "keymap")]
pub use crate::{KeymapProfile, TableKeyBindings};

use rustc_hash::FxHashMap;
use smallvec::smallvec;
use tracing::{debug, trace};

use crate::action::{TableAction, TableEvent};
use crate::filter::{FilterCategory, FilterState, FilterValues};
use crate::page::{PageInfo, PaginationState};
use crate::select::{LocalSelection, SelectionState, SelectionStore};
use crate::sort::{SortBy, SortDirection, SortKeys, SortState, SortValue};
use crate::tree::{TreeNode, TreePathInfo, resolve_paths, vms_in_scope};
use crate::vm::{
    ANALYSIS_LABELS, Vm, analysis_label, concern_summary, matches_concern_text, vm_identity,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "keymap")]
use crate::keymap::TableKeyBindings;
#[cfg(feature = "keymap")]
use crossterm::event::KeyEvent;

/// Filter category keys used by the VM table.
pub mod filter_key {
    pub const NAME: &str = "name";
    pub const ANALYSIS: &str = "migrationAnalysis";
    pub const CONDITION: &str = "analysisCondition";
    pub const DATACENTER: &str = "datacenter";
    pub const CLUSTER: &str = "cluster";
    pub const HOST: &str = "host";
    pub const FOLDER: &str = "folderPath";
}

/// Column titles in sort-column order.
pub const COLUMN_TITLES: [&str; 6] = [
    "Migration analysis",
    "VM name",
    "Datacenter",
    "Cluster",
    "Host",
    "Folder path",
];

/// Number of sortable columns.
pub const SORT_COLUMNS: usize = COLUMN_TITLES.len();

/// Default sort column: VM name.
pub const DEFAULT_SORT_COLUMN: usize = 1;

/// Default page size.
pub const DEFAULT_PER_PAGE: usize = 10;

static EMPTY_PATH: TreePathInfo = TreePathInfo::EMPTY;

/// One renderable row of the current page.
pub struct VmRow<'a> {
    pub vm: &'a Vm,
    pub path: &'a TreePathInfo,
    pub selected: bool,
    pub expanded: bool,
}

/// Snapshot of view-local state (filters, sort, page, expansion, cursor).
///
/// Selection is not part of the snapshot: it lives in the external store.
/// With the `serde` feature enabled, this type derives `Serialize`/`Deserialize`.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Debug)]
pub struct VmSelectSnapshot {
    pub filter_values: FilterValues,
    pub sort: SortBy,
    pub page: usize,
    pub per_page: usize,
    /// Ids of VMs with their concern detail expanded.
    pub expanded: Vec<String>,
    pub cursor: Option<usize>,
}

/// State machine behind the VM selection table.
///
/// Owns the four list-state concerns and the derived inventory caches, and
/// wires them in a fixed order: candidates → filter → sort → paginate → rows.
/// Selection and expansion are side tables keyed by VM identity; they are
/// consulted at render time and never mutate the derivation itself.
pub struct VmSelectState {
    filter: FilterState,
    sort: SortState,
    pager: PaginationState,
    selection: SelectionState<Vm>,
    expansion_state: SelectionState<Vm>,
    expansion: LocalSelection<Vm>,
    // VMs already selected when this view was constructed. They stay in the
    // candidate set even when they no longer match the current scope.
    selected_on_mount: Vec<Vm>,
    candidates: Vec<Vm>,
    paths: FxHashMap<String, TreePathInfo>,
    // Marks whether candidates/paths must be rebuilt.
    dirty: bool,
    // Cursor index into the current page.
    cursor: Option<usize>,
    last_condition: Option<String>,
    pending_expanded: Vec<String>,
    #[cfg(feature = "keymap")]
    keymap: TableKeyBindings,
}

impl VmSelectState {
    /// Creates the view state, capturing the externally selected VMs that
    /// exist at this moment so they remain visible under any later scope.
    pub fn new(external_selected: &[Vm]) -> Self {
        Self {
            filter: FilterState::new(),
            sort: SortState::new(DEFAULT_SORT_COLUMN),
            pager: PaginationState::new(DEFAULT_PER_PAGE),
            selection: SelectionState::new(vm_identity),
            expansion_state: SelectionState::new(vm_identity),
            expansion: LocalSelection::new(),
            selected_on_mount: external_selected.to_vec(),
            candidates: Vec::new(),
            paths: FxHashMap::default(),
            dirty: true,
            cursor: None,
            last_condition: None,
            pending_expanded: Vec::new(),
            #[cfg(feature = "keymap")]
            keymap: TableKeyBindings::new(),
        }
    }

    #[cfg(feature = "keymap")]
    /// Returns a mutable reference to the key binding set.
    pub const fn keymap_mut(&mut self) -> &mut TableKeyBindings {
        &mut self.keymap
    }

    /// Marks the candidate cache as dirty. Call whenever the scope selection
    /// or any inventory query result changes.
    pub const fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Rebuilds the candidate set and path cache if marked dirty.
    ///
    /// The candidate set is the union of the mount-time selection and the VMs
    /// under the selected scope nodes, deduplicated by identity with the
    /// mount-time selection first. Trees still loading contribute blank paths.
    pub fn ensure_inventory(
        &mut self,
        scope: &[&TreeNode],
        host_tree: Option<&TreeNode>,
        vm_tree: Option<&TreeNode>,
        vms: &[Vm],
    ) {
        if !self.dirty {
            return;
        }
        let scoped = vms_in_scope(scope, vms);
        let scoped_len = scoped.len();

        let mut candidates = self.selected_on_mount.clone();
        for vm in scoped {
            if !candidates.iter().any(|existing| vm_identity(existing, vm)) {
                candidates.push(vm.clone());
            }
        }
        self.paths = resolve_paths(&candidates, host_tree, vm_tree);
        debug!(
            scoped = scoped_len,
            candidates = candidates.len(),
            "rebuilt candidate set"
        );
        self.candidates = candidates;

        // Expansion entries for VMs that left the candidate set are stale.
        let candidates = &self.candidates;
        let mut retained: Vec<Vm> = self.expansion.items().to_vec();
        retained.retain(|vm| candidates.iter().any(|existing| vm_identity(existing, vm)));
        self.expansion.replace(retained);

        for id in std::mem::take(&mut self.pending_expanded) {
            if let Some(vm) = self.candidates.iter().find(|vm| vm.id == id).cloned() {
                self.expansion_state
                    .set_selected(&mut self.expansion, &vm, true);
            }
        }

        self.dirty = false;
        self.clamp_cursor();
    }

    /// Returns the current candidate set (before filter/sort/pagination).
    pub fn candidates(&self) -> &[Vm] {
        &self.candidates
    }

    /// Returns the resolved path info for a VM, blank when unresolved.
    pub fn path_of(&self, vm: &Vm) -> &TreePathInfo {
        self.paths.get(&vm.id).unwrap_or(&EMPTY_PATH)
    }

    // -- filtering --------------------------------------------------------

    /// The declarative category set driving the filter toolbar, built over
    /// the current path cache.
    pub fn filter_categories(&self) -> Vec<FilterCategory<'_, Vm>> {
        let paths = &self.paths;
        let path_field = move |vm: &Vm, read: fn(&TreePathInfo) -> Option<&String>| {
            paths
                .get(&vm.id)
                .and_then(read)
                .cloned()
                .unwrap_or_default()
        };
        vec![
            FilterCategory::search(filter_key::NAME, "VM name"),
            FilterCategory::select(filter_key::ANALYSIS, "Migration analysis", &ANALYSIS_LABELS)
                .extract(|vm| analysis_label(vm).to_string()),
            FilterCategory::search(filter_key::CONDITION, "Analysis condition")
                .extract(concern_summary),
            FilterCategory::search(filter_key::DATACENTER, "Datacenter")
                .extract(move |vm| path_field(vm, |path| path.datacenter.as_ref())),
            FilterCategory::search(filter_key::CLUSTER, "Cluster")
                .extract(move |vm| path_field(vm, |path| path.cluster.as_ref())),
            FilterCategory::search(filter_key::HOST, "Host")
                .extract(move |vm| path_field(vm, |path| path.host.as_ref())),
            FilterCategory::search(filter_key::FOLDER, "Folder path")
                .extract(move |vm| path_field(vm, |path| path.folder_path.as_ref())),
        ]
    }

    /// Returns the active filter values.
    pub const fn filter_values(&self) -> &FilterValues {
        self.filter.values()
    }

    /// Replaces the filter values wholesale.
    ///
    /// When the analysis-condition term changes to a non-empty value, the
    /// first sorted candidate whose concern text matches is auto-expanded so
    /// its detail row surfaces. The expansion is additive and fires only on
    /// value change.
    pub fn set_filter_values(&mut self, values: FilterValues) {
        let condition = values
            .get(filter_key::CONDITION)
            .and_then(|terms| terms.first())
            .cloned();
        self.filter.set_values(values);

        let changed = condition != self.last_condition;
        self.last_condition.clone_from(&condition);
        if !changed {
            return;
        }
        let Some(text) = condition.filter(|text| !text.is_empty()) else {
            return;
        };
        let first_match = self
            .sorted_vms()
            .into_iter()
            .find(|vm| matches_concern_text(vm, &text))
            .cloned();
        if let Some(vm) = first_match
            && !self.expansion_state.is_selected(&self.expansion, &vm)
        {
            trace!(vm = %vm.id, "auto-expanded first VM matching condition filter");
            self.expansion_state
                .set_selected(&mut self.expansion, &vm, true);
        }
    }

    /// Drops every active filter term.
    pub fn clear_filters(&mut self) {
        self.filter.clear();
        self.last_condition = None;
    }

    // -- sorting ----------------------------------------------------------

    /// Returns the active sort selection.
    pub const fn sort_by(&self) -> SortBy {
        self.sort.sort_by()
    }

    /// Replaces the sort selection and resets pagination to page 1.
    ///
    /// The page reset is a contract, not a side effect: row positions are
    /// meaningless across a sort change.
    pub fn on_sort(&mut self, column: usize, direction: SortDirection) {
        self.sort
            .on_sort(column.min(SORT_COLUMNS - 1), direction);
        self.pager.reset();
        self.clamp_cursor();
    }

    fn sort_keys(&self) -> impl Fn(&Vm) -> SortKeys {
        let opt = |value: Option<&String>| SortValue::Text(value.cloned().unwrap_or_default());
        move |vm| {
            let path = self.path_of(vm);
            smallvec![
                SortValue::from(analysis_label(vm)),
                SortValue::Text(vm.name.clone()),
                opt(path.datacenter.as_ref()),
                opt(path.cluster.as_ref()),
                opt(path.host.as_ref()),
                opt(path.folder_path.as_ref()),
            ]
        }
    }

    // -- pagination -------------------------------------------------------

    /// Sets the page number (1-based, clamped when out of range).
    pub fn set_page(&mut self, page: usize) {
        self.pager.set_page(page);
        self.clamp_cursor();
    }

    /// Sets the page size and resets to page 1.
    pub fn set_per_page(&mut self, per_page: usize) {
        self.pager.set_per_page(per_page);
        self.clamp_cursor();
    }

    /// Derived pagination facts over the filtered set.
    pub fn page_info(&self) -> PageInfo {
        self.pager.page_info(self.filtered_len())
    }

    // -- derivation pipeline ----------------------------------------------

    fn filtered_vms(&self) -> Vec<&Vm> {
        let categories = self.filter_categories();
        self.filter.filtered(&self.candidates, &categories)
    }

    fn sorted_vms(&self) -> Vec<&Vm> {
        let filtered = self.filtered_vms();
        self.sort.sorted(&filtered, self.sort_keys())
    }

    /// Number of VMs surviving the active filters.
    pub fn filtered_len(&self) -> usize {
        self.filtered_vms().len()
    }

    /// The VMs on the current page, in display order.
    pub fn page_vms(&self) -> Vec<&Vm> {
        let sorted = self.sorted_vms();
        self.pager.current_page(&sorted).to_vec()
    }

    /// The renderable rows of the current page, with selection read from the
    /// caller's store and expansion from the local side table.
    pub fn page_rows<'a>(&'a self, store: &impl SelectionStore<Vm>) -> Vec<VmRow<'a>> {
        self.page_vms()
            .into_iter()
            .map(|vm| VmRow {
                vm,
                path: self.path_of(vm),
                selected: self.selection.is_selected(store, vm),
                expanded: self.expansion_state.is_selected(&self.expansion, vm),
            })
            .collect()
    }

    // -- selection and expansion ------------------------------------------

    /// Returns `true` if `vm` is selected in the store.
    pub fn is_selected(&self, store: &impl SelectionStore<Vm>, vm: &Vm) -> bool {
        self.selection.is_selected(store, vm)
    }

    /// Sets the selection flag for `vm` in the store. Idempotent.
    pub fn set_selected(&self, store: &mut impl SelectionStore<Vm>, vm: &Vm, selected: bool) {
        self.selection.set_selected(store, vm, selected);
    }

    /// Flips the selection flag for `vm` in the store.
    pub fn toggle_selected(&self, store: &mut impl SelectionStore<Vm>, vm: &Vm) {
        self.selection.toggle(store, vm);
    }

    /// Sets every currently filtered VM to `selected`, preserving selections
    /// outside the filtered set.
    pub fn select_all(&self, store: &mut impl SelectionStore<Vm>, selected: bool) {
        let window: Vec<Vm> = self.filtered_vms().into_iter().cloned().collect();
        self.selection.select_all(store, &window, selected);
    }

    /// Returns `true` if every filtered VM is selected (false when none match).
    pub fn all_filtered_selected(&self, store: &impl SelectionStore<Vm>) -> bool {
        let window: Vec<Vm> = self.filtered_vms().into_iter().cloned().collect();
        self.selection.all_selected(store, &window)
    }

    /// Returns `true` if the VM's concern detail row is expanded.
    pub fn is_expanded(&self, vm: &Vm) -> bool {
        self.expansion_state.is_selected(&self.expansion, vm)
    }

    /// Expands or collapses the VM's concern detail row.
    pub fn toggle_expanded(&mut self, vm: &Vm) {
        let vm = vm.clone();
        self.expansion_state.toggle(&mut self.expansion, &vm);
    }

    // -- cursor -----------------------------------------------------------

    /// Cursor index into the current page, if any row is under the cursor.
    pub const fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// Returns a clone of the VM under the cursor.
    pub fn cursor_vm(&self) -> Option<Vm> {
        let index = self.cursor?;
        self.page_vms().get(index).map(|vm| (*vm).clone())
    }

    fn page_len(&self) -> usize {
        self.page_vms().len()
    }

    fn clamp_cursor(&mut self) {
        let len = self.page_len();
        if len == 0 {
            self.cursor = None;
        } else if let Some(cursor) = self.cursor
            && cursor >= len
        {
            self.cursor = Some(len - 1);
        }
    }

    fn cursor_move(&mut self, target: impl FnOnce(Option<usize>, usize) -> usize) -> TableEvent<()> {
        let len = self.page_len();
        if len == 0 {
            self.cursor = None;
            return TableEvent::Unhandled;
        }
        self.cursor = Some(target(self.cursor, len).min(len - 1));
        TableEvent::Handled
    }

    // -- actions ----------------------------------------------------------

    /// Handles a table action and returns the resulting event.
    pub fn handle_action<S: SelectionStore<Vm>, C>(
        &mut self,
        store: &mut S,
        action: TableAction<C>,
    ) -> TableEvent<C> {
        if matches!(&action, TableAction::Custom(_)) {
            return TableEvent::Action(action);
        }

        let event = match action {
            TableAction::CursorPrev => {
                self.cursor_move(|current, _| current.map_or(0, |index| index.saturating_sub(1)))
            }
            TableAction::CursorNext => {
                self.cursor_move(|current, _| current.map_or(0, |index| index + 1))
            }
            TableAction::CursorFirst => self.cursor_move(|_, _| 0),
            TableAction::CursorLast => self.cursor_move(|_, len| len - 1),
            TableAction::ToggleSelect => self.cursor_vm().map_or(TableEvent::Unhandled, |vm| {
                self.selection.toggle(store, &vm);
                TableEvent::Handled
            }),
            TableAction::ToggleSelectAll => {
                if self.filtered_len() == 0 {
                    TableEvent::Unhandled
                } else {
                    let all = self.all_filtered_selected(store);
                    self.select_all(store, !all);
                    TableEvent::Handled
                }
            }
            TableAction::ToggleExpand => match self.cursor_vm() {
                Some(vm) if !vm.concerns.is_empty() => {
                    self.toggle_expanded(&vm);
                    TableEvent::Handled
                }
                _ => TableEvent::Unhandled,
            },
            TableAction::NextPage => self.page_move(1),
            TableAction::PrevPage => self.page_move(-1),
            TableAction::FirstPage => {
                self.set_page(1);
                TableEvent::Handled
            }
            TableAction::LastPage => {
                let last = self.pager.page_count(self.filtered_len());
                self.set_page(last);
                TableEvent::Handled
            }
            TableAction::NextSortColumn => {
                let column = (self.sort_by().column + 1) % SORT_COLUMNS;
                self.on_sort(column, SortDirection::Ascending);
                TableEvent::Handled
            }
            TableAction::ToggleSortDirection => {
                let by = self.sort_by();
                self.on_sort(by.column, by.direction.flipped());
                TableEvent::Handled
            }
            TableAction::ClearFilters => {
                self.clear_filters();
                self.clamp_cursor();
                TableEvent::Handled
            }
            TableAction::Custom(_) => unreachable!("custom actions are forwarded above"),
        };
        match event {
            TableEvent::Handled => TableEvent::Handled,
            _ => TableEvent::Unhandled,
        }
    }

    fn page_move(&mut self, delta: isize) -> TableEvent<()> {
        let len = self.filtered_len();
        let current = self.pager.effective_page(len);
        let count = self.pager.page_count(len);
        let target = current.saturating_add_signed(delta);
        if target < 1 || target > count || target == current {
            return TableEvent::Unhandled;
        }
        self.set_page(target);
        TableEvent::Handled
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event into an action and handles it.
    pub fn handle_key<S: SelectionStore<Vm>>(
        &mut self,
        store: &mut S,
        key: KeyEvent,
    ) -> TableEvent<()> {
        let Some(action) = self.keymap.resolve(key) else {
            return TableEvent::Unhandled;
        };
        self.handle_action(store, action)
    }

    #[cfg(feature = "keymap")]
    /// Resolves a key event with a custom mapping and handles it.
    pub fn handle_key_with<S, C, F>(&mut self, store: &mut S, key: KeyEvent, custom: F) -> TableEvent<C>
    where
        S: SelectionStore<Vm>,
        F: Fn(KeyEvent) -> Option<C>,
    {
        let Some(action) = self.keymap.resolve_with(key, custom) else {
            return TableEvent::Unhandled;
        };
        self.handle_action(store, action)
    }

    // -- snapshot ---------------------------------------------------------

    /// Captures the view-local state for persistence or restore.
    pub fn snapshot(&self) -> VmSelectSnapshot {
        VmSelectSnapshot {
            filter_values: self.filter.values().clone(),
            sort: self.sort.sort_by(),
            page: self.pager.page(),
            per_page: self.pager.per_page(),
            expanded: self
                .expansion
                .items()
                .iter()
                .map(|vm| vm.id.clone())
                .collect(),
            cursor: self.cursor,
        }
    }

    /// Restores view-local state from a previously captured snapshot.
    ///
    /// Expansion is re-applied against the candidate set on the next
    /// [`ensure_inventory`](Self::ensure_inventory) call.
    pub fn restore(&mut self, snapshot: VmSelectSnapshot) {
        self.last_condition = snapshot
            .filter_values
            .get(filter_key::CONDITION)
            .and_then(|terms| terms.first())
            .cloned();
        self.filter.set_values(snapshot.filter_values);
        self.sort.restore(snapshot.sort);
        self.pager.set_per_page(snapshot.per_page);
        self.pager.set_page(snapshot.page);
        self.pending_expanded = snapshot.expanded;
        self.cursor = snapshot.cursor;
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeKind;
    use crate::vm::{Concern, ConcernCategory};

    fn concern(category: ConcernCategory, label: &str) -> Concern {
        Concern {
            category,
            label: label.to_string(),
            assessment: format!("{label} detected"),
        }
    }

    fn inventory() -> (TreeNode, TreeNode, Vec<Vm>) {
        let host_tree = TreeNode::new(NodeKind::Datacenter, "dc-1", "east").with_children(vec![
            TreeNode::new(NodeKind::Cluster, "cl-1", "C1").with_children(vec![
                TreeNode::new(NodeKind::Host, "h-1", "esx-01")
                    .with_children(vec![TreeNode::new(NodeKind::Vm, "vm-1", "VM1")]),
            ]),
            TreeNode::new(NodeKind::Cluster, "cl-2", "C2").with_children(vec![
                TreeNode::new(NodeKind::Host, "h-2", "esx-02").with_children(vec![
                    TreeNode::new(NodeKind::Vm, "vm-2", "VM2"),
                    TreeNode::new(NodeKind::Vm, "vm-3", "VM3"),
                ]),
            ]),
        ]);
        let vm_tree = TreeNode::new(NodeKind::Datacenter, "dc-1", "east").with_children(vec![
            TreeNode::new(NodeKind::Folder, "f-1", "prod").with_children(vec![
                TreeNode::new(NodeKind::Vm, "vm-1", "VM1"),
                TreeNode::new(NodeKind::Vm, "vm-2", "VM2"),
                TreeNode::new(NodeKind::Vm, "vm-3", "VM3"),
            ]),
        ]);
        let vms = vec![
            Vm::new("vm-1", "VM1").with_concerns(vec![concern(
                ConcernCategory::Critical,
                "Shareable disk",
            )]),
            Vm::new("vm-2", "VM2"),
            Vm::new("vm-3", "VM3"),
        ];
        (host_tree, vm_tree, vms)
    }

    fn ready_state(external: &[Vm]) -> (VmSelectState, TreeNode, TreeNode, Vec<Vm>) {
        let (host_tree, vm_tree, vms) = inventory();
        let mut state = VmSelectState::new(external);
        let scope = [&host_tree];
        state.ensure_inventory(&scope, Some(&host_tree), Some(&vm_tree), &vms);
        (state, host_tree, vm_tree, vms)
    }

    fn values(pairs: &[(&str, &[&str])]) -> FilterValues {
        pairs
            .iter()
            .map(|(key, terms)| {
                (
                    (*key).to_string(),
                    terms.iter().map(ToString::to_string).collect(),
                )
            })
            .collect()
    }

    fn page_names(state: &VmSelectState) -> Vec<String> {
        state.page_vms().iter().map(|vm| vm.name.clone()).collect()
    }

    #[test]
    fn candidate_set_is_union_of_mount_selection_and_scope() {
        let (host_tree, vm_tree, vms) = inventory();
        let external = vec![Vm::new("vm-9", "Away"), Vm::new("vm-2", "VM2")];
        let mut state = VmSelectState::new(&external);

        // Scope down to cluster C2 only: contains vm-2 and vm-3.
        let scope = [&host_tree.children[1]];
        state.ensure_inventory(&scope, Some(&host_tree), Some(&vm_tree), &vms);

        let ids: Vec<&str> = state.candidates().iter().map(|vm| vm.id.as_str()).collect();
        assert_eq!(ids, vec!["vm-9", "vm-2", "vm-3"]);
    }

    #[test]
    fn example_scenario_filters_sorts_and_pages() {
        let (mut state, ..) = ready_state(&[]);
        state.set_filter_values(values(&[(filter_key::ANALYSIS, &["Critical"])]));

        assert_eq!(state.filtered_len(), 1);
        assert_eq!(page_names(&state), vec!["VM1"]);

        let info = state.page_info();
        assert_eq!(info.page, 1);
        assert_eq!(info.item_count, 1);
    }

    #[test]
    fn default_sort_is_name_ascending() {
        let (state, ..) = ready_state(&[]);
        assert_eq!(state.sort_by().column, DEFAULT_SORT_COLUMN);
        assert_eq!(page_names(&state), vec!["VM1", "VM2", "VM3"]);
    }

    #[test]
    fn filter_categories_read_resolved_paths() {
        let (mut state, ..) = ready_state(&[]);
        state.set_filter_values(values(&[(filter_key::CLUSTER, &["c2"])]));
        assert_eq!(page_names(&state), vec!["VM2", "VM3"]);

        state.set_filter_values(values(&[(filter_key::FOLDER, &["prod"])]));
        assert_eq!(state.filtered_len(), 3);
    }

    #[test]
    fn sort_change_resets_page_to_one() {
        let (mut state, ..) = ready_state(&[]);
        state.set_per_page(1);
        state.set_page(3);
        assert_eq!(state.page_info().page, 3);

        state.on_sort(0, SortDirection::Descending);
        assert_eq!(state.page_info().page, 1);
    }

    #[test]
    fn selection_survives_paging() {
        let (mut state, ..) = ready_state(&[]);
        state.set_per_page(1);
        let mut store = LocalSelection::new();

        let first = state.page_vms()[0].clone();
        state.set_selected(&mut store, &first, true);

        state.set_page(2);
        state.set_page(1);
        assert!(state.is_selected(&store, &first));
    }

    #[test]
    fn select_all_covers_filtered_set_and_preserves_outside_selection() {
        let (mut state, ..) = ready_state(&[]);
        let mut store = LocalSelection::new();
        let outside = Vm::new("vm-42", "elsewhere");
        state.set_selected(&mut store, &outside, true);

        state.set_filter_values(values(&[(filter_key::NAME, &["VM"])]));
        state.select_all(&mut store, true);
        assert_eq!(store.len(), 4);
        assert!(state.all_filtered_selected(&store));

        state.select_all(&mut store, false);
        assert_eq!(store.items().len(), 1);
        assert!(state.is_selected(&store, &outside));
    }

    #[test]
    fn toggle_selected_is_idempotent_in_the_external_store() {
        let (state, ..) = ready_state(&[]);
        let mut store = LocalSelection::new();
        let vm = state.candidates()[0].clone();

        state.set_selected(&mut store, &vm, true);
        state.set_selected(&mut store, &vm, true);

        assert!(state.is_selected(&store, &vm));
        let matching = store
            .items()
            .iter()
            .filter(|selected| vm_identity(selected, &vm))
            .count();
        assert_eq!(matching, 1);
    }

    #[test]
    fn condition_filter_auto_expands_first_match_once() {
        let (mut state, ..) = ready_state(&[]);
        let vm1 = state.candidates()[0].clone();
        assert!(!state.is_expanded(&vm1));

        state.set_filter_values(values(&[(filter_key::CONDITION, &["shareable"])]));
        assert!(state.is_expanded(&vm1));

        // Collapsing and re-setting the same value must not re-expand.
        state.toggle_expanded(&vm1);
        state.set_filter_values(values(&[(filter_key::CONDITION, &["shareable"])]));
        assert!(!state.is_expanded(&vm1));

        // A changed value fires again and never collapses other rows.
        let vm2 = state.candidates()[1].clone();
        state.toggle_expanded(&vm2);
        state.set_filter_values(values(&[(filter_key::CONDITION, &["Shareable disk"])]));
        assert!(state.is_expanded(&vm1));
        assert!(state.is_expanded(&vm2));
    }

    #[test]
    fn expansion_is_pruned_when_vm_leaves_candidates() {
        let (mut state, host_tree, vm_tree, vms) = ready_state(&[]);
        let vm3 = state.candidates()[2].clone();
        state.toggle_expanded(&vm3);
        assert!(state.is_expanded(&vm3));

        // Re-scope to cluster C1: vm-3 is no longer a candidate.
        state.invalidate();
        let scope = [&host_tree.children[0]];
        state.ensure_inventory(&scope, Some(&host_tree), Some(&vm_tree), &vms);
        assert!(!state.is_expanded(&vm3));
    }

    #[test]
    fn actions_drive_cursor_selection_and_pages() {
        let (mut state, ..) = ready_state(&[]);
        state.set_per_page(2);
        let mut store = LocalSelection::new();

        assert_eq!(
            state.handle_action(&mut store, TableAction::<()>::CursorNext),
            TableEvent::Handled
        );
        assert_eq!(state.cursor(), Some(0));

        state.handle_action(&mut store, TableAction::<()>::ToggleSelect);
        assert_eq!(store.len(), 1);
        state.handle_action(&mut store, TableAction::<()>::ToggleSelect);
        assert!(store.is_empty());

        assert_eq!(
            state.handle_action(&mut store, TableAction::<()>::NextPage),
            TableEvent::Handled
        );
        assert_eq!(state.page_info().page, 2);
        // Only one row on the last page; the cursor clamps onto it.
        assert_eq!(state.cursor(), Some(0));
        assert_eq!(
            state.handle_action(&mut store, TableAction::<()>::NextPage),
            TableEvent::Unhandled
        );
    }

    #[test]
    fn expand_action_requires_concerns_under_cursor() {
        let (mut state, ..) = ready_state(&[]);
        let mut store = LocalSelection::new();
        state.handle_action(&mut store, TableAction::<()>::CursorFirst);

        // Cursor on VM1, which has a concern.
        assert_eq!(
            state.handle_action(&mut store, TableAction::<()>::ToggleExpand),
            TableEvent::Handled
        );

        state.handle_action(&mut store, TableAction::<()>::CursorNext);
        assert_eq!(
            state.handle_action(&mut store, TableAction::<()>::ToggleExpand),
            TableEvent::Unhandled
        );
    }

    #[test]
    fn snapshot_roundtrip_restores_view_local_state() {
        let (mut state, host_tree, vm_tree, vms) = ready_state(&[]);
        let vm1 = state.candidates()[0].clone();
        state.toggle_expanded(&vm1);
        state.set_filter_values(values(&[(filter_key::NAME, &["VM"])]));
        state.on_sort(0, SortDirection::Descending);
        state.set_page(1);

        let snapshot = state.snapshot();

        let mut restored = VmSelectState::new(&[]);
        restored.restore(snapshot);
        let scope = [&host_tree];
        restored.ensure_inventory(&scope, Some(&host_tree), Some(&vm_tree), &vms);

        assert_eq!(restored.sort_by().column, 0);
        assert_eq!(restored.filter_values().get(filter_key::NAME).unwrap(), &["VM"]);
        assert!(restored.is_expanded(&vm1));
    }

    #[test]
    fn rows_combine_paths_selection_and_expansion() {
        let (mut state, ..) = ready_state(&[]);
        let mut store = LocalSelection::new();
        let vm1 = state.candidates()[0].clone();
        state.set_selected(&mut store, &vm1, true);
        state.toggle_expanded(&vm1);

        let rows = state.page_rows(&store);
        assert_eq!(rows.len(), 3);
        let row = &rows[0];
        assert_eq!(row.vm.name, "VM1");
        assert_eq!(row.path.cluster.as_deref(), Some("C1"));
        assert!(row.selected);
        assert!(row.expanded);
        assert!(!rows[1].selected);
    }
}

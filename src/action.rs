/// Actions that a user or application can initiate on the table view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableAction<Custom = ()> {
    /// Move the cursor to the previous row on the page.
    CursorPrev,
    /// Move the cursor to the next row on the page.
    CursorNext,
    /// Move the cursor to the first row on the page.
    CursorFirst,
    /// Move the cursor to the last row on the page.
    CursorLast,
    /// Flip the selection flag of the VM under the cursor.
    ToggleSelect,
    /// Select every filtered VM, or clear them all when already selected.
    ToggleSelectAll,
    /// Expand or collapse the concern detail row under the cursor.
    ToggleExpand,
    /// Go to the next page.
    NextPage,
    /// Go to the previous page.
    PrevPage,
    /// Go to the first page.
    FirstPage,
    /// Go to the last page.
    LastPage,
    /// Sort by the next column, ascending.
    NextSortColumn,
    /// Flip the sort direction of the active column.
    ToggleSortDirection,
    /// Drop every active filter term.
    ClearFilters,
    /// Custom action forwarded to the caller without internal handling.
    Custom(Custom),
}

/// Result of handling an action or key event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TableEvent<Custom = ()> {
    /// The action was handled internally and state was updated.
    Handled,
    /// The action was ignored (e.g., empty page, nothing under the cursor).
    Unhandled,
    /// The action is forwarded to the caller for handling.
    Action(TableAction<Custom>),
}

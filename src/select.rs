/// Identity predicate used by selection state.
///
/// Items may be recreated across query refreshes, so identity is a caller
/// decision, never a reference comparison.
pub type EqFn<T> = fn(&T, &T) -> bool;

/// Backing storage for a selection.
///
/// Implement this on externally owned state (e.g. a wizard form field) to make
/// selection a projection of that state; use [`LocalSelection`] when the
/// selection should live and die with the view. The strategy is picked at
/// construction time by choosing the store type.
pub trait SelectionStore<T> {
    /// Current snapshot of the selected items.
    fn items(&self) -> &[T];
    /// Replaces the selection wholesale.
    fn replace(&mut self, items: Vec<T>);
}

/// Self-contained selection storage.
#[derive(Clone, Debug, Default)]
pub struct LocalSelection<T> {
    items: Vec<T>,
}

impl<T> LocalSelection<T> {
    /// Creates an empty selection.
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Number of selected items.
    pub const fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when nothing is selected.
    pub const fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> SelectionStore<T> for LocalSelection<T> {
    fn items(&self) -> &[T] {
        &self.items
    }

    fn replace(&mut self, items: Vec<T>) {
        self.items = items;
    }
}

/// Tracks which items are selected, delegating storage to a [`SelectionStore`].
///
/// The state itself holds only the identity predicate; every read and write
/// goes through the store, so an externally mirrored selection survives the
/// view that manipulates it.
#[derive(Clone, Copy, Debug)]
pub struct SelectionState<T> {
    is_equal: EqFn<T>,
}

impl<T: Clone> SelectionState<T> {
    /// Creates a selection state with the given identity predicate.
    pub const fn new(is_equal: EqFn<T>) -> Self {
        Self { is_equal }
    }

    /// Returns `true` if `item` is in the store.
    pub fn is_selected(&self, store: &impl SelectionStore<T>, item: &T) -> bool {
        store
            .items()
            .iter()
            .any(|selected| (self.is_equal)(selected, item))
    }

    /// Sets the selected flag for `item`. Idempotent: setting an already
    /// matching flag leaves the store untouched, and an item never appears
    /// twice.
    pub fn set_selected(&self, store: &mut impl SelectionStore<T>, item: &T, selected: bool) {
        let currently = self.is_selected(store, item);
        if selected == currently {
            return;
        }
        let mut items: Vec<T> = store.items().to_vec();
        if selected {
            items.push(item.clone());
        } else {
            items.retain(|existing| !(self.is_equal)(existing, item));
        }
        store.replace(items);
    }

    /// Flips the selected flag for `item`.
    pub fn toggle(&self, store: &mut impl SelectionStore<T>, item: &T) {
        let selected = self.is_selected(store, item);
        self.set_selected(store, item, !selected);
    }

    /// Sets every item in `window` to `selected`, leaving selections outside
    /// the window untouched (selection survives filtering and paging).
    pub fn select_all(&self, store: &mut impl SelectionStore<T>, window: &[T], selected: bool) {
        let mut items: Vec<T> = store.items().to_vec();
        if selected {
            for item in window {
                if !items.iter().any(|existing| (self.is_equal)(existing, item)) {
                    items.push(item.clone());
                }
            }
        } else {
            items.retain(|existing| !window.iter().any(|item| (self.is_equal)(existing, item)));
        }
        store.replace(items);
    }

    /// Returns `true` if every item in `window` is selected (false when empty).
    pub fn all_selected(&self, store: &impl SelectionStore<T>, window: &[T]) -> bool {
        !window.is_empty() && window.iter().all(|item| self.is_selected(store, item))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Debug, PartialEq)]
    struct Item {
        id: u32,
        revision: u32,
    }

    const fn item(id: u32) -> Item {
        Item { id, revision: 0 }
    }

    fn by_id(a: &Item, b: &Item) -> bool {
        a.id == b.id
    }

    #[test]
    fn toggle_is_idempotent_per_flag() {
        let state = SelectionState::new(by_id);
        let mut store = LocalSelection::new();

        state.set_selected(&mut store, &item(1), true);
        state.set_selected(&mut store, &item(1), true);

        assert!(state.is_selected(&store, &item(1)));
        assert_eq!(store.len(), 1);

        state.set_selected(&mut store, &item(1), false);
        state.set_selected(&mut store, &item(1), false);
        assert!(store.is_empty());
    }

    #[test]
    fn identity_ignores_object_instance() {
        let state = SelectionState::new(by_id);
        let mut store = LocalSelection::new();

        state.set_selected(&mut store, &item(7), true);
        // Same logical item, refetched with a new revision.
        let refetched = Item { id: 7, revision: 3 };
        assert!(state.is_selected(&store, &refetched));

        state.set_selected(&mut store, &refetched, true);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn select_all_preserves_items_outside_the_window() {
        let state = SelectionState::new(by_id);
        let mut store = LocalSelection::new();
        state.set_selected(&mut store, &item(99), true);

        let window = [item(1), item(2)];
        state.select_all(&mut store, &window, true);
        assert_eq!(store.len(), 3);
        assert!(state.all_selected(&store, &window));

        state.select_all(&mut store, &window, false);
        assert_eq!(store.items(), &[item(99)]);
    }

    #[test]
    fn external_store_is_the_single_owner() {
        struct Form {
            selected: Vec<Item>,
        }

        impl SelectionStore<Item> for Form {
            fn items(&self) -> &[Item] {
                &self.selected
            }

            fn replace(&mut self, items: Vec<Item>) {
                self.selected = items;
            }
        }

        let state = SelectionState::new(by_id);
        let mut form = Form {
            selected: vec![item(4)],
        };

        assert!(state.is_selected(&form, &item(4)));
        state.toggle(&mut form, &item(5));
        assert_eq!(form.selected.len(), 2);

        // A fresh state over the same store sees the same selection.
        let other = SelectionState::new(by_id);
        assert!(other.is_selected(&form, &item(5)));
    }

    #[test]
    fn all_selected_is_false_for_empty_window() {
        let state = SelectionState::new(by_id);
        let store = LocalSelection::<Item>::new();
        assert!(!state.all_selected(&store, &[]));
    }
}

use std::cmp::Ordering;

use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One sortable value for one column.
///
/// Columns that are never sorted contribute an empty `Text` placeholder.
#[derive(Clone, Debug, PartialEq)]
pub enum SortValue {
    Text(String),
    Number(f64),
}

impl SortValue {
    /// The placeholder for non-sortable columns.
    pub const fn empty() -> Self {
        Self::Text(String::new())
    }

    fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.cmp(b),
            // NaN compares as equal so stability decides.
            (Self::Number(a), Self::Number(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (Self::Number(_), Self::Text(_)) => Ordering::Less,
            (Self::Text(_), Self::Number(_)) => Ordering::Greater,
        }
    }
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for SortValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for SortValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Sort-key vector for one item, one value per column in column order.
pub type SortKeys = SmallVec<[SortValue; 8]>;

/// Sort direction for the active column.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Returns the opposite direction.
    #[must_use]
    pub const fn flipped(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }
}

/// The active sort column and direction.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortBy {
    pub column: usize,
    pub direction: SortDirection,
}

/// Holds the current sort selection and derives sorted views.
#[derive(Clone, Copy, Debug)]
pub struct SortState {
    by: SortBy,
}

impl SortState {
    /// Creates a state sorting the given column ascending.
    pub const fn new(default_column: usize) -> Self {
        Self {
            by: SortBy {
                column: default_column,
                direction: SortDirection::Ascending,
            },
        }
    }

    /// Returns the active sort selection.
    pub const fn sort_by(&self) -> SortBy {
        self.by
    }

    /// Replaces the sort selection entirely. There is no multi-column sort.
    pub const fn on_sort(&mut self, column: usize, direction: SortDirection) {
        self.by = SortBy { column, direction };
    }

    /// Restores a previously captured sort selection.
    pub const fn restore(&mut self, by: SortBy) {
        self.by = by;
    }

    /// Returns `items` ordered by the active column's sort value.
    ///
    /// The sort is stable: ties keep their relative input order under both
    /// directions, because descending negates the comparison instead of
    /// reversing the output.
    pub fn sorted<'a, T, K>(&self, items: &[&'a T], keys: K) -> Vec<&'a T>
    where
        K: Fn(&T) -> SortKeys,
    {
        let column = self.by.column;
        let mut decorated: Vec<(SortValue, &'a T)> = items
            .iter()
            .map(|item| {
                let mut item_keys = keys(item);
                let value = if column < item_keys.len() {
                    item_keys.swap_remove(column)
                } else {
                    SortValue::empty()
                };
                (value, *item)
            })
            .collect();

        decorated.sort_by(|(a, _), (b, _)| {
            let ordering = a.compare(b);
            match self.by.direction {
                SortDirection::Ascending => ordering,
                SortDirection::Descending => ordering.reverse(),
            }
        });

        decorated.into_iter().map(|(_, item)| item).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smallvec::smallvec;

    struct Row {
        name: &'static str,
        size: f64,
    }

    const fn row(name: &'static str, size: f64) -> Row {
        Row { name, size }
    }

    fn keys(row: &Row) -> SortKeys {
        smallvec![
            SortValue::empty(),
            SortValue::from(row.name),
            SortValue::from(row.size),
        ]
    }

    fn names(rows: &[&Row]) -> Vec<&'static str> {
        rows.iter().map(|row| row.name).collect()
    }

    #[test]
    fn sorts_text_column_ascending() {
        let rows = [row("beta", 1.0), row("alpha", 2.0), row("gamma", 0.5)];
        let refs: Vec<&Row> = rows.iter().collect();
        let state = SortState::new(1);

        let sorted = state.sorted(&refs, keys);
        assert_eq!(names(&sorted), vec!["alpha", "beta", "gamma"]);
    }

    #[test]
    fn sorts_numeric_column_numerically() {
        let rows = [row("a", 10.0), row("b", 2.0), row("c", 33.0)];
        let refs: Vec<&Row> = rows.iter().collect();
        let mut state = SortState::new(1);
        state.on_sort(2, SortDirection::Ascending);

        let sorted = state.sorted(&refs, keys);
        assert_eq!(names(&sorted), vec!["b", "a", "c"]);
    }

    #[test]
    fn ties_keep_input_order_in_both_directions() {
        let rows = [
            row("first", 1.0),
            row("second", 1.0),
            row("third", 0.0),
            row("fourth", 1.0),
        ];
        let refs: Vec<&Row> = rows.iter().collect();
        let mut state = SortState::new(2);

        let ascending = state.sorted(&refs, keys);
        assert_eq!(names(&ascending), vec!["third", "first", "second", "fourth"]);

        state.on_sort(2, SortDirection::Descending);
        let descending = state.sorted(&refs, keys);
        // The tie group stays in input order; only cross-tie ordering flips.
        assert_eq!(names(&descending), vec!["first", "second", "fourth", "third"]);
    }

    #[test]
    fn out_of_range_column_falls_back_to_placeholder() {
        let rows = [row("b", 1.0), row("a", 2.0)];
        let refs: Vec<&Row> = rows.iter().collect();
        let mut state = SortState::new(1);
        state.on_sort(9, SortDirection::Ascending);

        let sorted = state.sorted(&refs, keys);
        assert_eq!(names(&sorted), vec!["b", "a"]);
    }

    #[test]
    fn on_sort_replaces_selection_entirely() {
        let mut state = SortState::new(1);
        state.on_sort(3, SortDirection::Descending);

        assert_eq!(
            state.sort_by(),
            SortBy {
                column: 3,
                direction: SortDirection::Descending
            }
        );
    }
}

use std::borrow::Cow;

use rustc_hash::FxHashMap;

/// Items that expose named fields to filter categories without an explicit
/// extractor.
pub trait FieldValue {
    /// Returns the value of the field named `key`, if the item has one.
    fn field(&self, key: &str) -> Option<Cow<'_, str>>;
}

/// How a category matches its terms against an item value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterKind {
    /// Case-insensitive substring match.
    Search,
    /// Exact match against one of the declared option values.
    Select(Vec<String>),
}

/// Where a category reads its per-item value from.
///
/// Resolved once when the category list is built, not re-dispatched per item
/// per filter pass.
pub enum ValueSource<'a, T> {
    /// Read the item field named after the category key.
    Field,
    /// Apply an explicit extractor.
    Extract(Box<dyn Fn(&T) -> String + 'a>),
}

/// Declarative description of one filter category.
pub struct FilterCategory<'a, T> {
    pub key: &'static str,
    pub title: &'static str,
    pub kind: FilterKind,
    source: ValueSource<'a, T>,
}

impl<'a, T> FilterCategory<'a, T> {
    /// Creates a free-text search category reading the field named `key`.
    pub const fn search(key: &'static str, title: &'static str) -> Self {
        Self {
            key,
            title,
            kind: FilterKind::Search,
            source: ValueSource::Field,
        }
    }

    /// Creates an exact-match category with a fixed option list.
    pub fn select(key: &'static str, title: &'static str, options: &[&str]) -> Self {
        Self {
            key,
            title,
            kind: FilterKind::Select(options.iter().map(ToString::to_string).collect()),
            source: ValueSource::Field,
        }
    }

    /// Replaces the default field lookup with an explicit extractor.
    #[must_use]
    pub fn extract(mut self, extractor: impl Fn(&T) -> String + 'a) -> Self {
        self.source = ValueSource::Extract(Box::new(extractor));
        self
    }

    fn value_of(&self, item: &T) -> Cow<'_, str>
    where
        T: FieldValue,
    {
        match &self.source {
            ValueSource::Extract(extractor) => Cow::Owned(extractor(item)),
            ValueSource::Field => item
                .field(self.key)
                .map_or(Cow::Borrowed(""), |value| Cow::Owned(value.into_owned())),
        }
    }
}

/// Active filter terms keyed by category key.
pub type FilterValues = FxHashMap<String, Vec<String>>;

/// Holds the active filter criteria and derives filtered views.
///
/// Values are replaced wholesale on every edit; there is no incremental patch
/// path, so a changed category set can never leave stale terms behind.
#[derive(Clone, Debug, Default)]
pub struct FilterState {
    values: FilterValues,
}

impl FilterState {
    /// Creates an empty filter state (no constraints).
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the active filter values.
    pub const fn values(&self) -> &FilterValues {
        &self.values
    }

    /// Replaces all filter values.
    pub fn set_values(&mut self, values: FilterValues) {
        self.values = values;
    }

    /// Drops every active term.
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Returns the active terms for one category.
    pub fn terms(&self, key: &str) -> &[String] {
        self.values.get(key).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if any category has at least one active term.
    pub fn has_active(&self) -> bool {
        self.values.values().any(|terms| !terms.is_empty())
    }

    /// Returns the items matching every active category, in input order.
    ///
    /// Categories with no active terms impose no constraint. Active categories
    /// are ANDed together; terms within one category are ORed. The result is
    /// always a subsequence of `items`.
    pub fn filtered<'a, T: FieldValue>(
        &self,
        items: &'a [T],
        categories: &[FilterCategory<'_, T>],
    ) -> Vec<&'a T> {
        items
            .iter()
            .filter(|item| self.matches(*item, categories))
            .collect()
    }

    fn matches<T: FieldValue>(&self, item: &T, categories: &[FilterCategory<'_, T>]) -> bool {
        categories.iter().all(|category| {
            let terms = self.terms(category.key);
            if terms.is_empty() {
                return true;
            }
            let value = category.value_of(item);
            match &category.kind {
                FilterKind::Search => {
                    let haystack = value.to_lowercase();
                    terms
                        .iter()
                        .any(|term| haystack.contains(&term.to_lowercase()))
                }
                FilterKind::Select(_) => terms.iter().any(|term| term == value.as_ref()),
            }
        })
    }
}

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Pagination window over an already filtered and sorted sequence.
///
/// The page number is 1-based. Out-of-range pages are clamped, never
/// rejected: when filtering shrinks the set below the current page, the last
/// valid page is shown. Callers reset to page 1 themselves on changes that
/// invalidate position (notably every sort change).
#[derive(Clone, Copy, Debug)]
pub struct PaginationState {
    page: usize,
    per_page: usize,
}

/// Derived pagination facts for footer rendering.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageInfo {
    /// Effective (clamped) page number, 1-based.
    pub page: usize,
    pub per_page: usize,
    pub page_count: usize,
    pub item_count: usize,
    /// 1-based index of the first item on the page, 0 when empty.
    pub start: usize,
    /// 1-based index of the last item on the page, 0 when empty.
    pub end: usize,
}

impl PaginationState {
    /// Creates a state on page 1 with the given page size (minimum 1).
    pub const fn new(per_page: usize) -> Self {
        Self {
            page: 1,
            per_page: if per_page == 0 { 1 } else { per_page },
        }
    }

    /// Returns the requested (unclamped) page number.
    pub const fn page(&self) -> usize {
        self.page
    }

    /// Returns the page size.
    pub const fn per_page(&self) -> usize {
        self.per_page
    }

    /// Sets the page number, clamping below at 1.
    pub const fn set_page(&mut self, page: usize) {
        self.page = if page == 0 { 1 } else { page };
    }

    /// Sets the page size (minimum 1) and resets to page 1.
    pub const fn set_per_page(&mut self, per_page: usize) {
        self.per_page = if per_page == 0 { 1 } else { per_page };
        self.page = 1;
    }

    /// Resets to page 1.
    pub const fn reset(&mut self) {
        self.page = 1;
    }

    /// Number of pages implied by `item_count` (at least 1).
    pub const fn page_count(&self, item_count: usize) -> usize {
        let pages = item_count.div_ceil(self.per_page);
        if pages == 0 { 1 } else { pages }
    }

    /// The page actually shown for `item_count` items, after clamping.
    pub const fn effective_page(&self, item_count: usize) -> usize {
        let count = self.page_count(item_count);
        if self.page > count { count } else { self.page }
    }

    /// Returns the slice of `items` on the current (clamped) page.
    pub fn current_page<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let page = self.effective_page(items.len());
        let start = (page - 1) * self.per_page;
        let end = (start + self.per_page).min(items.len());
        &items[start.min(items.len())..end]
    }

    /// Derives the pagination facts for `item_count` items.
    pub const fn page_info(&self, item_count: usize) -> PageInfo {
        let page = self.effective_page(item_count);
        let start_index = (page - 1) * self.per_page;
        let (start, end) = if item_count == 0 {
            (0, 0)
        } else {
            let last = start_index + self.per_page;
            (
                start_index + 1,
                if last > item_count { item_count } else { last },
            )
        };
        PageInfo {
            page,
            per_page: self.per_page,
            page_count: self.page_count(item_count),
            item_count,
            start,
            end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn concatenated_pages_cover_the_sequence_exactly_once() {
        let items: Vec<usize> = (0..23).collect();
        let mut pager = PaginationState::new(10);

        let mut seen = Vec::new();
        for page in 1..=pager.page_count(items.len()) {
            pager.set_page(page);
            seen.extend_from_slice(pager.current_page(&items));
        }
        assert_eq!(seen, items);
    }

    #[test]
    fn out_of_range_page_clamps_to_last_valid_page() {
        let items: Vec<usize> = (0..25).collect();
        let mut pager = PaginationState::new(10);
        pager.set_page(9);

        assert_eq!(pager.effective_page(items.len()), 3);
        assert_eq!(pager.current_page(&items), &[20, 21, 22, 23, 24]);
    }

    #[test]
    fn shrinking_set_keeps_showing_the_last_page() {
        let mut pager = PaginationState::new(10);
        pager.set_page(3);

        // After a filter change only 12 items remain.
        let items: Vec<usize> = (0..12).collect();
        assert_eq!(pager.current_page(&items), &[10, 11]);
    }

    #[test]
    fn per_page_change_resets_to_page_one() {
        let mut pager = PaginationState::new(10);
        pager.set_page(2);
        pager.set_per_page(5);

        assert_eq!(pager.page(), 1);
        assert_eq!(pager.per_page(), 5);
    }

    #[test]
    fn zero_inputs_are_clamped() {
        let mut pager = PaginationState::new(0);
        assert_eq!(pager.per_page(), 1);

        pager.set_page(0);
        assert_eq!(pager.page(), 1);

        let empty: [usize; 0] = [];
        assert!(pager.current_page(&empty).is_empty());
        assert_eq!(pager.page_count(0), 1);
    }

    #[test]
    fn page_info_reports_item_range() {
        let mut pager = PaginationState::new(10);
        pager.set_page(2);

        let info = pager.page_info(15);
        assert_eq!(
            info,
            PageInfo {
                page: 2,
                per_page: 10,
                page_count: 2,
                item_count: 15,
                start: 11,
                end: 15,
            }
        );

        let empty = pager.page_info(0);
        assert_eq!(empty.start, 0);
        assert_eq!(empty.end, 0);
        assert_eq!(empty.page, 1);
    }
}

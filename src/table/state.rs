//! Search, sort and pagination state owned by a table.

/// Page sizes a table may be switched between.
pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];

/// Page size used when a table is mounted.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Direction of a column sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Arrow drawn next to the sorted header.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Ascending => "▲",
            SortDirection::Descending => "▼",
        }
    }
}

/// Single-column sort state. `None` means unsorted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState(Option<(&'static str, SortDirection)>);

impl SortState {
    /// Unsorted.
    pub fn unsorted() -> Self {
        Self(None)
    }

    /// Sorted by `column` in `direction`.
    pub fn by(column: &'static str, direction: SortDirection) -> Self {
        Self(Some((column, direction)))
    }

    /// The sorted column and direction, if any.
    pub fn current(&self) -> Option<(&'static str, SortDirection)> {
        self.0
    }

    /// Direction of `column` if it is the sorted one.
    pub fn direction_of(&self, column: &str) -> Option<SortDirection> {
        match self.0 {
            Some((id, dir)) if id == column => Some(dir),
            _ => None,
        }
    }

    /// Advance the sort cycle for a header click on `column`.
    ///
    /// The same column cycles ascending, descending, unsorted. A different
    /// column starts over at ascending.
    pub fn toggle(&mut self, column: &'static str) {
        self.0 = match self.0 {
            Some((id, SortDirection::Ascending)) if id == column => {
                Some((column, SortDirection::Descending))
            }
            Some((id, SortDirection::Descending)) if id == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }
}

/// Zero-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Number of pages needed for `total` rows. Zero rows means zero pages.
pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 0;
    }
    total.div_ceil(page_size)
}

/// Everything a table remembers between renders.
///
/// Rows and columns belong to the caller and are passed in on every render.
/// The table only keeps the search query, the sort and the page window,
/// together with the key of the data set it is currently showing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TableState {
    search: String,
    sort: SortState,
    pagination: Pagination,
    data_key: Option<String>,
}

impl TableState {
    /// Fresh state: no search, unsorted, first page of 10.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh state with a different initial page size.
    ///
    /// Sizes outside [`PAGE_SIZES`] fall back to [`DEFAULT_PAGE_SIZE`].
    pub fn with_page_size(page_size: usize) -> Self {
        let mut state = Self::new();
        if PAGE_SIZES.contains(&page_size) {
            state.pagination.page_size = page_size;
        }
        state
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn sort(&self) -> SortState {
        self.sort
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn page_index(&self) -> usize {
        self.pagination.page_index
    }

    pub fn page_size(&self) -> usize {
        self.pagination.page_size
    }

    /// Replace the search query. A different query resets to the first page.
    pub fn set_search(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.search {
            self.search = query;
            self.pagination.page_index = 0;
        }
    }

    /// Clear the search query.
    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    /// Header click on `column`. The page index is kept.
    pub fn toggle_sort(&mut self, column: &'static str) {
        self.sort.toggle(column);
    }

    /// Change the page size. Returns false for sizes not in [`PAGE_SIZES`].
    pub fn set_page_size(&mut self, page_size: usize) -> bool {
        if !PAGE_SIZES.contains(&page_size) {
            return false;
        }
        if page_size != self.pagination.page_size {
            self.pagination.page_size = page_size;
            self.pagination.page_index = 0;
        }
        true
    }

    /// Step to the next allowed page size, wrapping around.
    pub fn cycle_page_size(&mut self) {
        let pos = PAGE_SIZES
            .iter()
            .position(|&s| s == self.pagination.page_size)
            .unwrap_or(0);
        self.set_page_size(PAGE_SIZES[(pos + 1) % PAGE_SIZES.len()]);
    }

    /// Jump to a page, clamped to the last page of `total_pages`.
    pub fn set_page(&mut self, page_index: usize, total_pages: usize) {
        self.pagination.page_index = page_index.min(total_pages.saturating_sub(1));
    }

    pub fn next_page(&mut self, total_pages: usize) {
        if self.pagination.page_index + 1 < total_pages {
            self.pagination.page_index += 1;
        }
    }

    pub fn prev_page(&mut self) {
        self.pagination.page_index = self.pagination.page_index.saturating_sub(1);
    }

    /// Tell the table which data set it is showing.
    ///
    /// When the key differs from the previous one (a new filter, a new
    /// server page, another resource) the page index goes back to 0 so the
    /// table never lands on a page past the end of the new data.
    pub fn sync_data_key(&mut self, key: &str) -> bool {
        if self.data_key.as_deref() == Some(key) {
            return false;
        }
        self.data_key = Some(key.to_string());
        self.pagination.page_index = 0;
        true
    }

    /// Back to the mount state, keeping the page size.
    pub fn reset(&mut self) {
        *self = Self::with_page_size(self.pagination.page_size);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_defaults() {
        let state = TableState::new();
        assert_eq!(state.search(), "");
        assert_eq!(state.sort(), SortState::unsorted());
        assert_eq!(state.pagination(), Pagination { page_index: 0, page_size: 10 });
    }

    #[test]
    fn test_sort_cycle_same_column() {
        let mut sort = SortState::unsorted();
        sort.toggle("v");
        assert_eq!(sort.current(), Some(("v", SortDirection::Ascending)));
        sort.toggle("v");
        assert_eq!(sort.current(), Some(("v", SortDirection::Descending)));
        sort.toggle("v");
        assert_eq!(sort.current(), None);
    }

    #[test]
    fn test_sort_other_column_restarts_ascending() {
        let mut sort = SortState::by("a", SortDirection::Descending);
        sort.toggle("b");
        assert_eq!(sort.current(), Some(("b", SortDirection::Ascending)));
        assert_eq!(sort.direction_of("a"), None);
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut state = TableState::new();
        state.set_page(2, 3);
        state.set_search("pizza");
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_same_search_keeps_page() {
        let mut state = TableState::new();
        state.set_search("pizza");
        state.set_page(1, 3);
        state.set_search("pizza");
        assert_eq!(state.page_index(), 1);
    }

    #[test]
    fn test_sort_keeps_page() {
        let mut state = TableState::new();
        state.set_page(2, 3);
        state.toggle_sort("name");
        assert_eq!(state.page_index(), 2);
    }

    #[test]
    fn test_page_size_change_resets_page() {
        let mut state = TableState::new();
        state.set_page(2, 3);
        assert!(state.set_page_size(25));
        assert_eq!(state.page_index(), 0);
        assert_eq!(state.page_size(), 25);
    }

    #[test]
    fn test_disallowed_page_size_rejected() {
        let mut state = TableState::new();
        assert!(!state.set_page_size(7));
        assert_eq!(state.page_size(), 10);
        assert_eq!(TableState::with_page_size(7).page_size(), 10);
    }

    #[test]
    fn test_cycle_page_size_wraps() {
        let mut state = TableState::with_page_size(50);
        state.cycle_page_size();
        assert_eq!(state.page_size(), 5);
    }

    #[test]
    fn test_data_key_change_resets_page() {
        let mut state = TableState::new();
        assert!(state.sync_data_key("users?page=1"));
        state.set_page(2, 3);
        assert!(!state.sync_data_key("users?page=1"));
        assert_eq!(state.page_index(), 2);
        assert!(state.sync_data_key("users?page=2"));
        assert_eq!(state.page_index(), 0);
    }

    #[test]
    fn test_page_navigation_bounds() {
        let mut state = TableState::new();
        state.prev_page();
        assert_eq!(state.page_index(), 0);
        state.next_page(2);
        state.next_page(2);
        assert_eq!(state.page_index(), 1);
        state.set_page(10, 2);
        assert_eq!(state.page_index(), 1);
    }

    #[test]
    fn test_page_count() {
        assert_eq!(page_count(25, 10), 3);
        assert_eq!(page_count(20, 10), 2);
        assert_eq!(page_count(0, 10), 0);
        assert_eq!(page_count(5, 0), 0);
    }

    #[test]
    fn test_reset_keeps_page_size() {
        let mut state = TableState::with_page_size(25);
        state.set_search("x");
        state.toggle_sort("name");
        state.reset();
        assert_eq!(state, TableState::with_page_size(25));
    }
}

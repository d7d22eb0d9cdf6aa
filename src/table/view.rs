//! The derived view: search, then sort, then paginate.

use super::column::Column;
use super::search::filter_indices;
use super::state::{page_count, Pagination, SortDirection, SortState, DEFAULT_PAGE_SIZE};

/// The rows a table shows for one render.
///
/// `rows` holds indices into the caller's slice so row actions can hand
/// back the caller's original record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    /// Indices of the visible rows, in display order.
    pub rows: Vec<usize>,
    /// Matching rows before pagination.
    pub total: usize,
    /// Number of pages over `total`.
    pub total_pages: usize,
    /// The page actually shown.
    pub page_index: usize,
    /// Rows per page.
    pub page_size: usize,
}

impl View {
    /// Whether there is nothing to show.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// One-based number of the first visible row, 0 when empty.
    pub fn first_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_index * self.page_size + 1
        }
    }

    /// One-based number of the last visible row, 0 when empty.
    pub fn last_row(&self) -> usize {
        if self.rows.is_empty() {
            0
        } else {
            self.page_index * self.page_size + self.rows.len()
        }
    }
}

/// Compute the visible window over `rows`.
///
/// The search query is applied first, the sort second, the page window
/// last. Unsorted output keeps the input order. A sort on an unknown or
/// unsortable column is ignored. If the requested page lies past the end of
/// the matching rows the first page is shown instead of an empty one.
pub fn compute_view<T>(
    rows: &[T],
    columns: &[Column<T>],
    projection: &dyn Fn(&T) -> String,
    search: &str,
    sort: SortState,
    pagination: Pagination,
) -> View {
    let mut matched = filter_indices(rows, search, projection);

    if let Some((column_id, direction)) = sort.current() {
        if let Some(column) = columns
            .iter()
            .find(|c| c.id() == column_id && c.is_sortable())
        {
            matched.sort_by(|&a, &b| {
                let ord = column.compare(&rows[a], &rows[b]);
                match direction {
                    SortDirection::Ascending => ord,
                    SortDirection::Descending => ord.reverse(),
                }
            });
        }
    }

    let page_size = if pagination.page_size == 0 {
        DEFAULT_PAGE_SIZE
    } else {
        pagination.page_size
    };
    let total = matched.len();
    let total_pages = page_count(total, page_size);
    let page_index = if pagination.page_index < total_pages {
        pagination.page_index
    } else {
        0
    };

    let visible = matched
        .into_iter()
        .skip(page_index * page_size)
        .take(page_size)
        .collect();

    View {
        rows: visible,
        total,
        total_pages,
        page_index,
        page_size,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::search::all_fields;
    use crate::table::state::TableState;
    use serde::Serialize;

    #[derive(Debug, Clone, Serialize, PartialEq)]
    struct Row {
        id: String,
        name: String,
        v: i64,
    }

    fn row(i: i64) -> Row {
        Row {
            id: format!("r{}", i),
            name: format!("item {}", i),
            v: i,
        }
    }

    fn columns() -> Vec<Column<Row>> {
        vec![
            Column::new("name", ("Name", "الاسم"), |r: &Row| r.name.clone().into()),
            Column::new("v", ("Value", "القيمة"), |r: &Row| r.v.into()),
        ]
    }

    fn values(rows: &[Row], view: &View) -> Vec<i64> {
        view.rows.iter().map(|&i| rows[i].v).collect()
    }

    fn view_of(rows: &[Row], state: &TableState) -> View {
        compute_view(
            rows,
            &columns(),
            &|r| all_fields(r),
            state.search(),
            state.sort(),
            state.pagination(),
        )
    }

    #[test]
    fn test_sort_toggle_cycle_on_numeric_column() {
        let rows = vec![row(3), row(1), row(2)];
        let mut state = TableState::new();

        state.toggle_sort("v");
        assert_eq!(values(&rows, &view_of(&rows, &state)), vec![1, 2, 3]);

        state.toggle_sort("v");
        assert_eq!(values(&rows, &view_of(&rows, &state)), vec![3, 2, 1]);

        state.toggle_sort("v");
        assert_eq!(values(&rows, &view_of(&rows, &state)), vec![3, 1, 2]);
    }

    #[test]
    fn test_numeric_sort_is_not_lexicographic() {
        let rows = vec![row(10), row(9), row(100)];
        let mut state = TableState::new();
        state.toggle_sort("v");
        assert_eq!(values(&rows, &view_of(&rows, &state)), vec![9, 10, 100]);
    }

    #[test]
    fn test_pagination_windowing() {
        let rows: Vec<Row> = (0..25).map(row).collect();
        let mut state = TableState::new();

        let first = view_of(&rows, &state);
        assert_eq!(first.total, 25);
        assert_eq!(first.total_pages, 3);
        assert_eq!(values(&rows, &first), (0..10).collect::<Vec<_>>());

        state.set_page(2, first.total_pages);
        let last = view_of(&rows, &state);
        assert_eq!(values(&rows, &last), (20..25).collect::<Vec<_>>());
        assert_eq!(last.first_row(), 21);
        assert_eq!(last.last_row(), 25);
    }

    #[test]
    fn test_search_change_resets_to_first_page() {
        let rows: Vec<Row> = (0..25).map(row).collect();
        let mut state = TableState::new();
        state.set_page(2, 3);
        assert_eq!(view_of(&rows, &state).page_index, 2);

        state.set_search("item 1");
        let view = view_of(&rows, &state);
        assert_eq!(view.page_index, 0);
        assert!(!view.is_empty());
        assert_eq!(view.total, 11);
    }

    #[test]
    fn test_out_of_range_page_falls_back_to_first() {
        let rows: Vec<Row> = (0..25).map(row).collect();
        let pagination = Pagination {
            page_index: 2,
            page_size: 10,
        };
        let shrunk = &rows[..8];
        let view = compute_view(shrunk, &columns(), &|r| all_fields(r), "", SortState::unsorted(), pagination);
        assert_eq!(view.page_index, 0);
        assert_eq!(view.rows.len(), 8);
    }

    #[test]
    fn test_search_applies_before_sort_and_pagination() {
        let rows: Vec<Row> = (0..30).map(row).collect();
        let mut state = TableState::with_page_size(5);
        state.set_search("item 2");
        state.toggle_sort("v");
        state.toggle_sort("v");
        let view = view_of(&rows, &state);
        assert_eq!(view.total, 11);
        assert_eq!(values(&rows, &view), vec![29, 28, 27, 26, 25]);
    }

    #[test]
    fn test_unknown_sort_column_is_ignored() {
        let rows = vec![row(2), row(1)];
        let view = compute_view(
            &rows,
            &columns(),
            &|r| all_fields(r),
            "",
            SortState::by("missing", SortDirection::Ascending),
            Pagination::default(),
        );
        assert_eq!(values(&rows, &view), vec![2, 1]);
    }

    #[test]
    fn test_empty_input() {
        let rows: Vec<Row> = Vec::new();
        let view = view_of(&rows, &TableState::new());
        assert!(view.is_empty());
        assert_eq!(view.total, 0);
        assert_eq!(view.total_pages, 0);
        assert_eq!(view.first_row(), 0);
    }
}

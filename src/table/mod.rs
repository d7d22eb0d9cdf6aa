//! Generic table logic, independent of any renderer.
//!
//! A table shows a caller-owned slice of rows through a list of
//! [`Column`] descriptors. The table itself only owns a [`TableState`]
//! (search query, sort, page window); the rows it shows are derived on
//! every render by [`compute_view`]: search first, then sort, then the
//! page window.

mod actions;
mod column;
pub mod search;
mod state;
mod view;

pub use actions::{ClickTarget, RowAction, RowActions, ACTIONS_COLUMN_ID};
pub use column::{CellValue, Column};
pub use search::SearchProjection;
pub use state::{page_count, Pagination, SortDirection, SortState, TableState, PAGE_SIZES};
pub use view::{compute_view, View};

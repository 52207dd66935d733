//! Searchable, paginated data views for ratatui.
//!
//! The reusable part is [`DataView`]: hand it the rows, the column definitions
//! and a card renderer for narrow terminals, and it takes care of filtering,
//! paging and drawing the search bar, table and page controls. The remaining
//! modules make up the `dv` binary that browses exported tables with it.

pub mod column;
pub mod controller;
pub mod data_table;
pub mod data_view;
pub mod dataset;
pub mod domain;
pub mod logging;
pub mod modal;
pub mod model;
pub mod pagination;
pub mod record;
pub mod search_bar;
pub mod ui;

pub use column::{Align, Column, ColumnsSpec, PageContext};
pub use data_table::{DataTable, ViewMode};
pub use data_view::{DataView, DataViewOptions};
pub use modal::Modal;
pub use pagination::Pagination;
pub use record::{Record, Row};
pub use search_bar::{SearchBar, SearchEvent};

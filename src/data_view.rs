use std::ops::Range;
use std::sync::Arc;

use derive_setters::Setters;
use ratatui::crossterm::event::KeyEvent;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    text::{Line, Text},
    widgets::{Block, Widget},
};
use rayon::prelude::*;
use tracing::trace;

use crate::column::{Column, ColumnsSpec, PageContext};
use crate::data_table::{DataTable, ViewMode};
use crate::pagination::{self, Pagination};
use crate::record::Record;
use crate::search_bar::{SearchBar, SearchEvent};

pub const DEFAULT_ITEMS_PER_PAGE: usize = 10;
pub const DEFAULT_MOBILE_BREAKPOINT: u16 = 60;
pub const DEFAULT_MAX_COLUMN_WIDTH: usize = 40;
pub const SEARCH_BAR_HEIGHT: u16 = 3;
pub const PAGINATION_HEIGHT: u16 = 1;

pub type MobileFn<R> = Arc<dyn Fn(&R, usize) -> Text<'static> + Send + Sync>;
pub type ActionsFn<R> = Arc<dyn Fn(&R, usize) -> Line<'static> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Setters)]
pub struct DataViewOptions {
    /// Show the search bar and filter by `search_keys`.
    pub searchable: bool,
    /// Field names compared against the query.
    pub search_keys: Vec<String>,
    pub items_per_page: usize,
    #[setters(strip_option, into)]
    pub title: Option<String>,
    /// Below this width rows are drawn as cards.
    pub mobile_breakpoint: u16,
    pub max_column_width: usize,
}

impl Default for DataViewOptions {
    fn default() -> Self {
        Self {
            searchable: false,
            search_keys: Vec::new(),
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            title: None,
            mobile_breakpoint: DEFAULT_MOBILE_BREAKPOINT,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

/// Areas a [`DataView`] occupies when rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataViewLayout {
    pub search: Option<Rect>,
    pub table: Rect,
    pub pagination: Option<Rect>,
}

/// Searchable, paginated view over an in-memory collection.
///
/// Owns the current page and the search query. Everything else (filtered rows,
/// the page slice, the resolved columns) is derived from the data and those
/// two values.
pub struct DataView<R> {
    data: Arc<Vec<R>>,
    columns: ColumnsSpec<R>,
    render_mobile: MobileFn<R>,
    render_actions: Option<ActionsFn<R>>,
    options: DataViewOptions,
    current_page: usize,
    search: String,
    rows: Arc<Vec<usize>>, // Mapping of filtered index to data index
    selected: Option<usize>,
    search_bar: SearchBar,
}

impl<R: Record + Sync> DataView<R> {
    pub fn new<F>(data: Vec<R>, columns: impl Into<ColumnsSpec<R>>, render_mobile: F) -> Self
    where
        F: Fn(&R, usize) -> Text<'static> + Send + Sync + 'static,
    {
        let mut view = Self {
            data: Arc::new(data),
            columns: columns.into(),
            render_mobile: Arc::new(render_mobile),
            render_actions: None,
            options: DataViewOptions::default(),
            current_page: 1,
            search: String::new(),
            rows: Arc::new(Vec::new()),
            selected: None,
            search_bar: SearchBar::new("Type / to search ..."),
        };
        view.refilter();
        view
    }

    pub fn with_options(mut self, options: DataViewOptions) -> Self {
        self.options = options;
        self.refilter();
        self
    }

    pub fn with_actions<F>(mut self, render: F) -> Self
    where
        F: Fn(&R, usize) -> Line<'static> + Send + Sync + 'static,
    {
        self.render_actions = Some(Arc::new(render));
        self
    }

    pub fn options(&self) -> &DataViewOptions {
        &self.options
    }

    pub fn data(&self) -> &[R] {
        &self.data
    }

    /// Replace the underlying collection. The query is kept.
    pub fn set_data(&mut self, data: Vec<R>) {
        self.data = Arc::new(data);
        self.refilter();
    }

    pub fn set_columns(&mut self, columns: impl Into<ColumnsSpec<R>>) {
        self.columns = columns.into();
    }

    pub fn set_searchable(&mut self, searchable: bool) {
        self.options.searchable = searchable;
        self.refilter();
    }

    pub fn set_search_keys(&mut self, keys: Vec<String>) {
        self.options.search_keys = keys;
        self.refilter();
    }

    pub fn set_items_per_page(&mut self, items_per_page: usize) {
        self.options.items_per_page = items_per_page;
        self.restore_page();
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Apply a new query. Always returns to the first page.
    pub fn on_search(&mut self, query: &str) {
        trace!("Search \"{}\" -> \"{}\"", self.search, query);
        self.search = query.to_string();
        self.current_page = 1;
        if self.search_bar.query() != query {
            self.search_bar.set(query);
        }
        self.refilter();
    }

    pub fn search_bar(&self) -> &SearchBar {
        &self.search_bar
    }

    pub fn focus_search(&mut self, focused: bool) {
        self.search_bar.set_focused(focused);
    }

    /// Feed a key to the search bar, applying any query change.
    pub fn handle_search_key(&mut self, key: KeyEvent) -> Option<SearchEvent> {
        let event = self.search_bar.read(key);
        if let Some(SearchEvent::Changed(query)) = &event {
            let query = query.clone();
            self.on_search(&query);
        }
        event
    }

    fn refilter(&mut self) {
        let keys: &[String] = if self.options.searchable {
            &self.options.search_keys
        } else {
            &[]
        };
        self.rows = Arc::new(filter_indices(&self.data, &self.search, keys));
        trace!(
            "Filtered {} of {} rows for \"{}\"",
            self.rows.len(),
            self.data.len(),
            self.search
        );
        self.restore_page();
    }

    fn restore_page(&mut self) {
        if self.current_page < 1 || self.current_page > self.total_pages() {
            self.current_page = 1;
        }
        self.reset_selection();
    }

    // ---------------------------- Pagination ----------------------------- //

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn items_per_page(&self) -> usize {
        self.options.items_per_page
    }

    pub fn total_pages(&self) -> usize {
        pagination::total_pages(self.rows.len(), self.options.items_per_page)
    }

    pub fn pagination(&self) -> Pagination {
        Pagination::new(
            self.current_page,
            self.rows.len(),
            self.options.items_per_page,
        )
    }

    /// Pagination is only shown when the filtered rows do not fit on one page.
    pub fn show_pagination(&self) -> bool {
        self.rows.len() > self.options.items_per_page
    }

    pub fn set_page(&mut self, page: usize) {
        let page = page.clamp(1, self.total_pages());
        if page != self.current_page {
            trace!("Page {} -> {}", self.current_page, page);
        }
        self.current_page = page;
        self.reset_selection();
    }

    pub fn next_page(&mut self) {
        self.set_page(self.pagination().next());
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.pagination().previous());
    }

    pub fn first_page(&mut self) {
        self.set_page(1);
    }

    pub fn last_page(&mut self) {
        self.set_page(self.total_pages());
    }

    pub fn page_context(&self) -> PageContext {
        PageContext {
            current_page: self.current_page,
            items_per_page: self.options.items_per_page,
        }
    }

    // ---------------------------- Derived data ---------------------------- //

    pub fn filtered_len(&self) -> usize {
        self.rows.len()
    }

    pub fn filtered(&self) -> Vec<&R> {
        self.rows.iter().map(|&idx| &self.data[idx]).collect()
    }

    /// Range of the current page within the filtered rows.
    pub fn page_range(&self) -> Range<usize> {
        let start = std::cmp::min(self.page_context().offset(), self.rows.len());
        let end = std::cmp::min(start + self.options.items_per_page, self.rows.len());
        start..end
    }

    pub fn page_rows(&self) -> Vec<&R> {
        self.rows[self.page_range()]
            .iter()
            .map(|&idx| &self.data[idx])
            .collect()
    }

    /// Columns for the current page. Dynamic definitions are evaluated here.
    pub fn resolved_columns(&self) -> Vec<Column<R>> {
        self.columns.resolve(self.page_context())
    }

    // ----------------------------- Selection ------------------------------ //

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_record(&self) -> Option<&R> {
        let idx = self.page_range().start + self.selected?;
        self.rows.get(idx).map(|&ridx| &self.data[ridx])
    }

    pub fn select_next(&mut self) {
        let len = self.page_range().len();
        self.selected = match self.selected {
            Some(s) if s + 1 < len => Some(s + 1),
            Some(s) => Some(s),
            None if len > 0 => Some(0),
            None => None,
        };
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.map(|s| s.saturating_sub(1));
    }

    fn reset_selection(&mut self) {
        self.selected = if self.page_range().is_empty() {
            None
        } else {
            Some(0)
        };
    }

    // ------------------------------ Rendering ----------------------------- //

    pub fn layout(&self, area: Rect) -> DataViewLayout {
        let searchable = self.options.searchable;
        let paginated = self.show_pagination();

        let mut constraints = Vec::with_capacity(3);
        if searchable {
            constraints.push(Constraint::Length(SEARCH_BAR_HEIGHT));
        }
        constraints.push(Constraint::Min(0));
        if paginated {
            constraints.push(Constraint::Length(PAGINATION_HEIGHT));
        }
        let chunks = Layout::vertical(constraints).split(area);

        let table_idx = usize::from(searchable);
        DataViewLayout {
            search: searchable.then(|| chunks[0]),
            table: chunks[table_idx],
            pagination: paginated.then(|| chunks[table_idx + 1]),
        }
    }

    pub fn view_mode(&self, width: u16) -> ViewMode {
        ViewMode::for_width(width, self.options.mobile_breakpoint)
    }
}

/// Data indices of rows where any of `search_keys` contains `query`,
/// ignoring case. An empty query or no keys keeps every row.
pub fn filter_indices<R: Record + Sync>(data: &[R], query: &str, search_keys: &[String]) -> Vec<usize> {
    if query.is_empty() || search_keys.is_empty() {
        return (0..data.len()).collect();
    }
    let needle = query.to_lowercase();
    data.par_iter()
        .enumerate()
        .filter(|(_, row)| row_matches(*row, &needle, search_keys))
        .map(|(idx, _)| idx)
        .collect()
}

/// `needle` must already be lowercase. Missing fields are empty strings.
pub fn row_matches<R: Record>(row: &R, needle: &str, search_keys: &[String]) -> bool {
    search_keys.iter().any(|key| {
        row.field(key)
            .unwrap_or_default()
            .to_lowercase()
            .contains(needle)
    })
}

impl<R: Record + Sync> Widget for &DataView<R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.layout(area);

        if let Some(search_area) = layout.search {
            self.search_bar.render(search_area, buf);
        }

        let columns = self.resolved_columns();
        let page = self.page_rows();
        let mut table = DataTable::new(&columns, &page, &*self.render_mobile)
            .mode(self.view_mode(area.width))
            .selected(self.selected)
            .max_column_width(self.options.max_column_width);
        if let Some(actions) = self.render_actions.as_deref() {
            table = table.actions(actions);
        }
        if let Some(title) = &self.options.title {
            table = table.block(Block::bordered().title(format!(
                " {} ({}) ",
                title,
                self.rows.len()
            )));
        }
        table.render(layout.table, buf);

        if let Some(pagination_area) = layout.pagination {
            self.pagination().render(pagination_area, buf);
        }
    }
}

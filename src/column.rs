use std::fmt;
use std::sync::Arc;

use ratatui::layout::Alignment;
use ratatui::text::Line;

/// Horizontal alignment of a column's header and cells.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

impl From<Align> for Alignment {
    fn from(align: Align) -> Self {
        match align {
            Align::Left => Alignment::Left,
            Align::Center => Alignment::Center,
            Align::Right => Alignment::Right,
        }
    }
}

pub type CellRenderer<R> = Arc<dyn Fn(&R, usize) -> Line<'static> + Send + Sync>;

/// Describes one table column: a header label and how to render a cell.
///
/// `render` receives the row and the row's index within the current page and
/// must be a pure function of both.
pub struct Column<R> {
    pub label: String,
    pub align: Align,
    render: CellRenderer<R>,
}

impl<R> Column<R> {
    pub fn new<F>(label: impl Into<String>, render: F) -> Self
    where
        F: Fn(&R, usize) -> Line<'static> + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            align: Align::Left,
            render: Arc::new(render),
        }
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn render(&self, row: &R, index: usize) -> Line<'static> {
        (self.render)(row, index).alignment(self.align.into())
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            align: self.align,
            render: Arc::clone(&self.render),
        }
    }
}

impl<R> fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("label", &self.label)
            .field("align", &self.align)
            .finish_non_exhaustive()
    }
}

/// Pagination context handed to dynamic column definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageContext {
    pub current_page: usize,
    pub items_per_page: usize,
}

impl PageContext {
    /// Index of the first row of the page within the filtered set.
    pub fn offset(&self) -> usize {
        self.current_page.saturating_sub(1) * self.items_per_page
    }

    /// 1-based position of a page row within the filtered set.
    pub fn ordinal(&self, index: usize) -> usize {
        self.offset() + index + 1
    }
}

pub type ColumnsFn<R> = Arc<dyn Fn(PageContext) -> Vec<Column<R>> + Send + Sync>;

/// Column definitions, either fixed or derived from the pagination context.
///
/// The dynamic form exists for columns that depend on the page offset, such as
/// a running "No." column.
pub enum ColumnsSpec<R> {
    Static(Vec<Column<R>>),
    Dynamic(ColumnsFn<R>),
}

impl<R> ColumnsSpec<R> {
    pub fn dynamic<F>(f: F) -> Self
    where
        F: Fn(PageContext) -> Vec<Column<R>> + Send + Sync + 'static,
    {
        ColumnsSpec::Dynamic(Arc::new(f))
    }

    pub fn resolve(&self, ctx: PageContext) -> Vec<Column<R>> {
        match self {
            ColumnsSpec::Static(columns) => columns.clone(),
            ColumnsSpec::Dynamic(f) => f(ctx),
        }
    }
}

impl<R> From<Vec<Column<R>>> for ColumnsSpec<R> {
    fn from(columns: Vec<Column<R>>) -> Self {
        ColumnsSpec::Static(columns)
    }
}

impl<R> Clone for ColumnsSpec<R> {
    fn clone(&self) -> Self {
        match self {
            ColumnsSpec::Static(columns) => ColumnsSpec::Static(columns.clone()),
            ColumnsSpec::Dynamic(f) => ColumnsSpec::Dynamic(Arc::clone(f)),
        }
    }
}

/// Content of a rendered line as plain text.
pub fn line_text(line: &Line<'_>) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Employee {
        name: &'static str,
    }

    fn name_column() -> Column<Employee> {
        Column::new("Name", |e: &Employee, _| Line::from(e.name))
    }

    #[test]
    fn column_defaults_to_left() {
        let col = name_column();
        assert_eq!(col.align, Align::Left);
        let line = col.render(&Employee { name: "Rina" }, 0);
        assert_eq!(line_text(&line), "Rina");
        assert_eq!(line.alignment, Some(Alignment::Left));
    }

    #[test]
    fn column_alignment_is_applied() {
        let col = name_column().align(Align::Right);
        let line = col.render(&Employee { name: "Rina" }, 0);
        assert_eq!(line.alignment, Some(Alignment::Right));
    }

    #[test]
    fn page_context_ordinals() {
        let ctx = PageContext {
            current_page: 2,
            items_per_page: 10,
        };
        assert_eq!(ctx.offset(), 10);
        assert_eq!(ctx.ordinal(0), 11);
        assert_eq!(ctx.ordinal(9), 20);
    }

    #[test]
    fn static_spec_keeps_order() {
        let spec: ColumnsSpec<Employee> = vec![
            name_column(),
            Column::new("Dept", |_: &Employee, _| Line::from("-")),
        ]
        .into();
        let ctx = PageContext {
            current_page: 5,
            items_per_page: 3,
        };
        let labels: Vec<String> = spec.resolve(ctx).into_iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["Name", "Dept"]);
    }

    #[test]
    fn dynamic_spec_sees_context() {
        let spec = ColumnsSpec::dynamic(|ctx: PageContext| {
            vec![Column::new("No.", move |_: &Employee, idx| {
                Line::from(ctx.ordinal(idx).to_string())
            })]
        });
        let ctx = PageContext {
            current_page: 3,
            items_per_page: 10,
        };
        let columns = spec.resolve(ctx);
        let line = columns[0].render(&Employee { name: "x" }, 4);
        assert_eq!(line_text(&line), "25");
    }
}

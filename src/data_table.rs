use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Cell, Paragraph, Row as TableRow, StatefulWidget, Table, TableState, Widget},
};

use crate::column::{Column, line_text};

pub const COLUMN_WIDTH_MARGIN: usize = 1;
pub const ACTIONS_LABEL: &str = "Actions";

pub type MobileRenderer<'a, R> = &'a (dyn Fn(&R, usize) -> Text<'static> + Send + Sync);
pub type ActionsRenderer<'a, R> = &'a (dyn Fn(&R, usize) -> Line<'static> + Send + Sync);

/// Which layout a [`DataTable`] draws.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// Columnar table with a header row.
    #[default]
    Table,
    /// One card per row, for narrow terminals.
    Cards,
}

impl ViewMode {
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            ViewMode::Cards
        } else {
            ViewMode::Table
        }
    }
}

/// Stateless renderer for one page of rows.
///
/// Knows nothing about filtering or pagination: `data` is exactly what is shown.
pub struct DataTable<'a, R> {
    columns: &'a [Column<R>],
    data: &'a [&'a R],
    render_mobile: MobileRenderer<'a, R>,
    render_actions: Option<ActionsRenderer<'a, R>>,
    mode: ViewMode,
    selected: Option<usize>,
    max_column_width: usize,
    block: Option<Block<'a>>,
}

impl<'a, R> DataTable<'a, R> {
    pub fn new(
        columns: &'a [Column<R>],
        data: &'a [&'a R],
        render_mobile: MobileRenderer<'a, R>,
    ) -> Self {
        Self {
            columns,
            data,
            render_mobile,
            render_actions: None,
            mode: ViewMode::Table,
            selected: None,
            max_column_width: usize::MAX,
            block: None,
        }
    }

    /// Appends an actions column rendered by `render`.
    pub fn actions(mut self, render: ActionsRenderer<'a, R>) -> Self {
        self.render_actions = Some(render);
        self
    }

    pub fn mode(mut self, mode: ViewMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    pub fn max_column_width(mut self, width: usize) -> Self {
        self.max_column_width = width;
        self
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }

    pub fn labels(&self) -> Vec<&str> {
        let mut labels: Vec<&str> = self.columns.iter().map(|c| c.label.as_str()).collect();
        if self.render_actions.is_some() {
            labels.push(ACTIONS_LABEL);
        }
        labels
    }

    /// Desktop cells, one `Vec` per row in column order.
    pub fn cells(&self) -> Vec<Vec<Line<'static>>> {
        self.data
            .iter()
            .enumerate()
            .map(|(idx, &row)| {
                let mut cells: Vec<Line<'static>> =
                    self.columns.iter().map(|c| c.render(row, idx)).collect();
                if let Some(actions) = self.render_actions {
                    cells.push(actions(row, idx));
                }
                cells
            })
            .collect()
    }

    /// Mobile cards, one per row.
    pub fn cards(&self) -> Vec<Text<'static>> {
        self.data
            .iter()
            .enumerate()
            .map(|(idx, &row)| (self.render_mobile)(row, idx))
            .collect()
    }

    fn column_widths(&self, cells: &[Vec<Line<'static>>]) -> Vec<Constraint> {
        self.labels()
            .iter()
            .enumerate()
            .map(|(cidx, label)| {
                let content = cells
                    .iter()
                    .filter_map(|row| row.get(cidx))
                    .map(|line| line.width())
                    .max()
                    .unwrap_or(0);
                let width = std::cmp::max(label.chars().count(), content) + COLUMN_WIDTH_MARGIN;
                let width = std::cmp::min(width, self.max_column_width);
                Constraint::Length(u16::try_from(width).unwrap_or(u16::MAX))
            })
            .collect()
    }

    fn render_table(self, area: Rect, buf: &mut Buffer) {
        let cells = self.cells();
        let widths = self.column_widths(&cells);

        let mut header_cells: Vec<Cell> = self
            .columns
            .iter()
            .map(|c| Cell::from(Line::from(c.label.clone()).alignment(c.align.into())))
            .collect();
        if self.render_actions.is_some() {
            header_cells.push(Cell::from(ACTIONS_LABEL));
        }
        let header = TableRow::new(header_cells)
            .style(Style::default().add_modifier(Modifier::BOLD))
            .bottom_margin(0);

        let rows = cells
            .into_iter()
            .map(|row| TableRow::new(row.into_iter().map(Cell::from)));

        let mut table = Table::new(rows, widths)
            .header(header)
            .column_spacing(1)
            .row_highlight_style(Style::default().bg(Color::DarkGray));
        if let Some(block) = self.block {
            table = table.block(block);
        }

        let mut state = TableState::default().with_selected(self.selected);
        StatefulWidget::render(table, area, buf, &mut state);
    }

    fn render_cards(self, area: Rect, buf: &mut Buffer) {
        let inner = match self.block.clone() {
            Some(block) => {
                let inner = block.inner(area);
                block.render(area, buf);
                inner
            }
            None => area,
        };

        let mut y = inner.y;
        for (idx, card) in self.cards().into_iter().enumerate() {
            let height = u16::try_from(card.height())
                .unwrap_or(u16::MAX)
                .saturating_add(2);
            if y >= inner.bottom() {
                break;
            }
            let card_area = Rect::new(inner.x, y, inner.width, std::cmp::min(height, inner.bottom() - y));
            let border_style = if self.selected == Some(idx) {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default()
            };
            Paragraph::new(card)
                .block(Block::default().borders(Borders::ALL).border_style(border_style))
                .render(card_area, buf);
            y += card_area.height;
        }
    }
}

impl<R> Widget for DataTable<'_, R> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.mode {
            ViewMode::Table => self.render_table(area, buf),
            ViewMode::Cards => self.render_cards(area, buf),
        }
    }
}

/// Plain text of every desktop cell, for logging and tests.
pub fn cell_texts(cells: &[Vec<Line<'static>>]) -> Vec<Vec<String>> {
    cells
        .iter()
        .map(|row| row.iter().map(line_text).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::column::Align;

    struct Shift {
        employee: &'static str,
        hours: u32,
    }

    fn columns() -> Vec<Column<Shift>> {
        vec![
            Column::new("Employee", |s: &Shift, _| Line::from(s.employee)),
            Column::new("Hours", |s: &Shift, _| Line::from(s.hours.to_string())).align(Align::Right),
        ]
    }

    fn mobile(s: &Shift, idx: usize) -> Text<'static> {
        Text::from(format!("{}. {} ({}h)", idx + 1, s.employee, s.hours))
    }

    fn buffer_text(buf: &Buffer) -> String {
        let mut out = String::new();
        for y in buf.area.top()..buf.area.bottom() {
            for x in buf.area.left()..buf.area.right() {
                out.push_str(buf[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn renders_cells_with_page_index() {
        let shifts = [
            Shift { employee: "Andi", hours: 8 },
            Shift { employee: "Wati", hours: 12 },
        ];
        let page: Vec<&Shift> = shifts.iter().collect();
        let cols = columns();
        let table = DataTable::new(&cols, &page, &mobile);

        assert_eq!(
            cell_texts(&table.cells()),
            vec![vec!["Andi", "8"], vec!["Wati", "12"]]
        );
        let cards: Vec<String> = table
            .cards()
            .iter()
            .map(|t| t.lines.iter().map(line_text).collect::<String>())
            .collect();
        assert_eq!(cards, vec!["1. Andi (8h)", "2. Wati (12h)"]);
    }

    #[test]
    fn actions_column_is_appended() {
        let shifts = [Shift { employee: "Andi", hours: 8 }];
        let page: Vec<&Shift> = shifts.iter().collect();
        let cols = columns();
        let approve = |_: &Shift, _: usize| Line::from("[approve]");
        let table = DataTable::new(&cols, &page, &mobile).actions(&approve);

        assert_eq!(table.labels(), vec!["Employee", "Hours", ACTIONS_LABEL]);
        assert_eq!(cell_texts(&table.cells()), vec![vec!["Andi", "8", "[approve]"]]);
    }

    #[test]
    fn empty_page_renders_in_both_modes() {
        let page: Vec<&Shift> = Vec::new();
        let cols = columns();
        let area = Rect::new(0, 0, 30, 6);

        let table = DataTable::new(&cols, &page, &mobile);
        assert!(table.cells().is_empty());
        assert!(table.cards().is_empty());

        let mut buf = Buffer::empty(area);
        DataTable::new(&cols, &page, &mobile)
            .mode(ViewMode::Table)
            .render(area, &mut buf);
        assert!(buffer_text(&buf).contains("Employee"));

        let mut buf = Buffer::empty(area);
        DataTable::new(&cols, &page, &mobile)
            .mode(ViewMode::Cards)
            .render(area, &mut buf);
        assert!(buffer_text(&buf).trim().is_empty());
    }

    #[test]
    fn table_mode_draws_rows() {
        let shifts = [
            Shift { employee: "Andi", hours: 8 },
            Shift { employee: "Wati", hours: 12 },
        ];
        let page: Vec<&Shift> = shifts.iter().collect();
        let cols = columns();
        let area = Rect::new(0, 0, 30, 4);
        let mut buf = Buffer::empty(area);
        DataTable::new(&cols, &page, &mobile)
            .selected(Some(1))
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("Employee"));
        assert!(text.contains("Andi"));
        assert!(text.contains("Wati"));
    }

    #[test]
    fn cards_mode_draws_cards() {
        let shifts = [Shift { employee: "Andi", hours: 8 }];
        let page: Vec<&Shift> = shifts.iter().collect();
        let cols = columns();
        let area = Rect::new(0, 0, 30, 5);
        let mut buf = Buffer::empty(area);
        DataTable::new(&cols, &page, &mobile)
            .mode(ViewMode::Cards)
            .render(area, &mut buf);

        let text = buffer_text(&buf);
        assert!(text.contains("1. Andi (8h)"));
        assert!(!text.contains("Employee"));
    }

    #[test]
    fn view_mode_follows_breakpoint() {
        assert_eq!(ViewMode::for_width(50, 60), ViewMode::Cards);
        assert_eq!(ViewMode::for_width(60, 60), ViewMode::Table);
        assert_eq!(ViewMode::for_width(120, 60), ViewMode::Table);
    }

    #[test]
    fn widths_respect_cap() {
        let shifts = [Shift { employee: "Muhammad Abdurrahman Hakim", hours: 8 }];
        let page: Vec<&Shift> = shifts.iter().collect();
        let cols = columns();
        let table = DataTable::new(&cols, &page, &mobile).max_column_width(10);
        let widths = table.column_widths(&table.cells());
        assert_eq!(widths, vec![Constraint::Length(10), Constraint::Length(6)]);
    }

    #[test]
    fn oversized_content_saturates() {
        let notes = ["x".repeat(70_000), "baris\n".repeat(70_000)];
        let page: Vec<&String> = notes.iter().collect();
        let cols = vec![Column::new("Note", |s: &String, _| Line::from(s.clone()))];
        let card = |s: &String, _: usize| Text::from(s.clone());

        let table = DataTable::new(&cols, &page, &card);
        let widths = table.column_widths(&table.cells());
        assert_eq!(widths, vec![Constraint::Length(u16::MAX)]);

        let area = Rect::new(0, 0, 20, 6);
        let mut buf = Buffer::empty(area);
        DataTable::new(&cols, &page, &card)
            .mode(ViewMode::Cards)
            .render(area, &mut buf);
        assert!(buffer_text(&buf).contains("xxx"));
    }
}

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Widget,
};

pub const PREVIOUS_LABEL: &str = "‹ Prev";
pub const NEXT_LABEL: &str = "Next ›";

/// Page controls for a list of `total_items`.
///
/// Fully controlled: the owner keeps the current page and applies the pages
/// returned by [`Pagination::previous`] and [`Pagination::next`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    total_items: usize,
    items_per_page: usize,
}

impl Pagination {
    pub fn new(current_page: usize, total_items: usize, items_per_page: usize) -> Self {
        Self {
            current_page,
            total_items,
            items_per_page,
        }
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.total_items, self.items_per_page)
    }

    /// Current page clamped into `1..=total_pages`.
    pub fn page(&self) -> usize {
        self.current_page.clamp(1, self.total_pages())
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages()
    }

    /// Page to switch to when "previous" is activated.
    pub fn previous(&self) -> usize {
        std::cmp::max(self.current_page.saturating_sub(1), 1)
    }

    /// Page to switch to when "next" is activated.
    pub fn next(&self) -> usize {
        std::cmp::min(self.current_page + 1, self.total_pages())
    }

    pub fn indicator(&self) -> String {
        format!("Page {} / {}", self.page(), self.total_pages())
    }
}

/// `max(1, ceil(total_items / items_per_page))`; zero items per page is a
/// single page.
pub fn total_pages(total_items: usize, items_per_page: usize) -> usize {
    if items_per_page == 0 {
        return 1;
    }
    std::cmp::max(1, total_items.div_ceil(items_per_page))
}

fn control(label: &'static str, enabled: bool) -> Line<'static> {
    if enabled {
        Line::from(label.bold())
    } else {
        Line::styled(label, Style::default().fg(Color::DarkGray))
    }
}

impl Widget for Pagination {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let [prev_area, indicator_area, next_area] = Layout::horizontal([
            Constraint::Length(PREVIOUS_LABEL.chars().count() as u16),
            Constraint::Min(0),
            Constraint::Length(NEXT_LABEL.chars().count() as u16),
        ])
        .areas(area);

        control(PREVIOUS_LABEL, self.has_previous()).render(prev_area, buf);
        Line::from(self.indicator())
            .centered()
            .render(indicator_area, buf);
        control(NEXT_LABEL, self.has_next())
            .right_aligned()
            .render(next_area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer_line(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol())
            .collect()
    }

    #[test]
    fn total_pages_bounds() {
        for ipp in 1..=7 {
            for items in 0..=50 {
                let p = Pagination::new(1, items, ipp);
                let expected = std::cmp::max(1, (items + ipp - 1) / ipp);
                assert_eq!(p.total_pages(), expected, "items {items}, ipp {ipp}");
                assert!(p.page() >= 1 && p.page() <= p.total_pages());
            }
        }
    }

    #[test]
    fn zero_items_per_page_is_one_page() {
        let p = Pagination::new(1, 42, 0);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_previous());
        assert!(!p.has_next());
    }

    #[test]
    fn previous_and_next_clamp() {
        let first = Pagination::new(1, 25, 10);
        assert_eq!(first.previous(), 1);
        assert!(!first.has_previous());
        assert!(first.has_next());
        assert_eq!(first.next(), 2);

        let last = Pagination::new(3, 25, 10);
        assert_eq!(last.next(), 3);
        assert!(!last.has_next());
        assert_eq!(last.previous(), 2);
    }

    #[test]
    fn indicator_never_leaves_range() {
        assert_eq!(Pagination::new(9, 25, 10).indicator(), "Page 3 / 3");
        assert_eq!(Pagination::new(0, 25, 10).indicator(), "Page 1 / 3");
    }

    #[test]
    fn empty_list_disables_both_controls() {
        let p = Pagination::new(1, 0, 10);
        assert_eq!(p.total_pages(), 1);
        assert!(!p.has_previous());
        assert!(!p.has_next());
        assert_eq!(p.indicator(), "Page 1 / 1");
    }

    #[test]
    fn renders_controls_and_indicator() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        Pagination::new(2, 25, 10).render(area, &mut buf);

        let line = buffer_line(&buf, 0);
        assert!(line.starts_with(PREVIOUS_LABEL));
        assert!(line.trim_end().ends_with(NEXT_LABEL));
        assert!(line.contains("Page 2 / 3"));
    }

    #[test]
    fn disabled_controls_are_dimmed() {
        let area = Rect::new(0, 0, 40, 1);
        let mut buf = Buffer::empty(area);
        Pagination::new(1, 0, 10).render(area, &mut buf);

        assert_eq!(buf[(0, 0)].fg, Color::DarkGray);
        assert_eq!(buf[(39, 0)].fg, Color::DarkGray);
    }
}

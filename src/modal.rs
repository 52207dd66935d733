use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Text},
    widgets::{Block, BorderType, Clear, Paragraph, Widget, Wrap},
};

/// Dialog shell drawn centred over whatever is below it.
#[derive(Debug, Clone)]
pub struct Modal<'a> {
    title: Line<'a>,
    body: Text<'a>,
    footer: Option<Line<'a>>,
    width_percent: u16,
    height_percent: u16,
}

impl<'a> Modal<'a> {
    pub fn new(title: impl Into<Line<'a>>, body: impl Into<Text<'a>>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            footer: None,
            width_percent: 60,
            height_percent: 60,
        }
    }

    pub fn footer(mut self, footer: impl Into<Line<'a>>) -> Self {
        self.footer = Some(footer.into());
        self
    }

    pub fn size(mut self, width_percent: u16, height_percent: u16) -> Self {
        self.width_percent = width_percent.min(100);
        self.height_percent = height_percent.min(100);
        self
    }

    /// Area the dialog covers inside `area`.
    pub fn area(&self, area: Rect) -> Rect {
        let [vertical] = Layout::vertical([Constraint::Percentage(self.height_percent)])
            .flex(Flex::Center)
            .areas(area);
        let [centered] = Layout::horizontal([Constraint::Percentage(self.width_percent)])
            .flex(Flex::Center)
            .areas(vertical);
        centered
    }
}

impl Widget for Modal<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let popup = self.area(area);
        Clear.render(popup, buf);

        let mut block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(self.title.bold().centered());
        if let Some(footer) = self.footer {
            block = block.title_bottom(footer.centered());
        }

        Paragraph::new(self.body)
            .wrap(Wrap { trim: false })
            .block(block)
            .render(popup, buf);
    }
}

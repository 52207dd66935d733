use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};
use tracing::trace;

/// What a key press did to the search bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent {
    /// The text changed. Carries the complete new query.
    Changed(String),
    /// Enter was pressed.
    Submitted,
}

/// Single-line search input.
///
/// Emits [`SearchEvent::Changed`] synchronously on every edit; there is no
/// debouncing. `Esc` / `Ctrl-U` act as the clear button.
#[derive(Debug, Default, Clone)]
pub struct SearchBar {
    query: String,
    curser_pos: usize, // in chars
    focused: bool,
    placeholder: String,
}

impl SearchBar {
    pub fn new(placeholder: impl Into<String>) -> Self {
        Self {
            placeholder: placeholder.into(),
            ..Self::default()
        }
    }

    pub fn read(&mut self, key: KeyEvent) -> Option<SearchEvent> {
        let event = match (key.code, key.modifiers) {
            (KeyCode::Enter, _) => Some(SearchEvent::Submitted),
            (KeyCode::Esc, _) => Some(self.clear()),
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => Some(self.clear()),
            (KeyCode::Backspace, _) => self.backspace(),
            (KeyCode::Delete, _) => self.delete(),
            (KeyCode::Left, _) => self.left(),
            (KeyCode::Right, _) => self.right(),
            (KeyCode::Home, _) => {
                self.curser_pos = 0;
                None
            }
            (KeyCode::End, _) => {
                self.curser_pos = self.query.chars().count();
                None
            }
            (kc, km) => self.key(kc, km),
        };
        trace!("Search input {key:?} => {event:?}");
        event
    }

    /// Reset the query. Always reports the (empty) new value.
    pub fn clear(&mut self) -> SearchEvent {
        self.query.clear();
        self.curser_pos = 0;
        SearchEvent::Changed(String::new())
    }

    /// Replace the text without emitting an event.
    pub fn set(&mut self, s: &str) {
        self.query = s.to_string();
        self.curser_pos = self.query.chars().count();
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn cursor(&self) -> usize {
        self.curser_pos
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn changed(&self) -> Option<SearchEvent> {
        Some(SearchEvent::Changed(self.query.clone()))
    }

    fn backspace(&mut self) -> Option<SearchEvent> {
        if self.curser_pos == 0 {
            return None;
        }
        self.curser_pos -= 1;
        self.query.remove(self.getbytepos());
        self.changed()
    }

    fn delete(&mut self) -> Option<SearchEvent> {
        if self.curser_pos >= self.query.chars().count() {
            return None;
        }
        self.query.remove(self.getbytepos());
        self.changed()
    }

    fn left(&mut self) -> Option<SearchEvent> {
        self.curser_pos = self.curser_pos.saturating_sub(1);
        None
    }

    fn right(&mut self) -> Option<SearchEvent> {
        if self.curser_pos < self.query.chars().count() {
            self.curser_pos += 1;
        }
        None
    }

    fn key(&mut self, code: KeyCode, modifier: KeyModifiers) -> Option<SearchEvent> {
        if modifier.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
            return None;
        }
        let chr = code.as_char()?;
        self.query.insert(self.getbytepos(), chr);
        self.curser_pos += 1;
        self.changed()
    }

    fn getbytepos(&self) -> usize {
        self.query
            .char_indices()
            .nth(self.curser_pos)
            .map(|(byte_idx, _)| byte_idx)
            .unwrap_or(self.query.len())
    }

    /// Terminal position of the cursor when rendered into `area`.
    pub fn cursor_position(&self, area: Rect) -> Position {
        let inner = Block::bordered().inner(area);
        let x = inner.x + std::cmp::min(self.curser_pos as u16, inner.width.saturating_sub(1));
        Position::new(x, inner.y)
    }
}

impl Widget for &SearchBar {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default()
        };
        let block = Block::bordered()
            .title(" Search ")
            .border_style(border_style);

        let line = if self.query.is_empty() && !self.focused {
            Line::from(Span::styled(
                self.placeholder.clone(),
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(self.query.clone())
        };
        Paragraph::new(line).block(block).render(area, buf);
    }
}

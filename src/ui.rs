use std::time::Duration;

use ratatui::{
    Frame,
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span, Text},
};

use crate::modal::Modal;
use crate::model::Model;

pub const STATUSLINE_HEIGHT: u16 = 1;
const STATUS_MESSAGE_TIMEOUT: Duration = Duration::from_secs(4);

#[derive(Debug, Default)]
pub struct TableUI {}

impl TableUI {
    pub fn new() -> Self {
        Self {}
    }

    pub fn draw(&mut self, model: &Model, frame: &mut Frame) {
        let [view_area, status_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(STATUSLINE_HEIGHT)])
                .areas(frame.area());

        let view = model.view();
        frame.render_widget(view, view_area);

        if view.search_bar().is_focused()
            && let Some(search_area) = view.layout(view_area).search
        {
            frame.set_cursor_position(view.search_bar().cursor_position(search_area));
        }

        frame.render_widget(Self::status_line(model), status_area);

        if let Some(popup) = model.popup() {
            let body = Text::from(
                popup
                    .body
                    .iter()
                    .map(|l| Line::from(l.as_str()))
                    .collect::<Vec<Line>>(),
            );
            let modal = Modal::new(format!(" {} ", popup.title), body).footer(" Esc to close ");
            frame.render_widget(modal, frame.area());
        }
    }

    fn status_line(model: &Model) -> Line<'_> {
        let mut spans = vec![Span::styled(
            model.status_line(),
            Style::default().fg(Color::Black).bg(Color::Gray),
        )];
        if model.last_status_message_update().elapsed() < STATUS_MESSAGE_TIMEOUT {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                model.status_message(),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }
}

use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{self, Event, KeyCode};
use crate::domain::{DVError, Message};
use crate::model::Model;

pub struct Controller {}

impl Controller {
    pub fn new() -> Self {
        Self {}
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, DVError> {
        if event::poll(Duration::from_millis(model.event_poll_time()))? {
            let message = match event::read()? {
                Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                    if model.raw_keyevents() {
                        Some(Message::RawKey(key))
                    } else {
                        self.handle_key(key)
                    }
                }
                Event::Resize(width, height) => Some(Message::Resize(width, height)),
                _ => None,
            };
            return Ok(message);
        }
        Ok(None)
    }

    pub fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Right | KeyCode::PageDown | KeyCode::Char('l') => Some(Message::NextPage),
            KeyCode::Left | KeyCode::PageUp | KeyCode::Char('h') => Some(Message::PreviousPage),
            KeyCode::Char('g') | KeyCode::Home => Some(Message::FirstPage),
            KeyCode::Char('G') | KeyCode::End => Some(Message::LastPage),
            KeyCode::Up | KeyCode::Char('k') => Some(Message::MoveUp),
            KeyCode::Down | KeyCode::Char('j') => Some(Message::MoveDown),
            KeyCode::Enter => Some(Message::Enter),
            KeyCode::Esc => Some(Message::Exit),
            KeyCode::Char('/') => Some(Message::Search),
            KeyCode::Char('y') => Some(Message::CopyRow),
            KeyCode::Char('?') => Some(Message::Help),
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use ratatui::crossterm::event::{KeyEvent, KeyModifiers};

    use super::*;

    fn map(code: KeyCode) -> Option<Message> {
        Controller::new().handle_key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn maps_navigation_keys() {
        assert_eq!(map(KeyCode::Right), Some(Message::NextPage));
        assert_eq!(map(KeyCode::PageUp), Some(Message::PreviousPage));
        assert_eq!(map(KeyCode::Char('G')), Some(Message::LastPage));
        assert_eq!(map(KeyCode::Char('j')), Some(Message::MoveDown));
    }

    #[test]
    fn maps_commands() {
        assert_eq!(map(KeyCode::Char('/')), Some(Message::Search));
        assert_eq!(map(KeyCode::Char('q')), Some(Message::Quit));
        assert_eq!(map(KeyCode::Esc), Some(Message::Exit));
        assert_eq!(map(KeyCode::Char('z')), None);
    }
}

use std::time::Duration;
use tracing::trace;

use ratatui::crossterm::event::{
    self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;

use crate::domain::{FVConfig, FVError, Message};
use crate::model::Model;
use crate::row::Column;
use crate::ui::UILayout;

/// Maps terminal events to messages for the model.
pub struct Controller {
    event_poll_time: u64,
}

impl Controller {
    pub fn new(cfg: &FVConfig) -> Self {
        Self {
            event_poll_time: cfg.event_poll_time,
        }
    }

    pub fn handle_event(&self, model: &Model) -> Result<Option<Message>, FVError> {
        if !event::poll(Duration::from_millis(self.event_poll_time))? {
            return Ok(None);
        }
        let message = match event::read()? {
            Event::Key(key) if key.kind == event::KeyEventKind::Press => {
                self.route_key(key, model.raw_keyevents())
            }
            Event::Mouse(mouse) => model.layout().and_then(|l| self.handle_mouse(mouse, l)),
            Event::Resize(width, height) => Some(Message::Resize(width as usize, height as usize)),
            _ => None,
        };
        Ok(message)
    }

    /// While the search field has focus keys go to it raw, except Ctrl-C.
    fn route_key(&self, key: event::KeyEvent, raw: bool) -> Option<Message> {
        if raw && !is_interrupt(&key) {
            Some(Message::RawKey(key))
        } else {
            self.handle_key(key)
        }
    }

    fn handle_key(&self, key: event::KeyEvent) -> Option<Message> {
        let message = match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => Some(Message::Quit),
            (KeyCode::Char('q'), _) => Some(Message::Quit),
            (KeyCode::Char('?'), _) => Some(Message::Help),
            (KeyCode::Esc, _) => Some(Message::Exit),
            (KeyCode::Char('/'), _) => Some(Message::Search),
            (KeyCode::Enter, _) => Some(Message::Submit),
            (KeyCode::Char('j'), _) | (KeyCode::Down, _) => Some(Message::MoveDown),
            (KeyCode::Char('k'), _) | (KeyCode::Up, _) => Some(Message::MoveUp),
            (KeyCode::PageDown, _) => Some(Message::MovePageDown),
            (KeyCode::PageUp, _) => Some(Message::MovePageUp),
            (KeyCode::Char('g'), _) | (KeyCode::Home, _) => Some(Message::MoveBeginning),
            (KeyCode::Char('G'), _) | (KeyCode::End, _) => Some(Message::MoveEnd),
            (KeyCode::Char(c @ '1'..='5'), _) => {
                let idx = c as usize - '1' as usize;
                Some(Message::SortBy(Column::ALL[idx]))
            }
            _ => None,
        };
        trace!("Mapped: {key:?} => {message:?}");
        message
    }

    fn handle_mouse(&self, mouse: MouseEvent, layout: &UILayout) -> Option<Message> {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return None;
        }
        let message = hit_test(layout, Position::new(mouse.column, mouse.row));
        trace!("Mapped: {mouse:?} => {message:?}");
        message
    }
}

fn is_interrupt(key: &event::KeyEvent) -> bool {
    key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Message for a left click at `position`.
pub fn hit_test(layout: &UILayout, position: Position) -> Option<Message> {
    if let Some(column) = layout.header_at(position) {
        Some(Message::SortBy(column))
    } else if layout.button.contains(position) {
        Some(Message::Submit)
    } else if layout.search_field.contains(position) || layout.search_label.contains(position) {
        Some(Message::Search)
    } else {
        None
    }
}

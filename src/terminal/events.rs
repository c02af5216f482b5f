use crate::core::error::Result;
use crate::core::input::{InputEvent, Key};

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Editor events
#[derive(Debug, Clone, PartialEq)]
pub enum EditorEvent {
    Input(InputEvent),
    Resize(u16, u16),
    None,
}

#[derive(Debug, Default)]
pub struct EventHandler;

impl EventHandler {
    /// Create a new EventHandler
    pub fn new() -> Self {
        Self
    }

    /// Read the next event, blocking until one arrives
    pub fn read(&mut self) -> Result<EditorEvent> {
        Ok(match event::read()? {
            // Key releases are reported on Windows and under the kitty protocol
            Event::Key(key_event) if key_event.kind == KeyEventKind::Release => EditorEvent::None,
            Event::Key(key_event) => match crossterm_key_to_input(key_event) {
                Some(input) => EditorEvent::Input(input),
                None => EditorEvent::None,
            },
            Event::Resize(cols, rows) => EditorEvent::Resize(cols, rows),
            _ => EditorEvent::None,
        })
    }
}

/// Normalize a crossterm key event. Keys slate has no name for are dropped.
pub fn crossterm_key_to_input(key_event: KeyEvent) -> Option<InputEvent> {
    let code = key_event.code;
    let modifiers = key_event.modifiers;

    let alt = modifiers.contains(KeyModifiers::ALT);
    let ctrl = modifiers.contains(KeyModifiers::CONTROL);
    // A character already carries its shift state
    let shift = modifiers.contains(KeyModifiers::SHIFT) && !matches!(code, KeyCode::Char(_));

    let key = match code {
        KeyCode::Char(c) => {
            if ctrl && !alt {
                Key::Ctrl(c)
            } else if alt && !ctrl {
                Key::Alt(c)
            } else {
                Key::Char(c)
            }
        }
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Enter => Key::Enter,
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Up => Key::Up,
        KeyCode::Down => Key::Down,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,
        KeyCode::Tab | KeyCode::BackTab => Key::Tab,
        KeyCode::Delete => Key::Delete,
        KeyCode::F(n) => Key::F(n),
        KeyCode::Esc => Key::Esc,
        _ => return None,
    };

    Some(InputEvent {
        key,
        shift,
        alt,
        ctrl,
    })
}

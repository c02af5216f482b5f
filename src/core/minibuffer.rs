//! Single-line prompt editor used by search, write-file and replace.
//!
//! Editing keys mirror the main buffer: ^F/^B and arrows by character,
//! M-f/M-b by word, ^A/^E and Home/End to either end, ^D/Delete and
//! ^H/Backspace delete, M-d/M-Backspace kill a word, ^K kills to the end.

use crate::core::geometry::Position;
use crate::core::input::{InputEvent, Key};
use crate::core::line::Line;
use crate::core::motion::Motion;

/// What a key did to the prompt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptOutcome {
    /// Cursor moved or key ignored
    Continue,
    /// The text changed
    Changed,
    /// Enter
    Accept,
    /// ^G, ^Q or Esc
    Cancel,
}

#[derive(Debug, Clone)]
pub struct Minibuffer {
    prompt: String,
    line: Line,
    cursor: usize,
}

impl Minibuffer {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            line: Line::new(),
            cursor: 0,
        }
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn set_prompt(&mut self, prompt: impl Into<String>) {
        self.prompt = prompt.into();
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.line.as_bytes()
    }

    pub fn text(&self) -> String {
        self.line.to_string_lossy()
    }

    pub fn is_empty(&self) -> bool {
        self.line.is_empty()
    }

    /// Cursor column within the text (not counting the prompt)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn insert(&mut self, bytes: &[u8]) {
        self.line.insert(self.cursor, bytes);
        self.cursor += bytes.len();
    }

    fn target(&self, motion: Motion) -> usize {
        motion
            .target_in(
                std::slice::from_ref(&self.line),
                Position::new(0, self.cursor),
                None,
            )
            .col
    }

    fn apply(&mut self, motion: Motion) -> PromptOutcome {
        self.cursor = self.target(motion);
        PromptOutcome::Continue
    }

    fn delete_motion(&mut self, motion: Motion) -> PromptOutcome {
        let target = self.target(motion);
        let (start, end) = if target < self.cursor {
            (target, self.cursor)
        } else {
            (self.cursor, target)
        };
        if start == end {
            return PromptOutcome::Continue;
        }
        self.line.delete(start, end);
        self.cursor = start;
        PromptOutcome::Changed
    }

    /// Apply one key to the prompt
    pub fn handle_key(&mut self, event: &InputEvent) -> PromptOutcome {
        match &event.key {
            Key::Enter => PromptOutcome::Accept,
            Key::Esc | Key::Ctrl('g') | Key::Ctrl('q') => PromptOutcome::Cancel,

            Key::Right | Key::Ctrl('f') => self.apply(Motion::CharForward),
            Key::Left | Key::Ctrl('b') => self.apply(Motion::CharBackward),
            Key::Alt('f') => self.apply(Motion::WordForward),
            Key::Alt('b') => self.apply(Motion::WordBackward),
            Key::Home | Key::Ctrl('a') => self.apply(Motion::LineHead),
            Key::End | Key::Ctrl('e') => self.apply(Motion::LineTail),

            Key::Backspace if event.alt => self.delete_motion(Motion::WordBackward),
            Key::Delete | Key::Ctrl('d') => self.delete_motion(Motion::CharForward),
            Key::Backspace | Key::Ctrl('h') => self.delete_motion(Motion::CharBackward),
            Key::Alt('d') => self.delete_motion(Motion::WordForward),
            Key::Ctrl('k') => self.delete_motion(Motion::LineTail),

            Key::Tab => {
                self.insert(b"\t");
                PromptOutcome::Changed
            }
            Key::Char(c) if !event.ctrl && !event.alt => {
                let mut buf = [0u8; 4];
                self.insert(c.encode_utf8(&mut buf).as_bytes());
                PromptOutcome::Changed
            }
            _ => PromptOutcome::Continue,
        }
    }
}

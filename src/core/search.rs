//! Text search and replace.
//!
//! Matching is ASCII case-insensitive and never crosses a line end. A search
//! starts one byte past (or before) the origin and wraps around the document
//! once; the last position tried is the origin itself.

use crate::core::buffer::TextBuffer;
use crate::core::geometry::Position;
use crate::core::input::{InputEvent, Key};
use crate::core::minibuffer::{Minibuffer, PromptOutcome};

// =============================================================================
// LINE MATCHING
// =============================================================================

fn matches_at(line: &[u8], query: &[u8], col: usize) -> bool {
    line.len() >= col + query.len() && line[col..col + query.len()].eq_ignore_ascii_case(query)
}

/// First match starting at or after `from`
fn find_from(line: &[u8], query: &[u8], from: usize) -> Option<usize> {
    let last = line.len().checked_sub(query.len())?;
    (from..=last).find(|&col| matches_at(line, query, col))
}

/// Last match starting at or before `upto`
fn rfind_upto(line: &[u8], query: &[u8], upto: usize) -> Option<usize> {
    let last = line.len().checked_sub(query.len())?;
    (0..=last.min(upto)).rev().find(|&col| matches_at(line, query, col))
}

// =============================================================================
// SEARCH
// =============================================================================

/// Search from the buffer's cursor
pub fn search(buffer: &TextBuffer, query: &[u8], forward: bool) -> Option<Position> {
    search_from(buffer, query, buffer.cursor(), forward)
}

/// Search from an explicit origin, wrapping once around the document
pub fn search_from(
    buffer: &TextBuffer,
    query: &[u8],
    origin: Position,
    forward: bool,
) -> Option<Position> {
    if query.is_empty() {
        return None;
    }
    let lines = buffer.lines();
    let hit = |row: usize, col: Option<usize>| col.map(|col| Position::new(row, col));

    if forward {
        let rest = find_from(lines[origin.row].as_bytes(), query, origin.col + 1);
        if let Some(p) = hit(origin.row, rest) {
            return Some(p);
        }
        for row in (origin.row + 1..lines.len()).chain(0..origin.row) {
            if let Some(p) = hit(row, find_from(lines[row].as_bytes(), query, 0)) {
                return Some(p);
            }
        }
        let wrapped = find_from(lines[origin.row].as_bytes(), query, 0);
        hit(origin.row, wrapped.filter(|&col| col <= origin.col))
    } else {
        if origin.col > 0 {
            let before = rfind_upto(lines[origin.row].as_bytes(), query, origin.col - 1);
            if let Some(p) = hit(origin.row, before) {
                return Some(p);
            }
        }
        for row in (0..origin.row).rev().chain((origin.row + 1..lines.len()).rev()) {
            if let Some(p) = hit(row, rfind_upto(lines[row].as_bytes(), query, usize::MAX)) {
                return Some(p);
            }
        }
        let wrapped = rfind_upto(lines[origin.row].as_bytes(), query, usize::MAX);
        hit(origin.row, wrapped.filter(|&col| col >= origin.col))
    }
}

/// Replace every match of `query`, left to right and non-overlapping.
/// Returns the number of replacements.
pub fn replace_all(buffer: &mut TextBuffer, query: &[u8], replacement: &[u8]) -> usize {
    if query.is_empty() {
        return 0;
    }
    let mut count = 0;
    for row in 0..buffer.line_count() {
        let mut col = 0;
        loop {
            let found = buffer
                .line(row)
                .and_then(|line| find_from(line.as_bytes(), query, col));
            let Some(start) = found else {
                break;
            };
            buffer.replace_range(row, start, query.len(), replacement);
            col = start + replacement.len();
            count += 1;
        }
    }
    count
}

// =============================================================================
// INCREMENTAL SEARCH
// =============================================================================

/// How an incremental search key ended up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    Continue,
    /// Accepted; the cursor stays on the match
    Done,
    /// Cancelled; the cursor is back at the origin
    Cancelled,
}

/// Interactive search state: the query being typed, its direction and the
/// cursor position the search started from
#[derive(Debug, Clone)]
pub struct SearchSession {
    origin: Position,
    forward: bool,
    query: Minibuffer,
    failed: bool,
}

impl SearchSession {
    pub fn new(origin: Position, forward: bool) -> Self {
        let mut session = Self {
            origin,
            forward,
            query: Minibuffer::new(""),
            failed: false,
        };
        session.update_prompt();
        session
    }

    pub fn query(&self) -> &Minibuffer {
        &self.query
    }

    pub fn failed(&self) -> bool {
        self.failed
    }

    fn update_prompt(&mut self) {
        let direction = if self.forward { "Search" } else { "Reverse search" };
        let prompt = if self.failed {
            format!("Failing {}: ", direction.to_ascii_lowercase())
        } else {
            format!("{}: ", direction)
        };
        self.query.set_prompt(prompt);
    }

    fn run(&mut self, buffer: &mut TextBuffer, from: Position) {
        match search_from(buffer, self.query.as_bytes(), from, self.forward) {
            Some(found) => {
                buffer.set_cursor(found);
                self.failed = false;
            }
            None => self.failed = true,
        }
        self.update_prompt();
    }

    /// Feed one key. ^S/^R repeat from the current match; any edit of the
    /// query re-runs the search from the origin.
    pub fn handle_key(&mut self, buffer: &mut TextBuffer, event: &InputEvent) -> SearchOutcome {
        match event.key {
            Key::Ctrl('s') | Key::Ctrl('r') => {
                self.forward = event.key == Key::Ctrl('s');
                if !self.query.is_empty() {
                    let from = buffer.cursor();
                    self.run(buffer, from);
                } else {
                    self.update_prompt();
                }
                return SearchOutcome::Continue;
            }
            _ => {}
        }

        match self.query.handle_key(event) {
            PromptOutcome::Changed => {
                if self.query.is_empty() {
                    buffer.set_cursor(self.origin);
                    self.failed = false;
                    self.update_prompt();
                } else {
                    self.run(buffer, self.origin);
                }
                SearchOutcome::Continue
            }
            PromptOutcome::Continue => SearchOutcome::Continue,
            PromptOutcome::Accept => {
                if self.query.is_empty() {
                    buffer.set_cursor(self.origin);
                }
                SearchOutcome::Done
            }
            PromptOutcome::Cancel => {
                buffer.set_cursor(self.origin);
                SearchOutcome::Cancelled
            }
        }
    }
}

//! Cursor motions.
//!
//! A motion maps a position to a target position and never mutates
//! anything. The buffer uses the target to move the cursor (`apply`) or to
//! bound a deletion (`delete_motion`); the minibuffer runs the same motions
//! over its single line.

use crate::core::buffer::TextBuffer;
use crate::core::geometry::Position;
use crate::core::line::Line;
use crate::core::syntax::SyntaxDefinition;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    CharForward,
    CharBackward,
    WordForward,
    WordBackward,
    LineForward,
    LineBackward,
    ParagraphForward,
    ParagraphBackward,
    LineHead,
    LineTail,
    FileHead,
    FileTail,
}

impl Motion {
    /// Target of this motion from the buffer's cursor
    pub fn target(self, buffer: &TextBuffer, syntax: Option<&SyntaxDefinition>) -> Position {
        self.target_in(buffer.lines(), buffer.cursor(), syntax)
    }

    /// Target of this motion from `from` over an arbitrary run of lines.
    ///
    /// `lines` must be non-empty and `from` must lie inside it.
    pub fn target_in(
        self,
        lines: &[Line],
        from: Position,
        syntax: Option<&SyntaxDefinition>,
    ) -> Position {
        assert!(!lines.is_empty(), "motion over an empty document");
        assert!(
            from.row < lines.len() && from.col <= lines[from.row].len(),
            "motion origin {:?} outside document",
            from
        );
        let last_row = lines.len() - 1;

        match self {
            Motion::CharForward => step_forward(lines, from).unwrap_or(from),
            Motion::CharBackward => step_backward(lines, from).unwrap_or(from),
            Motion::WordForward => word_forward(lines, from, syntax),
            Motion::WordBackward => word_backward(lines, from, syntax),
            Motion::LineForward => {
                if from.row == last_row {
                    from
                } else {
                    let row = from.row + 1;
                    Position::new(row, from.col.min(lines[row].len()))
                }
            }
            Motion::LineBackward => {
                if from.row == 0 {
                    from
                } else {
                    let row = from.row - 1;
                    Position::new(row, from.col.min(lines[row].len()))
                }
            }
            Motion::ParagraphForward => {
                let mut row = from.row;
                while row < lines.len() && !lines[row].is_empty() {
                    row += 1;
                }
                while row < lines.len() && lines[row].is_empty() {
                    row += 1;
                }
                Position::new(row.min(last_row), 0)
            }
            Motion::ParagraphBackward => {
                if from.row == 0 {
                    return Position::ORIGIN;
                }
                let mut row = from.row - 1;
                while row > 0 && lines[row].is_empty() {
                    row -= 1;
                }
                while row > 0 && !lines[row - 1].is_empty() {
                    row -= 1;
                }
                Position::new(row, 0)
            }
            Motion::LineHead => Position::new(from.row, 0),
            Motion::LineTail => Position::new(from.row, lines[from.row].len()),
            Motion::FileHead => Position::ORIGIN,
            Motion::FileTail => Position::new(last_row, lines[last_row].len()),
        }
    }
}

// =============================================================================
// HELPERS
// =============================================================================

fn is_word(syntax: Option<&SyntaxDefinition>, byte: u8) -> bool {
    match syntax {
        Some(definition) => definition.is_identifier(byte),
        None => byte.is_ascii_alphanumeric() || byte == b'_',
    }
}

/// One byte forward; a line end steps to the start of the next line
fn step_forward(lines: &[Line], p: Position) -> Option<Position> {
    if p.col < lines[p.row].len() {
        Some(Position::new(p.row, p.col + 1))
    } else if p.row + 1 < lines.len() {
        Some(Position::new(p.row + 1, 0))
    } else {
        None
    }
}

/// One byte backward; a line start steps to the end of the previous line
fn step_backward(lines: &[Line], p: Position) -> Option<Position> {
    if p.col > 0 {
        Some(Position::new(p.row, p.col - 1))
    } else if p.row > 0 {
        Some(Position::new(p.row - 1, lines[p.row - 1].len()))
    } else {
        None
    }
}

fn word_forward(lines: &[Line], from: Position, syntax: Option<&SyntaxDefinition>) -> Position {
    let mut p = from;
    // Line ends count as separators
    loop {
        match lines[p.row].get(p.col) {
            Some(b) if is_word(syntax, b) => break,
            _ => match step_forward(lines, p) {
                Some(next) => p = next,
                None => return p,
            },
        }
    }
    while let Some(b) = lines[p.row].get(p.col) {
        if !is_word(syntax, b) {
            break;
        }
        p.col += 1;
    }
    p
}

fn word_backward(lines: &[Line], from: Position, syntax: Option<&SyntaxDefinition>) -> Position {
    let mut p = from;
    loop {
        let before = p.col.checked_sub(1).and_then(|c| lines[p.row].get(c));
        match before {
            Some(b) if is_word(syntax, b) => break,
            _ => match step_backward(lines, p) {
                Some(prev) => p = prev,
                None => return p,
            },
        }
    }
    let bytes = lines[p.row].as_bytes();
    while p.col > 0 && is_word(syntax, bytes[p.col - 1]) {
        p.col -= 1;
    }
    p
}

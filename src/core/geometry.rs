//! Document coordinates shared by the buffer, motions, search and viewport.

use std::fmt;

/// A byte position in the document.
///
/// Ordering is row-major: lower row first, then lower column. `row` is
/// declared first so the derived `Ord` gives exactly that.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 0, col: 0 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for Position {
    /// One-based `row:col`, as shown on the status line
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.row + 1, self.col + 1)
    }
}

/// Return `(a, b)` ordered so the first is not after the second
pub fn ordered(a: Position, b: Position) -> (Position, Position) {
    if a <= b { (a, b) } else { (b, a) }
}

use std::ops::Range;

use crate::core::geometry::Position;

/// The visible window onto the document.
///
/// `anchor` is the document position shown at the top-left of the text
/// area. The text area is the screen minus the gutter on the left and the
/// status line at the bottom.
#[derive(Debug, Clone)]
pub struct Viewport {
    pub anchor_x: usize,
    pub anchor_y: usize,
    /// Text area size in cells
    pub width: usize,
    pub height: usize,
    pub screen_cols: usize,
    /// Line number column plus one separator cell; 0 when disabled
    pub gutter: usize,
    line_numbers: bool,
}

impl Viewport {
    pub fn new(cols: usize, rows: usize, line_numbers: bool) -> Self {
        let mut viewport = Self {
            anchor_x: 0,
            anchor_y: 0,
            width: 1,
            height: 1,
            screen_cols: cols,
            gutter: 0,
            line_numbers,
        };
        viewport.resize(cols, rows);
        viewport
    }

    /// Adopt a new screen size, keeping one row for the status line
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.screen_cols = cols;
        self.height = rows.saturating_sub(1).max(1);
        self.width = cols.saturating_sub(self.gutter).max(1);
    }

    /// Recompute the gutter for `line_count` lines. Returns true when its
    /// width changed, in which case the caller should `fix` again.
    pub fn update_gutter(&mut self, line_count: usize) -> bool {
        let gutter = if self.line_numbers {
            digits(line_count) + 1
        } else {
            0
        };
        if gutter == self.gutter {
            return false;
        }
        self.gutter = gutter;
        self.width = self.screen_cols.saturating_sub(gutter).max(1);
        true
    }

    /// Scroll the minimum amount that brings `cursor` into view
    pub fn fix(&mut self, cursor: Position) {
        if cursor.row < self.anchor_y {
            self.anchor_y = cursor.row;
        } else if cursor.row >= self.anchor_y + self.height {
            self.anchor_y += cursor.row - (self.anchor_y + self.height) + 1;
        }

        if cursor.col < self.anchor_x {
            self.anchor_x = cursor.col;
        } else if cursor.col >= self.anchor_x + self.width {
            self.anchor_x += cursor.col - (self.anchor_x + self.width) + 1;
        }
    }

    /// Scroll by whole screens, keeping the anchor inside the document
    pub fn scroll_pages(&mut self, pages: isize, line_count: usize) {
        let step = self.height.saturating_sub(1).max(1);
        if pages >= 0 {
            let max_anchor = line_count.saturating_sub(1);
            self.anchor_y = (self.anchor_y + step * pages as usize).min(max_anchor);
        } else {
            self.anchor_y = self.anchor_y.saturating_sub(step * pages.unsigned_abs());
        }
    }

    /// Document rows currently on screen
    pub fn visible_rows(&self, line_count: usize) -> Range<usize> {
        let start = self.anchor_y.min(line_count);
        start..(self.anchor_y + self.height).min(line_count)
    }

    /// Screen cell of a document position, if it is on screen
    pub fn to_screen(&self, pos: Position) -> Option<(usize, usize)> {
        if pos.row < self.anchor_y
            || pos.row >= self.anchor_y + self.height
            || pos.col < self.anchor_x
            || pos.col >= self.anchor_x + self.width
        {
            return None;
        }
        Some((
            self.gutter + pos.col - self.anchor_x,
            pos.row - self.anchor_y,
        ))
    }
}

fn digits(mut n: usize) -> usize {
    let mut count = 1;
    while n >= 10 {
        n /= 10;
        count += 1;
    }
    count
}

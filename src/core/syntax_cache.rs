//! Page cache of tokenizer states.
//!
//! The document is cut into fixed-height pages. For each page the cache keeps
//! the nesting state in effect at its first row, so rendering any slice of
//! the document only needs to scan from the start of the enclosing page.
//! Entries are contiguous from page 0; everything present is valid.

use tracing::trace;

use crate::core::buffer::TextBuffer;
use crate::core::lexer::{NestingState, scan_line};
use crate::core::syntax::SyntaxDefinition;

/// Nesting state at the first row of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub first_row: usize,
    pub state: NestingState,
}

#[derive(Debug, Clone)]
pub struct SyntaxCache {
    pages: Vec<PageEntry>,
    page_height: usize,
}

impl SyntaxCache {
    pub fn new(page_height: usize) -> Self {
        assert!(page_height > 0, "syntax cache page height must be positive");
        Self {
            pages: vec![PageEntry {
                first_row: 0,
                state: NestingState::GROUND,
            }],
            page_height,
        }
    }

    pub fn page_height(&self) -> usize {
        self.page_height
    }

    /// Index of the last valid entry
    pub fn watermark(&self) -> usize {
        self.pages.len() - 1
    }

    pub fn page_of(&self, row: usize) -> usize {
        row / self.page_height
    }

    pub fn first_row(&self, page: usize) -> usize {
        page * self.page_height
    }

    /// Change the page height; every entry but the ground one is discarded
    pub fn set_page_height(&mut self, page_height: usize) {
        assert!(page_height > 0, "syntax cache page height must be positive");
        if page_height != self.page_height {
            trace!(page_height, "syntax cache page height changed");
            self.page_height = page_height;
        }
        self.pages.truncate(1);
    }

    /// Drop all entries, keeping only the ground state at row 0
    pub fn clear(&mut self) {
        self.pages.truncate(1);
    }

    /// Nesting state at the first row of `page`, scanning forward from the
    /// last valid entry if needed. Pages past the end of the document are
    /// clamped to the last page that starts inside it.
    pub fn ensure(
        &mut self,
        page: usize,
        buffer: &TextBuffer,
        definition: &SyntaxDefinition,
    ) -> NestingState {
        let last_page = self.page_of(buffer.line_count() - 1);
        let page = page.min(last_page);
        if page <= self.watermark() {
            return self.pages[page].state;
        }

        let from = self.watermark();
        let mut entry = self.pages[from];
        while self.watermark() < page {
            let next_first = self.first_row(self.pages.len());
            for line in &buffer.lines()[entry.first_row..next_first] {
                entry.state = scan_line(definition, line.as_bytes(), entry.state);
            }
            entry.first_row = next_first;
            self.pages.push(entry);
        }
        trace!(from, to = page, "syntax cache extended");
        self.pages[page].state
    }

    /// Nesting state at the start of `row`
    pub fn state_at_row(
        &mut self,
        row: usize,
        buffer: &TextBuffer,
        definition: &SyntaxDefinition,
    ) -> NestingState {
        assert!(
            row < buffer.line_count(),
            "row {} outside document of {} lines",
            row,
            buffer.line_count()
        );
        let page = self.page_of(row);
        let mut state = self.ensure(page, buffer, definition);
        for line in &buffer.lines()[self.first_row(page)..row] {
            state = scan_line(definition, line.as_bytes(), state);
        }
        state
    }

    /// Drop every entry whose page starts strictly after `row`
    pub fn invalidate_from_row(&mut self, row: usize) {
        let keep = self.pages.partition_point(|e| e.first_row <= row);
        if keep < self.pages.len() {
            trace!(row, dropped = self.pages.len() - keep, "syntax cache invalidated");
            self.pages.truncate(keep.max(1));
        }
    }

    /// Record the state freshly scanned to the end of `page`. If it disagrees
    /// with the cached start of `page + 1` (or that entry is missing), every
    /// entry after `page` is replaced by the fresh one.
    pub fn reconcile(&mut self, page: usize, end_state: NestingState, line_count: usize) {
        if page > self.watermark() {
            return;
        }
        let next_first = self.first_row(page + 1);
        if next_first >= line_count {
            return;
        }
        let fresh = PageEntry {
            first_row: next_first,
            state: end_state,
        };
        if self.pages.get(page + 1) != Some(&fresh) {
            trace!(page, "syntax cache reconciled");
            self.pages.truncate(page + 1);
            self.pages.push(fresh);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::Position;
    use crate::core::syntax::SyntaxDefinition;

    fn scratch(buffer: &TextBuffer, def: &SyntaxDefinition, row: usize) -> NestingState {
        buffer.lines()[..row]
            .iter()
            .fold(NestingState::GROUND, |s, l| scan_line(def, l.as_bytes(), s))
    }

    fn sample() -> TextBuffer {
        let text = (0..20)
            .map(|i| match i {
                3 => "a /* open".to_string(),
                9 => "close */ b".to_string(),
                14 => "s = \"unterminated".to_string(),
                _ => format!("line {}", i),
            })
            .collect::<Vec<_>>()
            .join("\n");
        TextBuffer::from_text(&text)
    }

    #[test]
    fn test_ensure_matches_scratch_scan() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(4);
        for page in 0..5 {
            let state = cache.ensure(page, &buffer, &def);
            assert_eq!(state, scratch(&buffer, &def, page * 4), "page {}", page);
        }
        assert_eq!(cache.watermark(), 4);
    }

    #[test]
    fn test_ensure_clamps_past_document() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(8);
        cache.ensure(100, &buffer, &def);
        assert_eq!(cache.watermark(), 2);
    }

    #[test]
    fn test_state_at_row_inside_comment() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(4);
        assert_eq!(cache.state_at_row(5, &buffer, &def).open_comment, Some(0));
        assert!(cache.state_at_row(10, &buffer, &def).is_ground());
    }

    #[test]
    fn test_invalidate_keeps_page_containing_row() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(4);
        cache.ensure(4, &buffer, &def);

        cache.invalidate_from_row(8);
        assert_eq!(cache.watermark(), 2);
        cache.invalidate_from_row(5);
        assert_eq!(cache.watermark(), 1);
        cache.invalidate_from_row(0);
        assert_eq!(cache.watermark(), 0);
    }

    #[test]
    fn test_edit_then_ensure_stays_correct() {
        let def = SyntaxDefinition::c();
        let mut buffer = sample();
        let mut cache = SyntaxCache::new(4);
        cache.ensure(4, &buffer, &def);

        // Close the comment early: everything after row 3 changes state
        buffer.set_cursor(Position::new(3, 9));
        buffer.insert_bytes(b" */");
        if let Some(row) = buffer.take_damage() {
            cache.invalidate_from_row(row);
        }
        for page in 0..5 {
            assert_eq!(cache.ensure(page, &buffer, &def), scratch(&buffer, &def, page * 4));
        }
    }

    #[test]
    fn test_reconcile_replaces_stale_tail() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(4);
        cache.ensure(4, &buffer, &def);

        let bogus = NestingState {
            open_comment: None,
            open_string: Some(1),
        };
        cache.reconcile(0, bogus, buffer.line_count());
        assert_eq!(cache.watermark(), 1);
        assert_eq!(cache.ensure(1, &buffer, &def), bogus);

        let good = scratch(&buffer, &def, 4);
        cache.reconcile(0, good, buffer.line_count());
        assert_eq!(cache.ensure(1, &buffer, &def), good);
        cache.reconcile(0, good, buffer.line_count());
        assert_eq!(cache.watermark(), 1);
    }

    #[test]
    fn test_set_page_height_resets() {
        let def = SyntaxDefinition::c();
        let buffer = sample();
        let mut cache = SyntaxCache::new(4);
        cache.ensure(3, &buffer, &def);
        cache.set_page_height(6);
        assert_eq!(cache.watermark(), 0);
        assert_eq!(cache.ensure(1, &buffer, &def), scratch(&buffer, &def, 6));
    }
}

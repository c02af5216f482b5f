use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::core::error::{EditorError, Result};
use crate::core::geometry::{Position, ordered};
use crate::core::line::Line;
use crate::core::motion::Motion;
use crate::core::syntax::SyntaxDefinition;

/// The mutable text model: a list of lines, one cursor and an optional
/// selection anchor.
///
/// There is always at least one line, and the cursor always lies inside the
/// document. Every mutation records the lowest row it touched so the syntax
/// cache can drop the pages that might have changed.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    lines: Vec<Line>,
    cursor: Position,
    selection_anchor: Option<Position>,
    modified: bool,
    path: Option<PathBuf>,
    /// Lowest row touched since the last `take_damage`
    damage: Option<usize>,
}

impl TextBuffer {
    /// Create an empty buffer with a single empty line
    pub fn new() -> Self {
        Self {
            lines: vec![Line::new()],
            cursor: Position::ORIGIN,
            selection_anchor: None,
            modified: false,
            path: None,
            damage: None,
        }
    }

    /// Create a buffer from text, splitting on `\n`
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.lines = split_lines(text.as_bytes());
        buffer
    }

    /// Open a file. A missing file yields an empty buffer bound to `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut buffer = match fs::read(path) {
            Ok(bytes) => {
                let mut buffer = Self::new();
                buffer.lines = split_lines(&bytes);
                debug!(path = %path.display(), lines = buffer.lines.len(), "opened file");
                buffer
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "new file");
                Self::new()
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to open file");
                return Err(EditorError::io(path, e));
            }
        };
        buffer.path = Some(path.to_path_buf());
        Ok(buffer)
    }

    // ==================== Accessors ====================

    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    pub fn line(&self, row: usize) -> Option<&Line> {
        self.lines.get(row)
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn cursor(&self) -> Position {
        self.cursor
    }

    /// Move the cursor, clamping it into the document
    pub fn set_cursor(&mut self, pos: Position) {
        self.cursor = self.clamp(pos);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Whole document joined with `\n` (no trailing newline)
    pub fn text(&self) -> String {
        let joined: Vec<u8> = self
            .lines
            .iter()
            .map(Line::as_bytes)
            .collect::<Vec<_>>()
            .join(&b'\n');
        String::from_utf8_lossy(&joined).into_owned()
    }

    /// Drain the damage watermark: the lowest row touched since the last call
    pub fn take_damage(&mut self) -> Option<usize> {
        self.damage.take()
    }

    fn touch(&mut self, row: usize) {
        self.modified = true;
        self.damage = Some(self.damage.map_or(row, |d| d.min(row)));
    }

    fn clamp(&self, pos: Position) -> Position {
        let row = pos.row.min(self.lines.len() - 1);
        Position::new(row, pos.col.min(self.lines[row].len()))
    }

    // ==================== Insertion ====================

    /// Insert one byte at the cursor; `\n` splits the line
    pub fn insert_char(&mut self, byte: u8) {
        if byte == b'\n' {
            self.insert_newline();
            return;
        }
        let Position { row, col } = self.cursor;
        self.lines[row].insert_byte(col, byte);
        self.cursor.col += 1;
        self.touch(row);
    }

    /// Insert bytes at the cursor, splitting lines on `\n`
    pub fn insert_bytes(&mut self, bytes: &[u8]) {
        for (i, chunk) in bytes.split(|&b| b == b'\n').enumerate() {
            if i > 0 {
                self.insert_newline();
            }
            if chunk.is_empty() {
                continue;
            }
            let Position { row, col } = self.cursor;
            self.lines[row].insert(col, chunk);
            self.cursor.col += chunk.len();
            self.touch(row);
        }
    }

    /// Split the current line at the cursor; the cursor moves to the start
    /// of the new line below
    pub fn insert_newline(&mut self) {
        let Position { row, col } = self.cursor;
        let suffix = self.lines[row].split_off(col);
        self.lines.insert(row + 1, suffix);
        self.cursor = Position::new(row + 1, 0);
        self.touch(row);
    }

    // ==================== Deletion ====================

    /// Delete the half-open region between two positions, in either order.
    /// Returns false (and changes nothing) when the region is empty.
    pub fn delete_between(&mut self, a: Position, b: Position) -> bool {
        let (head, tail) = ordered(self.clamp(a), self.clamp(b));
        if head == tail {
            return false;
        }

        if head.row == tail.row {
            self.lines[head.row].delete(head.col, tail.col);
        } else {
            let suffix = self.lines[tail.row].as_bytes()[tail.col..].to_vec();
            self.lines[head.row].truncate(head.col);
            self.lines[head.row].append(&suffix);
            self.lines.drain(head.row + 1..=tail.row);
        }

        self.cursor = head;
        if let Some(anchor) = self.selection_anchor {
            self.selection_anchor = Some(self.clamp(anchor));
        }
        self.touch(head.row);
        true
    }

    /// Delete from the cursor to the target of `motion`
    pub fn delete_motion(&mut self, motion: Motion, syntax: Option<&SyntaxDefinition>) -> bool {
        let target = motion.target(self, syntax);
        self.delete_between(self.cursor, target)
    }

    /// Delete the selected region and clear the selection
    pub fn delete_selection(&mut self) -> bool {
        match self.selection() {
            Some((start, end)) => {
                self.selection_anchor = None;
                self.delete_between(start, end)
            }
            None => false,
        }
    }

    /// Replace `len` bytes at `(row, col)` with `bytes`. The replacement must
    /// not contain a newline.
    pub fn replace_range(&mut self, row: usize, col: usize, len: usize, bytes: &[u8]) {
        assert!(
            !bytes.contains(&b'\n'),
            "replace_range replacement contains a newline"
        );
        let line = &mut self.lines[row];
        line.delete(col, col + len);
        line.insert(col, bytes);
        self.cursor = self.clamp(self.cursor);
        self.touch(row);
    }

    // ==================== Selection ====================

    /// Set the anchor at the cursor, or drop it if one is already set
    pub fn toggle_selection(&mut self) {
        self.selection_anchor = match self.selection_anchor {
            Some(_) => None,
            None => Some(self.cursor),
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection_anchor = None;
    }

    pub fn has_selection(&self) -> bool {
        self.selection_anchor.is_some()
    }

    /// Normalized `(start, end)` of the selection, half-open
    pub fn selection(&self) -> Option<(Position, Position)> {
        self.selection_anchor
            .map(|anchor| ordered(self.clamp(anchor), self.cursor))
    }

    // ==================== Motion ====================

    /// Move the cursor to the target of `motion`
    pub fn apply(&mut self, motion: Motion, syntax: Option<&SyntaxDefinition>) {
        self.cursor = motion.target(self, syntax);
    }

    // ==================== File I/O ====================

    /// Write every line followed by `\n` through an atomic rename
    pub fn save(&mut self) -> Result<()> {
        let path = self.path.clone().ok_or(EditorError::NoPath)?;
        let parent = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        let mut temp_file =
            NamedTempFile::new_in(parent).map_err(|e| EditorError::io(parent, e))?;
        let write = |file: &mut NamedTempFile| -> io::Result<()> {
            for line in &self.lines {
                file.write_all(line.as_bytes())?;
                file.write_all(b"\n")?;
            }
            file.flush()?;
            file.as_file().sync_all()
        };
        write(&mut temp_file).map_err(|e| EditorError::io(&path, e))?;
        // The temp file is created owner-only; keep the mode of the file it replaces
        if let Ok(meta) = fs::metadata(&path) {
            temp_file
                .as_file()
                .set_permissions(meta.permissions())
                .map_err(|e| EditorError::io(&path, e))?;
        }
        temp_file
            .persist(&path)
            .map_err(|e| EditorError::io(&path, e.error))?;

        self.modified = false;
        debug!(path = %path.display(), lines = self.lines.len(), "saved file");
        Ok(())
    }

    /// Bind the buffer to `path` and save it there
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> Result<()> {
        self.path = Some(path.as_ref().to_path_buf());
        self.save()
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Split file contents into lines. An empty input is one empty line and a
/// trailing newline does not start an extra line.
fn split_lines(bytes: &[u8]) -> Vec<Line> {
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    body.split(|&b| b == b'\n').map(Line::from_bytes).collect()
}

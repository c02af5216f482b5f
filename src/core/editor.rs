//! The editor controller.
//!
//! `Editor` owns one buffer together with everything derived from it: the
//! active syntax definition, the page cache of tokenizer states and the
//! viewport. Every entry point that mutates the buffer finishes with
//! `sync`, which drains the buffer's damage into the cache and scrolls the
//! cursor back into view, so the three never drift apart.

use std::mem;
use std::path::PathBuf;

use tracing::{debug, warn};

use crate::core::buffer::TextBuffer;
use crate::core::command::Command;
use crate::core::dispatcher::{DispatchResult, dispatch};
use crate::core::geometry::Position;
use crate::core::input::InputEvent;
use crate::core::lexer::{LineTokens, Token, scan_line};
use crate::core::minibuffer::{Minibuffer, PromptOutcome};
use crate::core::motion::Motion;
use crate::core::search::{SearchOutcome, SearchSession, replace_all};
use crate::core::syntax::{LanguageRegistry, SyntaxDefinition};
use crate::core::syntax_cache::SyntaxCache;
use crate::core::viewport::Viewport;

// =============================================================================
// OPTIONS & MODES
// =============================================================================

/// Startup options resolved from configuration and the command line
#[derive(Debug, Clone)]
pub struct EditorOptions {
    pub line_numbers: bool,
    /// Force a language instead of picking one from the file extension
    pub syntax: Option<String>,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            line_numbers: true,
            syntax: None,
        }
    }
}

/// What a minibuffer prompt will do with its answer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptKind {
    WriteFile,
    ReplaceQuery,
    ReplaceWith(Vec<u8>),
}

#[derive(Debug, Clone)]
pub enum Mode {
    Normal,
    Search(SearchSession),
    Prompt(PromptKind, Minibuffer),
}

// =============================================================================
// FRAME
// =============================================================================

/// A classified run of visible bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset into `FrameRow::text`
    pub start: usize,
    pub token: Token,
    pub selected: bool,
}

/// One visible document row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameRow {
    /// Line number column, already padded; empty when numbers are off
    pub gutter: String,
    /// The horizontally visible bytes of the line
    pub text: Vec<u8>,
    pub spans: Vec<Span>,
}

/// Everything a renderer needs to draw one screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub rows: Vec<FrameRow>,
    pub status: String,
    /// Screen cell `(col, row)` for the terminal cursor
    pub cursor: (usize, usize),
}

// =============================================================================
// EDITOR
// =============================================================================

pub struct Editor {
    pub(crate) buffer: TextBuffer,
    pub(crate) syntax: SyntaxDefinition,
    pub(crate) cache: SyntaxCache,
    pub(crate) viewport: Viewport,
    pub(crate) mode: Mode,
    pub(crate) message: Option<String>,
    /// Exit was requested once with unsaved changes
    pub(crate) exit_armed: bool,
    registry: LanguageRegistry,
}

impl Editor {
    pub fn new(
        buffer: TextBuffer,
        registry: LanguageRegistry,
        options: &EditorOptions,
        cols: usize,
        rows: usize,
    ) -> Self {
        let mut message = None;
        let forced = match options.syntax.as_deref() {
            Some(name) => {
                let found = registry.by_name(name);
                if found.is_none() {
                    warn!(syntax = name, "unknown syntax");
                    message = Some(format!("Unknown syntax: {}", name));
                }
                found
            }
            None => None,
        };
        let syntax = match forced {
            Some(definition) => definition.clone(),
            None => match buffer.path() {
                Some(path) => registry.for_path(path).clone(),
                None => registry.plain().clone(),
            },
        };
        debug!(syntax = %syntax.name, "editor created");

        let viewport = Viewport::new(cols, rows, options.line_numbers);
        let mut editor = Self {
            cache: SyntaxCache::new(viewport.height),
            buffer,
            syntax,
            viewport,
            mode: Mode::Normal,
            message,
            exit_armed: false,
            registry,
        };
        editor.sync();
        editor
    }

    // ==================== Accessors ====================

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn syntax(&self) -> &SyntaxDefinition {
        &self.syntax
    }

    pub fn cache(&self) -> &SyntaxCache {
        &self.cache
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Show `message` on the status line until the next command
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
    }

    pub fn is_prompting(&self) -> bool {
        !matches!(self.mode, Mode::Normal)
    }

    // ==================== Setup ====================

    /// Switch language by name. The page cache is rebuilt from scratch.
    pub fn set_syntax(&mut self, name: &str) -> bool {
        match self.registry.by_name(name) {
            Some(definition) => {
                self.syntax = definition.clone();
                self.cache.clear();
                debug!(syntax = name, "syntax switched");
                true
            }
            None => false,
        }
    }

    /// Adopt a new screen size. Pages follow the text area height.
    pub fn resize(&mut self, cols: usize, rows: usize) {
        self.viewport.resize(cols, rows);
        self.cache.set_page_height(self.viewport.height);
        self.sync();
    }

    /// Bring derived state up to date after the buffer changed
    fn sync(&mut self) {
        if let Some(row) = self.buffer.take_damage() {
            self.cache.invalidate_from_row(row);
        }
        self.viewport.update_gutter(self.buffer.line_count());
        self.viewport.fix(self.buffer.cursor());
    }

    // ==================== Commands ====================

    /// Run a bound command
    pub fn execute(&mut self, command: Command) -> DispatchResult {
        self.run(Some(command), None)
    }

    /// Insert a typed character at the cursor
    pub fn insert(&mut self, c: char) -> DispatchResult {
        self.run(None, Some(c))
    }

    fn run(&mut self, command: Option<Command>, insert_char: Option<char>) -> DispatchResult {
        self.message = None;
        if command != Some(Command::Exit) {
            self.exit_armed = false;
        }
        let result = dispatch(self, command, insert_char);
        if let DispatchResult::Info(message) = &result {
            self.message = Some(message.clone());
        }
        self.sync();
        result
    }

    pub(crate) fn insert_text(&mut self, c: char) {
        let mut buf = [0u8; 4];
        self.buffer.insert_bytes(c.encode_utf8(&mut buf).as_bytes());
    }

    pub(crate) fn move_cursor(&mut self, motion: Motion) {
        self.buffer.apply(motion, Some(&self.syntax));
    }

    /// Delete by motion, or the selection when one is active
    pub(crate) fn delete(&mut self, motion: Motion) {
        if self.buffer.has_selection() {
            self.buffer.delete_selection();
            return;
        }
        let cursor = self.buffer.cursor();
        let motion = match motion {
            // Killing at a line end joins the next line
            Motion::LineTail if cursor == Motion::LineTail.target(&self.buffer, None) => {
                Motion::CharForward
            }
            other => other,
        };
        self.buffer.delete_motion(motion, Some(&self.syntax));
    }

    pub(crate) fn page(&mut self, pages: isize) {
        let line_count = self.buffer.line_count();
        self.viewport.scroll_pages(pages, line_count);
        let col = self.buffer.cursor().col;
        self.buffer
            .set_cursor(Position::new(self.viewport.anchor_y, col));
    }

    pub(crate) fn save(&mut self) -> DispatchResult {
        if self.buffer.path().is_none() {
            return self.open_prompt(PromptKind::WriteFile);
        }
        self.write_result()
    }

    fn write_result(&mut self) -> DispatchResult {
        match self.buffer.save() {
            Ok(()) => {
                let name = self.display_name();
                DispatchResult::Info(format!("Wrote {}", name))
            }
            Err(e) => {
                warn!(error = %e, "save failed");
                DispatchResult::Info(format!("Error: {}", e))
            }
        }
    }

    pub(crate) fn request_exit(&mut self) -> DispatchResult {
        if self.buffer.is_modified() && !self.exit_armed {
            self.exit_armed = true;
            return DispatchResult::Info(
                "Buffer modified; exit again to discard changes".to_string(),
            );
        }
        DispatchResult::Exit
    }

    // ==================== Prompts ====================

    pub(crate) fn start_search(&mut self, forward: bool) -> DispatchResult {
        self.mode = Mode::Search(SearchSession::new(self.buffer.cursor(), forward));
        DispatchResult::NeedsInput
    }

    pub(crate) fn open_prompt(&mut self, kind: PromptKind) -> DispatchResult {
        let mut minibuffer = match &kind {
            PromptKind::WriteFile => Minibuffer::new("Write file: "),
            PromptKind::ReplaceQuery => Minibuffer::new("Replace: "),
            PromptKind::ReplaceWith(query) => Minibuffer::new(format!(
                "Replace {} with: ",
                String::from_utf8_lossy(query)
            )),
        };
        if kind == PromptKind::WriteFile {
            if let Some(path) = self.buffer.path() {
                minibuffer.insert(path.to_string_lossy().as_bytes());
            }
        }
        self.mode = Mode::Prompt(kind, minibuffer);
        DispatchResult::NeedsInput
    }

    /// Feed a key to the active prompt or search
    pub fn handle_prompt_key(&mut self, event: &InputEvent) -> DispatchResult {
        let result = match mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => DispatchResult::Success,
            Mode::Search(mut session) => match session.handle_key(&mut self.buffer, event) {
                SearchOutcome::Continue => {
                    self.mode = Mode::Search(session);
                    DispatchResult::Success
                }
                SearchOutcome::Done => DispatchResult::Success,
                SearchOutcome::Cancelled => DispatchResult::Info("Quit".to_string()),
            },
            Mode::Prompt(kind, mut minibuffer) => match minibuffer.handle_key(event) {
                PromptOutcome::Accept => self.finish_prompt(kind, minibuffer),
                PromptOutcome::Cancel => DispatchResult::Info("Quit".to_string()),
                PromptOutcome::Continue | PromptOutcome::Changed => {
                    self.mode = Mode::Prompt(kind, minibuffer);
                    DispatchResult::Success
                }
            },
        };
        self.message = match &result {
            DispatchResult::Info(message) => Some(message.clone()),
            _ => None,
        };
        self.sync();
        result
    }

    fn finish_prompt(&mut self, kind: PromptKind, answer: Minibuffer) -> DispatchResult {
        match kind {
            PromptKind::WriteFile => {
                if answer.is_empty() {
                    return DispatchResult::Info("Quit".to_string());
                }
                let path = PathBuf::from(answer.text());
                self.buffer.set_path(&path);
                if self.syntax.name == self.registry.plain().name {
                    self.syntax = self.registry.for_path(&path).clone();
                    self.cache.clear();
                }
                self.write_result()
            }
            PromptKind::ReplaceQuery => {
                if answer.is_empty() {
                    return DispatchResult::Info("Quit".to_string());
                }
                self.open_prompt(PromptKind::ReplaceWith(answer.as_bytes().to_vec()))
            }
            PromptKind::ReplaceWith(query) => {
                let count = replace_all(&mut self.buffer, &query, answer.as_bytes());
                debug!(count, "replace all");
                DispatchResult::Info(format!("Replaced {} occurrences", count))
            }
        }
    }

    // ==================== Display ====================

    fn display_name(&self) -> String {
        match self.buffer.path() {
            Some(path) => path.display().to_string(),
            None => "*scratch*".to_string(),
        }
    }

    /// The status line shown in normal mode
    pub fn status_line(&self) -> String {
        let mut status = format!("{}:{}", self.display_name(), self.buffer.cursor());
        if self.buffer.is_modified() {
            status.push_str(" [+]");
        }
        status.push_str(&format!(" ({})", self.syntax.name));
        if let Some(message) = &self.message {
            status.push_str("  ");
            status.push_str(message);
        }
        status
    }

    /// Produce the next frame.
    ///
    /// Rows are tokenized from the cached state of the first visible row.
    /// Scanning continues to the end of the last visible page, and every
    /// page boundary crossed on the way is reconciled with the cache.
    pub fn frame(&mut self) -> Frame {
        let line_count = self.buffer.line_count();
        let visible = self.viewport.visible_rows(line_count);
        let page_height = self.cache.page_height();
        let x0 = self.viewport.anchor_x;
        let x1 = x0 + self.viewport.width;
        let selection = self.buffer.selection();

        let scan_end = if visible.is_empty() {
            visible.end
        } else {
            let last_page = (visible.end - 1) / page_height;
            ((last_page + 1) * page_height).min(line_count)
        };

        let mut rows = Vec::with_capacity(visible.len());
        let mut state = if visible.is_empty() {
            Default::default()
        } else {
            self.cache
                .state_at_row(visible.start, &self.buffer, &self.syntax)
        };

        for row in visible.start..scan_end {
            let line = self.buffer.lines()[row].as_bytes();
            if row < visible.end {
                let (sel_start, sel_end) = selected_columns(selection, row);
                let mut tokens = LineTokens::new(&self.syntax, line, state);
                let mut spans = Vec::new();
                for (start, token) in tokens.by_ref() {
                    clip_token(
                        start,
                        token,
                        (x0, x1),
                        (sel_start, sel_end),
                        &mut spans,
                    );
                }
                state = tokens.state();

                let gutter = if self.viewport.gutter > 0 {
                    format!("{:>w$} ", row + 1, w = self.viewport.gutter - 1)
                } else {
                    String::new()
                };
                let text = line[x0.min(line.len())..x1.min(line.len())].to_vec();
                rows.push(FrameRow {
                    gutter,
                    text,
                    spans,
                });
            } else {
                state = scan_line(&self.syntax, line, state);
            }

            if (row + 1) % page_height == 0 {
                self.cache.reconcile(row / page_height, state, line_count);
            }
        }

        let (status, cursor) = match &self.mode {
            Mode::Normal => {
                let cursor = self
                    .viewport
                    .to_screen(self.buffer.cursor())
                    .unwrap_or((self.viewport.gutter, 0));
                (self.status_line(), cursor)
            }
            Mode::Search(session) => prompt_status(session.query(), self.viewport.height),
            Mode::Prompt(_, minibuffer) => prompt_status(minibuffer, self.viewport.height),
        };

        Frame {
            rows,
            status,
            cursor,
        }
    }
}

fn prompt_status(minibuffer: &Minibuffer, status_row: usize) -> (String, (usize, usize)) {
    let status = format!("{}{}", minibuffer.prompt(), minibuffer.text());
    let col = minibuffer.prompt().len() + minibuffer.cursor();
    (status, (col, status_row))
}

/// Selected column range `[start, end)` of `row`, or an empty range
fn selected_columns(selection: Option<(Position, Position)>, row: usize) -> (usize, usize) {
    match selection {
        Some((start, end)) if start.row <= row && row <= end.row => {
            let from = if row == start.row { start.col } else { 0 };
            let to = if row == end.row { end.col } else { usize::MAX };
            (from, to)
        }
        _ => (0, 0),
    }
}

/// Clip a token to the visible columns and split it where the selection
/// starts or ends
fn clip_token(
    start: usize,
    token: Token,
    (x0, x1): (usize, usize),
    (sel_start, sel_end): (usize, usize),
    spans: &mut Vec<Span>,
) {
    let end = start + token.len;
    let mut cuts = vec![start, end];
    for cut in [sel_start, sel_end, x0, x1] {
        if start < cut && cut < end {
            cuts.push(cut);
        }
    }
    cuts.sort_unstable();
    cuts.dedup();

    for pair in cuts.windows(2) {
        let (from, to) = (pair[0], pair[1]);
        if to <= x0 || from >= x1 {
            continue;
        }
        spans.push(Span {
            start: from - x0,
            token: Token::new(token.class, to - from),
            selected: sel_start <= from && to <= sel_end && sel_start < sel_end,
        });
    }
}

//! Syntax Tokenizer
//!
//! A pull tokenizer over a single line of bytes. Multi-line constructs
//! (strings and block comments) are carried between lines in a
//! `NestingState`, which is what the page cache stores.
//!
//! Key design principles:
//! - **Pure:** `get_token` depends only on the line, the offset, the
//!   definition and the incoming state, so cached states stay valid
//! - **One line at a time:** tokens never cross a line end; an unclosed pair
//!   is clamped to the rest of the line and left open in the state
//! - **Byte offsets:** lengths are byte counts, no allocation per token

use crate::core::syntax::{PairKind, SyntaxDefinition};

// =============================================================================
// TOKEN TYPES
// =============================================================================

/// Token class for syntax highlighting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenClass {
    Normal,
    Keyword,
    Type,
    Macro,
    String,
    BlockComment,
    LineComment,
}

/// A classified run of bytes within one line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub class: TokenClass,
    /// Byte length, always at least 1
    pub len: usize,
}

impl Token {
    pub fn new(class: TokenClass, len: usize) -> Self {
        debug_assert!(len > 0, "zero-length token");
        Self { class, len }
    }
}

// =============================================================================
// NESTING STATE (carried across line boundaries)
// =============================================================================

/// Which delimiter pair, if any, is still open at a line boundary.
/// Slots hold indices into `SyntaxDefinition::pairs`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct NestingState {
    pub open_comment: Option<usize>,
    pub open_string: Option<usize>,
}

impl NestingState {
    pub const GROUND: NestingState = NestingState {
        open_comment: None,
        open_string: None,
    };

    pub fn is_ground(&self) -> bool {
        self.open_comment.is_none() && self.open_string.is_none()
    }

    /// The open pair to continue, comment slot first
    pub fn open_pair(&self) -> Option<usize> {
        self.open_comment.or(self.open_string)
    }

    fn open(&mut self, kind: PairKind, index: usize) {
        match kind {
            PairKind::BlockComment => self.open_comment = Some(index),
            PairKind::String => self.open_string = Some(index),
        }
    }

    fn close(&mut self, kind: PairKind) {
        match kind {
            PairKind::BlockComment => self.open_comment = None,
            PairKind::String => self.open_string = None,
        }
    }
}

// =============================================================================
// PAIR MATCHING
// =============================================================================

/// Find `close` in `line` starting at `from`, honoring backslash escapes.
/// Returns the offset just past the closer.
pub fn find_closer(line: &[u8], from: usize, close: &[u8]) -> Option<usize> {
    let mut i = from;
    while i < line.len() {
        if line[i] == b'\\' {
            i += 2;
            continue;
        }
        if line[i..].starts_with(close) {
            return Some(i + close.len());
        }
        i += 1;
    }
    None
}

/// Does a pair opener or the line-comment marker start at `offset`?
fn starts_marker(definition: &SyntaxDefinition, line: &[u8], offset: usize) -> bool {
    let rest = &line[offset..];
    definition.pairs.iter().any(|p| rest.starts_with(&p.open))
        || definition
            .line_comment
            .as_deref()
            .is_some_and(|marker| !marker.is_empty() && rest.starts_with(marker))
}

// =============================================================================
// TOKENIZER
// =============================================================================

/// Classify the token starting at `offset`, updating `state` in place.
///
/// `offset` must be inside the line. Tokens never extend past the end of the
/// line; a pair left unclosed at the end of the line stays open in `state`.
pub fn get_token(
    definition: &SyntaxDefinition,
    line: &[u8],
    offset: usize,
    state: &mut NestingState,
) -> Token {
    assert!(
        offset < line.len(),
        "token offset {} outside line of length {}",
        offset,
        line.len()
    );
    let rest = line.len() - offset;

    // Continue a pair opened on an earlier line
    if let Some(index) = state.open_pair() {
        let Some(pair) = definition.pair(index) else {
            panic!(
                "nesting state refers to pair {} missing from syntax '{}'",
                index, definition.name
            );
        };
        let class = pair.kind.token_class();
        return match find_closer(line, offset, &pair.close) {
            Some(end) => {
                state.close(pair.kind);
                Token::new(class, end - offset)
            }
            None => Token::new(class, rest),
        };
    }

    // Pair openers, in declared order
    for (index, pair) in definition.pairs.iter().enumerate() {
        if line[offset..].starts_with(&pair.open) {
            let class = pair.kind.token_class();
            return match find_closer(line, offset + pair.open.len(), &pair.close) {
                Some(end) => Token::new(class, end - offset),
                None => {
                    state.open(pair.kind, index);
                    Token::new(class, rest)
                }
            };
        }
    }

    // Line comment runs to the end of the line and never carries over
    if let Some(marker) = definition.line_comment.as_deref() {
        if !marker.is_empty() && line[offset..].starts_with(marker) {
            return Token::new(TokenClass::LineComment, rest);
        }
    }

    // Identifier / keyword
    if definition.is_identifier(line[offset]) {
        let end = line[offset..]
            .iter()
            .position(|&b| !definition.is_identifier(b))
            .map_or(line.len(), |n| offset + n);
        let class = definition.classify(&line[offset..end]);
        return Token::new(class, end - offset);
    }

    // Separator run
    let mut end = offset + 1;
    while end < line.len()
        && !definition.is_identifier(line[end])
        && !starts_marker(definition, line, end)
    {
        end += 1;
    }
    Token::new(TokenClass::Normal, end - offset)
}

/// Tokenize a whole line and return the state at its end
pub fn scan_line(
    definition: &SyntaxDefinition,
    line: &[u8],
    state: NestingState,
) -> NestingState {
    let mut tokens = LineTokens::new(definition, line, state);
    tokens.by_ref().for_each(drop);
    tokens.state()
}

// =============================================================================
// LINE ITERATOR
// =============================================================================

/// Iterator over the tokens of one line, yielding `(start, token)`
pub struct LineTokens<'a> {
    definition: &'a SyntaxDefinition,
    line: &'a [u8],
    pos: usize,
    state: NestingState,
}

impl<'a> LineTokens<'a> {
    /// Start tokenizing `line` with the state carried in from the previous line
    pub fn new(definition: &'a SyntaxDefinition, line: &'a [u8], state: NestingState) -> Self {
        Self {
            definition,
            line,
            pos: 0,
            state,
        }
    }

    /// Current nesting state (the outgoing state once the iterator is drained)
    pub fn state(&self) -> NestingState {
        self.state
    }
}

impl Iterator for LineTokens<'_> {
    type Item = (usize, Token);

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.line.len() {
            return None;
        }
        let start = self.pos;
        let token = get_token(self.definition, self.line, start, &mut self.state);
        self.pos += token.len;
        Some((start, token))
    }
}

// =============================================================================
// TESTS
// =============================================================================

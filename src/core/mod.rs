//! The headless editing engine of slate.
//!
//! Owns the text model, motions, the incremental syntax tokenizer and its
//! page cache, viewport scrolling, search, and the `Editor` controller that
//! ties them together. Nothing here touches the terminal.

pub mod buffer;
pub mod command;
pub mod dispatcher;
pub mod editor;
pub mod error;
pub mod geometry;
pub mod input;
pub mod lexer;
pub mod line;
pub mod minibuffer;
pub mod motion;
pub mod search;
pub mod syntax;
pub mod syntax_cache;
pub mod viewport;

//! Editor commands.
//!
//! Every key binding names one of these. The set is closed, so dispatch is a
//! single `match` in `dispatcher::dispatch`.

use std::fmt;
use std::str::FromStr;

use crate::core::error::EditorError;
use crate::core::motion::Motion;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Move the cursor by a motion
    Move(Motion),
    /// Delete from the cursor to a motion's target (or the selection, if any)
    Delete(Motion),
    InsertNewline,
    InsertTab,
    SetMark,
    KillRegion,
    SearchForward,
    SearchBackward,
    ReplaceAll,
    SaveBuffer,
    WriteFile,
    PageDown,
    PageUp,
    Redraw,
    Exit,
}

/// Binding name for every command
const NAMES: &[(&str, Command)] = &[
    ("forward-character", Command::Move(Motion::CharForward)),
    ("backward-character", Command::Move(Motion::CharBackward)),
    ("forward-word", Command::Move(Motion::WordForward)),
    ("backward-word", Command::Move(Motion::WordBackward)),
    ("next-line", Command::Move(Motion::LineForward)),
    ("previous-line", Command::Move(Motion::LineBackward)),
    ("forward-paragraph", Command::Move(Motion::ParagraphForward)),
    ("backward-paragraph", Command::Move(Motion::ParagraphBackward)),
    ("beginning-of-line", Command::Move(Motion::LineHead)),
    ("end-of-line", Command::Move(Motion::LineTail)),
    ("beginning-of-file", Command::Move(Motion::FileHead)),
    ("end-of-file", Command::Move(Motion::FileTail)),
    ("delete-next-character", Command::Delete(Motion::CharForward)),
    ("delete-previous-character", Command::Delete(Motion::CharBackward)),
    ("kill-word", Command::Delete(Motion::WordForward)),
    ("backward-kill-word", Command::Delete(Motion::WordBackward)),
    ("kill-line", Command::Delete(Motion::LineTail)),
    ("insert-newline", Command::InsertNewline),
    ("insert-tab", Command::InsertTab),
    ("set-mark", Command::SetMark),
    ("kill-region", Command::KillRegion),
    ("search-forward", Command::SearchForward),
    ("search-backward", Command::SearchBackward),
    ("replace-all", Command::ReplaceAll),
    ("save-buffer", Command::SaveBuffer),
    ("write-file", Command::WriteFile),
    ("page-down", Command::PageDown),
    ("page-up", Command::PageUp),
    ("redraw-display", Command::Redraw),
    ("exit", Command::Exit),
];

impl Command {
    pub fn name(&self) -> &'static str {
        NAMES
            .iter()
            .find(|(_, command)| command == self)
            .map_or("unnamed-command", |(name, _)| name)
    }

    /// All binding names, in declaration order
    pub fn names() -> impl Iterator<Item = &'static str> {
        NAMES.iter().map(|(name, _)| *name)
    }
}

impl FromStr for Command {
    type Err = EditorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NAMES
            .iter()
            .find(|(name, _)| *name == s)
            .map(|(_, command)| *command)
            .ok_or_else(|| EditorError::UnknownCommand(s.to_string()))
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

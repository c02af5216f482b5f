//! Terminal colors and the token palette
//!
//! Colors are the sixteen ANSI colors plus the terminal default, written as
//! SGR parameters.

use crate::core::lexer::TokenClass;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Reset,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Position in the ANSI palette, or `None` for the terminal default
    fn palette_index(self) -> Option<u8> {
        let index = match self {
            Color::Reset => return None,
            Color::Black => 0,
            Color::Red => 1,
            Color::Green => 2,
            Color::Yellow => 3,
            Color::Blue => 4,
            Color::Magenta => 5,
            Color::Cyan => 6,
            Color::White => 7,
            Color::BrightBlack => 8,
            Color::BrightRed => 9,
            Color::BrightGreen => 10,
            Color::BrightYellow => 11,
            Color::BrightBlue => 12,
            Color::BrightMagenta => 13,
            Color::BrightCyan => 14,
            Color::BrightWhite => 15,
        };
        Some(index)
    }

    /// SGR parameter selecting this color as foreground
    pub fn to_ansi_fg_code(self) -> u8 {
        match self.palette_index() {
            None => 39,
            Some(i) if i < 8 => 30 + i,
            Some(i) => 90 + (i - 8),
        }
    }

    /// SGR parameter selecting this color as background
    pub fn to_ansi_bg_code(self) -> u8 {
        self.to_ansi_fg_code() + 10
    }
}

/// How one class of text is drawn
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Style {
    pub fg: Color,
    pub bold: bool,
}

impl Style {
    const fn new(fg: Color, bold: bool) -> Self {
        Self { fg, bold }
    }

    /// Full SGR sequence for this style, starting from a reset
    pub fn sgr(self, reverse: bool) -> String {
        let mut codes = format!("\x1b[0;{}", self.fg.to_ansi_fg_code());
        if self.bold {
            codes.push_str(";1");
        }
        if reverse {
            codes.push_str(";7");
        }
        codes.push('m');
        codes
    }
}

pub const GUTTER: Style = Style::new(Color::BrightBlack, false);
pub const STATUS: Style = Style::new(Color::Reset, false);

pub fn token_style(class: TokenClass) -> Style {
    match class {
        TokenClass::Normal => Style::new(Color::Reset, false),
        TokenClass::Keyword => Style::new(Color::Blue, true),
        TokenClass::Type => Style::new(Color::Green, false),
        TokenClass::Macro => Style::new(Color::Magenta, false),
        TokenClass::String => Style::new(Color::Yellow, false),
        TokenClass::BlockComment | TokenClass::LineComment => {
            Style::new(Color::BrightBlack, false)
        }
    }
}

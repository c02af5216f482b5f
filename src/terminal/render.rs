//! Terminal rendering module
//!
//! Writes an editor `Frame` to the terminal with ANSI escape codes, using
//! crossterm for cursor control. Every visible row is rewritten and then
//! cleared to the end of the line, so no diffing state is kept between
//! frames.

use std::io::Write;

use crossterm::{QueueableCommand, cursor};

use crate::core::editor::{Frame, FrameRow};
use crate::core::error::Result;
use crate::terminal::color::{self, Style};

/// Draw `frame` on a `cols` by `rows` screen.
///
/// `full` clears the whole screen first, for resizes and explicit redraws.
pub fn draw_frame<W: Write>(
    frame: &Frame,
    (cols, rows): (usize, usize),
    full: bool,
    out: &mut W,
) -> Result<()> {
    if rows == 0 {
        return Ok(());
    }

    // Hide cursor during update to prevent flickering
    out.queue(cursor::Hide)?;
    if full {
        write!(out, "\x1b[0m\x1b[2J")?;
    }

    let text_rows = rows - 1;
    for y in 0..text_rows {
        write!(out, "\x1b[{};1H", y + 1)?;
        match frame.rows.get(y) {
            Some(row) => draw_row(row, out)?,
            None => write!(out, "{}~", color::GUTTER.sgr(false))?,
        }
        write!(out, "\x1b[0m\x1b[K")?;
    }

    // Status line, reverse video across the full width
    write!(out, "\x1b[{};1H{}", rows, color::STATUS.sgr(true))?;
    let status: String = frame.status.chars().take(cols).collect();
    let pad = cols.saturating_sub(status.chars().count());
    write!(out, "{}{:pad$}\x1b[0m", status, "", pad = pad)?;

    let (cx, cy) = frame.cursor;
    out.queue(cursor::MoveTo(
        cx.min(cols.saturating_sub(1)) as u16,
        cy.min(rows - 1) as u16,
    ))?;
    out.queue(cursor::Show)?;
    out.flush()?;
    Ok(())
}

fn draw_row<W: Write>(row: &FrameRow, out: &mut W) -> Result<()> {
    if !row.gutter.is_empty() {
        write!(out, "{}{}", color::GUTTER.sgr(false), row.gutter)?;
    }

    let mut last: Option<(Style, bool)> = None;
    for span in &row.spans {
        let style = color::token_style(span.token.class);
        if last != Some((style, span.selected)) {
            write!(out, "{}", style.sgr(span.selected))?;
            last = Some((style, span.selected));
        }
        let end = (span.start + span.token.len).min(row.text.len());
        let visible = &row.text[span.start.min(end)..end];
        out.write_all(&printable(visible))?;
    }
    Ok(())
}

/// One screen cell per byte: control and non-ASCII bytes are masked
fn printable(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .map(|&b| match b {
            b'\t' => b' ',
            0x20..=0x7e => b,
            _ => b'?',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::TextBuffer;
    use crate::core::editor::{Editor, EditorOptions};
    use crate::core::syntax::LanguageRegistry;

    fn render(text: &str, cols: usize, rows: usize) -> String {
        let options = EditorOptions {
            line_numbers: true,
            syntax: Some("c".to_string()),
        };
        let mut editor = Editor::new(
            TextBuffer::from_text(text),
            LanguageRegistry::new(),
            &options,
            cols,
            rows,
        );
        let frame = editor.frame();
        let mut out = Vec::new();
        draw_frame(&frame, (cols, rows), true, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_renders_text_and_status() {
        let screen = render("int x;", 40, 5);
        assert!(screen.contains("\x1b[2J"));
        assert!(screen.contains("int"));
        assert!(screen.contains(" x;"));
        assert!(screen.contains("*scratch*:1:1 (c)"));
        // Rows past the end of the buffer
        assert_eq!(screen.matches('~').count(), 3);
    }

    #[test]
    fn test_keyword_colored() {
        let screen = render("return 0;", 40, 3);
        let keyword = color::token_style(crate::core::lexer::TokenClass::Keyword).sgr(false);
        assert!(screen.contains(&format!("{}return", keyword)));
    }

    #[test]
    fn test_printable_masks_bytes() {
        assert_eq!(printable(b"a\tb\x01\xff"), b"a b??".to_vec());
    }

    #[test]
    fn test_zero_rows_draws_nothing() {
        let frame = Frame {
            rows: Vec::new(),
            status: String::new(),
            cursor: (0, 0),
        };
        let mut out = Vec::new();
        draw_frame(&frame, (10, 0), false, &mut out).unwrap();
        assert!(out.is_empty());
    }
}

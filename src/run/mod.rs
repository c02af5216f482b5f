//! Application execution for slate.
//!
//! Validates the files named on the command line and runs the terminal
//! event loop.

mod tui;

use std::io::IsTerminal;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::core::buffer::TextBuffer;
use crate::core::error::{EditorError, Result};

pub use tui::run_terminal_mode;

/// Fail early when stdin or stdout is not a terminal
pub fn ensure_terminal() -> Result<()> {
    if !std::io::stdin().is_terminal() || !std::io::stdout().is_terminal() {
        return Err(EditorError::Cli(
            "slate needs an interactive terminal".to_string(),
        ));
    }
    Ok(())
}

/// Validate a file path before opening it.
///
/// A missing file is fine (it is created on save) as long as its parent
/// directory exists. Directories and special files are refused, since
/// reading them would hang or make no sense as text.
pub fn validate_file_path(path: &Path) -> Result<PathBuf> {
    let metadata = match std::fs::metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            let parent = match path.parent() {
                Some(p) if !p.as_os_str().is_empty() => p,
                _ => return Ok(path.to_path_buf()),
            };
            if !parent.is_dir() {
                return Err(EditorError::io(path, e));
            }
            return Ok(path.to_path_buf());
        }
        Err(e) => return Err(EditorError::io(path, e)),
    };

    if metadata.is_dir() {
        return Err(EditorError::Cli(format!(
            "{} is a directory",
            path.display()
        )));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::FileTypeExt;
        let ft = metadata.file_type();
        if ft.is_char_device() || ft.is_block_device() || ft.is_fifo() || ft.is_socket() {
            return Err(EditorError::Cli(format!(
                "{} is not a regular file",
                path.display()
            )));
        }
    }

    Ok(path.to_path_buf())
}

/// Open `path` for editing. A file that cannot be read still gets an empty
/// buffer bound to it, along with the error text to show.
pub fn open_buffer(path: &Path) -> (TextBuffer, Option<String>) {
    match TextBuffer::open(path) {
        Ok(buffer) => (buffer, None),
        Err(e) => {
            warn!(path = %path.display(), error = %e, "starting with an empty buffer");
            let mut buffer = TextBuffer::new();
            buffer.set_path(path);
            (buffer, Some(format!("Error: {}", e)))
        }
    }
}

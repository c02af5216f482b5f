//! Terminal (TUI) mode implementation.

use std::io;
use std::path::PathBuf;

use tracing::{info, warn};

use crate::config::Config;
use crate::core::buffer::TextBuffer;
use crate::core::editor::{Editor, EditorOptions};
use crate::core::error::Result;
use crate::core::syntax::LanguageRegistry;
use crate::run::{open_buffer, validate_file_path};
use crate::terminal;
use crate::terminal::event_handler::LoopAction;

/// Run in terminal (TUI) mode.
///
/// Only the first file is edited; slate holds a single buffer.
pub fn run_terminal_mode(files: &[PathBuf], config: &Config) -> Result<()> {
    let mut keybind_manager = terminal::keybinds::KeyBindingManager::new();
    for (binding, command) in &config.keybindings {
        if let Err(e) = keybind_manager.bind(binding, command) {
            warn!(binding = %binding, error = %e, "ignoring key binding");
        }
    }

    if files.len() > 1 {
        warn!(count = files.len(), "extra files ignored");
    }
    let (buffer, open_error) = match files.first() {
        Some(path) => open_buffer(&validate_file_path(path)?),
        None => (TextBuffer::new(), None),
    };

    let options = EditorOptions {
        line_numbers: config.get_bool("line-numbers").unwrap_or(true),
        syntax: config.get_string("syntax").map(str::to_string),
    };
    let (cols, rows) = crossterm::terminal::size()?;
    let mut screen = (cols as usize, rows as usize);
    let mut editor = Editor::new(
        buffer,
        LanguageRegistry::new(),
        &options,
        screen.0,
        screen.1,
    );
    if let Some(message) = open_error {
        editor.set_message(message);
    }
    info!(cols, rows, syntax = %editor.syntax().name, "terminal mode started");

    let _raw_mode = terminal::raw::RawMode::new()?;
    let mut stdout = io::stdout();
    terminal::render::draw_frame(&editor.frame(), screen, true, &mut stdout)?;

    let mut event_handler = terminal::events::EventHandler::new();
    loop {
        let event = event_handler.read()?;
        if let terminal::events::EditorEvent::Resize(cols, rows) = event {
            screen = (cols as usize, rows as usize);
        }

        let action = terminal::event_handler::process_terminal_event(
            &mut editor,
            &mut keybind_manager,
            event,
        );
        let full = match action {
            LoopAction::Exit => break,
            LoopAction::Idle => continue,
            LoopAction::Draw => false,
            LoopAction::FullRedraw => true,
        };

        let mut frame = editor.frame();
        if keybind_manager.is_pending() {
            frame.status = keybind_manager.current_sequence();
        }
        terminal::render::draw_frame(&frame, screen, full, &mut stdout)?;
    }

    info!("exiting");
    Ok(())
}

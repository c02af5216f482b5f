//! Routing of terminal events into the editor.
//!
//! Kept free of terminal I/O so whole key sequences can be replayed in
//! tests.

use tracing::trace;

use crate::core::dispatcher::DispatchResult;
use crate::core::editor::Editor;
use crate::core::input::LookupResult;
use crate::terminal::events::EditorEvent;
use crate::terminal::keybinds::KeyBindingManager;

/// What the event loop should do after an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Nothing visible changed
    Idle,
    /// Redraw the rows and status line
    Draw,
    /// Clear and redraw the whole screen
    FullRedraw,
    Exit,
}

pub fn process_terminal_event(
    editor: &mut Editor,
    keybinds: &mut KeyBindingManager,
    event: EditorEvent,
) -> LoopAction {
    match event {
        EditorEvent::None => LoopAction::Idle,
        EditorEvent::Resize(cols, rows) => {
            editor.resize(cols as usize, rows as usize);
            LoopAction::FullRedraw
        }
        EditorEvent::Input(input) => {
            // Prompts see raw keys; bindings do not apply while one is open
            if editor.is_prompting() {
                editor.handle_prompt_key(&input);
                return LoopAction::Draw;
            }

            let result = match keybinds.process_key(&input) {
                LookupResult::Command(command) => {
                    trace!(%command, "command");
                    editor.execute(command)
                }
                LookupResult::InsertChar(c) => editor.insert(c),
                LookupResult::Prefix | LookupResult::DeadEnd => return LoopAction::Draw,
            };

            match result {
                DispatchResult::Exit => LoopAction::Exit,
                DispatchResult::Redraw => LoopAction::FullRedraw,
                _ => LoopAction::Draw,
            }
        }
    }
}

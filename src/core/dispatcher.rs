use crate::core::command::Command;
use crate::core::editor::{Editor, PromptKind};

/// Result of command dispatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchResult {
    /// Command executed successfully
    Success,
    /// Nothing to do (no command and no character)
    NotHandled,
    /// Exit requested
    Exit,
    /// A prompt or incremental search is now active
    NeedsInput,
    /// Informational message to display
    Info(String),
    /// Force full display redraw
    Redraw,
}

/// Execute a command, or insert a typed character
pub fn dispatch(
    editor: &mut Editor,
    command: Option<Command>,
    insert_char: Option<char>,
) -> DispatchResult {
    if let Some(c) = insert_char {
        editor.insert_text(c);
        return DispatchResult::Success;
    }

    match command {
        Some(command) => dispatch_one(editor, command),
        None => DispatchResult::NotHandled,
    }
}

fn dispatch_one(editor: &mut Editor, command: Command) -> DispatchResult {
    match command {
        Command::Move(motion) => editor.move_cursor(motion),
        Command::Delete(motion) => editor.delete(motion),
        Command::InsertNewline => editor.buffer.insert_newline(),
        Command::InsertTab => editor.buffer.insert_char(b'\t'),
        Command::SetMark => {
            editor.buffer.toggle_selection();
            let message = if editor.buffer.has_selection() {
                "Mark set"
            } else {
                "Mark cleared"
            };
            return DispatchResult::Info(message.to_string());
        }
        Command::KillRegion => {
            if !editor.buffer.delete_selection() {
                return DispatchResult::Info("No region".to_string());
            }
        }
        Command::SearchForward => return editor.start_search(true),
        Command::SearchBackward => return editor.start_search(false),
        Command::ReplaceAll => return editor.open_prompt(PromptKind::ReplaceQuery),
        Command::SaveBuffer => return editor.save(),
        Command::WriteFile => return editor.open_prompt(PromptKind::WriteFile),
        Command::PageDown => editor.page(1),
        Command::PageUp => editor.page(-1),
        Command::Redraw => return DispatchResult::Redraw,
        Command::Exit => return editor.request_exit(),
    }
    DispatchResult::Success
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::buffer::TextBuffer;
    use crate::core::editor::EditorOptions;
    use crate::core::geometry::Position;
    use crate::core::motion::Motion;
    use crate::core::syntax::LanguageRegistry;

    fn setup_test_editor(text: &str) -> Editor {
        Editor::new(
            TextBuffer::from_text(text),
            LanguageRegistry::new(),
            &EditorOptions::default(),
            80,
            24,
        )
    }

    #[test]
    fn test_dispatch_forward_char() {
        let mut editor = setup_test_editor("hello");
        let result = dispatch(&mut editor, Some(Command::Move(Motion::CharForward)), None);
        assert_eq!(result, DispatchResult::Success);
        assert_eq!(editor.buffer().cursor(), Position::new(0, 1));
    }

    #[test]
    fn test_dispatch_insert_char() {
        let mut editor = setup_test_editor("");
        dispatch(&mut editor, None, Some('z'));
        dispatch(&mut editor, None, Some('é'));
        assert_eq!(editor.buffer().text(), "zé");
    }

    #[test]
    fn test_dispatch_nothing() {
        let mut editor = setup_test_editor("");
        assert_eq!(dispatch(&mut editor, None, None), DispatchResult::NotHandled);
    }

    #[test]
    fn test_kill_region_without_mark() {
        let mut editor = setup_test_editor("abc");
        assert_eq!(
            dispatch(&mut editor, Some(Command::KillRegion), None),
            DispatchResult::Info("No region".to_string())
        );
    }

    #[test]
    fn test_delete_prefers_selection() {
        let mut editor = setup_test_editor("one two three");
        dispatch(&mut editor, Some(Command::Move(Motion::WordForward)), None);
        dispatch(&mut editor, Some(Command::SetMark), None);
        dispatch(&mut editor, Some(Command::Move(Motion::WordForward)), None);
        dispatch(&mut editor, Some(Command::Delete(Motion::CharForward)), None);
        assert_eq!(editor.buffer().text(), "one three");
        assert!(!editor.buffer().has_selection());
    }

    #[test]
    fn test_dispatch_exit_clean_buffer() {
        let mut editor = setup_test_editor("");
        assert_eq!(
            dispatch(&mut editor, Some(Command::Exit), None),
            DispatchResult::Exit
        );
    }

    #[test]
    fn test_save_without_path_prompts() {
        let mut editor = setup_test_editor("x");
        assert_eq!(
            dispatch(&mut editor, Some(Command::SaveBuffer), None),
            DispatchResult::NeedsInput
        );
        assert!(editor.is_prompting());
    }
}

//! Editing sequences
//!
//! Whole key sequences driven through the default bindings, plus the
//! documented behaviors of the core: motion boundaries, search wraparound,
//! tokenizer nesting across lines and minimal viewport scrolling.

use slate::config::Config;
use slate::core::buffer::TextBuffer;
use slate::core::dispatcher::DispatchResult;
use slate::core::editor::{Editor, EditorOptions};
use slate::core::geometry::Position;
use slate::core::input::{InputEvent, Key};
use slate::core::lexer::{LineTokens, NestingState, TokenClass};
use slate::core::line::Line;
use slate::core::motion::Motion;
use slate::core::search::search_from;
use slate::core::syntax::{LanguageRegistry, PairKind, SyntaxDefinition};
use slate::core::viewport::Viewport;
use slate::terminal::event_handler::{LoopAction, process_terminal_event};
use slate::terminal::events::EditorEvent;
use slate::terminal::keybinds::KeyBindingManager;
use slate::user_config;

struct Session {
    editor: Editor,
    keybinds: KeyBindingManager,
}

impl Session {
    fn new(buffer: TextBuffer) -> Self {
        let mut config = Config::default();
        user_config::configure(&mut config);
        let mut keybinds = KeyBindingManager::new();
        for (binding, command) in &config.keybindings {
            keybinds.bind(binding, command).unwrap();
        }
        let editor = Editor::new(
            buffer,
            LanguageRegistry::new(),
            &EditorOptions::default(),
            80,
            24,
        );
        Self { editor, keybinds }
    }

    fn key(&mut self, event: InputEvent) -> LoopAction {
        process_terminal_event(&mut self.editor, &mut self.keybinds, EditorEvent::Input(event))
    }

    fn named(&mut self, key: Key) -> LoopAction {
        self.key(InputEvent::new(key))
    }

    fn ctrl(&mut self, c: char) -> LoopAction {
        self.key(InputEvent::ctrl(c))
    }

    fn meta(&mut self, c: char) -> LoopAction {
        self.key(InputEvent::alt(c))
    }

    fn type_str(&mut self, s: &str) {
        for c in s.chars() {
            match c {
                '\n' => self.named(Key::Enter),
                c => self.named(Key::Char(c)),
            };
        }
    }

    fn text(&self) -> String {
        self.editor.buffer().text()
    }

    fn cursor(&self) -> Position {
        self.editor.buffer().cursor()
    }
}

// =============================================================================
// KEY SEQUENCES
// =============================================================================

#[test]
fn type_split_and_join_lines() {
    let mut s = Session::new(TextBuffer::new());
    s.type_str("hello world");
    s.ctrl('a');
    s.meta('f');
    s.named(Key::Enter);
    assert_eq!(s.text(), "hello\n world");
    assert_eq!(s.cursor(), Position::new(1, 0));

    // Joining is the exact inverse of the split
    s.named(Key::Backspace);
    assert_eq!(s.text(), "hello world");
    assert_eq!(s.cursor(), Position::new(0, 5));
}

#[test]
fn kill_line_then_join() {
    let mut s = Session::new(TextBuffer::from_text("first line\nsecond"));
    s.meta('f');
    s.ctrl('k');
    assert_eq!(s.text(), "first\nsecond");
    s.ctrl('k');
    assert_eq!(s.text(), "firstsecond");
    // Nothing left to kill at the end of the document
    s.ctrl('e');
    s.ctrl('k');
    assert_eq!(s.text(), "firstsecond");
}

#[test]
fn mark_and_kill_region_across_lines() {
    let mut s = Session::new(TextBuffer::from_text("one\ntwo\nthree"));
    s.ctrl('f');
    s.key(InputEvent::ctrl(' '));
    s.ctrl('n');
    s.ctrl('n');
    s.ctrl('w');
    assert_eq!(s.text(), "ohree");
    assert_eq!(s.cursor(), Position::new(0, 1));
    assert!(!s.editor.buffer().has_selection());
}

#[test]
fn paragraph_motions() {
    let mut s = Session::new(TextBuffer::from_text("a\nb\n\n\nc\nd\n\ne"));
    s.meta('}');
    assert_eq!(s.cursor(), Position::new(4, 0));
    s.meta('}');
    assert_eq!(s.cursor(), Position::new(7, 0));
    s.meta('{');
    assert_eq!(s.cursor(), Position::new(4, 0));
    s.meta('>');
    assert_eq!(s.cursor(), Position::new(7, 1));
    s.meta('<');
    assert_eq!(s.cursor(), Position::new(0, 0));
}

#[test]
fn incremental_search_cancel_restores_origin() {
    let mut s = Session::new(TextBuffer::from_text("apple\nbanana\ncherry"));
    s.ctrl('n');
    let origin = s.cursor();
    s.ctrl('s');
    s.type_str("cher");
    assert_eq!(s.cursor(), Position::new(2, 0));
    s.ctrl('g');
    assert_eq!(s.cursor(), origin);
    assert!(!s.editor.is_prompting());
    assert_eq!(s.editor.message(), Some("Quit"));
}

#[test]
fn replace_all_through_prompts() {
    let mut s = Session::new(TextBuffer::from_text("let a = a + A;"));
    s.meta('%');
    s.type_str("a");
    s.named(Key::Enter);
    s.type_str("bb");
    s.named(Key::Enter);
    assert_eq!(s.text(), "let bb = bb + bb;");
    assert_eq!(s.editor.message(), Some("Replaced 3 occurrences"));
}

#[test]
fn exit_requires_confirmation_when_modified() {
    let mut s = Session::new(TextBuffer::new());
    s.type_str("x");
    s.ctrl('x');
    assert_eq!(s.ctrl('c'), LoopAction::Draw);
    s.ctrl('x');
    assert_eq!(s.ctrl('c'), LoopAction::Exit);
}

// =============================================================================
// FILES
// =============================================================================

#[test]
fn open_edit_save_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("notes.txt");
    std::fs::write(&path, "alpha\nbeta\n").unwrap();

    let mut s = Session::new(TextBuffer::open(&path).unwrap());
    s.meta('>');
    s.named(Key::Enter);
    s.type_str("gamma");
    assert!(s.editor.status_line().contains("[+]"));

    s.ctrl('x');
    s.ctrl('s');
    assert!(!s.editor.buffer().is_modified());
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "alpha\nbeta\ngamma\n");
}

#[test]
fn write_file_prompt_names_a_scratch_buffer() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("main.rs");

    let mut s = Session::new(TextBuffer::new());
    s.type_str("fn main() {}");
    s.ctrl('x');
    s.ctrl('s');
    assert!(s.editor.is_prompting());
    s.type_str(&path.to_string_lossy());
    s.named(Key::Enter);

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fn main() {}\n");
    assert_eq!(s.editor.buffer().path(), Some(path.as_path()));
    // The language follows the new extension
    assert_eq!(s.editor.syntax().name, "rust");
}

#[test]
fn failed_save_reports_without_crashing() {
    let dir = tempfile::tempdir().unwrap();
    let mut buffer = TextBuffer::from_text("data");
    buffer.set_path(dir.path().join("missing").join("out.txt"));

    let mut s = Session::new(buffer);
    s.ctrl('x');
    let action = s.ctrl('s');
    assert_eq!(action, LoopAction::Draw);
    assert!(s.editor.message().is_some_and(|m| m.starts_with("Error:")));
}

// =============================================================================
// CORE BEHAVIORS
// =============================================================================

#[test]
fn motion_boundaries_are_no_ops() {
    let buffer = TextBuffer::from_text("ab\ncd");
    assert_eq!(Motion::CharBackward.target(&buffer, None), Position::new(0, 0));

    let mut buffer = buffer;
    buffer.set_cursor(Position::new(1, 2));
    assert_eq!(Motion::CharForward.target(&buffer, None), Position::new(1, 2));
    assert_eq!(Motion::LineForward.target(&buffer, None), Position::new(1, 2));
}

#[test]
fn search_wraps_around_the_document() {
    let buffer = TextBuffer::from_text("abc\nxyz\nabc");
    assert_eq!(
        search_from(&buffer, b"abc", Position::new(2, 2), true),
        Some(Position::new(0, 0))
    );
    assert_eq!(
        search_from(&buffer, b"abc", Position::new(0, 0), false),
        Some(Position::new(2, 0))
    );
    assert_eq!(search_from(&buffer, b"nope", Position::new(1, 1), true), None);
}

#[test]
fn block_comment_nests_across_lines() {
    let definition = SyntaxDefinition::new("test").with_pair("/*", "*/", PairKind::BlockComment);
    let lines: Vec<Line> = ["x = /* start", "still comment", "end */ y"]
        .into_iter()
        .map(Line::from)
        .collect();

    let mut state = NestingState::GROUND;
    let mut classes = Vec::new();
    for line in &lines {
        let mut tokens = LineTokens::new(&definition, line.as_bytes(), state);
        let mut row = Vec::new();
        for (start, token) in tokens.by_ref() {
            row.push((start, token.class, token.len));
        }
        state = tokens.state();
        classes.push(row);
    }

    assert_eq!(classes[0].last(), Some(&(4, TokenClass::BlockComment, 8)));
    assert_eq!(classes[1], vec![(0, TokenClass::BlockComment, 13)]);
    assert_eq!(classes[2][0], (0, TokenClass::BlockComment, 6));
    assert_eq!(classes[2].last(), Some(&(7, TokenClass::Normal, 1)));
    assert!(state.is_ground());
}

#[test]
fn viewport_scrolls_minimally() {
    let mut viewport = Viewport::new(80, 11, false);
    assert_eq!(viewport.height, 10);
    viewport.fix(Position::new(15, 0));
    assert_eq!(viewport.anchor_y, 6);
    viewport.fix(Position::new(3, 0));
    assert_eq!(viewport.anchor_y, 3);
}

#[test]
fn resize_event_keeps_cursor_visible() {
    let text = (0..50).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let mut s = Session::new(TextBuffer::from_text(&text));
    s.meta('>');
    let action = process_terminal_event(&mut s.editor, &mut s.keybinds, EditorEvent::Resize(40, 6));
    assert_eq!(action, LoopAction::FullRedraw);
    let frame = s.editor.frame();
    assert_eq!(frame.rows.len(), 5);
    assert_eq!(frame.cursor.1, 4);
    assert_eq!(s.editor.execute(slate::core::command::Command::Redraw), DispatchResult::Redraw);
}

//! Syntax cache consistency
//!
//! The page cache must always agree with a from-scratch scan of the
//! document, whatever sequence of edits, scrolls and redraws came before.

use proptest::prelude::*;

use slate::core::buffer::TextBuffer;
use slate::core::command::Command;
use slate::core::editor::{Editor, EditorOptions};
use slate::core::geometry::Position;
use slate::core::lexer::{LineTokens, NestingState, scan_line};
use slate::core::line::Line;
use slate::core::motion::Motion;
use slate::core::syntax::{LanguageRegistry, SyntaxDefinition};
use slate::core::syntax_cache::SyntaxCache;

/// Nesting state at the start of `row`, scanned from the top
fn scratch_state(definition: &SyntaxDefinition, lines: &[Line], row: usize) -> NestingState {
    lines[..row]
        .iter()
        .fold(NestingState::GROUND, |state, line| {
            scan_line(definition, line.as_bytes(), state)
        })
}

fn assert_cache_exact(cache: &mut SyntaxCache, buffer: &TextBuffer, definition: &SyntaxDefinition) {
    let last_page = cache.page_of(buffer.line_count() - 1);
    for page in 0..=last_page {
        let cached = cache.ensure(page, buffer, definition);
        let expected = scratch_state(definition, buffer.lines(), cache.first_row(page));
        assert_eq!(cached, expected, "page {} disagrees with a fresh scan", page);
    }
}

// =============================================================================
// EDIT SEQUENCES
// =============================================================================

#[derive(Debug, Clone)]
enum Edit {
    Insert { row: usize, col: usize, text: String },
    Delete { from: (usize, usize), to: (usize, usize) },
}

fn position(buffer: &TextBuffer, (row, col): (usize, usize)) -> Position {
    let row = row % buffer.line_count();
    let len = buffer.lines()[row].len();
    Position::new(row, col % (len + 1))
}

fn apply(buffer: &mut TextBuffer, edit: &Edit) {
    match edit {
        Edit::Insert { row, col, text } => {
            let at = position(buffer, (*row, *col));
            buffer.set_cursor(at);
            buffer.insert_bytes(text.as_bytes());
        }
        Edit::Delete { from, to } => {
            let a = position(buffer, *from);
            let b = position(buffer, *to);
            buffer.delete_between(a, b);
        }
    }
}

fn edit_strategy() -> impl Strategy<Value = Edit> {
    prop_oneof![
        (any::<usize>(), any::<usize>(), "[a-z /*\"'\\\\\n]{1,6}")
            .prop_map(|(row, col, text)| Edit::Insert { row, col, text }),
        (any::<(usize, usize)>(), any::<(usize, usize)>())
            .prop_map(|(from, to)| Edit::Delete { from, to }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn cache_matches_fresh_scan_after_edits(
        text in "[a-z /*\"'\\\\\n]{0,120}",
        edits in prop::collection::vec(edit_strategy(), 1..24),
        page_height in 1usize..6,
    ) {
        let definition = SyntaxDefinition::c();
        let mut buffer = TextBuffer::from_text(&text);
        let mut cache = SyntaxCache::new(page_height);

        // Warm every page so invalidation has something to drop
        assert_cache_exact(&mut cache, &buffer, &definition);

        for edit in &edits {
            apply(&mut buffer, edit);
            if let Some(row) = buffer.take_damage() {
                cache.invalidate_from_row(row);
            }
            assert_cache_exact(&mut cache, &buffer, &definition);
        }
    }

    #[test]
    fn state_at_row_matches_fresh_scan(
        text in "[a-z /*\"'\\\\\n]{0,160}",
        page_height in 1usize..8,
        probes in prop::collection::vec(any::<usize>(), 1..16),
    ) {
        let definition = SyntaxDefinition::rust();
        let buffer = TextBuffer::from_text(&text);
        let mut cache = SyntaxCache::new(page_height);
        for probe in probes {
            let row = probe % buffer.line_count();
            let expected = scratch_state(&definition, buffer.lines(), row);
            prop_assert_eq!(cache.state_at_row(row, &buffer, &definition), expected);
        }
    }
}

// =============================================================================
// FRAME PATH
// =============================================================================

#[derive(Debug, Clone)]
enum Action {
    Type(char),
    Run(Command),
}

fn action_strategy() -> impl Strategy<Value = Action> {
    let commands = vec![
        Command::InsertNewline,
        Command::Move(Motion::FileHead),
        Command::Move(Motion::FileTail),
        Command::Move(Motion::LineForward),
        Command::Move(Motion::LineBackward),
        Command::Move(Motion::WordForward),
        Command::Move(Motion::LineTail),
        Command::Delete(Motion::CharBackward),
        Command::Delete(Motion::CharForward),
        Command::Delete(Motion::LineTail),
        Command::Delete(Motion::WordForward),
        Command::PageDown,
        Command::PageUp,
    ];
    prop_oneof![
        prop::sample::select(vec!['a', ' ', '/', '*', '"', '\'', '\\', 'x'])
            .prop_map(Action::Type),
        prop::sample::select(commands).prop_map(Action::Run),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn frames_classify_like_a_fresh_scan(
        text in "[a-z /*\"'\\\\\n]{0,200}",
        actions in prop::collection::vec(action_strategy(), 1..48),
        rows in 3usize..9,
    ) {
        let options = EditorOptions { line_numbers: true, syntax: Some("c".to_string()) };
        let mut editor = Editor::new(
            TextBuffer::from_text(&text),
            LanguageRegistry::new(),
            &options,
            1000,
            rows,
        );

        for action in &actions {
            match action {
                Action::Type(c) => { editor.insert(*c); }
                Action::Run(command) => { editor.execute(*command); }
            }
            let frame = editor.frame();

            let definition = editor.syntax().clone();
            let lines = editor.buffer().lines();
            let visible = editor.viewport().visible_rows(lines.len());
            prop_assert_eq!(frame.rows.len(), visible.len());

            let mut state = scratch_state(&definition, lines, visible.start);
            for (row, frame_row) in visible.clone().zip(&frame.rows) {
                let mut tokens = LineTokens::new(&definition, lines[row].as_bytes(), state);
                let expected: Vec<_> = tokens.by_ref().collect();
                state = tokens.state();
                let got: Vec<_> = frame_row.spans.iter().map(|s| (s.start, s.token)).collect();
                prop_assert_eq!(got, expected, "row {}", row);
            }

            // Entries written back by the frame must be exact too
            let mut cache = editor.cache().clone();
            for page in 0..=cache.watermark() {
                let expected = scratch_state(&definition, lines, cache.first_row(page));
                prop_assert_eq!(cache.ensure(page, editor.buffer(), &definition), expected);
            }
        }
    }
}

#[test]
fn resize_rebuilds_page_boundaries() {
    let text = "/* open\n".repeat(5) + "*/ int x;\n" + &"y\n".repeat(30);
    let options = EditorOptions { line_numbers: false, syntax: Some("c".to_string()) };
    let mut editor = Editor::new(TextBuffer::from_text(&text), LanguageRegistry::new(), &options, 80, 5);
    editor.execute(Command::Move(Motion::FileTail));
    editor.frame();
    assert!(editor.cache().watermark() > 0);

    editor.resize(80, 12);
    assert_eq!(editor.cache().page_height(), 11);
    assert_eq!(editor.cache().watermark(), 0);

    editor.frame();
    let mut cache = editor.cache().clone();
    let definition = editor.syntax().clone();
    for page in 0..=cache.watermark() {
        let expected = scratch_state(&definition, editor.buffer().lines(), cache.first_row(page));
        assert_eq!(cache.ensure(page, editor.buffer(), &definition), expected);
    }
}

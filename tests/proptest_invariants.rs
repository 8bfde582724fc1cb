//! Property-based tests for engine invariants.
//!
//! Uses proptest to verify the invariants that must hold across all valid
//! input sequences: selection bounds, line index shape, storage round-trip,
//! and wrap-width limits.

use fieldedit::{
    EngineConfig, Key, LineMetrics, Modifiers, MonoMetrics, Point, Rect, TextEngine,
};
use proptest::prelude::*;

// ============================================================================
// Strategies
// ============================================================================

/// One engine operation drawn from the full editing surface.
#[derive(Clone, Debug)]
enum Op {
    SetSelection(usize, usize),
    Type(String),
    Backspace,
    ForwardDelete,
    Click(i32, i32),
    Arrow(u8, bool),
    Undo,
    Redo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..200, 0usize..200).prop_map(|(a, b)| Op::SetSelection(a, b)),
        "[a-z \\n\\t.,]{0,6}".prop_map(Op::Type),
        Just(Op::Backspace),
        Just(Op::ForwardDelete),
        (0i32..220, 0i32..120).prop_map(|(x, y)| Op::Click(x, y)),
        (0u8..4, any::<bool>()).prop_map(|(dir, shift)| Op::Arrow(dir, shift)),
        Just(Op::Undo),
        Just(Op::Redo),
    ]
}

fn apply(engine: &mut TextEngine, op: &Op, step: u64) {
    match op {
        Op::SetSelection(a, b) => engine.set_selection(*a, *b),
        Op::Type(text) => {
            let _ = engine.replace_selection(text);
        }
        Op::Backspace => {
            let _ = engine.delete_backward();
        }
        Op::ForwardDelete => {
            let _ = engine.delete_forward();
        }
        Op::Click(x, y) => {
            engine.pointer_down(Point::new(*x, *y), Modifiers::empty(), step * 700);
            engine.pointer_up(Point::new(*x, *y));
        }
        Op::Arrow(dir, shift) => {
            let key = match dir {
                0 => Key::Left,
                1 => Key::Right,
                2 => Key::Up,
                _ => Key::Down,
            };
            let mods = if *shift {
                Modifiers::SHIFT
            } else {
                Modifiers::empty()
            };
            engine.handle_key(key, mods);
        }
        Op::Undo => {
            engine.undo();
        }
        Op::Redo => {
            engine.redo();
        }
    }
}

fn new_engine(max_len: usize) -> TextEngine {
    TextEngine::new(
        EngineConfig {
            max_len,
            ..EngineConfig::framed(Rect::new(0, 0, 200, 100))
        },
        Box::new(MonoMetrics::new(10, LineMetrics::new(12, 3, 1))),
    )
}

// ============================================================================
// Invariants
// ============================================================================

proptest! {
    /// After every operation: 0 <= selStart <= selEnd <= textLength.
    #[test]
    fn selection_bounds_hold_under_arbitrary_ops(
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let mut engine = new_engine(256);
        for (i, op) in ops.iter().enumerate() {
            apply(&mut engine, op, i as u64);
            let (start, end) = engine.selection();
            prop_assert!(start <= end, "selStart > selEnd after {op:?}");
            prop_assert!(end <= engine.len(), "selection past end after {op:?}");
        }
    }

    /// The line index always has >= 1 strictly increasing entries starting
    /// at 0, with the last entry at most the text length.
    #[test]
    fn line_index_shape_holds_under_arbitrary_ops(
        ops in prop::collection::vec(op_strategy(), 0..40)
    ) {
        let mut engine = new_engine(256);
        for (i, op) in ops.iter().enumerate() {
            apply(&mut engine, op, i as u64);
            let starts = engine.line_index().starts();
            prop_assert!(!starts.is_empty());
            prop_assert_eq!(starts[0], 0);
            for pair in starts.windows(2) {
                prop_assert!(pair[0] < pair[1], "starts not increasing after {:?}", op);
            }
            prop_assert!(*starts.last().unwrap() <= engine.len());
        }
    }

    /// setText then getText returns exactly the input for any text within
    /// the limit.
    #[test]
    fn set_text_round_trips(text in "[ -~\\n\\t]{0,200}") {
        let mut engine = new_engine(256);
        engine.set_text(&text).unwrap();
        prop_assert_eq!(engine.text(), text);
    }

    /// With wrapping on, space-separated words each narrower than the
    /// destination break only at spaces and no line exceeds the width.
    #[test]
    fn wrapped_lines_never_exceed_width(
        words in prop::collection::vec("[a-z]{1,9}", 1..20)
    ) {
        // 10px advance, 200px destination: every word (< 10 chars) fits.
        let text = words.join(" ");
        prop_assume!(text.len() <= 256);
        let mut engine = new_engine(256);
        engine.set_text(&text).unwrap();

        let index = engine.line_index();
        for line in 0..index.line_count() {
            let range = index.line_range(line, text.len());
            prop_assert!(range.len() <= 20, "line {} wider than 200px", line);
            if line + 1 < index.line_count() {
                prop_assert_eq!(
                    &text[range.end - 1..range.end], " ",
                    "break not at a space"
                );
            }
        }
    }

    /// Undoing everything restores the initial text.
    #[test]
    fn undo_all_restores_initial_text(
        edits in prop::collection::vec("[a-z]{1,5}", 1..8)
    ) {
        let mut engine = new_engine(4096);
        engine.set_text("base").unwrap();
        for (i, edit) in edits.iter().enumerate() {
            // Move the caret to commit a fresh undo group per edit.
            engine.set_caret(if i % 2 == 0 { engine.len() } else { 0 });
            engine.replace_selection(edit).unwrap();
        }
        while engine.undo() {}
        prop_assert_eq!(engine.text(), "base");
    }

    /// Hit-testing any point yields a legal caret position.
    #[test]
    fn hit_testing_is_always_in_bounds(
        text in "[a-z \\n]{0,80}",
        x in -50i32..400,
        y in -50i32..300,
    ) {
        let mut engine = new_engine(256);
        engine.set_text(&text).unwrap();
        let offset = engine.offset_at_point(Point::new(x, y));
        prop_assert!(offset <= engine.len());
        prop_assert!(engine.text().is_char_boundary(offset));
    }
}

use std::time::{Duration, Instant};

use proptest::prelude::*;

use nopad::editor::NoteBuffer;
use nopad::engine::{
    EditError, EditNotification, EngineConfig, StyleEngine, StyleSurface, TextRange,
};
use nopad::theme::{AttributeSet, Theme};

fn engine() -> StyleEngine {
    StyleEngine::new(EngineConfig::default(), Theme::nopad())
}

/// Heading level and marker span of a line, checked by hand.
fn naive_heading(line: &str) -> Option<(u8, usize, usize)> {
    let trimmed = line.trim_start_matches([' ', '\t']);
    let lead = line.len() - trimmed.len();
    let hashes = trimmed.chars().take_while(|&c| c == '#').count();
    let rest = &trimmed[hashes..];
    if (1..=6).contains(&hashes) && (rest.is_empty() || rest.starts_with(' ')) {
        Some((u8::try_from(hashes).unwrap(), lead, hashes))
    } else {
        None
    }
}

/// Attributes every char should carry after a pass, for '\n'-only ASCII text.
fn naive_attributes(text: &str, theme: &Theme) -> Vec<AttributeSet> {
    let mut out = Vec::with_capacity(text.len());
    for (idx, line) in text.split('\n').enumerate() {
        if idx > 0 {
            out.push(theme.base_attributes());
        }
        match naive_heading(line) {
            Some((level, lead, hashes)) => {
                for col in 0..line.len() {
                    if col >= lead && col < lead + hashes {
                        out.push(theme.marker_attributes(level));
                    } else {
                        out.push(theme.heading_attributes(level));
                    }
                }
            }
            None => out.extend(std::iter::repeat_n(theme.base_attributes(), line.len())),
        }
    }
    out
}

fn buffer_attributes(buffer: &NoteBuffer) -> Vec<AttributeSet> {
    (0..buffer.len_chars())
        .map(|pos| *buffer.attributes_at(pos).unwrap())
        .collect()
}

#[derive(Debug, Clone)]
enum Op {
    Replace {
        location: usize,
        length: usize,
        text: String,
    },
    Backspace {
        line: usize,
        col: usize,
    },
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..64usize, 0..8usize, "[#a \n]{0,6}").prop_map(|(location, length, text)| {
            Op::Replace {
                location,
                length,
                text,
            }
        }),
        (0..8usize, 0..16usize).prop_map(|(line, col)| Op::Backspace { line, col }),
    ]
}

/// Apply `op` to the buffer and report it to the engine; mirror the glow
/// flags in `glowing`.
fn apply(
    op: &Op,
    buffer: &mut NoteBuffer,
    engine: &mut StyleEngine,
    glowing: &mut Vec<bool>,
    now: Instant,
) {
    let edit = match op {
        Op::Replace {
            location,
            length,
            text,
        } => {
            let len = glowing.len();
            let start = (*location).min(len);
            let end = (location + length).min(len);
            let edit = buffer.replace_range(TextRange::new(*location, *length), text);
            if edit.is_some() {
                glowing.splice(start..end, text.chars().map(|c| c != ' ' && c != '\n'));
            }
            edit
        }
        Op::Backspace { line, col } => {
            buffer.move_to(*line, *col);
            let offset = buffer.cursor_offset();
            let edit = buffer.delete_back();
            if edit.is_some() {
                glowing.remove(offset - 1);
            }
            edit
        }
    };
    if let Some(edit) = edit {
        engine.notify_edit(&edit, buffer, now);
    }
}

#[test]
fn test_typing_session_end_to_end() {
    let theme = Theme::nopad();
    let start = Instant::now();
    let mut engine = engine();
    let mut buffer = NoteBuffer::empty();
    engine.request_initial_styling(&mut buffer);

    for (i, ch) in "### Plan\nbuy milk".chars().enumerate() {
        let now = start + Duration::from_millis(10 * i as u64);
        let edit = buffer.insert_char(ch);
        engine.notify_edit(&edit, &mut buffer, now);
    }
    let now = start + Duration::from_millis(170);
    let turn = engine.run_pending(&mut buffer, now);
    assert_eq!(turn.restyles, 1);
    assert_eq!(buffer_attributes(&buffer), naive_attributes(&buffer.text(), &theme));

    // Older characters have faded further than newer ones.
    let overlay = buffer.overlay();
    let first = overlay.glyphs().first().unwrap();
    let last = overlay.glyphs().last().unwrap();
    assert!(first.opacity < last.opacity);

    let mut now = now;
    while let Some(wake) = engine.next_wakeup(now) {
        now = wake;
        engine.run_pending(&mut buffer, now);
    }
    assert!(buffer.overlay().is_empty());
    assert!(now <= start + Duration::from_millis(170) + EngineConfig::DEFAULT_FADE + EngineConfig::DEFAULT_TICK);
}

#[test]
fn test_seeded_buffer_is_styled_without_edits() {
    let theme = Theme::nopad();
    let text = "# One\n\n  ## Two\n####### seven\n#nospace\n######";
    let mut buffer = NoteBuffer::from_text(text);
    engine().request_initial_styling(&mut buffer);
    assert_eq!(buffer_attributes(&buffer), naive_attributes(text, &theme));
}

#[test]
fn test_inconsistent_delta_is_rejected() {
    let err = EditNotification::characters(TextRange::new(3, 1), 4).unwrap_err();
    assert_eq!(
        err,
        EditError::NegativeOldLength {
            location: 3,
            length: 1,
            delta: 4
        }
    );
    assert!(EditNotification::characters(TextRange::new(3, 1), -2).is_ok());
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(96))]

    #[test]
    fn restyle_matches_naive_classification(ops in prop::collection::vec(op(), 0..40)) {
        let theme = Theme::nopad();
        let now = Instant::now();
        let mut engine = engine();
        let mut buffer = NoteBuffer::empty();
        let mut glowing = Vec::new();
        engine.request_initial_styling(&mut buffer);

        for op in &ops {
            apply(op, &mut buffer, &mut engine, &mut glowing, now);
        }
        engine.run_pending(&mut buffer, now);

        let len = buffer.len_chars();
        prop_assert!(buffer.attribute_runs().is_partition_of(len));
        prop_assert_eq!(buffer_attributes(&buffer), naive_attributes(&buffer.text(), &theme));

        // A second pass over the same text changes nothing.
        let before = buffer.attribute_runs().clone();
        engine.restyler().restyle_now(&mut buffer);
        prop_assert_eq!(&before, buffer.attribute_runs());
    }

    #[test]
    fn glow_positions_follow_edits(ops in prop::collection::vec(op(), 0..40)) {
        let now = Instant::now();
        let mut engine = engine();
        let mut buffer = NoteBuffer::empty();
        let mut glowing = Vec::new();

        for op in &ops {
            apply(op, &mut buffer, &mut engine, &mut glowing, now);
        }

        let expected: Vec<usize> = glowing
            .iter()
            .enumerate()
            .filter_map(|(pos, glows)| glows.then_some(pos))
            .collect();
        let entries: Vec<usize> = engine.fades().entries().iter().map(|e| e.position).collect();
        let overlay: Vec<usize> = buffer.overlay().glyphs().iter().map(|g| g.position).collect();
        prop_assert_eq!(&entries, &expected);
        prop_assert_eq!(&overlay, &expected);
        prop_assert_eq!(glowing.len(), buffer.len_chars());
    }
}

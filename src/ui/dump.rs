use std::fmt::Write;

use crate::editor::NoteBuffer;

/// One line per attribute run: `line:start-end family size weight color "text"`.
///
/// Columns are char offsets within the line.
pub fn styled_runs(buffer: &NoteBuffer) -> String {
    let mut out = String::new();
    for line_idx in 0..buffer.line_count() {
        let (Some(range), Some(text)) = (buffer.line_range(line_idx), buffer.line_at(line_idx))
        else {
            continue;
        };
        for run in buffer.runs_in(range) {
            let start = run.range.location - range.location;
            let end = run.range.end() - range.location;
            let piece: String = text.chars().skip(start).take(end - start).collect();
            let attrs = run.attributes;
            let _ = writeln!(
                out,
                "{}:{}-{} {:?} {} {:?} {} {:?}",
                line_idx + 1,
                start,
                end,
                attrs.font.family,
                attrs.font.size,
                attrs.font.weight,
                attrs.foreground,
                piece
            );
        }
    }
    out
}

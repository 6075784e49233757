use ratatui::prelude::*;
use ratatui::widgets::{Block, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::editor::NoteBuffer;
use crate::theme::Theme;

use super::{TAB_WIDTH, TEXT_LEFT_PADDING, status, style};

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let text_area = Rect {
        height: area.height.saturating_sub(1),
        ..area
    };
    let status_area = Rect {
        y: area.y + area.height.saturating_sub(1),
        height: area.height.min(1),
        ..area
    };

    let theme = model.engine.theme();
    let lines = visible_lines(
        &model.buffer,
        theme,
        model.scroll_offset,
        usize::from(text_area.height),
    );
    let text = Paragraph::new(lines)
        .style(style::base_style(theme))
        .block(Block::new().padding(Padding::left(TEXT_LEFT_PADDING)));
    frame.render_widget(text, text_area);

    status::render_status_bar(model, frame, status_area);
}

/// Styled lines for `height` buffer lines starting at `start`.
///
/// Each character takes the style of its attribute run, blended by the glow
/// overlay; the character under the cursor is inverted.
pub fn visible_lines(
    buffer: &NoteBuffer,
    theme: &Theme,
    start: usize,
    height: usize,
) -> Vec<Line<'static>> {
    let _scope = crate::perf::scope("ui.visible_lines");
    let cursor = buffer.cursor_offset();
    let end = (start + height).min(buffer.line_count());
    let base = theme.base_attributes();

    (start..end)
        .filter_map(|line_idx| Some((buffer.line_range(line_idx)?, buffer.line_at(line_idx)?)))
        .map(|(range, text)| {
            let mut spans: Vec<Span<'static>> = Vec::new();
            let mut pending = String::new();
            let mut pending_style = Style::new();

            for (offset, ch) in text.chars().enumerate() {
                let position = range.location + offset;
                let char_style = if position == cursor {
                    style::cursor_style(theme)
                } else {
                    let attributes = buffer.attributes_at(position).unwrap_or(&base);
                    style::char_style(attributes, buffer.overlay().opacity_at(position), theme)
                };
                if char_style != pending_style && !pending.is_empty() {
                    spans.push(Span::styled(std::mem::take(&mut pending), pending_style));
                }
                pending_style = char_style;
                push_display(&mut pending, ch);
            }
            if !pending.is_empty() {
                spans.push(Span::styled(pending, pending_style));
            }
            // Cursor past the last character of the line.
            if cursor == range.end() {
                spans.push(Span::styled(" ", style::cursor_style(theme)));
            }
            Line::from(spans)
        })
        .collect()
}

fn push_display(out: &mut String, ch: char) {
    match ch {
        '\t' => out.extend(std::iter::repeat_n(' ', TAB_WIDTH)),
        c if c.is_control() => out.push('\u{fffd}'),
        c => out.push(c),
    }
}

/// Display width of one character as drawn by [`visible_lines`].
pub fn display_width(ch: char) -> usize {
    match ch {
        '\t' => TAB_WIDTH,
        c if c.is_control() => 1,
        c => c.width().unwrap_or(0),
    }
}

/// Char column of the character drawn at display column `x` of `line`.
///
/// Columns past the end map to the line length.
pub fn char_col_at(line: &str, x: u16) -> usize {
    let x = usize::from(x);
    let mut used = 0;
    for (idx, ch) in line.chars().enumerate() {
        used += display_width(ch);
        if used > x {
            return idx;
        }
    }
    line.chars().count()
}

use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::Model;

use super::style;

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let filename = model
        .file_path
        .as_ref()
        .and_then(|path| path.file_name())
        .map_or_else(|| "untitled".to_string(), |s| s.to_string_lossy().to_string());

    let dirty_indicator = if model.buffer.is_dirty() {
        " [modified]"
    } else {
        ""
    };
    let cursor = model.buffer.cursor();
    let glowing = model.buffer.overlay().len();
    let glow_indicator = if glowing > 0 {
        format!("  *{glowing}")
    } else {
        String::new()
    };

    let status = format!(
        " nopad  {filename}{dirty_indicator}  Ln {}, Col {}{glow_indicator}  Esc:quit",
        cursor.line + 1,
        cursor.col + 1
    );

    let status_bar = Paragraph::new(status).style(style::status_style(model.engine.theme()));
    frame.render_widget(status_bar, area);
}

use std::time::Instant;

use crate::app::Model;
use crate::editor::Direction;
use crate::engine::EditNotification;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor
    InsertChar(char),
    /// Insert pasted text at the cursor
    Paste(String),
    /// Split line at cursor (Enter)
    SplitLine,
    /// Delete character before cursor (Backspace)
    DeleteBack,
    /// Delete character at cursor (Delete)
    DeleteForward,

    // Cursor
    /// Move cursor in a direction
    MoveCursor(Direction),
    /// Move cursor to beginning of line (Home)
    MoveHome,
    /// Move cursor to end of line (End)
    MoveEnd,
    /// Move cursor one word left (Ctrl+Left)
    MoveWordLeft,
    /// Move cursor one word right (Ctrl+Right)
    MoveWordRight,
    /// Move cursor to start of buffer (Ctrl+Home)
    MoveToStart,
    /// Move cursor to end of buffer (Ctrl+End)
    MoveToEnd,
    /// Move cursor to absolute position (line, col), e.g. from a mouse click
    MoveTo(usize, usize),

    // Viewport
    /// Scroll up by n lines
    ScrollUp(usize),
    /// Scroll down by n lines
    ScrollDown(usize),

    // Window
    /// Terminal resized
    Resize(u16, u16),

    // Application
    /// Quit the application
    Quit,
}

/// Update the model based on a message.
///
/// Text edits are forwarded to the engine as they happen, so fade state is
/// current before the next frame; restyles wait for the engine's next turn.
pub fn update(mut model: Model, msg: Message, now: Instant) -> Model {
    match msg {
        Message::InsertChar(ch) => {
            let edit = model.buffer.insert_char(ch);
            notify(&mut model, Some(edit), now);
        }
        Message::Paste(text) => {
            let edit = model.buffer.insert_str(&text);
            notify(&mut model, edit, now);
        }
        Message::SplitLine => {
            let edit = model.buffer.split_line();
            notify(&mut model, Some(edit), now);
        }
        Message::DeleteBack => {
            let edit = model.buffer.delete_back();
            notify(&mut model, edit, now);
        }
        Message::DeleteForward => {
            let edit = model.buffer.delete_forward();
            notify(&mut model, edit, now);
        }
        Message::MoveCursor(dir) => {
            model.buffer.move_cursor(dir);
            model.ensure_cursor_visible();
        }
        Message::MoveHome => model.buffer.move_home(),
        Message::MoveEnd => model.buffer.move_end(),
        Message::MoveWordLeft => {
            model.buffer.move_word_left();
            model.ensure_cursor_visible();
        }
        Message::MoveWordRight => {
            model.buffer.move_word_right();
            model.ensure_cursor_visible();
        }
        Message::MoveToStart => {
            model.buffer.move_to_start();
            model.ensure_cursor_visible();
        }
        Message::MoveToEnd => {
            model.buffer.move_to_end();
            model.ensure_cursor_visible();
        }
        Message::MoveTo(line, col) => {
            model.buffer.move_to(line, col);
            model.ensure_cursor_visible();
        }
        Message::ScrollUp(n) => {
            model.scroll_offset = model.scroll_offset.saturating_sub(n);
        }
        Message::ScrollDown(n) => {
            model.scroll_offset = (model.scroll_offset + n).min(model.max_scroll());
        }
        Message::Resize(width, height) => {
            model.width = width;
            model.height = height;
            model.ensure_cursor_visible();
        }
        Message::Quit => {
            model.should_quit = true;
        }
    }
    model
}

fn notify(model: &mut Model, edit: Option<EditNotification>, now: Instant) {
    if let Some(edit) = edit {
        model.engine.notify_edit(&edit, &mut model.buffer, now);
    }
    model.ensure_cursor_visible();
}

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::Frame;

use crate::app::{App, Message, Model};
use crate::editor::Direction;

use super::event_loop::ResizeDebouncer;

/// Lines moved per mouse wheel notch.
const WHEEL_LINES: usize = 3;

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) => Self::handle_key(*key, model),
            Event::Mouse(mouse) => Self::handle_mouse(*mouse, model),
            Event::Paste(text) => Some(Message::Paste(text.clone())),
            Event::Resize(w, h) => {
                crate::perf::log_event("event.resize.queue", format!("width={w} height={h}"));
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    pub(super) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        if key.kind == KeyEventKind::Release {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match key.code {
            // Quit
            KeyCode::Esc => Some(Message::Quit),
            KeyCode::Char('q' | 'c') if ctrl => Some(Message::Quit),

            // Editing
            KeyCode::Enter => Some(Message::SplitLine),
            KeyCode::Backspace => Some(Message::DeleteBack),
            KeyCode::Delete => Some(Message::DeleteForward),
            KeyCode::Tab => Some(Message::InsertChar('\t')),
            KeyCode::Char(c) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                Some(Message::InsertChar(c))
            }

            // Cursor
            KeyCode::Left if ctrl => Some(Message::MoveWordLeft),
            KeyCode::Right if ctrl => Some(Message::MoveWordRight),
            KeyCode::Home if ctrl => Some(Message::MoveToStart),
            KeyCode::End if ctrl => Some(Message::MoveToEnd),
            KeyCode::Left => Some(Message::MoveCursor(Direction::Left)),
            KeyCode::Right => Some(Message::MoveCursor(Direction::Right)),
            KeyCode::Up => Some(Message::MoveCursor(Direction::Up)),
            KeyCode::Down => Some(Message::MoveCursor(Direction::Down)),
            KeyCode::Home => Some(Message::MoveHome),
            KeyCode::End => Some(Message::MoveEnd),

            // Viewport
            KeyCode::PageUp => Some(Message::ScrollUp(page_rows(model))),
            KeyCode::PageDown => Some(Message::ScrollDown(page_rows(model))),

            _ => None,
        }
    }

    pub(super) fn handle_mouse(mouse: MouseEvent, model: &Model) -> Option<Message> {
        match mouse.kind {
            MouseEventKind::ScrollUp => Some(Message::ScrollUp(WHEEL_LINES)),
            MouseEventKind::ScrollDown => Some(Message::ScrollDown(WHEEL_LINES)),
            MouseEventKind::Down(MouseButton::Left) => {
                if mouse.row >= model.text_height() {
                    return None;
                }
                let line = model.scroll_offset + usize::from(mouse.row);
                let line = line.min(model.buffer.line_count().saturating_sub(1));
                let text = model.buffer.line_at(line).unwrap_or_default();
                let x = mouse.column.saturating_sub(crate::ui::TEXT_LEFT_PADDING);
                Some(Message::MoveTo(line, crate::ui::char_col_at(&text, x)))
            }
            _ => None,
        }
    }

    pub(super) fn view(model: &Model, frame: &mut Frame) {
        crate::ui::render(model, frame);
    }
}

fn page_rows(model: &Model) -> usize {
    usize::from(model.text_height().max(1))
}

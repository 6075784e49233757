use std::path::PathBuf;
use std::time::Instant;

use crate::editor::NoteBuffer;
use crate::engine::{EngineConfig, StyleEngine, Turn};
use crate::theme::Theme;

/// The complete application state.
///
/// All state lives here - no global or scattered state.
#[derive(Debug)]
pub struct Model {
    /// The note being edited
    pub buffer: NoteBuffer,
    /// Restyler and glow tracker for `buffer`
    pub engine: StyleEngine,
    /// File the buffer was seeded from, if any
    pub file_path: Option<PathBuf>,
    /// Terminal width in cells
    pub width: u16,
    /// Terminal height in cells, status bar included
    pub height: u16,
    /// First buffer line shown
    pub scroll_offset: usize,
    /// Whether the app should exit
    pub should_quit: bool,
}

impl Model {
    /// Create a model around `buffer` and style it once.
    pub fn new(mut buffer: NoteBuffer, config: EngineConfig, theme: Theme, size: (u16, u16)) -> Self {
        let mut engine = StyleEngine::new(config, theme);
        engine.request_initial_styling(&mut buffer);
        Self {
            buffer,
            engine,
            file_path: None,
            width: size.0,
            height: size.1,
            scroll_offset: 0,
            should_quit: false,
        }
    }

    #[must_use]
    pub fn with_file_path(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    /// Rows available for text (the last row is the status bar).
    pub const fn text_height(&self) -> u16 {
        self.height.saturating_sub(1)
    }

    /// Give the engine its UI turn.
    pub fn run_engine(&mut self, now: Instant) -> Turn {
        self.engine.run_pending(&mut self.buffer, now)
    }

    /// Scroll so the cursor line is on screen.
    pub fn ensure_cursor_visible(&mut self) {
        let cursor_line = self.buffer.cursor().line;
        let visible_height = usize::from(self.text_height());
        if visible_height == 0 {
            self.scroll_offset = cursor_line;
            return;
        }

        if cursor_line < self.scroll_offset {
            self.scroll_offset = cursor_line;
        } else if cursor_line >= self.scroll_offset + visible_height {
            self.scroll_offset = cursor_line + 1 - visible_height;
        }
    }

    /// Largest useful scroll offset.
    pub fn max_scroll(&self) -> usize {
        self.buffer.line_count().saturating_sub(1)
    }
}

// Inert placeholder for std::mem::take; never styled.
impl Default for Model {
    fn default() -> Self {
        Self {
            buffer: NoteBuffer::empty(),
            engine: StyleEngine::new(EngineConfig::default(), Theme::default()),
            file_path: None,
            width: 80,
            height: 24,
            scroll_offset: 0,
            should_quit: false,
        }
    }
}

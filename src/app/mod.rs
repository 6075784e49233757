//! Terminal host and main event loop.
//!
//! This module implements The Elm Architecture (TEA):
//! - [`Model`]: The complete application state
//! - [`Message`]: All possible events and actions
//! - [`update`]: State transitions, forwarding edits to the engine
//! - [`App::run`]: Main event loop with rendering

mod event_loop;
mod input;
mod model;
mod update;

pub use model::Model;
pub use update::{Message, update};

use std::path::PathBuf;

use crate::engine::EngineConfig;
use crate::theme::Theme;

/// Main application struct that owns the terminal and runs the event loop.
pub struct App {
    text: String,
    file_path: Option<PathBuf>,
    engine_config: EngineConfig,
    theme: Theme,
}

impl App {
    /// Create a new application editing `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            file_path: None,
            engine_config: EngineConfig::default(),
            theme: Theme::default(),
        }
    }

    /// Record the file the text came from, for the status bar.
    #[must_use]
    pub fn with_file_path(mut self, path: Option<PathBuf>) -> Self {
        self.file_path = path;
        self
    }

    #[must_use]
    pub const fn with_engine_config(mut self, config: EngineConfig) -> Self {
        self.engine_config = config;
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }
}

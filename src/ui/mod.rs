//! Terminal UI components.
//!
//! - [`style`]: attribute sets and glow opacity to ratatui styles
//! - rendering of the note text, cursor, and status bar
//! - a plain-text dump of styled runs for headless use

pub mod style;

mod dump;
mod render;
mod status;

pub use dump::styled_runs;
pub use render::{char_col_at, display_width, render, visible_lines};

/// Blank columns left of the text.
pub const TEXT_LEFT_PADDING: u16 = 1;
/// Columns a tab advances.
pub const TAB_WIDTH: usize = 4;

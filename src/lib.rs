// Only allow lints that are either transitive-dependency noise or
// genuinely opinionated style choices that don't indicate real issues.
#![allow(
    // Transitive dependency version mismatches we can't control
    clippy::multiple_crate_versions,
    // module_name_repetitions is pure style preference (e.g. engine::EngineConfig)
    clippy::module_name_repetitions
)]

//! # Nopad
//!
//! A markdown note pad whose text restyles itself as you type.
//!
//! The core is a small style/animation engine that reacts to edits:
//! - ATX headings (`#` to `######`) get a per-level font and color, with the
//!   `#` marker in the accent color
//! - Freshly typed characters glow and fade out over a short duration
//!
//! ## Architecture
//!
//! The engine is host-agnostic: anything implementing
//! [`engine::StyleSurface`] can be styled. The bundled terminal host uses
//! The Elm Architecture (TEA):
//! - **Model**: Application state
//! - **Message**: Events and actions
//! - **Update**: State transitions that forward edits to the engine
//! - **View**: Render to terminal
//!
//! ## Modules
//!
//! - [`engine`]: Restyler, fade tracker, and the UI-turn task queue
//! - [`heading`]: Heading classification and line splitting
//! - [`theme`]: Colors, fonts, and the attribute table
//! - [`editor`]: Rope-backed note buffer with attribute runs
//! - [`app`]: Terminal event loop and state
//! - [`ui`]: Terminal rendering
//! - [`config`]: Flag-token config files
//! - [`perf`]: Timing scopes and the render debug log

pub mod app;
pub mod config;
pub mod editor;
pub mod engine;
pub mod heading;
pub mod perf;
pub mod theme;
pub mod ui;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::app::{App, Message, Model};
    pub use crate::editor::NoteBuffer;
    pub use crate::engine::{EditNotification, EngineConfig, StyleEngine, StyleSurface, TextRange};
    pub use crate::theme::Theme;
}

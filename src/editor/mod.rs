//! Reference host for the engine: a rope-backed note buffer.
//!
//! The buffer keeps attribute runs alongside the text, reports every edit as
//! an [`EditNotification`](crate::engine::EditNotification), and implements
//! [`StyleSurface`](crate::engine::StyleSurface) so the engine can style it.

mod attributes;
mod buffer;

pub use attributes::{AttributeRun, AttributeRuns};
pub use buffer::{Cursor, Direction, NoteBuffer};

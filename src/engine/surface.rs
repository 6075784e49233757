//! The narrow interface between the engine and whatever owns the text.

use super::fade::RenderFrame;
use super::TextRange;
use crate::theme::AttributeSet;

/// A host text surface: readable text, writable attributes, and an overlay.
///
/// All offsets are char indices. The engine never mutates text through this
/// trait; it only replaces attributes and the glow overlay.
pub trait StyleSurface {
    /// Length of the buffer in chars.
    fn len_chars(&self) -> usize;

    /// A snapshot of the text in `range`, clamped to the buffer.
    fn text_in(&self, range: TextRange) -> String;

    /// Overwrite the attributes of `range`.
    fn apply_attributes(&mut self, range: TextRange, attributes: &AttributeSet);

    /// Replace the glow overlay with `frame`.
    fn set_render_frame(&mut self, frame: RenderFrame);

    /// The whole buffer.
    fn text(&self) -> String {
        self.text_in(TextRange::new(0, self.len_chars()))
    }

    /// Whether the surface has no text.
    fn is_empty(&self) -> bool {
        self.len_chars() == 0
    }
}

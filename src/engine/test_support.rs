use super::fade::RenderFrame;
use super::{StyleSurface, TextRange};
use crate::theme::AttributeSet;

/// A surface that records every attribute write and frame it receives.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub text: String,
    pub writes: Vec<(TextRange, AttributeSet)>,
    pub frames: Vec<RenderFrame>,
}

impl RecordingSurface {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }

    pub fn last_frame(&self) -> Option<&RenderFrame> {
        self.frames.last()
    }
}

impl StyleSurface for RecordingSurface {
    fn len_chars(&self) -> usize {
        self.text.chars().count()
    }

    fn text_in(&self, range: TextRange) -> String {
        self.text
            .chars()
            .skip(range.location)
            .take(range.length)
            .collect()
    }

    fn apply_attributes(&mut self, range: TextRange, attributes: &AttributeSet) {
        self.writes.push((range, *attributes));
    }

    fn set_render_frame(&mut self, frame: RenderFrame) {
        self.frames.push(frame);
    }
}

//! Heading detection for single lines of markdown.
//!
//! Only ATX headings are recognised: up to six `#` after optional spaces or
//! tabs, followed by a space or the end of the line. Offsets are in chars.

use crate::engine::TextRange;

/// Deepest heading level recognised.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// A line classified as a heading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeadingRecord {
    /// 1..=6
    pub level: u8,
    /// Char offset of the first `#` within the line.
    pub marker_start: usize,
    /// Number of `#` characters.
    pub marker_length: usize,
}

impl HeadingRecord {
    /// The marker's range in buffer coordinates, given where the line starts.
    pub const fn marker_range(&self, line_start: usize) -> TextRange {
        TextRange::new(line_start + self.marker_start, self.marker_length)
    }
}

/// Classify a line (without its terminator) as a heading.
///
/// Returns `None` for anything that is not a heading; that is not an error.
pub fn classify(line: &str) -> Option<HeadingRecord> {
    let mut chars = line.chars().peekable();

    let mut leading = 0;
    while chars.next_if(|c| matches!(c, ' ' | '\t')).is_some() {
        leading += 1;
    }

    let mut hashes = 0;
    while chars.next_if_eq(&'#').is_some() {
        hashes += 1;
    }

    if hashes == 0 || hashes > usize::from(MAX_HEADING_LEVEL) {
        return None;
    }
    if chars.peek().is_some_and(|&c| c != ' ') {
        return None;
    }

    Some(HeadingRecord {
        level: u8::try_from(hashes).ok()?,
        marker_start: leading,
        marker_length: hashes,
    })
}

/// A line of the buffer with its char range, terminator excluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan<'a> {
    pub text: &'a str,
    pub range: TextRange,
}

/// Split `text` into lines on every Unicode line terminator.
///
/// `\r\n` counts as one terminator. Empty lines are yielded. A trailing
/// terminator does not produce a final empty line, and empty text yields
/// nothing.
pub fn lines(text: &str) -> Lines<'_> {
    Lines {
        text,
        byte_pos: 0,
        char_pos: 0,
    }
}

pub struct Lines<'a> {
    text: &'a str,
    byte_pos: usize,
    char_pos: usize,
}

const fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}

impl<'a> Iterator for Lines<'a> {
    type Item = LineSpan<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.byte_pos >= self.text.len() {
            return None;
        }
        let rest = &self.text[self.byte_pos..];
        let start_char = self.char_pos;

        let mut content_chars = 0;
        let mut content_bytes = rest.len();
        let mut consumed_bytes = rest.len();
        let mut consumed_chars = 0;
        let mut iter = rest.char_indices().peekable();
        while let Some((idx, c)) = iter.next() {
            if is_line_terminator(c) {
                content_bytes = idx;
                consumed_bytes = idx + c.len_utf8();
                consumed_chars = content_chars + 1;
                if c == '\r' && iter.peek().is_some_and(|&(_, next)| next == '\n') {
                    consumed_bytes += 1;
                    consumed_chars += 1;
                }
                break;
            }
            content_chars += 1;
        }
        if consumed_chars == 0 {
            consumed_chars = content_chars;
        }

        self.byte_pos += consumed_bytes;
        self.char_pos += consumed_chars;
        Some(LineSpan {
            text: &rest[..content_bytes],
            range: TextRange::new(start_char, content_chars),
        })
    }
}

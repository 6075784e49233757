use ropey::Rope;

use super::attributes::{AttributeRun, AttributeRuns};
use crate::engine::{EditNotification, RenderFrame, StyleSurface, TextRange};
use crate::theme::{AttributeSet, Theme};

/// Cursor position in the note buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column, in chars.
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A note backed by a rope, with styled attribute runs and a glow overlay.
///
/// Every text mutation returns the [`EditNotification`] describing it; the
/// host forwards those to the engine. Offsets are char indices.
pub struct NoteBuffer {
    rope: Rope,
    cursor: Cursor,
    dirty: bool,
    runs: AttributeRuns,
    typing_attributes: AttributeSet,
    overlay: RenderFrame,
    attribute_writes: u64,
}

impl NoteBuffer {
    /// Create a buffer whose text starts in `typing_attributes`.
    pub fn new(text: &str, typing_attributes: AttributeSet) -> Self {
        let rope = Rope::from_str(text);
        let runs = AttributeRuns::uniform(rope.len_chars(), typing_attributes);
        Self {
            rope,
            cursor: Cursor::new(),
            dirty: false,
            runs,
            typing_attributes,
            overlay: RenderFrame::empty(),
            attribute_writes: 0,
        }
    }

    /// Create a buffer styled with the default theme's body attributes.
    pub fn from_text(text: &str) -> Self {
        Self::new(text, Theme::default().base_attributes())
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Char offset of the cursor.
    pub fn cursor_offset(&self) -> usize {
        let line = self.cursor.line.min(self.line_count().saturating_sub(1));
        self.rope.line_to_char(line) + self.cursor.col.min(self.line_len(line))
    }

    /// Whether the buffer has been modified since creation.
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Get the content of a line (without its terminator).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx).to_string();
        Some(strip_terminator(&line).to_string())
    }

    /// Char range of a line (without its terminator).
    pub fn line_range(&self, line_idx: usize) -> Option<TextRange> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        Some(TextRange::new(
            self.rope.line_to_char(line_idx),
            self.line_len(line_idx),
        ))
    }

    /// Length of a line in chars (without its terminator).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.chars().count())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    pub const fn attribute_runs(&self) -> &AttributeRuns {
        &self.runs
    }

    pub fn attributes_at(&self, position: usize) -> Option<&AttributeSet> {
        self.runs.attributes_at(position)
    }

    /// Runs intersecting `range`, clipped to it.
    pub fn runs_in(&self, range: TextRange) -> Vec<AttributeRun> {
        self.runs
            .runs()
            .iter()
            .filter_map(|run| {
                let start = run.range.location.max(range.location);
                let end = run.range.end().min(range.end());
                (start < end).then(|| AttributeRun {
                    range: TextRange::new(start, end - start),
                    attributes: run.attributes,
                })
            })
            .collect()
    }

    /// The glow overlay last handed to this buffer.
    pub const fn overlay(&self) -> &RenderFrame {
        &self.overlay
    }

    /// How many attribute writes the buffer has received.
    pub const fn attribute_writes(&self) -> u64 {
        self.attribute_writes
    }

    /// Insert a character at the cursor position.
    pub fn insert_char(&mut self, ch: char) -> EditNotification {
        let idx = self.cursor_offset();
        self.rope.insert_char(idx, ch);
        self.runs.splice(idx, 0, 1, self.typing_attributes);
        self.place_cursor(idx + 1);
        self.dirty = true;
        EditNotification::insertion(idx, 1)
    }

    /// Insert a string at the cursor position.
    pub fn insert_str(&mut self, s: &str) -> Option<EditNotification> {
        if s.is_empty() {
            return None;
        }
        let idx = self.cursor_offset();
        let count = s.chars().count();
        self.rope.insert(idx, s);
        self.runs.splice(idx, 0, count, self.typing_attributes);
        self.place_cursor(idx + count);
        self.dirty = true;
        Some(EditNotification::insertion(idx, count))
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) -> EditNotification {
        self.insert_char('\n')
    }

    /// Delete the character before the cursor (Backspace).
    ///
    /// Returns `None` at the start of the buffer.
    pub fn delete_back(&mut self) -> Option<EditNotification> {
        let idx = self.cursor_offset();
        if idx == 0 {
            return None;
        }
        // A CRLF pair goes as one line break.
        let start = if idx >= 2 && self.rope.char(idx - 1) == '\n' && self.rope.char(idx - 2) == '\r' {
            idx - 2
        } else {
            idx - 1
        };
        Some(self.remove(start, idx - start))
    }

    /// Delete the character at the cursor (Delete key).
    ///
    /// Returns `None` at the end of the buffer.
    pub fn delete_forward(&mut self) -> Option<EditNotification> {
        let idx = self.cursor_offset();
        let len = self.rope.len_chars();
        if idx >= len {
            return None;
        }
        let count = if idx + 1 < len && self.rope.char(idx) == '\r' && self.rope.char(idx + 1) == '\n' {
            2
        } else {
            1
        };
        Some(self.remove(idx, count))
    }

    /// Replace `range` (its end clamped to the buffer) with `text`; the
    /// cursor lands after the inserted text.
    ///
    /// Returns `None` when nothing changes, including when `range` starts
    /// past the end of the buffer.
    pub fn replace_range(&mut self, range: TextRange, text: &str) -> Option<EditNotification> {
        let len = self.rope.len_chars();
        if range.location > len {
            return None;
        }
        let start = range.location;
        let end = range.end().min(len);
        let inserted = text.chars().count();
        if start == end && inserted == 0 {
            return None;
        }
        self.rope.remove(start..end);
        self.rope.insert(start, text);
        self.runs.splice(start, end - start, inserted, self.typing_attributes);
        self.place_cursor(start + inserted);
        self.dirty = true;
        Some(EditNotification::replacement(start, end - start, inserted))
    }

    /// Move the cursor in the given direction.
    pub fn move_cursor(&mut self, direction: Direction) {
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub const fn move_home(&mut self) {
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self) {
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self) {
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line: Vec<char> = self.line_at(self.cursor.line).unwrap_or_default().chars().collect();
        let mut col = self.cursor.col.min(line.len());
        while col > 0 && !is_word_char(line[col - 1]) {
            col -= 1;
        }
        while col > 0 && is_word_char(line[col - 1]) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line: Vec<char> = self.line_at(self.cursor.line).unwrap_or_default().chars().collect();
        let mut col = self.cursor.col;
        // Skip the rest of the current word, then the gap after it.
        while col < line.len() && is_word_char(line[col]) {
            col += 1;
        }
        while col < line.len() && !is_word_char(line[col]) {
            col += 1;
        }
        self.cursor.set_col(col);
    }

    /// Move cursor to a specific line and column.
    pub fn move_to(&mut self, line: usize, col: usize) {
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let max_col = self.line_len(self.cursor.line);
        self.cursor.set_col(col.min(max_col));
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub const fn move_to_start(&mut self) {
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self) {
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    fn remove(&mut self, start: usize, count: usize) -> EditNotification {
        self.rope.remove(start..start + count);
        self.runs.splice(start, count, 0, self.typing_attributes);
        self.place_cursor(start);
        self.dirty = true;
        EditNotification::deletion(start, count)
    }

    fn place_cursor(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let col = offset - self.rope.line_to_char(line);
        self.cursor = Cursor::at(line, col);
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            self.cursor.set_col(self.cursor.col - 1);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            self.cursor.set_col(self.cursor.col + 1);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            let max_col = self.line_len(self.cursor.line);
            self.cursor.col = self.cursor.col_memory.min(max_col);
        }
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

fn strip_terminator(line: &str) -> &str {
    if let Some(stripped) = line.strip_suffix("\r\n") {
        return stripped;
    }
    match line.chars().next_back() {
        Some(c) if matches!(c, '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}') => {
            &line[..line.len() - c.len_utf8()]
        }
        _ => line,
    }
}

impl StyleSurface for NoteBuffer {
    fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    fn text_in(&self, range: TextRange) -> String {
        let len = self.rope.len_chars();
        let start = range.location.min(len);
        let end = range.end().min(len);
        self.rope.slice(start..end).to_string()
    }

    fn apply_attributes(&mut self, range: TextRange, attributes: &AttributeSet) {
        self.runs.set(range, *attributes);
        self.attribute_writes += 1;
    }

    fn set_render_frame(&mut self, frame: RenderFrame) {
        self.overlay = frame;
    }
}

impl std::fmt::Debug for NoteBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NoteBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("dirty", &self.dirty)
            .field("runs", &self.runs.runs().len())
            .field("glowing", &self.overlay.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // --- Construction and basic queries ---

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buf = NoteBuffer::empty();
        assert_eq!(buf.line_count(), 1);
        assert_eq!(buf.line_at(0), Some(String::new()));
        assert!(buf.attribute_runs().is_empty());
    }

    #[test]
    fn test_from_text_preserves_content_and_styles_it() {
        let buf = NoteBuffer::from_text("hello\nworld");
        assert_eq!(buf.line_count(), 2);
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some("world".to_string()));
        assert!(buf.attribute_runs().is_partition_of(11));
    }

    #[test]
    fn test_line_range_excludes_terminator() {
        let buf = NoteBuffer::from_text("ab\r\ncd\n");
        assert_eq!(buf.line_range(0), Some(TextRange::new(0, 2)));
        assert_eq!(buf.line_range(1), Some(TextRange::new(4, 2)));
        assert_eq!(buf.line_range(2), Some(TextRange::new(7, 0)));
        assert_eq!(buf.line_range(3), None);
    }

    #[test]
    fn test_line_len_counts_chars() {
        let buf = NoteBuffer::from_text("café\nhi");
        assert_eq!(buf.line_len(0), 4);
        assert_eq!(buf.line_len(1), 2);
    }

    // --- Editing returns notifications ---

    #[test]
    fn test_insert_char_reports_insertion() {
        let mut buf = NoteBuffer::from_text("hllo");
        buf.move_cursor(Direction::Right);
        let edit = buf.insert_char('e');
        assert_eq!(edit, EditNotification::insertion(1, 1));
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 2));
        assert!(buf.is_dirty());
    }

    #[test]
    fn test_insert_str_reports_char_count() {
        let mut buf = NoteBuffer::from_text("hd");
        buf.move_cursor(Direction::Right);
        let edit = buf.insert_str("éllo wörl").unwrap();
        assert_eq!(edit.edited_range(), TextRange::new(1, 9));
        assert_eq!(edit.length_delta(), 9);
        assert_eq!(buf.text(), "héllo wörld");
        assert_eq!(buf.cursor(), Cursor::at(0, 10));
    }

    #[test]
    fn test_insert_str_empty_is_noop() {
        let mut buf = NoteBuffer::from_text("hello");
        assert!(buf.insert_str("").is_none());
        assert!(!buf.is_dirty());
    }

    #[test]
    fn test_insert_multiline_str_moves_cursor_to_last_line() {
        let mut buf = NoteBuffer::from_text("");
        buf.insert_str("# a\nbc");
        assert_eq!(buf.cursor(), Cursor::at(1, 2));
    }

    #[test]
    fn test_split_line_in_middle() {
        let mut buf = NoteBuffer::from_text("hello world");
        buf.move_to(0, 5);
        let edit = buf.split_line();
        assert_eq!(edit, EditNotification::insertion(5, 1));
        assert_eq!(buf.line_at(0), Some("hello".to_string()));
        assert_eq!(buf.line_at(1), Some(" world".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_delete_back_at_start_is_noop() {
        let mut buf = NoteBuffer::from_text("hello");
        assert!(buf.delete_back().is_none());
        assert_eq!(buf.text(), "hello");
    }

    #[test]
    fn test_delete_back_joins_lines() {
        let mut buf = NoteBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        let edit = buf.delete_back().unwrap();
        assert_eq!(edit, EditNotification::deletion(5, 1));
        assert_eq!(buf.line_at(0), Some("helloworld".to_string()));
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_delete_back_removes_crlf_together() {
        let mut buf = NoteBuffer::from_text("ab\r\ncd");
        buf.move_to(1, 0);
        let edit = buf.delete_back().unwrap();
        assert_eq!(edit, EditNotification::deletion(2, 2));
        assert_eq!(buf.text(), "abcd");
    }

    #[test]
    fn test_delete_forward_at_end_is_noop() {
        let mut buf = NoteBuffer::from_text("hello");
        buf.move_end();
        assert!(buf.delete_forward().is_none());
    }

    #[test]
    fn test_delete_forward_removes_char() {
        let mut buf = NoteBuffer::from_text("hello");
        let edit = buf.delete_forward().unwrap();
        assert_eq!(edit, EditNotification::deletion(0, 1));
        assert_eq!(buf.text(), "ello");
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_replace_range_reports_delta() {
        let mut buf = NoteBuffer::from_text("one two three");
        let edit = buf.replace_range(TextRange::new(4, 3), "2").unwrap();
        assert_eq!(edit.edited_range(), TextRange::new(4, 1));
        assert_eq!(edit.length_delta(), -2);
        assert_eq!(buf.text(), "one 2 three");
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
        assert!(buf.attribute_runs().is_partition_of(11));
    }

    #[test]
    fn test_replace_range_noop() {
        let mut buf = NoteBuffer::from_text("abc");
        assert!(buf.replace_range(TextRange::new(1, 0), "").is_none());
    }

    #[test]
    fn test_replace_range_past_end_is_ignored() {
        let mut buf = NoteBuffer::from_text("abc");
        assert!(buf.replace_range(TextRange::new(usize::MAX, 1), "x").is_none());
        assert!(buf.replace_range(TextRange::new(4, 0), "x").is_none());
        assert_eq!(buf.text(), "abc");
        assert!(!buf.is_dirty());
        assert!(buf.attribute_runs().is_partition_of(3));
    }

    #[test]
    fn test_replace_range_clamps_overflowing_end() {
        let mut buf = NoteBuffer::from_text("abc");
        let edit = buf.replace_range(TextRange::new(1, usize::MAX), "x").unwrap();
        assert_eq!(edit.length_delta(), -1);
        assert_eq!(buf.text(), "ax");
    }

    #[test]
    fn test_overflowing_ranges_through_surface_are_clamped() {
        let mut buf = NoteBuffer::from_text("abc");
        let before = buf.attribute_runs().clone();
        let attrs = Theme::nopad().heading_attributes(1);
        buf.apply_attributes(TextRange::new(usize::MAX, 1), &attrs);
        assert_eq!(buf.attribute_runs(), &before);
        assert_eq!(buf.text_in(TextRange::new(1, usize::MAX)), "bc");
        assert_eq!(buf.text_in(TextRange::new(usize::MAX, 1)), "");
    }

    // --- Attribute runs track edits ---

    #[test]
    fn test_typed_text_inherits_preceding_attributes() {
        let theme = Theme::nopad();
        let mut buf = NoteBuffer::from_text("# ab");
        buf.apply_attributes(TextRange::new(0, 4), &theme.heading_attributes(1));
        buf.move_end();
        buf.insert_char('c');
        assert_eq!(buf.attributes_at(4), Some(&theme.heading_attributes(1)));
        assert!(buf.attribute_runs().is_partition_of(5));
        assert_eq!(buf.attribute_writes(), 1);
    }

    #[test]
    fn test_runs_in_clips_to_range() {
        let theme = Theme::nopad();
        let mut buf = NoteBuffer::from_text("abcdef");
        buf.apply_attributes(TextRange::new(2, 2), &theme.heading_attributes(1));
        let runs = buf.runs_in(TextRange::new(1, 4));
        let ranges: Vec<TextRange> = runs.iter().map(|run| run.range).collect();
        assert_eq!(
            ranges,
            vec![
                TextRange::new(1, 1),
                TextRange::new(2, 2),
                TextRange::new(4, 1)
            ]
        );
    }

    #[test]
    fn test_text_in_clamps() {
        let buf = NoteBuffer::from_text("héllo");
        assert_eq!(buf.text_in(TextRange::new(1, 2)), "él");
        assert_eq!(buf.text_in(TextRange::new(3, 99)), "lo");
        assert_eq!(buf.text_in(TextRange::new(99, 1)), "");
    }

    // --- Cursor movement ---

    #[test]
    fn test_move_left_wraps_to_prev_line() {
        let mut buf = NoteBuffer::from_text("hello\nworld");
        buf.move_to(1, 0);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor(), Cursor::at(0, 5));
    }

    #[test]
    fn test_move_right_wraps_to_next_line() {
        let mut buf = NoteBuffer::from_text("hello\nworld");
        buf.move_to(0, 5);
        buf.move_cursor(Direction::Right);
        assert_eq!(buf.cursor(), Cursor::at(1, 0));
    }

    #[test]
    fn test_column_memory_across_short_line() {
        let mut buf = NoteBuffer::from_text("hello\nhi\nworld");
        buf.move_to(0, 4);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().col, 2);
        buf.move_cursor(Direction::Down);
        assert_eq!(buf.cursor().line, 2);
        assert_eq!(buf.cursor().col, 4);
    }

    #[test]
    fn test_move_over_multibyte_is_one_step() {
        let mut buf = NoteBuffer::from_text("café");
        buf.move_end();
        assert_eq!(buf.cursor().col, 4);
        buf.move_cursor(Direction::Left);
        assert_eq!(buf.cursor().col, 3);
        assert_eq!(buf.cursor_offset(), 3);
    }

    #[test]
    fn test_word_movement() {
        let mut buf = NoteBuffer::from_text("hello world");
        buf.move_word_right();
        assert_eq!(buf.cursor().col, 6);
        buf.move_to(0, 8);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 6);
        buf.move_word_left();
        assert_eq!(buf.cursor().col, 0);
    }

    #[test]
    fn test_move_to_end_and_start() {
        let mut buf = NoteBuffer::from_text("hello\nworld");
        buf.move_to_end();
        assert_eq!(buf.cursor(), Cursor::at(1, 5));
        buf.move_to_start();
        assert_eq!(buf.cursor(), Cursor::at(0, 0));
    }

    #[test]
    fn test_type_then_backspace_then_type() {
        let mut buf = NoteBuffer::from_text("");
        for ch in "hel".chars() {
            buf.insert_char(ch);
        }
        buf.delete_back();
        buf.insert_char('l');
        buf.insert_char('p');
        assert_eq!(buf.text(), "help");
        assert!(buf.attribute_runs().is_partition_of(4));
    }
}

//! Edit notifications sent from the host buffer to the engine.

use thiserror::Error;

/// A half-open char range `[location, location + length)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextRange {
    pub location: usize,
    pub length: usize,
}

impl TextRange {
    pub const fn new(location: usize, length: usize) -> Self {
        Self { location, length }
    }

    pub const fn end(&self) -> usize {
        self.location.saturating_add(self.length)
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub const fn contains(&self, position: usize) -> bool {
        position >= self.location && position < self.end()
    }
}

impl From<std::ops::Range<usize>> for TextRange {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end.saturating_sub(range.start))
    }
}

/// What an edit changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// Characters were inserted, removed or replaced (attributes may also have changed).
    Characters,
    /// Only attributes changed; text and offsets are untouched.
    Attributes,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("edit at {location} reports length {length} with delta {delta}: pre-edit length would be negative")]
    NegativeOldLength {
        location: usize,
        length: usize,
        delta: isize,
    },
    #[error("edited range {location}+{length} overflows")]
    RangeOverflow { location: usize, length: usize },
}

/// "The buffer changed over `edited_range` by `length_delta`."
///
/// `edited_range` is in post-edit coordinates and
/// `length_delta = new_length - old_length` for the edited region, so the
/// region occupied `edited_range.length - length_delta` chars before the edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditNotification {
    kind: EditKind,
    edited_range: TextRange,
    length_delta: isize,
}

impl EditNotification {
    /// Build a notification, rejecting inconsistent deltas.
    ///
    /// # Errors
    ///
    /// Returns [`EditError`] if the range overflows or the implied pre-edit
    /// length is negative.
    pub fn new(kind: EditKind, edited_range: TextRange, length_delta: isize) -> Result<Self, EditError> {
        let TextRange { location, length } = edited_range;
        if location.checked_add(length).is_none() {
            return Err(EditError::RangeOverflow { location, length });
        }
        let Ok(signed_length) = isize::try_from(length) else {
            return Err(EditError::RangeOverflow { location, length });
        };
        if signed_length.checked_sub(length_delta).is_none_or(|old| old < 0) {
            return Err(EditError::NegativeOldLength {
                location,
                length,
                delta: length_delta,
            });
        }
        Ok(Self {
            kind,
            edited_range,
            length_delta,
        })
    }

    /// Shorthand for a character edit.
    ///
    /// # Errors
    ///
    /// See [`EditNotification::new`].
    pub fn characters(edited_range: TextRange, length_delta: isize) -> Result<Self, EditError> {
        Self::new(EditKind::Characters, edited_range, length_delta)
    }

    /// `count` chars inserted at `location`.
    pub fn insertion(location: usize, count: usize) -> Self {
        Self {
            kind: EditKind::Characters,
            edited_range: TextRange::new(location, count),
            length_delta: isize::try_from(count).unwrap_or(isize::MAX),
        }
    }

    /// `count` chars removed starting at `location`.
    pub fn deletion(location: usize, count: usize) -> Self {
        Self {
            kind: EditKind::Characters,
            edited_range: TextRange::new(location, 0),
            length_delta: -isize::try_from(count).unwrap_or(isize::MAX),
        }
    }

    /// `removed` chars at `location` replaced by `inserted` chars.
    pub fn replacement(location: usize, removed: usize, inserted: usize) -> Self {
        let removed = isize::try_from(removed).unwrap_or(isize::MAX);
        let inserted_signed = isize::try_from(inserted).unwrap_or(isize::MAX);
        Self {
            kind: EditKind::Characters,
            edited_range: TextRange::new(location, inserted),
            length_delta: inserted_signed - removed,
        }
    }

    /// An attribute-only change over `range`.
    pub const fn attributes(range: TextRange) -> Self {
        Self {
            kind: EditKind::Attributes,
            edited_range: range,
            length_delta: 0,
        }
    }

    pub const fn edited_range(&self) -> TextRange {
        self.edited_range
    }

    pub const fn length_delta(&self) -> isize {
        self.length_delta
    }

    pub const fn touches_characters(&self) -> bool {
        matches!(self.kind, EditKind::Characters)
    }

    /// The region the edit replaced, in pre-edit coordinates.
    pub fn old_range(&self) -> TextRange {
        let length = isize::try_from(self.edited_range.length).unwrap_or(isize::MAX);
        let old_length = length.saturating_sub(self.length_delta);
        TextRange::new(self.edited_range.location, old_length.unsigned_abs())
    }
}

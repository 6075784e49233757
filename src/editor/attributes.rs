//! Attribute runs: a gap-free partition of the buffer into styled ranges.

use crate::engine::TextRange;
use crate::theme::AttributeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeRun {
    pub range: TextRange,
    pub attributes: AttributeSet,
}

/// Runs are sorted, contiguous from 0, non-empty, and adjacent runs never
/// share attributes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeRuns {
    runs: Vec<AttributeRun>,
}

impl AttributeRuns {
    /// `len` chars all styled with `attributes`.
    pub fn uniform(len: usize, attributes: AttributeSet) -> Self {
        let mut runs = Self::default();
        if len > 0 {
            runs.runs.push(AttributeRun {
                range: TextRange::new(0, len),
                attributes,
            });
        }
        runs
    }

    pub fn runs(&self) -> &[AttributeRun] {
        &self.runs
    }

    /// Number of chars covered.
    pub fn len(&self) -> usize {
        self.runs.last().map_or(0, |run| run.range.end())
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn attributes_at(&self, position: usize) -> Option<&AttributeSet> {
        let idx = self
            .runs
            .partition_point(|run| run.range.end() <= position);
        self.runs
            .get(idx)
            .filter(|run| run.range.contains(position))
            .map(|run| &run.attributes)
    }

    /// Whether the runs cover exactly `[0, len)` with no gaps or overlaps.
    pub fn is_partition_of(&self, len: usize) -> bool {
        let mut expected = 0;
        for run in &self.runs {
            if run.range.location != expected || run.range.is_empty() {
                return false;
            }
            expected = run.range.end();
        }
        expected == len
    }

    /// Overwrite `range` (clamped to the covered length) with `attributes`.
    pub fn set(&mut self, range: TextRange, attributes: AttributeSet) {
        let end = range.end().min(self.len());
        if range.location >= end {
            return;
        }
        let start_idx = self.split_at(range.location);
        let end_idx = self.split_at(end);
        self.runs.splice(
            start_idx..end_idx,
            [AttributeRun {
                range: TextRange::new(range.location, end - range.location),
                attributes,
            }],
        );
        self.coalesce();
    }

    /// Follow a text edit: `removed` chars at `location` became `inserted` chars.
    ///
    /// New chars take the attributes of the char before them, or of the first
    /// replaced char at the start of the buffer, or `fallback` when there is
    /// nothing to inherit from.
    pub fn splice(&mut self, location: usize, removed: usize, inserted: usize, fallback: AttributeSet) {
        let location = location.min(self.len());
        let inherited = location
            .checked_sub(1)
            .and_then(|before| self.attributes_at(before))
            .or_else(|| self.attributes_at(location))
            .copied()
            .unwrap_or(fallback);

        let removal_end = (location + removed).min(self.len());
        if removal_end > location {
            let start_idx = self.split_at(location);
            let end_idx = self.split_at(removal_end);
            self.runs.drain(start_idx..end_idx);
            let shift = removal_end - location;
            for run in &mut self.runs[start_idx..] {
                run.range.location -= shift;
            }
        }

        if inserted > 0 {
            let idx = self.split_at(location);
            for run in &mut self.runs[idx..] {
                run.range.location += inserted;
            }
            self.runs.insert(
                idx,
                AttributeRun {
                    range: TextRange::new(location, inserted),
                    attributes: inherited,
                },
            );
        }
        self.coalesce();
    }

    /// Ensure a run boundary at `position`; returns the index of the first
    /// run starting at or after it.
    fn split_at(&mut self, position: usize) -> usize {
        let idx = self
            .runs
            .partition_point(|run| run.range.end() <= position);
        let Some(run) = self.runs.get(idx).copied() else {
            return idx;
        };
        if run.range.location >= position {
            return idx;
        }
        self.runs[idx].range = TextRange::new(run.range.location, position - run.range.location);
        self.runs.insert(
            idx + 1,
            AttributeRun {
                range: TextRange::new(position, run.range.end() - position),
                attributes: run.attributes,
            },
        );
        idx + 1
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<AttributeRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.range.is_empty() {
                continue;
            }
            match merged.last_mut() {
                Some(last)
                    if last.attributes == run.attributes
                        && last.range.end() == run.range.location =>
                {
                    last.range.length += run.range.length;
                }
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

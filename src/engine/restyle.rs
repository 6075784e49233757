//! Whole-buffer heading restyling.
//!
//! Every pass resets the buffer to body attributes and then paints each
//! heading line and its marker. Passes are cheap enough to run once per UI
//! turn, so there is no incremental diffing: edits only ask for a pass and
//! the pass reads whatever the buffer holds when it runs.
//!
//! State lives in [`Cell`]s so a host that calls back into the restyler from
//! inside [`StyleSurface::apply_attributes`] hits the re-entrancy guard
//! instead of a second pass.

use std::cell::Cell;

use tracing::{debug, trace};

use super::{EditNotification, StyleSurface, TextRange};
use crate::heading::{classify, lines};
use crate::theme::Theme;

#[derive(Debug)]
pub struct Restyler {
    theme: Theme,
    applying: Cell<bool>,
    scheduled: Cell<bool>,
    passes: Cell<u64>,
}

/// Clears the applying flag when a pass ends, however it ends.
struct ApplyingGuard<'a>(&'a Cell<bool>);

impl Drop for ApplyingGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Counts from a single restyle pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub lines: usize,
    pub headings: usize,
}

impl Restyler {
    pub const fn new(theme: Theme) -> Self {
        Self {
            theme,
            applying: Cell::new(false),
            scheduled: Cell::new(false),
            passes: Cell::new(0),
        }
    }

    pub const fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Whether a pass is waiting for the next UI turn.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled.get()
    }

    /// Whether a pass is currently writing attributes.
    pub fn is_applying(&self) -> bool {
        self.applying.get()
    }

    /// Number of passes that have actually run.
    pub fn passes(&self) -> u64 {
        self.passes.get()
    }

    /// Request a coalesced pass for `edit`.
    ///
    /// Returns `true` only when this call scheduled a new pass, i.e. the
    /// caller must enqueue one restyle task. Attribute-only edits and edits
    /// echoed while a pass is writing are ignored.
    pub fn on_edit(&self, edit: &EditNotification) -> bool {
        if !edit.touches_characters() || self.applying.get() {
            return false;
        }
        !self.scheduled.replace(true)
    }

    /// Run the pass requested by [`Restyler::on_edit`].
    pub fn run_scheduled<S: StyleSurface + ?Sized>(&self, surface: &mut S) -> Option<PassSummary> {
        if !self.scheduled.replace(false) {
            return None;
        }
        self.restyle_now(surface)
    }

    /// Restyle the whole buffer synchronously.
    ///
    /// Returns `None` if a pass is already in progress.
    pub fn restyle_now<S: StyleSurface + ?Sized>(&self, surface: &mut S) -> Option<PassSummary> {
        if self.applying.replace(true) {
            trace!("re-entrant restyle ignored");
            return None;
        }
        let _guard = ApplyingGuard(&self.applying);
        let _scope = crate::perf::scope("restyle.pass");

        let text = surface.text();
        let full = TextRange::new(0, surface.len_chars());
        surface.apply_attributes(full, &self.theme.base_attributes());

        let mut summary = PassSummary::default();
        for line in lines(&text) {
            summary.lines += 1;
            let Some(heading) = classify(line.text) else {
                continue;
            };
            summary.headings += 1;
            surface.apply_attributes(line.range, &self.theme.heading_attributes(heading.level));
            surface.apply_attributes(
                heading.marker_range(line.range.location),
                &self.theme.marker_attributes(heading.level),
            );
        }

        self.passes.set(self.passes.get() + 1);
        debug!(
            pass = self.passes.get(),
            chars = full.length,
            lines = summary.lines,
            headings = summary.headings,
            "restyled buffer"
        );
        Some(summary)
    }
}

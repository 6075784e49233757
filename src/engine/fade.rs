//! Typing glow: recently typed characters light up and fade out.
//!
//! The tracker keeps one [`FadeEntry`] per glowing char, ordered by position.
//! Edits rebase the entries synchronously; a repeating tick ages them and
//! publishes a [`RenderFrame`] until nothing is left to draw.

use std::time::{Duration, Instant};

use tracing::{debug, trace};

use super::tick::RepeatingTask;
use super::{EditNotification, EngineConfig, StyleSurface};

/// A glowing char and when it was typed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FadeEntry {
    pub position: usize,
    pub started_at: Instant,
}

/// One char of overlay to draw at `opacity` (0..=1).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeGlyph {
    pub position: usize,
    pub opacity: f32,
}

/// Everything the overlay should draw for one tick, ordered by position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderFrame {
    glyphs: Vec<FadeGlyph>,
}

impl RenderFrame {
    pub const fn empty() -> Self {
        Self { glyphs: Vec::new() }
    }

    pub fn glyphs(&self) -> &[FadeGlyph] {
        &self.glyphs
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    /// Opacity at `position`, if that char is glowing.
    pub fn opacity_at(&self, position: usize) -> Option<f32> {
        self.glyphs
            .binary_search_by_key(&position, |glyph| glyph.position)
            .ok()
            .map(|idx| self.glyphs[idx].opacity)
    }
}

impl FromIterator<FadeGlyph> for RenderFrame {
    fn from_iter<T: IntoIterator<Item = FadeGlyph>>(iter: T) -> Self {
        let mut glyphs: Vec<FadeGlyph> = iter.into_iter().collect();
        glyphs.sort_by_key(|glyph| glyph.position);
        Self { glyphs }
    }
}

/// Opacity of a glow `elapsed` into a fade of length `duration`.
///
/// Starts at exactly 1, decays as `(1 - progress)^exponent`, and is exactly 0
/// from `duration` on.
pub fn fade_opacity(elapsed: Duration, duration: Duration, exponent: f32) -> f32 {
    if duration.is_zero() {
        return 0.0;
    }
    let progress = elapsed.as_secs_f32() / duration.as_secs_f32();
    if progress >= 1.0 {
        0.0
    } else {
        (1.0 - progress).powf(exponent)
    }
}

/// Whether typing `ch` should glow.
///
/// Unicode whitespace and control characters never glow; everything else,
/// including non-ASCII letters, symbols and combining marks, does.
pub fn glows(ch: char) -> bool {
    !ch.is_whitespace() && !ch.is_control()
}

#[derive(Debug)]
pub struct FadeTracker {
    entries: Vec<FadeEntry>,
    tick: RepeatingTask,
    duration: Duration,
    exponent: f32,
    epsilon: f32,
    enabled: bool,
}

impl FadeTracker {
    pub const fn new(config: &EngineConfig) -> Self {
        Self {
            entries: Vec::new(),
            tick: RepeatingTask::new(config.tick_period),
            duration: config.fade_duration,
            exponent: config.fade_exponent,
            epsilon: config.opacity_epsilon,
            enabled: config.glow_enabled,
        }
    }

    pub fn entries(&self) -> &[FadeEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub const fn is_ticking(&self) -> bool {
        self.tick.is_active()
    }

    pub const fn next_tick(&self) -> Option<Instant> {
        self.tick.next_due()
    }

    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Apply an edit: rebase existing entries, register typed chars, and
    /// publish a fresh frame.
    pub fn on_edit<S: StyleSurface + ?Sized>(
        &mut self,
        edit: &EditNotification,
        surface: &mut S,
        now: Instant,
    ) {
        if !edit.touches_characters() {
            return;
        }
        self.rebase(edit);
        if self.enabled {
            let edited = edit.edited_range();
            if !edited.is_empty() {
                let typed = surface.text_in(edited);
                self.register(edited.location, &typed, now);
            }
        }

        if self.entries.is_empty() && edit.edited_range().is_empty() {
            self.stop_ticking();
            surface.set_render_frame(RenderFrame::empty());
            return;
        }
        if self.tick.start(now) {
            debug!(entries = self.entries.len(), "fade tick started");
            crate::perf::log_event("fade.tick.start", format!("entries={}", self.entries.len()));
        }
        let frame = self.advance(now, surface.len_chars());
        surface.set_render_frame(frame);
    }

    /// Shift entries past the edit by its delta and drop entries it replaced.
    pub fn rebase(&mut self, edit: &EditNotification) {
        let old = edit.old_range();
        let delta = edit.length_delta();
        self.entries.retain_mut(|entry| {
            if old.contains(entry.position) {
                return false;
            }
            if entry.position >= old.end() {
                match entry.position.checked_add_signed(delta) {
                    Some(position) => entry.position = position,
                    None => return false,
                }
            }
            true
        });
    }

    /// Start a fresh glow for each glowing char of `typed`, which begins at `location`.
    pub fn register(&mut self, location: usize, typed: &str, now: Instant) {
        let mut added = 0usize;
        for (offset, ch) in typed.chars().enumerate() {
            if !glows(ch) {
                continue;
            }
            let position = location + offset;
            let entry = FadeEntry {
                position,
                started_at: now,
            };
            match self
                .entries
                .binary_search_by_key(&position, |entry| entry.position)
            {
                Ok(idx) => self.entries[idx] = entry,
                Err(idx) => self.entries.insert(idx, entry),
            }
            added += 1;
        }
        if added > 0 {
            trace!(location, added, total = self.entries.len(), "registered glow");
        }
    }

    /// Run the tick if it is due. Returns whether a frame was published.
    pub fn poll_tick<S: StyleSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> bool {
        if !self.tick.poll(now) {
            return false;
        }
        self.tick_now(surface, now);
        true
    }

    /// Age every entry, publish the frame, and stop once nothing is visible.
    pub fn tick_now<S: StyleSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) {
        let frame = self.advance(now, surface.len_chars());
        if frame.is_empty() {
            // Whatever remains is below the visibility threshold.
            self.entries.clear();
            self.stop_ticking();
        }
        surface.set_render_frame(frame);
    }

    /// Drop expired or out-of-bounds entries and compute the visible frame.
    pub fn advance(&mut self, now: Instant, buffer_len: usize) -> RenderFrame {
        let (duration, exponent, epsilon) = (self.duration, self.exponent, self.epsilon);
        let mut glyphs = Vec::with_capacity(self.entries.len());
        self.entries.retain(|entry| {
            if entry.position >= buffer_len {
                return false;
            }
            let elapsed = now.saturating_duration_since(entry.started_at);
            let opacity = fade_opacity(elapsed, duration, exponent);
            if opacity <= 0.0 {
                return false;
            }
            if opacity >= epsilon {
                glyphs.push(FadeGlyph {
                    position: entry.position,
                    opacity,
                });
            }
            true
        });
        RenderFrame { glyphs }
    }

    fn stop_ticking(&mut self) {
        if self.tick.stop() {
            debug!("fade tick stopped");
            crate::perf::log_event("fade.tick.stop", "idle");
        }
    }
}

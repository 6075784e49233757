//! The style/animation engine.
//!
//! Two components react to every edit the host reports:
//! - [`Restyler`]: schedules a whole-buffer heading pass for the next UI turn,
//!   coalescing bursts of edits into one pass.
//! - [`FadeTracker`]: rebases glow entries synchronously and ticks them down.
//!
//! Everything runs on the host's UI thread. The engine owns a small task
//! queue standing in for the UI run loop; the host drains it with
//! [`StyleEngine::run_pending`] and sleeps until [`StyleEngine::next_wakeup`].

mod edit;
pub mod fade;
pub mod restyle;
mod surface;
pub mod tick;

#[cfg(test)]
pub(crate) mod test_support;

use std::collections::VecDeque;
use std::time::{Duration, Instant};

use tracing::debug;

pub use edit::{EditError, EditKind, EditNotification, TextRange};
pub use fade::{FadeEntry, FadeGlyph, FadeTracker, RenderFrame, fade_opacity};
pub use restyle::{PassSummary, Restyler};
pub use surface::StyleSurface;

use crate::theme::Theme;

/// Timing and glow settings, fixed for the life of an engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineConfig {
    pub fade_duration: Duration,
    pub tick_period: Duration,
    /// Exponent of the `(1 - progress)` decay curve.
    pub fade_exponent: f32,
    /// Opacities below this are not drawn.
    pub opacity_epsilon: f32,
    pub glow_enabled: bool,
}

impl EngineConfig {
    pub const DEFAULT_FADE: Duration = Duration::from_millis(280);
    pub const DEFAULT_TICK: Duration = Duration::from_micros(16_667);
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            fade_duration: Self::DEFAULT_FADE,
            tick_period: Self::DEFAULT_TICK,
            fade_exponent: 1.6,
            opacity_epsilon: 0.01,
            glow_enabled: true,
        }
    }
}

/// Work deferred to the next UI turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    Restyle,
}

#[derive(Debug, Default)]
pub struct TaskQueue {
    tasks: VecDeque<Task>,
}

impl TaskQueue {
    pub fn push(&mut self, task: Task) {
        self.tasks.push_back(task);
    }

    pub fn pop(&mut self) -> Option<Task> {
        self.tasks.pop_front()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

/// What one call to [`StyleEngine::run_pending`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Turn {
    pub restyles: usize,
    pub ticked: bool,
}

impl Turn {
    pub const fn did_work(&self) -> bool {
        self.restyles > 0 || self.ticked
    }
}

#[derive(Debug)]
pub struct StyleEngine {
    restyler: Restyler,
    fades: FadeTracker,
    queue: TaskQueue,
}

impl StyleEngine {
    pub const fn new(config: EngineConfig, theme: Theme) -> Self {
        Self {
            restyler: Restyler::new(theme),
            fades: FadeTracker::new(&config),
            queue: TaskQueue {
                tasks: VecDeque::new(),
            },
        }
    }

    pub const fn theme(&self) -> &Theme {
        self.restyler.theme()
    }

    pub const fn restyler(&self) -> &Restyler {
        &self.restyler
    }

    pub const fn fades(&self) -> &FadeTracker {
        &self.fades
    }

    pub fn pending_tasks(&self) -> usize {
        self.queue.len()
    }

    /// Style whatever the surface holds when it is first created.
    pub fn request_initial_styling<S: StyleSurface + ?Sized>(&mut self, surface: &mut S) {
        if let Some(summary) = self.restyler.restyle_now(surface) {
            debug!(headings = summary.headings, "initial styling applied");
        }
    }

    /// Forward one edit to both components.
    ///
    /// Fade state is updated before this returns; the restyle only runs on
    /// the next [`StyleEngine::run_pending`].
    pub fn notify_edit<S: StyleSurface + ?Sized>(
        &mut self,
        edit: &EditNotification,
        surface: &mut S,
        now: Instant,
    ) {
        self.fades.on_edit(edit, surface, now);
        if self.restyler.on_edit(edit) {
            self.queue.push(Task::Restyle);
        }
    }

    /// Run one UI turn: every task queued before this call, then the fade
    /// tick if it is due.
    pub fn run_pending<S: StyleSurface + ?Sized>(&mut self, surface: &mut S, now: Instant) -> Turn {
        let mut turn = Turn::default();
        for _ in 0..self.queue.len() {
            let Some(task) = self.queue.pop() else {
                break;
            };
            match task {
                Task::Restyle => {
                    if self.restyler.run_scheduled(surface).is_some() {
                        turn.restyles += 1;
                    }
                }
            }
        }
        turn.ticked = self.fades.poll_tick(surface, now);
        turn
    }

    /// When the host should next call [`StyleEngine::run_pending`].
    ///
    /// `Some(now)` when tasks are queued, the next tick deadline while a glow
    /// is animating, `None` when idle.
    pub fn next_wakeup(&self, now: Instant) -> Option<Instant> {
        if self.queue.is_empty() {
            self.fades.next_tick()
        } else {
            Some(now)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::RecordingSurface;
    use super::*;

    fn engine() -> StyleEngine {
        StyleEngine::new(EngineConfig::default(), Theme::nopad())
    }

    #[test]
    fn test_edits_coalesce_into_one_pass() {
        let now = Instant::now();
        let mut engine = engine();
        let mut surface = RecordingSurface::new("");

        for (idx, ch) in "# a".chars().enumerate() {
            surface.text.push(ch);
            engine.notify_edit(&EditNotification::insertion(idx, 1), &mut surface, now);
        }
        assert_eq!(engine.pending_tasks(), 1);
        assert_eq!(engine.restyler().passes(), 0);
        assert!(surface.writes.is_empty());

        let turn = engine.run_pending(&mut surface, now);
        assert_eq!(turn.restyles, 1);
        assert_eq!(engine.restyler().passes(), 1);
        let theme = Theme::nopad();
        assert_eq!(
            surface.writes,
            vec![
                (TextRange::new(0, 3), theme.base_attributes()),
                (TextRange::new(0, 3), theme.heading_attributes(1)),
                (TextRange::new(0, 1), theme.marker_attributes(1)),
            ]
        );
    }

    #[test]
    fn test_pass_reads_buffer_at_run_time() {
        let now = Instant::now();
        let mut engine = engine();
        let mut surface = RecordingSurface::new("x");
        engine.notify_edit(&EditNotification::insertion(0, 1), &mut surface, now);
        // The buffer changes again without a notification reaching the engine yet.
        surface.text = "## late".to_string();
        engine.run_pending(&mut surface, now);
        assert_eq!(surface.writes[0].0, TextRange::new(0, 7));
        assert_eq!(surface.writes.len(), 3);
    }

    #[test]
    fn test_fade_frame_is_published_synchronously() {
        let now = Instant::now();
        let mut engine = engine();
        let mut surface = RecordingSurface::new("a");
        engine.notify_edit(&EditNotification::insertion(0, 1), &mut surface, now);
        assert_eq!(surface.last_frame().unwrap().opacity_at(0), Some(1.0));
    }

    #[test]
    fn test_next_wakeup_tracks_queue_and_tick() {
        let now = Instant::now();
        let mut engine = engine();
        assert_eq!(engine.next_wakeup(now), None);

        let mut surface = RecordingSurface::new("a");
        engine.notify_edit(&EditNotification::insertion(0, 1), &mut surface, now);
        assert_eq!(engine.next_wakeup(now), Some(now));

        engine.run_pending(&mut surface, now);
        assert_eq!(
            engine.next_wakeup(now),
            Some(now + EngineConfig::DEFAULT_TICK)
        );
    }

    #[test]
    fn test_engine_goes_idle_after_fade() {
        let start = Instant::now();
        let mut engine = engine();
        let mut surface = RecordingSurface::new("a");
        engine.notify_edit(&EditNotification::insertion(0, 1), &mut surface, start);

        let mut now = start;
        let mut turns = 0;
        while let Some(wake) = engine.next_wakeup(now) {
            now = wake;
            engine.run_pending(&mut surface, now);
            turns += 1;
            assert!(turns < 100, "engine never went idle");
        }
        assert!(engine.fades().is_empty());
        assert!(surface.last_frame().unwrap().is_empty());
        assert!(now >= start + EngineConfig::DEFAULT_FADE - EngineConfig::DEFAULT_TICK);
    }

    #[test]
    fn test_initial_styling_runs_immediately() {
        let mut engine = engine();
        let mut surface = RecordingSurface::new("# hello");
        engine.request_initial_styling(&mut surface);
        assert_eq!(engine.restyler().passes(), 1);
        assert_eq!(engine.pending_tasks(), 0);
    }

    #[test]
    fn test_attribute_echo_does_not_schedule() {
        let now = Instant::now();
        let mut engine = engine();
        let mut surface = RecordingSurface::new("abc");
        engine.notify_edit(
            &EditNotification::attributes(TextRange::new(0, 3)),
            &mut surface,
            now,
        );
        assert_eq!(engine.pending_tasks(), 0);
    }
}

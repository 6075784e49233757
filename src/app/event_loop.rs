use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::editor::NoteBuffer;

/// Longest the loop blocks on input when the engine has nothing scheduled.
const IDLE_POLL: Duration = Duration::from_secs(60);
const RESIZE_POLL: Duration = Duration::from_millis(10);

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// How long to wait for input before the engine or the debouncer needs the
/// loop again.
pub(super) fn poll_timeout(now: Instant, wakeup: Option<Instant>, resize_pending: bool) -> Duration {
    let mut timeout = IDLE_POLL;
    if let Some(at) = wakeup {
        timeout = timeout.min(at.saturating_duration_since(now));
    }
    if resize_pending {
        timeout = timeout.min(RESIZE_POLL);
    }
    timeout
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal; nopad requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);

        let buffer = NoteBuffer::new(&self.text, self.theme.base_attributes());
        let mut model = Model::new(
            buffer,
            self.engine_config,
            self.theme.clone(),
            (size.width, size.height),
        )
        .with_file_path(self.file_path.clone());
        crate::perf::log_event(
            "init.model",
            format!(
                "terminal={}x{} chars={} lines={}",
                size.width,
                size.height,
                self.text.chars().count(),
                model.buffer.line_count()
            ),
        );

        let result = execute!(stdout(), EnableMouseCapture, EnableBracketedPaste)
            .context("Failed to enable mouse and paste capture")
            .and_then(|()| Self::event_loop(&mut terminal, &mut model));

        // Restore terminal
        let _ = execute!(stdout(), DisableBracketedPaste, DisableMouseCapture);
        ratatui::restore();

        result
    }

    fn event_loop(terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                *model = update(
                    std::mem::take(model),
                    Message::Resize(width, height),
                    Instant::now(),
                );
                needs_render = true;
            }

            // The engine's UI turn: queued restyles, then the fade tick if due.
            let turn = model.run_engine(Instant::now());
            if turn.did_work() {
                needs_render = true;
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| Self::view(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} restyles={} ticked={} glowing={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        turn.restyles,
                        turn.ticked,
                        model.buffer.overlay().len()
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }

            let now = Instant::now();
            let timeout = poll_timeout(
                now,
                model.engine.next_wakeup(now),
                resize_debouncer.is_pending(),
            );
            if event::poll(timeout)? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    *model = update(std::mem::take(model), msg, Instant::now());
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        *model = update(std::mem::take(model), msg, Instant::now());
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }
        }
        Ok(())
    }
}

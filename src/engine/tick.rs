//! A cancellable repeating task driven by the host's clock.
//!
//! The handle does not own a thread or timer. The host asks when the next
//! tick is due and polls it; the task never fires while stopped.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub struct RepeatingTask {
    period: Duration,
    next_due: Option<Instant>,
}

impl RepeatingTask {
    pub const fn new(period: Duration) -> Self {
        Self {
            period,
            next_due: None,
        }
    }

    pub const fn is_active(&self) -> bool {
        self.next_due.is_some()
    }

    /// Start ticking one period after `now`. Returns `false` if already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.next_due.is_some() {
            return false;
        }
        self.next_due = Some(now + self.period);
        true
    }

    /// Stop ticking. Returns `false` if already stopped.
    pub fn stop(&mut self) -> bool {
        self.next_due.take().is_some()
    }

    /// When the next tick fires, if running.
    pub const fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Consume a due tick.
    ///
    /// Missed periods collapse into one tick; the schedule realigns to `now`
    /// rather than firing a burst to catch up.
    pub fn poll(&mut self, now: Instant) -> bool {
        let Some(due) = self.next_due else {
            return false;
        };
        if now < due {
            return false;
        }
        let mut next = due + self.period;
        if next <= now {
            next = now + self.period;
        }
        self.next_due = Some(next);
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PERIOD: Duration = Duration::from_millis(16);

    #[test]
    fn test_new_task_is_stopped() {
        let task = RepeatingTask::new(PERIOD);
        assert!(!task.is_active());
        assert_eq!(task.next_due(), None);
    }

    #[test]
    fn test_start_and_stop_are_idempotent() {
        let now = Instant::now();
        let mut task = RepeatingTask::new(PERIOD);
        assert!(task.start(now));
        assert!(!task.start(now + PERIOD));
        assert_eq!(task.next_due(), Some(now + PERIOD));
        assert!(task.stop());
        assert!(!task.stop());
        assert!(!task.is_active());
    }

    #[test]
    fn test_poll_fires_only_when_due() {
        let now = Instant::now();
        let mut task = RepeatingTask::new(PERIOD);
        task.start(now);
        assert!(!task.poll(now + Duration::from_millis(5)));
        assert!(task.poll(now + PERIOD));
        assert_eq!(task.next_due(), Some(now + PERIOD * 2));
    }

    #[test]
    fn test_poll_collapses_missed_ticks() {
        let now = Instant::now();
        let mut task = RepeatingTask::new(PERIOD);
        task.start(now);
        let late = now + PERIOD * 10;
        assert!(task.poll(late));
        assert!(!task.poll(late));
        assert_eq!(task.next_due(), Some(late + PERIOD));
    }

    #[test]
    fn test_stopped_task_never_fires() {
        let now = Instant::now();
        let mut task = RepeatingTask::new(PERIOD);
        assert!(!task.poll(now + PERIOD * 100));
    }
}

//! Wall-clock driven tick counter.
//!
//! Hosts deliver tick callbacks late or in bursts. Progress is always
//! derived from elapsed wall time rather than from the number of callbacks
//! received, so a slow host skips frames instead of slowing the motion.

use web_time::{Duration, Instant};

/// Drift-compensated animation clock with pause accounting.
#[derive(Debug, Clone, Copy)]
pub struct TickClock {
    /// When the animation started.
    start_time: Instant,
    /// Wall-clock length of one step.
    step: Duration,
    /// Total time spent paused, excluding a pause still in progress.
    paused_total: Duration,
    /// Start of the current pause.
    paused_since: Option<Instant>,
}

impl TickClock {
    /// Clock starting now.
    #[must_use]
    pub fn new(step: Duration) -> Self {
        Self::with_start_time(Instant::now(), step)
    }

    /// Clock with an explicit start time.
    #[must_use]
    pub fn with_start_time(start_time: Instant, step: Duration) -> Self {
        Self {
            start_time,
            step: step.max(Duration::from_millis(1)),
            paused_total: Duration::ZERO,
            paused_since: None,
        }
    }

    /// When the clock started.
    #[must_use]
    pub fn start_time(&self) -> Instant {
        self.start_time
    }

    /// Length of one step.
    #[must_use]
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Enter or leave the paused state. Time spent paused does not count
    /// toward progress.
    pub fn set_paused(&mut self, paused: bool, now: Instant) {
        match (paused, self.paused_since) {
            (true, None) => self.paused_since = Some(now),
            (false, Some(since)) => {
                self.paused_total += now.saturating_duration_since(since);
                self.paused_since = None;
            }
            _ => {}
        }
    }

    /// Whether the clock is paused.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused_since.is_some()
    }

    /// Active (unpaused) time since the start.
    #[must_use]
    pub fn elapsed(&self, now: Instant) -> Duration {
        let wall = now.saturating_duration_since(self.start_time);
        let current_pause = self
            .paused_since
            .map_or(Duration::ZERO, |since| now.saturating_duration_since(since));
        wall.saturating_sub(self.paused_total)
            .saturating_sub(current_pause)
    }

    /// Whole steps elapsed at `now`.
    #[must_use]
    pub fn elapsed_ticks(&self, now: Instant) -> u32 {
        let ticks = self.elapsed(now).as_nanos() / self.step.as_nanos();
        u32::try_from(ticks).unwrap_or(u32::MAX)
    }
}

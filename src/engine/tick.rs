//! Tick loop, auto-close, and shutdown for DoorEngine

use web_time::{Duration, Instant};

use super::{AutoClose, DoorEngine, ToggleIntent, ToggleRequest};
use crate::animation::{CommitReason, CommitReport, TickStatus};
use crate::context::Context;

impl DoorEngine {
    /// Advance every running animation. Call once per host tick.
    pub fn tick(&self, ctx: &mut Context<'_>) -> Vec<CommitReport> {
        self.tick_at(ctx, Instant::now())
    }

    /// [`DoorEngine::tick`] at an explicit time. Returns the commits that
    /// happened during this tick.
    pub fn tick_at(&self, ctx: &mut Context<'_>, now: Instant) -> Vec<CommitReport> {
        let mut reports = Vec::new();
        self.sessions()
            .retain_mut(|session| match session.tick(ctx, &self.registry, now) {
                TickStatus::Running => true,
                TickStatus::Committed(report) => {
                    reports.push(report);
                    false
                }
                TickStatus::Finished => false,
            });
        for report in &reports {
            self.schedule_auto_close(report, now);
        }
        self.run_auto_close(ctx, now);
        reports
    }

    /// Stop accepting toggles, commit every running animation at its
    /// destination, and drop pending reservations and auto-closes.
    pub fn shutdown(&self, ctx: &mut Context<'_>) -> Vec<CommitReport> {
        self.registry.set_runnable(false);
        let cancelled = self.registry.cancel_all(true);
        let sessions = std::mem::take(&mut *self.sessions());
        if !sessions.is_empty() {
            log::warn!(
                "shutting down with {} animations in flight ({cancelled} cancelled)",
                sessions.len(),
            );
        }
        self.auto_close().clear();
        sessions
            .into_iter()
            .filter_map(|mut session| {
                session.finish(ctx, &self.registry, CommitReason::Cancelled)
            })
            .collect()
    }

    /// Queue an automatic close for a structure that just opened.
    pub(super) fn schedule_auto_close(&self, report: &CommitReport, now: Instant) {
        let structure = &report.structure;
        if !structure.is_open || structure.auto_close_delay < 0 {
            return;
        }
        if !matches!(report.reason, CommitReason::Completed | CommitReason::Instant) {
            return;
        }
        let delay = Duration::from_secs(u64::from(structure.auto_close_delay.unsigned_abs()));
        log::debug!("{}: closing again in {delay:?}", structure.id);
        self.auto_close().push(AutoClose {
            due: now + delay,
            door_id: structure.id,
        });
    }

    fn run_auto_close(&self, ctx: &mut Context<'_>, now: Instant) {
        let due: Vec<AutoClose> = {
            let mut pending = self.auto_close();
            let (due, waiting): (Vec<_>, Vec<_>) =
                pending.drain(..).partition(|entry| entry.due <= now);
            *pending = waiting;
            due
        };
        for entry in due {
            let request = ToggleRequest::new(entry.door_id)
                .with_intent(ToggleIntent::Close);
            let outcome = self.request_toggle_at(ctx, &request, now);
            if !outcome.is_success() {
                log::debug!("{}: auto-close skipped: {outcome}", entry.door_id);
            }
        }
    }
}

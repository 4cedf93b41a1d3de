use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use web_time::Duration;

/// Tick scheduling and animation duration bounds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Timing", inline)]
#[serde(default)]
pub struct TimingOptions {
    /// Length of one host tick in milliseconds.
    #[schemars(title = "Tick Length (ms)", range(min = 1, max = 1000))]
    pub tick_millis: u64,
    /// Host ticks between two animation callbacks.
    #[schemars(title = "Tick Rate", range(min = 1, max = 20))]
    pub tick_rate: u32,
    /// Sessions running longer than `planned ticks × multiplier` are
    /// finalized.
    #[schemars(title = "Timeout Multiplier", range(min = 1.0, max = 10.0), extend("step" = 0.1))]
    pub tolerance_multiplier: f32,
    /// Fastest a single cell may travel, in cells per second.
    #[schemars(title = "Max Cell Speed", range(min = 0.5, max = 100.0), extend("step" = 0.5))]
    pub max_cell_speed: f32,
    /// Shortest accepted duration hint.
    #[schemars(skip)]
    pub min_duration_secs: f32,
    /// Longest accepted duration hint.
    #[schemars(skip)]
    pub max_duration_secs: f32,
}

impl TimingOptions {
    /// Wall-clock length of one animation step (`tick_millis × tick_rate`).
    #[must_use]
    pub fn step_duration(&self) -> Duration {
        Duration::from_millis(self.tick_millis.max(1) * u64::from(self.tick_rate.max(1)))
    }

    /// Number of animation steps needed to cover `secs`, at least one.
    #[must_use]
    pub fn ticks_for(&self, secs: f32) -> u32 {
        let step = self.step_duration().as_secs_f32();
        ((secs / step).ceil() as u32).max(1)
    }

    /// Effective duration for a hint, clamped to the configured bounds and
    /// lengthened so no cell exceeds `max_cell_speed` over `max_travel`
    /// cells.
    #[must_use]
    pub fn effective_duration_secs(&self, hint: f32, max_travel: f32) -> f32 {
        // Not `clamp`: a misconfigured min above max must not panic.
        let clamped = hint.max(self.min_duration_secs).min(self.max_duration_secs);
        if self.max_cell_speed > 0.0 {
            clamped.max(max_travel / self.max_cell_speed)
        } else {
            clamped
        }
    }
}

impl Default for TimingOptions {
    fn default() -> Self {
        Self {
            tick_millis: 50,
            tick_rate: 1,
            tolerance_multiplier: 1.5,
            max_cell_speed: 8.0,
            min_duration_secs: 0.5,
            max_duration_secs: 30.0,
        }
    }
}

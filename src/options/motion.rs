use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Proxy steering and side effects during an animation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Motion", inline)]
#[serde(default)]
pub struct MotionOptions {
    /// Scale from positional error to proxy velocity.
    #[schemars(title = "Damping", range(min = 0.01, max = 1.0), extend("step" = 0.01))]
    pub damping_factor: f32,
    /// Ticks between two "moving" sound cues (0 = never).
    #[schemars(title = "Sound Interval", range(min = 0, max = 100))]
    pub sound_interval_ticks: u32,
    /// Radius around the anchor in which fixtures are broken before a
    /// structure moves.
    #[schemars(skip)]
    pub obstacle_clear_radius: f32,
}

impl Default for MotionOptions {
    fn default() -> Self {
        Self {
            damping_factor: 0.1,
            sound_interval_ticks: 10,
            obstacle_clear_radius: 1.5,
        }
    }
}

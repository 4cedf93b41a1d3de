//! Centralized configuration with TOML support.
//!
//! All tweakable settings (limits, timing, proxy motion, per-family
//! switches) are consolidated here. Options serialize to/from TOML so a host
//! can keep them next to its own config.

mod families;
mod limits;
mod motion;
mod timing;

use std::path::Path;

pub use families::{FamiliesOptions, FamilyOptions};
pub use limits::LimitsOptions;
pub use motion::MotionOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use timing::TimingOptions;

use crate::error::DrawbridgeError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[timing]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Size and travel limits.
    pub limits: LimitsOptions,
    /// Tick scheduling and duration bounds.
    pub timing: TimingOptions,
    /// Proxy steering and side effects.
    pub motion: MotionOptions,
    /// Per-family switches and default durations.
    pub families: FamiliesOptions,
}

impl Options {
    /// Generate JSON Schema describing the operator-facing options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, DrawbridgeError> {
        let content = std::fs::read_to_string(path).map_err(DrawbridgeError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    pub fn from_toml(content: &str) -> Result<Self, DrawbridgeError> {
        toml::from_str(content)
            .map_err(|e| DrawbridgeError::OptionsParse(e.to_string()))
    }

    /// Update a single field, as sent by an operator console:
    /// `section.field = value`. Unknown paths and mistyped values are
    /// rejected and leave the options unchanged.
    pub fn set_field(
        &mut self,
        section: &str,
        field: &str,
        value: serde_json::Value,
    ) -> Result<(), DrawbridgeError> {
        let mut root = serde_json::to_value(&*self)
            .map_err(|e| DrawbridgeError::OptionsParse(e.to_string()))?;
        let slot = root
            .get_mut(section)
            .and_then(|s| s.get_mut(field))
            .ok_or_else(|| {
                DrawbridgeError::OptionsParse(format!("unknown option {section}.{field}"))
            })?;
        *slot = value;
        *self = serde_json::from_value(root)
            .map_err(|e| DrawbridgeError::OptionsParse(e.to_string()))?;
        Ok(())
    }

    /// Save options to a TOML file (pretty-printed).
    pub fn save(&self, path: &Path) -> Result<(), DrawbridgeError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| DrawbridgeError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(DrawbridgeError::Io)?;
        }
        std::fs::write(path, content).map_err(DrawbridgeError::Io)
    }
}

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::structure::Family;

/// Settings for one structure family.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(inline)]
#[serde(default)]
pub struct FamilyOptions {
    /// Whether structures of this family may be toggled at all.
    #[schemars(title = "Enabled")]
    pub enabled: bool,
    /// Animation length when the request carries no duration hint.
    /// Unset means the family's built-in length.
    #[schemars(title = "Default Duration (s)", range(min = 0.5, max = 30.0), extend("step" = 0.5))]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_duration_secs: Option<f32>,
}

impl Default for FamilyOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            default_duration_secs: None,
        }
    }
}

/// Per-family settings table.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Families", inline)]
#[serde(default)]
pub struct FamiliesOptions {
    /// Drawbridges.
    pub hinge: FamilyOptions,
    /// Rotating gates.
    pub cylinder: FamilyOptions,
    /// Portcullises.
    pub portcullis: FamilyOptions,
    /// Sliding panels.
    pub slider: FamilyOptions,
    /// Elevators.
    pub elevator: FamilyOptions,
}

impl FamiliesOptions {
    /// Settings for `family`.
    #[must_use]
    pub fn get(&self, family: Family) -> &FamilyOptions {
        match family {
            Family::Hinge => &self.hinge,
            Family::Cylinder => &self.cylinder,
            Family::Portcullis => &self.portcullis,
            Family::Slider => &self.slider,
            Family::Elevator => &self.elevator,
        }
    }

    /// Animation length for `family` when the request carries no hint.
    #[must_use]
    pub fn default_duration_secs(&self, family: Family) -> f32 {
        self.get(family)
            .default_duration_secs
            .unwrap_or_else(|| builtin_duration_secs(family))
    }

    /// Mutable settings for `family`.
    pub fn get_mut(&mut self, family: Family) -> &mut FamilyOptions {
        match family {
            Family::Hinge => &mut self.hinge,
            Family::Cylinder => &mut self.cylinder,
            Family::Portcullis => &mut self.portcullis,
            Family::Slider => &mut self.slider,
            Family::Elevator => &mut self.elevator,
        }
    }
}

fn builtin_duration_secs(family: Family) -> f32 {
    match family {
        Family::Hinge | Family::Cylinder => 4.0,
        Family::Portcullis | Family::Slider => 3.0,
        Family::Elevator => 5.0,
    }
}

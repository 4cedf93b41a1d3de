use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Size and travel limits applied before any structure moves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Limits", inline)]
#[serde(default)]
pub struct LimitsOptions {
    /// Global cell-count limit per structure (`<= 0` = unlimited).
    #[schemars(title = "Max Structure Size")]
    pub max_structure_size: i64,
    /// Longest travel distance for sliding and vertical families.
    #[schemars(title = "Max Blocks To Move", range(min = 1))]
    pub max_blocks_to_move: u32,
    /// Host material ids that are never captured or displaced.
    #[schemars(skip)]
    pub immovable_materials: Vec<u16>,
}

impl LimitsOptions {
    /// Effective size limit given an actor-specific one: the smaller of the
    /// two, ignoring unlimited (`<= 0`) values. `None` means unlimited.
    #[must_use]
    pub fn effective_size_limit(&self, actor_limit: Option<i64>) -> Option<u64> {
        [Some(self.max_structure_size), actor_limit]
            .into_iter()
            .flatten()
            .filter(|limit| *limit > 0)
            .map(|limit| limit as u64)
            .min()
    }

    /// Whether cells of this host material stay where they are.
    #[must_use]
    pub fn is_immovable(&self, host_id: u16) -> bool {
        self.immovable_materials.contains(&host_id)
    }
}

impl Default for LimitsOptions {
    fn default() -> Self {
        Self {
            max_structure_size: 500,
            max_blocks_to_move: 100,
            immovable_materials: Vec::new(),
        }
    }
}

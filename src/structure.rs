//! The persistent structure ("door") record.

use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};

use crate::geometry::{Cuboid, Direction, Face};

/// Unique id of a structure.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct StructureId(pub u64);

impl fmt::Display for StructureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The fixed set of structure kinds, each with its own geometry and
/// trajectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Family {
    /// Drawbridge rotating a quarter turn about a horizontal hinge.
    Hinge,
    /// Gate rotating a quarter turn about a vertical axis.
    Cylinder,
    /// Vertically sliding portcullis.
    Portcullis,
    /// Horizontally sliding panel.
    Slider,
    /// Vertical elevator.
    Elevator,
}

impl Family {
    /// Every family, in table order.
    pub const ALL: [Family; 5] = [
        Family::Hinge,
        Family::Cylinder,
        Family::Portcullis,
        Family::Slider,
        Family::Elevator,
    ];

    /// Short lowercase name, as used in config sections.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hinge => "hinge",
            Self::Cylinder => "cylinder",
            Self::Portcullis => "portcullis",
            Self::Slider => "slider",
            Self::Elevator => "elevator",
        }
    }

    /// Whether the family moves cells along arcs rather than straight lines.
    #[must_use]
    pub fn is_rotational(self) -> bool {
        matches!(self, Self::Hinge | Self::Cylinder)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A toggleable multi-cell structure.
///
/// Only the owning animation session writes `bounds`, `anchor_side`,
/// `open_direction` and `is_open`, and only on commit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Structure {
    /// Unique id.
    pub id: StructureId,
    /// Structure kind.
    pub family: Family,
    /// Bounding volume of the structure's cells.
    pub bounds: Cuboid,
    /// Pivot / engine cell.
    pub anchor: IVec3,
    /// Face of the cuboid the anchor sits on (hinge families).
    pub anchor_side: Option<Face>,
    /// Whether the structure is currently open.
    pub is_open: bool,
    /// Whether toggling is refused.
    pub is_locked: bool,
    /// Configured opening direction, if any.
    pub open_direction: Option<Direction>,
    /// Travel distance override for linear families (0 = auto-detect).
    pub blocks_to_move: i32,
    /// Seconds before an automatic close, if enabled (negative = disabled).
    pub auto_close_delay: i32,
}

impl Structure {
    /// Closed, unlocked structure with no configured direction.
    #[must_use]
    pub fn new(
        id: StructureId,
        family: Family,
        bounds: Cuboid,
        anchor: IVec3,
    ) -> Self {
        Self {
            id,
            family,
            bounds,
            anchor,
            anchor_side: None,
            is_open: false,
            is_locked: false,
            open_direction: None,
            blocks_to_move: 0,
            auto_close_delay: -1,
        }
    }

    /// Builder-style: set the opening direction.
    #[must_use]
    pub fn with_open_direction(mut self, direction: Direction) -> Self {
        self.open_direction = Some(direction);
        self
    }

    /// Builder-style: set the anchor side.
    #[must_use]
    pub fn with_anchor_side(mut self, side: Face) -> Self {
        self.anchor_side = Some(side);
        self
    }

    /// Builder-style: set the travel distance override.
    #[must_use]
    pub fn with_blocks_to_move(mut self, blocks: i32) -> Self {
        self.blocks_to_move = blocks;
        self
    }

    /// Number of cells in the bounding volume.
    #[must_use]
    pub fn cell_count(&self) -> u64 {
        self.bounds.volume()
    }
}

//! Cell contents: materials, orientations, and how orientations rotate.

use serde::{Deserialize, Serialize};

use crate::geometry::{Axis, Face, QuarterTurn};

/// What occupies a cell.
///
/// Host material ids are opaque to this crate; only the coarse class
/// matters for passability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Material {
    /// Empty cell.
    Air,
    /// Flowing or still liquid.
    Liquid(u16),
    /// Non-colliding decoration (grass, flowers, torches).
    Decoration(u16),
    /// Anything solid.
    Solid(u16),
}

impl Material {
    /// Whether the cell is empty.
    #[must_use]
    pub fn is_air(self) -> bool {
        matches!(self, Self::Air)
    }

    /// Whether the cell holds a liquid.
    #[must_use]
    pub fn is_liquid(self) -> bool {
        matches!(self, Self::Liquid(_))
    }

    /// Air or liquid: the strictest notion of "free".
    #[must_use]
    pub fn is_air_or_liquid(self) -> bool {
        self.is_air() || self.is_liquid()
    }

    /// Host id, if the material has one.
    #[must_use]
    pub fn host_id(self) -> Option<u16> {
        match self {
            Self::Air => None,
            Self::Liquid(id) | Self::Decoration(id) | Self::Solid(id) => {
                Some(id)
            }
        }
    }
}

/// Shape of a rail-like connector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum RailShape {
    NorthSouth,
    EastWest,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
    AscendingNorth,
    AscendingEast,
    AscendingSouth,
    AscendingWest,
}

impl RailShape {
    /// Shape after one clockwise (seen from above) quarter turn.
    #[must_use]
    pub fn clockwise(self) -> Self {
        match self {
            Self::NorthSouth => Self::EastWest,
            Self::EastWest => Self::NorthSouth,
            Self::NorthEast => Self::SouthEast,
            Self::SouthEast => Self::SouthWest,
            Self::SouthWest => Self::NorthWest,
            Self::NorthWest => Self::NorthEast,
            Self::AscendingNorth => Self::AscendingEast,
            Self::AscendingEast => Self::AscendingSouth,
            Self::AscendingSouth => Self::AscendingWest,
            Self::AscendingWest => Self::AscendingNorth,
        }
    }

    /// Shape after one counter-clockwise quarter turn.
    #[must_use]
    pub fn counter_clockwise(self) -> Self {
        match self {
            Self::NorthSouth => Self::EastWest,
            Self::EastWest => Self::NorthSouth,
            Self::NorthEast => Self::NorthWest,
            Self::NorthWest => Self::SouthWest,
            Self::SouthWest => Self::SouthEast,
            Self::SouthEast => Self::NorthEast,
            Self::AscendingNorth => Self::AscendingWest,
            Self::AscendingWest => Self::AscendingSouth,
            Self::AscendingSouth => Self::AscendingEast,
            Self::AscendingEast => Self::AscendingNorth,
        }
    }
}

/// Orientation data attached to a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Orientation {
    /// Orientation-free block.
    #[default]
    None,
    /// Pillar-like block aligned with an axis (logs, chains).
    Axis(Axis),
    /// Block facing one of the six faces (stairs, observers).
    Facing(Face),
    /// Rail-like connector.
    Rail(RailShape),
}

impl Orientation {
    /// Orientation after the block is carried through `turn`.
    ///
    /// Rails only connect horizontally, so turns about a horizontal axis
    /// leave them unchanged.
    #[must_use]
    pub fn rotated(self, turn: QuarterTurn) -> Self {
        match self {
            Self::None => Self::None,
            Self::Axis(axis) => Self::Axis(rotate_axis(axis, turn.axis)),
            Self::Facing(face) => Self::Facing(turn.apply_face(face)),
            Self::Rail(shape) => match (turn.axis, turn.positive) {
                // Right-handed about +y is counter-clockwise from above.
                (Axis::Y, true) => Self::Rail(shape.counter_clockwise()),
                (Axis::Y, false) => Self::Rail(shape.clockwise()),
                _ => Self::Rail(shape),
            },
        }
    }
}

/// Block axis after a quarter turn about `about`: the two axes
/// perpendicular to the turn swap, the turn axis stays.
fn rotate_axis(axis: Axis, about: Axis) -> Axis {
    match (about, axis) {
        (Axis::X, Axis::Y) | (Axis::Y, Axis::X) => Axis::Z,
        (Axis::X, Axis::Z) | (Axis::Z, Axis::X) => Axis::Y,
        (Axis::Y, Axis::Z) | (Axis::Z, Axis::Y) => Axis::X,
        (_, same) => same,
    }
}

/// A material together with its orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockState {
    /// Cell material.
    pub material: Material,
    /// Orientation data.
    pub orientation: Orientation,
}

impl BlockState {
    /// The empty cell.
    pub const AIR: Self = Self {
        material: Material::Air,
        orientation: Orientation::None,
    };

    /// Orientation-free block.
    #[must_use]
    pub fn plain(material: Material) -> Self {
        Self {
            material,
            orientation: Orientation::None,
        }
    }

    /// Oriented block.
    #[must_use]
    pub fn oriented(material: Material, orientation: Orientation) -> Self {
        Self {
            material,
            orientation,
        }
    }

    /// Block after being carried through `turn`.
    #[must_use]
    pub fn rotated(self, turn: QuarterTurn) -> Self {
        Self {
            material: self.material,
            orientation: self.orientation.rotated(turn),
        }
    }
}

//! Compass faces, axes, and the open/close directions structures move in.
//!
//! World convention: `+x` is east, `+y` is up, `+z` is south.

use std::fmt;

use glam::IVec3;
use serde::{Deserialize, Serialize};

/// One of the three grid axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    /// East-west.
    X,
    /// Vertical.
    Y,
    /// North-south.
    Z,
}

impl Axis {
    /// Unit vector along the positive end of the axis.
    #[must_use]
    pub fn unit(self) -> IVec3 {
        match self {
            Self::X => IVec3::X,
            Self::Y => IVec3::Y,
            Self::Z => IVec3::Z,
        }
    }

    /// Component of `v` along this axis.
    #[must_use]
    pub fn component(self, v: IVec3) -> i32 {
        match self {
            Self::X => v.x,
            Self::Y => v.y,
            Self::Z => v.z,
        }
    }
}

/// One of the six faces of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    /// `-z`
    North,
    /// `+x`
    East,
    /// `+z`
    South,
    /// `-x`
    West,
    /// `+y`
    Up,
    /// `-y`
    Down,
}

impl Face {
    /// The four horizontal faces in probing order.
    pub const COMPASS: [Face; 4] =
        [Face::North, Face::East, Face::South, Face::West];

    /// Outward unit normal.
    #[must_use]
    pub fn normal(self) -> IVec3 {
        match self {
            Self::North => IVec3::NEG_Z,
            Self::East => IVec3::X,
            Self::South => IVec3::Z,
            Self::West => IVec3::NEG_X,
            Self::Up => IVec3::Y,
            Self::Down => IVec3::NEG_Y,
        }
    }

    /// Face whose normal is exactly `v`, if any.
    #[must_use]
    pub fn from_normal(v: IVec3) -> Option<Self> {
        match (v.x, v.y, v.z) {
            (0, 0, -1) => Some(Self::North),
            (1, 0, 0) => Some(Self::East),
            (0, 0, 1) => Some(Self::South),
            (-1, 0, 0) => Some(Self::West),
            (0, 1, 0) => Some(Self::Up),
            (0, -1, 0) => Some(Self::Down),
            _ => None,
        }
    }

    /// The face on the other side of the cell.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
        }
    }

    /// Axis the normal lies on.
    #[must_use]
    pub fn axis(self) -> Axis {
        match self {
            Self::North | Self::South => Axis::Z,
            Self::East | Self::West => Axis::X,
            Self::Up | Self::Down => Axis::Y,
        }
    }

    /// Whether this is one of the four compass faces.
    #[must_use]
    pub fn is_horizontal(self) -> bool {
        !matches!(self, Self::Up | Self::Down)
    }
}

/// Direction a structure moves in when toggled.
///
/// A structure's configured direction always names the *opening* motion;
/// [`Direction::flipped`] gives the closing counterpart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Toward `-z`.
    North,
    /// Toward `+x`.
    East,
    /// Toward `+z`.
    South,
    /// Toward `-x`.
    West,
    /// Toward `+y`.
    Up,
    /// Toward `-y`.
    Down,
    /// Clockwise seen from above.
    Clockwise,
    /// Counter-clockwise seen from above.
    CounterClockwise,
}

impl Direction {
    /// The reverse motion.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::East => Self::West,
            Self::South => Self::North,
            Self::West => Self::East,
            Self::Up => Self::Down,
            Self::Down => Self::Up,
            Self::Clockwise => Self::CounterClockwise,
            Self::CounterClockwise => Self::Clockwise,
        }
    }

    /// Face this direction points at, for the translational directions.
    #[must_use]
    pub fn face(self) -> Option<Face> {
        match self {
            Self::North => Some(Face::North),
            Self::East => Some(Face::East),
            Self::South => Some(Face::South),
            Self::West => Some(Face::West),
            Self::Up => Some(Face::Up),
            Self::Down => Some(Face::Down),
            Self::Clockwise | Self::CounterClockwise => None,
        }
    }

    /// Direction pointing at `face`.
    #[must_use]
    pub fn toward(face: Face) -> Self {
        match face {
            Face::North => Self::North,
            Face::East => Self::East,
            Face::South => Self::South,
            Face::West => Self::West,
            Face::Up => Self::Up,
            Face::Down => Self::Down,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
            Self::Up => "up",
            Self::Down => "down",
            Self::Clockwise => "clockwise",
            Self::CounterClockwise => "counter-clockwise",
        };
        f.write_str(name)
    }
}

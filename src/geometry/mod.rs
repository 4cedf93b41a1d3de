//! Shared grid primitives: cuboids, faces, directions, quarter turns.

mod cuboid;
mod direction;
mod turn;

pub use cuboid::{cell_center, Cuboid};
pub use direction::{Axis, Direction, Face};
pub use turn::QuarterTurn;

//! Drawbridges: a quarter turn about a horizontal hinge through the anchor.
//!
//! An upright bridge falls toward its direction and ends up flat with the
//! hinge on the opposite side. A flat bridge only ever rises: it turns
//! toward its hinge side and keeps that side.

use super::{Destination, Motion, Opener, PlanError};
use crate::geometry::{Axis, Direction, Face, QuarterTurn};
use crate::options::Options;
use crate::structure::{Family, Structure};

/// Geometry for [`Family::Hinge`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HingeOpener;

/// How a hinge structure currently lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pose {
    /// One cell tall, hinge along the given side.
    Flat(Face),
    /// Standing; can fall along the listed axes.
    Upright { along_x: bool, along_z: bool },
}

impl HingeOpener {
    fn pose(structure: &Structure) -> Pose {
        let dims = structure.bounds.dimensions();
        if dims.y == 1 && (dims.x > 1 || dims.z > 1) {
            Pose::Flat(
                structure
                    .anchor_side
                    .filter(|side| side.is_horizontal())
                    .unwrap_or_else(|| derived_anchor_side(structure)),
            )
        } else {
            Pose::Upright {
                along_x: dims.x == 1,
                along_z: dims.z == 1,
            }
        }
    }

    /// Whether turning toward `direction` lifts a flat bridge.
    #[must_use]
    pub fn rises(structure: &Structure, direction: Direction) -> bool {
        matches!(
            Self::pose(structure),
            Pose::Flat(side) if direction.face() == Some(side)
        )
    }

    fn turn_for(direction: Direction) -> Option<QuarterTurn> {
        // The top of an upright bridge moves toward the direction.
        match direction {
            Direction::North => Some(QuarterTurn::new(Axis::X, false)),
            Direction::South => Some(QuarterTurn::new(Axis::X, true)),
            Direction::East => Some(QuarterTurn::new(Axis::Z, false)),
            Direction::West => Some(QuarterTurn::new(Axis::Z, true)),
            _ => None,
        }
    }
}

/// Side of a flat bridge the anchor sits on, judged by which edge of the
/// bounds it lies on.
fn derived_anchor_side(structure: &Structure) -> Face {
    let (min, max, anchor) = (structure.bounds.min(), structure.bounds.max(), structure.anchor);
    let dims = structure.bounds.dimensions();
    if dims.z > 1 && anchor.z == min.z {
        Face::North
    } else if dims.z > 1 && anchor.z == max.z {
        Face::South
    } else if dims.x > 1 && anchor.x == min.x {
        Face::West
    } else if dims.x > 1 && anchor.x == max.x {
        Face::East
    } else {
        Face::North
    }
}

impl Opener for HingeOpener {
    fn family(&self) -> Family {
        Family::Hinge
    }

    fn valid_directions(&self, structure: &Structure) -> Vec<Direction> {
        match Self::pose(structure) {
            // Swinging the other way would hang the bridge below its hinge.
            Pose::Flat(side) => vec![Direction::toward(side)],
            Pose::Upright { along_x, along_z } => Face::COMPASS
                .into_iter()
                .filter(|face| match face.axis() {
                    Axis::X => along_x,
                    Axis::Z => along_z,
                    Axis::Y => false,
                })
                .map(Direction::toward)
                .collect(),
        }
    }

    fn motion(
        &self,
        structure: &Structure,
        direction: Direction,
        _options: &Options,
    ) -> Result<Destination, PlanError> {
        let turn = Self::turn_for(direction).ok_or(PlanError::NoDirection)?;
        let anchor_side = match Self::pose(structure) {
            Pose::Flat(side) => side,
            Pose::Upright { .. } => direction
                .face()
                .map_or(Face::North, Face::opposite),
        };
        Ok(Destination {
            bounds: structure.bounds.rotated(structure.anchor, turn),
            motion: Motion::Rotate {
                pivot: structure.anchor,
                turn,
            },
            anchor_side: Some(anchor_side),
        })
    }
}

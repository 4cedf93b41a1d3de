//! Rotating gates: a quarter turn about the vertical axis through the
//! anchor column.

use super::{Destination, Motion, Opener, PlanError};
use crate::geometry::{Axis, Direction, QuarterTurn};
use crate::options::Options;
use crate::structure::{Family, Structure};

/// Geometry for [`Family::Cylinder`].
#[derive(Debug, Clone, Copy, Default)]
pub struct CylinderOpener;

impl CylinderOpener {
    fn turn_for(direction: Direction) -> Option<QuarterTurn> {
        // Right-handed about +y is counter-clockwise seen from above.
        match direction {
            Direction::Clockwise => Some(QuarterTurn::new(Axis::Y, false)),
            Direction::CounterClockwise => Some(QuarterTurn::new(Axis::Y, true)),
            _ => None,
        }
    }
}

impl Opener for CylinderOpener {
    fn family(&self) -> Family {
        Family::Cylinder
    }

    fn valid_directions(&self, _structure: &Structure) -> Vec<Direction> {
        vec![Direction::Clockwise, Direction::CounterClockwise]
    }

    fn motion(
        &self,
        structure: &Structure,
        direction: Direction,
        _options: &Options,
    ) -> Result<Destination, PlanError> {
        let turn = Self::turn_for(direction).ok_or(PlanError::NoDirection)?;
        Ok(Destination {
            bounds: structure.bounds.rotated(structure.anchor, turn),
            motion: Motion::Rotate {
                pivot: structure.anchor,
                turn,
            },
            anchor_side: structure.anchor_side,
        })
    }
}

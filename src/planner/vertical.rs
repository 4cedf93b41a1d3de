//! Portcullises and elevators: straight vertical translation.

use super::{travel_distance, Destination, Motion, Opener, PlanError};
use crate::geometry::Direction;
use crate::options::Options;
use crate::structure::{Family, Structure};

/// Geometry shared by [`Family::Portcullis`] and [`Family::Elevator`].
///
/// Only air and liquids make way for these families.
#[derive(Debug, Clone, Copy)]
pub struct VerticalOpener {
    family: Family,
}

impl VerticalOpener {
    /// Opener for one of the vertical families.
    #[must_use]
    pub const fn new(family: Family) -> Self {
        Self { family }
    }
}

impl Opener for VerticalOpener {
    fn family(&self) -> Family {
        self.family
    }

    fn valid_directions(&self, _structure: &Structure) -> Vec<Direction> {
        vec![Direction::Up, Direction::Down]
    }

    fn motion(
        &self,
        structure: &Structure,
        direction: Direction,
        options: &Options,
    ) -> Result<Destination, PlanError> {
        let face = direction
            .face()
            .filter(|face| !face.is_horizontal())
            .ok_or(PlanError::NoDirection)?;
        let height = structure.bounds.dimensions().y;
        let distance = travel_distance(structure, height, options)?;
        let delta = face.normal() * distance;
        Ok(Destination {
            bounds: structure.bounds.translated(delta),
            motion: Motion::Translate { delta },
            anchor_side: structure.anchor_side,
        })
    }
}

//! Sliding panels: straight horizontal translation.

use super::{travel_distance, Destination, Motion, Opener, PlanError};
use crate::geometry::{Direction, Face};
use crate::options::Options;
use crate::structure::{Family, Structure};
use crate::world::{BlockState, WorldSurface};

/// Geometry for [`Family::Slider`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SliderOpener;

impl SliderOpener {
    /// Length of the structure along the axis it slides on: the distance it
    /// travels when no override is set.
    #[must_use]
    pub fn length_in_direction(structure: &Structure, face: Face) -> i32 {
        face.axis().component(structure.bounds.dimensions())
    }
}

impl Opener for SliderOpener {
    fn family(&self) -> Family {
        Family::Slider
    }

    fn valid_directions(&self, _structure: &Structure) -> Vec<Direction> {
        Face::COMPASS.into_iter().map(Direction::toward).collect()
    }

    fn motion(
        &self,
        structure: &Structure,
        direction: Direction,
        options: &Options,
    ) -> Result<Destination, PlanError> {
        let face = direction
            .face()
            .filter(|face| face.is_horizontal())
            .ok_or(PlanError::NoDirection)?;
        let distance = travel_distance(
            structure,
            Self::length_in_direction(structure, face),
            options,
        )?;
        let delta = face.normal() * distance;
        Ok(Destination {
            bounds: structure.bounds.translated(delta),
            motion: Motion::Translate { delta },
            anchor_side: structure.anchor_side,
        })
    }

    fn can_displace(&self, world: &dyn WorldSurface, block: BlockState) -> bool {
        world.is_passable(block.material)
    }
}

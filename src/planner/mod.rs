//! Geometry planning: where a structure ends up when toggled.
//!
//! Each [`Family`] has one [`Opener`] computing destination volumes in
//! closed form. The shared driver here validates the structure, resolves an
//! unset or unusable direction by probing, and checks the destination for
//! obstructions.

mod cylinder;
mod hinge;
mod slider;
mod vertical;

use std::fmt;

pub use cylinder::CylinderOpener;
use glam::IVec3;
pub use hinge::HingeOpener;
pub use slider::SliderOpener;
pub use vertical::VerticalOpener;

use crate::context::Context;
use crate::geometry::{Cuboid, Direction, Face, QuarterTurn};
use crate::options::Options;
use crate::structure::{Family, Structure};
use crate::world::{BlockState, WorldSurface};

/// Why a structure cannot be moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanError {
    /// The structure is locked.
    Locked,
    /// The structure has more cells than allowed.
    TooBig,
    /// The travel distance exceeds the configured maximum.
    InvalidTravelDistance,
    /// The requested direction cannot apply to the structure's shape, and
    /// no other direction is free.
    NoDirection,
    /// Something is in the way.
    Obstructed,
}

impl fmt::Display for PlanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Locked => "structure is locked",
            Self::TooBig => "structure exceeds the size limit",
            Self::InvalidTravelDistance => "travel distance exceeds the limit",
            Self::NoDirection => "no unobstructed direction available",
            Self::Obstructed => "destination is obstructed",
        };
        f.write_str(msg)
    }
}

/// Exact cell mapping from source to destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// Quarter turn about the center of `pivot`.
    Rotate {
        /// Pivot cell.
        pivot: IVec3,
        /// Turn applied to every cell.
        turn: QuarterTurn,
    },
    /// Straight translation.
    Translate {
        /// Offset applied to every cell.
        delta: IVec3,
    },
}

impl Motion {
    /// Where the cell at `pos` ends up.
    #[must_use]
    pub fn apply(&self, pos: IVec3) -> IVec3 {
        match *self {
            Self::Rotate { pivot, turn } => turn.apply_about(pivot, pos),
            Self::Translate { delta } => pos + delta,
        }
    }

    /// The block as it should look at its destination.
    #[must_use]
    pub fn apply_block(&self, block: BlockState) -> BlockState {
        match *self {
            Self::Rotate { turn, .. } => block.rotated(turn),
            Self::Translate { .. } => block,
        }
    }

    /// Longest path any cell of `bounds` travels, in cells.
    #[must_use]
    pub fn farthest_travel(&self, bounds: &Cuboid) -> f32 {
        match *self {
            Self::Rotate { pivot, turn } => {
                let radius = bounds
                    .cells()
                    .map(|pos| {
                        let offset = (pos - pivot).as_vec3();
                        offset.reject_from(turn.axis_vec()).length()
                    })
                    .fold(0.0_f32, f32::max);
                radius * std::f32::consts::FRAC_PI_2
            }
            Self::Translate { delta } => delta.as_vec3().length(),
        }
    }
}

/// A validated destination for one toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Destination {
    /// Bounding volume after the move.
    pub bounds: Cuboid,
    /// Cell mapping.
    pub motion: Motion,
    /// Anchor side after the move.
    pub anchor_side: Option<Face>,
}

/// The outcome of planning a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Plan {
    /// Direction of this toggle's motion (closing form when open).
    pub direction: Direction,
    /// Where everything goes.
    pub destination: Destination,
}

/// Family-specific geometry.
pub trait Opener: Send + Sync {
    /// The family this opener plans for.
    fn family(&self) -> Family;

    /// Directions the structure can currently move in, in probing order.
    fn valid_directions(&self, structure: &Structure) -> Vec<Direction>;

    /// Destination for moving `structure` in `direction`, computed
    /// analytically without consulting the world.
    fn motion(
        &self,
        structure: &Structure,
        direction: Direction,
        options: &Options,
    ) -> Result<Destination, PlanError>;

    /// Whether a cell holding `block` may be overwritten by the structure.
    fn can_displace(&self, _world: &dyn WorldSurface, block: BlockState) -> bool {
        block.material.is_air_or_liquid()
    }
}

static HINGE: HingeOpener = HingeOpener;
static CYLINDER: CylinderOpener = CylinderOpener;
static PORTCULLIS: VerticalOpener = VerticalOpener::new(Family::Portcullis);
static SLIDER: SliderOpener = SliderOpener;
static ELEVATOR: VerticalOpener = VerticalOpener::new(Family::Elevator);

/// The opener for `family`.
#[must_use]
pub fn opener_for(family: Family) -> &'static dyn Opener {
    match family {
        Family::Hinge => &HINGE,
        Family::Cylinder => &CYLINDER,
        Family::Portcullis => &PORTCULLIS,
        Family::Slider => &SLIDER,
        Family::Elevator => &ELEVATOR,
    }
}

/// Validates and plans toggles against the configured options.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'o> {
    options: &'o Options,
}

impl<'o> Planner<'o> {
    /// Planner using `options`.
    #[must_use]
    pub fn new(options: &'o Options) -> Self {
        Self { options }
    }

    /// World-independent checks: lock state, size limit, explicit travel
    /// distance.
    pub fn validate(
        &self,
        structure: &Structure,
        actor_limit: Option<i64>,
    ) -> Result<(), PlanError> {
        if structure.is_locked {
            return Err(PlanError::Locked);
        }
        if let Some(limit) = self.options.limits.effective_size_limit(actor_limit) {
            if structure.cell_count() > limit {
                return Err(PlanError::TooBig);
            }
        }
        if !structure.family.is_rotational()
            && structure.blocks_to_move.unsigned_abs()
                > self.options.limits.max_blocks_to_move
        {
            return Err(PlanError::InvalidTravelDistance);
        }
        Ok(())
    }

    /// Destination for `direction`, checked against the world.
    pub fn destination_volume(
        &self,
        structure: &Structure,
        direction: Direction,
        world: &dyn WorldSurface,
    ) -> Result<Destination, PlanError> {
        let opener = opener_for(structure.family);
        let destination = opener.motion(structure, direction, self.options)?;
        if self.is_obstructed(opener, structure, &destination.bounds, world) {
            return Err(PlanError::Obstructed);
        }
        Ok(destination)
    }

    /// The direction this toggle moves in, and its destination.
    ///
    /// A configured direction that fits the structure is used as-is (in
    /// closing form when the structure is open). Otherwise every valid
    /// direction is probed in order and the first unobstructed one wins.
    pub fn resolve(
        &self,
        structure: &Structure,
        world: &dyn WorldSurface,
    ) -> Result<Plan, PlanError> {
        let opener = opener_for(structure.family);
        let valid = opener.valid_directions(structure);

        if let Some(configured) = structure.open_direction {
            let current = current_form(configured, structure.is_open);
            if valid.contains(&current) {
                let destination =
                    self.destination_volume(structure, current, world)?;
                return Ok(Plan {
                    direction: current,
                    destination,
                });
            }
            log::debug!(
                "{} {}: configured direction {configured} does not fit, probing",
                structure.family,
                structure.id,
            );
        }

        valid
            .into_iter()
            .find_map(|direction| {
                self.destination_volume(structure, direction, world)
                    .ok()
                    .map(|destination| Plan {
                        direction,
                        destination,
                    })
            })
            .ok_or(PlanError::NoDirection)
    }

    /// Resolve against the live world and persist the resolved direction
    /// when it differs from the stored one. Call [`Planner::validate`]
    /// first.
    pub fn plan(
        &self,
        structure: &Structure,
        ctx: &mut Context<'_>,
    ) -> Result<Plan, PlanError> {
        let plan = self.resolve(structure, &*ctx.world)?;

        let opening = current_form(plan.direction, structure.is_open);
        if structure.open_direction != Some(opening) {
            log::debug!(
                "{} {}: storing resolved opening direction {opening}",
                structure.family,
                structure.id,
            );
            if let Err(e) = ctx.storage.persist_open_direction(structure.id, opening) {
                log::warn!("failed to persist direction for {}: {e}", structure.id);
            }
        }
        Ok(plan)
    }

    fn is_obstructed(
        &self,
        opener: &dyn Opener,
        structure: &Structure,
        destination: &Cuboid,
        world: &dyn WorldSurface,
    ) -> bool {
        destination.cells().any(|pos| {
            let block = world.block_at(pos);
            if structure.bounds.contains(pos) {
                // Vacated on capture unless it never moves.
                self.is_immovable(block)
            } else {
                !opener.can_displace(world, block)
            }
        })
    }

    /// Whether a source cell holding `block` moves with its structure.
    #[must_use]
    pub fn captures(&self, block: BlockState) -> bool {
        !block.material.is_air_or_liquid() && !self.is_immovable(block)
    }

    /// Whether a block is left in place by every family.
    #[must_use]
    pub fn is_immovable(&self, block: BlockState) -> bool {
        block
            .material
            .host_id()
            .is_some_and(|id| self.options.limits.is_immovable(id))
    }
}

/// Translate between opening form and the form for the current state: the
/// mapping is its own inverse.
#[must_use]
pub fn current_form(direction: Direction, is_open: bool) -> Direction {
    if is_open {
        direction.flipped()
    } else {
        direction
    }
}

/// Travel distance for linear families: the override's magnitude, or
/// `auto` when the override is zero. Errors when over the limit.
pub(crate) fn travel_distance(
    structure: &Structure,
    auto: i32,
    options: &Options,
) -> Result<i32, PlanError> {
    let distance = if structure.blocks_to_move == 0 {
        auto
    } else {
        structure.blocks_to_move.abs()
    };
    if distance <= 0 || distance.unsigned_abs() > options.limits.max_blocks_to_move {
        return Err(PlanError::InvalidTravelDistance);
    }
    Ok(distance)
}

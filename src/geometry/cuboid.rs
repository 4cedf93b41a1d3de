//! Inclusive axis-aligned cell volumes.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::QuarterTurn;

/// An axis-aligned cuboid of grid cells, inclusive on both corners.
///
/// Construction always normalizes the corners so that `min <= max` holds on
/// every axis; there is no way to build an inverted cuboid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cuboid {
    min: IVec3,
    max: IVec3,
}

impl Cuboid {
    /// Cuboid spanning the two corners, in any order.
    #[must_use]
    pub fn new(a: IVec3, b: IVec3) -> Self {
        Self {
            min: a.min(b),
            max: a.max(b),
        }
    }

    /// Single-cell cuboid.
    #[must_use]
    pub fn cell(pos: IVec3) -> Self {
        Self { min: pos, max: pos }
    }

    /// Lowest corner.
    #[must_use]
    pub fn min(&self) -> IVec3 {
        self.min
    }

    /// Highest corner.
    #[must_use]
    pub fn max(&self) -> IVec3 {
        self.max
    }

    /// Number of cells along each axis.
    #[must_use]
    pub fn dimensions(&self) -> IVec3 {
        self.max - self.min + IVec3::ONE
    }

    /// Total number of cells.
    #[must_use]
    pub fn volume(&self) -> u64 {
        let d = self.dimensions();
        (d.x as u64)
            .saturating_mul(d.y as u64)
            .saturating_mul(d.z as u64)
    }

    /// Whether `pos` lies inside the cuboid.
    #[must_use]
    pub fn contains(&self, pos: IVec3) -> bool {
        pos.cmpge(self.min).all() && pos.cmple(self.max).all()
    }

    /// Whether the two cuboids share at least one cell.
    #[must_use]
    pub fn intersects(&self, other: &Self) -> bool {
        self.min.cmple(other.max).all() && other.min.cmple(self.max).all()
    }

    /// Smallest cuboid containing both.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Cuboid shifted by `delta`.
    #[must_use]
    pub fn translated(&self, delta: IVec3) -> Self {
        Self {
            min: self.min + delta,
            max: self.max + delta,
        }
    }

    /// Cuboid rotated a quarter turn about the center of `pivot`.
    ///
    /// Both corners are rotated exactly and the result re-normalized.
    #[must_use]
    pub fn rotated(&self, pivot: IVec3, turn: QuarterTurn) -> Self {
        Self::new(
            turn.apply_about(pivot, self.min),
            turn.apply_about(pivot, self.max),
        )
    }

    /// Float center of the cuboid in world space (cell centers at `+0.5`).
    #[must_use]
    pub fn center(&self) -> Vec3 {
        (self.min.as_vec3() + self.max.as_vec3()) * 0.5 + Vec3::splat(0.5)
    }

    /// Iterate every cell, x fastest, then z, then y.
    pub fn cells(&self) -> impl Iterator<Item = IVec3> {
        let (min, max) = (self.min, self.max);
        (min.y..=max.y).flat_map(move |y| {
            (min.z..=max.z)
                .flat_map(move |z| (min.x..=max.x).map(move |x| IVec3::new(x, y, z)))
        })
    }

    /// Cells of `self` that are not inside `other`.
    pub fn cells_outside<'a>(
        &'a self,
        other: &'a Self,
    ) -> impl Iterator<Item = IVec3> + 'a {
        self.cells().filter(move |pos| !other.contains(*pos))
    }
}

/// Float center of a grid cell.
#[inline]
#[must_use]
pub fn cell_center(pos: IVec3) -> Vec3 {
    pos.as_vec3() + Vec3::splat(0.5)
}

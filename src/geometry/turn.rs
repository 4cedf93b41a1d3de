//! Exact quarter-turn rotations on the cell grid.

use glam::{IVec3, Vec3};
use serde::{Deserialize, Serialize};

use super::{Axis, Face};

/// A ±90° rotation about one grid axis.
///
/// `positive` follows the right-hand rule, matching
/// [`glam::Quat::from_axis_angle`] with a positive angle. Integer application
/// is exact, so committed cell positions never accumulate float error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuarterTurn {
    /// Rotation axis.
    pub axis: Axis,
    /// Right-handed (`true`) or left-handed (`false`) quarter turn.
    pub positive: bool,
}

impl QuarterTurn {
    /// Quarter turn about `axis`.
    #[must_use]
    pub fn new(axis: Axis, positive: bool) -> Self {
        Self { axis, positive }
    }

    /// The turn that undoes this one.
    #[must_use]
    pub fn inverse(self) -> Self {
        Self {
            axis: self.axis,
            positive: !self.positive,
        }
    }

    /// Rotate an integer offset.
    #[must_use]
    pub fn apply(self, v: IVec3) -> IVec3 {
        let IVec3 { x, y, z } = v;
        match (self.axis, self.positive) {
            (Axis::X, true) => IVec3::new(x, -z, y),
            (Axis::X, false) => IVec3::new(x, z, -y),
            (Axis::Y, true) => IVec3::new(z, y, -x),
            (Axis::Y, false) => IVec3::new(-z, y, x),
            (Axis::Z, true) => IVec3::new(-y, x, z),
            (Axis::Z, false) => IVec3::new(y, -x, z),
        }
    }

    /// Rotate a cell about the center of the `pivot` cell.
    #[must_use]
    pub fn apply_about(self, pivot: IVec3, pos: IVec3) -> IVec3 {
        pivot + self.apply(pos - pivot)
    }

    /// Rotate a face.
    #[must_use]
    pub fn apply_face(self, face: Face) -> Face {
        // A unit normal always rotates onto another unit normal.
        Face::from_normal(self.apply(face.normal())).unwrap_or(face)
    }

    /// Signed end angle in radians (`±π/2`).
    #[must_use]
    pub fn angle(self) -> f32 {
        if self.positive {
            std::f32::consts::FRAC_PI_2
        } else {
            -std::f32::consts::FRAC_PI_2
        }
    }

    /// Float unit vector of the rotation axis.
    #[must_use]
    pub fn axis_vec(self) -> Vec3 {
        self.axis.unit().as_vec3()
    }

    /// The quarter turn about `axis` that carries `from` onto `to`, if one
    /// exists.
    #[must_use]
    pub fn carrying(axis: Axis, from: IVec3, to: IVec3) -> Option<Self> {
        [true, false]
            .into_iter()
            .map(|positive| Self::new(axis, positive))
            .find(|turn| turn.apply(from) == to)
    }
}

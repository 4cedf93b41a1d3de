//! Trajectory kernels: where a moving cell should be at a given progress.
//!
//! Kernels are pure. Progress is linear in elapsed ticks and snaps to
//! exactly `1.0` on the final tick, so the last target is the exact end
//! pose rather than an accumulated float approximation.

use glam::Vec3;

use crate::geometry::{cell_center, Axis};
use crate::planner::Motion;

/// Per-cell parameters captured once, before any motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CellPath {
    /// Circular arc around the kernel's axis.
    Arc {
        /// Distance from the axis.
        radius: f32,
        /// Starting angle in the plane perpendicular to the axis.
        phase: f32,
        /// Offset along the axis.
        axial: f32,
    },
    /// Straight line; the kernel's delta applies unchanged.
    Line,
}

/// Trajectory for one toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kernel {
    /// Rotation from `start_angle` to `end_angle` about an axis through
    /// `pivot`.
    Arc {
        /// Point on the rotation axis (center of the pivot cell).
        pivot: Vec3,
        /// Rotation axis.
        axis: Axis,
        /// Angle at progress 0.
        start_angle: f32,
        /// Angle at progress 1.
        end_angle: f32,
    },
    /// Translation by `delta` cells.
    Linear {
        /// Full travel.
        delta: Vec3,
    },
}

/// Orthonormal basis `(u, v)` of the plane perpendicular to `axis`, with
/// `u × v = axis` so positive angles follow the right-hand rule.
fn plane_basis(axis: Axis) -> (Vec3, Vec3) {
    match axis {
        Axis::X => (Vec3::Y, Vec3::Z),
        Axis::Y => (Vec3::Z, Vec3::X),
        Axis::Z => (Vec3::X, Vec3::Y),
    }
}

/// Linear progress in `[0, 1]` for `elapsed` of `planned` ticks, exactly
/// `1.0` from the final tick on.
#[must_use]
pub fn progress(elapsed: u32, planned: u32) -> f32 {
    if planned == 0 || elapsed >= planned {
        1.0
    } else {
        elapsed as f32 / planned as f32
    }
}

impl Kernel {
    /// Kernel following `motion`.
    #[must_use]
    pub fn from_motion(motion: &Motion) -> Self {
        match *motion {
            Motion::Rotate { pivot, turn } => Self::Arc {
                pivot: cell_center(pivot),
                axis: turn.axis,
                start_angle: 0.0,
                end_angle: turn.angle(),
            },
            Motion::Translate { delta } => Self::Linear {
                delta: delta.as_vec3(),
            },
        }
    }

    /// Capture the path parameters of a cell whose center starts at `start`.
    #[must_use]
    pub fn cell_path(&self, start: Vec3) -> CellPath {
        match *self {
            Self::Arc { pivot, axis, .. } => {
                let (u, v) = plane_basis(axis);
                let offset = start - pivot;
                let (a, b) = (offset.dot(u), offset.dot(v));
                CellPath::Arc {
                    radius: a.hypot(b),
                    phase: b.atan2(a),
                    axial: offset.dot(axis.unit().as_vec3()),
                }
            }
            Self::Linear { .. } => CellPath::Line,
        }
    }

    /// Rotation angle at `t`, snapping to the exact end angle at `t >= 1`.
    #[must_use]
    pub fn angle(&self, t: f32) -> f32 {
        match *self {
            Self::Arc {
                start_angle,
                end_angle,
                ..
            } => {
                if t >= 1.0 {
                    end_angle
                } else {
                    start_angle + (end_angle - start_angle) * t
                }
            }
            Self::Linear { .. } => 0.0,
        }
    }

    /// Target position at `t` of a cell that started at `start`.
    #[must_use]
    pub fn position(&self, path: CellPath, start: Vec3, t: f32) -> Vec3 {
        match (*self, path) {
            (
                Self::Arc { pivot, axis, .. },
                CellPath::Arc {
                    radius,
                    phase,
                    axial,
                },
            ) => {
                let (u, v) = plane_basis(axis);
                let theta = phase + self.angle(t);
                pivot
                    + axis.unit().as_vec3() * axial
                    + (u * theta.cos() + v * theta.sin()) * radius
            }
            (Self::Linear { delta }, _) => {
                if t >= 1.0 {
                    start + delta
                } else {
                    start + delta * t
                }
            }
            (Self::Arc { .. }, CellPath::Line) => start,
        }
    }
}

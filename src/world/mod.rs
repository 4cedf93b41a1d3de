//! The world query surface: everything this crate needs from the host.
//!
//! Hosts implement [`WorldSurface`] once per supported runtime; the
//! in-memory [`MemoryWorld`] backs the tests and the demo binary.

mod block;
mod memory;

use std::fmt;

use glam::{IVec3, Vec3};
pub use block::{BlockState, Material, Orientation, RailShape};
pub use memory::MemoryWorld;
use serde::{Deserialize, Serialize};

use crate::geometry::Cuboid;

/// Handle to a detached moving proxy spawned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProxyHandle(pub u64);

/// Handle to a dynamic obstacle (frame, marker, mob).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ObstacleId(pub u64);

/// Kind of dynamic obstacle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObstacleKind {
    /// Display entity attached to a block (item frame, painting). Broken by
    /// displacement, dropping its contents.
    Fixture,
    /// Anything else occupying space (markers, stands, creatures).
    Body,
}

/// A non-grid occupant of the world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    /// Host id.
    pub id: ObstacleId,
    /// World position.
    pub position: Vec3,
    /// Kind.
    pub kind: ObstacleKind,
}

impl Obstacle {
    /// The cell the obstacle stands in.
    #[must_use]
    pub fn cell(&self) -> IVec3 {
        self.position.floor().as_ivec3()
    }
}

/// Positional audio cue played while a structure moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundCue {
    /// Motion began.
    Start,
    /// Periodic cue during motion.
    Moving,
    /// Motion finished.
    Finish,
}

impl fmt::Display for SoundCue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Start => "start",
            Self::Moving => "moving",
            Self::Finish => "finish",
        };
        f.write_str(name)
    }
}

/// Read/write access to grid cells, moving proxies, and obstacles.
///
/// All calls happen on the tick thread.
pub trait WorldSurface {
    /// Contents of a cell.
    fn block_at(&self, pos: IVec3) -> BlockState;

    /// Overwrite a cell.
    fn set_block(&mut self, pos: IVec3, block: BlockState);

    /// Whether entities can pass through the material (decorations, air,
    /// liquids).
    fn is_passable(&self, material: Material) -> bool;

    /// Whether every cell of `region` is loaded and may be read or written.
    fn is_region_loaded(&self, region: &Cuboid) -> bool;

    /// Spawn a detached proxy displaying `block` at `pos`.
    fn spawn_proxy(&mut self, pos: Vec3, block: BlockState) -> ProxyHandle;

    /// Current position of a proxy, or `None` if it vanished.
    fn proxy_position(&self, handle: ProxyHandle) -> Option<Vec3>;

    /// Set a proxy's velocity in cells per host tick.
    fn set_proxy_velocity(&mut self, handle: ProxyHandle, velocity: Vec3);

    /// Remove a proxy. Unknown handles are ignored.
    fn remove_proxy(&mut self, handle: ProxyHandle);

    /// Dynamic obstacles within `radius` of `center`.
    fn nearby_obstacles(&self, center: Vec3, radius: f32) -> Vec<Obstacle>;

    /// Break an obstacle, dropping its contents as loose items.
    fn break_obstacle(&mut self, id: ObstacleId);

    /// Play a positional sound cue.
    fn play_sound(&mut self, pos: Vec3, cue: SoundCue);
}

//! Capturing a structure's cells before it moves.

use glam::{IVec3, Vec3};

use super::kernel::{CellPath, Kernel};
use crate::geometry::{cell_center, Cuboid};
use crate::planner::Motion;
use crate::world::{BlockState, ProxyHandle, WorldSurface};

/// One captured cell: its original and final block data, its path, and the
/// proxy standing in for it while it moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapturedCell {
    /// Source cell.
    pub origin: IVec3,
    /// Block as captured.
    pub block: BlockState,
    /// Block as it lands at the destination.
    pub rotated: BlockState,
    /// Precomputed trajectory parameters.
    pub path: CellPath,
    /// Moving proxy, if one was spawned and still exists.
    pub proxy: Option<ProxyHandle>,
}

impl CapturedCell {
    /// World-space center of the source cell.
    #[must_use]
    pub fn start(&self) -> Vec3 {
        cell_center(self.origin)
    }

    /// Whether the block looks different after the move.
    #[must_use]
    pub fn reorients(&self) -> bool {
        self.rotated != self.block
    }
}

/// Which source cells move with the structure.
pub trait CellFilter {
    /// Whether `block` is part of the moving structure.
    fn captures(&self, block: BlockState) -> bool;
}

impl<F: Fn(BlockState) -> bool> CellFilter for F {
    fn captures(&self, block: BlockState) -> bool {
        self(block)
    }
}

/// Snapshot every captured cell of `bounds` and clear it to air.
///
/// Proxies are spawned only when `spawn_proxies` is set; instant toggles
/// move the blocks without any animation.
pub fn capture(
    world: &mut dyn WorldSurface,
    bounds: &Cuboid,
    motion: &Motion,
    kernel: &Kernel,
    filter: &dyn CellFilter,
    spawn_proxies: bool,
) -> Vec<CapturedCell> {
    let mut cells = Vec::new();
    for origin in bounds.cells() {
        let block = world.block_at(origin);
        if !filter.captures(block) {
            continue;
        }
        let start = cell_center(origin);
        let proxy = spawn_proxies.then(|| world.spawn_proxy(start, block));
        world.set_block(origin, BlockState::AIR);
        cells.push(CapturedCell {
            origin,
            block,
            rotated: motion.apply_block(block),
            path: kernel.cell_path(start),
            proxy,
        });
    }
    cells
}

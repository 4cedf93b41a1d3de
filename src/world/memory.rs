//! In-memory world used by tests and the demo binary.

use glam::{IVec3, Vec3};
use rustc_hash::FxHashMap;

use super::{
    BlockState, Material, Obstacle, ObstacleId, ObstacleKind, ProxyHandle,
    SoundCue, WorldSurface,
};
use crate::geometry::Cuboid;

#[derive(Debug, Clone, Copy)]
struct Proxy {
    position: Vec3,
    velocity: Vec3,
    block: BlockState,
}

/// A sparse voxel world held in hash maps.
///
/// Unset cells are air. Proxies only move when [`MemoryWorld::step_proxies`]
/// integrates their velocity, standing in for the host's physics step.
#[derive(Debug, Default)]
pub struct MemoryWorld {
    blocks: FxHashMap<IVec3, BlockState>,
    proxies: FxHashMap<ProxyHandle, Proxy>,
    obstacles: Vec<Obstacle>,
    unloaded: Vec<Cuboid>,
    next_proxy: u64,
    next_obstacle: u64,
    proxies_spawned: usize,
    /// Obstacles broken so far, in order.
    pub broken_obstacles: Vec<ObstacleId>,
    /// Sound cues played so far, in order.
    pub sounds: Vec<(Vec3, SoundCue)>,
}

impl MemoryWorld {
    /// Empty world, fully loaded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fill every cell of `region` with `block`.
    pub fn fill(&mut self, region: &Cuboid, block: BlockState) {
        for pos in region.cells() {
            self.set_block(pos, block);
        }
    }

    /// Number of non-air cells inside `region`.
    #[must_use]
    pub fn count_solid(&self, region: &Cuboid) -> usize {
        region
            .cells()
            .filter(|pos| !self.block_at(*pos).material.is_air())
            .count()
    }

    /// Mark `region` as not loaded.
    pub fn unload(&mut self, region: Cuboid) {
        self.unloaded.push(region);
    }

    /// Add a dynamic obstacle.
    pub fn add_obstacle(&mut self, position: Vec3, kind: ObstacleKind) -> ObstacleId {
        self.next_obstacle += 1;
        let id = ObstacleId(self.next_obstacle);
        self.obstacles.push(Obstacle { id, position, kind });
        id
    }

    /// Number of live proxies.
    #[must_use]
    pub fn proxy_count(&self) -> usize {
        self.proxies.len()
    }

    /// Total proxies ever spawned.
    #[must_use]
    pub fn proxies_spawned(&self) -> usize {
        self.proxies_spawned
    }

    /// Block a proxy displays.
    #[must_use]
    pub fn proxy_block(&self, handle: ProxyHandle) -> Option<BlockState> {
        self.proxies.get(&handle).map(|p| p.block)
    }

    /// Advance every proxy by its velocity for `ticks` host ticks.
    pub fn step_proxies(&mut self, ticks: u32) {
        for proxy in self.proxies.values_mut() {
            proxy.position += proxy.velocity * ticks as f32;
        }
    }

    /// Make a proxy vanish as if the host had despawned it.
    pub fn despawn_proxy(&mut self, handle: ProxyHandle) {
        let _ = self.proxies.remove(&handle);
    }
}

impl WorldSurface for MemoryWorld {
    fn block_at(&self, pos: IVec3) -> BlockState {
        self.blocks.get(&pos).copied().unwrap_or(BlockState::AIR)
    }

    fn set_block(&mut self, pos: IVec3, block: BlockState) {
        if block.material.is_air() {
            let _ = self.blocks.remove(&pos);
        } else {
            let _ = self.blocks.insert(pos, block);
        }
    }

    fn is_passable(&self, material: Material) -> bool {
        matches!(
            material,
            Material::Air | Material::Liquid(_) | Material::Decoration(_)
        )
    }

    fn is_region_loaded(&self, region: &Cuboid) -> bool {
        !self.unloaded.iter().any(|unloaded| unloaded.intersects(region))
    }

    fn spawn_proxy(&mut self, pos: Vec3, block: BlockState) -> ProxyHandle {
        self.next_proxy += 1;
        self.proxies_spawned += 1;
        let handle = ProxyHandle(self.next_proxy);
        let _ = self.proxies.insert(
            handle,
            Proxy {
                position: pos,
                velocity: Vec3::ZERO,
                block,
            },
        );
        handle
    }

    fn proxy_position(&self, handle: ProxyHandle) -> Option<Vec3> {
        self.proxies.get(&handle).map(|p| p.position)
    }

    fn set_proxy_velocity(&mut self, handle: ProxyHandle, velocity: Vec3) {
        if let Some(proxy) = self.proxies.get_mut(&handle) {
            proxy.velocity = velocity;
        }
    }

    fn remove_proxy(&mut self, handle: ProxyHandle) {
        let _ = self.proxies.remove(&handle);
    }

    fn nearby_obstacles(&self, center: Vec3, radius: f32) -> Vec<Obstacle> {
        self.obstacles
            .iter()
            .filter(|o| o.position.distance(center) <= radius)
            .copied()
            .collect()
    }

    fn break_obstacle(&mut self, id: ObstacleId) {
        let before = self.obstacles.len();
        self.obstacles.retain(|o| o.id != id);
        if self.obstacles.len() != before {
            self.broken_obstacles.push(id);
        }
    }

    fn play_sound(&mut self, pos: Vec3, cue: SoundCue) {
        self.sounds.push((pos, cue));
    }
}

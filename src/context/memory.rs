//! In-memory collaborators for tests and the demo binary.

use rustc_hash::FxHashMap;

use super::{ActorId, Permissions, Storage, ToggleEvents};
use crate::error::DrawbridgeError;
use crate::geometry::{Cuboid, Direction, Face};
use crate::structure::{Structure, StructureId};

/// Structure records held in a map.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    structures: FxHashMap<StructureId, Structure>,
    /// Number of open-direction writes so far.
    pub direction_writes: usize,
    /// Number of bounding-volume writes so far.
    pub volume_writes: usize,
}

impl MemoryStorage {
    /// Empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a record.
    pub fn insert(&mut self, structure: Structure) {
        let _ = self.structures.insert(structure.id, structure);
    }

    /// Record for `id`.
    #[must_use]
    pub fn get(&self, id: StructureId) -> Option<&Structure> {
        self.structures.get(&id)
    }

    fn record_mut(
        &mut self,
        id: StructureId,
    ) -> Result<&mut Structure, DrawbridgeError> {
        self.structures
            .get_mut(&id)
            .ok_or(DrawbridgeError::UnknownStructure(id))
    }
}

impl Storage for MemoryStorage {
    fn load_structure(&self, id: StructureId) -> Option<Structure> {
        self.structures.get(&id).cloned()
    }

    fn persist_bounding_volume(
        &mut self,
        id: StructureId,
        bounds: Cuboid,
        is_open: bool,
        anchor_side: Option<Face>,
    ) -> Result<(), DrawbridgeError> {
        let record = self.record_mut(id)?;
        record.bounds = bounds;
        record.is_open = is_open;
        record.anchor_side = anchor_side;
        self.volume_writes += 1;
        Ok(())
    }

    fn persist_open_direction(
        &mut self,
        id: StructureId,
        direction: Direction,
    ) -> Result<(), DrawbridgeError> {
        self.record_mut(id)?.open_direction = Some(direction);
        self.direction_writes += 1;
        Ok(())
    }
}

/// Size limits and forbidden regions.
#[derive(Debug, Default, Clone)]
pub struct AccessPolicy {
    /// Limit for actors without an explicit entry (`<= 0` = unlimited).
    pub default_limit: i64,
    /// Per-actor size limits.
    pub limits: FxHashMap<ActorId, i64>,
    /// Regions nobody may build in.
    pub denied: Vec<Cuboid>,
}

impl AccessPolicy {
    /// Everyone may move anything anywhere.
    #[must_use]
    pub fn allow_all() -> Self {
        Self::default()
    }
}

impl Permissions for AccessPolicy {
    fn size_limit_for(&self, actor: ActorId) -> i64 {
        self.limits
            .get(&actor)
            .copied()
            .unwrap_or(self.default_limit)
    }

    fn has_access(&self, _actor: ActorId, region: &Cuboid) -> bool {
        !self.denied.iter().any(|denied| denied.intersects(region))
    }
}

/// Records notifications and optionally vetoes every toggle.
#[derive(Debug, Default, Clone)]
pub struct RecordingEvents {
    /// Veto every prepare notification.
    pub veto: bool,
    /// Structures that received a prepare notification.
    pub prepared: Vec<StructureId>,
    /// Structures that started moving, with their instant flag.
    pub started: Vec<(StructureId, bool)>,
}

impl ToggleEvents for RecordingEvents {
    fn toggle_prepare(&mut self, structure: &Structure, _instant: bool) -> bool {
        self.prepared.push(structure.id);
        self.veto
    }

    fn toggle_start(&mut self, structure: &Structure, instant: bool) {
        self.started.push((structure.id, instant));
    }
}

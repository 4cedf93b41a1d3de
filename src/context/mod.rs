//! External collaborators, bundled into one [`Context`] threaded through
//! every toggle and tick.

mod memory;

use std::fmt;

pub use memory::{AccessPolicy, MemoryStorage, RecordingEvents};

use crate::error::DrawbridgeError;
use crate::geometry::{Cuboid, Direction, Face};
use crate::structure::{Structure, StructureId};
use crate::world::WorldSurface;

/// Who asked for a toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

impl fmt::Display for ActorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "actor {}", self.0)
    }
}

/// Durable structure records.
pub trait Storage {
    /// Current record for `id`.
    fn load_structure(&self, id: StructureId) -> Option<Structure>;

    /// Record the result of a committed animation.
    fn persist_bounding_volume(
        &mut self,
        id: StructureId,
        bounds: Cuboid,
        is_open: bool,
        anchor_side: Option<Face>,
    ) -> Result<(), DrawbridgeError>;

    /// Record an auto-resolved opening direction.
    fn persist_open_direction(
        &mut self,
        id: StructureId,
        direction: Direction,
    ) -> Result<(), DrawbridgeError>;
}

/// Per-actor limits and access checks.
pub trait Permissions {
    /// Largest structure (in cells) the actor may move; `<= 0` is unlimited.
    fn size_limit_for(&self, actor: ActorId) -> i64;

    /// Whether the actor may place blocks inside `region`.
    fn has_access(&self, actor: ActorId, region: &Cuboid) -> bool;
}

/// Toggle lifecycle notifications.
pub trait ToggleEvents {
    /// Called before anything moves. Returning `true` vetoes the toggle.
    fn toggle_prepare(&mut self, structure: &Structure, instant: bool) -> bool;

    /// Called once the animation has been admitted.
    fn toggle_start(&mut self, structure: &Structure, instant: bool);
}

/// Everything the core needs from the outside world, for one call.
pub struct Context<'a> {
    /// Grid and proxy access.
    pub world: &'a mut dyn WorldSurface,
    /// Structure records.
    pub storage: &'a mut dyn Storage,
    /// Size limits and access checks.
    pub permissions: &'a dyn Permissions,
    /// Lifecycle notifications.
    pub events: &'a mut dyn ToggleEvents,
}

impl<'a> Context<'a> {
    /// Bundle the collaborators.
    #[must_use]
    pub fn new(
        world: &'a mut dyn WorldSurface,
        storage: &'a mut dyn Storage,
        permissions: &'a dyn Permissions,
        events: &'a mut dyn ToggleEvents,
    ) -> Self {
        Self {
            world,
            storage,
            permissions,
            events,
        }
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context").finish_non_exhaustive()
    }
}

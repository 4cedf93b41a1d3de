//! Process-wide record of which structures are moving.
//!
//! Every entry is either a placeholder (reserved while the toggle is being
//! planned) or an active session's info handle. Reservation is a single
//! check-and-insert under one lock, so two concurrent requests for the same
//! structure can never both succeed.
//!
//! Each reservation carries a [`Ticket`]. Attaching and releasing only act
//! on an entry holding the caller's ticket, so a request whose placeholder
//! was dropped can never take over or release a later request's entry.

use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rustc_hash::FxHashMap;
use web_time::Instant;

use crate::structure::{Family, StructureId};

/// Proof of one reservation, unique for the life of the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ticket {}", self.0)
    }
}

/// Shareable view of a running session.
#[derive(Debug, Clone)]
pub struct SessionInfo {
    /// Structure being moved.
    pub door_id: StructureId,
    /// Reservation the session runs under.
    pub ticket: Ticket,
    /// Its family.
    pub family: Family,
    /// Planned number of animation steps.
    pub planned_ticks: u32,
    /// When the animation started.
    pub started: Instant,
    cancel: Arc<AtomicBool>,
}

impl SessionInfo {
    /// Info handle sharing `cancel` with the session it describes.
    #[must_use]
    pub fn new(
        door_id: StructureId,
        ticket: Ticket,
        family: Family,
        planned_ticks: u32,
        started: Instant,
        cancel: Arc<AtomicBool>,
    ) -> Self {
        Self {
            door_id,
            ticket,
            family,
            planned_ticks,
            started,
            cancel,
        }
    }

    /// Ask the session to stop and finalize on its next tick.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancel.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone)]
enum Entry {
    Reserved(Ticket),
    Active(SessionInfo),
}

impl Entry {
    fn ticket(&self) -> Ticket {
        match self {
            Self::Reserved(ticket) => *ticket,
            Self::Active(info) => info.ticket,
        }
    }
}

/// Result of trying to reserve a structure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reservation {
    /// The placeholder is ours; it must later be ended or attached with
    /// this ticket.
    Reserved(Ticket),
    /// Someone else is already moving this structure.
    Busy,
}

/// Concurrent map from structure id to its animation state, plus the
/// global runnable and paused switches.
#[derive(Debug)]
pub struct BusyRegistry {
    entries: Mutex<FxHashMap<StructureId, Entry>>,
    next_ticket: AtomicU64,
    runnable: AtomicBool,
    paused: AtomicBool,
}

impl Default for BusyRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl BusyRegistry {
    /// Empty registry accepting new animations.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(FxHashMap::default()),
            next_ticket: AtomicU64::new(1),
            runnable: AtomicBool::new(true),
            paused: AtomicBool::new(false),
        }
    }

    fn entries(&self) -> MutexGuard<'_, FxHashMap<StructureId, Entry>> {
        // A panic while holding the lock leaves the map itself consistent.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Atomically reserve `id` if nobody holds it.
    pub fn try_begin_animation(&self, id: StructureId) -> Reservation {
        let mut entries = self.entries();
        if entries.contains_key(&id) {
            return Reservation::Busy;
        }
        let ticket = Ticket(self.next_ticket.fetch_add(1, Ordering::Relaxed));
        let _ = entries.insert(id, Entry::Reserved(ticket));
        log::trace!("reserved {id} with {ticket}");
        Reservation::Reserved(ticket)
    }

    /// Replace the placeholder for `info.door_id` with the session handle,
    /// if the placeholder still belongs to `info.ticket`.
    ///
    /// Returns `false` when the placeholder has been dropped (shutdown) or
    /// belongs to another reservation; the caller then owns finalization.
    pub fn attach_session(&self, info: SessionInfo) -> bool {
        let mut entries = self.entries();
        match entries.get_mut(&info.door_id) {
            Some(entry)
                if matches!(entry, Entry::Reserved(_)) && entry.ticket() == info.ticket =>
            {
                *entry = Entry::Active(info);
                true
            }
            _ => false,
        }
    }

    /// Remove the entry for `id` if it belongs to `ticket`. Returns whether
    /// it was removed.
    pub fn end_animation(&self, id: StructureId, ticket: Ticket) -> bool {
        let mut entries = self.entries();
        if entries.get(&id).map(Entry::ticket) != Some(ticket) {
            log::debug!("{id}: {ticket} no longer holds the entry, not releasing");
            return false;
        }
        let _ = entries.remove(&id);
        log::trace!("released {id}");
        true
    }

    /// Whether `id` is reserved or moving.
    #[must_use]
    pub fn is_busy(&self, id: StructureId) -> bool {
        self.entries().contains_key(&id)
    }

    /// Info for the session moving `id`, if one is attached.
    #[must_use]
    pub fn session(&self, id: StructureId) -> Option<SessionInfo> {
        match self.entries().get(&id) {
            Some(Entry::Active(info)) => Some(info.clone()),
            _ => None,
        }
    }

    /// Info for every attached session.
    #[must_use]
    pub fn active_sessions(&self) -> Vec<SessionInfo> {
        self.entries()
            .values()
            .filter_map(|entry| match entry {
                Entry::Active(info) => Some(info.clone()),
                Entry::Reserved(_) => None,
            })
            .collect()
    }

    /// Number of entries, placeholders included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries().len()
    }

    /// Whether nothing is reserved or moving.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries().is_empty()
    }

    /// Request cancellation of the session moving `id`.
    pub fn cancel(&self, id: StructureId) -> bool {
        self.session(id).is_some_and(|info| {
            info.cancel();
            true
        })
    }

    /// Request cancellation of every attached session. During shutdown,
    /// placeholders are dropped as well so in-flight requests fail to
    /// attach. Returns the number of sessions asked to stop.
    pub fn cancel_all(&self, shutting_down: bool) -> usize {
        let mut entries = self.entries();
        let mut cancelled = 0;
        for entry in entries.values() {
            if let Entry::Active(info) = entry {
                info.cancel();
                cancelled += 1;
            }
        }
        if shutting_down {
            entries.retain(|_, entry| matches!(entry, Entry::Active(_)));
        }
        cancelled
    }

    /// Accept or refuse new animations.
    pub fn set_runnable(&self, runnable: bool) {
        self.runnable.store(runnable, Ordering::Release);
    }

    /// Whether new animations are accepted and running ones may continue.
    #[must_use]
    pub fn is_runnable(&self) -> bool {
        self.runnable.load(Ordering::Acquire)
    }

    /// Freeze or resume every running animation.
    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Whether animations are frozen.
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }
}

//! Toggle orchestration: admission, the busy registry, and the tick loop.
//!
//! [`DoorEngine`] is the single entry point for hosts. Requests are
//! admitted synchronously and return a [`ToggleOutcome`]; admitted
//! animations then advance on every [`DoorEngine::tick`] until they commit.

mod outcome;
mod registry;
mod request;
mod tick;
mod toggle;

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

pub use outcome::ToggleOutcome;
pub use registry::{BusyRegistry, Reservation, SessionInfo, Ticket};
pub use request::{ToggleIntent, ToggleRequest};
use web_time::Instant;

use crate::animation::MoverSession;
use crate::options::Options;
use crate::structure::StructureId;

/// A pending automatic close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AutoClose {
    due: Instant,
    door_id: StructureId,
}

/// Admits toggle requests and drives their animations.
///
/// Safe to share between threads: requests may arrive from anywhere, while
/// [`DoorEngine::tick`] runs on the host's tick thread. Sessions are locked
/// before the registry, never the other way around.
#[derive(Debug)]
pub struct DoorEngine {
    options: Options,
    registry: Arc<BusyRegistry>,
    sessions: Mutex<Vec<MoverSession>>,
    auto_close: Mutex<Vec<AutoClose>>,
}

impl DoorEngine {
    /// Engine with its own registry.
    #[must_use]
    pub fn new(options: Options) -> Self {
        Self::with_registry(options, Arc::new(BusyRegistry::new()))
    }

    /// Engine sharing an existing registry.
    #[must_use]
    pub fn with_registry(options: Options, registry: Arc<BusyRegistry>) -> Self {
        Self {
            options,
            registry,
            sessions: Mutex::new(Vec::new()),
            auto_close: Mutex::new(Vec::new()),
        }
    }

    /// Active configuration.
    #[must_use]
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Replace the configuration. Running sessions keep the settings they
    /// started with.
    pub fn set_options(&mut self, options: Options) {
        self.options = options;
    }

    /// The busy registry, for the runnable and paused switches.
    #[must_use]
    pub fn registry(&self) -> &Arc<BusyRegistry> {
        &self.registry
    }

    /// Whether `door_id` is reserved or moving.
    #[must_use]
    pub fn is_animating(&self, door_id: StructureId) -> bool {
        self.registry.is_busy(door_id)
    }

    /// Every running animation.
    #[must_use]
    pub fn active_animations(&self) -> Vec<SessionInfo> {
        self.registry.active_sessions()
    }

    /// Ask the animation of `door_id` to finalize on the next tick.
    /// Returns whether one was running.
    pub fn cancel(&self, door_id: StructureId) -> bool {
        let cancelled = self.registry.cancel(door_id);
        if cancelled {
            log::debug!("{door_id}: cancel requested");
        }
        cancelled
    }

    fn sessions(&self) -> MutexGuard<'_, Vec<MoverSession>> {
        self.sessions.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn auto_close(&self) -> MutexGuard<'_, Vec<AutoClose>> {
        self.auto_close.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use glam::{IVec3, Vec3};
    use web_time::Duration;

    use super::*;
    use crate::animation::CommitReason;
    use crate::context::{
        AccessPolicy, ActorId, Context, MemoryStorage, RecordingEvents,
    };
    use crate::geometry::{Cuboid, Direction, Face};
    use crate::structure::{Family, Structure};
    use crate::world::{
        BlockState, Material, MemoryWorld, ObstacleKind, Orientation,
        WorldSurface,
    };

    const STONE: BlockState = BlockState {
        material: Material::Solid(1),
        orientation: Orientation::None,
    };

    #[derive(Default)]
    struct Harness {
        world: MemoryWorld,
        storage: MemoryStorage,
        policy: AccessPolicy,
        events: RecordingEvents,
    }

    impl Harness {
        fn with(structures: &[Structure]) -> Self {
            let mut h = Self::default();
            for s in structures {
                h.world.fill(&s.bounds, STONE);
                h.storage.insert(s.clone());
            }
            h
        }

        fn ctx(&mut self) -> Context<'_> {
            Context::new(
                &mut self.world,
                &mut self.storage,
                &self.policy,
                &mut self.events,
            )
        }

        fn record(&self, id: StructureId) -> Structure {
            self.storage.get(id).cloned().unwrap()
        }
    }

    /// 5×5 wall sliding east, 5 cells by default.
    fn slider(id: u64, origin: IVec3) -> Structure {
        Structure::new(
            StructureId(id),
            Family::Slider,
            Cuboid::new(origin, origin + IVec3::new(4, 4, 0)),
            origin,
        )
        .with_open_direction(Direction::East)
    }

    /// Flat bridge 5 wide, 6 deep, hinged on its south edge.
    fn flat_bridge() -> Structure {
        Structure::new(
            StructureId(7),
            Family::Hinge,
            Cuboid::new(IVec3::new(0, 10, 0), IVec3::new(4, 10, 5)),
            IVec3::new(0, 10, 5),
        )
        .with_anchor_side(Face::South)
        .with_open_direction(Direction::South)
    }

    fn toggle(id: u64) -> ToggleRequest {
        ToggleRequest::new(StructureId(id)).with_duration(1.0)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn slider_moves_east_by_its_length_and_opens() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();

        let outcome = engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0);
        assert_eq!(outcome, ToggleOutcome::Success);
        assert!(engine.is_animating(s.id));
        assert_eq!(h.world.proxy_count(), 25);
        assert!(engine.tick_at(&mut h.ctx(), t0 + ms(500)).is_empty());

        let reports = engine.tick_at(&mut h.ctx(), t0 + ms(1000));
        assert_eq!(reports.len(), 1);
        let record = h.record(s.id);
        assert_eq!(record.bounds.min().x, 5);
        assert_eq!(record.bounds.max().x, 9);
        assert!(record.is_open);
        assert!(record.bounds.min().cmple(record.bounds.max()).all());
        assert!(!engine.is_animating(s.id));
        assert_eq!(h.world.count_solid(&record.bounds), 25);
        assert_eq!(h.world.count_solid(&s.bounds), 0);
        assert_eq!(h.world.proxy_count(), 0);
        assert_eq!(h.events.started, vec![(s.id, false)]);
    }

    #[test]
    fn locked_structure_is_refused_before_reserving() {
        let mut s = slider(1, IVec3::ZERO);
        s.is_locked = true;
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(1)),
            ToggleOutcome::Locked
        );
        assert!(!engine.is_animating(s.id));
        assert!(h.events.prepared.is_empty());
    }

    #[test]
    fn oversized_structure_is_too_big() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s]);
        let mut options = Options::default();
        options.limits.max_structure_size = 10;
        let engine = DoorEngine::new(options);
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(1)),
            ToggleOutcome::TooBig
        );
        assert_eq!(h.world.proxies_spawned(), 0);
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn actor_size_limit_applies() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s]);
        let _ = h.policy.limits.insert(ActorId(3), 20);
        let engine = DoorEngine::new(Options::default());
        let request = toggle(1).by(ActorId(3));
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &request),
            ToggleOutcome::TooBig
        );
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn concurrent_requests_admit_exactly_one() {
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        let outcomes: Vec<ToggleOutcome> = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    scope.spawn(|| {
                        let mut h = Harness::with(&[slider(42, IVec3::ZERO)]);
                        engine.request_toggle_at(&mut h.ctx(), &toggle(42), t0)
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        let successes = outcomes.iter().filter(|o| o.is_success()).count();
        let busy = outcomes
            .iter()
            .filter(|o| **o == ToggleOutcome::Busy)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(busy, 7);
        assert_eq!(engine.active_animations().len(), 1);
    }

    #[test]
    fn flat_bridge_rises_to_its_depth_and_keeps_its_side() {
        let s = flat_bridge();
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let request = toggle(7).instant();
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &request),
            ToggleOutcome::Success
        );
        let record = h.record(s.id);
        assert_eq!(record.bounds.dimensions().y, s.bounds.dimensions().z);
        assert_eq!(record.bounds.dimensions().z, 1);
        assert_eq!(record.anchor_side, Some(Face::South));
        assert_eq!(record.anchor, s.anchor);
        assert_eq!(h.world.count_solid(&record.bounds), 30);
    }

    #[test]
    fn instant_toggle_commits_within_the_call() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let request = toggle(1).instant();
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &request),
            ToggleOutcome::Success
        );
        assert_eq!(h.world.proxies_spawned(), 0);
        assert!(h.record(s.id).is_open);
        assert!(!engine.is_animating(s.id));
        assert_eq!(h.events.started, vec![(s.id, true)]);
    }

    #[test]
    fn toggling_twice_restores_the_original_volume() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        for round in 0..2_u64 {
            let start = t0 + ms(2000 * round);
            assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(1), start).is_success());
            assert_eq!(engine.tick_at(&mut h.ctx(), start + ms(1000)).len(), 1);
        }
        let record = h.record(s.id);
        assert_eq!(record.bounds, s.bounds);
        assert!(!record.is_open);
        assert_eq!(h.world.count_solid(&s.bounds), 25);
    }

    #[test]
    fn hinge_round_trip_through_animation() {
        let s = flat_bridge();
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        for round in 0..2_u64 {
            let start = t0 + ms(2000 * round);
            assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(7), start).is_success());
            assert!(engine.tick_at(&mut h.ctx(), start + ms(500)).is_empty());
            let reports = engine.tick_at(&mut h.ctx(), start + ms(1000));
            assert_eq!(reports.len(), 1);
            assert_eq!(reports[0].reason, CommitReason::Completed);
        }
        let record = h.record(s.id);
        assert_eq!(record.bounds, s.bounds);
        assert_eq!(record.anchor_side, Some(Face::South));
        assert_eq!(h.world.count_solid(&s.bounds), 30);
    }

    #[test]
    fn cylinder_portcullis_and_elevator_round_trip() {
        let gate = Structure::new(
            StructureId(3),
            Family::Cylinder,
            Cuboid::new(IVec3::ZERO, IVec3::new(3, 3, 0)),
            IVec3::ZERO,
        )
        .with_open_direction(Direction::Clockwise);
        let portcullis = Structure::new(
            StructureId(4),
            Family::Portcullis,
            Cuboid::new(IVec3::new(10, 0, 0), IVec3::new(13, 3, 0)),
            IVec3::new(10, 3, 0),
        )
        .with_open_direction(Direction::Up);
        let elevator = Structure::new(
            StructureId(5),
            Family::Elevator,
            Cuboid::new(IVec3::new(20, 0, 0), IVec3::new(22, 0, 2)),
            IVec3::new(20, 0, 0),
        )
        .with_open_direction(Direction::Up)
        .with_blocks_to_move(6);
        let originals = [gate, portcullis, elevator];
        let opened = [
            Cuboid::new(IVec3::ZERO, IVec3::new(0, 3, 3)),
            Cuboid::new(IVec3::new(10, 4, 0), IVec3::new(13, 7, 0)),
            Cuboid::new(IVec3::new(20, 6, 0), IVec3::new(22, 6, 2)),
        ];
        let mut h = Harness::with(&originals);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();

        for round in 0..2_u64 {
            let start = t0 + ms(2000 * round);
            for s in &originals {
                let outcome = engine.request_toggle_at(&mut h.ctx(), &toggle(s.id.0), start);
                assert_eq!(outcome, ToggleOutcome::Success, "{} round {round}", s.id);
            }
            let reports = engine.tick_at(&mut h.ctx(), start + ms(1000));
            assert_eq!(reports.len(), 3);
            assert!(reports.iter().all(|r| r.reason == CommitReason::Completed));

            for (s, open_bounds) in originals.iter().zip(&opened) {
                let record = h.record(s.id);
                let expected = if round == 0 { *open_bounds } else { s.bounds };
                assert_eq!(record.bounds, expected, "{}", s.id);
                assert!(record.bounds.min().cmple(record.bounds.max()).all());
                assert_eq!(record.is_open, round == 0);
                assert_eq!(h.world.count_solid(&record.bounds), s.bounds.volume() as usize);
                assert!(!engine.is_animating(s.id));
            }
        }
        assert_eq!(h.world.proxy_count(), 0);
    }

    #[test]
    fn intent_is_checked_against_the_current_state() {
        let mut open = slider(1, IVec3::ZERO);
        open.is_open = true;
        let closed = slider(2, IVec3::new(0, 20, 0));
        let mut h = Harness::with(&[open, closed]);
        let engine = DoorEngine::new(Options::default());
        let open_again = toggle(1).with_intent(ToggleIntent::Open);
        let close_again = toggle(2).with_intent(ToggleIntent::Close);
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &open_again),
            ToggleOutcome::AlreadyOpen
        );
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &close_again),
            ToggleOutcome::AlreadyClosed
        );
        assert!(engine.registry().is_empty());
    }

    #[test]
    fn refusals_before_planning() {
        let mut h = Harness::with(&[slider(1, IVec3::ZERO)]);
        let mut options = Options::default();
        options.families.get_mut(Family::Slider).enabled = false;
        let engine = DoorEngine::new(options);
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(1)),
            ToggleOutcome::TypeDisabled
        );
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(99)),
            ToggleOutcome::NoStructuresFound
        );
        engine.registry().set_runnable(false);
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(1)),
            ToggleOutcome::GenericError
        );
    }

    #[test]
    fn failures_after_reserving_release_the_registry() {
        let s = slider(1, IVec3::ZERO);
        let engine = DoorEngine::new(Options::default());

        let mut unloaded = Harness::with(&[s.clone()]);
        unloaded.world.unload(Cuboid::cell(IVec3::new(7, 0, 0)));
        assert_eq!(
            engine.request_toggle(&mut unloaded.ctx(), &toggle(1)),
            ToggleOutcome::RegionsNotLoaded
        );

        let mut denied = Harness::with(&[s.clone()]);
        denied.policy.denied.push(Cuboid::cell(IVec3::new(9, 4, 0)));
        assert_eq!(
            engine.request_toggle(&mut denied.ctx(), &toggle(1).by(ActorId(1))),
            ToggleOutcome::NoPermission
        );

        let mut vetoed = Harness::with(&[s.clone()]);
        vetoed.events.veto = true;
        assert_eq!(
            engine.request_toggle(&mut vetoed.ctx(), &toggle(1)),
            ToggleOutcome::Cancelled
        );
        assert_eq!(vetoed.events.prepared, vec![s.id]);
        assert!(vetoed.events.started.is_empty());

        let mut blocked = Harness::with(&[s.clone()]);
        blocked.world.set_block(IVec3::new(6, 2, 0), STONE);
        assert_eq!(
            engine.request_toggle(&mut blocked.ctx(), &toggle(1)),
            ToggleOutcome::Obstructed
        );

        let mut crowded = Harness::with(&[s.clone()]);
        let _ = crowded
            .world
            .add_obstacle(Vec3::new(7.5, 1.5, 0.5), ObstacleKind::Body);
        assert_eq!(
            engine.request_toggle(&mut crowded.ctx(), &toggle(1)),
            ToggleOutcome::Obstructed
        );
        assert_eq!(crowded.world.count_solid(&s.bounds), 25);
        assert_eq!(crowded.world.proxies_spawned(), 0);

        assert!(engine.registry().is_empty());
    }

    #[test]
    fn moving_structure_is_busy() {
        let mut h = Harness::with(&[slider(1, IVec3::ZERO)]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0).is_success());
        assert_eq!(
            engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0 + ms(50)),
            ToggleOutcome::Busy
        );
        let active = engine.active_animations();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].door_id, StructureId(1));
        assert_eq!(active[0].family, Family::Slider);
        assert_eq!(active[0].planned_ticks, 20);
    }

    #[test]
    fn cancel_commits_forward_once() {
        let s = slider(1, IVec3::ZERO);
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0).is_success());
        assert!(engine.tick_at(&mut h.ctx(), t0 + ms(100)).is_empty());
        assert!(engine.cancel(s.id));

        let reports = engine.tick_at(&mut h.ctx(), t0 + ms(150));
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].reason, CommitReason::Cancelled);
        assert_eq!(h.record(s.id).bounds.min().x, 5);
        assert!(!engine.cancel(s.id));
        assert!(engine.tick_at(&mut h.ctx(), t0 + ms(200)).is_empty());
        assert_eq!(h.storage.volume_writes, 1);
    }

    #[test]
    fn shutdown_commits_everything_and_refuses_new_work() {
        let a = slider(1, IVec3::ZERO);
        let b = slider(2, IVec3::new(0, 20, 0));
        let mut h = Harness::with(&[a.clone(), b.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0).is_success());
        assert!(engine.request_toggle_at(&mut h.ctx(), &toggle(2), t0).is_success());

        let reports = engine.shutdown(&mut h.ctx());
        assert_eq!(reports.len(), 2);
        assert!(engine.registry().is_empty());
        assert_eq!(h.world.proxy_count(), 0);
        assert!(h.record(a.id).is_open);
        assert!(h.record(b.id).is_open);
        assert_eq!(
            engine.request_toggle(&mut h.ctx(), &toggle(1)),
            ToggleOutcome::GenericError
        );
    }

    #[test]
    fn shutdown_racing_a_request_leaves_nothing_running() {
        let t0 = Instant::now();
        for _ in 0..50 {
            let engine = DoorEngine::new(Options::default());
            thread::scope(|scope| {
                let _ = scope.spawn(|| {
                    let mut h = Harness::with(&[slider(1, IVec3::ZERO)]);
                    let _ = engine.request_toggle_at(&mut h.ctx(), &toggle(1), t0);
                });
                let _ = scope.spawn(|| {
                    let mut h = Harness::with(&[slider(1, IVec3::ZERO)]);
                    let _ = engine.shutdown(&mut h.ctx());
                });
            });
            assert!(engine.registry().is_empty());
            assert!(engine.sessions().is_empty());
            assert!(!engine.is_animating(StructureId(1)));
        }
    }

    #[test]
    fn opened_structure_closes_after_its_delay() {
        let mut s = slider(1, IVec3::ZERO);
        s.auto_close_delay = 2;
        let mut h = Harness::with(&[s.clone()]);
        let engine = DoorEngine::new(Options::default());
        let t0 = Instant::now();
        let open = toggle(1).instant().with_intent(ToggleIntent::Open);
        assert!(engine.request_toggle_at(&mut h.ctx(), &open, t0).is_success());

        let _ = engine.tick_at(&mut h.ctx(), t0 + ms(1000));
        assert!(!engine.is_animating(s.id));
        let _ = engine.tick_at(&mut h.ctx(), t0 + ms(2000));
        assert!(engine.is_animating(s.id));

        // No hint: the slider default of 3 seconds.
        let reports = engine.tick_at(&mut h.ctx(), t0 + ms(5000));
        assert_eq!(reports.len(), 1);
        let record = h.record(s.id);
        assert!(!record.is_open);
        assert_eq!(record.bounds, s.bounds);
    }

    #[test]
    fn auto_resolved_direction_is_stored() {
        let mut s = slider(1, IVec3::ZERO);
        s.open_direction = None;
        let mut h = Harness::with(&[s]);
        let engine = DoorEngine::new(Options::default());
        assert!(engine.request_toggle(&mut h.ctx(), &toggle(1).instant()).is_success());
        let record = h.record(StructureId(1));
        assert_eq!(record.open_direction, Some(Direction::North));
        assert_eq!(record.bounds.min().z, -1);
    }
}

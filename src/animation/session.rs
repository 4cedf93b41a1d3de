//! One structure's animation, from capture to commit.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use glam::Vec3;
use web_time::{Duration, Instant};

use super::clock::TickClock;
use super::kernel::{progress, Kernel};
use super::snapshot::{capture, CapturedCell, CellFilter};
use crate::context::Context;
use crate::engine::{BusyRegistry, SessionInfo, Ticket};
use crate::geometry::cell_center;
use crate::options::Options;
use crate::planner::{Plan, PlanError};
use crate::structure::{Structure, StructureId};
use crate::world::{ObstacleId, ObstacleKind, SoundCue, WorldSurface};

/// Lifecycle of a [`MoverSession`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Cells are being snapshotted. Instant sessions stay here until
    /// committed.
    Capturing,
    /// Proxies are in flight.
    Animating,
    /// Stopped early; committing next.
    Cancelled,
    /// Writing the destination cells.
    Committing,
    /// Committed; nothing else will happen.
    Done,
}

/// Why a session committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitReason {
    /// Every planned tick elapsed.
    Completed,
    /// Instant toggle, no animation.
    Instant,
    /// Cancelled by request or shutdown.
    Cancelled,
    /// The global runnable switch was turned off.
    Halted,
    /// Ran past the tick ceiling.
    TimedOut,
}

impl fmt::Display for CommitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Completed => "completed",
            Self::Instant => "instant",
            Self::Cancelled => "cancelled",
            Self::Halted => "halted",
            Self::TimedOut => "timed out",
        };
        f.write_str(name)
    }
}

/// What a commit did.
#[derive(Debug, Clone, PartialEq)]
pub struct CommitReport {
    /// The structure record as persisted.
    pub structure: Structure,
    /// Why the session ended.
    pub reason: CommitReason,
    /// Number of cells written.
    pub cells: usize,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickStatus {
    /// Still moving.
    Running,
    /// Committed during this tick.
    Committed(CommitReport),
    /// Already committed before this tick.
    Finished,
}

/// Per-session settings resolved from [`Options`] and the request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionConfig {
    /// Steps until the end pose.
    pub planned_ticks: u32,
    /// Steps after which the session is force-finalized.
    pub tick_ceiling: u32,
    /// Wall-clock length of one step.
    pub step: Duration,
    /// Velocity gain toward the target position.
    pub damping: f32,
    /// Steps between "moving" sound cues (0 = never).
    pub sound_interval: u32,
    /// Fixtures this close to the anchor are broken before moving.
    pub clear_radius: f32,
    /// Skip the animation entirely.
    pub instant: bool,
    /// Play no sounds.
    pub silent: bool,
}

impl SessionConfig {
    /// Settings for moving `structure` along `plan`.
    ///
    /// A missing or non-positive `duration_hint` falls back to the family's
    /// default duration.
    #[must_use]
    pub fn new(
        options: &Options,
        structure: &Structure,
        plan: &Plan,
        duration_hint: Option<f32>,
        instant: bool,
        silent: bool,
    ) -> Self {
        let hint = duration_hint
            .filter(|secs| *secs > 0.0)
            .unwrap_or_else(|| options.families.default_duration_secs(structure.family));
        let travel = plan.destination.motion.farthest_travel(&structure.bounds);
        let secs = options.timing.effective_duration_secs(hint, travel);
        let planned_ticks = options.timing.ticks_for(secs);
        let tolerance = options.timing.tolerance_multiplier.max(1.0);
        Self {
            planned_ticks,
            tick_ceiling: (planned_ticks as f32 * tolerance).ceil() as u32,
            step: options.timing.step_duration(),
            damping: options.motion.damping_factor,
            sound_interval: options.motion.sound_interval_ticks,
            clear_radius: options.motion.obstacle_clear_radius,
            instant,
            silent,
        }
    }
}

/// The animation of one structure.
///
/// Commit runs exactly once, whether the session completes, times out, or
/// is cancelled; it always lands every cell at the planned destination.
pub struct MoverSession {
    structure: Structure,
    ticket: Ticket,
    plan: Plan,
    config: SessionConfig,
    kernel: Kernel,
    clock: TickClock,
    cells: Vec<CapturedCell>,
    pending_fixtures: Vec<ObstacleId>,
    state: SessionState,
    midpoint_swapped: bool,
    last_sound_tick: u32,
    cancel: Arc<AtomicBool>,
}

impl fmt::Debug for MoverSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MoverSession")
            .field("door_id", &self.structure.id)
            .field("ticket", &self.ticket)
            .field("family", &self.structure.family)
            .field("direction", &self.plan.direction)
            .field("state", &self.state)
            .field("cells", &self.cells.len())
            .field("planned_ticks", &self.config.planned_ticks)
            .finish_non_exhaustive()
    }
}

impl MoverSession {
    /// Run the capture phase: check for dynamic obstacles in the way,
    /// snapshot and clear every captured cell, and spawn proxies unless
    /// the toggle is instant.
    ///
    /// `ticket` is the busy-registry reservation the session releases on
    /// commit. Fails with [`PlanError::Obstructed`] before touching the
    /// world when an obstacle stands where the structure is going.
    pub fn begin(
        structure: Structure,
        ticket: Ticket,
        plan: Plan,
        config: SessionConfig,
        filter: &dyn CellFilter,
        world: &mut dyn WorldSurface,
        now: Instant,
    ) -> Result<Self, PlanError> {
        let pending_fixtures = preflight(&structure, &plan, &config, world)?;
        let kernel = Kernel::from_motion(&plan.destination.motion);
        let cells = capture(
            world,
            &structure.bounds,
            &plan.destination.motion,
            &kernel,
            filter,
            !config.instant,
        );
        log::info!(
            "{} {}: captured {} cells, moving {} over {} ticks",
            structure.family,
            structure.id,
            cells.len(),
            plan.direction,
            config.planned_ticks,
        );

        let mut session = Self {
            structure,
            ticket,
            plan,
            config,
            kernel,
            clock: TickClock::with_start_time(now, config.step),
            cells,
            pending_fixtures,
            state: SessionState::Capturing,
            midpoint_swapped: false,
            last_sound_tick: 0,
            cancel: Arc::new(AtomicBool::new(false)),
        };
        if config.instant {
            session.clear_fixtures(world);
        } else {
            session.state = SessionState::Animating;
            session.play(world, SoundCue::Start);
        }
        Ok(session)
    }

    /// Structure being moved, as it was before the move.
    #[must_use]
    pub fn structure(&self) -> &Structure {
        &self.structure
    }

    /// Id of the structure being moved.
    #[must_use]
    pub fn door_id(&self) -> StructureId {
        self.structure.id
    }

    /// The plan being executed.
    #[must_use]
    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Captured cells.
    #[must_use]
    pub fn cells(&self) -> &[CapturedCell] {
        &self.cells
    }

    /// Planned number of steps.
    #[must_use]
    pub fn planned_ticks(&self) -> u32 {
        self.config.planned_ticks
    }

    /// Whether the session has committed.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.state == SessionState::Done
    }

    /// Shareable info handle for the busy registry.
    #[must_use]
    pub fn info(&self) -> SessionInfo {
        SessionInfo::new(
            self.structure.id,
            self.ticket,
            self.structure.family,
            self.config.planned_ticks,
            self.clock.start_time(),
            Arc::clone(&self.cancel),
        )
    }

    /// Ask the session to finalize on its next tick.
    pub fn cancel(&self) {
        self.cancel.store(true, Ordering::Release);
    }

    /// Steps of active (unpaused) time elapsed at `now`.
    #[must_use]
    pub fn elapsed_ticks(&self, now: Instant) -> u32 {
        self.clock.elapsed_ticks(now)
    }

    /// Advance the animation to `now`.
    pub fn tick(
        &mut self,
        ctx: &mut Context<'_>,
        registry: &BusyRegistry,
        now: Instant,
    ) -> TickStatus {
        if self.is_done() {
            return TickStatus::Finished;
        }
        self.clear_fixtures(ctx.world);

        if self.cancel.load(Ordering::Acquire) {
            return self.stop_and_commit(ctx, registry, CommitReason::Cancelled);
        }
        if !registry.is_runnable() {
            return self.stop_and_commit(ctx, registry, CommitReason::Halted);
        }

        self.clock.set_paused(registry.is_paused(), now);
        if self.clock.is_paused() {
            self.halt_proxies(ctx.world);
            return TickStatus::Running;
        }

        let ticks = self.clock.elapsed_ticks(now);
        if ticks > self.config.tick_ceiling {
            log::warn!(
                "{} {}: {ticks} ticks exceeds ceiling of {}, finalizing",
                self.structure.family,
                self.structure.id,
                self.config.tick_ceiling,
            );
            return self.stop_and_commit(ctx, registry, CommitReason::TimedOut);
        }

        let t = progress(ticks, self.config.planned_ticks);
        if !self.midpoint_swapped && t >= 0.5 {
            self.swap_reoriented(ctx.world, t);
        }
        self.steer(ctx.world, t);
        self.play_moving_cue(ctx.world, ticks);

        if ticks >= self.config.planned_ticks {
            return self.stop_and_commit(ctx, registry, CommitReason::Completed);
        }
        TickStatus::Running
    }

    /// Commit immediately. Returns `None` if the session already committed.
    pub fn finish(
        &mut self,
        ctx: &mut Context<'_>,
        registry: &BusyRegistry,
        reason: CommitReason,
    ) -> Option<CommitReport> {
        if self.is_done() {
            return None;
        }
        if self.state == SessionState::Animating {
            self.state = SessionState::Cancelled;
        }
        self.clear_fixtures(ctx.world);
        self.halt_proxies(ctx.world);
        Some(self.commit(ctx, registry, reason))
    }

    fn stop_and_commit(
        &mut self,
        ctx: &mut Context<'_>,
        registry: &BusyRegistry,
        reason: CommitReason,
    ) -> TickStatus {
        self.finish(ctx, registry, reason)
            .map_or(TickStatus::Finished, TickStatus::Committed)
    }

    fn commit(
        &mut self,
        ctx: &mut Context<'_>,
        registry: &BusyRegistry,
        reason: CommitReason,
    ) -> CommitReport {
        self.state = SessionState::Committing;
        let destination = self.plan.destination;
        for cell in &mut self.cells {
            if let Some(handle) = cell.proxy.take() {
                ctx.world.remove_proxy(handle);
            }
            ctx.world
                .set_block(destination.motion.apply(cell.origin), cell.rotated);
        }

        let mut structure = self.structure.clone();
        structure.bounds = destination.bounds;
        structure.anchor_side = destination.anchor_side;
        structure.is_open = !structure.is_open;
        if let Err(e) = ctx.storage.persist_bounding_volume(
            structure.id,
            structure.bounds,
            structure.is_open,
            structure.anchor_side,
        ) {
            log::warn!("failed to persist {} after commit: {e}", structure.id);
        }

        self.play(ctx.world, SoundCue::Finish);
        let _ = registry.end_animation(structure.id, self.ticket);
        self.state = SessionState::Done;

        log::info!(
            "{} {}: committed {} cells ({reason}), now {}",
            structure.family,
            structure.id,
            self.cells.len(),
            if structure.is_open { "open" } else { "closed" },
        );
        CommitReport {
            structure,
            reason,
            cells: self.cells.len(),
        }
    }

    /// Break fixtures scheduled during capture.
    fn clear_fixtures(&mut self, world: &mut dyn WorldSurface) {
        for id in self.pending_fixtures.drain(..) {
            world.break_obstacle(id);
        }
    }

    /// Steer every proxy toward its position at progress `t`.
    fn steer(&mut self, world: &mut dyn WorldSurface, t: f32) {
        let mut vanished = 0;
        for cell in &mut self.cells {
            let Some(handle) = cell.proxy else {
                continue;
            };
            let Some(current) = world.proxy_position(handle) else {
                cell.proxy = None;
                vanished += 1;
                continue;
            };
            let target = self.kernel.position(cell.path, cell.start(), t);
            world.set_proxy_velocity(handle, (target - current) * self.config.damping);
        }
        if vanished > 0 {
            log::warn!(
                "{}: {vanished} proxies vanished mid-flight",
                self.structure.id,
            );
        }
    }

    /// Respawn proxies whose block looks different at the destination, so
    /// the second half of the motion shows the final orientation.
    fn swap_reoriented(&mut self, world: &mut dyn WorldSurface, t: f32) {
        self.midpoint_swapped = true;
        for cell in self.cells.iter_mut().filter(|c| c.reorients()) {
            let Some(old) = cell.proxy else {
                continue;
            };
            let at = world
                .proxy_position(old)
                .unwrap_or_else(|| self.kernel.position(cell.path, cell.start(), t));
            world.remove_proxy(old);
            cell.proxy = Some(world.spawn_proxy(at, cell.rotated));
        }
    }

    fn halt_proxies(&self, world: &mut dyn WorldSurface) {
        for handle in self.cells.iter().filter_map(|c| c.proxy) {
            world.set_proxy_velocity(handle, Vec3::ZERO);
        }
    }

    fn play_moving_cue(&mut self, world: &mut dyn WorldSurface, ticks: u32) {
        let interval = self.config.sound_interval;
        if interval == 0 || ticks / interval <= self.last_sound_tick / interval {
            return;
        }
        self.last_sound_tick = ticks;
        self.play(world, SoundCue::Moving);
    }

    /// Cues play at the anchor, which never moves.
    fn play(&self, world: &mut dyn WorldSurface, cue: SoundCue) {
        if !self.config.silent {
            world.play_sound(cell_center(self.structure.anchor), cue);
        }
    }
}

/// Check dynamic obstacles around the move. Returns fixtures next to the
/// anchor, which are broken instead of blocking; anything else standing in
/// a destination cell the structure does not already occupy obstructs.
fn preflight(
    structure: &Structure,
    plan: &Plan,
    config: &SessionConfig,
    world: &dyn WorldSurface,
) -> Result<Vec<ObstacleId>, PlanError> {
    let destination = plan.destination.bounds;
    let sweep = structure.bounds.union(&destination);
    let reach = sweep.dimensions().as_vec3().length() * 0.5 + 1.0;
    let anchor = cell_center(structure.anchor);

    let mut fixtures = Vec::new();
    for obstacle in world.nearby_obstacles(sweep.center(), reach) {
        if obstacle.kind == ObstacleKind::Fixture
            && obstacle.position.distance(anchor) <= config.clear_radius
        {
            fixtures.push(obstacle.id);
            continue;
        }
        let cell = obstacle.cell();
        if destination.contains(cell) && !structure.bounds.contains(cell) {
            log::debug!(
                "{}: {:?} obstacle at {cell} blocks the destination",
                structure.id,
                obstacle.kind,
            );
            return Err(PlanError::Obstructed);
        }
    }
    Ok(fixtures)
}

#[cfg(test)]
mod tests {
    use glam::IVec3;

    use super::*;
    use crate::context::{AccessPolicy, MemoryStorage, RecordingEvents};
    use crate::engine::Reservation;
    use crate::geometry::{Axis, Cuboid, Direction, Face};
    use crate::planner::Planner;
    use crate::structure::Family;
    use crate::world::{BlockState, Material, MemoryWorld, Orientation};

    const STONE: BlockState = BlockState {
        material: Material::Solid(1),
        orientation: Orientation::None,
    };

    struct Harness {
        world: MemoryWorld,
        storage: MemoryStorage,
        policy: AccessPolicy,
        events: RecordingEvents,
        registry: BusyRegistry,
        options: Options,
    }

    impl Harness {
        fn new(structure: &Structure) -> Self {
            let mut world = MemoryWorld::new();
            world.fill(&structure.bounds, STONE);
            let mut storage = MemoryStorage::new();
            storage.insert(structure.clone());
            Self {
                world,
                storage,
                policy: AccessPolicy::allow_all(),
                events: RecordingEvents::default(),
                registry: BusyRegistry::new(),
                options: Options::default(),
            }
        }

        fn ctx(&mut self) -> Context<'_> {
            Context::new(
                &mut self.world,
                &mut self.storage,
                &self.policy,
                &mut self.events,
            )
        }

        fn start(&mut self, structure: &Structure, instant: bool, t0: Instant) -> MoverSession {
            let plan = Planner::new(&self.options)
                .resolve(structure, &self.world)
                .unwrap();
            let config = SessionConfig::new(&self.options, structure, &plan, Some(1.0), instant, false);
            let session = self.begin(structure, plan, config, t0);
            assert!(self.registry.attach_session(session.info()));
            session
        }

        /// Reserve and capture without attaching.
        fn begin(
            &mut self,
            structure: &Structure,
            plan: Plan,
            config: SessionConfig,
            t0: Instant,
        ) -> MoverSession {
            let Reservation::Reserved(ticket) = self.registry.try_begin_animation(structure.id)
            else {
                panic!("{} already busy", structure.id);
            };
            let filter = |b: BlockState| !b.material.is_air_or_liquid();
            MoverSession::begin(structure.clone(), ticket, plan, config, &filter, &mut self.world, t0)
                .unwrap()
        }

        fn tick(&mut self, session: &mut MoverSession, now: Instant) -> TickStatus {
            let registry = std::mem::take(&mut self.registry);
            let status = session.tick(&mut self.ctx(), &registry, now);
            self.registry = registry;
            status
        }
    }

    fn slider() -> Structure {
        Structure::new(
            StructureId(1),
            Family::Slider,
            Cuboid::new(IVec3::ZERO, IVec3::new(4, 4, 0)),
            IVec3::ZERO,
        )
        .with_open_direction(Direction::East)
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn config_resolves_ticks_and_ceiling() {
        let options = Options::default();
        let s = slider();
        let plan = Planner::new(&options).resolve(&s, &MemoryWorld::new()).unwrap();
        let config = SessionConfig::new(&options, &s, &plan, Some(1.0), false, false);
        assert_eq!(config.planned_ticks, 20);
        assert_eq!(config.tick_ceiling, 30);
        // No hint: slider default of 3 seconds.
        let config = SessionConfig::new(&options, &s, &plan, None, false, false);
        assert_eq!(config.planned_ticks, 60);
        let config = SessionConfig::new(&options, &s, &plan, Some(-2.0), false, false);
        assert_eq!(config.planned_ticks, 60);
    }

    #[test]
    fn animation_completes_at_planned_tick() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        assert_eq!(session.state(), SessionState::Animating);
        assert_eq!(h.world.proxy_count(), 25);
        assert_eq!(h.world.count_solid(&s.bounds), 0);

        assert_eq!(h.tick(&mut session, t0 + ms(500)), TickStatus::Running);
        let TickStatus::Committed(report) = h.tick(&mut session, t0 + ms(1000)) else {
            panic!("expected commit");
        };
        assert_eq!(report.reason, CommitReason::Completed);
        assert_eq!(report.cells, 25);
        assert!(report.structure.is_open);
        let moved = Cuboid::new(IVec3::new(5, 0, 0), IVec3::new(9, 4, 0));
        assert_eq!(report.structure.bounds, moved);
        assert_eq!(h.world.count_solid(&moved), 25);
        assert_eq!(h.world.proxy_count(), 0);
        assert_eq!(h.storage.get(s.id).unwrap().bounds, moved);
        assert!(!h.registry.is_busy(s.id));
    }

    #[test]
    fn proxies_are_steered_toward_their_targets() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        let _ = h.tick(&mut session, t0 + ms(500));
        let handle = session.cells()[0].proxy.unwrap();
        h.world.step_proxies(1);
        let pos = h.world.proxy_position(handle).unwrap();
        // Halfway target is 2.5 cells east; one damped step covers a tenth.
        assert!((pos.x - (0.5 + 0.25)).abs() < 1e-4, "{pos}");
    }

    #[test]
    fn cancel_finalizes_at_the_planned_end() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        let _ = h.tick(&mut session, t0 + ms(200));
        assert!(h.registry.cancel(s.id));
        let TickStatus::Committed(report) = h.tick(&mut session, t0 + ms(250)) else {
            panic!("expected commit");
        };
        assert_eq!(report.reason, CommitReason::Cancelled);
        assert_eq!(report.structure.bounds.min(), IVec3::new(5, 0, 0));
        // Cancelling again does nothing.
        session.cancel();
        assert_eq!(h.tick(&mut session, t0 + ms(300)), TickStatus::Finished);
        assert!(session.finish(&mut h.ctx(), &BusyRegistry::new(), CommitReason::Cancelled).is_none());
        assert_eq!(h.storage.volume_writes, 1);
    }

    #[test]
    fn halting_commits_running_sessions() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        h.registry.set_runnable(false);
        let TickStatus::Committed(report) = h.tick(&mut session, t0 + ms(100)) else {
            panic!("expected commit");
        };
        assert_eq!(report.reason, CommitReason::Halted);
    }

    #[test]
    fn stalled_host_times_out() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        let TickStatus::Committed(report) = h.tick(&mut session, t0 + ms(10_000)) else {
            panic!("expected commit");
        };
        assert_eq!(report.reason, CommitReason::TimedOut);
        assert_eq!(report.structure.bounds.min(), IVec3::new(5, 0, 0));
    }

    #[test]
    fn pause_excludes_frozen_time() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        let _ = h.tick(&mut session, t0 + ms(300));
        h.registry.set_paused(true);
        let _ = h.tick(&mut session, t0 + ms(400));
        assert_eq!(h.tick(&mut session, t0 + ms(5_400)), TickStatus::Running);
        h.registry.set_paused(false);
        assert_eq!(h.tick(&mut session, t0 + ms(5_400)), TickStatus::Running);
        // 5 s paused: active time is 400 ms, within one tick.
        let ticks = session.elapsed_ticks(t0 + ms(5_400));
        assert!((7..=8).contains(&ticks), "{ticks}");
        assert!(matches!(
            h.tick(&mut session, t0 + ms(6_100)),
            TickStatus::Committed(_)
        ));
    }

    #[test]
    fn sounds_mark_start_progress_and_finish() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        for step in 1..=20 {
            let _ = h.tick(&mut session, t0 + ms(50 * step));
        }
        let cues: Vec<SoundCue> = h.world.sounds.iter().map(|(_, cue)| *cue).collect();
        assert_eq!(
            cues,
            vec![SoundCue::Start, SoundCue::Moving, SoundCue::Moving, SoundCue::Finish]
        );
    }

    #[test]
    fn instant_session_spawns_nothing() {
        let s = slider();
        let mut h = Harness::new(&s);
        let mut session = h.start(&s, true, Instant::now());
        assert_eq!(session.state(), SessionState::Capturing);
        let registry = std::mem::take(&mut h.registry);
        let report = session
            .finish(&mut h.ctx(), &registry, CommitReason::Instant)
            .unwrap();
        assert_eq!(report.cells, 25);
        assert_eq!(h.world.proxies_spawned(), 0);
        assert!(session.is_done());
    }

    #[test]
    fn reoriented_blocks_swap_proxies_at_the_midpoint() {
        let s = Structure::new(
            StructureId(4),
            Family::Hinge,
            Cuboid::new(IVec3::ZERO, IVec3::new(0, 3, 0)),
            IVec3::ZERO,
        )
        .with_open_direction(Direction::North);
        let mut h = Harness::new(&s);
        let log = BlockState::oriented(Material::Solid(17), Orientation::Axis(Axis::Y));
        h.world.set_block(IVec3::new(0, 3, 0), log);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        assert_eq!(h.world.proxies_spawned(), 4);

        let _ = h.tick(&mut session, t0 + ms(100));
        assert_eq!(h.world.proxies_spawned(), 4);
        let _ = h.tick(&mut session, t0 + ms(550));
        assert_eq!(h.world.proxies_spawned(), 5);
        let swapped = session.cells().iter().find(|c| c.reorients()).unwrap();
        assert_eq!(
            h.world.proxy_block(swapped.proxy.unwrap()).unwrap().orientation,
            Orientation::Axis(Axis::Z)
        );
        assert_eq!(h.world.proxy_count(), 4);

        let TickStatus::Committed(report) = h.tick(&mut session, t0 + ms(1000)) else {
            panic!("expected commit");
        };
        assert_eq!(report.structure.anchor_side, Some(Face::South));
        assert_eq!(
            h.world.block_at(IVec3::new(0, 0, -3)).orientation,
            Orientation::Axis(Axis::Z)
        );
    }

    #[test]
    fn vanished_proxies_still_commit_their_cells() {
        let s = slider();
        let mut h = Harness::new(&s);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        let handle = session.cells()[3].proxy.unwrap();
        h.world.despawn_proxy(handle);
        let _ = h.tick(&mut session, t0 + ms(100));
        assert!(session.cells()[3].proxy.is_none());
        let _ = h.tick(&mut session, t0 + ms(1000));
        assert_eq!(
            h.world.count_solid(&Cuboid::new(IVec3::new(5, 0, 0), IVec3::new(9, 4, 0))),
            25
        );
    }

    #[test]
    fn bodies_in_the_destination_obstruct_before_capture() {
        let s = slider();
        let mut h = Harness::new(&s);
        let _ = h.world.add_obstacle(Vec3::new(7.5, 1.2, 0.5), ObstacleKind::Body);
        let plan = Planner::new(&h.options).resolve(&s, &h.world).unwrap();
        let config = SessionConfig::new(&h.options, &s, &plan, None, false, false);
        let filter = |b: BlockState| !b.material.is_air();
        let Reservation::Reserved(ticket) = h.registry.try_begin_animation(s.id) else {
            panic!("fresh registry is busy");
        };
        let err = MoverSession::begin(s.clone(), ticket, plan, config, &filter, &mut h.world, Instant::now())
            .unwrap_err();
        assert_eq!(err, PlanError::Obstructed);
        assert_eq!(h.world.count_solid(&s.bounds), 25);
        assert_eq!(h.world.proxies_spawned(), 0);
    }

    #[test]
    fn fixtures_near_the_anchor_break_one_tick_after_capture() {
        let s = slider();
        let mut h = Harness::new(&s);
        let frame = h.world.add_obstacle(Vec3::new(0.5, 0.5, -0.1), ObstacleKind::Fixture);
        let t0 = Instant::now();
        let mut session = h.start(&s, false, t0);
        assert!(h.world.broken_obstacles.is_empty());
        let _ = h.tick(&mut session, t0 + ms(50));
        assert_eq!(h.world.broken_obstacles, vec![frame]);
    }

    #[test]
    fn stale_session_commits_without_releasing_its_successor() {
        let s = slider();
        let mut h = Harness::new(&s);
        let plan = Planner::new(&h.options).resolve(&s, &h.world).unwrap();
        let config = SessionConfig::new(&h.options, &s, &plan, Some(1.0), false, false);
        let t0 = Instant::now();
        let mut stale = h.begin(&s, plan, config, t0);

        // Shutdown drops the placeholder, then another request reserves.
        assert_eq!(h.registry.cancel_all(true), 0);
        let Reservation::Reserved(current) = h.registry.try_begin_animation(s.id) else {
            panic!("door should be free after placeholders are dropped");
        };
        assert!(!h.registry.attach_session(stale.info()));

        let registry = std::mem::take(&mut h.registry);
        let report = stale
            .finish(&mut h.ctx(), &registry, CommitReason::Cancelled)
            .unwrap();
        assert_eq!(report.structure.bounds.min(), IVec3::new(5, 0, 0));
        assert!(registry.is_busy(s.id));
        assert_eq!(registry.try_begin_animation(s.id), Reservation::Busy);
        assert!(registry.end_animation(s.id, current));
    }
}

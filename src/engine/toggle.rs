//! Toggle admission for DoorEngine

use web_time::Instant;

use super::{DoorEngine, Reservation, Ticket, ToggleOutcome, ToggleRequest};
use crate::animation::{CommitReason, MoverSession, SessionConfig};
use crate::context::Context;
use crate::planner::Planner;
use crate::structure::Structure;
use crate::world::BlockState;

impl DoorEngine {
    /// Decide whether a toggle may run and, if so, start it.
    ///
    /// World-independent checks (halt switch, intent, lock, family switch,
    /// size and travel limits) run before the structure is reserved, so a
    /// refused request never leaves a registry entry behind. Instant
    /// toggles commit before this returns.
    pub fn request_toggle(
        &self,
        ctx: &mut Context<'_>,
        request: &ToggleRequest,
    ) -> ToggleOutcome {
        self.request_toggle_at(ctx, request, Instant::now())
    }

    /// [`DoorEngine::request_toggle`] with an explicit start time.
    pub fn request_toggle_at(
        &self,
        ctx: &mut Context<'_>,
        request: &ToggleRequest,
        now: Instant,
    ) -> ToggleOutcome {
        let outcome = self.admit(ctx, request, now);
        log::debug!("{}: toggle request -> {outcome}", request.door_id);
        outcome
    }

    fn admit(
        &self,
        ctx: &mut Context<'_>,
        request: &ToggleRequest,
        now: Instant,
    ) -> ToggleOutcome {
        if !self.registry.is_runnable() {
            return ToggleOutcome::GenericError;
        }
        let Some(structure) = ctx.storage.load_structure(request.door_id) else {
            return ToggleOutcome::NoStructuresFound;
        };
        if let Some(refusal) = request.intent.refusal(structure.is_open) {
            return refusal;
        }
        if !self.options.families.get(structure.family).enabled {
            return ToggleOutcome::TypeDisabled;
        }
        let actor_limit = request
            .actor
            .map(|actor| ctx.permissions.size_limit_for(actor));
        if let Err(e) = Planner::new(&self.options).validate(&structure, actor_limit) {
            return e.into();
        }

        let Reservation::Reserved(ticket) = self.registry.try_begin_animation(structure.id)
        else {
            return ToggleOutcome::Busy;
        };
        let id = structure.id;
        match self.start(ctx, structure, ticket, request, now) {
            Ok(()) => ToggleOutcome::Success,
            Err(outcome) => {
                let _ = self.registry.end_animation(id, ticket);
                outcome
            }
        }
    }

    /// Plan and start a reserved toggle. On `Err` the caller releases the
    /// reservation; once a session exists it owns the reservation.
    fn start(
        &self,
        ctx: &mut Context<'_>,
        structure: Structure,
        ticket: Ticket,
        request: &ToggleRequest,
        now: Instant,
    ) -> Result<(), ToggleOutcome> {
        let planner = Planner::new(&self.options);
        let plan = planner.plan(&structure, ctx)?;

        let sweep = structure.bounds.union(&plan.destination.bounds);
        if !ctx.world.is_region_loaded(&sweep) {
            return Err(ToggleOutcome::RegionsNotLoaded);
        }
        if let Some(actor) = request.actor {
            if !ctx.permissions.has_access(actor, &plan.destination.bounds) {
                return Err(ToggleOutcome::NoPermission);
            }
        }
        if ctx.events.toggle_prepare(&structure, request.instant) {
            return Err(ToggleOutcome::Cancelled);
        }

        let config = SessionConfig::new(
            &self.options,
            &structure,
            &plan,
            request.duration_hint,
            request.instant,
            request.silent,
        );
        let filter = |block: BlockState| planner.captures(block);
        let mut session =
            MoverSession::begin(structure, ticket, plan, config, &filter, ctx.world, now)?;
        ctx.events.toggle_start(session.structure(), request.instant);

        if request.instant {
            if let Some(report) = session.finish(ctx, &self.registry, CommitReason::Instant) {
                self.schedule_auto_close(&report, now);
            }
            return Ok(());
        }
        // Attach and publish under one sessions guard: a shutdown either
        // halted the engine or dropped the placeholder before we got here,
        // or it finds the session in the list.
        let mut sessions = self.sessions();
        if self.registry.is_runnable() && self.registry.attach_session(session.info()) {
            sessions.push(session);
            return Ok(());
        }
        drop(sessions);
        log::warn!(
            "{}: engine halted while starting, committing now",
            session.door_id(),
        );
        let _ = session.finish(ctx, &self.registry, CommitReason::Cancelled);
        Ok(())
    }
}

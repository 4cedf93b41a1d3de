use super::ToggleOutcome;
use crate::context::ActorId;
use crate::structure::StructureId;

/// What the caller wants the structure to end up as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToggleIntent {
    /// Flip whatever the current state is.
    #[default]
    Toggle,
    /// Open; refused if already open.
    Open,
    /// Close; refused if already closed.
    Close,
}

impl ToggleIntent {
    /// Refusal for a structure whose open state is `is_open`, if any.
    #[must_use]
    pub fn refusal(self, is_open: bool) -> Option<ToggleOutcome> {
        match (self, is_open) {
            (Self::Open, true) => Some(ToggleOutcome::AlreadyOpen),
            (Self::Close, false) => Some(ToggleOutcome::AlreadyClosed),
            _ => None,
        }
    }
}

/// One toggle request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleRequest {
    /// Structure to move.
    pub door_id: StructureId,
    /// Who asked; `None` for the server itself (no size or access checks).
    pub actor: Option<ActorId>,
    /// Requested duration in seconds; the family default when `None`.
    pub duration_hint: Option<f32>,
    /// Move without animating.
    pub instant: bool,
    /// Play no sounds.
    pub silent: bool,
    /// Desired end state.
    pub intent: ToggleIntent,
}

impl ToggleRequest {
    /// Plain toggle by the server.
    #[must_use]
    pub fn new(door_id: StructureId) -> Self {
        Self {
            door_id,
            actor: None,
            duration_hint: None,
            instant: false,
            silent: false,
            intent: ToggleIntent::Toggle,
        }
    }

    /// Builder-style: set the requesting actor.
    #[must_use]
    pub fn by(mut self, actor: ActorId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Builder-style: set the duration hint.
    #[must_use]
    pub fn with_duration(mut self, secs: f32) -> Self {
        self.duration_hint = Some(secs);
        self
    }

    /// Builder-style: move without animating.
    #[must_use]
    pub fn instant(mut self) -> Self {
        self.instant = true;
        self
    }

    /// Builder-style: suppress sounds.
    #[must_use]
    pub fn silent(mut self) -> Self {
        self.silent = true;
        self
    }

    /// Builder-style: set the intent.
    #[must_use]
    pub fn with_intent(mut self, intent: ToggleIntent) -> Self {
        self.intent = intent;
        self
    }
}

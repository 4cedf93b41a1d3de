use std::fmt;

use crate::planner::PlanError;

/// Admission decision for one toggle request.
///
/// Every request produces exactly one outcome; nothing is raised to the
/// caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToggleOutcome {
    /// The structure is moving (or, for instant toggles, has moved).
    Success,
    /// No structure with that id.
    NoStructuresFound,
    /// The structure is already moving.
    Busy,
    /// The structure is locked.
    Locked,
    /// Toggling is halted globally.
    GenericError,
    /// A listener vetoed the toggle.
    Cancelled,
    /// The structure exceeds the size limit.
    TooBig,
    /// The actor may not build at the destination.
    NoPermission,
    /// Something is in the way.
    Obstructed,
    /// No valid unobstructed direction exists.
    NoDirection,
    /// Asked to open an open structure.
    AlreadyOpen,
    /// Asked to close a closed structure.
    AlreadyClosed,
    /// The structure's family is disabled.
    TypeDisabled,
    /// Part of the source or destination is not loaded.
    RegionsNotLoaded,
    /// The travel distance is out of range.
    InvalidTravelDistance,
}

impl ToggleOutcome {
    /// Whether the toggle was admitted.
    #[must_use]
    pub fn is_success(self) -> bool {
        self == Self::Success
    }
}

impl From<PlanError> for ToggleOutcome {
    fn from(e: PlanError) -> Self {
        match e {
            PlanError::Locked => Self::Locked,
            PlanError::TooBig => Self::TooBig,
            PlanError::InvalidTravelDistance => Self::InvalidTravelDistance,
            PlanError::NoDirection => Self::NoDirection,
            PlanError::Obstructed => Self::Obstructed,
        }
    }
}

impl fmt::Display for ToggleOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::Success => "success",
            Self::NoStructuresFound => "no structures found",
            Self::Busy => "structure is busy",
            Self::Locked => "structure is locked",
            Self::GenericError => "toggling is halted",
            Self::Cancelled => "toggle was cancelled",
            Self::TooBig => "structure is too big",
            Self::NoPermission => "no permission for the destination",
            Self::Obstructed => "destination is obstructed",
            Self::NoDirection => "no direction available",
            Self::AlreadyOpen => "structure is already open",
            Self::AlreadyClosed => "structure is already closed",
            Self::TypeDisabled => "structure type is disabled",
            Self::RegionsNotLoaded => "regions are not loaded",
            Self::InvalidTravelDistance => "invalid travel distance",
        };
        f.write_str(msg)
    }
}

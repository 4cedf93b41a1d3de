//! Animation execution: moving captured cells along a trajectory.
//!
//! A [`MoverSession`] snapshots a structure's cells, replaces them with
//! moving proxies, steers the proxies along the family's [`Kernel`] on
//! every tick, and finally writes the cells at their destination.

mod clock;
pub mod kernel;
mod session;
mod snapshot;

pub use clock::TickClock;
pub use kernel::{CellPath, Kernel};
pub use session::{
    CommitReason, CommitReport, MoverSession, SessionConfig, SessionState,
    TickStatus,
};
pub use snapshot::{capture, CapturedCell, CellFilter};

// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Animated multi-cell structures for voxel worlds: drawbridges, rotating
//! gates, portcullises, sliding walls, and elevators.
//!
//! A toggle request is planned in closed form (where does every cell end
//! up?), admitted under a per-structure busy lock, and then animated by
//! detached proxies steered along a trajectory kernel until the cells are
//! written back at their destination.
//!
//! # Key entry points
//!
//! - [`engine::DoorEngine`] - admits toggle requests and drives the tick loop
//! - [`planner::Planner`] - destination volumes and direction resolution
//! - [`animation::MoverSession`] - one structure's capture/animate/commit
//!   state machine
//! - [`world::WorldSurface`] and [`context::Context`] - everything the core
//!   needs from the host
//! - [`options::Options`] - runtime configuration (limits, timing, motion,
//!   families)
//!
//! # Architecture
//!
//! All host access goes through an explicit [`context::Context`] passed to
//! every call. The [`engine::BusyRegistry`] is the only state shared between
//! request threads and the tick thread; it guarantees at most one
//! animation per structure. Sessions derive their progress from wall-clock
//! time, so a delayed host skips frames instead of stretching the motion.

pub mod animation;
pub mod context;
pub mod engine;
pub mod error;
pub mod geometry;
pub mod options;
pub mod planner;
pub mod structure;
pub mod world;

//! Headless demo: a drawbridge and a sliding wall in an in-memory world.
//!
//! Usage: `drawbridge [options.toml]`. Set `RUST_LOG=debug` for per-toggle
//! admission details.

use std::path::Path;

use drawbridge::context::{AccessPolicy, Context, MemoryStorage, RecordingEvents};
use drawbridge::engine::{DoorEngine, ToggleRequest};
use drawbridge::geometry::{Cuboid, Direction, Face};
use drawbridge::options::Options;
use drawbridge::structure::{Family, Structure, StructureId};
use drawbridge::world::{BlockState, Material, MemoryWorld, Orientation};
use glam::IVec3;
use web_time::Instant;

const PLANKS: BlockState = BlockState {
    material: Material::Solid(5),
    orientation: Orientation::None,
};

/// Upright bridge 5 wide and 6 tall, hinged along its bottom edge.
fn hinged_bridge() -> Structure {
    Structure::new(
        StructureId(1),
        Family::Hinge,
        Cuboid::new(IVec3::new(0, 64, 0), IVec3::new(4, 69, 0)),
        IVec3::new(0, 64, 0),
    )
    .with_open_direction(Direction::North)
    .with_anchor_side(Face::South)
}

/// 5×5 wall sliding east by its own width.
fn sliding_wall() -> Structure {
    Structure::new(
        StructureId(2),
        Family::Slider,
        Cuboid::new(IVec3::new(20, 64, 0), IVec3::new(24, 68, 0)),
        IVec3::new(20, 64, 0),
    )
    .with_open_direction(Direction::East)
}

fn load_options() -> Options {
    let Some(path) = std::env::args().nth(1) else {
        return Options::default();
    };
    match Options::load(Path::new(&path)) {
        Ok(options) => {
            log::info!("loaded options from {path}");
            options
        }
        Err(e) => {
            log::error!("{e}; using defaults");
            Options::default()
        }
    }
}

fn main() {
    env_logger::init();

    let options = load_options();
    let step = options.timing.step_duration();
    let host_ticks = options.timing.tick_rate;

    let mut world = MemoryWorld::new();
    let mut storage = MemoryStorage::new();
    let policy = AccessPolicy::allow_all();
    let mut events = RecordingEvents::default();
    for structure in [hinged_bridge(), sliding_wall()] {
        world.fill(&structure.bounds, PLANKS);
        storage.insert(structure);
    }

    let engine = DoorEngine::new(options);
    let mut now = Instant::now();
    {
        let mut ctx = Context::new(&mut world, &mut storage, &policy, &mut events);
        for id in [StructureId(1), StructureId(2)] {
            let outcome =
                engine.request_toggle_at(&mut ctx, &ToggleRequest::new(id), now);
            log::info!("toggle {id}: {outcome}");
        }
        let again = ToggleRequest::new(StructureId(1));
        let busy = engine.request_toggle_at(&mut ctx, &again, now);
        log::info!("toggle {} again while moving: {busy}", again.door_id);
    }

    let mut tick = 0_u32;
    while !engine.active_animations().is_empty() {
        now += step;
        tick += 1;
        // Host physics: proxies drift by their velocity between callbacks.
        world.step_proxies(host_ticks);
        let mut ctx = Context::new(&mut world, &mut storage, &policy, &mut events);
        for report in engine.tick_at(&mut ctx, now) {
            log::info!(
                "tick {tick}: {} {} ({}), {} cells now at {}..{}",
                report.structure.family,
                report.structure.id,
                report.reason,
                report.cells,
                report.structure.bounds.min(),
                report.structure.bounds.max(),
            );
        }
    }

    for id in [StructureId(1), StructureId(2)] {
        if let Some(record) = storage.get(id) {
            log::info!(
                "{} {id}: {}, {} solid cells in place",
                record.family,
                if record.is_open { "open" } else { "closed" },
                world.count_solid(&record.bounds),
            );
        }
    }
    log::info!("{} sound cues played", world.sounds.len());
}

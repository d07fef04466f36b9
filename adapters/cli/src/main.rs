#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that streams an endless tile world headlessly.
//!
//! Two independent layers run side by side, exactly as a game scene would
//! host them: a lazily generated ground layer and a statically seeded
//! decoration layer, each with its own palette, surface, tracker, and
//! refresher. The focal point wanders randomly for a configurable number of
//! ticks, after which the visible window is rendered to the terminal.

mod manifest;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use endless_ground_core::{TileId, UniformRng, WorldPosition};
use endless_ground_surface::{FocalSource, GridSurface};
use endless_ground_system_refresh::{RefreshKind, ViewRefresher};
use endless_ground_system_viewport::ViewportTracker;
use endless_ground_world::{DecoLayer, GroundLayer, TileStore};
use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::manifest::StreamSetup;

/// Glyphs used when rendering ground tiles to the terminal.
const TILE_GLYPHS: [char; 8] = ['.', ',', '`', '~', '^', '"', ':', ';'];
/// Glyphs used when rendering decoration tiles to the terminal.
const DECO_GLYPHS: [char; 4] = ['*', 'o', '#', '&'];
/// Widest half-extent rendered to the terminal, whatever the window radius.
const MAX_RENDER_RADIUS: u32 = 12;

/// Seed stream label for the decoration layer.
const DECO_SEED_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;
/// Seed stream label for the focal-point walk.
const WALK_SEED_STREAM: u64 = 0x5851_f42d_4c95_7f2d;

/// Streams an unbounded tile world around a wandering focal point.
#[derive(Debug, Parser)]
#[command(name = "endless-ground")]
struct Args {
    /// Seed for world generation and the focal-point walk.
    #[arg(long, default_value_t = 0x5eed_cafe)]
    seed: u64,
    /// Number of simulation ticks to run.
    #[arg(long, default_value_t = 240)]
    ticks: u32,
    /// Path to a TOML manifest overriding the built-in configuration.
    #[arg(long)]
    manifest: Option<PathBuf>,
}

/// Adapts the ChaCha stream cipher to the engine's uniform-draw contract.
struct ChaChaSampler(ChaCha8Rng);

impl ChaChaSampler {
    fn from_seed(seed: u64) -> Self {
        Self(ChaCha8Rng::seed_from_u64(seed))
    }
}

impl UniformRng for ChaChaSampler {
    fn sample_below(&mut self, bound: u64) -> u64 {
        self.0.gen_range(0..bound)
    }
}

/// Per-layer refresh statistics reported at the end of a run.
#[derive(Debug, Default)]
struct StreamCounters {
    full: u32,
    incremental: u32,
    fallback: u32,
}

impl StreamCounters {
    fn record(&mut self, kind: RefreshKind) {
        match kind {
            RefreshKind::Full => self.full += 1,
            RefreshKind::Incremental => self.incremental += 1,
            RefreshKind::FullFallback => self.fallback += 1,
        }
    }
}

/// Entry point for the Endless Ground command-line demo.
fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    let setup = match &args.manifest {
        Some(path) => manifest::load(path)?,
        None => manifest::default_setup()?,
    };
    run(&args, setup)
}

fn run(args: &Args, setup: StreamSetup) -> Result<()> {
    log::info!(
        "seed {:#x}, {} ticks, painted radius ({}, {}), store diameter {:?}",
        args.seed,
        args.ticks,
        setup.window.radius().x(),
        setup.window.radius().z(),
        setup.window.diameter(),
    );

    let mut ground_rng = ChaChaSampler::from_seed(args.seed);
    let mut deco_rng = ChaChaSampler::from_seed(args.seed ^ DECO_SEED_STREAM);
    let mut walk_rng = ChaChaSampler::from_seed(args.seed ^ WALK_SEED_STREAM);

    let mut ground = GroundLayer::new(&setup.window, setup.ground_palette);
    let mut deco = DecoLayer::new(
        &setup.window,
        setup.deco_palette,
        setup.deco_count,
        &mut deco_rng,
    );
    log::info!("seeded {} decorations", deco.placement_count());

    let mut ground_surface = GridSurface::new();
    let mut deco_surface = GridSurface::new();
    let mut ground_tracker = ViewportTracker::new();
    let mut deco_tracker = ViewportTracker::new();
    let mut ground_refresher = ViewRefresher::new(setup.window);
    let mut deco_refresher = ViewRefresher::new(setup.window);
    let mut ground_counters = StreamCounters::default();
    let mut deco_counters = StreamCounters::default();

    let mut focal = FocalSource::at(Vec2::ZERO);
    for _ in 0..args.ticks {
        let step = Vec2::new(walk_step(&mut walk_rng), walk_step(&mut walk_rng));
        focal.set_position(focal.world_space() + step);
        let position = focal.grid_position();

        advance(
            position,
            &mut ground,
            &mut ground_surface,
            &mut ground_tracker,
            &mut ground_refresher,
            &mut ground_rng,
            &mut ground_counters,
        );
        advance(
            position,
            &mut deco,
            &mut deco_surface,
            &mut deco_tracker,
            &mut deco_refresher,
            &mut deco_rng,
            &mut deco_counters,
        );
    }

    let position = focal.grid_position();
    println!(
        "{}",
        render_window(
            &ground_surface,
            &deco_surface,
            position,
            setup.window.radius().x(),
            setup.window.radius().z(),
        ),
    );
    println!(
        "focal point settled at ({}, {})",
        position.x(),
        position.z(),
    );

    log::info!(
        "ground refreshes: {} full, {} incremental, {} fallback; {} cells generated",
        ground_counters.full,
        ground_counters.incremental,
        ground_counters.fallback,
        ground.generated_cells(),
    );
    log::info!(
        "deco refreshes: {} full, {} incremental, {} fallback; {} cells painted",
        deco_counters.full,
        deco_counters.incremental,
        deco_counters.fallback,
        deco_surface.tile_count(),
    );

    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn advance<S: TileStore>(
    position: WorldPosition,
    store: &mut S,
    surface: &mut GridSurface,
    tracker: &mut ViewportTracker,
    refresher: &mut ViewRefresher,
    rng: &mut dyn UniformRng,
    counters: &mut StreamCounters,
) {
    if tracker.should_refresh(position) {
        let kind = refresher.refresh(store, surface, rng, position);
        counters.record(kind);
        tracker.mark_applied(position);
    }
}

fn walk_step(rng: &mut dyn UniformRng) -> f32 {
    rng.sample_below(3) as f32 - 1.0
}

fn render_window(
    ground: &GridSurface,
    deco: &GridSurface,
    center: WorldPosition,
    radius_x: u32,
    radius_z: u32,
) -> String {
    let rx = i64::from(radius_x.min(MAX_RENDER_RADIUS));
    let rz = i64::from(radius_z.min(MAX_RENDER_RADIUS));

    let mut out = String::new();
    for z in (center.z() - rz..center.z() + rz).rev() {
        for x in center.x() - rx..center.x() + rx {
            let position = WorldPosition::new(x, z);
            let glyph = match deco.tile_at(position) {
                Some(tile) => deco_glyph(tile),
                None => ground.tile_at(position).map_or(' ', tile_glyph),
            };
            out.push(glyph);
        }
        out.push('\n');
    }
    out
}

fn tile_glyph(tile: TileId) -> char {
    TILE_GLYPHS[tile.get() as usize % TILE_GLYPHS.len()]
}

fn deco_glyph(tile: TileId) -> char {
    DECO_GLYPHS[tile.get() as usize % DECO_GLYPHS.len()]
}

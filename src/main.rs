//! Headless driver: builds a small scene, runs it at the configured frame rate
//! and prints the final grid.
//!
//! Usage: `sand-world [config.toml] [frames]`

use anyhow::{Context, Result};
use sand_world::{BlockType, Brush, SimConfig, Simulation};

const DEFAULT_FRAMES: u32 = 600;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => SimConfig::load(&path).with_context(|| format!("loading {path}"))?,
        None => SimConfig::default(),
    };
    let frames = match args.next() {
        Some(n) => n.parse().with_context(|| format!("invalid frame count {n:?}"))?,
        None => DEFAULT_FRAMES,
    };

    let mut sim = Simulation::from_config(&config);
    build_scene(&mut sim, &config);

    let frame = config.frame_seconds();
    let mut moves = 0;
    for i in 1..=frames {
        if let Some(summary) = sim.update(frame) {
            moves += summary.moves();
        }
        if i % config.render_hz == 0 {
            log::info!(
                "{}s simulated, {} ticks, {} swaps",
                i / config.render_hz,
                sim.world().ticks(),
                moves
            );
            moves = 0;
        }
    }

    print!("{}", sim.world().grid());
    Ok(())
}

/// A rock basin with water in it, a sand pile above and a smoke plume.
fn build_scene(sim: &mut Simulation, config: &SimConfig) {
    let w = config.width as i32;
    let h = config.height as i32;
    let world = sim.world_mut();

    for x in 0..w {
        world.paint(x, 0, 1, BlockType::Rock);
    }
    for y in 0..h / 3 {
        world.paint(w / 4, y, 1, BlockType::Rock);
        world.paint(3 * w / 4, y, 1, BlockType::Rock);
    }

    let mut brush = Brush::new(config.width);
    brush.kind = BlockType::Water;
    brush.grow();
    brush.grow();
    brush.apply(world, w / 2, h / 6);

    brush.kind = BlockType::Sand;
    brush.apply(world, w / 2, 2 * h / 3);

    brush.kind = BlockType::Gravel;
    brush.shrink();
    brush.apply(world, w / 8, h / 2);

    brush.kind = BlockType::Smoke;
    brush.apply(world, 7 * w / 8, h / 6);
}

use anyhow::{Result, bail};
use clap::Parser;
use perimeter::{PerimeterConfig, PerimeterEngine, PerimeterPool, WalkableGrid};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    steps: u32,
    /// Side length of the generated square map
    #[arg(long, default_value_t = 24)]
    size: usize,
}

fn roll(rng: &mut ChaCha8Rng, below: u64) -> u64 {
    rng.next_u64() % below
}

fn random_grid(rng: &mut ChaCha8Rng, size: usize) -> (WalkableGrid, i32, i32) {
    let mut grid = WalkableGrid::open(size, size, 0.5);
    for gy in 0..size as i32 {
        for gx in 0..size as i32 {
            if roll(rng, 5) == 0 {
                grid.set_walkable(gx, gy, false);
            }
        }
    }
    let (ox, oy) = (roll(rng, size as u64) as i32, roll(rng, size as u64) as i32);
    grid.set_walkable(ox, oy, true);
    (grid, ox, oy)
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    anyhow::ensure!(args.size > 0, "size must be positive");

    println!("Starting Fuzz harness on seed {} for max {} steps...", args.seed, args.steps);
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let (grid, ox, oy) = random_grid(&mut rng, args.size);
    let origin = grid.cell_center(ox, oy);
    let config = PerimeterConfig { seed: args.seed, ..PerimeterConfig::default() };
    let pool = PerimeterPool::new(&config.pool);
    let mut engine = PerimeterEngine::new(config, grid, pool)
        .map_err(|e| anyhow::anyhow!("engine rejected config: {e}"))?;
    engine.start(origin).map_err(|e| anyhow::anyhow!("start failed: {e}"))?;

    let mut investigations = 0u32;
    let mut restarts = 0u32;
    for step in 0..args.steps {
        match roll(&mut rng, 10) {
            0..=5 => engine.tick(roll(&mut rng, 100) as f32 / 100.0),
            6..=8 => {
                let sensors: Vec<_> = engine.sensors().map(|(id, _)| id).collect();
                if !sensors.is_empty() {
                    let pick = sensors[roll(&mut rng, sensors.len() as u64) as usize];
                    if engine.investigate(pick) {
                        investigations += 1;
                    }
                }
            }
            _ => {
                engine.clear();
                engine.start(origin).map_err(|e| anyhow::anyhow!("restart failed: {e}"))?;
                restarts += 1;
            }
        }

        // Assert invariants
        if let Err(violation) = engine.verify_invariants() {
            bail!("Invariant failed at step {step}: {violation}");
        }
    }

    println!(
        "Finished: {} nodes, {} investigations, {} restarts, state {:?}, hash {}",
        engine.node_count(),
        investigations,
        restarts,
        engine.state(),
        engine.snapshot_hash()
    );
    Ok(())
}

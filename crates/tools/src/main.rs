use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use perimeter::{
    InputPayload, PerimeterConfig, PerimeterEngine, SessionJournal, WalkabilityOracle,
    replay_journal,
};
use tools::{Scenario, load_config, load_map, render_area};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the text map (`.` floor, `S` origin, anything else blocks)
    #[arg(short, long)]
    map: PathBuf,

    /// Optional TOML config; defaults apply to missing fields
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Expand the area from the map origin, searching it as a seeker would
    Run {
        /// Simulated seconds
        #[arg(long, default_value_t = 5.0)]
        seconds: f32,
        /// Length of one tick in seconds
        #[arg(long, default_value_t = 0.1)]
        step: f32,
        /// Investigate a random unsearched cell every N ticks (0 disables searching)
        #[arg(long, default_value_t = 0)]
        search_every: u32,
        /// Write the session journal to this JSON file
        #[arg(long)]
        journal_out: Option<PathBuf>,
    },
    /// Re-run a recorded journal against the map
    Replay {
        #[arg(short, long)]
        journal: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = load_config(args.config.as_deref())?;
    let scenario = load_map(&args.map, config.node_radius)?;

    match args.command {
        Command::Run { seconds, step, search_every, journal_out } => {
            run(&scenario, config, seconds, step, search_every, journal_out)
        }
        Command::Replay { journal } => replay(&scenario, config, journal),
    }
}

fn run(
    scenario: &Scenario,
    config: PerimeterConfig,
    seconds: f32,
    step: f32,
    search_every: u32,
    journal_out: Option<PathBuf>,
) -> Result<()> {
    anyhow::ensure!(step > 0.0, "step must be positive");
    let mut journal = SessionJournal::new(config.seed);
    let mut engine = scenario.engine(config)?;

    let origin = scenario.origin();
    engine.start(origin).with_context(|| format!("Failed to start at {origin:?}"))?;
    journal.record(InputPayload::Start { origin });

    let ticks = (seconds / step).ceil() as u32;
    for tick in 1..=ticks {
        engine.tick(step);
        journal.record(InputPayload::Tick { elapsed: step });

        if search_every > 0 && tick % search_every == 0 {
            search_once(&mut engine, &mut journal);
        }
    }

    print_summary(&engine);
    println!("{}", render_area(&engine, &scenario.grid));

    if let Some(path) = journal_out {
        let text = serde_json::to_string_pretty(&journal)
            .with_context(|| "Failed to serialize journal JSON")?;
        fs::write(&path, text)
            .with_context(|| format!("Failed to write journal file: {}", path.display()))?;
        println!("Journal written to {} ({} inputs)", path.display(), journal.len());
    }
    Ok(())
}

/// Sends the seeker to a random unsearched cell and investigates it if armed.
fn search_once<O: WalkabilityOracle>(
    engine: &mut PerimeterEngine<O>,
    journal: &mut SessionJournal,
) {
    let Ok(location) = engine.random_unsearched_location() else {
        return;
    };
    let cell = engine.cell_for_world(location);
    if engine.investigate_cell(cell) {
        log::debug!("seeker searched {cell:?}");
        journal.record(InputPayload::Investigate { cell });
    }
}

fn replay(scenario: &Scenario, config: PerimeterConfig, path: PathBuf) -> Result<()> {
    let journal_data = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read journal file: {}", path.display()))?;
    let journal: SessionJournal = serde_json::from_str(&journal_data)
        .with_context(|| "Failed to deserialize journal JSON")?;

    let result = replay_journal(&config, &scenario.grid, &journal)
        .map_err(|e| anyhow::anyhow!("Replay failed during execution: {e}"))?;

    println!("Replay complete.");
    println!("Final State: {:?}", result.final_state);
    println!("Movement Potential: {}", result.final_potential);
    println!("Nodes: {} ({} searched)", result.node_count, result.searched_count);
    println!("Snapshot Hash: {}", result.final_snapshot_hash);
    Ok(())
}

fn print_summary<O: WalkabilityOracle>(engine: &PerimeterEngine<O>) {
    let pool = engine.pool();
    println!("State: {:?}", engine.state());
    println!("Movement Potential: {}", engine.movement_potential());
    println!(
        "Nodes: {} ({} unsearched), sensors: {}, markers: {}",
        engine.node_count(),
        engine.unsearched_count(),
        engine.sensor_count(),
        engine.marker_count()
    );
    println!(
        "Pool shortfalls: nodes {}, markers {}, sensors {}",
        pool.nodes().stats().shortfalls,
        pool.markers().stats().shortfalls,
        pool.sensors().stats().shortfalls
    );
    println!("Snapshot Hash: {}", engine.snapshot_hash());
}

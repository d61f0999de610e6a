use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use boid_shared::Position;
use boid_sim::{parse_position, SimConfig, Simulation, WorldSize};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Headless boid flock simulation", long_about = None)]
struct Args {
    /// JSON config file; command line flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of agents in the initial flock
    #[arg(short = 'n', long)]
    agents: Option<usize>,

    /// World width
    #[arg(long)]
    width: Option<f32>,

    /// World height
    #[arg(long)]
    height: Option<f32>,

    /// Number of frames to simulate
    #[arg(short, long, default_value_t = 600)]
    frames: u64,

    /// Seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Pointer position as X,Y
    #[arg(short, long, value_parser = parse_position)]
    pointer: Option<Position>,

    /// Steer towards the pointer instead of the world centre
    #[arg(long)]
    follow: bool,

    /// Bounce off the edges instead of wrapping around
    #[arg(long)]
    bounce: bool,

    /// Append a random agent every N frames
    #[arg(long)]
    spawn_every: Option<u64>,

    /// Write frame reports here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

fn build_config(args: &Args) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };

    if let Some(agents) = args.agents {
        config.agents = agents;
    }
    if args.width.is_some() || args.height.is_some() {
        config.world = WorldSize {
            width: args.width.unwrap_or(config.world.width),
            height: args.height.unwrap_or(config.world.height),
        };
    }
    if args.seed.is_some() {
        config.seed = args.seed;
    }
    if let Some(pointer) = args.pointer {
        config.pointer = pointer;
    }
    if args.follow {
        config.settings.follow_target = true;
    }
    if args.bounce {
        config.settings.wrap_edges = false;
    }
    if args.spawn_every.is_some() {
        config.spawn_every = args.spawn_every;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    if args.debug {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    log::info!("Boid simulation starting...");

    let config = build_config(&args).context("Failed to build configuration")?;
    log::debug!("Configuration: {:?}", config);

    let mut simulation = Simulation::new(config).context("Failed to initialize simulation")?;

    let out: Box<dyn Write> = match &args.output {
        Some(path) => {
            log::info!("Writing frame reports to {}", path.display());
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(BufWriter::new(io::stdout().lock())),
    };

    simulation
        .run(args.frames, out)
        .context("Simulation error")?;

    Ok(())
}

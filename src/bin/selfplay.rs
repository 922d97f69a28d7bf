//! Self-play statistics CLI.
//!
//! Plays engine-vs-engine games and writes one JSON record per game.
//!
//! Usage:
//!   cargo run --release --bin selfplay -- --games 20 --size 4 --depth 2 --output games.jsonl

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qubic::config::EngineConfig;
use qubic::eval::Strategy;
use qubic::selfplay::{self, SelfPlayConfig};

/// Plays qubic games against itself and records the results.
#[derive(Parser, Debug)]
#[command(name = "selfplay")]
#[command(about = "Engine-vs-engine qubic games with JSONL output", long_about = None)]
struct Args {
    /// Number of games to play
    #[arg(long, default_value_t = 10)]
    games: usize,

    /// Engine config file supplying board size, depth and evaluation weights
    #[arg(long)]
    config: Option<PathBuf>,

    /// Cube edge length (overrides the config file)
    #[arg(long)]
    size: Option<usize>,

    /// Search depth for O (overrides the config file)
    #[arg(long)]
    depth: Option<u32>,

    /// Search depth for X (defaults to --depth)
    #[arg(long)]
    opponent_depth: Option<u32>,

    /// Opening plies chosen uniformly at random
    #[arg(long, default_value_t = 2)]
    random_plies: usize,

    /// Evaluation strategy: simple or layered
    #[arg(long)]
    strategy: Option<String>,

    /// Number of parallel threads
    #[arg(long, default_value_t = 4)]
    threads: usize,

    /// Random seed, 0 for entropy
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Output file path (default: stdout)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Suppress progress and summary output
    #[arg(long)]
    quiet: bool,
}

fn build_config(args: &Args) -> Result<SelfPlayConfig, String> {
    let mut engine = match &args.config {
        Some(path) => EngineConfig::load(path).map_err(|e| e.to_string())?,
        None => EngineConfig::default(),
    };
    if let Some(size) = args.size {
        engine.board_size = size;
    }
    if let Some(depth) = args.depth {
        engine.depth = depth;
    }
    if let Some(name) = &args.strategy {
        engine.eval.strategy =
            Strategy::from_name(name).ok_or_else(|| format!("unknown strategy '{}'", name))?;
    }
    engine.validate().map_err(|e| e.to_string())?;

    Ok(SelfPlayConfig {
        num_games: args.games,
        board_size: engine.board_size,
        depth: engine.depth,
        opponent_depth: args.opponent_depth.unwrap_or(engine.depth),
        random_plies: args.random_plies,
        eval: engine.eval,
        threads: args.threads.max(1),
        seed: args.seed,
        quiet: args.quiet,
    })
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = match build_config(&args) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    if !config.quiet {
        info!(
            "self-play: {} games, size {}, depth {}/{}, {} random plies, {} strategy, {} threads",
            config.num_games,
            config.board_size,
            config.depth,
            config.opponent_depth,
            config.random_plies,
            config.eval.strategy.name(),
            config.threads
        );
    }

    let start = Instant::now();
    let games = match selfplay::run_self_play(&config) {
        Ok(games) => games,
        Err(e) => {
            error!("self-play failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if !config.quiet {
        info!(
            "completed {} games in {:.1}s",
            games.len(),
            start.elapsed().as_secs_f64()
        );
        selfplay::print_summary(&games);
    }

    let written = match &args.output {
        Some(path) => File::create(path).and_then(|file| {
            let mut writer = BufWriter::new(file);
            selfplay::write_jsonl(&games, &mut writer)
        }),
        None => {
            let mut writer = BufWriter::new(io::stdout().lock());
            selfplay::write_jsonl(&games, &mut writer)
        }
    };
    if let Err(e) = written {
        error!("failed to write output: {}", e);
        return ExitCode::FAILURE;
    }
    if let (Some(path), false) = (&args.output, config.quiet) {
        info!("wrote {} games to {}", games.len(), path.display());
    }

    ExitCode::SUCCESS
}

//! Qubic -- a 3D tic-tac-toe engine speaking a line-based text protocol.
//!
//! This binary reads commands from stdin and writes responses to stdout.
//! Diagnostics go to stderr through `tracing`; set `RUST_LOG` to see them.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use qubic::config::EngineConfig;
use qubic::engine::Engine;
use qubic::protocol::parser::{parse_command, Command};

/// 3D tic-tac-toe engine.
#[derive(Parser, Debug)]
#[command(name = "qubic")]
#[command(about = "Minimax engine for N x N x N tic-tac-toe", long_about = None)]
#[command(version)]
struct Args {
    /// Engine config file (TOML); defaults are used if it does not exist
    #[arg(short, long, default_value = "qubic.toml")]
    config: PathBuf,
}

/// Runs the main protocol loop until `quit` or end of input.
fn run<W: Write>(engine: &mut Engine, out: &mut W) -> io::Result<()> {
    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;

        let cmd = match parse_command(&line) {
            Some(c) => c,
            None => continue,
        };

        match cmd {
            Command::Qubic => engine.handle_qubic(out)?,
            Command::IsReady => engine.handle_isready(out)?,
            Command::SetOption { name, value } => {
                engine.handle_setoption(&name, value.as_deref(), out)?
            }
            Command::NewGame => engine.handle_newgame(out)?,
            Command::Position { notation } => engine.handle_position(&notation, out)?,
            Command::Move { coord } => engine.handle_move(coord, out)?,
            Command::Undo => engine.handle_undo(out)?,
            Command::Go(params) => engine.handle_go(params.depth, out)?,
            Command::Board => engine.handle_board(out)?,
            Command::Quit => break,
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let args = Args::parse();
    let config = match EngineConfig::load_or_default(&args.config) {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut engine = match Engine::new(config) {
        Ok(e) => e,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    info!(
        size = engine.config().board_size,
        depth = engine.config().depth,
        "engine ready"
    );

    let stdout = io::stdout();
    let mut out = io::BufWriter::new(stdout.lock());
    match run(&mut engine, &mut out) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("i/o error: {}", e);
            ExitCode::FAILURE
        }
    }
}

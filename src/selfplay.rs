//! Self-play game generation and statistics.
//!
//! Plays full games by alternating search calls for both sides, optionally
//! opening with a few uniformly random plies so that repeated games differ.
//! Records every move with its search score, node count and latency, plus
//! the winner and winning line, for JSONL output and summary statistics.

use std::io::{self, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Instant;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::board::{Board, BoardError, Coord, Player, DEFAULT_BOARD_SIZE};
use crate::config::DEFAULT_DEPTH;
use crate::eval::EvalConfig;
use crate::protocol::notation::encode_position;
use crate::search::{best_move, SearchError};

/// Errors that abort a self-play run.
#[derive(Debug, thiserror::Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("selfplay worker thread panicked")]
    WorkerPanicked,
}

/// Configuration for self-play game generation.
#[derive(Debug, Clone)]
pub struct SelfPlayConfig {
    /// Number of games to play.
    pub num_games: usize,
    /// Cube edge length.
    pub board_size: usize,
    /// Search depth for `O`.
    pub depth: u32,
    /// Search depth for `X`.
    pub opponent_depth: u32,
    /// Number of opening plies chosen uniformly at random.
    pub random_plies: usize,
    /// Evaluation weights shared by both sides.
    pub eval: EvalConfig,
    /// Number of parallel threads for concurrent games.
    pub threads: usize,
    /// Random seed (0 = use entropy).
    pub seed: u64,
    /// Suppress per-game progress output.
    pub quiet: bool,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        SelfPlayConfig {
            num_games: 10,
            board_size: DEFAULT_BOARD_SIZE,
            depth: DEFAULT_DEPTH,
            opponent_depth: DEFAULT_DEPTH,
            random_plies: 2,
            eval: EvalConfig::default(),
            threads: 4,
            seed: 0,
            quiet: false,
        }
    }
}

/// One move of a self-play game.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRecord {
    pub player: Player,
    pub coord: Coord,
    /// True for the random opening plies.
    pub random: bool,
    /// Search score from the mover's perspective; absent for random plies.
    pub score: Option<i64>,
    pub nodes: u64,
    /// Wall-clock time spent choosing the move.
    pub micros: u64,
}

/// A complete self-play game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    pub game_id: usize,
    pub board_size: usize,
    pub moves: Vec<MoveRecord>,
    /// `None` for a draw.
    pub winner: Option<Player>,
    pub winning_line: Option<Vec<Coord>>,
    /// Final position in protocol notation.
    pub final_position: String,
}

/// Plays a single self-play game and returns the game record.
pub fn play_game(
    config: &SelfPlayConfig,
    game_id: usize,
    rng: &mut SmallRng,
) -> Result<GameRecord, SelfPlayError> {
    let mut board = Board::new(config.board_size)?;
    let mut moves: Vec<MoveRecord> = Vec::new();
    let mut player = Player::O;

    while board.winner().is_none() && !board.is_full() {
        let start = Instant::now();
        let record = if moves.len() < config.random_plies {
            let open: Vec<Coord> = board.available_moves().collect();
            let coord = open[rng.gen_range(0..open.len())];
            MoveRecord {
                player,
                coord,
                random: true,
                score: None,
                nodes: 0,
                micros: 0,
            }
        } else {
            let depth = match player {
                Player::O => config.depth,
                Player::X => config.opponent_depth,
            };
            let result = best_move(&mut board, depth, player, &config.eval)?;
            let Some(coord) = result.best_move else {
                break;
            };
            MoveRecord {
                player,
                coord,
                random: false,
                score: Some(result.score),
                nodes: result.nodes,
                micros: start.elapsed().as_micros() as u64,
            }
        };

        board.apply_move(record.coord, player)?;
        moves.push(record);
        player = player.opponent();
    }

    let (winner, winning_line) = match board.winner() {
        Some((p, line)) => (Some(p), Some(line.cells().to_vec())),
        None => (None, None),
    };

    Ok(GameRecord {
        game_id,
        board_size: config.board_size,
        moves,
        winner,
        winning_line,
        final_position: encode_position(&board),
    })
}

/// Runs self-play generation, producing multiple game records.
///
/// When `config.threads > 1`, games are played concurrently using rayon.
/// Games arrive in completion order.
pub fn run_self_play(config: &SelfPlayConfig) -> Result<Vec<GameRecord>, SelfPlayError> {
    let mut games = Vec::with_capacity(config.num_games);
    run_self_play_with_callback(config, |game| {
        games.push(game);
    })?;
    Ok(games)
}

/// Runs self-play generation, calling `on_game` with each completed game
/// record.
pub fn run_self_play_with_callback<F>(config: &SelfPlayConfig, on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    if config.threads > 1 {
        run_self_play_parallel(config, on_game)
    } else {
        run_self_play_sequential(config, on_game)
    }
}

fn game_rng(seed: u64, game_id: usize) -> SmallRng {
    if seed != 0 {
        SmallRng::seed_from_u64(seed.wrapping_add(game_id as u64))
    } else {
        SmallRng::from_entropy()
    }
}

fn log_game(game: &GameRecord, done: usize, total: usize, start: Instant) {
    let outcome = match game.winner {
        Some(p) => format!("{} wins", p),
        None => "draw".to_string(),
    };
    info!(
        "game {}/{}: {} after {} plies ({:.1}s)",
        done,
        total,
        outcome,
        game.moves.len(),
        start.elapsed().as_secs_f64()
    );
}

/// Sequential self-play: plays games one at a time.
fn run_self_play_sequential<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord),
{
    for i in 0..config.num_games {
        let game_start = Instant::now();
        let mut rng = game_rng(config.seed, i);
        let game = play_game(config, i, &mut rng)?;
        if !config.quiet {
            log_game(&game, i + 1, config.num_games, game_start);
        }
        on_game(game);
    }
    Ok(())
}

/// Parallel self-play: plays games concurrently using rayon.
/// Uses a channel to deliver completed games to the callback from worker
/// threads.
fn run_self_play_parallel<F>(config: &SelfPlayConfig, mut on_game: F) -> Result<(), SelfPlayError>
where
    F: FnMut(GameRecord) + Send,
{
    use rayon::prelude::*;
    use std::sync::mpsc;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.threads)
        .build()?;

    let (tx, rx) = mpsc::channel::<Result<GameRecord, SelfPlayError>>();
    let config_clone = config.clone();
    let handle = std::thread::spawn(move || {
        let completed = AtomicUsize::new(0);
        pool.install(|| {
            (0..config_clone.num_games)
                .into_par_iter()
                .for_each_with(tx, |tx, i| {
                    let game_start = Instant::now();
                    let mut rng = game_rng(config_clone.seed, i);
                    let game = play_game(&config_clone, i, &mut rng);
                    if let (Ok(game), false) = (&game, config_clone.quiet) {
                        let n = completed.fetch_add(1, Ordering::Relaxed) + 1;
                        log_game(game, n, config_clone.num_games, game_start);
                    }
                    let _ = tx.send(game);
                });
        });
    });

    // Drain every result so workers never block, then report the first error.
    let mut first_error = None;
    for result in rx {
        match result {
            Ok(game) => on_game(game),
            Err(e) => {
                first_error.get_or_insert(e);
            }
        }
    }

    handle.join().map_err(|_| SelfPlayError::WorkerPanicked)?;
    first_error.map_or(Ok(()), Err)
}

/// Writes game records as JSONL (one JSON object per game, one per line).
pub fn write_jsonl<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    for game in games {
        serde_json::to_writer(&mut *out, game)?;
        writeln!(out)?;
    }
    out.flush()
}

/// Aggregate outcome of a batch of games.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub games: usize,
    /// Wins indexed by player identifier.
    pub wins: [usize; 2],
    pub draws: usize,
    pub avg_plies: f64,
    /// Mean searched-move latency in milliseconds, indexed by player identifier.
    pub avg_move_ms: [f64; 2],
}

impl Summary {
    pub fn from_games(games: &[GameRecord]) -> Summary {
        let mut wins = [0usize; 2];
        let mut draws = 0usize;
        let mut plies = 0usize;
        let mut micros = [0u64; 2];
        let mut searched = [0u64; 2];

        for game in games {
            plies += game.moves.len();
            match game.winner {
                Some(p) => wins[p.index()] += 1,
                None => draws += 1,
            }
            for mv in game.moves.iter().filter(|m| !m.random) {
                micros[mv.player.index()] += mv.micros;
                searched[mv.player.index()] += 1;
            }
        }

        let avg_ms = |i: usize| micros[i] as f64 / 1000.0 / searched[i].max(1) as f64;
        Summary {
            games: games.len(),
            wins,
            draws,
            avg_plies: plies as f64 / games.len().max(1) as f64,
            avg_move_ms: [avg_ms(0), avg_ms(1)],
        }
    }
}

/// Writes a human-readable summary of self-play results.
pub fn write_summary<W: Write>(games: &[GameRecord], out: &mut W) -> io::Result<()> {
    let summary = Summary::from_games(games);
    let total = summary.games.max(1) as f64;

    writeln!(out, "=== Self-Play Summary ===")?;
    writeln!(out, "Games: {}", summary.games)?;
    writeln!(out, "Avg plies/game: {:.1}", summary.avg_plies)?;
    for player in [Player::O, Player::X] {
        let i = player.index();
        writeln!(
            out,
            "  {} wins: {} ({:.1}%), avg move {:.2}ms",
            player,
            summary.wins[i],
            100.0 * summary.wins[i] as f64 / total,
            summary.avg_move_ms[i]
        )?;
    }
    writeln!(
        out,
        "  draws: {} ({:.1}%)",
        summary.draws,
        100.0 * summary.draws as f64 / total
    )?;
    out.flush()
}

/// Prints a summary of self-play results to stderr.
pub fn print_summary(games: &[GameRecord]) {
    let _ = write_summary(games, &mut io::stderr().lock());
}

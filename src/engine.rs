//! Engine state management.
//!
//! Holds the current game, its move history and the engine configuration,
//! and runs search for the `go` command. Every `handle_*` method writes its
//! protocol reply to the given writer and flushes it; rejected requests are
//! answered with a single `error <reason>` line.

use std::io::{self, Write};
use std::time::Instant;

use tracing::{debug, info};

use crate::board::{Board, BoardError, Coord, Player, MAX_BOARD_SIZE};
use crate::config::{validate_eval, ConfigError, EngineConfig};
use crate::eval::Strategy;
use crate::protocol::notation::{encode_position, format_line, parse_position, NotationError};
use crate::search::{best_move, SearchError, SearchResult};

/// Reasons a command could not be carried out.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("unknown option '{0}'")]
    UnknownOption(String),

    #[error("invalid value for option {name}: '{value}'")]
    InvalidOptionValue { name: String, value: String },

    #[error("game is over")]
    GameOver,

    #[error("nothing to undo")]
    NothingToUndo,

    #[error("search depth must be at least 1")]
    ZeroDepth,

    #[error("invalid position: {0}")]
    Notation(#[from] NotationError),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// What happened after a move was played.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The game goes on.
    Continue,
    /// The mover completed a line.
    Win { player: Player, line: Vec<Coord> },
    /// The board is full and nobody won.
    Draw,
}

/// Holds the mutable state of the engine between commands.
pub struct Engine {
    config: EngineConfig,
    board: Board,
    history: Vec<Coord>,
}

impl Engine {
    /// Creates an engine with an empty board of the configured size.
    pub fn new(config: EngineConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let board = Board::new(config.board_size)?;
        Ok(Engine {
            config,
            board,
            history: Vec::new(),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Moves played since the last `newgame` or `position`.
    pub fn history(&self) -> &[Coord] {
        &self.history
    }

    /// The side whose stone the next `move` places.
    pub fn to_move(&self) -> Player {
        self.board.side_to_move()
    }

    /// Resets to an empty board of the configured size.
    pub fn new_game(&mut self) -> Result<(), EngineError> {
        self.board = Board::new(self.config.board_size)?;
        self.history.clear();
        info!(size = self.config.board_size, "new game");
        Ok(())
    }

    /// Replaces the board with a parsed position and clears the history.
    pub fn set_position(&mut self, notation: &str) -> Result<(), EngineError> {
        let board = parse_position(notation)?;
        self.config.board_size = board.size();
        self.board = board;
        self.history.clear();
        debug!(notation, "position set");
        Ok(())
    }

    /// Sets an engine option. `BoardSize` starts a new game.
    pub fn set_option(&mut self, name: &str, value: Option<&str>) -> Result<(), EngineError> {
        let invalid = || EngineError::InvalidOptionValue {
            name: name.to_string(),
            value: value.unwrap_or("").to_string(),
        };
        let raw = value.ok_or_else(invalid)?;

        if name.eq_ignore_ascii_case("depth") {
            let depth: u32 = raw.parse().map_err(|_| invalid())?;
            if depth == 0 {
                return Err(invalid());
            }
            self.config.depth = depth;
        } else if name.eq_ignore_ascii_case("boardsize") {
            let size: usize = raw.parse().map_err(|_| invalid())?;
            if !(2..=MAX_BOARD_SIZE).contains(&size) {
                return Err(invalid());
            }
            self.config.board_size = size;
            self.new_game()?;
        } else if name.eq_ignore_ascii_case("strategy") {
            let strategy = Strategy::from_name(raw).ok_or_else(invalid)?;
            let mut eval = self.config.eval.clone();
            eval.strategy = strategy;
            validate_eval(&eval)?;
            self.config.eval = eval;
        } else {
            return Err(EngineError::UnknownOption(name.to_string()));
        }
        info!(name, value = raw, "option set");
        Ok(())
    }

    /// Plays a stone for the side to move.
    pub fn play_move(&mut self, coord: Coord) -> Result<MoveOutcome, EngineError> {
        if self.board.winner().is_some() {
            return Err(EngineError::GameOver);
        }
        let player = self.to_move();
        self.board.apply_move(coord, player)?;
        self.history.push(coord);
        debug!(%player, %coord, "move played");

        if let Some(line) = self.board.check_winner(player) {
            info!(%player, "game won");
            return Ok(MoveOutcome::Win {
                player,
                line: line.cells().to_vec(),
            });
        }
        if self.board.is_full() {
            info!("game drawn");
            return Ok(MoveOutcome::Draw);
        }
        Ok(MoveOutcome::Continue)
    }

    /// Takes back the most recent move.
    pub fn undo(&mut self) -> Result<Coord, EngineError> {
        let coord = self.history.pop().ok_or(EngineError::NothingToUndo)?;
        self.board.undo_move(coord)?;
        Ok(coord)
    }

    /// Searches for the side to move. `depth` overrides the configured depth.
    pub fn search(&mut self, depth: Option<u32>) -> Result<SearchResult, EngineError> {
        let depth = depth.unwrap_or(self.config.depth);
        if depth == 0 {
            return Err(EngineError::ZeroDepth);
        }
        let root = self.to_move();
        Ok(best_move(&mut self.board, depth, root, &self.config.eval)?)
    }

    /// Handles the handshake: writes id, options and `qubicok`.
    pub fn handle_qubic<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "id name qubic")?;
        writeln!(out, "id author qubic developers")?;
        writeln!(
            out,
            "option name Depth type spin default {} min 1 max 64",
            self.config.depth
        )?;
        writeln!(
            out,
            "option name BoardSize type spin default {} min 2 max {}",
            self.config.board_size, MAX_BOARD_SIZE
        )?;
        writeln!(
            out,
            "option name Strategy type combo default {} var simple var layered",
            self.config.eval.strategy.name()
        )?;
        writeln!(out, "qubicok")?;
        out.flush()
    }

    /// Handles the `isready` command.
    pub fn handle_isready<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "readyok")?;
        out.flush()
    }

    /// Handles `setoption`; only failures produce output.
    pub fn handle_setoption<W: Write>(
        &mut self,
        name: &str,
        value: Option<&str>,
        out: &mut W,
    ) -> io::Result<()> {
        if let Err(e) = self.set_option(name, value) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles `newgame`.
    pub fn handle_newgame<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.new_game() {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles `position`; only failures produce output.
    pub fn handle_position<W: Write>(&mut self, notation: &str, out: &mut W) -> io::Result<()> {
        if let Err(e) = self.set_position(notation) {
            writeln!(out, "error {}", e)?;
            out.flush()?;
        }
        Ok(())
    }

    /// Handles `move`: replies `ok`, a `result` line, or an error.
    pub fn handle_move<W: Write>(&mut self, coord: Coord, out: &mut W) -> io::Result<()> {
        match self.play_move(coord) {
            Ok(MoveOutcome::Continue) => writeln!(out, "ok")?,
            Ok(MoveOutcome::Win { player, line }) => {
                let cells: Vec<String> = line.iter().map(|c| c.to_string()).collect();
                writeln!(out, "result {} wins {}", player, cells.join(" "))?
            }
            Ok(MoveOutcome::Draw) => writeln!(out, "result draw")?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `undo`.
    pub fn handle_undo<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        match self.undo() {
            Ok(_) => writeln!(out, "ok")?,
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `go`: writes an `info` line and the best move without
    /// playing it.
    pub fn handle_go<W: Write>(&mut self, depth: Option<u32>, out: &mut W) -> io::Result<()> {
        let start = Instant::now();
        match self.search(depth) {
            Ok(result) => {
                writeln!(
                    out,
                    "info depth {} nodes {} score {} time {}",
                    result.depth,
                    result.nodes,
                    result.score,
                    start.elapsed().as_millis()
                )?;
                match result.best_move {
                    Some(coord) => writeln!(out, "bestmove {}", coord)?,
                    None => writeln!(out, "bestmove none")?,
                }
            }
            Err(e) => writeln!(out, "error {}", e)?,
        }
        out.flush()
    }

    /// Handles `board`: the current position and the side to move.
    pub fn handle_board<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "position {}", encode_position(&self.board))?;
        if let Some((player, line)) = self.board.winner() {
            writeln!(out, "winner {} {}", player, format_line(line))?;
        }
        writeln!(out, "tomove {}", self.to_move())?;
        out.flush()
    }
}

//! Depth-limited minimax with alpha-beta pruning.
//!
//! Every node is scored from a single, fixed perspective: the player the
//! top-level call maximizes for. Minimizing plies play the opponent's stones
//! but still evaluate leaves for the root player.
//!
//! Design: the board is borrowed mutably for the whole search and each move is
//! held through a [`MoveGuard`](crate::board::MoveGuard), so a cutoff, a
//! normal return, or an error propagated with `?` all leave the board exactly
//! as it was found.

use crate::board::{Board, BoardError, Coord, Player};
use crate::eval::{evaluate, EvalConfig, WIN_SCORE};

/// Bound wider than any reachable score.
pub const INF: i64 = WIN_SCORE + 1;

/// Errors surfaced by a search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    #[error("no legal moves: the board is full and nobody has won")]
    NoLegalMoves,

    #[error(transparent)]
    Board(#[from] BoardError),
}

/// Outcome of a top-level search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchResult {
    /// `None` when the position was already decided.
    pub best_move: Option<Coord>,
    pub score: i64,
    /// Number of positions visited, the root included.
    pub nodes: u64,
    pub depth: u32,
}

/// Alpha-beta search state for one root player.
pub struct Searcher<'a> {
    root: Player,
    config: &'a EvalConfig,
    nodes: u64,
}

impl<'a> Searcher<'a> {
    pub fn new(root: Player, config: &'a EvalConfig) -> Self {
        Searcher {
            root,
            config,
            nodes: 0,
        }
    }

    /// Positions visited so far.
    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    /// Searches `depth` plies below `board`.
    ///
    /// At each node, in order: a completed line for the root player scores
    /// `+WIN_SCORE`; a completed line for the opponent scores `-WIN_SCORE`; a
    /// depth of zero or a full board returns the heuristic for the root
    /// player. Otherwise the empty cells are tried in scan order, placing the
    /// root player's stone on maximizing plies and the opponent's on
    /// minimizing ones, until `beta <= alpha`.
    ///
    /// The returned move is the first one reaching the best score.
    pub fn alpha_beta(
        &mut self,
        board: &mut Board,
        depth: u32,
        maximizing: bool,
        mut alpha: i64,
        mut beta: i64,
    ) -> Result<(Option<Coord>, i64), SearchError> {
        self.nodes += 1;

        if board.check_winner(self.root).is_some() {
            return Ok((None, WIN_SCORE));
        }
        if board.check_winner(self.root.opponent()).is_some() {
            return Ok((None, -WIN_SCORE));
        }
        if depth == 0 || board.next_available(0).is_none() {
            return Ok((None, evaluate(self.root, board, self.config)));
        }

        let side = if maximizing {
            self.root
        } else {
            self.root.opponent()
        };
        let n = board.size();
        let mut best_move = None;
        let mut best = if maximizing { -INF } else { INF };
        let mut from = 0;

        while let Some(idx) = board.next_available(from) {
            from = idx + 1;
            let coord = Coord::from_index(idx, n);
            let score = {
                let mut child = board.play(coord, side)?;
                self.alpha_beta(&mut child, depth - 1, !maximizing, alpha, beta)?
                    .1
            };

            if maximizing {
                if score > best {
                    best = score;
                    best_move = Some(coord);
                }
                alpha = alpha.max(score);
            } else {
                if score < best {
                    best = score;
                    best_move = Some(coord);
                }
                beta = beta.min(score);
            }
            if beta <= alpha {
                break;
            }
        }

        Ok((best_move, best))
    }
}

/// Picks a move for `root` by searching `depth` plies.
///
/// Fails with [`SearchError::NoLegalMoves`] on a full board that nobody has
/// won. On a decided position the result carries no move and `±WIN_SCORE`.
pub fn best_move(
    board: &mut Board,
    depth: u32,
    root: Player,
    config: &EvalConfig,
) -> Result<SearchResult, SearchError> {
    if board.is_full() && board.winner().is_none() {
        return Err(SearchError::NoLegalMoves);
    }

    let mut searcher = Searcher::new(root, config);
    let (mv, score) = searcher.alpha_beta(board, depth, true, -INF, INF)?;

    tracing::debug!(
        root = %root,
        depth,
        nodes = searcher.nodes(),
        score,
        best = ?mv,
        "alpha-beta search finished"
    );

    Ok(SearchResult {
        best_move: mv,
        score,
        nodes: searcher.nodes(),
        depth,
    })
}

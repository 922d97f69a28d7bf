//! Unpruned minimax.
//!
//! Walks the full tree with the same node order, terminal checks and
//! perspective as [`alpha_beta`](super::Searcher::alpha_beta). Used to check
//! that pruning never changes the chosen move or its score, and to measure
//! how many nodes pruning saves.

use crate::board::{Board, Coord, Player};
use crate::eval::{evaluate, EvalConfig, WIN_SCORE};

use super::alphabeta::{SearchError, SearchResult, INF};

/// Searches every node to `depth` plies for `root`.
pub fn full_minimax(
    board: &mut Board,
    depth: u32,
    root: Player,
    config: &EvalConfig,
) -> Result<SearchResult, SearchError> {
    if board.is_full() && board.winner().is_none() {
        return Err(SearchError::NoLegalMoves);
    }
    let mut nodes = 0;
    let (best_move, score) = minimax(board, depth, true, root, config, &mut nodes)?;
    Ok(SearchResult {
        best_move,
        score,
        nodes,
        depth,
    })
}

fn minimax(
    board: &mut Board,
    depth: u32,
    maximizing: bool,
    root: Player,
    config: &EvalConfig,
    nodes: &mut u64,
) -> Result<(Option<Coord>, i64), SearchError> {
    *nodes += 1;

    if board.check_winner(root).is_some() {
        return Ok((None, WIN_SCORE));
    }
    if board.check_winner(root.opponent()).is_some() {
        return Ok((None, -WIN_SCORE));
    }
    if depth == 0 || board.next_available(0).is_none() {
        return Ok((None, evaluate(root, board, config)));
    }

    let side = if maximizing { root } else { root.opponent() };
    let moves: Vec<Coord> = board.available_moves().collect();
    let mut best_move = None;
    let mut best = if maximizing { -INF } else { INF };

    for coord in moves {
        let mut child = board.play(coord, side)?;
        let (_, score) = minimax(&mut child, depth - 1, !maximizing, root, config, nodes)?;
        let better = if maximizing { score > best } else { score < best };
        if better {
            best = score;
            best_move = Some(coord);
        }
    }

    Ok((best_move, best))
}
